//! External tool execution.
//!
//! This module provides the building blocks the pipeline uses to drive the
//! external tools:
//! - `ToolCommand`: a command line plus optional activation script
//! - `Invoker`: the seam through which commands are run
//! - `ProcessInvoker`: the real, blocking process runner
//! - the stage/tool vocabulary and the error taxonomy

pub mod command;
pub mod invoker;
pub mod types;

pub use command::ToolCommand;
pub use invoker::{Invoker, ProcessInvoker};
pub use types::{PipelineError, Stage, StageResult, Tool};
