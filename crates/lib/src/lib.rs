//! includeos-lib: staged build pipeline for IncludeOS services
//!
//! This crate drives the external tools that turn a service source tree into a
//! bootable image:
//! - `BuildContext`: the resolved source/build directories for one run
//! - `markers`: filesystem predicates over stage-completion marker files
//! - `execute`: the external process invoker and its error types
//! - `Pipeline`: the install → configure → build → boot decision chain

pub mod config;
pub mod consts;
pub mod context;
pub mod execute;
pub mod markers;
pub mod pipeline;
pub mod util;

pub use config::Toolchain;
pub use context::{BuildContext, ContextOptions};
pub use execute::{Invoker, PipelineError, ProcessInvoker, Stage, StageResult, Tool, ToolCommand};
pub use pipeline::Pipeline;
