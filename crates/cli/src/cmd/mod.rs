mod stage;

pub use stage::{ReinstallArgs, TargetArgs, cmd_stage};
