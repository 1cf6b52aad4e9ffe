mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use includeos_lib::Stage;

use crate::cmd::{ReinstallArgs, TargetArgs, cmd_stage};
use crate::output::{OutputFormat, print_error};

/// includeos - configure, build and boot IncludeOS services
#[derive(Parser)]
#[command(name = "includeos")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,

  /// Format of the final stage report
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Install service dependencies with conan
  Install {
    #[command(flatten)]
    target: TargetArgs,
  },

  /// Configure an IncludeOS service, installing dependencies if needed
  Configure {
    #[command(flatten)]
    reinstall: ReinstallArgs,

    #[command(flatten)]
    target: TargetArgs,
  },

  /// Build an IncludeOS service, configuring it if needed
  Build {
    #[command(flatten)]
    reinstall: ReinstallArgs,

    #[command(flatten)]
    target: TargetArgs,
  },

  /// Boot an IncludeOS service, building it if needed
  Boot {
    #[command(flatten)]
    reinstall: ReinstallArgs,

    #[command(flatten)]
    target: TargetArgs,
  },
}

impl Commands {
  fn into_stage(self) -> (Stage, TargetArgs, bool) {
    match self {
      Commands::Install { target } => (Stage::Install, target, false),
      Commands::Configure { reinstall, target } => (Stage::Configure, target, reinstall.reinstall),
      Commands::Build { reinstall, target } => (Stage::Build, target, reinstall.reinstall),
      Commands::Boot { reinstall, target } => (Stage::Boot, target, reinstall.reinstall),
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let (stage, target, reinstall) = cli.command.into_stage();

  match cmd_stage(stage, target, reinstall, cli.output) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
