// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, OverdraftArg, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Invalid arguments, a missing input path or `--help` make clap print its
/// message and exit the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
