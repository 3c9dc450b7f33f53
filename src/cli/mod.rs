// src/cli/mod.rs

use clap::Parser;

/// Command registry and routing.
pub mod dispatcher;
/// One module per command.
pub mod handlers;

/// pipeforge: compiles task selections into pipeline override documents.
///
/// Usage: `pipeforge [--config FILE] <command> [args...]`
///
/// Commands:
/// - `compile <interface> <selection>`: print the merged override document.
/// - `plan <interface> <selection>`: print one override per enabled task.
/// - `list <interface>`: show the tasks and their option trees.
/// - `check <interface> <selection>`: validate inputs and references.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Settings file to use instead of the default location.
    #[arg(long, short)]
    pub config: Option<String>,

    /// The command to run. Lists the available commands when omitted.
    pub command: Option<String>,

    /// Arguments passed through to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
