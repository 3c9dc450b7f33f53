// src/cli/dispatcher.rs

use anyhow::{Result, bail};
use colored::Colorize;

use crate::{cli::handlers, core::settings::Settings};

/// A command, its aliases and the handler that receives the remaining arguments.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    about: &'static str,
    handler: fn(Vec<String>, &Settings) -> Result<()>,
}

/// Every command the binary understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "compile",
        aliases: &["c"],
        about: "Compile a selection into one pipeline override document.",
        handler: handlers::compile::handle,
    },
    CommandDefinition {
        name: "plan",
        aliases: &["p"],
        about: "Compile each enabled task into its own run-plan entry.",
        handler: handlers::plan::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls", "tree"],
        about: "List the tasks of an interface with their option trees.",
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &[],
        about: "Validate input values and report unresolved references.",
        handler: handlers::check::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn print_commands() {
    println!("{}", "Available commands:".yellow().bold());
    for cmd in COMMAND_REGISTRY {
        println!("  {:<10} {}", cmd.name.cyan(), cmd.about);
    }
}

/// Routes `command` to its handler.
pub fn dispatch(command: Option<String>, args: Vec<String>, settings: &Settings) -> Result<()> {
    log::debug!("Dispatching command {:?} with args {:?}", command, args);

    let Some(name) = command else {
        print_commands();
        return Ok(());
    };

    match find_command(&name) {
        Some(definition) => (definition.handler)(args, settings),
        None => {
            let names: Vec<&str> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
            bail!(
                "Unknown command '{}'. Available commands: {}",
                name,
                names.join(", ")
            )
        }
    }
}
