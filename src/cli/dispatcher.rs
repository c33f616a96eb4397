use anyhow::{Result, anyhow};

use crate::cli::{Cli, GlobalOptions, handlers};

/// A system action, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &GlobalOptions) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "menu",
        aliases: &["dash"],
        handler: handlers::menu::handle,
    },
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
    CommandDefinition {
        name: "form",
        aliases: &["describe"],
        handler: handlers::form::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "login",
        aliases: &[],
        handler: handlers::login::handle,
    },
    CommandDefinition {
        name: "logout",
        aliases: &[],
        handler: handlers::logout::handle,
    },
    CommandDefinition {
        name: "password",
        aliases: &["passwd"],
        handler: handlers::password::handle,
    },
    CommandDefinition {
        name: "reload",
        aliases: &[],
        handler: handlers::reload::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the parsed command line to its handler. No action means `menu`.
pub fn dispatch(cli: Cli) -> Result<()> {
    log::debug!("Dispatching: {:?}", cli);

    let options = GlobalOptions { server: cli.server };
    let action = cli.action.unwrap_or_else(|| "menu".to_string());

    match find_command(&action) {
        Some(command) => (command.handler)(cli.args, &options),
        None => Err(anyhow!(format!(
            t!("cli.error.unknown_action"),
            action = action
        ))),
    }
}
