// src/cli/handlers/form.rs

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        GlobalOptions, adapter,
        args::FormArgs,
        handlers::commons::{self, AppContext},
    },
    core::form,
    system::transport::Transport,
};

/// Shows the widgets synthesized for one command.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let form_args = FormArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    let tree = transport
        .fetch_command_tree(true)
        .with_context(|| t!("common.error.fetch_commands"))?;
    let command = commons::resolve_command(&tree, &form_args.command)?;
    let descriptor = form::synthesize(&command.info.options, &command.invocation_path);

    adapter::print_command_header(&command);
    adapter::print_form(&descriptor);
    Ok(())
}
