// src/cli/handlers/tree.rs

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{GlobalOptions, adapter, args::TreeArgs, handlers::commons::AppContext},
    core::menu,
    system::transport::Transport,
};

/// Prints the compiled navigation as an ASCII tree.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    let tree = transport
        .fetch_command_tree(true)
        .with_context(|| t!("common.error.fetch_commands"))?;
    let navigation = menu::compile(&tree, 1);

    adapter::print_navigation(
        &navigation,
        tree_args.ids || context.settings.show_identifiers,
    );
    Ok(())
}
