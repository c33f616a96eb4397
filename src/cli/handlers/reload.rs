// src/cli/handlers/reload.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::{
        GlobalOptions, adapter,
        args::{ReloadArgs, ReloadTarget},
        handlers::commons::{self, AppContext},
    },
    core::{
        coordinator::{Action, Coordinator, DisplayRegion},
        menu,
    },
    system::transport::Transport,
};

/// Asks the service to reload its configuration or its command tree.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let reload_args = ReloadArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    let mut coordinator = Coordinator::new();
    adapter::show_waiting();
    let display = reload(&transport, &mut coordinator, reload_args.target);
    adapter::show_display(display);

    if !display.succeeded() {
        return Err(anyhow!(t!("reload.error.failed")));
    }

    if reload_args.target == ReloadTarget::Commands {
        let tree = transport
            .fetch_command_tree(true)
            .with_context(|| t!("common.error.fetch_commands"))?;
        let navigation = menu::compile(&tree, 1);
        println!(
            "{}",
            format!(
                t!("reload.commands_recompiled"),
                count = navigation.command_count()
            )
            .green()
        );
    }
    Ok(())
}

pub fn reload<'c>(
    transport: &dyn Transport,
    coordinator: &'c mut Coordinator,
    target: ReloadTarget,
) -> &'c DisplayRegion {
    match target {
        ReloadTarget::Config => commons::perform(coordinator, Action::ReloadConfiguration, || {
            transport.reload_configuration()
        }),
        ReloadTarget::Commands => commons::perform(coordinator, Action::ReloadCommands, || {
            transport.reload_commands()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::handlers::commons::fixtures::sample_tree, models::ApiResponse,
        system::transport::testing::FakeTransport,
    };
    use serde_json::json;

    #[test]
    fn test_reload_displays_service_answer() {
        let transport = FakeTransport::new(sample_tree()).replying(ApiResponse {
            ok: true,
            status: 200,
            message: Some("OK".into()),
            code: None,
            result: json!(true),
            statistics: None,
        });
        let mut coordinator = Coordinator::new();
        let display = reload(&transport, &mut coordinator, ReloadTarget::Commands);
        assert!(display.succeeded());
        assert_eq!(display.result.as_ref().unwrap().body, "True");
    }

    #[test]
    fn test_failed_reload_is_displayed() {
        let transport = FakeTransport::new(sample_tree()).replying(ApiResponse {
            ok: false,
            status: 500,
            message: Some("Internal Server Error".into()),
            code: Some(1006),
            result: json!("could not reload config"),
            statistics: None,
        });
        let mut coordinator = Coordinator::new();
        let display = reload(&transport, &mut coordinator, ReloadTarget::Config);
        assert!(!display.succeeded());
        assert_eq!(display.result.as_ref().unwrap().code, Some(1006));
    }
}
