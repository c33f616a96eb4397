// src/cli/handlers/menu.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use crate::{
    cli::{
        GlobalOptions,
        adapter::{self, Selection, SettingsChoice},
        args::MenuArgs,
        handlers::{
            commons::{self, AppContext},
            login, logout, password,
        },
    },
    core::{
        coordinator::{Action, Coordinator},
        form,
        menu::{self, CommandRef, NavFragment},
    },
    models::{CommandTree, ServerConfiguration},
    system::transport::{HttpTransport, Transport, TransportError},
};

/// The interactive dashboard: auth gate, navigation, forms, results, Settings.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let _menu_args = MenuArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    if !passes_auth_gate(&transport)? {
        println!(
            "{}",
            format!(
                t!("menu.login_required"),
                server = context.settings.server_url
            )
            .yellow()
        );
        return Ok(());
    }

    let configuration = transport.fetch_configuration(false)?;
    let tree = transport
        .fetch_command_tree(true)
        .with_context(|| t!("common.error.fetch_commands"))?;

    let mut dashboard = Dashboard {
        context: &context,
        transport,
        navigation: menu::compile(&tree, 1),
        tree,
        configuration,
        coordinator: Coordinator::new(),
    };
    dashboard.run()
}

/// Initial entry check. `Ok(false)` sends the user to `cdash login`; only a
/// failure other than a rejected token is an error.
pub fn passes_auth_gate(transport: &dyn Transport) -> Result<bool> {
    match transport.test_authentication(true) {
        Ok(authenticated) => Ok(authenticated),
        Err(TransportError::Unauthorized) => Ok(false),
        Err(e) => Err(e).context(t!("common.error.unreachable")),
    }
}

enum Flow {
    Continue,
    Exit,
}

struct Dashboard<'a> {
    context: &'a AppContext,
    transport: HttpTransport,
    tree: CommandTree,
    navigation: NavFragment,
    configuration: ServerConfiguration,
    coordinator: Coordinator,
}

impl Dashboard<'_> {
    fn run(&mut self) -> Result<()> {
        log::debug!(
            "Dashboard ready with {} command(s)",
            self.navigation.command_count()
        );
        loop {
            adapter::print_header(&self.configuration);
            let flow = match adapter::navigate(&self.navigation)? {
                Selection::Quit => Flow::Exit,
                Selection::Command(command) => self.open_command(&command)?,
                Selection::Settings => self.settings()?,
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        adapter::print_footer(&self.configuration);
        Ok(())
    }

    fn open_command(&mut self, command: &CommandRef) -> Result<Flow> {
        self.coordinator.select();
        let form = form::synthesize(&command.info.options, &command.invocation_path);
        adapter::print_command_header(command);

        let Some(submission) = adapter::prompt_form(&form)? else {
            println!("{}", t!("form.cancelled").dimmed());
            return Ok(Flow::Continue);
        };

        let issues = form.check_submission(&submission);
        if !issues.is_empty() {
            for issue in issues {
                println!("  {}", issue.to_string().red());
            }
            return Ok(Flow::Continue);
        }

        adapter::show_waiting();
        match commons::submit_command(&self.transport, &mut self.coordinator, command, &submission)
        {
            Ok(display) => adapter::show_display(display),
            Err(e) => println!("{}: {}", "Error".red().bold(), e),
        }
        Ok(Flow::Continue)
    }

    fn settings(&mut self) -> Result<Flow> {
        let Some(choice) = adapter::choose_setting(self.coordinator.session_control())? else {
            return Ok(Flow::Continue);
        };

        match choice {
            SettingsChoice::ChangePassword => {
                let new_password = adapter::prompt_new_password()?;
                adapter::show_waiting();
                let transport = &self.transport;
                let display = commons::perform(&mut self.coordinator, Action::SetPassword, || {
                    transport.set_password(&new_password)
                });
                adapter::show_display(display);
                if display.succeeded() {
                    password::remember_new_password(self.context, &new_password)?;
                    self.transport = self.context.transport()?;
                }
            }
            SettingsChoice::ReloadConfiguration => {
                adapter::show_waiting();
                let transport = &self.transport;
                let display =
                    commons::perform(&mut self.coordinator, Action::ReloadConfiguration, || {
                        transport.reload_configuration()
                    });
                adapter::show_display(display);
                if display.succeeded() {
                    self.configuration = self.transport.fetch_configuration(false)?;
                }
            }
            SettingsChoice::ReloadCommands => {
                adapter::show_waiting();
                let transport = &self.transport;
                let display = commons::perform(&mut self.coordinator, Action::ReloadCommands, || {
                    transport.reload_commands()
                });
                adapter::show_display(display);
                if display.succeeded() {
                    self.tree = self
                        .transport
                        .fetch_command_tree(true)
                        .with_context(|| t!("common.error.fetch_commands"))?;
                    self.navigation = menu::compile(&self.tree, 1);
                    println!(
                        "{}",
                        format!(
                            t!("reload.commands_recompiled"),
                            count = self.navigation.command_count()
                        )
                        .green()
                    );
                }
            }
            SettingsChoice::Logout => {
                logout::end_session(&self.context.store)?;
                return Ok(Flow::Exit);
            }
            SettingsChoice::Login => {
                login::login(self.context, None)?;
                self.transport = self.context.transport()?;
                self.coordinator = Coordinator::new();
            }
        }
        Ok(Flow::Continue)
    }
}
