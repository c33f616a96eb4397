// src/cli/handlers/password.rs

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        GlobalOptions, adapter,
        args::PasswordArgs,
        handlers::commons::{self, AppContext},
    },
    core::coordinator::{Action, Coordinator},
    system::{session_store::StoredSession, transport::Transport},
};

/// Changes the service password and re-keys the stored token.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let _password_args = PasswordArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    let transport = context.transport()?;

    let new_password = adapter::prompt_new_password()?;
    let mut coordinator = Coordinator::new();
    adapter::show_waiting();
    let display = commons::perform(&mut coordinator, Action::SetPassword, || {
        transport.set_password(&new_password)
    });
    adapter::show_display(display);

    if !display.succeeded() {
        return Err(anyhow!(t!("password.error.failed")));
    }
    remember_new_password(&context, &new_password)
}

/// The stored token embeds the password; keep it usable after a change.
pub fn remember_new_password(context: &AppContext, new_password: &str) -> Result<()> {
    let username = context.session()?.and_then(|session| session.username());
    if let Some(username) = username {
        context.store.save(&StoredSession::new(
            &context.settings.server_url,
            &username,
            new_password,
        ))?;
        log::debug!("Stored token updated for '{}'", username);
    }
    Ok(())
}
