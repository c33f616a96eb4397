// src/cli/handlers/login.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::{GlobalOptions, adapter, args::LoginArgs, handlers::commons::AppContext},
    system::{
        session_store::{SessionStore, StoredSession},
        transport::{Transport, TransportError},
    },
};

pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let login_args = LoginArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    login(&context, login_args.username)
}

/// Asks for credentials, checks them against the service and stores the token.
pub fn login(context: &AppContext, username: Option<String>) -> Result<()> {
    let (username, password) = adapter::prompt_credentials(username)?;
    let session = StoredSession::new(&context.settings.server_url, &username, &password);
    let transport = context.transport_with(Some(session.token.clone()))?;
    verify_and_store(&transport, &context.store, &session)?;

    println!(
        "{}",
        format!(
            t!("login.success"),
            username = username,
            server = context.settings.server_url
        )
        .green()
    );
    Ok(())
}

/// Saves `session` only if the service accepts it.
pub fn verify_and_store(
    transport: &dyn Transport,
    store: &SessionStore,
    session: &StoredSession,
) -> Result<()> {
    match transport.test_authentication(true) {
        Ok(true) => {
            store.save(session)?;
            log::info!("Session stored at {}", store.path().display());
            Ok(())
        }
        Ok(false) | Err(TransportError::Unauthorized) => Err(anyhow!(t!("login.error.rejected"))),
        Err(e) => Err(e).context(t!("common.error.unreachable")),
    }
}
