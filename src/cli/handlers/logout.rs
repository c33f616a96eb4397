// src/cli/handlers/logout.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{GlobalOptions, args::LogoutArgs, handlers::commons::AppContext},
    system::session_store::SessionStore,
};

pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let _logout_args = LogoutArgs::try_parse_from(&args)?;
    let context = AppContext::load(options)?;
    end_session(&context.store)
}

/// Forgets the session token and points back to the entry action.
pub fn end_session(store: &SessionStore) -> Result<()> {
    if store.clear()? {
        println!("{}", t!("logout.success").green());
    } else {
        println!("{}", t!("logout.not_logged_in").dimmed());
    }
    println!("{}", t!("logout.hint"));
    Ok(())
}
