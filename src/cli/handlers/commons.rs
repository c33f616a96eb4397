// src/cli/handlers/commons.rs

// Shared plumbing for the action handlers.

use anyhow::{Context, Result, anyhow};

use crate::{
    cli::GlobalOptions,
    constants::COMMAND_PATH_SEPARATOR,
    core::{
        coordinator::{Action, Coordinator, DisplayRegion},
        form::{self, DecodeError},
        menu::CommandRef,
        settings::Settings,
    },
    models::{ApiResponse, CommandTree, Submission, find_leaf},
    system::{
        session_store::{SessionStore, StoredSession},
        transport::{HttpTransport, Transport, TransportError},
    },
};

/// Settings and session store, resolved once per invocation.
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    pub store: SessionStore,
}

impl AppContext {
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let settings = Settings::load()?.with_server_override(options.server.clone());
        let store = SessionStore::new(settings.session_path()?);
        Ok(Self { settings, store })
    }

    /// The stored session, if it was issued for the configured server.
    pub fn session(&self) -> Result<Option<StoredSession>> {
        let session = self.store.load()?;
        Ok(session.filter(|s| {
            let matches = s.belongs_to(&self.settings.server_url);
            if !matches {
                log::debug!(
                    "Ignoring session for '{}' (configured server is '{}')",
                    s.server_url,
                    self.settings.server_url
                );
            }
            matches
        }))
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        let token = self.session()?.map(|s| s.token);
        self.transport_with(token)
    }

    pub fn transport_with(&self, token: Option<String>) -> Result<HttpTransport> {
        let transport =
            HttpTransport::new(&self.settings.server_url, token, self.settings.timeout())
                .with_context(|| t!("common.error.transport_setup"))?;
        Ok(transport
            .with_configuration_path(self.settings.configuration_path.clone())
            .with_statistics(self.settings.request_statistics))
    }
}

/// Looks up a command by its `/`-joined key path.
pub fn resolve_command(tree: &CommandTree, path: &str) -> Result<CommandRef> {
    let leaf = find_leaf(tree, path).ok_or_else(|| {
        anyhow!(format!(t!("common.error.command_not_found"), path = path))
    })?;
    Ok(CommandRef {
        key_path: path
            .split(COMMAND_PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        info: leaf.info.clone(),
        invocation_path: leaf.invocation_path.clone(),
    })
}

/// Runs one coordinator cycle around `call`. A request that never produced an
/// HTTP answer is displayed as a status-0 failure.
pub fn perform<'c>(
    coordinator: &'c mut Coordinator,
    action: Action,
    call: impl FnOnce() -> Result<ApiResponse, TransportError>,
) -> &'c DisplayRegion {
    coordinator.begin(action);
    let response = match call() {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Request failed: {}", e);
            ApiResponse::transport_failure(e.to_string())
        }
    };
    coordinator.complete(&response)
}

/// Decodes `submission` against the command's schema and invokes it. A decode
/// failure sends nothing and leaves the coordinator untouched.
pub fn submit_command<'c>(
    transport: &dyn Transport,
    coordinator: &'c mut Coordinator,
    command: &CommandRef,
    submission: &Submission,
) -> Result<&'c DisplayRegion, DecodeError> {
    let payload = form::decode(submission, &command.info.options)?;
    let path = command.invocation_path.clone();
    Ok(perform(coordinator, Action::Submit { path: path.clone() }, || {
        transport.invoke(&path, &payload)
    }))
}
