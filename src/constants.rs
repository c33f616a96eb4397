// src/constants.rs

/// The name of the client configuration directory (under the system config dir).
pub const APP_DIR: &str = "commander-dash";

/// The name of the client settings file (inside the configuration directory).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// The name of the file holding the client-held session token.
pub const SESSION_FILENAME: &str = "session.toml";

/// Server used when neither `config.toml` nor `--server` names one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:1995/";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// --- Service endpoints (relative to the server base URL) ---

pub const API_TEST_AUTH_PATH: &str = "api/testAuth";
pub const API_COMMANDS_PATH: &str = "api/commands";
pub const API_RELOAD_CONFIG_PATH: &str = "api/reload/config";
pub const API_RELOAD_COMMANDS_PATH: &str = "api/reload/commands";
pub const API_SET_PASSWORD_PATH: &str = "api/setPassword";

/// Presentation document (`service_name`, `footer`) the service publishes with its
/// static assets. Overridable through `configuration_path` in `config.toml`.
pub const DEFAULT_CONFIGURATION_PATH: &str = "static/config.json";

/// Body member that asks the service to report run statistics with the result.
pub const STATISTICS_FIELD: &str = "statistics";

/// HTTP status the service answers with when the session token is missing or stale.
pub const HTTP_UNAUTHORIZED: u16 = 401;

// --- Menu identifiers ---

/// Prefix for root-level triggers (`navbar-dropdown-1-3`).
pub const ROOT_TRIGGER_PREFIX: &str = "navbar-dropdown-";

/// Prefix for nested submenu triggers (`dropdown-submenu-2-1`).
pub const NESTED_TRIGGER_PREFIX: &str = "dropdown-submenu-";

/// Key of the synthetic entry appended after the last root command.
pub const SETTINGS_KEY: &str = "settings";

/// Line break emitted by the result pretty-printer.
pub const RESULT_LINE_BREAK: &str = "\r\n";

/// Separator used to address a command by its key path (`deploy/web/restart`).
pub const COMMAND_PATH_SEPARATOR: char = '/';
