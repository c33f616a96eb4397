// src/system/transport.rs

use crate::{
    constants::{
        API_COMMANDS_PATH, API_RELOAD_COMMANDS_PATH, API_RELOAD_CONFIG_PATH,
        API_SET_PASSWORD_PATH, API_TEST_AUTH_PATH, DEFAULT_CONFIGURATION_PATH, STATISTICS_FIELD,
    },
    core::pretty,
    models::{ApiResponse, CommandNode, CommandTree, Payload, ServerConfiguration},
};
use reqwest::{
    Method, StatusCode, Url,
    blocking::Client,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("Could not build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("The service rejected the session token (HTTP 401).")]
    Unauthorized,
    #[error("'{url}' answered HTTP {status}: {detail}")]
    Rejected {
        url: String,
        status: u16,
        detail: String,
    },
    #[error("Unexpected response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The operations the dashboard needs from the command service.
///
/// `strict` fetches fail on any rejection. Non-strict fetches tolerate one:
/// the tree comes back empty, the configuration falls back to its default and
/// the authentication check answers `false`.
pub trait Transport {
    fn test_authentication(&self, strict: bool) -> Result<bool, TransportError>;
    fn fetch_command_tree(&self, strict: bool) -> Result<CommandTree, TransportError>;
    fn fetch_configuration(&self, strict: bool) -> Result<ServerConfiguration, TransportError>;
    fn invoke(&self, path: &str, payload: &Payload) -> Result<ApiResponse, TransportError>;
    fn reload_configuration(&self) -> Result<ApiResponse, TransportError>;
    fn reload_commands(&self) -> Result<ApiResponse, TransportError>;
    fn set_password(&self, new_password: &str) -> Result<ApiResponse, TransportError>;
}

/// Body shape shared by every endpoint of the service.
#[derive(Deserialize, Debug, Default)]
struct ApiBody {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    reason: Option<Value>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    statistics: Option<Value>,
}

/// Turns a raw HTTP answer into an [`ApiResponse`]. A body that is not the
/// service's JSON envelope is shown verbatim as the result.
fn response_from_body(status: StatusCode, text: &str) -> ApiResponse {
    let message = status.canonical_reason().map(str::to_string);
    match serde_json::from_str::<ApiBody>(text) {
        Ok(body) => ApiResponse {
            ok: body.ok && status.is_success(),
            status: status.as_u16(),
            message,
            code: body.code,
            result: body.result.or(body.reason).unwrap_or(Value::Null),
            statistics: body.statistics,
        },
        Err(e) => {
            log::debug!("Response body is not an API envelope ({}), keeping it as text", e);
            ApiResponse {
                ok: status.is_success(),
                status: status.as_u16(),
                message,
                code: None,
                result: Value::String(text.to_string()),
                statistics: None,
            }
        }
    }
}

/// Reads the presentation document. The service envelope carries it in
/// `result`; a static file is the document itself.
fn configuration_from_body(
    url: &str,
    status: StatusCode,
    text: &str,
) -> Result<ServerConfiguration, TransportError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(TransportError::Unauthorized);
    }
    if !status.is_success() {
        return Err(TransportError::Rejected {
            url: url.to_string(),
            status: status.as_u16(),
            detail: text.trim().to_string(),
        });
    }
    let decode = |e| TransportError::Decode {
        url: url.to_string(),
        source: e,
    };
    let document = match serde_json::from_str::<Value>(text).map_err(decode)? {
        Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(document).map_err(decode)
}

#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    token: Option<String>,
    configuration_path: String,
    request_statistics: bool,
}

impl HttpTransport {
    /// `server_url` is the service root; endpoint paths are joined onto it.
    pub fn new(
        server_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut normalized = server_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|e| TransportError::InvalidUrl {
            url: server_url.to_string(),
            message: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;

        log::debug!("HTTP transport ready for {}", base);
        Ok(Self {
            client,
            base,
            token,
            configuration_path: DEFAULT_CONFIGURATION_PATH.to_string(),
            request_statistics: false,
        })
    }

    /// Where the presentation document is fetched from, relative to the base URL.
    pub fn with_configuration_path(mut self, path: impl Into<String>) -> Self {
        self.configuration_path = path.into();
        self
    }

    /// Asks the service to attach run statistics to every invocation result.
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.request_statistics = enabled;
        self
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl {
                url: format!("{}{}", self.base, path),
                message: e.to_string(),
            })
    }

    /// Performs one request and hands back the raw status and body text.
    fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(Url, StatusCode, String), TransportError> {
        let url = self.endpoint(path)?;
        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url.clone());
        if let Some(token) = &self.token {
            let header = HeaderValue::from_str(&format!("Basic {}", token)).map_err(|e| {
                TransportError::InvalidUrl {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            })?;
            request = request.header(AUTHORIZATION, header);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })?;
        let status = response.status();
        let text = response.text().map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })?;
        Ok((url, status, text))
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, TransportError> {
        let (url, status, text) = self.exchange(method, path, body)?;
        let api_response = response_from_body(status, &text);
        log::debug!("{} answered {} (ok: {})", url, status, api_response.ok);
        Ok(api_response)
    }

    /// GETs `path` and insists on a successful envelope.
    fn fetch_result(&self, path: &str) -> Result<Value, TransportError> {
        let response = self.send(Method::GET, path, None)?;
        if response.is_unauthorized() {
            return Err(TransportError::Unauthorized);
        }
        if !response.ok {
            return Err(TransportError::Rejected {
                url: self.endpoint(path)?.to_string(),
                status: response.status,
                detail: pretty::render(&response.result, 0).trim_end().to_string(),
            });
        }
        Ok(response.result)
    }

    /// The JSON body posted to a command's invocation path.
    fn invocation_body(&self, payload: &Payload) -> Value {
        let mut body = payload.clone();
        if self.request_statistics {
            if body.contains_key(STATISTICS_FIELD) {
                log::debug!(
                    "Command declares a '{}' option, not requesting statistics",
                    STATISTICS_FIELD
                );
            } else {
                body.insert(STATISTICS_FIELD.to_string(), Value::Bool(true));
            }
        }
        Value::Object(body)
    }

    /// Decodes the `result` of `api/commands` into the root mapping.
    fn tree_from_result(&self, result: Value) -> Result<CommandTree, TransportError> {
        let url = self.endpoint(API_COMMANDS_PATH)?.to_string();
        let root: CommandNode =
            serde_json::from_value(result).map_err(|e| TransportError::Decode { url, source: e })?;
        Ok(root.into_tree())
    }
}

impl Transport for HttpTransport {
    fn test_authentication(&self, strict: bool) -> Result<bool, TransportError> {
        match self.fetch_result(API_TEST_AUTH_PATH) {
            Ok(_) => Ok(true),
            Err(e) if !strict => {
                log::debug!("Authentication check failed: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn fetch_command_tree(&self, strict: bool) -> Result<CommandTree, TransportError> {
        let result = match self.fetch_result(API_COMMANDS_PATH) {
            Ok(result) => result,
            Err(e) if !strict => {
                log::warn!("Could not fetch commands, showing an empty menu: {}", e);
                return Ok(CommandTree::new());
            }
            Err(e) => return Err(e),
        };
        self.tree_from_result(result)
    }

    fn fetch_configuration(&self, strict: bool) -> Result<ServerConfiguration, TransportError> {
        let fetched = self
            .exchange(Method::GET, &self.configuration_path, None)
            .and_then(|(url, status, text)| {
                configuration_from_body(url.as_str(), status, &text)
            });
        match fetched {
            Ok(configuration) => Ok(configuration),
            Err(e) if !strict => {
                log::debug!("Using default configuration: {}", e);
                Ok(ServerConfiguration::default())
            }
            Err(e) => Err(e),
        }
    }

    fn invoke(&self, path: &str, payload: &Payload) -> Result<ApiResponse, TransportError> {
        self.send(Method::POST, path, Some(&self.invocation_body(payload)))
    }

    fn reload_configuration(&self) -> Result<ApiResponse, TransportError> {
        self.send(Method::GET, API_RELOAD_CONFIG_PATH, None)
    }

    fn reload_commands(&self) -> Result<ApiResponse, TransportError> {
        self.send(Method::GET, API_RELOAD_COMMANDS_PATH, None)
    }

    fn set_password(&self, new_password: &str) -> Result<ApiResponse, TransportError> {
        let body = json!({ "password": new_password });
        self.send(Method::POST, API_SET_PASSWORD_PATH, Some(&body))
    }
}
