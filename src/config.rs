//! Client configuration: loose input options, environment loading, and the
//! validated [`ApiConfig`].

use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::runtime::Runtime;

pub const DEFAULT_ENDPOINT: &str = "https://api.dhlglobalmail.com/v2";
pub const DEFAULT_AUTH_ENDPOINT: &str = "https://api.dhlglobalmail.com/v2/auth/access_token";

/// Suffix of the persisted token file name.
pub const AUTH_DATA_FILENAME: &str = "authData.json";

/// Directory name used under the platform data dir for persisted tokens.
const STORAGE_DIR_NAME: &str = "dhl-api";

/// Unvalidated configuration input. Every field is optional; defaults and
/// required-field checks are applied by [`ApiConfig::new`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub access_token: Option<String>,
    pub state: Option<String>,
    pub endpoint: Option<String>,
    pub auth_endpoint: Option<String>,
    pub scope: Option<String>,
    pub store_auth_data: Option<bool>,
    pub logger_prefix: Option<String>,
    pub storage_auth_data_prefix: Option<String>,
    pub storage_path: Option<PathBuf>,
}

impl ConfigOptions {
    /// Reads options from the process environment.
    ///
    /// Empty variables are treated as unset.
    #[tracing::instrument(skip(runtime))]
    pub fn from_env<R: Runtime>(runtime: &R) -> Self {
        let var = |key: &str| runtime.env_var(key).ok().filter(|v| !v.is_empty());

        let store_auth_data = var("STORE_AUTH_DATA").and_then(|v| parse_flag(&v));

        let options = Self {
            username: var("USERNAME"),
            password: var("PASSWORD"),
            client_id: var("CLIENT_ID"),
            access_token: var("ACCESS_TOKEN"),
            state: None,
            endpoint: var("API_ENDPOINT"),
            auth_endpoint: var("AUTH_ENDPOINT"),
            scope: var("SCOPE"),
            store_auth_data,
            logger_prefix: var("LOGGER_PREFIX"),
            storage_auth_data_prefix: var("STORAGE_AUTH_DATA_PREFIX"),
            storage_path: var("STORAGE_PATH").map(PathBuf::from),
        };

        debug!(
            "Loaded configuration from environment (client id set: {}, token set: {})",
            options.client_id.is_some(),
            options.access_token.is_some()
        );

        options
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validated client configuration.
///
/// `access_token` and `state` change whenever a token is refreshed; every
/// other field is fixed for the lifetime of the client unless changed
/// through a setter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    username: Option<String>,
    password: Option<String>,
    client_id: Option<String>,
    access_token: Option<String>,
    state: Option<String>,
    endpoint: String,
    auth_endpoint: String,
    scope: Option<String>,
    store_auth_data: bool,
    logger_prefix: Option<String>,
    storage_auth_data_prefix: Option<String>,
    storage_path: Option<PathBuf>,
}

impl ApiConfig {
    /// Validates `options` and applies defaults.
    ///
    /// Fails when there is no access token and any of client id, username or
    /// password is missing, or when the endpoint is explicitly empty.
    pub fn new(options: ConfigOptions) -> Result<Self> {
        let config = Self::with_defaults(options);
        config.validate()?;
        Ok(config)
    }

    /// Applies defaults without checking required fields.
    pub(crate) fn with_defaults(options: ConfigOptions) -> Self {
        Self {
            username: non_empty(options.username),
            password: non_empty(options.password),
            client_id: non_empty(options.client_id),
            access_token: non_empty(options.access_token),
            state: options.state,
            endpoint: options
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            auth_endpoint: non_empty(options.auth_endpoint)
                .unwrap_or_else(|| DEFAULT_AUTH_ENDPOINT.to_string()),
            scope: options.scope,
            store_auth_data: options.store_auth_data.unwrap_or(true),
            logger_prefix: non_empty(options.logger_prefix),
            storage_auth_data_prefix: non_empty(options.storage_auth_data_prefix),
            storage_path: options.storage_path,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.access_token.is_none()
            && (self.client_id.is_none() || self.username.is_none() || self.password.is_none())
        {
            return Err(Error::Configuration(
                "missing credentials: no access token provided, so client id, username, and password must be provided"
                    .to_string(),
            ));
        }

        if self.endpoint.trim().is_empty() {
            return Err(Error::Configuration("missing endpoint".to_string()));
        }

        Ok(())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn set_client_id(&mut self, client_id: impl Into<String>) {
        self.client_id = Some(client_id.into());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = Some(state.into());
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Base URL for API calls, e.g. a sandbox instead of production.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    pub fn auth_endpoint(&self) -> &str {
        &self.auth_endpoint
    }

    pub fn set_auth_endpoint(&mut self, auth_endpoint: impl Into<String>) {
        self.auth_endpoint = auth_endpoint.into();
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn set_scope(&mut self, scope: impl Into<String>) {
        self.scope = Some(scope.into());
    }

    pub fn should_persist(&self) -> bool {
        self.store_auth_data
    }

    pub fn set_should_persist(&mut self, persist: bool) {
        self.store_auth_data = persist;
    }

    /// Prefix prepended to every log message, e.g. `"[shop-1] "`.
    pub fn logger_prefix(&self) -> String {
        match &self.logger_prefix {
            Some(prefix) => format!("[{}] ", prefix),
            None => String::new(),
        }
    }

    pub fn set_logger_prefix(&mut self, prefix: impl Into<String>) {
        self.logger_prefix = non_empty(Some(prefix.into()));
    }

    pub fn storage_auth_data_prefix(&self) -> Option<&str> {
        self.storage_auth_data_prefix.as_deref()
    }

    pub fn set_storage_auth_data_prefix(&mut self, prefix: impl Into<String>) {
        self.storage_auth_data_prefix = non_empty(Some(prefix.into()));
    }

    /// Name of the token file, e.g. `shop-1-authData.json`. Clients sharing a
    /// storage directory need distinct prefixes.
    pub fn persistence_filename(&self) -> String {
        match &self.storage_auth_data_prefix {
            Some(prefix) => format!("{}-{}", prefix, AUTH_DATA_FILENAME),
            None => AUTH_DATA_FILENAME.to_string(),
        }
    }

    /// Explicitly configured storage root, if any.
    pub fn storage_path(&self) -> Option<&PathBuf> {
        self.storage_path.as_ref()
    }

    pub fn set_storage_path(&mut self, path: impl Into<PathBuf>) {
        self.storage_path = Some(path.into());
    }

    /// Storage root directory: the configured one, else the platform data
    /// dir, else `./storage`.
    pub fn storage_root<R: Runtime>(&self, runtime: &R) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        runtime
            .data_dir()
            .map(|dir| dir.join(STORAGE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("storage"))
    }

    /// Full path of the token file.
    pub fn persistence_path<R: Runtime>(&self, runtime: &R) -> PathBuf {
        self.storage_root(runtime).join(self.persistence_filename())
    }
}
