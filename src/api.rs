//! Authenticated request dispatch with a single token-refresh retry.

use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::auth::{AuthManager, TokenPayload, TokenStore};
use crate::config::{ApiConfig, ConfigOptions};
use crate::error::{Error, Result};
use crate::http::{
    ApiResponse, INVALID_TOKEN, Method, ReqwestTransport, Transport, TransportRequest, classify,
    error_code,
};
use crate::logging::{LogFacade, LogSink, Logger};
use crate::runtime::{RealRuntime, Runtime};

/// Position of a send within one logical call. A call gets at most one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Client for the DHL Global Mail API.
///
/// Every request carries `client_id` and `access_token` query parameters.
/// When the API rejects the token, the client requests a new one, stores
/// it, and retries the call once.
///
/// Calls take `&mut self` because a refresh rewrites the token, so a client
/// runs one logical call at a time.
pub struct Api<T: Transport = ReqwestTransport, R: Runtime = RealRuntime> {
    config: ApiConfig,
    transport: T,
    runtime: R,
    sink: Arc<dyn LogSink>,
}

impl Api<ReqwestTransport, RealRuntime> {
    /// Creates a client with the default HTTP client, file system and `log` output.
    pub fn new(options: ConfigOptions) -> Result<Self> {
        Self::with_parts(
            options,
            ReqwestTransport::with_default_client()?,
            RealRuntime,
            Arc::new(LogFacade),
        )
    }

    /// Creates a client configured from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ConfigOptions::from_env(&RealRuntime))
    }

    /// Loads `<dir>/.env` into the environment, then behaves like [`Api::from_env`].
    pub fn from_env_dir(dir: &Path) -> Result<Self> {
        if !RealRuntime.is_dir(dir) {
            return Err(Error::Configuration(format!(
                "the provided directory location does not exist at {}",
                dir.display()
            )));
        }
        dotenvy::from_path(dir.join(".env")).map_err(|e| {
            Error::Configuration(format!("failed to load {}: {}", dir.join(".env").display(), e))
        })?;
        Self::from_env()
    }
}

impl<T: Transport, R: Runtime> Api<T, R> {
    /// Creates a client from explicit collaborators.
    ///
    /// When persistence is on and no access token was given, a token stored
    /// by an earlier session is loaded before the configuration is validated.
    pub fn with_parts(
        options: ConfigOptions,
        transport: T,
        runtime: R,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        let mut api = Self {
            config: ApiConfig::with_defaults(options),
            transport,
            runtime,
            sink,
        };
        api.load_stored_token();
        api.config.validate()?;
        Ok(api)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ApiConfig {
        &mut self.config
    }

    /// Performs a GET request relative to the API endpoint.
    pub async fn get(&mut self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.dispatch(Method::Get, path, None, query).await
    }

    /// Performs a POST request with `body` sent as JSON.
    pub async fn post<B: Serialize + ?Sized>(
        &mut self,
        path: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::Post, path, Some(body), query).await
    }

    /// Performs a PUT request with `body` sent as JSON.
    pub async fn put<B: Serialize + ?Sized>(
        &mut self,
        path: &str,
        body: &B,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::Put, path, Some(body), query).await
    }

    /// Performs a DELETE request relative to the API endpoint.
    pub async fn delete(&mut self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.dispatch(Method::Delete, path, None, query).await
    }

    /// Sends a request, refreshing the token and retrying once if the API
    /// reports `INVALID_TOKEN` on a 400.
    ///
    /// A second `INVALID_TOKEN` ends the call with
    /// [`Error::UnauthorizedAfterRefresh`]. A failed refresh ends it with
    /// [`Error::TokenRefresh`]. Every other failure is returned unchanged.
    #[tracing::instrument(skip(self, body, query))]
    pub async fn dispatch(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let mut attempt = Attempt::First;

        loop {
            match self.send_once(method, path, body.clone(), query).await {
                Err(Error::Http {
                    status,
                    body: error_body,
                }) if is_invalid_token(status, &error_body) => {
                    let logger = self.logger();
                    match attempt {
                        Attempt::First => {
                            logger.info("Possibly expired token, trying to refresh token...");
                            self.refresh_access_token()
                                .await
                                .map_err(|e| Error::TokenRefresh {
                                    source: Box::new(e),
                                })?;
                            logger.info("Retrying request...");
                            attempt = Attempt::Retry;
                        }
                        Attempt::Retry => {
                            logger.error(
                                "The request was unauthorized and could not be fixed by refreshing access token.",
                            );
                            return Err(Error::UnauthorizedAfterRefresh {
                                source: Box::new(Error::Http {
                                    status,
                                    body: error_body,
                                }),
                            });
                        }
                    }
                }
                result => return result,
            }
        }
    }

    /// Requests a new access token, applies it to the configuration, and
    /// stores it if persistence is on.
    ///
    /// A failure to store the token is logged as a warning; the new token is
    /// still used.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_access_token(&mut self) -> Result<TokenPayload> {
        let logger = self.logger();
        let payload = AuthManager::new(&self.transport, &logger)
            .refresh(&self.config)
            .await?;

        self.config.set_access_token(payload.access_token.clone());
        self.config.set_state(payload.state.clone());

        if self.config.should_persist() {
            let store = self.token_store();
            if let Err(e) = store.save(&payload) {
                logger.warn(format!(
                    "Could not store access token at {}: {:#}",
                    store.path().display(),
                    e
                ));
            }
        }

        Ok(payload)
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let logger = self.logger();
        let url = join_url(self.config.endpoint(), path);

        logger.out(format!("URL: {}", url));

        let request = TransportRequest::new(method, url)
            .query(self.authenticated_query(query))
            .body(body);

        let failure = match self.transport.send(request).await {
            Ok(raw) if raw.is_success() => {
                logger.info("Request successful.");
                return Ok(ApiResponse::from_raw(raw));
            }
            Ok(raw) => Error::Http {
                status: raw.status,
                body: raw.text(),
            },
            Err(e) => e,
        };

        match &failure {
            Error::Connectivity(message) => {
                logger.error(format!("Error connecting to endpoint: {}", message));
            }
            Error::Http { status, body } => {
                logger.error(format!("Request failed with status code {}", status));
                for line in classify(*status, body).log_lines() {
                    logger.error(line);
                }
            }
            _ => {}
        }

        Err(failure)
    }

    /// Caller query followed by the auth parameters. Auth parameters replace
    /// any caller value with the same key.
    fn authenticated_query(&self, query: &[(&str, &str)]) -> Vec<(String, String)> {
        let auth = [
            ("client_id", self.config.client_id()),
            ("access_token", self.config.access_token()),
        ];

        let mut merged: Vec<(String, String)> = query
            .iter()
            .filter(|(key, _)| !auth.iter().any(|(auth_key, _)| auth_key == key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        merged.extend(
            auth.iter()
                .filter_map(|(k, v)| v.map(|v| (k.to_string(), v.to_string()))),
        );
        merged
    }

    fn load_stored_token(&mut self) {
        if !self.config.should_persist() || self.config.access_token().is_some() {
            return;
        }

        let logger = self.logger();
        let store = self.token_store();
        if !store.exists() {
            debug!("No stored token at {}", store.path().display());
            return;
        }

        match store.load() {
            Ok(Some(payload)) => {
                logger.info(format!(
                    "Got token from storage {}.",
                    store.path().display()
                ));
                self.config.set_access_token(payload.access_token);
                self.config.set_state(payload.state);
            }
            Ok(None) => logger.info("No usable data found in storage."),
            Err(e) => logger.warn(format!("Could not read stored token: {:#}", e)),
        }
    }

    fn token_store(&self) -> TokenStore<'_, R> {
        TokenStore::new(&self.runtime, self.config.persistence_path(&self.runtime))
    }

    fn logger(&self) -> Logger {
        Logger::new(self.config.logger_prefix(), self.sink.clone())
    }
}

fn is_invalid_token(status: u16, body: &str) -> bool {
    status == 400 && error_code(body).as_deref() == Some(INVALID_TOKEN)
}

/// Joins the endpoint and a relative path with exactly one slash.
fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockTransport, RawResponse};
    use crate::logging::testing::RecordingSink;
    use crate::runtime::MockRuntime;
    use log::Level;
    use mockall::Sequence;
    use std::path::PathBuf;

    const ENDPOINT: &str = "https://api.test/v2";
    const AUTH: &str = "https://api.test/v2/auth/access_token";
    const INVALID_TOKEN_BODY: &str =
        r#"{"meta":{"code":400,"error":[{"error_type":"INVALID_TOKEN","error_message":"expired"}]}}"#;

    fn options() -> ConfigOptions {
        ConfigOptions {
            username: Some("user".into()),
            password: Some("secret".into()),
            client_id: Some("42".into()),
            access_token: Some("old".into()),
            endpoint: Some(ENDPOINT.into()),
            auth_endpoint: Some(AUTH.into()),
            store_auth_data: Some(false),
            ..Default::default()
        }
    }

    fn json(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    fn invalid_token() -> Error {
        Error::Http {
            status: 400,
            body: INVALID_TOKEN_BODY.to_string(),
        }
    }

    fn token(access_token: &str) -> RawResponse {
        json(
            200,
            &format!(
                r#"{{"data":{{"access_token":"{}","state":"nonce"}}}}"#,
                access_token
            ),
        )
    }

    fn has_token(request: &TransportRequest, token: &str) -> bool {
        request
            .query
            .contains(&("access_token".to_string(), token.to_string()))
    }

    fn api(
        transport: MockTransport,
        runtime: MockRuntime,
    ) -> (Api<MockTransport, MockRuntime>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let api = Api::with_parts(options(), transport, runtime, sink.clone()).unwrap();
        (api, sink)
    }

    #[tokio::test]
    async fn test_get_success_sends_auth_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.method == Method::Get
                    && r.url == "https://api.test/v2/mailitems"
                    && r.raise_http_errors
                    && r.body.is_none()
                    && r.query
                        == vec![
                            ("page".to_string(), "2".to_string()),
                            ("client_id".to_string(), "42".to_string()),
                            ("access_token".to_string(), "old".to_string()),
                        ]
            })
            .times(1)
            .returning(|_| Ok(json(200, r#"{"data":[]}"#)));

        let (mut api, sink) = api(transport, MockRuntime::new());
        let response = api.get("mailitems", &[("page", "2")]).await.unwrap();

        assert_eq!(response, ApiResponse::Json(serde_json::json!({"data": []})));
        assert!(
            sink.messages(Level::Debug)
                .contains(&"URL: https://api.test/v2/mailitems".to_string())
        );
        assert!(
            sink.messages(Level::Info)
                .contains(&"Request successful.".to_string())
        );
    }

    #[tokio::test]
    async fn test_auth_params_override_caller_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.query
                    == vec![
                        ("q".to_string(), "x".to_string()),
                        ("client_id".to_string(), "42".to_string()),
                        ("access_token".to_string(), "old".to_string()),
                    ]
            })
            .times(1)
            .returning(|_| Ok(json(200, "{}")));

        let (mut api, _) = api(transport, MockRuntime::new());
        api.get(
            "/mailitems",
            &[("access_token", "spoofed"), ("q", "x"), ("client_id", "1")],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_config_mut_switches_endpoint_and_client_id() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.url == "https://sandbox.test/v2/mailitems"
                    && r.query
                        == vec![
                            ("client_id".to_string(), "77".to_string()),
                            ("access_token".to_string(), "old".to_string()),
                        ]
            })
            .times(1)
            .returning(|_| Ok(json(200, "{}")));

        let (mut api, _) = api(transport, MockRuntime::new());
        api.config_mut().set_endpoint("https://sandbox.test/v2");
        api.config_mut().set_client_id("77");
        api.get("mailitems", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_body() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::Post && r.body == Some(serde_json::json!({"weight": 2})))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json(201, r#"{"id":1}"#)));
        transport
            .expect_send()
            .withf(|r| r.method == Method::Put && r.url == "https://api.test/v2/mailitems/1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json(200, r#"{"id":1}"#)));
        transport
            .expect_send()
            .withf(|r| r.method == Method::Delete && r.body.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json(204, "")));

        let (mut api, _) = api(transport, MockRuntime::new());
        api.post("mailitems", &serde_json::json!({"weight": 2}), &[])
            .await
            .unwrap();
        api.put("mailitems/1", &serde_json::json!({"weight": 3}), &[])
            .await
            .unwrap();
        let deleted = api.delete("mailitems/1", &[]).await.unwrap();
        assert_eq!(deleted, ApiResponse::Text(String::new()));
    }

    #[tokio::test]
    async fn test_invalid_token_refreshes_and_retries_once() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .withf(|r| r.url.ends_with("/mailitems") && has_token(r, "old"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(invalid_token()));
        transport
            .expect_send()
            .withf(|r| r.url == AUTH && !r.raise_http_errors)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(token("new")));
        transport
            .expect_send()
            .withf(|r| r.url.ends_with("/mailitems") && has_token(r, "new"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json(200, r#"{"ok":true}"#)));

        let (mut api, sink) = api(transport, MockRuntime::new());
        let response = api.get("mailitems", &[]).await.unwrap();

        assert_eq!(response, ApiResponse::Json(serde_json::json!({"ok": true})));
        assert_eq!(api.config().access_token(), Some("new"));
        assert_eq!(api.config().state(), Some("nonce"));
        assert!(
            sink.messages(Level::Info)
                .contains(&"Retrying request...".to_string())
        );
    }

    #[tokio::test]
    async fn test_second_invalid_token_is_terminal() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.url.ends_with("/mailitems"))
            .times(2)
            .returning(|_| Err(invalid_token()));
        transport
            .expect_send()
            .withf(|r| r.url == AUTH)
            .times(1)
            .returning(|_| Ok(token("new")));

        let (mut api, _) = api(transport, MockRuntime::new());
        let err = api.get("mailitems", &[]).await.unwrap_err();

        match err {
            Error::UnauthorizedAfterRefresh { source } => {
                assert!(matches!(*source, Error::Http { status: 400, .. }));
            }
            other => panic!("Expected UnauthorizedAfterRefresh, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_failure_is_wrapped() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.url.ends_with("/mailitems"))
            .times(1)
            .returning(|_| Err(invalid_token()));
        transport
            .expect_send()
            .withf(|r| r.url == AUTH)
            .times(1)
            .returning(|_| Ok(json(401, r#"{"error":"invalid_grant","error_description":"bad creds"}"#)));

        let (mut api, _) = api(transport, MockRuntime::new());
        let err = api.get("mailitems", &[]).await.unwrap_err();

        match err {
            Error::TokenRefresh { source } => {
                assert!(matches!(*source, Error::Http { status: 401, .. }));
            }
            other => panic!("Expected TokenRefresh, got {:?}", other),
        }
        assert_eq!(api.config().access_token(), Some("old"));
    }

    #[tokio::test]
    async fn test_refresh_missing_credential_is_wrapped() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(invalid_token()));

        let sink = Arc::new(RecordingSink::default());
        let mut api = Api::with_parts(
            ConfigOptions {
                password: None,
                ..options()
            },
            transport,
            MockRuntime::new(),
            sink,
        )
        .unwrap();
        let err = api.get("mailitems", &[]).await.unwrap_err();

        match err {
            Error::TokenRefresh { source } => assert!(matches!(
                *source,
                Error::MissingCredential(crate::error::Credential::Password)
            )),
            other => panic!("Expected TokenRefresh, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_token_needs_status_400() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(Error::Http {
                status: 401,
                body: INVALID_TOKEN_BODY.to_string(),
            })
        });

        let (mut api, _) = api(transport, MockRuntime::new());
        let err = api.get("mailitems", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_other_http_errors_are_logged_and_returned() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(Error::Http {
                status: 422,
                body: r#"{"message":"Validation failed","validationErrors":{"email":"required"}}"#
                    .to_string(),
            })
        });

        let (mut api, sink) = api(transport, MockRuntime::new());
        let err = api
            .post("mailitems", &serde_json::json!({}), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { status: 422, .. }));
        let errors = sink.messages(Level::Error);
        assert_eq!(
            errors,
            vec![
                "Request failed with status code 422".to_string(),
                "Error: Validation failed".to_string(),
                "-- email: required".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_connectivity_error_is_not_retried() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(Error::Connectivity("connection refused".to_string())));

        let (mut api, sink) = api(transport, MockRuntime::new());
        let err = api.get("mailitems", &[]).await.unwrap_err();

        assert!(matches!(err, Error::Connectivity(_)));
        assert!(
            sink.messages(Level::Error)
                .contains(&"Error connecting to endpoint: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_persists_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(token("persisted")));

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_write()
            .withf(|path, contents| {
                path.starts_with("/srv/tokens")
                    && contents == br#"{"access_token":"persisted","state":"nonce"}"#
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime.expect_set_permissions().returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .withf(|_, to| to == Path::new("/srv/tokens/shop-authData.json"))
            .times(1)
            .returning(|_, _| Ok(()));

        let sink = Arc::new(RecordingSink::default());
        let mut api = Api::with_parts(
            ConfigOptions {
                store_auth_data: Some(true),
                storage_auth_data_prefix: Some("shop".into()),
                storage_path: Some(PathBuf::from("/srv/tokens")),
                ..options()
            },
            transport,
            runtime,
            sink,
        )
        .unwrap();

        let payload = api.refresh_access_token().await.unwrap();
        assert_eq!(payload.access_token, "persisted");
        assert_eq!(api.config().access_token(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_a_warning() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(invalid_token()));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(token("new")));
        transport
            .expect_send()
            .withf(|r| has_token(r, "new"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json(200, "{}")));

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("read-only file system")));

        let sink = Arc::new(RecordingSink::default());
        let mut api = Api::with_parts(
            ConfigOptions {
                store_auth_data: Some(true),
                storage_path: Some(PathBuf::from("/srv/tokens")),
                ..options()
            },
            transport,
            runtime,
            sink.clone(),
        )
        .unwrap();

        api.get("mailitems", &[]).await.unwrap();

        let warnings = sink.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("read-only file system"));
    }

    #[test]
    fn test_construction_loads_stored_token() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .withf(|path| path == Path::new("/srv/tokens/authData.json"))
            .returning(|_| Ok(r#"{"access_token":"from-disk","state":"s9"}"#.to_string()));

        let sink = Arc::new(RecordingSink::default());
        let api = Api::with_parts(
            ConfigOptions {
                endpoint: Some(ENDPOINT.into()),
                storage_path: Some(PathBuf::from("/srv/tokens")),
                logger_prefix: Some("disk".into()),
                ..Default::default()
            },
            MockTransport::new(),
            runtime,
            sink.clone(),
        )
        .unwrap();

        assert_eq!(api.config().access_token(), Some("from-disk"));
        assert_eq!(api.config().state(), Some("s9"));
        assert!(sink.messages(Level::Info)[0].starts_with("[disk] Got token from storage"));
    }

    #[test]
    fn test_construction_without_token_or_credentials_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let result = Api::with_parts(
            ConfigOptions {
                storage_path: Some(PathBuf::from("/srv/tokens")),
                ..Default::default()
            },
            MockTransport::new(),
            runtime,
            Arc::new(RecordingSink::default()),
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_construction_skips_storage_when_token_given() {
        // No runtime expectations: any file access would panic
        let result = Api::with_parts(
            ConfigOptions {
                store_auth_data: Some(true),
                ..options()
            },
            MockTransport::new(),
            MockRuntime::new(),
            Arc::new(RecordingSink::default()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.test/v2", "mailitems"), "https://a.test/v2/mailitems");
        assert_eq!(join_url("https://a.test/v2/", "/mailitems"), "https://a.test/v2/mailitems");
    }

    #[test]
    fn test_is_invalid_token() {
        assert!(is_invalid_token(400, INVALID_TOKEN_BODY));
        assert!(!is_invalid_token(400, r#"{"error":"INVALID_TOKEN"}"#));
        assert!(!is_invalid_token(500, INVALID_TOKEN_BODY));
    }
}
