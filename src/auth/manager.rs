use serde::Deserialize;

use super::TokenPayload;
use crate::config::ApiConfig;
use crate::error::{Credential, Error, Result};
use crate::http::{Method, Transport, TransportRequest, classify};
use crate::logging::Logger;

/// Successful body of the token endpoint: `{"data": {"access_token", "state"}}`.
#[derive(Deserialize)]
struct TokenEnvelope {
    data: TokenPayload,
}

/// Requests new access tokens from the auth endpoint.
pub struct AuthManager<'a, T: Transport> {
    transport: &'a T,
    logger: &'a Logger,
}

impl<'a, T: Transport> AuthManager<'a, T> {
    pub fn new(transport: &'a T, logger: &'a Logger) -> Self {
        Self { transport, logger }
    }

    /// Requests a new token using the configured username, password and client id.
    ///
    /// The token endpoint is called with HTTP errors suppressed so that an
    /// error body can be logged before the failure is returned as
    /// [`Error::Http`]. Applying and persisting the token is left to the caller.
    #[tracing::instrument(skip(self, config))]
    pub async fn refresh(&self, config: &ApiConfig) -> Result<TokenPayload> {
        let (username, password) = match check_credentials(config) {
            Ok(pair) => pair,
            Err(e) => {
                self.logger.error(e.to_string());
                return Err(e);
            }
        };

        self.logger.info("Requesting new access token...");
        self.logger.out(format!("URL: {}", config.auth_endpoint()));

        let request = TransportRequest::new(Method::Get, config.auth_endpoint())
            .query(vec![
                ("username".to_string(), username.to_string()),
                ("password".to_string(), password.to_string()),
            ])
            .raise_http_errors(false);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.error("Requesting access token has failed.");
                self.logger.error(e.to_string());
                return Err(e);
            }
        };

        if !response.is_success() {
            let body = response.text();
            self.logger.error("Requesting access token has failed.");
            for line in classify(response.status, &body).log_lines() {
                self.logger.error(line);
            }
            return Err(Error::Http {
                status: response.status,
                body,
            });
        }

        let envelope: TokenEnvelope = serde_json::from_slice(&response.body)
            .map_err(|e| Error::InvalidTokenResponse(e.to_string()))?;

        self.logger.info("Got new access token!");
        self.logger
            .info(format!("Token: {}", mask(&envelope.data.access_token)));

        Ok(envelope.data)
    }
}

/// Returns username and password, or the first missing credential in the
/// order username, password, client id.
fn check_credentials(config: &ApiConfig) -> Result<(&str, &str)> {
    let username = config
        .username()
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingCredential(Credential::Username))?;
    let password = config
        .password()
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingCredential(Credential::Password))?;
    config
        .client_id()
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingCredential(Credential::ClientId))?;
    Ok((username, password))
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
