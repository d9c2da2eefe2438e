//! Error taxonomy for the DHL API client.

use std::fmt;

/// Credentials required to request a new access token, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Username,
    Password,
    ClientId,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Username => write!(f, "username"),
            Credential::Password => write!(f, "password"),
            Credential::ClientId => write!(f, "clientId"),
        }
    }
}

/// Errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client cannot be constructed from the given configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(
        "You are missing a credential necessary to retrieve an access token: {0}. \
         Please check your configuration or environmental variables."
    )]
    MissingCredential(Credential),

    /// The endpoint could not be reached. Never retried.
    #[error("error connecting to endpoint: {0}")]
    Connectivity(String),

    /// The endpoint answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Http { status: u16, body: String },

    /// The access token was refreshed but the retried call was still rejected.
    #[error(
        "the request was unauthorized and could not be fixed by refreshing the access token"
    )]
    UnauthorizedAfterRefresh {
        #[source]
        source: Box<Error>,
    },

    /// Refreshing an expired token failed while recovering a rejected call.
    #[error("refreshing the access token failed: {source}")]
    TokenRefresh {
        #[source]
        source: Box<Error>,
    },

    /// The token endpoint answered 2xx without a usable `data` object.
    #[error("invalid access token response: {0}")]
    InvalidTokenResponse(String),

    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of the failure, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::UnauthorizedAfterRefresh { source } | Error::TokenRefresh { source } => {
                source.status()
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
