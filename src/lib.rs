//! Client for the DHL Global Mail v2 API.
//!
//! Handles access token acquisition, transparent token refresh with a single
//! retry, optional token persistence, and structured error extraction.
//!
//! ```rust,no_run
//! use dhl_api::{Api, ConfigOptions};
//!
//! # async fn run() -> dhl_api::Result<()> {
//! let mut api = Api::new(ConfigOptions {
//!     username: Some("user".into()),
//!     password: Some("secret".into()),
//!     client_id: Some("1234".into()),
//!     ..Default::default()
//! })?;
//!
//! let items = api.get("mailitems", &[("limit", "10")]).await?;
//! println!("{:?}", items.json());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod runtime;

pub use api::Api;
pub use auth::TokenPayload;
pub use config::{ApiConfig, ConfigOptions};
pub use error::{Credential, Error, Result};
pub use http::{ApiResponse, Method, NormalizedError, ValidationError};
pub use logging::{LogFacade, LogSink};
