//! Access token acquisition and persistence.
//!
//! Token flow:
//! 1. [`AuthManager::refresh`] requests a token with username/password
//! 2. The client applies the returned [`TokenPayload`] to its configuration
//! 3. If persistence is on, [`TokenStore::save`] mirrors it to disk
//! 4. A later client constructed without a token picks it up via [`TokenStore::load`]

mod manager;
mod store;

use serde::{Deserialize, Deserializer, Serialize};

pub use manager::AuthManager;
pub use store::TokenStore;

/// Token data returned by the auth endpoint and written to the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    /// Opaque nonce issued alongside the token.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
