use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::TokenPayload;
use crate::runtime::Runtime;

/// Token file on local disk.
///
/// There is no locking: concurrent processes sharing a file name overwrite
/// each other and the last writer wins.
pub struct TokenStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> TokenStore<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.runtime.exists(&self.path)
    }

    /// Reads the stored token. Returns `Ok(None)` if the file is absent or
    /// does not hold a usable token.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<TokenPayload>> {
        if !self.exists() {
            debug!("No token file at {}", self.path.display());
            return Ok(None);
        }

        let contents = self.runtime.read_to_string(&self.path)?;
        match serde_json::from_str::<TokenPayload>(&contents) {
            Ok(payload) if !payload.access_token.is_empty() => Ok(Some(payload)),
            Ok(_) => Ok(None),
            Err(e) => {
                debug!("Token file {} is not usable: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    /// Writes the token, replacing any previous content.
    ///
    /// The JSON goes to a temp file in the same directory which is then
    /// renamed over the target, with mode 0600 on unix.
    #[tracing::instrument(skip(self, payload), fields(path = %self.path.display()))]
    pub fn save(&self, payload: &TokenPayload) -> Result<()> {
        let json = serde_json::to_string(payload).context("Failed to serialize token")?;

        let dir = self
            .path
            .parent()
            .context("Token path has no parent directory")?;
        if !dir.as_os_str().is_empty() && !self.runtime.exists(dir) {
            self.runtime.create_dir_all(dir)?;
        }

        let file_name = self
            .path
            .file_name()
            .context("Token path has no file name")?
            .to_string_lossy();
        let tmp_path = dir.join(format!(".{}.tmp.{}", file_name, std::process::id()));

        self.runtime.write(&tmp_path, json.as_bytes())?;
        if let Err(e) = self.replace_with(&tmp_path) {
            if let Err(cleanup) = self.runtime.remove_file(&tmp_path) {
                debug!("Could not remove {}: {:#}", tmp_path.display(), cleanup);
            }
            return Err(e);
        }

        debug!("Stored token at {}", self.path.display());
        Ok(())
    }

    fn replace_with(&self, tmp_path: &Path) -> Result<()> {
        self.runtime.set_permissions(tmp_path, 0o600)?;
        self.runtime
            .rename(tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }
}
