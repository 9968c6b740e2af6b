//! Bearer token persistence

use crate::error::ClientResult;
use arc_swap::ArcSwapOption;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque bearer token storage
pub trait TokenStore {
    /// Current token, if any
    ///
    /// # Errors
    /// Backend failures.
    fn get(&self) -> ClientResult<Option<String>>;

    /// Replace the token
    ///
    /// # Errors
    /// Backend failures.
    fn set(&self, token: &str) -> ClientResult<()>;

    /// Forget the token
    ///
    /// # Errors
    /// Backend failures.
    fn clear(&self) -> ClientResult<()>;
}

impl<S: TokenStore + ?Sized> TokenStore for Arc<S> {
    fn get(&self) -> ClientResult<Option<String>> {
        (**self).get()
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        (**self).set(token)
    }

    fn clear(&self) -> ClientResult<()> {
        (**self).clear()
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<String>,
}

impl MemoryTokenStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> ClientResult<Option<String>> {
        Ok(self.token.load_full().map(|token| token.as_ref().clone()))
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        self.token.store(Some(Arc::new(token.to_string())));
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.token.store(None);
        Ok(())
    }
}

/// Store backed by a JSON document of string entries, durable across restarts
///
/// Several keys may share one file; each store instance owns one key.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    /// Store the token under `key` in the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Store at the configured location and key
    #[must_use]
    pub fn from_config(config: &crate::ClientConfig) -> Self {
        Self::new(config.resolved_store_path(), config.token_key.clone())
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> ClientResult<Map<String, Value>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Map::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&staging)?;

        // a staging file left by an earlier run keeps its old mode
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = file.set_permissions(std::fs::Permissions::from_mode(0o600)) {
                warn!(path = %staging.display(), error = %e, "Failed to restrict token file permissions");
            }
        }

        file.write_all(&serde_json::to_vec_pretty(entries)?)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> ClientResult<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), key = %self.key, "stored token");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
            debug!(path = %self.path.display(), key = %self.key, "cleared token");
        }
        Ok(())
    }
}
