use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Endpoint layout and storage location for an [`AuthClient`](crate::AuthClient)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix prepended to every endpoint path, e.g. `https://example.org/app`
    #[serde(default)]
    pub base_path: String,
    /// Login endpoint
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Session status endpoint
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Logout endpoint
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Scheme of the `Authorization` header carrying the bearer token
    #[serde(default = "default_token_scheme")]
    pub token_scheme: String,
    /// Key under which the token is persisted
    #[serde(default = "default_token_key")]
    pub token_key: String,
    /// File backing [`FileTokenStore`](crate::FileTokenStore); platform data dir when unset
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_status_path() -> String {
    "/auth/status".to_string()
}

fn default_logout_path() -> String {
    "/auth/logout".to_string()
}

fn default_token_scheme() -> String {
    "Token".to_string()
}

fn default_token_key() -> String {
    "token".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            login_path: default_login_path(),
            status_path: default_status_path(),
            logout_path: default_logout_path(),
            token_scheme: default_token_scheme(),
            token_key: default_token_key(),
            store_path: None,
        }
    }
}

impl ClientConfig {
    /// Parse JSON configuration; missing fields take their defaults
    ///
    /// # Errors
    /// [`ClientError::Config`] when the text is not a valid configuration object.
    pub fn from_json_str(json: &str) -> ClientResult<Self> {
        serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Read JSON configuration from `path`
    ///
    /// # Errors
    /// [`ClientError::Io`] when the file cannot be read, [`ClientError::Config`] when
    /// it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the endpoint prefix
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the token file
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set the `Authorization` scheme used for the bearer token
    #[must_use]
    pub fn with_token_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.token_scheme = scheme.into();
        self
    }

    /// `base_path` joined with an endpoint path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path.trim_end_matches('/'), path)
    }

    /// Token file, falling back to `<data dir>/authlink/storage.json`
    #[must_use]
    pub fn resolved_store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_path {
            return path.clone();
        }

        let data_dir = match dirs::data_local_dir() {
            Some(mut dir) => {
                dir.push("authlink");
                dir
            }
            None => {
                warn!("Could not determine OS data directory, using ./authlink");
                PathBuf::from("./authlink")
            }
        };
        data_dir.join("storage.json")
    }
}
