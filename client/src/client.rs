//! Authentication client context
//!
//! [`AuthClient`] owns everything a session needs: endpoint configuration, the
//! transport, the token store and the last known login state. Nothing is global.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::store::{FileTokenStore, TokenStore};
use crate::transport::{HttpRequest, Transport};
use authlink_jwt::KeyMaterial;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Member of the login response holding the bearer token
const TOKEN_MEMBER: &str = "authctoken";

/// Session state as last reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    /// No status, login or logout call has settled the question yet
    #[default]
    Unknown,
    /// The server accepted the session
    LoggedIn,
    /// The server rejected the session or confirmed a logout
    LoggedOut,
}

/// Account document returned by the login and status endpoints
#[derive(Clone, PartialEq)]
pub struct Account {
    fields: Map<String, Value>,
}

impl Account {
    /// Account from a response body; empty bodies and `null` carry no account
    ///
    /// # Errors
    /// [`ClientError::Json`] when the body is not JSON, [`ClientError::InvalidResponse`]
    /// when it is JSON but not an object.
    pub fn from_response(body: &str) -> ClientResult<Option<Self>> {
        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(body)? {
            Value::Null => Ok(None),
            Value::Object(fields) => Ok(Some(Self { fields })),
            other => Err(ClientError::InvalidResponse(format!(
                "expected an account object, got {other}"
            ))),
        }
    }

    /// Bearer token issued with this account
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.fields.get(TOKEN_MEMBER).and_then(Value::as_str)
    }

    /// Member by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All members
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        f.debug_struct("Account").field("members", &names).finish()
    }
}

/// Client context for one authentication endpoint
pub struct AuthClient<T, S> {
    config: ClientConfig,
    transport: T,
    store: S,
    state: LoginState,
    account: Option<Account>,
}

impl<T: Transport> AuthClient<T, FileTokenStore> {
    /// Client persisting its token at the configured file location
    #[must_use]
    pub fn with_file_store(config: ClientConfig, transport: T) -> Self {
        let store = FileTokenStore::from_config(&config);
        Self::new(config, transport, store)
    }
}

impl<T: Transport, S: TokenStore> AuthClient<T, S> {
    /// Client with explicit collaborators
    #[must_use]
    pub fn new(config: ClientConfig, transport: T, store: S) -> Self {
        Self {
            config,
            transport,
            store,
            state: LoginState::Unknown,
            account: None,
        }
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Token store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last known session state
    #[must_use]
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Whether the last call left the session logged in
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state == LoginState::LoggedIn
    }

    /// Account from the last successful login or status call
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// Current bearer token
    ///
    /// # Errors
    /// Token store failures.
    pub fn token(&self) -> ClientResult<Option<String>> {
        self.store.get()
    }

    fn authorized(&self, request: HttpRequest) -> ClientResult<HttpRequest> {
        Ok(match self.store.get()? {
            Some(token) => request.with_header(
                "Authorization",
                format!("{} {token}", self.config.token_scheme),
            ),
            None => request,
        })
    }

    /// Ask the server whether the stored token still represents a session
    ///
    /// A 2xx response carrying an account logs the session in; a 2xx response
    /// without one leaves the state as it was; 401 logs it out.
    ///
    /// # Errors
    /// Transport and store failures, [`ClientError::UnexpectedStatus`], or a body
    /// that is not an account.
    pub async fn status(&mut self) -> ClientResult<LoginState> {
        let request = self.authorized(HttpRequest::get(self.config.url(&self.config.status_path)))?;
        debug!(url = %request.url, "requesting session status");

        match self.transport.send(request).await?.into_success_body() {
            Ok(body) => {
                if let Some(account) = Account::from_response(&body)? {
                    self.state = LoginState::LoggedIn;
                    self.account = Some(account);
                    info!("session is logged in");
                }
            }
            Err(ClientError::Unauthorized) => {
                warn!("session status rejected as unauthorized");
                self.state = LoginState::LoggedOut;
                self.account = None;
            }
            Err(e) => return Err(e),
        }

        Ok(self.state)
    }

    /// Log in with HTTP Basic credentials and store the issued token
    ///
    /// # Errors
    /// - [`ClientError::Unauthorized`] when the credentials are rejected
    /// - [`ClientError::MissingToken`] when the account carries no token
    /// - transport, store and response-format failures
    pub async fn login(&mut self, username: &str, password: &SecretString) -> ClientResult<&Account> {
        let credentials = Zeroizing::new(format!("{username}:{}", password.expose_secret()));
        let authorization = Zeroizing::new(format!("Basic {}", STANDARD.encode(credentials.as_bytes())));

        let request = HttpRequest::post(self.config.url(&self.config.login_path), "{}")
            .with_header("Authorization", authorization.as_str());
        debug!(url = %request.url, "requesting login");

        let body = match self.transport.send(request).await?.into_success_body() {
            Ok(body) => body,
            Err(ClientError::Unauthorized) => {
                warn!(username, "login rejected as unauthorized");
                return Err(ClientError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        let account = Account::from_response(&body)?
            .ok_or_else(|| ClientError::InvalidResponse("login returned no account".to_string()))?;
        let token = account.auth_token().ok_or(ClientError::MissingToken)?;
        self.store.set(token)?;

        self.state = LoginState::LoggedIn;
        info!(username, "logged in");
        Ok(self.account.insert(account))
    }

    /// End the session; the token is cleared only when the server confirms
    ///
    /// Returns whether the server confirmed the logout.
    ///
    /// # Errors
    /// Transport and store failures, [`ClientError::Unauthorized`] and
    /// [`ClientError::UnexpectedStatus`].
    pub async fn logout(&mut self) -> ClientResult<bool> {
        let request = self.authorized(HttpRequest::get(self.config.url(&self.config.logout_path)))?;
        debug!(url = %request.url, "requesting logout");

        let body = self.transport.send(request).await?.into_success_body()?;
        let confirmed = matches!(serde_json::from_str::<Value>(body.trim()), Ok(Value::Bool(true)));
        if !confirmed {
            debug!("logout not confirmed by server");
            return Ok(false);
        }

        self.store.clear()?;
        self.state = LoginState::LoggedOut;
        self.account = None;
        info!("logged out");
        Ok(true)
    }

    /// Payload of the stored token, without checking its signature
    ///
    /// # Errors
    /// Store failures, or a stored token that does not parse into `C`.
    pub fn token_claims<C: DeserializeOwned>(&self) -> ClientResult<Option<C>> {
        let Some(token) = self.store.get()? else {
            return Ok(None);
        };
        let token = authlink_jwt::parse(&token)?;
        Ok(Some(token.claims()?))
    }

    /// Check the stored token's signature
    ///
    /// # Errors
    /// [`ClientError::MissingToken`] when nothing is stored, otherwise the JWT
    /// errors of [`authlink_jwt::Token::verify`].
    pub fn verify_token(&self, key: KeyMaterial<'_>) -> ClientResult<bool> {
        let token = self.store.get()?.ok_or(ClientError::MissingToken)?;
        Ok(authlink_jwt::parse(&token)?.verify(key)?)
    }
}

impl<T, S> fmt::Debug for AuthClient<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}
