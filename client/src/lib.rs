//! Bearer-token authentication client
//!
//! An [`AuthClient`] talks to a REST authentication endpoint (`/auth/login`,
//! `/auth/status`, `/auth/logout` by default) through a caller-supplied
//! [`Transport`] and keeps the issued token in a [`TokenStore`]. Tokens are JWTs;
//! [`AuthClient::token_claims`] and [`AuthClient::verify_token`] hand them to
//! [`authlink_jwt`].

mod client;
mod config;
mod error;
pub mod store;
pub mod transport;

pub use client::{Account, AuthClient, LoginState};
pub use config::ClientConfig;
pub use error::*;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

pub use authlink_jwt;
