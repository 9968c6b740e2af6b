//! HTTP transport seam
//!
//! The client never talks to the network itself. It builds an [`HttpRequest`] and
//! hands it to a [`Transport`], which returns the status and body text.

use crate::error::{ClientError, ClientResult};
use std::fmt;
use std::future::Future;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Method name as sent on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method
    pub method: Method,
    /// Absolute or base-relative URL
    pub url: String,
    /// Header name/value pairs in insertion order
    pub headers: Vec<(String, String)>,
    /// Body text
    pub body: Option<String>,
}

impl HttpRequest {
    /// `GET url`
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `POST url` with `body`
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// Append a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header called `name`, compared case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Response status and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Body text
    pub body: String,
}

impl HttpResponse {
    /// Response with `status` and `body`
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body of a 2xx response
    ///
    /// # Errors
    /// [`ClientError::Unauthorized`] for 401, [`ClientError::UnexpectedStatus`] for
    /// any other non-2xx status.
    pub fn into_success_body(self) -> ClientResult<String> {
        match self.status {
            200..=299 => Ok(self.body),
            401 => Err(ClientError::Unauthorized),
            status => Err(ClientError::UnexpectedStatus(status)),
        }
    }
}

/// Issues HTTP requests on behalf of the client
pub trait Transport {
    /// Send `request` and return the response, whatever its status
    ///
    /// # Errors
    /// [`ClientError::Transport`] when no response was received.
    fn send(&self, request: HttpRequest) -> impl Future<Output = ClientResult<HttpResponse>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(HttpResponse::new(204, "").into_success_body().unwrap(), "");
        assert!(matches!(
            HttpResponse::new(401, "nope").into_success_body(),
            Err(ClientError::Unauthorized)
        ));
        assert!(matches!(
            HttpResponse::new(500, "").into_success_body(),
            Err(ClientError::UnexpectedStatus(500))
        ));
        assert!(matches!(
            HttpResponse::new(302, "").into_success_body(),
            Err(ClientError::UnexpectedStatus(302))
        ));
    }

    #[test]
    fn debug_redacts_authorization() {
        let request = HttpRequest::get("/auth/status").with_header("Authorization", "Token abc");
        assert_eq!(request.header("authorization"), Some("Token abc"));
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("abc"));
        assert!(rendered.contains("<redacted>"));
    }
}
