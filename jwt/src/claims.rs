//! Registered JWT claims.
//!
//! A typed view over a payload. Nothing here is enforced during verification;
//! callers that care about expiry check it themselves with [`Claims::is_active_at`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// `aud` is either a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience.
    One(String),
    /// Several audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is listed.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// JWT claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiry (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Custom data.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl Claims {
    /// Start building claims.
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    /// `exp` as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.exp)
    }

    /// `nbf` as a timestamp.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        timestamp(self.nbf)
    }

    /// `iat` as a timestamp.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.iat)
    }

    /// Whether `exp` lies at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| now.timestamp() >= exp)
    }

    /// Not expired and past `nbf` at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && self.nbf.is_none_or(|nbf| now.timestamp() >= nbf)
    }

    /// Custom claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Builder for [`Claims`].
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims.sub = Some(sub.into());
        self
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.iss = Some(iss.into());
        self
    }

    /// Set the audience (aud) claim.
    #[must_use]
    pub fn audience(mut self, aud: Audience) -> Self {
        self.claims.aud = Some(aud);
        self
    }

    /// Set iat to `now` and exp to `now + ttl`.
    #[must_use]
    pub fn valid_for(mut self, now: DateTime<Utc>, ttl: Duration) -> Self {
        self.claims.iat = Some(now.timestamp());
        self.claims.exp = Some((now + ttl).timestamp());
        self
    }

    /// Set the not-before (nbf) claim.
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.claims.nbf = Some(nbf.timestamp());
        self
    }

    /// Set the JWT ID (jti) claim.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.claims.jti = Some(jti.into());
        self
    }

    /// Add custom data.
    #[must_use]
    pub fn custom(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.extra.insert(key.into(), value);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }
}
