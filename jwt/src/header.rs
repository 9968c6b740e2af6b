//! JOSE header

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT header structure
///
/// Registered members are kept as raw JSON so any JSON object parses; the typed
/// accessors only see string values. Anything else lands in `extra` and survives a
/// serialize/deserialize cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<Value>,
    /// Media type of the complete token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<Value>,
    /// Media type of the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<Value>,
    /// Key identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<Value>,
    /// Unregistered members
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header naming `algorithm`
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            alg: Some(Value::from(algorithm.as_str())),
            ..Self::default()
        }
    }

    /// Header naming `algorithm` with `typ` set to `JWT`
    #[must_use]
    pub fn jwt(algorithm: Algorithm) -> Self {
        Self::new(algorithm).with_type("JWT")
    }

    /// Set `typ`
    #[must_use]
    pub fn with_type(mut self, typ: &str) -> Self {
        self.typ = Some(Value::from(typ));
        self
    }

    /// Set `cty`
    #[must_use]
    pub fn with_content_type(mut self, cty: &str) -> Self {
        self.cty = Some(Value::from(cty));
        self
    }

    /// Set `kid`
    #[must_use]
    pub fn with_key_id(mut self, kid: &str) -> Self {
        self.kid = Some(Value::from(kid));
        self
    }

    /// Add an unregistered member
    #[must_use]
    pub fn with_member(mut self, name: &str, value: Value) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// `alg` when it is a string
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.alg.as_ref().and_then(Value::as_str)
    }

    /// `typ` when it is a string
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.typ.as_ref().and_then(Value::as_str)
    }

    /// `cty` when it is a string
    #[must_use]
    pub fn cty(&self) -> Option<&str> {
        self.cty.as_ref().and_then(Value::as_str)
    }

    /// `kid` when it is a string
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_ref().and_then(Value::as_str)
    }

    /// The algorithm named by `alg`
    ///
    /// # Errors
    /// [`JwtError::UnknownAlgorithm`] unless `alg` is a string naming a known
    /// identifier.
    pub fn algorithm(&self) -> JwtResult<Algorithm> {
        match &self.alg {
            None | Some(Value::Null) => Err(JwtError::unknown_algorithm("(missing)")),
            Some(Value::String(alg)) => Algorithm::from_identifier(alg),
            Some(other) => Err(JwtError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Parse header JSON text
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] unless `json` is a JSON object.
    pub fn from_json(json: &[u8]) -> JwtResult<Self> {
        serde_json::from_slice(json)
            .map_err(|e| JwtError::MalformedToken(format!("header is not a JSON object: {e}")))
    }

    /// Serialize to compact JSON
    ///
    /// # Errors
    /// [`JwtError::Serialization`] if an extra member cannot be serialized.
    pub fn to_json(&self) -> JwtResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Algorithm> for Header {
    fn from(algorithm: Algorithm) -> Self {
        Header::new(algorithm)
    }
}
