//! Compact serialization
//!
//! [`UnsignedToken`] holds a header and payload waiting for a key; signing it yields
//! a [`Token`]. Parsing compact text also yields a [`Token`]. A `Token` keeps the
//! segments exactly as they were encoded, and verification always runs over those
//! original segments rather than a re-serialization of the decoded header.

use crate::algorithm::{Algorithm, AlgorithmBinding};
use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::header::Header;
use crate::keys::KeyMaterial;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Header and payload that have not been signed yet
#[derive(Debug, Clone)]
pub struct UnsignedToken {
    header: Header,
    header_json: String,
    payload: Vec<u8>,
}

impl UnsignedToken {
    /// Token from a header value and raw payload bytes
    ///
    /// # Errors
    /// [`JwtError::Serialization`] if the header cannot be serialized.
    pub fn new(header: Header, payload: impl Into<Vec<u8>>) -> JwtResult<Self> {
        let header_json = header.to_json()?;
        Ok(Self {
            header,
            header_json,
            payload: payload.into(),
        })
    }

    /// Token from header JSON text, which is encoded verbatim
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] unless `header_json` is a JSON object.
    pub fn from_json(header_json: impl Into<String>, payload: impl Into<Vec<u8>>) -> JwtResult<Self> {
        let header_json = header_json.into();
        let header = Header::from_json(header_json.as_bytes())?;
        Ok(Self {
            header,
            header_json,
            payload: payload.into(),
        })
    }

    /// Token whose payload is `claims` serialized as JSON
    ///
    /// # Errors
    /// [`JwtError::Serialization`] if the header or claims cannot be serialized.
    pub fn with_claims<C: Serialize>(header: Header, claims: &C) -> JwtResult<Self> {
        let payload = serde_json::to_vec(claims)?;
        Self::new(header, payload)
    }

    /// Header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Header JSON text that will be encoded
    #[must_use]
    pub fn header_json(&self) -> &str {
        &self.header_json
    }

    /// Raw payload
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// `base64url(header) "." base64url(payload)`
    #[must_use]
    pub fn signing_input(&self) -> String {
        format!(
            "{}.{}",
            codec::encode_str(&self.header_json),
            codec::encode(&self.payload)
        )
    }

    /// Sign with the algorithm named in the header
    ///
    /// # Errors
    /// - [`JwtError::UnknownAlgorithm`] / [`JwtError::NotImplemented`] from the registry,
    ///   including a header whose `alg` is missing or not a string
    /// - [`JwtError::InvalidKey`] / [`JwtError::Crypto`] from the provider
    pub fn sign(&self, key: KeyMaterial<'_>) -> JwtResult<Token> {
        let algorithm = self.header.algorithm()?;
        let mut binding = AlgorithmBinding::new(algorithm, key)?;

        let header_segment = codec::encode_str(&self.header_json);
        let payload_segment = codec::encode(&self.payload);
        binding.update(&header_segment);
        binding.update(".");
        binding.update(&payload_segment);
        let signature = binding.finalize().sign()?;

        debug!(algorithm = %algorithm, "signed token");
        Ok(Token {
            header: self.header.clone(),
            header_segment,
            payload_segment,
            signature_segment: codec::encode(signature),
        })
    }

    /// Sign and render as compact text
    ///
    /// # Errors
    /// See [`UnsignedToken::sign`].
    pub fn serialize(&self, key: KeyMaterial<'_>) -> JwtResult<String> {
        Ok(self.sign(key)?.to_string())
    }
}

/// A signed or parsed token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    header: Header,
    header_segment: String,
    payload_segment: String,
    signature_segment: String,
}

/// Parse compact text into a [`Token`]
///
/// # Errors
/// [`JwtError::MalformedToken`] unless `compact` has exactly three dot-separated
/// segments and the first one decodes to a JSON object.
pub fn parse(compact: &str) -> JwtResult<Token> {
    let parts: Vec<&str> = compact.split('.').collect();
    let [header_segment, payload_segment, signature_segment] = parts.as_slice() else {
        return Err(JwtError::MalformedToken(format!(
            "must have three parts, found {}",
            parts.len()
        )));
    };

    let header = Header::from_json(&codec::decode(header_segment)?)?;
    trace!(alg = ?header.alg(), "parsed token header");

    Ok(Token {
        header,
        header_segment: (*header_segment).to_string(),
        payload_segment: (*payload_segment).to_string(),
        signature_segment: (*signature_segment).to_string(),
    })
}

impl Token {
    /// Parse compact text
    ///
    /// # Errors
    /// See [`parse`].
    pub fn parse(compact: &str) -> JwtResult<Self> {
        parse(compact)
    }

    /// Decoded header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Algorithm named in the header
    ///
    /// # Errors
    /// See [`Header::algorithm`].
    pub fn algorithm(&self) -> JwtResult<Algorithm> {
        self.header.algorithm()
    }

    /// First segment as encoded
    #[must_use]
    pub fn header_segment(&self) -> &str {
        &self.header_segment
    }

    /// Second segment as encoded
    #[must_use]
    pub fn payload_segment(&self) -> &str {
        &self.payload_segment
    }

    /// Third segment as encoded
    #[must_use]
    pub fn signature_segment(&self) -> &str {
        &self.signature_segment
    }

    /// The original `header "." payload` text
    #[must_use]
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header_segment, self.payload_segment)
    }

    /// Decoded payload bytes
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] if the segment is not base64url.
    pub fn payload(&self) -> JwtResult<Vec<u8>> {
        codec::decode(&self.payload_segment)
    }

    /// Decoded payload text
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] if the segment is not base64url or not UTF-8.
    pub fn payload_str(&self) -> JwtResult<String> {
        codec::decode_to_string(&self.payload_segment)
    }

    /// Payload deserialized as JSON
    ///
    /// The signature is not checked; call [`Token::verify`] first when it matters.
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] for bad base64url, [`JwtError::Serialization`]
    /// when the JSON does not fit `C`.
    pub fn claims<C: DeserializeOwned>(&self) -> JwtResult<C> {
        Ok(serde_json::from_slice(&self.payload()?)?)
    }

    /// Decoded signature bytes
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] if the segment is not base64url.
    pub fn signature(&self) -> JwtResult<Vec<u8>> {
        codec::decode(&self.signature_segment)
    }

    /// Signature as lowercase hex
    ///
    /// # Errors
    /// [`JwtError::MalformedToken`] if the segment is not base64url.
    pub fn signature_hex(&self) -> JwtResult<String> {
        codec::to_hex(&self.signature_segment)
    }

    /// Check the signature with the algorithm named in the header
    ///
    /// A signature that does not match is `Ok(false)`.
    ///
    /// # Errors
    /// - [`JwtError::MalformedToken`] when the signature segment is not base64url
    /// - [`JwtError::UnknownAlgorithm`] / [`JwtError::NotImplemented`] from the registry,
    ///   including a header whose `alg` is missing or not a string
    /// - [`JwtError::InvalidKey`] when the key does not fit
    pub fn verify(&self, key: KeyMaterial<'_>) -> JwtResult<bool> {
        let algorithm = self.header.algorithm()?;
        let mut binding = AlgorithmBinding::new(algorithm, key)?;
        binding.update(self.signing_input());
        let binding = binding.finalize();

        let signature = self.signature()?;
        let valid = binding.verify(&signature)?;
        debug!(algorithm = %algorithm, valid, "verified token signature");
        Ok(valid)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.header_segment, self.payload_segment, self.signature_segment
        )
    }
}

impl FromStr for Token {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JwtErrorKind;

    const SECRET: KeyMaterial<'static> = KeyMaterial::Secret(b"s3cr3t");

    fn segment(json: &str) -> String {
        codec::encode_str(json)
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let header = segment(r#"{"alg":"HS256"}"#);
        for compact in [
            String::new(),
            header.clone(),
            format!("{header}.b"),
            format!("{header}.b.c.d"),
            format!("{header}.b.c."),
        ] {
            let err = parse(&compact).unwrap_err();
            assert_eq!(err.kind(), JwtErrorKind::MalformedToken, "{compact}");
        }
    }

    #[test]
    fn three_segments_are_kept_verbatim() {
        let header = segment(r#"{"alg":"HS256"}"#);
        let token = parse(&format!("{header}.b.c")).unwrap();
        assert_eq!(token.header_segment(), header);
        assert_eq!(token.payload_segment(), "b");
        assert_eq!(token.signature_segment(), "c");
        assert_eq!(token.header().alg(), Some("HS256"));
        assert_eq!(token.to_string(), format!("{header}.b.c"));
    }

    #[test]
    fn header_must_be_json() {
        let not_json = segment("alg=HS256");
        assert_eq!(
            parse(&format!("{not_json}.b.c")).unwrap_err().kind(),
            JwtErrorKind::MalformedToken
        );
        // "Y" has an impossible length remainder
        assert_eq!(
            parse("Y.b.c").unwrap_err().kind(),
            JwtErrorKind::MalformedToken
        );
    }

    #[test]
    fn header_members_of_any_json_type_parse() {
        let token = parse(&format!("{}.e30.AAAA", segment(r#"{"alg":"HS256","kid":7}"#))).unwrap();
        assert_eq!(token.algorithm().unwrap(), Algorithm::HS256);
        assert_eq!(token.header().kid(), None);

        let numeric_alg = parse(&format!("{}.e30.AAAA", segment(r#"{"alg":5}"#))).unwrap();
        assert_eq!(
            numeric_alg.verify(SECRET).unwrap_err().kind(),
            JwtErrorKind::UnknownAlgorithm
        );

        let compact = UnsignedToken::from_json(r#"{"alg":"HS256","typ":1}"#, "{}")
            .unwrap()
            .serialize(SECRET)
            .unwrap();
        assert!(parse(&compact).unwrap().verify(SECRET).unwrap());
    }

    #[test]
    fn signing_without_alg_is_unknown_algorithm() {
        let unsigned = UnsignedToken::from_json("{}", "x").unwrap();
        assert_eq!(
            unsigned.sign(SECRET).unwrap_err().kind(),
            JwtErrorKind::UnknownAlgorithm
        );
    }

    #[test]
    fn header_text_is_signed_verbatim() {
        let spaced = r#"{ "alg" : "HS256" }"#;
        let unsigned = UnsignedToken::from_json(spaced, r#"{"sub":"u1"}"#).unwrap();
        let token = unsigned.sign(SECRET).unwrap();
        assert_eq!(codec::decode_to_string(token.header_segment()).unwrap(), spaced);
        assert!(token.verify(SECRET).unwrap());
    }

    #[test]
    fn verification_uses_original_segments() {
        let token = UnsignedToken::from_json(r#"{"alg":"HS256" }"#, "x")
            .unwrap()
            .sign(SECRET)
            .unwrap();
        // Re-serializing the decoded header would drop the space and break the MAC
        let reencoded = segment(&token.header().to_json().unwrap());
        assert_ne!(reencoded, token.header_segment());
        assert!(token.verify(SECRET).unwrap());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let token = UnsignedToken::from_json(r#"{"alg":"HS256"}"#, r#"{"sub":"u1"}"#)
            .unwrap()
            .sign(SECRET)
            .unwrap();
        let forged = format!(
            "{}.{}.{}",
            token.header_segment(),
            segment(r#"{"sub":"admin"}"#),
            token.signature_segment()
        );
        assert!(!parse(&forged).unwrap().verify(SECRET).unwrap());
    }

    #[test]
    fn verify_errors_are_distinct_from_mismatch() {
        let missing_alg = parse(&format!("{}.e30.AAAA", segment("{}"))).unwrap();
        assert_eq!(
            missing_alg.verify(SECRET).unwrap_err().kind(),
            JwtErrorKind::UnknownAlgorithm
        );

        let unsupported = parse(&format!("{}.e30.AAAA", segment(r#"{"alg":"HS512"}"#))).unwrap();
        assert_eq!(
            unsupported.verify(SECRET).unwrap_err().kind(),
            JwtErrorKind::NotImplemented
        );

        let unknown = parse(&format!("{}.e30.AAAA", segment(r#"{"alg":"none"}"#))).unwrap();
        assert_eq!(
            unknown.verify(SECRET).unwrap_err().kind(),
            JwtErrorKind::UnknownAlgorithm
        );

        let bad_signature = parse(&format!("{}.e30.A", segment(r#"{"alg":"HS256"}"#))).unwrap();
        assert_eq!(
            bad_signature.verify(SECRET).unwrap_err().kind(),
            JwtErrorKind::MalformedToken
        );
    }

    #[test]
    fn signing_with_unsupported_header_fails() {
        let unsigned = UnsignedToken::from_json(r#"{"alg":"ES256"}"#, "x").unwrap();
        assert_eq!(
            unsigned.serialize(SECRET).unwrap_err().kind(),
            JwtErrorKind::NotImplemented
        );
        assert_eq!(
            UnsignedToken::from_json("[]", "x").unwrap_err().kind(),
            JwtErrorKind::MalformedToken
        );
    }

    #[test]
    fn payload_accessors() {
        let token = UnsignedToken::from_json(r#"{"alg":"HS256"}"#, r#"{"sub":"u1"}"#)
            .unwrap()
            .sign(SECRET)
            .unwrap();
        assert_eq!(token.payload_str().unwrap(), r#"{"sub":"u1"}"#);
        let value: serde_json::Value = token.claims().unwrap();
        assert_eq!(value["sub"], "u1");
        assert_eq!(token.signature().unwrap().len(), 32);
        assert_eq!(token.signature_hex().unwrap().len(), 64);
        assert_eq!(token.algorithm().unwrap(), Algorithm::HS256);
    }
}
