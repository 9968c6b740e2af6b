//! Base64url codec for JWT segments
//!
//! Tokens carry every segment as unpadded URL-safe base64 (RFC 7515). Padding,
//! the standard `+`/`/` symbols and non-canonical trailing bits are all rejected
//! on decode.

use crate::error::{JwtError, JwtResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes as an unpadded base64url string
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode UTF-8 text as an unpadded base64url string
#[must_use]
pub fn encode_str(input: &str) -> String {
    encode(input.as_bytes())
}

/// Decode an unpadded base64url string
///
/// # Errors
/// Returns [`JwtError::MalformedToken`] when the input holds characters outside the
/// base64url alphabet, when `len % 4 == 1`, or when the trailing bits are not
/// canonical.
pub fn decode(input: &str) -> JwtResult<Vec<u8>> {
    // no padding can make a single leftover character whole
    if input.len() % 4 == 1 {
        return Err(JwtError::malformed("illegal base64url string length"));
    }

    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::MalformedToken(format!("invalid base64url: {e}")))
}

/// Decode a base64url string that must contain UTF-8 text
///
/// # Errors
/// Returns [`JwtError::MalformedToken`] for bad base64url or invalid UTF-8.
pub fn decode_to_string(input: &str) -> JwtResult<String> {
    String::from_utf8(decode(input)?)
        .map_err(|e| JwtError::MalformedToken(format!("segment is not UTF-8: {e}")))
}

/// Convert a base64url segment to lowercase hex
///
/// # Errors
/// Returns [`JwtError::MalformedToken`] when the segment does not decode.
pub fn to_hex(segment: &str) -> JwtResult<String> {
    Ok(hex::encode(decode(segment)?))
}
