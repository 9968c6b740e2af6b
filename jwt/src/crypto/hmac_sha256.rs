//! HMAC-SHA256 operations for JWT signing and verification

use crate::error::{JwtError, JwtResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &[u8]) -> JwtResult<HmacSha256> {
    HmacSha256::new_from_slice(secret).map_err(|_| JwtError::invalid_key("Invalid HMAC key"))
}

/// HMAC-SHA256 over `data`
pub(crate) fn sign(secret: &[u8], data: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = keyed(secret)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time check of `signature` against HMAC-SHA256 over `data`
pub(crate) fn verify(secret: &[u8], data: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let mut mac = keyed(secret)?;
    mac.update(data);
    Ok(mac.verify_slice(signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";
    const MAC: [u8; 32] = hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");

    #[test]
    fn rfc4231_known_answer() {
        assert_eq!(sign(KEY, DATA).unwrap(), MAC);
        assert!(verify(KEY, DATA, &MAC).unwrap());
    }

    #[test]
    fn mismatch_is_false_not_error() {
        assert!(!verify(b"other", DATA, &MAC).unwrap());
        assert!(!verify(KEY, DATA, &MAC[..31]).unwrap());
        assert!(!verify(KEY, DATA, &[]).unwrap());
    }

    #[test]
    fn empty_secret_is_accepted() {
        assert_eq!(sign(b"", b"").unwrap().len(), 32);
    }
}
