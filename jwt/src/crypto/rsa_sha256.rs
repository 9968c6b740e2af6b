//! RSASSA-PKCS1-v1_5 with SHA-256

use crate::error::{JwtError, JwtResult};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Sign `data` with an RSA private key
pub(crate) fn sign(private_key: RsaPrivateKey, data: &[u8]) -> JwtResult<Vec<u8>> {
    let signing_key = SigningKey::<Sha256>::new(private_key);
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| JwtError::Crypto(format!("RSA signing failed: {e}")))?;
    Ok(signature.to_vec())
}

/// Check `signature` over `data` with an RSA public key
///
/// A signature that does not verify, including one of the wrong length, is
/// `Ok(false)`.
pub(crate) fn verify(public_key: RsaPublicKey, data: &[u8], signature: &[u8]) -> JwtResult<bool> {
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };

    match verifying_key.verify(data, &signature) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
