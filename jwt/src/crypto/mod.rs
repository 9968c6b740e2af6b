//! Signature primitives backing the supported algorithms

pub(crate) mod hmac_sha256;
pub(crate) mod rsa_sha256;
