//! Algorithm registry
//!
//! Maps the `alg` identifier of a JWT header onto a signing strategy. Every
//! identifier registered for JWS is known to [`Algorithm`]; only HS256 and RS256
//! resolve to a working [`AlgorithmBinding`]. The rest fail with
//! [`JwtError::NotImplemented`], while identifiers outside the set fail with
//! [`JwtError::UnknownAlgorithm`].

use crate::crypto::{hmac_sha256, rsa_sha256};
use crate::error::{JwtError, JwtResult};
use crate::keys::{self, KeyMaterial};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Known JWS algorithm identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
    /// ECDSA with P-256 and SHA-256
    ES256,
    /// ECDSA with P-384 and SHA-384
    ES384,
    /// ECDSA with P-521 and SHA-512
    ES512,
}

/// Primitive family of an [`Algorithm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Symmetric HMAC
    Hmac,
    /// RSA signatures
    Rsa,
    /// Elliptic curve signatures
    Ecdsa,
}

impl Algorithm {
    /// Every known identifier
    pub const ALL: [Algorithm; 9] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
    ];

    /// Parse the `alg` header value
    ///
    /// # Errors
    /// Returns [`JwtError::UnknownAlgorithm`] for anything outside [`Algorithm::ALL`],
    /// `none` included.
    pub fn from_identifier(identifier: &str) -> JwtResult<Self> {
        match identifier {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            "RS256" => Ok(Algorithm::RS256),
            "RS384" => Ok(Algorithm::RS384),
            "RS512" => Ok(Algorithm::RS512),
            "ES256" => Ok(Algorithm::ES256),
            "ES384" => Ok(Algorithm::ES384),
            "ES512" => Ok(Algorithm::ES512),
            _ => Err(JwtError::unknown_algorithm(identifier)),
        }
    }

    /// Identifier as written in the header
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
        }
    }

    /// Primitive family
    #[must_use]
    pub fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// Whether [`resolve`] can build a binding for this algorithm
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(self, Algorithm::HS256 | Algorithm::RS256)
    }

    fn description(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HMAC-SHA256",
            Algorithm::HS384 => "HMAC-SHA384",
            Algorithm::HS512 => "HMAC-SHA512",
            Algorithm::RS256 => "RSA-SHA256",
            Algorithm::RS384 => "RSA-SHA384",
            Algorithm::RS512 => "RSA-SHA512",
            Algorithm::ES256 => "ECDSA-SHA256",
            Algorithm::ES384 => "ECDSA-SHA384",
            Algorithm::ES512 => "ECDSA-SHA512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_identifier(s)
    }
}

/// Algorithms that resolve to a working binding
pub fn supported_algorithms() -> impl Iterator<Item = Algorithm> {
    Algorithm::ALL.into_iter().filter(|alg| alg.is_supported())
}

/// Build a binding for `identifier` keyed with `key`
///
/// # Errors
/// - [`JwtError::UnknownAlgorithm`] when `identifier` is not a JWS algorithm
/// - [`JwtError::NotImplemented`] when it is known but unsupported
/// - [`JwtError::InvalidKey`] when the key kind does not fit the algorithm
pub fn resolve<'k>(identifier: &str, key: KeyMaterial<'k>) -> JwtResult<AlgorithmBinding<'k>> {
    let algorithm = Algorithm::from_identifier(identifier)?;
    AlgorithmBinding::new(algorithm, key)
}

#[derive(Clone, Copy)]
enum Strategy<'k> {
    HmacSha256(&'k [u8]),
    RsaSha256(&'k str),
}

/// Call-scoped pairing of an algorithm with borrowed key material
///
/// Feed the signing input with [`update`](Self::update), then
/// [`finalize`](Self::finalize) to obtain something that can sign or verify.
pub struct AlgorithmBinding<'k> {
    algorithm: Algorithm,
    strategy: Strategy<'k>,
    data: Vec<u8>,
}

impl<'k> AlgorithmBinding<'k> {
    /// Bind `algorithm` to `key`
    ///
    /// # Errors
    /// See [`resolve`].
    pub fn new(algorithm: Algorithm, key: KeyMaterial<'k>) -> JwtResult<Self> {
        let strategy = match (algorithm, key) {
            (Algorithm::HS256, KeyMaterial::Secret(secret)) => Strategy::HmacSha256(secret),
            (Algorithm::RS256, KeyMaterial::Pem(pem)) => Strategy::RsaSha256(pem),
            (Algorithm::HS256 | Algorithm::RS256, other) => {
                return Err(JwtError::InvalidKey(format!(
                    "{algorithm} cannot be keyed with a {}",
                    other.kind()
                )));
            }
            (
                Algorithm::HS384
                | Algorithm::HS512
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::ES256
                | Algorithm::ES384
                | Algorithm::ES512,
                _,
            ) => {
                debug!(algorithm = %algorithm, "algorithm recognised but not implemented");
                return Err(JwtError::NotImplemented(format!(
                    "{} not yet implemented",
                    algorithm.description()
                )));
            }
        };

        trace!(algorithm = %algorithm, "resolved algorithm binding");
        Ok(Self {
            algorithm,
            strategy,
            data: Vec::new(),
        })
    }

    /// Algorithm this binding runs
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Append to the signing input
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.data.extend_from_slice(data.as_ref());
    }

    /// Close the signing input
    #[must_use]
    pub fn finalize(self) -> FinalizedBinding<'k> {
        FinalizedBinding {
            algorithm: self.algorithm,
            strategy: self.strategy,
            data: self.data,
        }
    }
}

impl fmt::Debug for AlgorithmBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmBinding")
            .field("algorithm", &self.algorithm)
            .field("buffered", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// Binding whose signing input is complete
pub struct FinalizedBinding<'k> {
    algorithm: Algorithm,
    strategy: Strategy<'k>,
    data: Vec<u8>,
}

impl FinalizedBinding<'_> {
    /// Algorithm this binding runs
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Raw signature over the signing input
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the key cannot sign, or
    /// [`JwtError::Crypto`] when the provider fails.
    pub fn sign(&self) -> JwtResult<Vec<u8>> {
        match self.strategy {
            Strategy::HmacSha256(secret) => hmac_sha256::sign(secret, &self.data),
            Strategy::RsaSha256(pem) => rsa_sha256::sign(keys::rsa_private_key(pem)?, &self.data),
        }
    }

    /// Check a raw signature against the signing input
    ///
    /// A signature that does not match is `Ok(false)`.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the key cannot verify.
    pub fn verify(&self, signature: &[u8]) -> JwtResult<bool> {
        match self.strategy {
            Strategy::HmacSha256(secret) => hmac_sha256::verify(secret, &self.data, signature),
            Strategy::RsaSha256(pem) => {
                rsa_sha256::verify(keys::rsa_public_key(pem)?, &self.data, signature)
            }
        }
    }
}

impl fmt::Debug for FinalizedBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalizedBinding")
            .field("algorithm", &self.algorithm)
            .field("buffered", &self.data.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JwtErrorKind;

    const KEY: KeyMaterial<'static> = KeyMaterial::Secret(b"s3cr3t");

    #[test]
    fn three_way_outcome() {
        assert!(resolve("HS256", KEY).is_ok());
        assert_eq!(
            resolve("HS384", KEY).unwrap_err().kind(),
            JwtErrorKind::NotImplemented
        );
        assert_eq!(
            resolve("XX999", KEY).unwrap_err().kind(),
            JwtErrorKind::UnknownAlgorithm
        );
    }

    #[test]
    fn every_recognised_but_unsupported_identifier_is_not_implemented() {
        for id in ["ES256", "ES384", "ES512", "HS384", "HS512", "RS384", "RS512"] {
            let err = resolve(id, KEY).unwrap_err();
            assert_eq!(err.kind(), JwtErrorKind::NotImplemented, "{id}");
        }
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        for id in ["hs256", "none", "", "HS256 ", "RS1"] {
            let err = resolve(id, KEY).unwrap_err();
            assert_eq!(err.kind(), JwtErrorKind::UnknownAlgorithm, "{id:?}");
        }
    }

    #[test]
    fn key_kind_must_fit() {
        let err = resolve("HS256", KeyMaterial::pem("-----BEGIN PUBLIC KEY-----")).unwrap_err();
        assert_eq!(err.kind(), JwtErrorKind::InvalidKey);
        let err = resolve("RS256", KEY).unwrap_err();
        assert_eq!(err.kind(), JwtErrorKind::InvalidKey);
    }

    #[test]
    fn not_implemented_wins_over_key_kind() {
        let err = resolve("RS512", KEY).unwrap_err();
        assert_eq!(err.kind(), JwtErrorKind::NotImplemented);
    }

    #[test]
    fn identifier_round_trips_through_display() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn supported_set() {
        let supported: Vec<_> = supported_algorithms().collect();
        assert_eq!(supported, vec![Algorithm::HS256, Algorithm::RS256]);
        assert_eq!(Algorithm::RS256.family(), AlgorithmFamily::Rsa);
        assert_eq!(Algorithm::ES512.family(), AlgorithmFamily::Ecdsa);
    }

    #[test]
    fn update_appends_before_finalize() {
        let mut split = resolve("HS256", KEY).unwrap();
        split.update("header");
        split.update(".payload");
        let mut whole = resolve("HS256", KEY).unwrap();
        whole.update("header.payload");

        let split = split.finalize();
        let whole = whole.finalize();
        let signature = whole.sign().unwrap();
        assert_eq!(split.sign().unwrap(), signature);
        assert!(split.verify(&signature).unwrap());
        assert!(!split.verify(b"not it").unwrap());
    }
}
