//! JSON Web Token (JWT) compact serialization
//!
//! This crate provides:
//! - A base64url codec for token segments
//! - Token parsing that keeps the original segments for verification
//! - An algorithm registry with HS256 and RS256 bindings
//! - Signing of header + payload into compact text
//!
//! ```
//! use authlink_jwt::{KeyMaterial, UnsignedToken, parse};
//!
//! let compact = UnsignedToken::from_json(r#"{"alg":"HS256"}"#, r#"{"sub":"u1"}"#)?
//!     .serialize(KeyMaterial::secret("s3cr3t"))?;
//!
//! let token = parse(&compact)?;
//! assert!(token.verify(KeyMaterial::secret("s3cr3t"))?);
//! assert!(!token.verify(KeyMaterial::secret("wrong"))?);
//! # Ok::<(), authlink_jwt::JwtError>(())
//! ```

pub mod algorithm;
pub mod claims;
pub mod codec;
pub(crate) mod crypto;
mod error;
mod header;
mod keys;
mod token;

pub use algorithm::{
    Algorithm, AlgorithmBinding, AlgorithmFamily, FinalizedBinding, resolve, supported_algorithms,
};
pub use claims::{Audience, Claims, ClaimsBuilder};
pub use error::*;
pub use header::Header;
pub use keys::KeyMaterial;
pub use token::{Token, UnsignedToken, parse};
