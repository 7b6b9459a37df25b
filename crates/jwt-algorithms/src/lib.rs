//! # jwt-algorithms
//!
//! Signing and verification engine for JWT signature algorithms using
//! aws-lc-rs.
//!
//! ## Algorithms
//!
//! - HS256, HS384, HS512 (HMAC)
//! - RS256, RS384, RS512 (RSA PKCS#1 v1.5)
//! - ES256, ES384, ES512, ES256K (ECDSA, JOSE `R || S` signatures)
//!
//! ## Engines
//!
//! Every call goes through a [`CryptoAdapter`], which routes it to a named
//! [`CryptoEngine`]. The `aws-lc-rs` engine is registered by default; callers
//! may register their own and select one per call with the
//! `*_with_engine` methods on [`Algorithm`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod codec;
pub mod config;
pub mod der;
pub mod engine;
pub mod error;
pub mod keys;
pub mod token;

pub use algorithm::{Algorithm, AlgorithmFamily, AlgorithmId, EcCurve, HashAlgorithm};
pub use config::EngineConfig;
pub use engine::{AwsLcEngine, CryptoAdapter, CryptoEngine, KeyMaterial};
pub use error::{AlgorithmError, CryptoError, Result};
pub use keys::{
    EcKeyProvider, EcPrivateKey, EcPublicKey, KeyKind, KeyProvider, RsaKeyProvider,
    RsaPrivateKey, RsaPublicKey, StaticKeyProvider,
};
pub use token::{SignedToken, TokenParts};
