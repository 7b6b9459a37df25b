//! Crypto engine adapter.
//!
//! A [`CryptoEngine`] performs raw signing, MAC and verification for a
//! primitive named by its description (`HmacSHA256`, `SHA384withRSA`,
//! `SHA512withECDSA`, ...). The [`CryptoAdapter`] holds the registered
//! engines by name and routes each call either to the engine named by the
//! caller or to its default. Engines are stateless; every call obtains its
//! own native context.

pub mod aws_lc;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use aws_lc::AwsLcEngine;

use crate::algorithm::HashAlgorithm;
use crate::config::EngineConfig;
use crate::error::CryptoError;
use crate::keys::{EcPrivateKey, EcPublicKey, RsaPrivateKey, RsaPublicKey};

/// Key material handed to an engine for a single call.
#[derive(Clone, Copy)]
pub enum KeyMaterial<'a> {
    /// Shared HMAC secret.
    Secret(&'a [u8]),
    /// RSA private key, for signing.
    RsaPrivate(&'a RsaPrivateKey),
    /// RSA public key, for verifying.
    RsaPublic(&'a RsaPublicKey),
    /// EC private key, for signing.
    EcPrivate(&'a EcPrivateKey),
    /// EC public key, for verifying.
    EcPublic(&'a EcPublicKey),
}

impl KeyMaterial<'_> {
    /// Short name of the key type, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Secret(_) => "HMAC secret",
            Self::RsaPrivate(_) => "RSA private key",
            Self::RsaPublic(_) => "RSA public key",
            Self::EcPrivate(_) => "EC private key",
            Self::EcPublic(_) => "EC public key",
        }
    }
}

impl fmt::Debug for KeyMaterial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Primitive named by an algorithm description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// HMAC with the given digest.
    Hmac(HashAlgorithm),
    /// RSA PKCS#1 v1.5 with the given digest.
    Rsa(HashAlgorithm),
    /// ECDSA with the given digest, DER-encoded signatures.
    Ecdsa(HashAlgorithm),
}

impl Primitive {
    /// Parses a primitive description.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] for unknown descriptions.
    pub fn from_description(description: &str) -> Result<Self, CryptoError> {
        use HashAlgorithm::{Sha256, Sha384, Sha512};

        match description {
            "HmacSHA256" => Ok(Self::Hmac(Sha256)),
            "HmacSHA384" => Ok(Self::Hmac(Sha384)),
            "HmacSHA512" => Ok(Self::Hmac(Sha512)),
            "SHA256withRSA" => Ok(Self::Rsa(Sha256)),
            "SHA384withRSA" => Ok(Self::Rsa(Sha384)),
            "SHA512withRSA" => Ok(Self::Rsa(Sha512)),
            "SHA256withECDSA" => Ok(Self::Ecdsa(Sha256)),
            "SHA384withECDSA" => Ok(Self::Ecdsa(Sha384)),
            "SHA512withECDSA" => Ok(Self::Ecdsa(Sha512)),
            _ => Err(CryptoError::UnsupportedAlgorithm(description.to_string())),
        }
    }
}

/// A named provider of signature primitives.
///
/// Implementations must translate every native failure into a
/// [`CryptoError`]. A signature that simply does not match is `Ok(false)`.
pub trait CryptoEngine: Send + Sync + fmt::Debug {
    /// Returns the name callers use to select this engine.
    fn name(&self) -> &str;

    /// Signs or MACs `message` with the primitive named by `description`.
    ///
    /// ECDSA signatures are returned in DER form.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`],
    /// [`CryptoError::InvalidKey`] or [`CryptoError::SignatureNotReady`].
    fn create_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Checks `signature` over `message`.
    ///
    /// ECDSA signatures are expected in DER form.
    ///
    /// # Errors
    ///
    /// Same as [`create_signature`](Self::create_signature). A signature of
    /// the wrong length for the primitive is
    /// [`CryptoError::SignatureNotReady`].
    fn verify_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;
}

/// Registry of crypto engines with a default.
///
/// Built once, then shared read-only behind an `Arc` by every algorithm.
#[derive(Debug, Clone)]
pub struct CryptoAdapter {
    engines: HashMap<String, Arc<dyn CryptoEngine>>,
    default_engine: String,
}

impl Default for CryptoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoAdapter {
    /// Creates an adapter with the `aws-lc-rs` engine registered as default.
    #[must_use]
    pub fn new() -> Self {
        let engine: Arc<dyn CryptoEngine> = Arc::new(AwsLcEngine::new());
        let default_engine = engine.name().to_string();
        let mut engines = HashMap::new();
        engines.insert(default_engine.clone(), engine);
        Self {
            engines,
            default_engine,
        }
    }

    /// Creates an adapter whose default engine comes from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NoSuchEngine`] if the configured engine is
    /// not built in.
    pub fn from_config(config: &EngineConfig) -> Result<Self, CryptoError> {
        Self::new().with_default_engine(&config.default_engine)
    }

    /// Registers `engine` under its own name, replacing any engine already
    /// registered under that name.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn CryptoEngine>) -> Self {
        tracing::debug!("registering crypto engine '{}'", engine.name());
        self.engines.insert(engine.name().to_string(), engine);
        self
    }

    /// Makes `name` the engine used when a call names none.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NoSuchEngine`] if `name` is not registered.
    pub fn with_default_engine(mut self, name: &str) -> Result<Self, CryptoError> {
        if !self.has_engine(name) {
            tracing::warn!("cannot make unknown crypto engine '{}' the default", name);
            return Err(CryptoError::NoSuchEngine(name.to_string()));
        }
        self.default_engine = name.to_string();
        Ok(self)
    }

    /// Returns `true` if an engine is registered under `name`.
    #[must_use]
    pub fn has_engine(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Lists registered engine names, sorted.
    #[must_use]
    pub fn engine_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the name of the default engine.
    #[must_use]
    pub fn default_engine(&self) -> &str {
        &self.default_engine
    }

    fn resolve(&self, engine: Option<&str>) -> Result<&dyn CryptoEngine, CryptoError> {
        let name = engine.unwrap_or(&self.default_engine);
        match self.engines.get(name) {
            Some(engine) => {
                tracing::trace!("using crypto engine '{}'", name);
                Ok(engine.as_ref())
            }
            None => {
                tracing::debug!("crypto engine '{}' is not registered", name);
                Err(CryptoError::NoSuchEngine(name.to_string()))
            }
        }
    }

    /// Signs `message` on the engine named by `engine`, or the default.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NoSuchEngine`] for an unknown engine name,
    /// otherwise whatever the engine reports.
    pub fn create_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
        engine: Option<&str>,
    ) -> Result<Vec<u8>, CryptoError> {
        self.resolve(engine)?
            .create_signature(description, key, message)
    }

    /// Verifies `signature` on the engine named by `engine`, or the default.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::NoSuchEngine`] for an unknown engine name,
    /// otherwise whatever the engine reports.
    pub fn verify_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
        signature: &[u8],
        engine: Option<&str>,
    ) -> Result<bool, CryptoError> {
        self.resolve(engine)?
            .verify_signature(description, key, message, signature)
    }
}
