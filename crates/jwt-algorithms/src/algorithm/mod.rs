//! Signature algorithms.
//!
//! An [`Algorithm`] is one immutable signing configuration: an id for the
//! token header, a primitive description for the engine, and family-specific
//! key material. It is cheap to clone and safe to share between threads.
//!
//! ```no_run
//! use jwt_algorithms::Algorithm;
//!
//! let algorithm = Algorithm::hmac256(b"shared-secret");
//! let signature = algorithm.sign_token(b"eyJhbGciOiJIUzI1NiJ9", b"e30")?;
//! algorithm.verify_content(b"eyJhbGciOiJIUzI1NiJ9.e30", &signature)?;
//! # Ok::<(), jwt_algorithms::AlgorithmError>(())
//! ```

mod ecdsa;
mod hmac;
mod id;
mod rsa;

use std::fmt;
use std::sync::{Arc, OnceLock};

use zeroize::Zeroizing;

pub use id::{AlgorithmFamily, AlgorithmId, EcCurve, HashAlgorithm};

use crate::engine::CryptoAdapter;
use crate::error::{AlgorithmError, Result};
use crate::keys::{
    EcKeyProvider, EcPrivateKey, EcPublicKey, RsaKeyProvider, RsaPrivateKey, RsaPublicKey,
    StaticKeyProvider,
};
use crate::token::{self, SignedToken};

fn default_adapter() -> Arc<CryptoAdapter> {
    static DEFAULT: OnceLock<Arc<CryptoAdapter>> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(CryptoAdapter::new())))
}

#[derive(Clone)]
enum Keying {
    Hmac {
        secret: Arc<Zeroizing<Vec<u8>>>,
    },
    Rsa {
        keys: Arc<RsaKeyProvider>,
    },
    Ecdsa {
        coordinate_size: usize,
        keys: Arc<EcKeyProvider>,
    },
}

/// A signing configuration for one algorithm.
#[derive(Clone)]
pub struct Algorithm {
    id: String,
    description: String,
    keying: Keying,
    adapter: Arc<CryptoAdapter>,
}

impl Algorithm {
    fn new(id: &str, description: &str, keying: Keying) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            keying,
            adapter: default_adapter(),
        }
    }

    fn builtin(id: AlgorithmId, keying: Keying) -> Self {
        Self::new(id.jwa_name(), id.description(), keying)
    }

    fn hmac_keying(secret: &[u8]) -> Keying {
        Keying::Hmac {
            secret: Arc::new(Zeroizing::new(secret.to_vec())),
        }
    }

    fn ecdsa_keying(id: AlgorithmId, keys: Arc<EcKeyProvider>) -> Keying {
        Keying::Ecdsa {
            coordinate_size: id.coordinate_size().unwrap_or_default(),
            keys,
        }
    }

    fn static_rsa(
        public: Option<RsaPublicKey>,
        private: Option<RsaPrivateKey>,
    ) -> Arc<RsaKeyProvider> {
        Arc::new(StaticKeyProvider::new(public, private))
    }

    fn static_ec(public: Option<EcPublicKey>, private: Option<EcPrivateKey>) -> Arc<EcKeyProvider> {
        Arc::new(StaticKeyProvider::new(public, private))
    }

    /// HS256: HMAC with SHA-256.
    #[must_use]
    pub fn hmac256(secret: impl AsRef<[u8]>) -> Self {
        Self::builtin(AlgorithmId::Hs256, Self::hmac_keying(secret.as_ref()))
    }

    /// HS384: HMAC with SHA-384.
    #[must_use]
    pub fn hmac384(secret: impl AsRef<[u8]>) -> Self {
        Self::builtin(AlgorithmId::Hs384, Self::hmac_keying(secret.as_ref()))
    }

    /// HS512: HMAC with SHA-512.
    #[must_use]
    pub fn hmac512(secret: impl AsRef<[u8]>) -> Self {
        Self::builtin(AlgorithmId::Hs512, Self::hmac_keying(secret.as_ref()))
    }

    /// RS256: RSA PKCS#1 v1.5 with SHA-256, keys from `keys`.
    #[must_use]
    pub fn rsa256(keys: Arc<RsaKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Rs256, Keying::Rsa { keys })
    }

    /// RS384: RSA PKCS#1 v1.5 with SHA-384, keys from `keys`.
    #[must_use]
    pub fn rsa384(keys: Arc<RsaKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Rs384, Keying::Rsa { keys })
    }

    /// RS512: RSA PKCS#1 v1.5 with SHA-512, keys from `keys`.
    #[must_use]
    pub fn rsa512(keys: Arc<RsaKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Rs512, Keying::Rsa { keys })
    }

    /// RS256 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn rsa256_with_keys(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> Self {
        Self::rsa256(Self::static_rsa(public, private))
    }

    /// RS384 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn rsa384_with_keys(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> Self {
        Self::rsa384(Self::static_rsa(public, private))
    }

    /// RS512 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn rsa512_with_keys(public: Option<RsaPublicKey>, private: Option<RsaPrivateKey>) -> Self {
        Self::rsa512(Self::static_rsa(public, private))
    }

    /// ES256: ECDSA on P-256 with SHA-256, keys from `keys`.
    #[must_use]
    pub fn ecdsa256(keys: Arc<EcKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Es256, Self::ecdsa_keying(AlgorithmId::Es256, keys))
    }

    /// ES384: ECDSA on P-384 with SHA-384, keys from `keys`.
    #[must_use]
    pub fn ecdsa384(keys: Arc<EcKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Es384, Self::ecdsa_keying(AlgorithmId::Es384, keys))
    }

    /// ES512: ECDSA on P-521 with SHA-512, keys from `keys`.
    #[must_use]
    pub fn ecdsa512(keys: Arc<EcKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Es512, Self::ecdsa_keying(AlgorithmId::Es512, keys))
    }

    /// ES256K: ECDSA on secp256k1 with SHA-256, keys from `keys`.
    #[must_use]
    pub fn ecdsa256k(keys: Arc<EcKeyProvider>) -> Self {
        Self::builtin(AlgorithmId::Es256k, Self::ecdsa_keying(AlgorithmId::Es256k, keys))
    }

    /// ES256 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn ecdsa256_with_keys(public: Option<EcPublicKey>, private: Option<EcPrivateKey>) -> Self {
        Self::ecdsa256(Self::static_ec(public, private))
    }

    /// ES384 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn ecdsa384_with_keys(public: Option<EcPublicKey>, private: Option<EcPrivateKey>) -> Self {
        Self::ecdsa384(Self::static_ec(public, private))
    }

    /// ES512 with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn ecdsa512_with_keys(public: Option<EcPublicKey>, private: Option<EcPrivateKey>) -> Self {
        Self::ecdsa512(Self::static_ec(public, private))
    }

    /// ES256K with a fixed key pair. Either half may be absent.
    #[must_use]
    pub fn ecdsa256k_with_keys(public: Option<EcPublicKey>, private: Option<EcPrivateKey>) -> Self {
        Self::ecdsa256k(Self::static_ec(public, private))
    }

    /// HMAC under a custom id and primitive description.
    ///
    /// An unknown description fails at call time with
    /// [`CryptoError::UnsupportedAlgorithm`](crate::CryptoError::UnsupportedAlgorithm).
    #[must_use]
    pub fn hmac(id: &str, description: &str, secret: impl AsRef<[u8]>) -> Self {
        Self::new(id, description, Self::hmac_keying(secret.as_ref()))
    }

    /// RSA under a custom id and primitive description.
    #[must_use]
    pub fn rsa(id: &str, description: &str, keys: Arc<RsaKeyProvider>) -> Self {
        Self::new(id, description, Keying::Rsa { keys })
    }

    /// ECDSA under a custom id, primitive description and coordinate size.
    #[must_use]
    pub fn ecdsa(
        id: &str,
        description: &str,
        coordinate_size: usize,
        keys: Arc<EcKeyProvider>,
    ) -> Self {
        Self::new(
            id,
            description,
            Keying::Ecdsa {
                coordinate_size,
                keys,
            },
        )
    }

    /// Routes calls through `adapter` instead of the shared default.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<CryptoAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Returns the token header id, e.g. `ES256`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the primitive description, e.g. `SHA256withECDSA`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the algorithm family.
    #[must_use]
    pub const fn family(&self) -> AlgorithmFamily {
        match self.keying {
            Keying::Hmac { .. } => AlgorithmFamily::Hmac,
            Keying::Rsa { .. } => AlgorithmFamily::Rsa,
            Keying::Ecdsa { .. } => AlgorithmFamily::Ecdsa,
        }
    }

    /// Returns the JOSE coordinate size for ECDSA algorithms.
    #[must_use]
    pub const fn coordinate_size(&self) -> Option<usize> {
        match self.keying {
            Keying::Ecdsa {
                coordinate_size, ..
            } => Some(coordinate_size),
            _ => None,
        }
    }

    /// Returns the adapter this algorithm calls.
    #[must_use]
    pub fn adapter(&self) -> &CryptoAdapter {
        &self.adapter
    }

    /// Returns the signing key id from the key provider. HMAC has none.
    #[must_use]
    pub fn signing_key_id(&self) -> Option<String> {
        match &self.keying {
            Keying::Hmac { .. } => None,
            Keying::Rsa { keys } => keys.private_key_id(),
            Keying::Ecdsa { keys, .. } => keys.private_key_id(),
        }
    }

    /// Signs `content` on the default engine.
    ///
    /// ECDSA signatures are returned in JOSE form.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureGeneration`] with the cause.
    pub fn sign(&self, content: &[u8]) -> Result<Vec<u8>> {
        self.create_signature(content, None)
    }

    /// Signs `content` on the named engine.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureGeneration`]; an unregistered
    /// engine is [`CryptoError::NoSuchEngine`](crate::CryptoError::NoSuchEngine).
    pub fn sign_with_engine(&self, content: &[u8], engine: &str) -> Result<Vec<u8>> {
        self.create_signature(content, Some(engine))
    }

    /// Signs `header || '.' || payload`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureGeneration`] with the cause.
    pub fn sign_token(&self, header: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        self.create_signature(&token::signing_input(header, payload), None)
    }

    /// Signs `header || '.' || payload` on the named engine.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureGeneration`] with the cause.
    pub fn sign_token_with_engine(
        &self,
        header: &[u8],
        payload: &[u8],
        engine: &str,
    ) -> Result<Vec<u8>> {
        self.create_signature(&token::signing_input(header, payload), Some(engine))
    }

    /// Verifies a token's signature, looking the public key up by its `kid`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureVerification`]. The cause is `None`
    /// when the signature is well formed but does not match.
    pub fn verify(&self, token: &impl SignedToken) -> Result<()> {
        self.verify_token(token, None)
    }

    /// Verifies a token's signature on the named engine.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureVerification`].
    pub fn verify_with_engine(&self, token: &impl SignedToken, engine: &str) -> Result<()> {
        self.verify_token(token, Some(engine))
    }

    /// Verifies `signature` over `content` with the default public key.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureVerification`].
    pub fn verify_content(&self, content: &[u8], signature: &[u8]) -> Result<()> {
        self.check_signature(content, signature, None, None)
    }

    /// Verifies `signature` over `content` on the named engine.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::SignatureVerification`].
    pub fn verify_content_with_engine(
        &self,
        content: &[u8],
        signature: &[u8],
        engine: &str,
    ) -> Result<()> {
        self.check_signature(content, signature, None, Some(engine))
    }

    fn verify_token(&self, token: &impl SignedToken, engine: Option<&str>) -> Result<()> {
        let content = token::signing_input(token.header(), token.payload());
        self.check_signature(&content, token.signature(), token.key_id(), engine)
    }

    fn create_signature(&self, content: &[u8], engine: Option<&str>) -> Result<Vec<u8>> {
        let adapter = self.adapter.as_ref();
        let description = self.description.as_str();

        let result = match &self.keying {
            Keying::Hmac { secret } => hmac::sign(adapter, description, secret, content, engine),
            Keying::Rsa { keys } => rsa::sign(adapter, description, keys.as_ref(), content, engine),
            Keying::Ecdsa {
                coordinate_size,
                keys,
            } => ecdsa::sign(
                adapter,
                description,
                *coordinate_size,
                keys.as_ref(),
                content,
                engine,
            ),
        };

        result.map_err(|cause| {
            tracing::debug!("{} signing failed: {}", self.id, cause);
            AlgorithmError::generation(description, cause)
        })
    }

    fn check_signature(
        &self,
        content: &[u8],
        signature: &[u8],
        key_id: Option<&str>,
        engine: Option<&str>,
    ) -> Result<()> {
        let adapter = self.adapter.as_ref();
        let description = self.description.as_str();

        let result = match &self.keying {
            Keying::Hmac { secret } => {
                hmac::verify(adapter, description, secret, content, signature, engine)
            }
            Keying::Rsa { keys } => rsa::verify(
                adapter,
                description,
                keys.as_ref(),
                content,
                signature,
                key_id,
                engine,
            ),
            Keying::Ecdsa {
                coordinate_size,
                keys,
            } => ecdsa::verify(
                adapter,
                description,
                *coordinate_size,
                keys.as_ref(),
                content,
                signature,
                key_id,
                engine,
            ),
        };

        match result {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!("{} signature did not match", self.id);
                Err(AlgorithmError::verification(description, None))
            }
            Err(cause) => {
                tracing::debug!("{} verification failed: {}", self.id, cause);
                Err(AlgorithmError::verification(description, Some(cause)))
            }
        }
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("family", &self.family())
            .field("engine", &self.adapter.default_engine())
            .finish_non_exhaustive()
    }
}
