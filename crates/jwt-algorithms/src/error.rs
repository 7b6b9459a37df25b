//! Error taxonomy.
//!
//! Callers see one of two outward kinds, [`AlgorithmError::SignatureGeneration`]
//! or [`AlgorithmError::SignatureVerification`]. Each carries the algorithm
//! description and the [`CryptoError`] that caused it, reachable through
//! [`std::error::Error::source`].

use thiserror::Error;

use crate::keys::KeyKind;

/// Inner cause of a failed sign or verify call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The key required by the operation was not supplied by the provider.
    #[error("the given {0} key is null")]
    MissingKey(KeyKind),

    /// The key is structurally incompatible with the primitive.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// No primitive is registered under the algorithm description.
    #[error("algorithm not supported: {0}")]
    UnsupportedAlgorithm(String),

    /// The engine override names an engine that is not registered.
    #[error("no such crypto engine: {0}")]
    NoSuchEngine(String),

    /// The engine could not be driven to completion.
    #[error("signature not ready: {0}")]
    SignatureNotReady(String),

    /// A JOSE signature has the wrong length for the curve.
    #[error("Invalid JOSE signature format.")]
    MalformedJoseSignature,

    /// A DER signature violates the ASN.1 structure.
    #[error("Invalid DER signature format.")]
    MalformedDerSignature,

    /// R or S is zero or not below the curve order.
    #[error("Invalid signature format.")]
    InvalidSignatureValue,
}

/// Outward error returned by every [`Algorithm`](crate::Algorithm) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// Signing could not complete.
    #[error("the token's signature couldn't be generated when signing using the algorithm: {algorithm}")]
    SignatureGeneration {
        /// Primitive description of the algorithm.
        algorithm: String,
        /// What went wrong.
        #[source]
        cause: CryptoError,
    },

    /// Verification could not complete or the signature did not match.
    #[error("the token's signature resulted invalid when verified using the algorithm: {algorithm}")]
    SignatureVerification {
        /// Primitive description of the algorithm.
        algorithm: String,
        /// What went wrong; `None` when the signature simply did not match.
        #[source]
        cause: Option<CryptoError>,
    },
}

impl AlgorithmError {
    pub(crate) fn generation(algorithm: &str, cause: CryptoError) -> Self {
        Self::SignatureGeneration {
            algorithm: algorithm.to_string(),
            cause,
        }
    }

    pub(crate) fn verification(algorithm: &str, cause: Option<CryptoError>) -> Self {
        Self::SignatureVerification {
            algorithm: algorithm.to_string(),
            cause,
        }
    }

    /// Returns the description of the algorithm that failed.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        match self {
            Self::SignatureGeneration { algorithm, .. }
            | Self::SignatureVerification { algorithm, .. } => algorithm,
        }
    }

    /// Returns the inner cause, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&CryptoError> {
        match self {
            Self::SignatureGeneration { cause, .. } => Some(cause),
            Self::SignatureVerification { cause, .. } => cause.as_ref(),
        }
    }

    /// Returns `true` for a well-formed signature that did not match.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::SignatureVerification { cause: None, .. })
    }
}

/// Result alias for algorithm calls.
pub type Result<T> = std::result::Result<T, AlgorithmError>;
