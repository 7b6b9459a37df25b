//! Built-in engine backed by aws-lc-rs.

use aws_lc_rs::{
    hmac,
    rand::SystemRandom,
    signature::{
        self, EcdsaKeyPair, EcdsaSigningAlgorithm, RsaKeyPair, UnparsedPublicKey,
        VerificationAlgorithm,
    },
};

use super::{CryptoEngine, KeyMaterial, Primitive};
use crate::algorithm::{EcCurve, HashAlgorithm};
use crate::error::CryptoError;
use crate::keys::{EcPrivateKey, EcPublicKey, RsaPrivateFormat, RsaPrivateKey, RsaPublicKey};

/// Name under which [`AwsLcEngine`] registers itself.
pub const ENGINE_NAME: &str = "aws-lc-rs";

/// Engine using aws-lc-rs for HMAC, RSA PKCS#1 v1.5 and ECDSA.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsLcEngine;

impl AwsLcEngine {
    /// Creates the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Returns the ECDSA signing algorithm for a curve and digest pair.
pub(crate) fn ecdsa_signing_algorithm(
    curve: EcCurve,
    hash: HashAlgorithm,
) -> Option<&'static EcdsaSigningAlgorithm> {
    match (curve, hash) {
        (EcCurve::P256, HashAlgorithm::Sha256) => Some(&signature::ECDSA_P256_SHA256_ASN1_SIGNING),
        (EcCurve::P384, HashAlgorithm::Sha384) => Some(&signature::ECDSA_P384_SHA384_ASN1_SIGNING),
        (EcCurve::P521, HashAlgorithm::Sha512) => Some(&signature::ECDSA_P521_SHA512_ASN1_SIGNING),
        (EcCurve::Secp256k1, HashAlgorithm::Sha256) => {
            Some(&signature::ECDSA_P256K1_SHA256_ASN1_SIGNING)
        }
        _ => None,
    }
}

fn ecdsa_verification_algorithm(
    curve: EcCurve,
    hash: HashAlgorithm,
) -> Result<&'static dyn VerificationAlgorithm, CryptoError> {
    let algorithm: &'static dyn VerificationAlgorithm = match (curve, hash) {
        (EcCurve::P256, HashAlgorithm::Sha256) => &signature::ECDSA_P256_SHA256_ASN1,
        (EcCurve::P384, HashAlgorithm::Sha384) => &signature::ECDSA_P384_SHA384_ASN1,
        (EcCurve::P521, HashAlgorithm::Sha512) => &signature::ECDSA_P521_SHA512_ASN1,
        (EcCurve::Secp256k1, HashAlgorithm::Sha256) => &signature::ECDSA_P256K1_SHA256_ASN1,
        _ => return Err(curve_mismatch(curve, hash)),
    };
    Ok(algorithm)
}

fn curve_mismatch(curve: EcCurve, hash: HashAlgorithm) -> CryptoError {
    CryptoError::InvalidKey(format!(
        "{} key cannot be used with {}",
        curve.name(),
        hash.name()
    ))
}

fn wrong_key(key: KeyMaterial<'_>, description: &str) -> CryptoError {
    CryptoError::InvalidKey(format!(
        "{} cannot be used with {description}",
        key.kind_name()
    ))
}

fn hmac_algorithm(hash: HashAlgorithm) -> hmac::Algorithm {
    match hash {
        HashAlgorithm::Sha256 => hmac::HMAC_SHA256,
        HashAlgorithm::Sha384 => hmac::HMAC_SHA384,
        HashAlgorithm::Sha512 => hmac::HMAC_SHA512,
    }
}

fn hmac_sign(hash: HashAlgorithm, secret: &[u8], message: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac_algorithm(hash), secret);
    hmac::sign(&key, message).as_ref().to_vec()
}

fn hmac_verify(
    hash: HashAlgorithm,
    secret: &[u8],
    message: &[u8],
    tag: &[u8],
) -> Result<bool, CryptoError> {
    if tag.len() != hash.output_len() {
        return Err(CryptoError::SignatureNotReady(format!(
            "HMAC tag must be {} bytes, got {}",
            hash.output_len(),
            tag.len()
        )));
    }
    let key = hmac::Key::new(hmac_algorithm(hash), secret);
    // Constant-time comparison.
    Ok(hmac::verify(&key, message, tag).is_ok())
}

fn rsa_sign(
    hash: HashAlgorithm,
    key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key_pair = match key.der() {
        (der, RsaPrivateFormat::Pkcs8) => RsaKeyPair::from_pkcs8(der),
        (der, RsaPrivateFormat::Pkcs1) => RsaKeyPair::from_der(der),
    }
    .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))?;

    let rng = SystemRandom::new();
    let mut output = vec![0u8; key_pair.public_modulus_len()];
    let result = match hash {
        HashAlgorithm::Sha256 => {
            key_pair.sign(&signature::RSA_PKCS1_SHA256, &rng, message, &mut output)
        }
        HashAlgorithm::Sha384 => {
            key_pair.sign(&signature::RSA_PKCS1_SHA384, &rng, message, &mut output)
        }
        HashAlgorithm::Sha512 => {
            key_pair.sign(&signature::RSA_PKCS1_SHA512, &rng, message, &mut output)
        }
    };
    result.map_err(|e| CryptoError::SignatureNotReady(format!("RSA signing failed: {e}")))?;
    Ok(output)
}

fn rsa_verify(
    hash: HashAlgorithm,
    key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    if signature.len() != key.modulus_len() {
        return Err(CryptoError::SignatureNotReady(format!(
            "RSA signature must be {} bytes, got {}",
            key.modulus_len(),
            signature.len()
        )));
    }
    let parameters: &'static dyn VerificationAlgorithm = match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
    };
    let public_key = UnparsedPublicKey::new(parameters, key.as_pkcs1_der());
    Ok(public_key.verify(message, signature).is_ok())
}

fn ecdsa_sign(
    hash: HashAlgorithm,
    key: &EcPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let algorithm = ecdsa_signing_algorithm(key.curve(), hash)
        .ok_or_else(|| curve_mismatch(key.curve(), hash))?;
    let key_pair = EcdsaKeyPair::from_pkcs8(algorithm, key.pkcs8_der())
        .map_err(|e| CryptoError::InvalidKey(format!("invalid EC key: {e}")))?;

    let rng = SystemRandom::new();
    let signature = key_pair
        .sign(&rng, message)
        .map_err(|e| CryptoError::SignatureNotReady(format!("ECDSA signing failed: {e}")))?;
    Ok(signature.as_ref().to_vec())
}

fn ecdsa_verify(
    hash: HashAlgorithm,
    key: &EcPublicKey,
    message: &[u8],
    der_signature: &[u8],
) -> Result<bool, CryptoError> {
    let algorithm = ecdsa_verification_algorithm(key.curve(), hash)?;
    let public_key = UnparsedPublicKey::new(algorithm, key.as_bytes());
    Ok(public_key.verify(message, der_signature).is_ok())
}

impl CryptoEngine for AwsLcEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn create_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        match (Primitive::from_description(description)?, key) {
            (Primitive::Hmac(hash), KeyMaterial::Secret(secret)) => {
                Ok(hmac_sign(hash, secret, message))
            }
            (Primitive::Rsa(hash), KeyMaterial::RsaPrivate(key)) => rsa_sign(hash, key, message),
            (Primitive::Ecdsa(hash), KeyMaterial::EcPrivate(key)) => {
                ecdsa_sign(hash, key, message)
            }
            _ => Err(wrong_key(key, description)),
        }
    }

    fn verify_signature(
        &self,
        description: &str,
        key: KeyMaterial<'_>,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        match (Primitive::from_description(description)?, key) {
            (Primitive::Hmac(hash), KeyMaterial::Secret(secret)) => {
                hmac_verify(hash, secret, message, signature)
            }
            (Primitive::Rsa(hash), KeyMaterial::RsaPublic(key)) => {
                rsa_verify(hash, key, message, signature)
            }
            (Primitive::Ecdsa(hash), KeyMaterial::EcPublic(key)) => {
                ecdsa_verify(hash, key, message, signature)
            }
            _ => Err(wrong_key(key, description)),
        }
    }
}
