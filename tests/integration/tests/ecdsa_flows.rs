//! ECDSA sign/verify flows, including JOSE/DER edge cases.

use std::sync::Arc;

use jwt_algorithms::codec::{der_to_jose, jose_to_der};
use jwt_algorithms::{
    Algorithm, AlgorithmError, CryptoError, EcCurve, EcKeyProvider, KeyKind, SignedToken,
    StaticKeyProvider, TokenParts,
};

use crate::common::{self, *};

/// Signs a token with ES256 and verifies it with the matching public key.
#[test]
fn test_es256_end_to_end() -> anyhow::Result<()> {
    common::init_tracing();

    let algorithm = es256();
    let token = signed_token(&algorithm)?;
    assert_eq!(token.signature().len(), 64);

    algorithm.verify(&token)?;
    Ok(())
}

/// A DER signature with a corrupted tag, sequence length or a truncated
/// buffer is rejected.
#[test]
fn test_der_corruption_is_rejected() -> anyhow::Result<()> {
    let algorithm = es256();
    let token = signed_token(&algorithm)?;
    let der = jose_to_der(token.signature(), 32)?;
    assert_eq!(der_to_jose(&der, 32)?, token.signature());

    let mut wrong_tag = der.clone();
    wrong_tag[0] = 0x02;
    assert_eq!(
        der_to_jose(&wrong_tag, 32),
        Err(CryptoError::MalformedDerSignature)
    );

    for delta in [1u8, 0xff] {
        let mut wrong_length = der.clone();
        wrong_length[1] = wrong_length[1].wrapping_add(delta);
        assert_eq!(
            der_to_jose(&wrong_length, 32),
            Err(CryptoError::MalformedDerSignature)
        );
    }

    let truncated = &der[..der.len() - 1];
    assert_eq!(
        der_to_jose(truncated, 32),
        Err(CryptoError::MalformedDerSignature)
    );
    Ok(())
}

/// A signature one byte short fails the shape check before any engine call.
#[test]
fn test_short_signature_never_reaches_engine() -> anyhow::Result<()> {
    common::init_tracing();

    let (engine, adapter) = counting_adapter();
    let algorithm = es256().with_adapter(adapter);

    let signature: Vec<u8> = (0..63u8).map(|b| b.wrapping_mul(7) | 1).collect();
    let error = algorithm
        .verify_content(SIGNING_INPUT, &signature)
        .unwrap_err();

    assert_eq!(error.cause(), Some(&CryptoError::MalformedJoseSignature));
    assert_eq!(engine.calls(), 0);

    let mut long = signature.clone();
    long.extend_from_slice(&[1, 2]);
    let error = algorithm.verify_content(SIGNING_INPUT, &long).unwrap_err();
    assert_eq!(error.cause(), Some(&CryptoError::MalformedJoseSignature));
    assert_eq!(engine.calls(), 0);

    // A well-formed call does reach the engine.
    let signature = algorithm.sign(SIGNING_INPUT)?;
    algorithm.verify_content(SIGNING_INPUT, &signature)?;
    assert_eq!(engine.calls(), 2);
    Ok(())
}

/// All-zero R and S are refused without consulting the engine.
#[test]
fn test_zero_signature_is_invalid() {
    let (engine, adapter) = counting_adapter();
    let algorithm = es512().with_adapter(adapter);

    let error = algorithm
        .verify_content(SIGNING_INPUT, &[0u8; 132])
        .unwrap_err();
    assert_eq!(error.cause(), Some(&CryptoError::InvalidSignatureValue));
    assert!(error.to_string().contains("SHA512withECDSA"));
    assert_eq!(engine.calls(), 0);
}

/// Signing with only a public key reports the missing private key.
#[test]
fn test_sign_without_private_key() {
    let algorithm = Algorithm::ecdsa256_with_keys(Some(ec_public(EC256_PUBLIC)), None);

    let error = algorithm.sign(b"content").unwrap_err();
    assert_eq!(
        error,
        AlgorithmError::SignatureGeneration {
            algorithm: "SHA256withECDSA".to_string(),
            cause: CryptoError::MissingKey(KeyKind::Private),
        }
    );
}

/// Verifying with only a private key reports the missing public key.
#[test]
fn test_verify_without_public_key() -> anyhow::Result<()> {
    let algorithm =
        Algorithm::ecdsa384_with_keys(None, Some(ec_private(EcCurve::P384, EC384_PRIVATE)));

    let signature = algorithm.sign(b"content")?;
    let error = algorithm.verify_content(b"content", &signature).unwrap_err();
    assert_eq!(
        error.cause(),
        Some(&CryptoError::MissingKey(KeyKind::Public))
    );
    assert!(!error.is_mismatch());
    Ok(())
}

/// Every curve signs and verifies with JOSE signatures of the right width.
#[test]
fn test_every_curve_round_trips() -> anyhow::Result<()> {
    for (algorithm, width) in [(es256(), 64), (es384(), 96), (es512(), 132), (es256k(), 64)] {
        let token = signed_token(&algorithm)?;
        assert_eq!(token.signature().len(), width, "{}", algorithm.id());
        algorithm.verify(&token)?;
    }
    Ok(())
}

/// OpenSSL reference signatures verify once converted to JOSE, including the
/// long-form DER length used by P-521.
#[test]
fn test_openssl_signatures_verify() -> anyhow::Result<()> {
    let jose = der_to_jose(ES256_OPENSSL_SIGNATURE, 32)?;
    es256().verify_content(SIGNING_INPUT, &jose)?;

    assert_eq!(&ES512_OPENSSL_SIGNATURE[..3], &[0x30, 0x81, 0x88]);
    let jose = der_to_jose(ES512_OPENSSL_SIGNATURE, 66)?;
    es512().verify_content(SIGNING_INPUT, &jose)?;

    assert_eq!(jose_to_der(&jose, 66)?, ES512_OPENSSL_SIGNATURE);
    Ok(())
}

/// A valid signature checked against a different key is a plain mismatch.
#[test]
fn test_other_key_is_mismatch() -> anyhow::Result<()> {
    let signer = es512();
    let token = signed_token(&signer)?;

    let verifier = Algorithm::ecdsa512_with_keys(Some(ec_public(EC512_OTHER_PUBLIC)), None);
    let error = verifier.verify(&token).unwrap_err();
    assert!(error.is_mismatch());
    assert!(error.cause().is_none());

    let verifier = Algorithm::ecdsa256_with_keys(Some(ec_public(EC256_OTHER_PUBLIC)), None);
    let error = verifier
        .verify(&signed_token(&es256())?)
        .unwrap_err();
    assert!(error.is_mismatch());
    Ok(())
}

/// ES256 and ES256K share a description; the key's curve picks the primitive.
#[test]
fn test_es256k_keys_are_not_interchangeable() -> anyhow::Result<()> {
    assert_eq!(es256k().description(), es256().description());

    let token = signed_token(&es256k())?;
    let verifier = Algorithm::ecdsa256k_with_keys(Some(ec_public(EC256_PUBLIC)), None);
    let error = verifier.verify(&token).unwrap_err();
    assert!(error.is_mismatch());
    Ok(())
}

/// A custom ECDSA algorithm with a zero coordinate size fails every call
/// with an error instead of panicking.
#[test]
fn test_zero_coordinate_size_is_an_error() {
    let keys: Arc<EcKeyProvider> = Arc::new(StaticKeyProvider::new(
        Some(ec_public(EC256_PUBLIC)),
        Some(ec_private(EcCurve::P256, EC256_PRIVATE)),
    ));
    let (engine, adapter) = counting_adapter();
    let algorithm = Algorithm::ecdsa("X-ES0", "SHA256withECDSA", 0, keys).with_adapter(adapter);

    let error = algorithm.sign(SIGNING_INPUT).unwrap_err();
    assert_eq!(
        error,
        AlgorithmError::SignatureGeneration {
            algorithm: "SHA256withECDSA".to_string(),
            cause: CryptoError::MalformedDerSignature,
        }
    );

    let error = algorithm.verify_content(SIGNING_INPUT, &[]).unwrap_err();
    assert_eq!(error.cause(), Some(&CryptoError::MalformedJoseSignature));

    // Only the signing call reached the engine.
    assert_eq!(engine.calls(), 1);
}

/// A custom ECDSA algorithm with a provider shared by two algorithms.
#[test]
fn test_custom_ecdsa_algorithm() -> anyhow::Result<()> {
    let keys: Arc<EcKeyProvider> = Arc::new(StaticKeyProvider::new(
        Some(ec_public(EC256_PUBLIC)),
        Some(ec_private(EcCurve::P256, EC256_PRIVATE)),
    ));

    let custom = Algorithm::ecdsa("X-ES256", "SHA256withECDSA", 32, keys.clone());
    let builtin = Algorithm::ecdsa256(keys);
    assert_eq!(custom.id(), "X-ES256");
    assert_eq!(custom.coordinate_size(), Some(32));

    let signature = custom.sign(SIGNING_INPUT)?;
    builtin.verify_content(SIGNING_INPUT, &signature)?;

    let token = TokenParts::new("eyJhbGciOiJYLUVTMjU2In0", "e30", signature);
    assert!(custom.verify(&token).unwrap_err().is_mismatch());
    Ok(())
}
