//! HMAC and RSA flows, plus the full algorithm catalogue.

use std::sync::Arc;

use jwt_algorithms::{
    Algorithm, AlgorithmError, AlgorithmId, CryptoError, KeyKind, RsaKeyProvider,
    RsaPrivateKey, RsaPublicKey, SignedToken, StaticKeyProvider, TokenParts,
};

use crate::common::{self, *};

/// HMAC tags have the digest's width and verify with the same secret.
#[test]
fn test_hmac_round_trip() -> anyhow::Result<()> {
    common::init_tracing();

    for (algorithm, width) in [
        (Algorithm::hmac256(HMAC_SECRET), 32),
        (Algorithm::hmac384(HMAC_SECRET), 48),
        (Algorithm::hmac512(HMAC_SECRET), 64),
    ] {
        let token = signed_token(&algorithm)?;
        assert_eq!(token.signature().len(), width);
        algorithm.verify(&token)?;
        assert_eq!(algorithm.signing_key_id(), None);
    }
    Ok(())
}

/// A different secret is a plain mismatch; a truncated tag is not.
#[test]
fn test_hmac_rejections() -> anyhow::Result<()> {
    let token = signed_token(&Algorithm::hmac256(HMAC_SECRET))?;

    let error = Algorithm::hmac256(b"another-secret")
        .verify(&token)
        .unwrap_err();
    assert!(error.is_mismatch());

    let truncated = TokenParts::new(token.header(), token.payload(), &token.signature()[..16]);
    let error = Algorithm::hmac256(HMAC_SECRET)
        .verify(&truncated)
        .unwrap_err();
    assert!(matches!(
        error.cause(),
        Some(CryptoError::SignatureNotReady(_))
    ));
    Ok(())
}

/// RSA signs with PKCS#8 and PKCS#1 keys alike, deterministically.
#[test]
fn test_rsa_key_formats() -> anyhow::Result<()> {
    let pkcs8 = Algorithm::rsa256_with_keys(
        Some(rsa_public(RSA_PUBLIC)),
        Some(rsa_private(RSA_PRIVATE)),
    );
    let pkcs1 = Algorithm::rsa256_with_keys(
        Some(rsa_public(RSA_PUBLIC)),
        Some(RsaPrivateKey::from_der(RSA_PRIVATE_PKCS1)?),
    );

    let token = signed_token(&pkcs8)?;
    assert_eq!(token.signature().len(), 256);
    pkcs1.verify(&token)?;

    assert_eq!(pkcs1.sign(SIGNING_INPUT)?, pkcs8.sign(SIGNING_INPUT)?);
    Ok(())
}

/// Missing RSA keys are reported with the exact outward error.
#[test]
fn test_rsa_missing_keys() -> anyhow::Result<()> {
    let keys: Arc<RsaKeyProvider> =
        Arc::new(StaticKeyProvider::<RsaPublicKey, RsaPrivateKey>::new(None, None));
    let algorithm = Algorithm::rsa512(keys);

    assert_eq!(
        algorithm.sign(SIGNING_INPUT).unwrap_err(),
        AlgorithmError::SignatureGeneration {
            algorithm: "SHA512withRSA".to_string(),
            cause: CryptoError::MissingKey(KeyKind::Private),
        }
    );

    let signature = Algorithm::rsa512_with_keys(None, Some(rsa_private(RSA_PRIVATE)))
        .sign(SIGNING_INPUT)?;
    assert_eq!(
        algorithm.verify_content(SIGNING_INPUT, &signature).unwrap_err(),
        AlgorithmError::SignatureVerification {
            algorithm: "SHA512withRSA".to_string(),
            cause: Some(CryptoError::MissingKey(KeyKind::Public)),
        }
    );
    Ok(())
}

/// The wrong public key is a mismatch; a wrongly sized signature is not.
#[test]
fn test_rsa_rejections() -> anyhow::Result<()> {
    let signer = Algorithm::rsa384_with_keys(None, Some(rsa_private(RSA_PRIVATE)));
    let token = signed_token(&signer)?;

    let verifier = Algorithm::rsa384_with_keys(Some(rsa_public(RSA_OTHER_PUBLIC)), None);
    assert!(verifier.verify(&token).unwrap_err().is_mismatch());

    let verifier = Algorithm::rsa384_with_keys(Some(rsa_public(RSA_PUBLIC)), None);
    verifier.verify(&token)?;

    let short = TokenParts::new(token.header(), token.payload(), &token.signature()[1..]);
    let error = verifier.verify(&short).unwrap_err();
    assert!(matches!(
        error.cause(),
        Some(CryptoError::SignatureNotReady(_))
    ));
    Ok(())
}

/// Every built-in algorithm round-trips and carries its catalogue identity.
#[test]
fn test_catalogue_round_trips() -> anyhow::Result<()> {
    let algorithms = all_algorithms();
    assert_eq!(algorithms.len(), AlgorithmId::ALL.len());

    for (algorithm, id) in algorithms.iter().zip(AlgorithmId::ALL) {
        assert_eq!(algorithm.id(), id.jwa_name());
        assert_eq!(algorithm.description(), id.description());
        assert_eq!(algorithm.family(), id.family());
        assert_eq!(algorithm.coordinate_size(), id.coordinate_size());

        let token = signed_token(algorithm)?;
        algorithm.verify(&token)?;
    }
    Ok(())
}
