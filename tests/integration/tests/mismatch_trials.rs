//! Random and tampered signatures must never verify.

use rand::Rng;

use jwt_algorithms::{AlgorithmError, CryptoError, SignedToken, TokenParts};

use crate::common::*;

const TRIALS: usize = 1000;

/// A rejection is either a plain mismatch or an out-of-range scalar.
fn assert_rejected(error: &AlgorithmError) {
    assert!(
        matches!(error, AlgorithmError::SignatureVerification { .. }),
        "unexpected error: {error}"
    );
    match error.cause() {
        None | Some(CryptoError::InvalidSignatureValue) => {}
        Some(other) => panic!("unexpected cause: {other}"),
    }
}

/// Random 64-byte signatures never verify under ES256.
#[test]
fn test_random_es256_signatures_are_rejected() {
    let algorithm = es256();
    let mut rng = rand::rng();
    let mut signature = [0u8; 64];

    for _ in 0..TRIALS {
        rng.fill(&mut signature[..]);
        let error = algorithm
            .verify_content(SIGNING_INPUT, &signature)
            .expect_err("random signature verified");
        assert_rejected(&error);
    }
}

/// Random 132-byte signatures with P-521-sized scalars never verify.
#[test]
fn test_random_es512_signatures_are_rejected() {
    let algorithm = es512();
    let mut rng = rand::rng();
    let mut signature = [0u8; 132];

    for _ in 0..TRIALS / 4 {
        rng.fill(&mut signature[..]);
        // Keep each scalar within 521 bits so most trials reach the engine.
        signature[0] &= 0x01;
        signature[66] &= 0x01;
        let error = algorithm
            .verify_content(SIGNING_INPUT, &signature)
            .expect_err("random signature verified");
        assert_rejected(&error);
    }
}

/// Flipping any single bit of a valid signature breaks it.
#[test]
fn test_bit_flips_are_rejected() -> anyhow::Result<()> {
    let mut rng = rand::rng();

    for algorithm in [es256(), es384()] {
        let token = signed_token(&algorithm)?;
        algorithm.verify(&token)?;

        for _ in 0..64 {
            let mut signature = token.signature().to_vec();
            let bit = rng.random_range(0..signature.len() * 8);
            signature[bit / 8] ^= 1 << (bit % 8);

            let tampered = TokenParts::new(token.header(), token.payload(), signature);
            let error = algorithm.verify(&tampered).unwrap_err();
            assert_rejected(&error);
        }
    }
    Ok(())
}

/// Tampering with the payload invalidates every algorithm's signature.
#[test]
fn test_payload_tampering_is_rejected() -> anyhow::Result<()> {
    let payload = b64(br#"{"iss":"auth0","sub":"admin"}"#);

    for algorithm in all_algorithms() {
        let token = signed_token(&algorithm)?;
        let tampered = TokenParts::new(token.header(), payload.as_bytes(), token.signature());

        let error = algorithm.verify(&tampered).unwrap_err();
        assert!(error.is_mismatch(), "{}: {error}", algorithm.id());
    }
    Ok(())
}
