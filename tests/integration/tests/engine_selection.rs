//! Engine registry, per-call overrides and configuration.

use std::sync::Arc;

use jwt_algorithms::{Algorithm, CryptoAdapter, CryptoError, EngineConfig};

use crate::common::{self, *};

fn failing_adapter(cause: CryptoError) -> Arc<CryptoAdapter> {
    Arc::new(CryptoAdapter::new().with_engine(Arc::new(FailingEngine { cause })))
}

/// Naming an unregistered engine fails both directions with `NoSuchEngine`.
#[test]
fn test_unknown_engine_is_reported() -> anyhow::Result<()> {
    common::init_tracing();

    for algorithm in all_algorithms() {
        let error = algorithm
            .sign_with_engine(SIGNING_INPUT, "hsm")
            .unwrap_err();
        assert_eq!(
            error.cause(),
            Some(&CryptoError::NoSuchEngine("hsm".to_string())),
            "{}",
            algorithm.id()
        );

        let token = signed_token(&algorithm)?;
        let error = algorithm.verify_with_engine(&token, "hsm").unwrap_err();
        assert_eq!(
            error.cause(),
            Some(&CryptoError::NoSuchEngine("hsm".to_string()))
        );
        assert!(!error.is_mismatch());
    }
    Ok(())
}

/// An engine failure surfaces as the cause of the outward error.
#[test]
fn test_engine_failures_propagate() -> anyhow::Result<()> {
    let cause = CryptoError::SignatureNotReady("device offline".to_string());
    let adapter = failing_adapter(cause.clone());

    for algorithm in all_algorithms() {
        let token = signed_token(&algorithm)?;
        let algorithm = algorithm.with_adapter(adapter.clone());

        // The default engine is untouched.
        algorithm.verify(&token)?;

        let error = algorithm
            .sign_token_with_engine(b"header", b"payload", FailingEngine::NAME)
            .unwrap_err();
        assert_eq!(error.cause(), Some(&cause));
        assert_eq!(error.algorithm(), algorithm.description());

        let error = algorithm
            .verify_with_engine(&token, FailingEngine::NAME)
            .unwrap_err();
        assert_eq!(error.cause(), Some(&cause));
    }
    Ok(())
}

/// Per-call overrides reach the named engine and nothing else.
#[test]
fn test_override_routes_to_named_engine() -> anyhow::Result<()> {
    let counting = Arc::new(CountingEngine::default());
    let adapter = Arc::new(CryptoAdapter::new().with_engine(counting.clone()));
    let algorithm = Algorithm::hmac256(HMAC_SECRET).with_adapter(adapter);

    let signature = algorithm.sign(SIGNING_INPUT)?;
    algorithm.verify_content(SIGNING_INPUT, &signature)?;
    assert_eq!(counting.calls(), 0);

    let overridden = algorithm.sign_with_engine(SIGNING_INPUT, CountingEngine::NAME)?;
    assert_eq!(overridden, signature);
    algorithm.verify_content_with_engine(SIGNING_INPUT, &overridden, CountingEngine::NAME)?;
    assert_eq!(counting.calls(), 2);
    Ok(())
}

/// A configured default engine serves calls that name none.
#[test]
fn test_configured_default_engine() -> anyhow::Result<()> {
    let config = EngineConfig::from_lookup(|key| {
        (key == "JWT_CRYPTO_ENGINE").then(|| CountingEngine::NAME.to_string())
    });
    assert_eq!(config.default_engine, CountingEngine::NAME);

    // Only built-in engines can be named before registration.
    assert_eq!(
        CryptoAdapter::from_config(&config).unwrap_err(),
        CryptoError::NoSuchEngine(CountingEngine::NAME.to_string())
    );

    let counting = Arc::new(CountingEngine::default());
    let adapter = CryptoAdapter::new()
        .with_engine(counting.clone())
        .with_default_engine(&config.default_engine)?;
    assert_eq!(adapter.engine_names(), vec!["aws-lc-rs", "counting"]);

    let algorithm = es384().with_adapter(Arc::new(adapter));
    let token = signed_token(&algorithm)?;
    algorithm.verify(&token)?;
    assert_eq!(counting.calls(), 2);
    Ok(())
}

/// The built-in configuration resolves to the aws-lc-rs engine.
#[test]
fn test_default_config_uses_aws_lc() -> anyhow::Result<()> {
    let adapter = CryptoAdapter::from_config(&EngineConfig::from_lookup(|_| None))?;
    assert_eq!(adapter.default_engine(), "aws-lc-rs");
    assert!(adapter.has_engine("aws-lc-rs"));

    let algorithm = es256().with_adapter(Arc::new(adapter));
    algorithm.verify(&signed_token(&algorithm)?)?;
    Ok(())
}
