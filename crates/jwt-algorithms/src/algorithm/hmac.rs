//! HMAC family: the shared secret goes straight to the engine.

use crate::engine::{CryptoAdapter, KeyMaterial};
use crate::error::CryptoError;

pub(super) fn sign(
    adapter: &CryptoAdapter,
    description: &str,
    secret: &[u8],
    content: &[u8],
    engine: Option<&str>,
) -> Result<Vec<u8>, CryptoError> {
    adapter.create_signature(description, KeyMaterial::Secret(secret), content, engine)
}

pub(super) fn verify(
    adapter: &CryptoAdapter,
    description: &str,
    secret: &[u8],
    content: &[u8],
    signature: &[u8],
    engine: Option<&str>,
) -> Result<bool, CryptoError> {
    adapter.verify_signature(
        description,
        KeyMaterial::Secret(secret),
        content,
        signature,
        engine,
    )
}
