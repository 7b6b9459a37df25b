//! RSA family: keys come from the provider, signatures pass through as-is.

use crate::engine::{CryptoAdapter, KeyMaterial};
use crate::error::CryptoError;
use crate::keys::{KeyKind, RsaKeyProvider};

pub(super) fn sign(
    adapter: &CryptoAdapter,
    description: &str,
    keys: &RsaKeyProvider,
    content: &[u8],
    engine: Option<&str>,
) -> Result<Vec<u8>, CryptoError> {
    let private_key = keys
        .private_key()
        .ok_or(CryptoError::MissingKey(KeyKind::Private))?;
    adapter.create_signature(
        description,
        KeyMaterial::RsaPrivate(&private_key),
        content,
        engine,
    )
}

pub(super) fn verify(
    adapter: &CryptoAdapter,
    description: &str,
    keys: &RsaKeyProvider,
    content: &[u8],
    signature: &[u8],
    key_id: Option<&str>,
    engine: Option<&str>,
) -> Result<bool, CryptoError> {
    let public_key = keys
        .public_key_by_id(key_id)
        .ok_or(CryptoError::MissingKey(KeyKind::Public))?;
    adapter.verify_signature(
        description,
        KeyMaterial::RsaPublic(&public_key),
        content,
        signature,
        engine,
    )
}
