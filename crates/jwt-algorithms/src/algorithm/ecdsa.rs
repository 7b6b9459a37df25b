//! ECDSA family.
//!
//! The engine speaks DER while tokens carry JOSE `R || S`, so signing
//! converts the engine output and verification converts the token signature
//! before handing it over. Verification rejects a wrongly sized or
//! out-of-range signature without calling the engine.

use crate::codec;
use crate::engine::{CryptoAdapter, KeyMaterial};
use crate::error::CryptoError;
use crate::keys::{EcKeyProvider, KeyKind};

pub(super) fn sign(
    adapter: &CryptoAdapter,
    description: &str,
    coordinate_size: usize,
    keys: &EcKeyProvider,
    content: &[u8],
    engine: Option<&str>,
) -> Result<Vec<u8>, CryptoError> {
    let private_key = keys
        .private_key()
        .ok_or(CryptoError::MissingKey(KeyKind::Private))?;
    let der = adapter.create_signature(
        description,
        KeyMaterial::EcPrivate(&private_key),
        content,
        engine,
    )?;
    // A DER error here means the engine misbehaved; it is reported as a
    // generation failure like any other.
    codec::der_to_jose(&der, coordinate_size)
}

#[allow(clippy::too_many_arguments)]
pub(super) fn verify(
    adapter: &CryptoAdapter,
    description: &str,
    coordinate_size: usize,
    keys: &EcKeyProvider,
    content: &[u8],
    signature: &[u8],
    key_id: Option<&str>,
    engine: Option<&str>,
) -> Result<bool, CryptoError> {
    let public_key = keys
        .public_key_by_id(key_id)
        .ok_or(CryptoError::MissingKey(KeyKind::Public))?;

    codec::validate_jose_shape(signature, coordinate_size)?;
    codec::validate_scalar_range(signature, public_key.curve().order())?;
    let der = codec::jose_to_der(signature, coordinate_size)?;

    adapter.verify_signature(
        description,
        KeyMaterial::EcPublic(&public_key),
        content,
        &der,
        engine,
    )
}
