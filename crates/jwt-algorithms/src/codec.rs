//! ECDSA signature codec.
//!
//! Tokens carry ECDSA signatures in JOSE form: `R || S`, each big-endian and
//! left-padded to the curve's coordinate size. The engine produces and
//! consumes the ASN.1 DER form, `SEQUENCE { INTEGER r, INTEGER s }`. The
//! functions here convert between the two and reject anything that is not a
//! well-formed encoding of either.

use crate::der::{self, DerError, DerReader, TAG_SEQUENCE};
use crate::error::CryptoError;

fn malformed_der(_: DerError) -> CryptoError {
    CryptoError::MalformedDerSignature
}

/// Length of a JOSE signature, or `None` for an unusable coordinate size.
const fn jose_len(coordinate_size: usize) -> Option<usize> {
    if coordinate_size == 0 {
        return None;
    }
    coordinate_size.checked_mul(2)
}

/// Fails unless `jose` is exactly two coordinates long.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedJoseSignature`] on a length mismatch or
/// a zero coordinate size.
pub const fn validate_jose_shape(jose: &[u8], coordinate_size: usize) -> Result<(), CryptoError> {
    match jose_len(coordinate_size) {
        Some(len) if jose.len() == len => Ok(()),
        _ => Err(CryptoError::MalformedJoseSignature),
    }
}

/// Converts a JOSE `R || S` signature into DER.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedJoseSignature`] if `jose` is not
/// `2 * coordinate_size` bytes long.
pub fn jose_to_der(jose: &[u8], coordinate_size: usize) -> Result<Vec<u8>, CryptoError> {
    validate_jose_shape(jose, coordinate_size)?;
    let (r, s) = jose.split_at(coordinate_size);

    let mut body = Vec::with_capacity(jose.len() + 6);
    der::write_unsigned_integer(&mut body, r);
    der::write_unsigned_integer(&mut body, s);

    let mut out = Vec::with_capacity(body.len() + 3);
    der::write_tlv(&mut out, TAG_SEQUENCE, &body);
    Ok(out)
}

/// Converts a DER signature into JOSE `R || S` form.
///
/// Each integer must be canonical and fit in `coordinate_size` bytes once
/// its sign-padding byte is removed. The sequence must span the whole input.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedDerSignature`] for any structural
/// deviation, or for a zero coordinate size.
pub fn der_to_jose(der: &[u8], coordinate_size: usize) -> Result<Vec<u8>, CryptoError> {
    let len = jose_len(coordinate_size).ok_or(CryptoError::MalformedDerSignature)?;

    let mut outer = DerReader::new(der);
    let mut sequence = outer.read_sequence().map_err(malformed_der)?;
    outer.finish().map_err(malformed_der)?;

    let r = sequence.read_unsigned_integer().map_err(malformed_der)?;
    let s = sequence.read_unsigned_integer().map_err(malformed_der)?;
    sequence.finish().map_err(malformed_der)?;

    let mut jose = vec![0u8; len];
    for (scalar, slot) in [r, s].into_iter().zip(jose.chunks_exact_mut(coordinate_size)) {
        if scalar.len() > coordinate_size {
            return Err(CryptoError::MalformedDerSignature);
        }
        slot[coordinate_size - scalar.len()..].copy_from_slice(scalar);
    }
    Ok(jose)
}

/// Fails unless both R and S of a JOSE signature lie in `[1, order)`.
///
/// `jose` must already have passed [`validate_jose_shape`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidSignatureValue`] for a zero or
/// out-of-range scalar.
pub fn validate_scalar_range(jose: &[u8], order: &[u8]) -> Result<(), CryptoError> {
    let (r, s) = jose.split_at(jose.len() / 2);
    for scalar in [r, s] {
        let scalar = strip_leading_zeros(scalar);
        if scalar.is_empty() || !is_less_than(scalar, strip_leading_zeros(order)) {
            return Err(CryptoError::InvalidSignatureValue);
        }
    }
    Ok(())
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    &bytes[skip..]
}

// Both operands are minimal big-endian magnitudes.
fn is_less_than(a: &[u8], b: &[u8]) -> bool {
    a.len() < b.len() || (a.len() == b.len() && a < b)
}
