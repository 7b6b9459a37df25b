//! Key types and the key provider boundary.
//!
//! Asymmetric algorithms never hold keys directly. They ask a
//! [`KeyProvider`] on every call, so rotation and storage stay with the
//! caller. [`StaticKeyProvider`] covers the common case of a fixed key pair.
//!
//! Private key bytes are wiped on drop and never appear in `Debug` output.

use std::fmt;

use aws_lc_rs::signature::{EcdsaKeyPair, KeyPair, RsaKeyPair};
use zeroize::Zeroizing;

use crate::algorithm::EcCurve;
use crate::der::{DerError, DerReader, TAG_BIT_STRING, TAG_NULL, TAG_OID};
use crate::engine::aws_lc::ecdsa_signing_algorithm;
use crate::error::CryptoError;

/// Minimum accepted RSA modulus size.
pub const MIN_RSA_BITS: usize = 2048;

// id-ecPublicKey (1.2.840.10045.2.1)
const EC_PUBLIC_KEY_OID: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
// rsaEncryption (1.2.840.113549.1.1.1)
const RSA_ENCRYPTION_OID: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

/// Which half of a key pair an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Public key, used to verify.
    Public,
    /// Private key, used to sign.
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Private => f.write_str("private"),
        }
    }
}

fn invalid_key(what: &str) -> impl Fn(DerError) -> CryptoError + '_ {
    move |e| CryptoError::InvalidKey(format!("malformed {what}: {e}"))
}

/// Reads a `SubjectPublicKeyInfo` and returns its algorithm parameters and
/// the contents of the key bit string.
fn parse_spki<'a>(
    der: &'a [u8],
    algorithm_oid: &[u8],
) -> Result<(DerReader<'a>, &'a [u8]), CryptoError> {
    let on_error = invalid_key("SubjectPublicKeyInfo");

    let mut outer = DerReader::new(der);
    let mut spki = outer.read_sequence().map_err(&on_error)?;
    outer.finish().map_err(&on_error)?;

    let mut algorithm = spki.read_sequence().map_err(&on_error)?;
    let oid = algorithm.read_tlv(TAG_OID).map_err(&on_error)?;
    if oid != algorithm_oid {
        return Err(CryptoError::InvalidKey(
            "unexpected public key algorithm".to_string(),
        ));
    }

    let bits = spki.read_tlv(TAG_BIT_STRING).map_err(&on_error)?;
    spki.finish().map_err(&on_error)?;
    match bits.split_first() {
        Some((0, key)) => Ok((algorithm, key)),
        _ => Err(CryptoError::InvalidKey(
            "public key bit string has unused bits".to_string(),
        )),
    }
}

/// An elliptic-curve public key as an uncompressed SEC1 point.
#[derive(Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: EcCurve,
    point: Vec<u8>,
}

impl EcPublicKey {
    /// Wraps an uncompressed point (`0x04 || X || Y`) on `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the point has the wrong length
    /// or prefix. Whether it lies on the curve is checked when verifying.
    pub fn from_uncompressed_point(curve: EcCurve, point: &[u8]) -> Result<Self, CryptoError> {
        if point.len() != curve.uncompressed_point_len() || point[0] != 0x04 {
            return Err(CryptoError::InvalidKey(format!(
                "expected an uncompressed {} point of {} bytes",
                curve.name(),
                curve.uncompressed_point_len()
            )));
        }
        Ok(Self {
            curve,
            point: point.to_vec(),
        })
    }

    /// Parses an X.509 `SubjectPublicKeyInfo`, taking the curve from its
    /// named-curve parameter.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the structure is malformed, the
    /// key is not an EC key or the curve is not supported.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (mut params, point) = parse_spki(der, EC_PUBLIC_KEY_OID)?;
        let on_error = invalid_key("EC parameters");
        let curve_oid = params.read_tlv(TAG_OID).map_err(&on_error)?;
        params.finish().map_err(&on_error)?;

        let curve = EcCurve::from_oid(curve_oid)
            .ok_or_else(|| CryptoError::InvalidKey("unsupported named curve".to_string()))?;
        Self::from_uncompressed_point(curve, point)
    }

    /// Returns the curve.
    #[must_use]
    pub const fn curve(&self) -> EcCurve {
        self.curve
    }

    /// Returns the uncompressed point.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }
}

impl fmt::Debug for EcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPublicKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// An elliptic-curve private key held as PKCS#8 DER.
#[derive(Clone)]
pub struct EcPrivateKey {
    curve: EcCurve,
    pkcs8: Zeroizing<Vec<u8>>,
    public: EcPublicKey,
}

impl EcPrivateKey {
    /// Parses a PKCS#8 `PrivateKeyInfo` for `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the document is malformed or
    /// holds a key on a different curve.
    pub fn from_pkcs8(curve: EcCurve, der: &[u8]) -> Result<Self, CryptoError> {
        let algorithm = ecdsa_signing_algorithm(curve, curve.hash_algorithm()).ok_or_else(|| {
            CryptoError::InvalidKey(format!("curve {} is not supported", curve.name()))
        })?;
        let key_pair = EcdsaKeyPair::from_pkcs8(algorithm, der).map_err(|e| {
            CryptoError::InvalidKey(format!("invalid {} PKCS#8 key: {e}", curve.name()))
        })?;
        let public = EcPublicKey::from_uncompressed_point(curve, key_pair.public_key().as_ref())?;

        Ok(Self {
            curve,
            pkcs8: Zeroizing::new(der.to_vec()),
            public,
        })
    }

    /// Returns the curve.
    #[must_use]
    pub const fn curve(&self) -> EcCurve {
        self.curve
    }

    /// Returns the matching public key.
    #[must_use]
    pub fn public_key(&self) -> EcPublicKey {
        self.public.clone()
    }

    pub(crate) fn pkcs8_der(&self) -> &[u8] {
        &self.pkcs8
    }
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// An RSA public key held as PKCS#1 `RSAPublicKey` DER.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pkcs1: Vec<u8>,
    modulus_len: usize,
}

impl RsaPublicKey {
    /// Parses either a PKCS#1 `RSAPublicKey` or an X.509
    /// `SubjectPublicKeyInfo` carrying one.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if neither form parses or the
    /// modulus is shorter than [`MIN_RSA_BITS`].
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let pkcs1 = match parse_spki(der, RSA_ENCRYPTION_OID) {
            Ok((mut params, key)) => {
                let on_error = invalid_key("RSA parameters");
                params.read_tlv(TAG_NULL).map_err(&on_error)?;
                params.finish().map_err(&on_error)?;
                key
            }
            Err(_) => der,
        };
        Self::from_pkcs1(pkcs1)
    }

    fn from_pkcs1(der: &[u8]) -> Result<Self, CryptoError> {
        let on_error = invalid_key("RSAPublicKey");
        let mut outer = DerReader::new(der);
        let mut key = outer.read_sequence().map_err(&on_error)?;
        outer.finish().map_err(&on_error)?;
        let modulus = key.read_unsigned_integer().map_err(&on_error)?;
        key.read_unsigned_integer().map_err(&on_error)?;
        key.finish().map_err(&on_error)?;

        check_modulus_len(modulus.len())?;
        Ok(Self {
            pkcs1: der.to_vec(),
            modulus_len: modulus.len(),
        })
    }

    /// Returns the modulus length in bytes, which is also the signature
    /// length.
    #[must_use]
    pub const fn modulus_len(&self) -> usize {
        self.modulus_len
    }

    /// Returns the PKCS#1 `RSAPublicKey` encoding.
    #[must_use]
    pub fn as_pkcs1_der(&self) -> &[u8] {
        &self.pkcs1
    }
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("bits", &(self.modulus_len * 8))
            .finish_non_exhaustive()
    }
}

fn check_modulus_len(len: usize) -> Result<(), CryptoError> {
    let bits = len * 8;
    if bits < MIN_RSA_BITS {
        return Err(CryptoError::InvalidKey(format!(
            "RSA key size {bits} bits is below the minimum of {MIN_RSA_BITS} bits"
        )));
    }
    Ok(())
}

/// Encoding of a stored RSA private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RsaPrivateFormat {
    Pkcs8,
    Pkcs1,
}

/// An RSA private key held as DER.
#[derive(Clone)]
pub struct RsaPrivateKey {
    der: Zeroizing<Vec<u8>>,
    format: RsaPrivateFormat,
    public: RsaPublicKey,
}

impl RsaPrivateKey {
    /// Parses a PKCS#8 `PrivateKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the document is malformed or
    /// the modulus is shorter than [`MIN_RSA_BITS`].
    pub fn from_pkcs8(der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_pkcs8(der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA PKCS#8 key: {e}")))?;
        Self::from_key_pair(&key_pair, der, RsaPrivateFormat::Pkcs8)
    }

    /// Parses a PKCS#1 `RSAPrivateKey`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the document is malformed or
    /// the modulus is shorter than [`MIN_RSA_BITS`].
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA DER key: {e}")))?;
        Self::from_key_pair(&key_pair, der, RsaPrivateFormat::Pkcs1)
    }

    fn from_key_pair(
        key_pair: &RsaKeyPair,
        der: &[u8],
        format: RsaPrivateFormat,
    ) -> Result<Self, CryptoError> {
        check_modulus_len(key_pair.public_modulus_len())?;
        let public = RsaPublicKey::from_pkcs1(key_pair.public_key().as_ref())?;

        Ok(Self {
            der: Zeroizing::new(der.to_vec()),
            format,
            public,
        })
    }

    /// Returns the matching public key.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        self.public.clone()
    }

    /// Returns the modulus length in bytes.
    #[must_use]
    pub const fn modulus_len(&self) -> usize {
        self.public.modulus_len
    }

    pub(crate) fn der(&self) -> (&[u8], RsaPrivateFormat) {
        (&self.der, self.format)
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &(self.modulus_len() * 8))
            .finish_non_exhaustive()
    }
}

/// Source of keys for an asymmetric algorithm.
///
/// Called on every sign or verify; implementations must be thread-safe and
/// should be cheap. Returning `None` is not an error here, the algorithm
/// turns it into a missing-key failure.
pub trait KeyProvider<Pub, Priv>: Send + Sync {
    /// Returns the public key for `key_id`, or the default key when the
    /// token carries no key id.
    fn public_key_by_id(&self, key_id: Option<&str>) -> Option<Pub>;

    /// Returns the private key used for signing.
    fn private_key(&self) -> Option<Priv>;

    /// Returns the identifier of the signing key, if it has one.
    fn private_key_id(&self) -> Option<String>;
}

/// Key provider for RSA algorithms.
pub type RsaKeyProvider = dyn KeyProvider<RsaPublicKey, RsaPrivateKey>;

/// Key provider for ECDSA algorithms.
pub type EcKeyProvider = dyn KeyProvider<EcPublicKey, EcPrivateKey>;

/// Provider for a fixed, optional key pair without key ids.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider<Pub, Priv> {
    public: Option<Pub>,
    private: Option<Priv>,
}

impl<Pub, Priv> StaticKeyProvider<Pub, Priv> {
    /// Creates a provider from whichever halves are available.
    #[must_use]
    pub const fn new(public: Option<Pub>, private: Option<Priv>) -> Self {
        Self { public, private }
    }
}

impl<Pub, Priv> KeyProvider<Pub, Priv> for StaticKeyProvider<Pub, Priv>
where
    Pub: Clone + Send + Sync,
    Priv: Clone + Send + Sync,
{
    fn public_key_by_id(&self, _key_id: Option<&str>) -> Option<Pub> {
        self.public.clone()
    }

    fn private_key(&self) -> Option<Priv> {
        self.private.clone()
    }

    fn private_key_id(&self) -> Option<String> {
        None
    }
}
