//! JWA algorithm identifiers, digests and curves.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Digest used by a signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256.
    #[serde(rename = "SHA256")]
    Sha256,

    /// SHA-384.
    #[serde(rename = "SHA384")]
    Sha384,

    /// SHA-512.
    #[serde(rename = "SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Returns the algorithm name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

/// Algorithm family, which decides the key material and signature format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmFamily {
    /// Keyed-hash MAC over a shared secret.
    #[serde(rename = "HMAC")]
    Hmac,

    /// RSA PKCS#1 v1.5.
    #[serde(rename = "RSA")]
    Rsa,

    /// ECDSA with JOSE-encoded signatures.
    #[serde(rename = "ECDSA")]
    Ecdsa,
}

/// Elliptic curves usable for ECDSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1).
    #[serde(rename = "P-256")]
    P256,

    /// NIST P-384 (secp384r1).
    #[serde(rename = "P-384")]
    P384,

    /// NIST P-521 (secp521r1).
    #[serde(rename = "P-521")]
    P521,

    /// secp256k1.
    #[serde(rename = "secp256k1")]
    Secp256k1,
}

const P256_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63,
    0x25, 0x51,
];

const P384_ORDER: [u8; 48] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xc7, 0x63, 0x4d, 0x81, 0xf4, 0x37,
    0x2d, 0xdf, 0x58, 0x1a, 0x0d, 0xb2, 0x48, 0xb0, 0xa7, 0x7a, 0xec, 0xec, 0x19, 0x6a, 0xcc,
    0xc5, 0x29, 0x73,
];

const P521_ORDER: [u8; 66] = [
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfa, 0x51, 0x86, 0x87, 0x83, 0xbf, 0x2f, 0x96, 0x6b, 0x7f, 0xcc, 0x01,
    0x48, 0xf7, 0x09, 0xa5, 0xd0, 0x3b, 0xb5, 0xc9, 0xb8, 0x89, 0x9c, 0x47, 0xae, 0xbb, 0x6f,
    0xb7, 0x1e, 0x91, 0x38, 0x64, 0x09,
];

const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x41,
];

// Named-curve OID contents (without tag and length).
const P256_OID: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
const P384_OID: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x22];
const P521_OID: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x23];
const SECP256K1_OID: &[u8] = &[0x2b, 0x81, 0x04, 0x00, 0x0a];

impl EcCurve {
    /// Returns the curve name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Secp256k1 => "secp256k1",
        }
    }

    /// Returns the byte width of one field element, which is also the JOSE
    /// coordinate size of R and S.
    #[must_use]
    pub const fn field_size(self) -> usize {
        match self {
            Self::P256 | Self::Secp256k1 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// Returns the group order, big-endian, `field_size` bytes wide.
    #[must_use]
    pub const fn order(self) -> &'static [u8] {
        match self {
            Self::P256 => &P256_ORDER,
            Self::P384 => &P384_ORDER,
            Self::P521 => &P521_ORDER,
            Self::Secp256k1 => &SECP256K1_ORDER,
        }
    }

    /// Returns the contents of the named-curve object identifier.
    #[must_use]
    pub const fn oid(self) -> &'static [u8] {
        match self {
            Self::P256 => P256_OID,
            Self::P384 => P384_OID,
            Self::P521 => P521_OID,
            Self::Secp256k1 => SECP256K1_OID,
        }
    }

    /// Looks up a curve by its named-curve object identifier.
    #[must_use]
    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        [Self::P256, Self::P384, Self::P521, Self::Secp256k1]
            .into_iter()
            .find(|curve| curve.oid() == oid)
    }

    /// Parses a curve name.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] for an unknown curve.
    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name {
            "P-256" | "secp256r1" | "prime256v1" => Ok(Self::P256),
            "P-384" | "secp384r1" => Ok(Self::P384),
            "P-521" | "secp521r1" => Ok(Self::P521),
            "secp256k1" => Ok(Self::Secp256k1),
            _ => Err(CryptoError::InvalidKey(format!("unknown curve: {name}"))),
        }
    }

    /// Returns the digest this curve is paired with in JWA.
    #[must_use]
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::P256 | Self::Secp256k1 => HashAlgorithm::Sha256,
            Self::P384 => HashAlgorithm::Sha384,
            Self::P521 => HashAlgorithm::Sha512,
        }
    }

    /// Returns the length of an uncompressed SEC1 point on this curve.
    #[must_use]
    pub const fn uncompressed_point_len(self) -> usize {
        1 + 2 * self.field_size()
    }
}

/// JWA names of the built-in algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmId {
    /// HMAC with SHA-256.
    #[serde(rename = "HS256")]
    Hs256,

    /// HMAC with SHA-384.
    #[serde(rename = "HS384")]
    Hs384,

    /// HMAC with SHA-512.
    #[serde(rename = "HS512")]
    Hs512,

    /// RSA PKCS#1 v1.5 with SHA-256.
    #[serde(rename = "RS256")]
    Rs256,

    /// RSA PKCS#1 v1.5 with SHA-384.
    #[serde(rename = "RS384")]
    Rs384,

    /// RSA PKCS#1 v1.5 with SHA-512.
    #[serde(rename = "RS512")]
    Rs512,

    /// ECDSA using P-256 and SHA-256.
    #[serde(rename = "ES256")]
    Es256,

    /// ECDSA using P-384 and SHA-384.
    #[serde(rename = "ES384")]
    Es384,

    /// ECDSA using P-521 and SHA-512.
    #[serde(rename = "ES512")]
    Es512,

    /// ECDSA using secp256k1 and SHA-256.
    #[serde(rename = "ES256K")]
    Es256k,
}

impl AlgorithmId {
    /// Every built-in algorithm.
    pub const ALL: [Self; 10] = [
        Self::Hs256,
        Self::Hs384,
        Self::Hs512,
        Self::Rs256,
        Self::Rs384,
        Self::Rs512,
        Self::Es256,
        Self::Es384,
        Self::Es512,
        Self::Es256k,
    ];

    /// Returns the JWA algorithm name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
            Self::Es256k => "ES256K",
        }
    }

    /// Returns the name of the underlying primitive.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Hs256 => "HmacSHA256",
            Self::Hs384 => "HmacSHA384",
            Self::Hs512 => "HmacSHA512",
            Self::Rs256 => "SHA256withRSA",
            Self::Rs384 => "SHA384withRSA",
            Self::Rs512 => "SHA512withRSA",
            Self::Es256 | Self::Es256k => "SHA256withECDSA",
            Self::Es384 => "SHA384withECDSA",
            Self::Es512 => "SHA512withECDSA",
        }
    }

    /// Returns the algorithm family.
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => AlgorithmFamily::Hmac,
            Self::Rs256 | Self::Rs384 | Self::Rs512 => AlgorithmFamily::Rsa,
            Self::Es256 | Self::Es384 | Self::Es512 | Self::Es256k => AlgorithmFamily::Ecdsa,
        }
    }

    /// Returns the digest.
    #[must_use]
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::Hs256 | Self::Rs256 | Self::Es256 | Self::Es256k => HashAlgorithm::Sha256,
            Self::Hs384 | Self::Rs384 | Self::Es384 => HashAlgorithm::Sha384,
            Self::Hs512 | Self::Rs512 | Self::Es512 => HashAlgorithm::Sha512,
        }
    }

    /// Returns the curve for ECDSA algorithms.
    #[must_use]
    pub const fn curve(self) -> Option<EcCurve> {
        match self {
            Self::Es256 => Some(EcCurve::P256),
            Self::Es384 => Some(EcCurve::P384),
            Self::Es512 => Some(EcCurve::P521),
            Self::Es256k => Some(EcCurve::Secp256k1),
            _ => None,
        }
    }

    /// Returns the JOSE coordinate size for ECDSA algorithms.
    #[must_use]
    pub const fn coordinate_size(self) -> Option<usize> {
        match self.curve() {
            Some(curve) => Some(curve.field_size()),
            None => None,
        }
    }

    /// Parses a JWA algorithm name, as found in a token header `alg`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] for unknown names.
    pub fn from_jwa(name: &str) -> Result<Self, CryptoError> {
        Self::ALL
            .into_iter()
            .find(|id| id.jwa_name() == name)
            .ok_or_else(|| CryptoError::UnsupportedAlgorithm(name.to_string()))
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.jwa_name())
    }
}
