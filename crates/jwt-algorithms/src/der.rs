//! Minimal strict ASN.1 DER reading and writing.
//!
//! Only the handful of constructs needed by the signature codec and the key
//! parsers are supported: definite-length TLVs, `SEQUENCE`, `INTEGER`,
//! `BIT STRING` and `OBJECT IDENTIFIER`. Anything that is not canonical DER
//! is rejected.

use thiserror::Error;

/// ASN.1 `INTEGER` tag.
pub const TAG_INTEGER: u8 = 0x02;
/// ASN.1 `BIT STRING` tag.
pub const TAG_BIT_STRING: u8 = 0x03;
/// ASN.1 `NULL` tag.
pub const TAG_NULL: u8 = 0x05;
/// ASN.1 `OBJECT IDENTIFIER` tag.
pub const TAG_OID: u8 = 0x06;
/// ASN.1 constructed `SEQUENCE` tag.
pub const TAG_SEQUENCE: u8 = 0x30;

/// Error type for DER decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerError {
    /// Input ended before the structure was complete.
    #[error("unexpected end of DER input")]
    Truncated,

    /// A tag other than the expected one was found.
    #[error("expected DER tag 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedTag {
        /// Tag required at this position.
        expected: u8,
        /// Tag actually present.
        found: u8,
    },

    /// The length field is indefinite, oversized or not minimally encoded.
    #[error("invalid DER length encoding")]
    InvalidLength,

    /// An `INTEGER` is empty, negative or carries redundant leading zeros.
    #[error("non-canonical DER integer")]
    NonCanonicalInteger,

    /// Bytes remain after the outermost structure.
    #[error("trailing data after DER structure")]
    TrailingData,
}

/// Cursor over a DER byte buffer.
#[derive(Debug, Clone)]
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns the next tag without consuming it.
    #[must_use]
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Fails unless every byte has been consumed.
    pub const fn finish(&self) -> Result<(), DerError> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(DerError::TrailingData)
        }
    }

    /// Reads a TLV with the given tag and returns its value bytes.
    pub fn read_tlv(&mut self, tag: u8) -> Result<&'a [u8], DerError> {
        let found = self.read_byte()?;
        if found != tag {
            return Err(DerError::UnexpectedTag {
                expected: tag,
                found,
            });
        }
        let len = self.read_length()?;
        self.take(len)
    }

    /// Reads a `SEQUENCE` and returns a reader over its contents.
    pub fn read_sequence(&mut self) -> Result<DerReader<'a>, DerError> {
        self.read_tlv(TAG_SEQUENCE).map(DerReader::new)
    }

    /// Reads a canonical unsigned `INTEGER` and returns its magnitude.
    ///
    /// The sign-padding byte, if any, is stripped. Zero is returned as a
    /// single `0x00` byte.
    pub fn read_unsigned_integer(&mut self) -> Result<&'a [u8], DerError> {
        let value = self.read_tlv(TAG_INTEGER)?;
        match value {
            [] => Err(DerError::NonCanonicalInteger),
            [0x00] => Ok(value),
            [0x00, next, ..] if next & 0x80 != 0 => Ok(&value[1..]),
            [0x00, ..] => Err(DerError::NonCanonicalInteger),
            [first, ..] if first & 0x80 != 0 => Err(DerError::NonCanonicalInteger),
            _ => Ok(value),
        }
    }

    fn read_byte(&mut self) -> Result<u8, DerError> {
        let byte = *self.data.get(self.pos).ok_or(DerError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DerError> {
        let end = self.pos.checked_add(len).ok_or(DerError::Truncated)?;
        let bytes = self.data.get(self.pos..end).ok_or(DerError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a definite length in short or long form.
    fn read_length(&mut self) -> Result<usize, DerError> {
        let first = self.read_byte()?;
        if first < 0x80 {
            return Ok(usize::from(first));
        }

        let num_bytes = usize::from(first & 0x7F);
        if num_bytes == 0 || num_bytes > std::mem::size_of::<usize>() {
            return Err(DerError::InvalidLength);
        }

        let bytes = self.take(num_bytes)?;
        if bytes[0] == 0 {
            return Err(DerError::InvalidLength);
        }
        let len = bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));

        // Long form is only valid for lengths that do not fit the short form.
        if len < 0x80 {
            return Err(DerError::InvalidLength);
        }
        Ok(len)
    }
}

/// Appends a definite length, using the short form below 128.
pub fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        #[allow(clippy::cast_possible_truncation)]
        out.push(len as u8);
        return;
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];
    #[allow(clippy::cast_possible_truncation)]
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Appends a TLV with the given tag and value.
pub fn write_tlv(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    write_length(out, value.len());
    out.extend_from_slice(value);
}

/// Appends `magnitude` as a canonical non-negative `INTEGER`.
///
/// Leading zero bytes are stripped and a single `0x00` is prepended when the
/// first remaining byte has its high bit set.
pub fn write_unsigned_integer(out: &mut Vec<u8>, magnitude: &[u8]) {
    let skip = magnitude.iter().take_while(|&&b| b == 0).count();
    let trimmed = &magnitude[skip..];

    match trimmed.first() {
        None => write_tlv(out, TAG_INTEGER, &[0x00]),
        Some(first) if first & 0x80 != 0 => {
            out.push(TAG_INTEGER);
            write_length(out, trimmed.len() + 1);
            out.push(0x00);
            out.extend_from_slice(trimmed);
        }
        Some(_) => write_tlv(out, TAG_INTEGER, trimmed),
    }
}
