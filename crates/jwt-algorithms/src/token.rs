//! Token message view.
//!
//! Parsing and base64url decoding happen elsewhere. Verification only needs
//! the encoded header and payload segments, the decoded signature and the
//! header's key id.

/// A decoded token ready for signature verification.
pub trait SignedToken {
    /// Encoded header segment.
    fn header(&self) -> &[u8];

    /// Encoded payload segment.
    fn payload(&self) -> &[u8];

    /// Decoded signature bytes.
    fn signature(&self) -> &[u8];

    /// The header's `kid`, if present.
    fn key_id(&self) -> Option<&str> {
        None
    }
}

/// Owned [`SignedToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    header: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
    key_id: Option<String>,
}

impl TokenParts {
    /// Creates a token view from its encoded segments and decoded signature.
    #[must_use]
    pub fn new(
        header: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            header: header.into(),
            payload: payload.into(),
            signature: signature.into(),
            key_id: None,
        }
    }

    /// Sets the key id used to look up the verification key.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl SignedToken for TokenParts {
    fn header(&self) -> &[u8] {
        &self.header
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

/// Builds `header || '.' || payload`.
pub(crate) fn signing_input(header: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(header.len() + payload.len() + 1);
    input.extend_from_slice(header);
    input.push(b'.');
    input.extend_from_slice(payload);
    input
}
