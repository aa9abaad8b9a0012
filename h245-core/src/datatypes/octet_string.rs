//! Octet string type for H.245 signaling

use serde::{Deserialize, Serialize};
use std::fmt;

/// ASN.1 OCTET STRING value: an owned sequence of octets.
///
/// A zero-size value owns an empty buffer; there is no "null" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctetString {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl OctetString {
    /// Construct an octet string from its content octets.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the content octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The number of octets.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the string holds no octets.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the value and take its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl From<&[u8]> for OctetString {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.data {
            write!(f, "{:02X} ", byte)?;
        }
        Ok(())
    }
}
