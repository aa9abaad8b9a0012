//! Character string type for H.245 signaling

use serde::{Deserialize, Serialize};
use std::fmt;

/// ASN.1 restricted character string value (IA5String, NumericString
/// and friends). Characters are stored as their 8-bit codes; the
/// permitted-alphabet re-expression happens in the PER codec, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharString {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl CharString {
    /// Construct a character string from its character codes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the character codes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The number of characters.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the string holds no characters.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for CharString {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}
