//! Object identifier type for H.245 signaling

use serde::{Deserialize, Serialize};
use std::fmt;

/// ASN.1 OBJECT IDENTIFIER value, held as its pre-encoded contents
/// octets. The PER layer carries identifiers opaquely; arc-level
/// decomposition belongs to the layers above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIdent {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl ObjectIdent {
    /// Construct an object identifier from its contents octets.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the contents octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The number of contents octets.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the identifier holds no octets.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for ObjectIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.data {
            write!(f, "{:02X} ", byte)?;
        }
        Ok(())
    }
}
