//! h245_rs - Rust implementation of the H.245 PER wire-format layer
//!
//! This library implements the ITU-T X.691 Packed Encoding Rules
//! engine used beneath H.245-style control signaling in a 3G-324M
//! circuit-switched multimedia stack: bit-level stream cursors,
//! length-determinant framing, scalar and composite value codecs, and
//! forward-compatible extension (signature map) handling.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `h245-core`: Core value types and error handling
//! - `h245-asn1`: The PER codec engine
//!
//! Generated per-message drivers sit on top of this library and
//! sequence codec calls in schema-declared field order; transport and
//! session management live outside it.
//!
//! # Usage
//!
//! ```
//! use h245::per::{InStream, OutStream};
//!
//! let mut out = OutStream::new();
//! out.put_choice_index(4, true, 2).unwrap();
//! out.put_integer(0, 255, 180).unwrap();
//! let bytes = out.into_bytes();
//!
//! let mut input = InStream::new(&bytes);
//! assert_eq!(input.get_choice_index(4, true).unwrap(), 2);
//! assert_eq!(input.get_integer(0, 255).unwrap(), 180);
//! ```

// Re-export core types
pub use h245_core::{H245Error, H245Result};
pub use h245_core::datatypes::*;

// Re-export the PER codec
pub mod per {
    pub use h245_asn1::per::*;
}
