//! ASN.1 PER processing for H.245 signaling
//!
//! This crate implements the ITU-T X.691 Packed Encoding Rules subset
//! used by H.245-style control signaling inside a 3G-324M stack: the
//! bit-level stream cursors, the general length determinant, the
//! normally-small biased encoding, the scalar and composite value
//! codecs, and the extension (signature map) machinery that lets an
//! older decoder skip additions made by a newer peer.
//!
//! Generated per-message drivers sequence calls into [`per::InStream`]
//! and [`per::OutStream`] in schema-declared field order, supplying all
//! bounds and alphabets as schema-literal constants.

pub mod error;
pub mod per;

pub use error::{H245Error, H245Result};
pub use per::{InStream, OutStream, UnknownSigMap};
