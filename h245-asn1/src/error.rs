//! Error types for the codec layer, shared with `h245-core`

pub use h245_core::error::{H245Error, H245Result};
