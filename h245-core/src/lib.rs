//! Core types and utilities for the H.245 PER signaling stack
//!
//! This crate provides the fundamental value types and error handling
//! used throughout the H.245 implementation.

pub mod error;
pub mod datatypes;

pub use error::{H245Error, H245Result};
pub use datatypes::{BitString, CharString, ObjectIdent, OctetString};
