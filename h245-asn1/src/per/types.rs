//! PER wire-machinery types for H.245 signaling

use crate::error::{H245Error, H245Result};
use h245_core::datatypes::BitString;

/// One fragment-count unit of the fragmented length determinant form.
pub(crate) const FRAGMENT_UNIT: usize = 16384;

/// Largest value the normally-small inline form can carry in 6 bits.
pub(crate) const NORM_SMALL_MAX: u32 = 63;

/// Minimal bit width that can carry any offset in `0..=range`.
/// A range of 0 (single legal value) needs no bits at all.
pub(crate) fn bits_for_range(range: u64) -> u32 {
    if range == 0 {
        0
    } else {
        64 - range.leading_zeros()
    }
}

/// Extension bitmap for an extensible SEQUENCE: one presence flag per
/// extension-addition slot the *sender* declared, in schema order,
/// plus a count of how many slots this decoder has consumed so far.
///
/// A map is created once per extensible-type decode (see
/// [`InStream::get_unknown_sig_map`](crate::per::InStream::get_unknown_sig_map)),
/// advanced as the generated driver works through the known additions,
/// and finally consumed by
/// [`skip_unread_extensions`](crate::per::InStream::skip_unread_extensions),
/// which discards whatever a newer peer appended beyond that.
#[derive(Debug, Clone)]
pub struct UnknownSigMap {
    option_flags: BitString,
    extensions_read: usize,
}

impl UnknownSigMap {
    /// Build a map over already-decoded presence flags.
    pub fn new(option_flags: BitString) -> Self {
        Self {
            option_flags,
            extensions_read: 0,
        }
    }

    /// The number of extension-addition slots the sender declared.
    pub fn size(&self) -> usize {
        self.option_flags.num_bits()
    }

    /// The presence flag at `index`.
    pub fn value(&self, index: usize) -> H245Result<bool> {
        if index >= self.size() {
            return Err(H245Error::SigMap(format!(
                "flag index {} out of bounds (size: {})",
                index,
                self.size()
            )));
        }
        self.option_flags.get_bit(index)
    }

    /// How many extension slots have been consumed so far.
    pub fn extensions_read(&self) -> usize {
        self.extensions_read
    }

    /// Mark the next extension slot as consumed.
    pub fn advance(&mut self) -> H245Result<()> {
        if self.extensions_read >= self.size() {
            return Err(H245Error::SigMap(format!(
                "all {} extension slots already read",
                self.size()
            )));
        }
        self.extensions_read += 1;
        Ok(())
    }
}
