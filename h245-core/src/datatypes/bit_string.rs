//! Bit string type for H.245 signaling

use crate::error::{H245Error, H245Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ASN.1 BIT STRING value: an arbitrary string of bits, any length
/// including zero. Bits are stored packed MSB-first; the buffer holds
/// exactly `ceil(num_bits / 8)` octets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitString {
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
    num_bits: usize,
}

impl BitString {
    /// Construct a new bit string object.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is too short to hold `num_bits` bits.
    pub fn new(bytes: Vec<u8>, num_bits: usize) -> H245Result<Self> {
        if num_bits > bytes.len() * 8 {
            return Err(H245Error::OutOfRange(format!(
                "bit string buffer too short: need {} bytes for {} bits",
                num_bits.div_ceil(8),
                num_bits
            )));
        }
        Ok(Self { bytes, num_bits })
    }

    /// An all-zero bit string of `num_bits` bits.
    pub fn zeroed(num_bits: usize) -> Self {
        Self {
            bytes: vec![0u8; num_bits.div_ceil(8)],
            num_bits,
        }
    }

    /// Get the packed bit content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of bits in the string.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the bit at `index` (0-based, MSB of byte 0 first).
    pub fn get_bit(&self, index: usize) -> H245Result<bool> {
        if index >= self.num_bits {
            return Err(H245Error::OutOfRange(format!(
                "bit index {} out of bounds (num_bits: {})",
                index, self.num_bits
            )));
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8); // MSB first
        Ok((self.bytes[byte_index] >> bit_index) & 1 == 1)
    }

    /// Set the bit at `index` (0-based, MSB of byte 0 first).
    pub fn set_bit(&mut self, index: usize, value: bool) -> H245Result<()> {
        if index >= self.num_bits {
            return Err(H245Error::OutOfRange(format!(
                "bit index {} out of bounds (num_bits: {})",
                index, self.num_bits
            )));
        }
        let byte_index = index / 8;
        let bit_index = 7 - (index % 8); // MSB first
        if value {
            self.bytes[byte_index] |= 1 << bit_index;
        } else {
            self.bytes[byte_index] &= !(1 << bit_index);
        }
        Ok(())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.num_bits {
            let bit = self.get_bit(i).map_err(|_| fmt::Error)?;
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_new() {
        let bytes = vec![0xFF, 0x00, 0xAA];
        let bs = BitString::new(bytes.clone(), 24).unwrap();
        assert_eq!(bs.as_bytes(), &bytes);
        assert_eq!(bs.num_bits(), 24);
    }

    #[test]
    fn test_bit_string_invalid() {
        let result = BitString::new(vec![0xFF], 16);
        assert!(result.is_err());
    }

    #[test]
    fn test_bit_string_partial_byte() {
        let bs = BitString::new(vec![0xF0], 4).unwrap();
        assert_eq!(bs.num_bits(), 4);
        assert!(bs.get_bit(0).unwrap());
        assert!(bs.get_bit(3).unwrap());
        assert!(bs.get_bit(4).is_err());
    }

    #[test]
    fn test_bit_string_set_bit() {
        let mut bs = BitString::zeroed(10);
        bs.set_bit(0, true).unwrap();
        bs.set_bit(9, true).unwrap();
        assert_eq!(bs.as_bytes(), &[0x80, 0x40]);
        assert!(bs.set_bit(10, true).is_err());
    }
}
