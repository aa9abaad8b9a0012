//! PER encoder for H.245 signaling

use crate::error::{H245Error, H245Result};
use crate::per::types::{NORM_SMALL_MAX, bits_for_range};
use h245_core::datatypes::{BitString, CharString, ObjectIdent, OctetString};

/// PER write cursor over an owned, growable buffer.
///
/// Bits pack MSB-first into a byte under construction; each completed
/// byte is flushed into the buffer. Everything before the write
/// position is final and never mutated again. Growth is the vector's
/// amortized doubling and preserves all written content.
pub struct OutStream {
    buffer: Vec<u8>,
    build_byte: u8,
    bit_index: u8,
}

impl OutStream {
    /// Create a new write cursor.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            build_byte: 0,
            bit_index: 0,
        }
    }

    /// Create a new write cursor with initial capacity in octets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            build_byte: 0,
            bit_index: 0,
        }
    }

    /// Octets the stream would occupy if finalized now (a partially
    /// built byte counts as one).
    pub fn len_octets(&self) -> usize {
        self.buffer.len() + usize::from(self.bit_index != 0)
    }

    /// Total bits written so far.
    pub fn bit_position(&self) -> usize {
        self.buffer.len() * 8 + self.bit_index as usize
    }

    /// Finalize the stream: zero-pad the partial byte and yield the
    /// encoded octets. Re-parsing just-encoded content is
    /// `InStream::new(&stream.into_bytes())`.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.write_remaining_bits();
        self.buffer
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.build_byte |= 1 << (7 - self.bit_index);
        }
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.buffer.push(self.build_byte);
            self.build_byte = 0;
            self.bit_index = 0;
        }
    }

    /// Write the low `count` bits of `value` (1..=32), MSB-first.
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!((1..=32).contains(&count), "write_bits count {}", count);
        for bit_pos in (0..count).rev() {
            self.write_bit((value >> bit_pos) & 1 == 1);
        }
    }

    /// Pad the current byte with zero bits up to the next byte
    /// boundary. No-op if already byte-aligned.
    pub fn write_remaining_bits(&mut self) {
        if self.bit_index != 0 {
            self.buffer.push(self.build_byte);
            self.build_byte = 0;
            self.bit_index = 0;
        }
    }

    /// Append raw octets, byte-order-reversed when `reorder` is set.
    /// The cursor must be byte-aligned; callers realign with
    /// [`write_remaining_bits`](Self::write_remaining_bits) first.
    pub fn write_octets(&mut self, octets: &[u8], reorder: bool) {
        assert_eq!(self.bit_index, 0, "write_octets on unaligned stream");
        if reorder {
            self.buffer.extend(octets.iter().rev());
        } else {
            self.buffer.extend_from_slice(octets);
        }
    }

    /// Encode a BOOLEAN (one bit).
    pub fn put_boolean(&mut self, value: bool) -> H245Result<()> {
        self.write_bit(value);
        Ok(())
    }

    /// Encode a constrained whole number on `[lower, upper]` as
    /// `value - lower` in the minimal bit width for the range; zero
    /// bits when `lower == upper`.
    pub fn put_integer(&mut self, lower: u32, upper: u32, value: u32) -> H245Result<()> {
        if lower > upper || value < lower || value > upper {
            return Err(H245Error::OutOfRange(format!(
                "{} outside [{}, {}]",
                value, lower, upper
            )));
        }
        let range = u64::from(upper) - u64::from(lower);
        if range == 0 {
            return Ok(());
        }
        self.write_bits(value - lower, bits_for_range(range));
        Ok(())
    }

    /// Encode a constrained whole number on a signed `[lower, upper]`.
    pub fn put_signed_integer(&mut self, lower: i32, upper: i32, value: i32) -> H245Result<()> {
        if lower > upper || value < lower || value > upper {
            return Err(H245Error::OutOfRange(format!(
                "{} outside [{}, {}]",
                value, lower, upper
            )));
        }
        let range = (i64::from(upper) - i64::from(lower)) as u64;
        if range == 0 {
            return Ok(());
        }
        let offset = (i64::from(value) - i64::from(lower)) as u64;
        self.write_bits(offset as u32, bits_for_range(range));
        Ok(())
    }

    /// Encode an unconstrained non-negative whole number: a length
    /// determinant for the octet count, then the minimal big-endian
    /// octets.
    pub fn put_unbounded_integer(&mut self, value: u32) -> H245Result<()> {
        let mut octets = value.to_be_bytes().to_vec();
        while octets.len() > 1 && octets[0] == 0 {
            octets.remove(0);
        }
        self.put_length_det(octets.len())?;
        for octet in octets {
            self.write_bits(u32::from(octet), 8);
        }
        Ok(())
    }

    /// Encode an extensible integer: extension-presence bit, then
    /// either the constrained root form or the unbounded form.
    pub fn put_extended_integer(&mut self, lower: u32, upper: u32, value: u32) -> H245Result<()> {
        let in_root = value >= lower && value <= upper;
        self.write_bit(!in_root);
        if in_root {
            self.put_integer(lower, upper, value)
        } else {
            self.put_unbounded_integer(value)
        }
    }

    /// Encode the general PER length determinant (see
    /// [`InStream::get_length_det`](crate::per::InStream::get_length_det)
    /// for the forms).
    pub fn put_length_det(&mut self, value: usize) -> H245Result<()> {
        if value <= 127 {
            self.write_bits(value as u32, 8);
        } else if value <= 16383 {
            self.write_bits(0x8000 | value as u32, 16);
        } else {
            let mut remaining = value;
            while remaining > 16383 {
                let multiplier = (remaining / 16384).min(4);
                self.write_bits(0xC0 | multiplier as u32, 8);
                remaining -= multiplier * 16384;
            }
            // Terminating short/medium form for the remainder.
            self.put_length_det(remaining)?;
        }
        Ok(())
    }

    /// Encode a normally-small length, e.g. the signature map size.
    pub fn put_norm_small_length(&mut self, value: usize) -> H245Result<()> {
        if value <= NORM_SMALL_MAX as usize {
            self.write_bit(false);
            self.write_bits(value as u32, 6);
            Ok(())
        } else {
            self.write_bit(true);
            self.put_length_det(value)
        }
    }

    /// Encode a normally-small value, e.g. an extended choice index.
    pub fn put_norm_small_value(&mut self, value: u32) -> H245Result<()> {
        self.put_norm_small_length(value as usize)
    }

    /// Size field shared by the composite codecs; mirrors the decode
    /// side and validates the size against the schema bounds.
    fn put_size(&mut self, unbounded: bool, min: usize, max: usize, size: usize) -> H245Result<()> {
        if unbounded {
            self.put_length_det(size)
        } else if min == max {
            if size != min {
                return Err(H245Error::OutOfRange(format!(
                    "size {} differs from fixed schema size {}",
                    size, min
                )));
            }
            Ok(())
        } else {
            self.put_integer(min as u32, max as u32, size as u32)
        }
    }

    /// Encode an OCTET STRING.
    pub fn put_octet_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
        x: &OctetString,
    ) -> H245Result<()> {
        self.put_size(unbounded, min, max, x.len())?;
        for octet in x.as_bytes() {
            self.write_bits(u32::from(*octet), 8);
        }
        Ok(())
    }

    /// Encode a BIT STRING. The size counts bits; the content goes out
    /// as `ceil(size / 8)` octets with trailing pad bits forced to
    /// zero.
    pub fn put_bit_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
        x: &BitString,
    ) -> H245Result<()> {
        let size = x.num_bits();
        self.put_size(unbounded, min, max, size)?;
        let whole_octets = size / 8;
        for octet in &x.as_bytes()[..whole_octets] {
            self.write_bits(u32::from(*octet), 8);
        }
        let tail_bits = size % 8;
        if tail_bits != 0 {
            let mask = 0xFFu32 << (8 - tail_bits) & 0xFF;
            let tail = u32::from(x.as_bytes()[whole_octets]) & mask;
            self.write_bits(tail, 8);
        }
        Ok(())
    }

    /// Encode a restricted character string; each character goes out
    /// as its index into the alphabet `from` in the minimal bit width,
    /// or as a raw octet when no alphabet applies.
    pub fn put_char_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
        from: &str,
        x: &CharString,
    ) -> H245Result<()> {
        self.put_size(unbounded, min, max, x.len())?;
        let alphabet = from.as_bytes();
        if alphabet.is_empty() {
            for ch in x.as_bytes() {
                self.write_bits(u32::from(*ch), 8);
            }
            return Ok(());
        }
        let width = bits_for_range(alphabet.len() as u64 - 1);
        for ch in x.as_bytes() {
            let index = alphabet.iter().position(|c| c == ch).ok_or_else(|| {
                H245Error::OutOfRange(format!(
                    "character 0x{:02X} not in alphabet {:?}",
                    ch, from
                ))
            })?;
            if width > 0 {
                self.write_bits(index as u32, width);
            }
        }
        Ok(())
    }

    /// Encode an OBJECT IDENTIFIER, opaquely: a length determinant
    /// followed by the pre-encoded contents octets.
    pub fn put_object_id(&mut self, x: &ObjectIdent) -> H245Result<()> {
        self.put_length_det(x.len())?;
        for octet in x.as_bytes() {
            self.write_bits(u32::from(*octet), 8);
        }
        Ok(())
    }

    /// Encode a (possibly extended) CHOICE index. An extensible type
    /// carries a presence bit first; an index past the root set goes
    /// out as `rootnum + normally-small value`.
    pub fn put_choice_index(&mut self, rootnum: u32, extmarker: bool, index: u16) -> H245Result<()> {
        if rootnum == 0 {
            return Err(H245Error::OutOfRange(
                "choice type with no root alternatives".to_string(),
            ));
        }
        let index = u32::from(index);
        if extmarker {
            let in_root = index < rootnum;
            self.write_bit(!in_root);
            if in_root {
                self.put_integer(0, rootnum - 1, index)
            } else {
                self.put_norm_small_value(index - rootnum)
            }
        } else {
            self.put_integer(0, rootnum - 1, index)
        }
    }

    /// Append the finalized octets of a scratch stream. Callers write
    /// the payload's length determinant first; together with
    /// [`put_open_type`](Self::put_open_type) this replaces the
    /// encode-then-wrap callback of older PER engines with an explicit
    /// two-step protocol.
    pub fn put_temp_stream(&mut self, temp: OutStream) -> H245Result<()> {
        for octet in temp.into_bytes() {
            self.write_bits(u32::from(octet), 8);
        }
        Ok(())
    }

    /// Wrap a scratch-encoded payload as an open type: its octet
    /// length as a length determinant, then its finalized content.
    pub fn put_open_type(&mut self, temp: OutStream) -> H245Result<()> {
        self.put_length_det(temp.len_octets())?;
        self.put_temp_stream(temp)
    }

    /// Encode a NULL extension field (zero-length open type).
    pub fn put_extension_null(&mut self) -> H245Result<()> {
        self.put_open_type(OutStream::new())
    }

    /// Encode a BOOLEAN extension field inside its open-type wrapper.
    pub fn put_extension_boolean(&mut self, value: bool) -> H245Result<()> {
        let mut temp = OutStream::new();
        temp.put_boolean(value)?;
        self.put_open_type(temp)
    }

    /// Encode a constrained integer extension field inside its
    /// open-type wrapper.
    pub fn put_extension_integer(&mut self, lower: u32, upper: u32, value: u32) -> H245Result<()> {
        let mut temp = OutStream::new();
        temp.put_integer(lower, upper, value)?;
        self.put_open_type(temp)
    }

    /// Encode an OCTET STRING extension field inside its open-type
    /// wrapper.
    pub fn put_extension_octet_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
        x: &OctetString,
    ) -> H245Result<()> {
        let mut temp = OutStream::new();
        temp.put_octet_string(unbounded, min, max, x)?;
        self.put_open_type(temp)
    }
}

impl Default for OutStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_patterns() {
        let mut stream = OutStream::new();
        for i in 0..8 {
            stream.write_bit(i % 2 == 0);
        }
        assert_eq!(stream.into_bytes(), vec![0xAA]);

        let mut stream = OutStream::new();
        stream.write_bits(0b101, 3);
        assert_eq!(stream.len_octets(), 1);
        assert_eq!(stream.into_bytes(), vec![0b101_00000]);
    }

    #[test]
    fn test_integer_widths() {
        // Single legal value: zero bits.
        let mut stream = OutStream::new();
        stream.put_integer(0, 0, 0).unwrap();
        assert_eq!(stream.bit_position(), 0);

        // [0, 1]: exactly one bit.
        let mut stream = OutStream::new();
        stream.put_integer(0, 1, 1).unwrap();
        assert_eq!(stream.bit_position(), 1);

        // [0, 255]: exactly eight bits.
        let mut stream = OutStream::new();
        stream.put_integer(0, 255, 200).unwrap();
        assert_eq!(stream.bit_position(), 8);
        assert_eq!(stream.into_bytes(), vec![200]);
    }

    #[test]
    fn test_put_integer_out_of_range() {
        let mut stream = OutStream::new();
        assert!(matches!(
            stream.put_integer(10, 20, 21),
            Err(H245Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_length_det_boundaries() {
        let mut stream = OutStream::new();
        stream.put_length_det(127).unwrap();
        assert_eq!(stream.into_bytes(), vec![0x7F]);

        let mut stream = OutStream::new();
        stream.put_length_det(128).unwrap();
        assert_eq!(stream.into_bytes(), vec![0x80, 0x80]);

        let mut stream = OutStream::new();
        stream.put_length_det(16383).unwrap();
        assert_eq!(stream.into_bytes(), vec![0xBF, 0xFF]);

        let mut stream = OutStream::new();
        stream.put_length_det(16384).unwrap();
        assert_eq!(stream.into_bytes(), vec![0xC1, 0x00]);

        // 4 * 16384 + 5 = one maximal fragment plus a short remainder.
        let mut stream = OutStream::new();
        stream.put_length_det(4 * 16384 + 5).unwrap();
        assert_eq!(stream.into_bytes(), vec![0xC4, 0x05]);
    }

    #[test]
    fn test_norm_small_boundary() {
        // 63 fits the 6-bit inline form: 7 bits total.
        let mut stream = OutStream::new();
        stream.put_norm_small_value(63).unwrap();
        assert_eq!(stream.bit_position(), 7);
        assert_eq!(stream.into_bytes(), vec![0b0_111111_0]);

        // 64 needs the length-determinant form: 9 bits total.
        let mut stream = OutStream::new();
        stream.put_norm_small_value(64).unwrap();
        assert_eq!(stream.bit_position(), 9);
    }

    #[test]
    fn test_write_octets_reorder() {
        let mut stream = OutStream::new();
        stream.write_octets(&[0x01, 0x02, 0x03], true);
        assert_eq!(stream.into_bytes(), vec![0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_buffer_growth_preserves_content() {
        let payload: Vec<u8> = (0u16..200).map(|i| (i % 251) as u8).collect();
        let mut growing = OutStream::new();
        let mut presized = OutStream::with_capacity(payload.len());
        for octet in &payload {
            growing.write_bits(u32::from(*octet), 8);
            presized.write_bits(u32::from(*octet), 8);
        }
        assert_eq!(growing.into_bytes(), presized.into_bytes());
    }

    #[test]
    fn test_put_open_type_wraps_payload() {
        let mut temp = OutStream::new();
        temp.put_integer(0, 255, 0x42).unwrap();
        let mut stream = OutStream::new();
        stream.put_open_type(temp).unwrap();
        assert_eq!(stream.into_bytes(), vec![0x01, 0x42]);
    }

    #[test]
    fn test_put_extension_null() {
        let mut stream = OutStream::new();
        stream.put_extension_null().unwrap();
        assert_eq!(stream.into_bytes(), vec![0x00]);
    }

    #[test]
    fn test_put_bit_string_pads_tail() {
        // 10 bits: one whole octet plus 2 tail bits, zero-padded.
        let bs = BitString::new(vec![0xFF, 0xFF], 10).unwrap();
        let mut stream = OutStream::new();
        stream.put_bit_string(false, 10, 10, &bs).unwrap();
        assert_eq!(stream.into_bytes(), vec![0xFF, 0xC0]);
    }
}
