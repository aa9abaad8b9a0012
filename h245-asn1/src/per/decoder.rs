//! PER decoder for H.245 signaling

use crate::error::{H245Error, H245Result};
use crate::per::types::{FRAGMENT_UNIT, UnknownSigMap, bits_for_range};
use h245_core::datatypes::{BitString, CharString, ObjectIdent, OctetString};

/// PER read cursor over an externally owned buffer.
///
/// Tracks a byte offset plus a bit offset in [0,8) into the byte at
/// that offset; reads are MSB-first and may span byte boundaries.
/// The cursor never owns the buffer, so its lifetime is bounded by
/// the buffer's.
pub struct InStream<'a> {
    buffer: &'a [u8],
    byte_index: usize,
    bit_index: u8,
}

impl<'a> InStream<'a> {
    /// Create a new read cursor at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            byte_index: 0,
            bit_index: 0,
        }
    }

    /// Current byte offset into the buffer.
    pub fn position(&self) -> usize {
        self.byte_index
    }

    /// Total bits consumed since the start of the buffer.
    pub fn bit_position(&self) -> usize {
        self.byte_index * 8 + self.bit_index as usize
    }

    /// Whole octets left, counting a partially consumed byte as gone.
    pub fn remaining_octets(&self) -> usize {
        let used = self.byte_index + usize::from(self.bit_index != 0);
        self.buffer.len().saturating_sub(used)
    }

    /// Bits left to read.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_position()
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> H245Result<bool> {
        let byte = self.buffer.get(self.byte_index).copied().ok_or_else(|| {
            H245Error::BufferExhausted(format!(
                "read past end of {}-byte stream",
                self.buffer.len()
            ))
        })?;
        let bit = (byte >> (7 - self.bit_index)) & 1 == 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.byte_index += 1;
        }
        Ok(bit)
    }

    /// Read `count` bits (1..=32), MSB-first, possibly spanning bytes.
    /// The value comes back right-justified.
    pub fn read_bits(&mut self, count: u32) -> H245Result<u32> {
        debug_assert!((1..=32).contains(&count), "read_bits count {}", count);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Advance to the start of the next byte, discarding any unread
    /// bits of the current one. No-op if already byte-aligned.
    pub fn read_remaining_bits(&mut self) {
        if self.bit_index != 0 {
            self.bit_index = 0;
            self.byte_index += 1;
        }
    }

    /// Copy `count` raw octets, byte-order-reversed when `reorder` is
    /// set. The cursor must be byte-aligned; callers realign with
    /// [`read_remaining_bits`](Self::read_remaining_bits) first.
    pub fn read_octets(&mut self, count: usize, reorder: bool) -> H245Result<Vec<u8>> {
        assert_eq!(self.bit_index, 0, "read_octets on unaligned stream");
        if self.byte_index + count > self.buffer.len() {
            return Err(H245Error::BufferExhausted(format!(
                "need {} octets, have {}",
                count,
                self.buffer.len() - self.byte_index
            )));
        }
        let mut octets = self.buffer[self.byte_index..self.byte_index + count].to_vec();
        self.byte_index += count;
        if reorder {
            octets.reverse();
        }
        Ok(octets)
    }

    /// Discard one octet of content.
    pub fn skip_one_octet(&mut self) -> H245Result<()> {
        self.read_bits(8)?;
        Ok(())
    }

    /// Decode a BOOLEAN (one bit).
    pub fn get_boolean(&mut self) -> H245Result<bool> {
        self.read_bit()
    }

    /// Decode a constrained whole number on `[lower, upper]`.
    ///
    /// The field is `value - lower` in the minimal bit width for the
    /// range; zero bits when `lower == upper`.
    pub fn get_integer(&mut self, lower: u32, upper: u32) -> H245Result<u32> {
        if lower > upper {
            return Err(H245Error::OutOfRange(format!(
                "invalid bounds [{}, {}]",
                lower, upper
            )));
        }
        let range = u64::from(upper) - u64::from(lower);
        if range == 0 {
            return Ok(lower);
        }
        let offset = self.read_bits(bits_for_range(range))?;
        let value = u64::from(lower) + u64::from(offset);
        if value > u64::from(upper) {
            return Err(H245Error::OutOfRange(format!(
                "decoded {} above upper bound {}",
                value, upper
            )));
        }
        Ok(value as u32)
    }

    /// Decode a constrained whole number on a signed `[lower, upper]`.
    pub fn get_signed_integer(&mut self, lower: i32, upper: i32) -> H245Result<i32> {
        if lower > upper {
            return Err(H245Error::OutOfRange(format!(
                "invalid bounds [{}, {}]",
                lower, upper
            )));
        }
        let range = (i64::from(upper) - i64::from(lower)) as u64;
        if range == 0 {
            return Ok(lower);
        }
        let offset = self.read_bits(bits_for_range(range))?;
        let value = i64::from(lower) + i64::from(offset);
        if value > i64::from(upper) {
            return Err(H245Error::OutOfRange(format!(
                "decoded {} above upper bound {}",
                value, upper
            )));
        }
        Ok(value as i32)
    }

    /// Decode an unconstrained non-negative whole number: a length
    /// determinant for the octet count, then that many octets forming
    /// the minimal big-endian representation.
    pub fn get_unbounded_integer(&mut self) -> H245Result<u32> {
        let count = self.get_length_det()?;
        if count == 0 || count > 4 {
            return Err(H245Error::OutOfRange(format!(
                "unbounded integer of {} octets does not fit",
                count
            )));
        }
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 8) | self.read_bits(8)?;
        }
        Ok(value)
    }

    /// Decode an extensible integer: extension-presence bit, then
    /// either the constrained root form or the unbounded form.
    pub fn get_extended_integer(&mut self, lower: u32, upper: u32) -> H245Result<u32> {
        if self.read_bit()? {
            self.get_unbounded_integer()
        } else {
            self.get_integer(lower, upper)
        }
    }

    /// Decode the general PER length determinant.
    ///
    /// Short form one octet (0-127), medium form two octets
    /// (128-16383), fragmented form for 16384 and up: fragment-count
    /// octets worth `multiplier * 16384` each, terminated by a
    /// short/medium form for the remainder.
    pub fn get_length_det(&mut self) -> H245Result<usize> {
        let first = self.read_bits(8)?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        if first & 0x40 == 0 {
            let low = self.read_bits(8)?;
            return Ok((((first & 0x3F) << 8) | low) as usize);
        }

        let mut total = 0usize;
        let mut marker = first;
        loop {
            let multiplier = (marker & 0x3F) as usize;
            if multiplier == 0 || multiplier > 4 {
                return Err(H245Error::MalformedLength(format!(
                    "fragment multiplier {} outside 1..=4",
                    multiplier
                )));
            }
            total += multiplier * FRAGMENT_UNIT;
            // An accumulated count the buffer cannot possibly satisfy
            // means a malformed stream; bail instead of reading on.
            if total > self.remaining_octets() {
                return Err(H245Error::MalformedLength(format!(
                    "fragmented length {} exceeds {} remaining octets",
                    total,
                    self.remaining_octets()
                )));
            }
            let next = self.read_bits(8)?;
            if next & 0x80 == 0 {
                return Ok(total + next as usize);
            }
            if next & 0x40 == 0 {
                let low = self.read_bits(8)?;
                return Ok(total + (((next & 0x3F) << 8) | low) as usize);
            }
            marker = next;
        }
    }

    /// Decode a normally-small length, e.g. the signature map size.
    pub fn get_norm_small_length(&mut self) -> H245Result<usize> {
        if self.read_bit()? {
            self.get_length_det()
        } else {
            Ok(self.read_bits(6)? as usize)
        }
    }

    /// Decode a normally-small value, e.g. an extended choice index.
    pub fn get_norm_small_value(&mut self) -> H245Result<u32> {
        if self.read_bit()? {
            let value = self.get_length_det()?;
            u32::try_from(value).map_err(|_| {
                H245Error::OutOfRange(format!("normally-small value {} does not fit", value))
            })
        } else {
            self.read_bits(6)
        }
    }

    /// Size field shared by the composite codecs: a length determinant
    /// when unbounded, nothing when the schema fixes the size, a
    /// constrained integer on `[min, max]` otherwise.
    fn get_size(&mut self, unbounded: bool, min: usize, max: usize) -> H245Result<usize> {
        if unbounded {
            self.get_length_det()
        } else if min == max {
            Ok(min)
        } else {
            Ok(self.get_integer(min as u32, max as u32)? as usize)
        }
    }

    /// Decode an OCTET STRING.
    pub fn get_octet_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
    ) -> H245Result<OctetString> {
        let size = self.get_size(unbounded, min, max)?;
        let mut data = Vec::with_capacity(size);
        for _ in 0..size {
            data.push(self.read_bits(8)? as u8);
        }
        Ok(OctetString::new(data))
    }

    /// Decode a BIT STRING. The size counts bits; the content occupies
    /// `ceil(size / 8)` octets with the final octet zero-padded.
    pub fn get_bit_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
    ) -> H245Result<BitString> {
        let size = self.get_size(unbounded, min, max)?;
        let mut bytes = Vec::with_capacity(size.div_ceil(8));
        for _ in 0..size.div_ceil(8) {
            bytes.push(self.read_bits(8)? as u8);
        }
        BitString::new(bytes, size)
    }

    /// Decode a restricted character string. With a non-empty
    /// alphabet `from`, each character arrives as its index into
    /// `from` in the minimal bit width; with an empty alphabet,
    /// characters are raw octets.
    pub fn get_char_string(
        &mut self,
        unbounded: bool,
        min: usize,
        max: usize,
        from: &str,
    ) -> H245Result<CharString> {
        let size = self.get_size(unbounded, min, max)?;
        let alphabet = from.as_bytes();
        let mut data = Vec::with_capacity(size);
        if alphabet.is_empty() {
            for _ in 0..size {
                data.push(self.read_bits(8)? as u8);
            }
        } else {
            let width = bits_for_range(alphabet.len() as u64 - 1);
            for _ in 0..size {
                let index = if width == 0 { 0 } else { self.read_bits(width)? as usize };
                let ch = alphabet.get(index).copied().ok_or_else(|| {
                    H245Error::OutOfRange(format!(
                        "character index {} outside {}-character alphabet",
                        index,
                        alphabet.len()
                    ))
                })?;
                data.push(ch);
            }
        }
        Ok(CharString::new(data))
    }

    /// Decode an OBJECT IDENTIFIER, opaquely: a length determinant
    /// followed by the pre-encoded contents octets.
    pub fn get_object_id(&mut self) -> H245Result<ObjectIdent> {
        let size = self.get_length_det()?;
        let mut data = Vec::with_capacity(size);
        for _ in 0..size {
            data.push(self.read_bits(8)? as u8);
        }
        Ok(ObjectIdent::new(data))
    }

    /// Decode a (possibly extended) CHOICE index. An extensible type
    /// carries a presence bit first; an extended alternative decodes
    /// as `rootnum + normally-small value`.
    pub fn get_choice_index(&mut self, rootnum: u32, extmarker: bool) -> H245Result<u16> {
        if rootnum == 0 {
            return Err(H245Error::OutOfRange(
                "choice type with no root alternatives".to_string(),
            ));
        }
        if extmarker && self.read_bit()? {
            let value = u64::from(rootnum) + u64::from(self.get_norm_small_value()?);
            u16::try_from(value).map_err(|_| {
                H245Error::OutOfRange(format!("extended choice index {} does not fit", value))
            })
        } else {
            Ok(self.get_integer(0, rootnum - 1)? as u16)
        }
    }

    /// Read the signature map for an extensible SEQUENCE: a
    /// normally-small slot count, then one presence bit per slot.
    pub fn get_unknown_sig_map(&mut self) -> H245Result<UnknownSigMap> {
        let size = self.get_norm_small_length()?;
        let mut flags = BitString::zeroed(size);
        for index in 0..size {
            if self.read_bit()? {
                flags.set_bit(index, true)?;
            }
        }
        Ok(UnknownSigMap::new(flags))
    }

    /// Called immediately before decoding the next known extension
    /// field. Advances the map's read count; when the field is
    /// present, also consumes its open-type length wrapper and returns
    /// the wrapped octet count. `None` means the field is absent and
    /// nothing was read from the stream.
    pub fn extension_prep(&mut self, map: &mut UnknownSigMap) -> H245Result<Option<usize>> {
        let index = map.extensions_read();
        map.advance()?;
        if map.value(index)? {
            Ok(Some(self.get_length_det()?))
        } else {
            Ok(None)
        }
    }

    /// Discard one unrecognized extension: a length determinant, then
    /// that many octets of open-type payload.
    pub fn skip_one_extension(&mut self) -> H245Result<()> {
        let count = self.get_length_det()?;
        for _ in 0..count {
            self.skip_one_octet()?;
        }
        log::trace!("skipped {}-octet unknown extension", count);
        Ok(())
    }

    /// Read a signature map and skip every extension it marks present.
    /// Used when this build recognizes none of the type's additions.
    pub fn skip_all_extensions(&mut self) -> H245Result<u32> {
        let map = self.get_unknown_sig_map()?;
        self.skip_unread_extensions(map)
    }

    /// Close out an extensible SEQUENCE: skip each remaining *present*
    /// extension past the map's read count. Consuming the map ends its
    /// lifetime. Returns the number skipped.
    pub fn skip_unread_extensions(&mut self, map: UnknownSigMap) -> H245Result<u32> {
        let mut skipped = 0u32;
        for index in map.extensions_read()..map.size() {
            if map.value(index)? {
                self.skip_one_extension()?;
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::debug!("skipped {} unread extensions", skipped);
        }
        Ok(skipped)
    }
}
