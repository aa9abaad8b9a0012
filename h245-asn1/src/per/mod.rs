//! Packed Encoding Rules engine (ITU-T X.691 subset for H.245)
//!
//! Unaligned PER with explicit padding: no octet alignment is ever
//! inserted implicitly. The only padding on the wire is what a caller
//! requests via `read_remaining_bits`/`write_remaining_bits` and the
//! zero fill of the final partial byte when an [`OutStream`] is
//! finalized.

pub mod encoder;
pub mod decoder;
pub mod types;

pub use encoder::OutStream;
pub use decoder::InStream;
pub use types::UnknownSigMap;

#[cfg(test)]
mod tests {
    use super::*;
    use h245_core::datatypes::{BitString, CharString, ObjectIdent, OctetString};

    #[test]
    fn test_boolean_round_trip() {
        let mut out = OutStream::new();
        out.put_boolean(true).unwrap();
        out.put_boolean(false).unwrap();
        out.put_boolean(true).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert!(input.get_boolean().unwrap());
        assert!(!input.get_boolean().unwrap());
        assert!(input.get_boolean().unwrap());
    }

    #[test]
    fn test_integer_round_trip() {
        for value in [0u32, 1, 127, 128, 255] {
            let mut out = OutStream::new();
            out.put_integer(0, 255, value).unwrap();
            let bytes = out.into_bytes();
            let mut input = InStream::new(&bytes);
            assert_eq!(input.get_integer(0, 255).unwrap(), value);
        }
    }

    #[test]
    fn test_signed_integer_round_trip() {
        for value in [-100i32, -1, 0, 1, 99] {
            let mut out = OutStream::new();
            out.put_signed_integer(-100, 99, value).unwrap();
            let bytes = out.into_bytes();
            let mut input = InStream::new(&bytes);
            assert_eq!(input.get_signed_integer(-100, 99).unwrap(), value);
        }
    }

    #[test]
    fn test_unbounded_integer_round_trip() {
        for value in [0u32, 1, 255, 256, 65535, 0x0102_0304, u32::MAX] {
            let mut out = OutStream::new();
            out.put_unbounded_integer(value).unwrap();
            let bytes = out.into_bytes();
            let mut input = InStream::new(&bytes);
            assert_eq!(input.get_unbounded_integer().unwrap(), value);
        }
    }

    #[test]
    fn test_extended_integer_round_trip() {
        // In-root value: presence bit 0 plus the constrained form.
        let mut out = OutStream::new();
        out.put_extended_integer(1, 10, 7).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_extended_integer(1, 10).unwrap(), 7);

        // Out-of-root value: presence bit 1 plus the unbounded form.
        let mut out = OutStream::new();
        out.put_extended_integer(1, 10, 5000).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_extended_integer(1, 10).unwrap(), 5000);
    }

    #[test]
    fn test_length_det_round_trip() {
        for value in [0usize, 1, 127, 128, 16383] {
            let mut out = OutStream::new();
            out.put_length_det(value).unwrap();
            let bytes = out.into_bytes();
            let mut input = InStream::new(&bytes);
            assert_eq!(input.get_length_det().unwrap(), value);
        }
    }

    #[test]
    fn test_octet_string_round_trip() {
        let value = OctetString::new(vec![0xDE, 0xAD, 0xBE, 0xEF]);

        // Unbounded: length determinant plus content.
        let mut out = OutStream::new();
        out.put_octet_string(true, 0, 0, &value).unwrap();
        let bytes = out.into_bytes();
        assert_eq!(bytes.len(), 5);
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_octet_string(true, 0, 0).unwrap(), value);

        // Fixed size: no size field at all.
        let mut out = OutStream::new();
        out.put_octet_string(false, 4, 4, &value).unwrap();
        let bytes = out.into_bytes();
        assert_eq!(bytes.len(), 4);
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_octet_string(false, 4, 4).unwrap(), value);

        // Ranged size: constrained integer on [2, 8] first.
        let mut out = OutStream::new();
        out.put_octet_string(false, 2, 8, &value).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_octet_string(false, 2, 8).unwrap(), value);
    }

    #[test]
    fn test_bit_string_round_trip() {
        let value = BitString::new(vec![0b1010_1100, 0b1100_0000], 10).unwrap();
        let mut out = OutStream::new();
        out.put_bit_string(false, 0, 16, &value).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_bit_string(false, 0, 16).unwrap(), value);
    }

    #[test]
    fn test_char_string_round_trip() {
        // Restricted alphabet, as used by DTMF/user-input fields.
        let value = CharString::from("19#*");
        let mut out = OutStream::new();
        out.put_char_string(true, 0, 0, "0123456789#*", &value)
            .unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(
            input.get_char_string(true, 0, 0, "0123456789#*").unwrap(),
            value
        );

        // No alphabet: raw octet semantics.
        let mut out = OutStream::new();
        out.put_char_string(false, 0, 10, "", &value).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_char_string(false, 0, 10, "").unwrap(), value);
    }

    #[test]
    fn test_object_id_round_trip() {
        let value = ObjectIdent::new(vec![0x00, 0x08, 0x81, 0x75, 0x00, 0x08]);
        let mut out = OutStream::new();
        out.put_object_id(&value).unwrap();
        let bytes = out.into_bytes();
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_object_id().unwrap(), value);
    }

    #[test]
    fn test_choice_index_root_round_trip() {
        for index in 0u16..4 {
            let mut out = OutStream::new();
            out.put_choice_index(4, false, index).unwrap();
            // Non-extensible rootnum 4 is exactly a 2-bit field.
            assert_eq!(out.bit_position(), 2);
            let bytes = out.into_bytes();
            let mut input = InStream::new(&bytes);
            assert_eq!(input.get_choice_index(4, false).unwrap(), index);
        }
    }

    #[test]
    fn test_choice_index_extended_round_trip() {
        // Index 7 with rootnum 4: presence bit set, then the
        // normally-small remainder 3.
        let mut out = OutStream::new();
        out.put_choice_index(4, true, 7).unwrap();
        let bytes = out.into_bytes();
        assert_eq!(bytes[0] & 0x80, 0x80);
        let mut input = InStream::new(&bytes);
        assert_eq!(input.get_choice_index(4, true).unwrap(), 7);
    }

    #[test]
    fn test_extension_skip_scenario() {
        // Sender declares 5 extension slots with presence [1,0,1,1,0]
        // and writes an open-type payload for each present one.
        let mut out = OutStream::new();
        out.put_norm_small_length(5).unwrap();
        for present in [true, false, true, true, false] {
            out.write_bit(present);
        }
        for payload in [0x11u32, 0x22, 0x33] {
            out.put_extension_integer(0, 255, payload).unwrap();
        }
        let bytes = out.into_bytes();

        // Receiver knows only the first two slots.
        let mut input = InStream::new(&bytes);
        let mut map = input.get_unknown_sig_map().unwrap();
        assert_eq!(map.size(), 5);

        // Slot 0 is present: wrapper consumed, payload decoded.
        assert_eq!(input.extension_prep(&mut map).unwrap(), Some(1));
        assert_eq!(input.get_integer(0, 255).unwrap(), 0x11);

        // Slot 1 is absent: nothing on the wire.
        assert_eq!(input.extension_prep(&mut map).unwrap(), None);

        // Slots 2 and 3 are present-and-unread; slot 4 is absent.
        assert_eq!(input.skip_unread_extensions(map).unwrap(), 2);
        assert_eq!(input.remaining_octets(), 0);
    }

    #[test]
    fn test_skip_all_extensions() {
        let mut out = OutStream::new();
        out.put_norm_small_length(2).unwrap();
        out.write_bit(true);
        out.write_bit(true);
        out.put_extension_boolean(true).unwrap();
        out.put_extension_octet_string(true, 0, 0, &OctetString::new(vec![1, 2, 3]))
            .unwrap();
        let bytes = out.into_bytes();

        let mut input = InStream::new(&bytes);
        assert_eq!(input.skip_all_extensions().unwrap(), 2);
        assert_eq!(input.remaining_octets(), 0);
    }

    #[test]
    fn test_finalize_and_reparse() {
        // The encode-then-reparse pattern: finalize, then read back
        // through a fresh input cursor.
        let mut out = OutStream::new();
        out.put_boolean(true).unwrap();
        out.put_integer(0, 7, 5).unwrap();
        out.write_remaining_bits();
        out.write_octets(&[0x12, 0x34], false);
        let bytes = out.into_bytes();

        let mut input = InStream::new(&bytes);
        assert!(input.get_boolean().unwrap());
        assert_eq!(input.get_integer(0, 7).unwrap(), 5);
        input.read_remaining_bits();
        assert_eq!(input.read_octets(2, false).unwrap(), vec![0x12, 0x34]);
        assert_eq!(input.remaining_bits(), 0);
    }
}
