//! # Nibble encoding
//!
//! VISCA carries numeric values as a sequence of bytes, each holding one 4-bit
//! digit in its low nibble, most-significant digit first. The high nibble is
//! conventionally zero and is ignored on decode.
//!
//! For example, `0x30a2` is sent as `03 00 0a 02`.

/// Maximum number of nibbles which fit in a `u32`.
pub const MAX_NIBBLES: usize = 8;

/// Decodes a nibble-encoded value.
///
/// ## Panics
///
/// If `nibbles` is longer than [MAX_NIBBLES].
pub fn decode_nibbles(nibbles: &[u8]) -> u32 {
    assert!(
        nibbles.len() <= MAX_NIBBLES,
        "{} nibbles does not fit in a u32",
        nibbles.len()
    );
    nibbles
        .iter()
        .fold(0, |acc, n| (acc << 4) | u32::from(n & 0x0f))
}

/// Encodes `value` as `width` nibbles, most-significant first.
///
/// Digits above `width` are truncated.
///
/// ## Panics
///
/// If `width` is greater than [MAX_NIBBLES].
pub fn encode_nibbles(value: u32, width: usize) -> Vec<u8> {
    assert!(
        width <= MAX_NIBBLES,
        "{width} nibbles does not fit in a u32"
    );
    (0..width)
        .rev()
        .map(|i| ((value >> (i * 4)) & 0x0f) as u8)
        .collect()
}

/// Fixed-width variant of [decode_nibbles] for `binrw` maps.
pub(crate) fn nibbles_to_u16(nibbles: [u8; 4]) -> u16 {
    decode_nibbles(&nibbles) as u16
}

/// Fixed-width variant of [encode_nibbles] for `binrw` maps.
pub(crate) fn u16_to_nibbles(value: u16) -> [u8; 4] {
    [
        ((value >> 12) & 0x0f) as u8,
        ((value >> 8) & 0x0f) as u8,
        ((value >> 4) & 0x0f) as u8,
        (value & 0x0f) as u8,
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode() {
        assert_eq!(0x30a2, decode_nibbles(&[0x03, 0x00, 0x0a, 0x02]));
        assert_eq!(0xff60, decode_nibbles(&[0x0f, 0x0f, 0x06, 0x00]));
        assert_eq!(0, decode_nibbles(&[]));

        // High nibbles are ignored
        assert_eq!(0x1234, decode_nibbles(&[0xf1, 0x52, 0xa3, 0x04]));
    }

    #[test]
    fn encode() {
        assert_eq!(vec![0x03, 0x00, 0x0a, 0x02], encode_nibbles(0x30a2, 4));
        assert_eq!(vec![0x00, 0x00, 0x0f], encode_nibbles(0xf, 3));
        assert_eq!(vec![0x0f, 0x0f], encode_nibbles(0x1ff, 2));
        assert!(encode_nibbles(0x1234, 0).is_empty());
    }

    #[test]
    fn all_widths() {
        for width in 1..=MAX_NIBBLES {
            let max = if width == MAX_NIBBLES {
                u32::MAX
            } else {
                (1 << (width * 4)) - 1
            };

            for value in [0, 1, 0xa, max / 3, max - 1, max] {
                let encoded = encode_nibbles(value, width);
                assert_eq!(width, encoded.len());
                assert_eq!(value, decode_nibbles(&encoded), "width {width}");
            }
        }
    }

    #[test]
    fn fixed_width() {
        assert_eq!([0x0f, 0x0f, 0x06, 0x00], u16_to_nibbles(0xff60));
        assert_eq!(0xff60, nibbles_to_u16([0x0f, 0x0f, 0x06, 0x00]));
    }

    #[test]
    #[should_panic]
    fn too_wide() {
        decode_nibbles(&[0; MAX_NIBBLES + 1]);
    }
}
