//! Stream framing for the `compress(1)` .Z format.
//!
//! A stream is laid out as:
//!
//! ```text
//! ┌───────────┬────────────────┬──────────────────────────────┐
//! │ 1F 9D     │ flags          │ LZW codes (9..=max bits)     │
//! │ magic     │ B00MMMMM       │ zero-padded to a byte        │
//! └───────────┴────────────────┴──────────────────────────────┘
//! ```
//!
//! `B` is the block mode flag and `MMMMM` the maximum code bit length. The two
//! middle bits are reserved and must be zero.

use lzws_core::error::{LzwsError, Result};

/// Magic bytes that open every framed stream.
pub const MAGIC_HEADER: [u8; 2] = [0x1F, 0x9D];

/// Header flag set when the stream uses block mode (CLEAR codes).
pub const BLOCK_MODE_FLAG: u8 = 0x80;

/// Header bits holding the maximum code bit length.
pub const MAX_CODE_BIT_MASK: u8 = 0x1F;

/// Header bits that must be zero.
pub const RESERVED_MASK: u8 = 0x60;

/// Smallest accepted maximum code bit length.
pub const LOWEST_MAX_CODE_BIT_LENGTH: u8 = 9;

/// Largest accepted maximum code bit length.
pub const BIGGEST_MAX_CODE_BIT_LENGTH: u8 = 16;

/// Code width every stream starts with, and returns to after CLEAR.
pub const INITIAL_CODE_BIT_LENGTH: u8 = 9;

/// Code that resets the dictionary in block mode.
pub const CLEAR_CODE: u16 = 256;

/// Number of literal codes.
pub const ALPHABET_LENGTH: u32 = 256;

/// Codes per alignment group: width changes pad to a multiple of this.
pub const CODES_PER_GROUP: u32 = 8;

/// Destination buffer length the compressor recommends.
pub const RECOMMENDED_COMPRESSOR_BUFFER_LENGTH: usize = 32 * 1024;

/// Destination buffer length the decompressor recommends.
pub const RECOMMENDED_DECOMPRESSOR_BUFFER_LENGTH: usize = 64 * 1024;

/// First code assigned to a new dictionary entry.
pub fn first_free_code(block_mode: bool) -> u32 {
    if block_mode {
        CLEAR_CODE as u32 + 1
    } else {
        ALPHABET_LENGTH
    }
}

/// Largest code representable in `width` bits.
pub fn max_code_for_width(width: u8) -> u32 {
    (1u32 << width) - 1
}

/// Widest code a stream with `max_code_bit_length` ever carries.
///
/// A 9-bit stream still grows to 10 bits once its table is full, as
/// `compress(1)` and `gzip` do; the extra width holds no new entries.
pub fn code_width_limit(max_code_bit_length: u8) -> u8 {
    max_code_bit_length.max(INITIAL_CODE_BIT_LENGTH + 1)
}

/// Zero bits needed to pad `codes_in_group` codes of `width` bits up to a
/// whole group.
pub fn alignment_padding_bits(codes_in_group: u32, width: u8) -> u32 {
    let missing = (CODES_PER_GROUP - codes_in_group % CODES_PER_GROUP) % CODES_PER_GROUP;
    missing * width as u32
}

/// Parameters carried by the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamHeader {
    /// Maximum code bit length.
    pub max_code_bit_length: u8,
    /// Whether the dictionary may be reset with CLEAR codes.
    pub block_mode: bool,
}

impl StreamHeader {
    /// Encode as the header byte.
    pub fn to_byte(self) -> u8 {
        let mut byte = self.max_code_bit_length & MAX_CODE_BIT_MASK;
        if self.block_mode {
            byte |= BLOCK_MODE_FLAG;
        }
        byte
    }

    /// Decode a header byte, describing the problem on failure.
    pub fn from_byte(byte: u8) -> std::result::Result<Self, String> {
        if byte & RESERVED_MASK != 0 {
            return Err(format!("reserved header bits set in {:#04x}", byte));
        }

        let max_code_bit_length = byte & MAX_CODE_BIT_MASK;
        if !(LOWEST_MAX_CODE_BIT_LENGTH..=BIGGEST_MAX_CODE_BIT_LENGTH)
            .contains(&max_code_bit_length)
        {
            return Err(format!(
                "max code bit length {} out of range {}-{}",
                max_code_bit_length, LOWEST_MAX_CODE_BIT_LENGTH, BIGGEST_MAX_CODE_BIT_LENGTH
            ));
        }

        Ok(Self {
            max_code_bit_length,
            block_mode: byte & BLOCK_MODE_FLAG != 0,
        })
    }
}

/// Check the magic bytes and parse the header at the start of `data`.
///
/// # Example
///
/// ```rust
/// use lzws::format::{read_stream_header, StreamHeader};
///
/// let header = read_stream_header(&[0x1F, 0x9D, 0x90]).unwrap();
/// assert_eq!(
///     header,
///     StreamHeader { max_code_bit_length: 16, block_mode: true }
/// );
/// ```
pub fn read_stream_header(data: &[u8]) -> Result<StreamHeader> {
    for (offset, &expected) in MAGIC_HEADER.iter().enumerate() {
        match data.get(offset) {
            None => return Err(LzwsError::corrupted(offset as u64, "truncated magic header")),
            Some(&found) if found != expected => {
                return Err(LzwsError::corrupted(
                    offset as u64,
                    format!("invalid magic byte {:#04x}", found),
                ));
            }
            Some(_) => {}
        }
    }

    let offset = MAGIC_HEADER.len();
    let byte = data
        .get(offset)
        .copied()
        .ok_or_else(|| LzwsError::corrupted(offset as u64, "truncated header"))?;

    StreamHeader::from_byte(byte).map_err(|message| LzwsError::corrupted(offset as u64, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_byte() {
        let header = StreamHeader {
            max_code_bit_length: 16,
            block_mode: true,
        };
        assert_eq!(header.to_byte(), 0x90);
        assert_eq!(StreamHeader::from_byte(0x90).unwrap(), header);

        let header = StreamHeader {
            max_code_bit_length: 12,
            block_mode: false,
        };
        assert_eq!(header.to_byte(), 0x0C);
        assert_eq!(StreamHeader::from_byte(0x0C).unwrap(), header);
    }

    #[test]
    fn test_header_rejects_bad_bytes() {
        assert!(StreamHeader::from_byte(0x88).is_err());
        assert!(StreamHeader::from_byte(0x91).is_err());
        assert!(StreamHeader::from_byte(0xB0).is_err());
    }

    #[test]
    fn test_first_free_code() {
        assert_eq!(first_free_code(true), 257);
        assert_eq!(first_free_code(false), 256);
    }

    #[test]
    fn test_code_width_limit() {
        assert_eq!(code_width_limit(9), 10);
        assert_eq!(code_width_limit(10), 10);
        assert_eq!(code_width_limit(16), 16);
    }

    #[test]
    fn test_alignment_padding() {
        assert_eq!(alignment_padding_bits(0, 9), 0);
        assert_eq!(alignment_padding_bits(8, 9), 0);
        assert_eq!(alignment_padding_bits(3, 9), 45);
        assert_eq!(alignment_padding_bits(9, 16), 112);
    }

    #[test]
    fn test_read_stream_header() {
        assert!(read_stream_header(&[0x1F, 0x9D, 0x10]).is_ok());

        let err = read_stream_header(&[0x1F, 0x9E, 0x90]).unwrap_err();
        assert!(matches!(err, LzwsError::CorruptedSource { offset: 1, .. }));

        let err = read_stream_header(&[0x1F]).unwrap_err();
        assert!(matches!(err, LzwsError::CorruptedSource { offset: 1, .. }));

        let err = read_stream_header(&[0x1F, 0x9D]).unwrap_err();
        assert!(matches!(err, LzwsError::CorruptedSource { offset: 2, .. }));
    }
}
