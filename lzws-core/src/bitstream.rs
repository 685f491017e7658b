//! Bit-level code I/O for variable-width LZW codes.
//!
//! Codes are between 1 and 16 bits wide. Both directions work against byte
//! slices rather than `Read`/`Write` so that the incremental engines can stop
//! at any byte boundary and resume on the next call without losing bits: all
//! partially assembled bytes live in the packer state.
//!
//! # Bit Ordering
//!
//! The classic `compress(1)` format packs codes LSB-first: the first code
//! occupies the least significant bits of the first byte. [`BitOrder::Msb`]
//! packs from the most significant bit instead.
//!
//! # Example
//!
//! ```
//! use lzws_core::bitstream::{BitOrder, CodeReader, CodeWriter};
//!
//! let mut output = Vec::new();
//! let mut writer = CodeWriter::new(BitOrder::Lsb);
//! writer.write_code(0x141, 9, &mut output);
//! writer.write_code(0x0FF, 9, &mut output);
//! writer.finish(&mut output);
//!
//! let mut reader = CodeReader::new(BitOrder::Lsb);
//! let mut input = &output[..];
//! assert_eq!(reader.read_code(&mut input, 9), Some(0x141));
//! assert_eq!(reader.read_code(&mut input, 9), Some(0x0FF));
//! ```

/// Bit packing order within a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Least significant bit first (the `compress(1)` default).
    #[default]
    Lsb,
    /// Most significant bit first.
    Msb,
}

impl BitOrder {
    /// Select the bit order from an `msb` flag.
    pub fn from_msb(msb: bool) -> Self {
        if msb { Self::Msb } else { Self::Lsb }
    }
}

#[inline]
fn low_mask(bits: u8) -> u64 {
    (1u64 << bits).wrapping_sub(1)
}

/// Packs variable-width codes into bytes.
///
/// Completed bytes are appended to a caller-provided `Vec<u8>`; at most seven
/// bits are ever held back in the packer itself.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    /// Bit packing order.
    order: BitOrder,
    /// Bit buffer.
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written (including padding).
    total_bits_written: u64,
}

impl CodeWriter {
    /// Create a new code writer.
    pub fn new(order: BitOrder) -> Self {
        Self {
            order,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Get the bit order.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of bits waiting for a byte to be completed.
    pub fn partial_bits(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Write the low `width` bits of `code`.
    #[inline]
    pub fn write_code(&mut self, code: u16, width: u8, out: &mut Vec<u8>) {
        debug_assert!((1..=16).contains(&width), "code width must be 1-16");

        let value = code as u64 & low_mask(width);
        match self.order {
            BitOrder::Lsb => {
                self.buffer |= value << self.bits_in_buffer;
                self.bits_in_buffer += width;
                while self.bits_in_buffer >= 8 {
                    out.push(self.buffer as u8);
                    self.buffer >>= 8;
                    self.bits_in_buffer -= 8;
                }
            }
            BitOrder::Msb => {
                self.buffer = (self.buffer << width) | value;
                self.bits_in_buffer += width;
                while self.bits_in_buffer >= 8 {
                    out.push((self.buffer >> (self.bits_in_buffer - 8)) as u8);
                    self.bits_in_buffer -= 8;
                }
                self.buffer &= low_mask(self.bits_in_buffer);
            }
        }
        self.total_bits_written += width as u64;
    }

    /// Write `count` zero bits.
    pub fn write_zeros(&mut self, mut count: u32, out: &mut Vec<u8>) {
        while count > 0 {
            let chunk = count.min(16) as u8;
            self.write_code(0, chunk, out);
            count -= chunk as u32;
        }
    }

    /// Flush the partial byte, padding it with zero bits.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if self.bits_in_buffer == 0 {
            return;
        }

        let padding = 8 - self.bits_in_buffer;
        let byte = match self.order {
            BitOrder::Lsb => self.buffer as u8,
            BitOrder::Msb => (self.buffer << padding) as u8,
        };
        out.push(byte);

        self.total_bits_written += padding as u64;
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }
}

/// Unpacks variable-width codes from a sequence of input slices.
///
/// Input is passed as `&mut &[u8]`; every byte pulled into the bit buffer is
/// removed from the front of the slice, so the caller learns how much was
/// consumed from the slice's new length.
#[derive(Debug, Clone)]
pub struct CodeReader {
    /// Bit packing order.
    order: BitOrder,
    /// Bit buffer.
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl CodeReader {
    /// Create a new code reader.
    pub fn new(order: BitOrder) -> Self {
        Self {
            order,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Get the total number of bits consumed as codes or skipped padding.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bits pulled from input but not yet consumed.
    pub fn buffered_bits(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Whether every buffered bit is zero.
    pub fn buffered_bits_are_zero(&self) -> bool {
        self.buffer & low_mask(self.bits_in_buffer) == 0
    }

    #[inline]
    fn pull_byte(&mut self, input: &mut &[u8]) -> bool {
        let Some((&byte, rest)) = input.split_first() else {
            return false;
        };
        *input = rest;

        match self.order {
            BitOrder::Lsb => self.buffer |= (byte as u64) << self.bits_in_buffer,
            BitOrder::Msb => self.buffer = (self.buffer << 8) | byte as u64,
        }
        self.bits_in_buffer += 8;
        true
    }

    #[inline]
    fn drop_bits(&mut self, count: u8) -> u64 {
        let value = match self.order {
            BitOrder::Lsb => {
                let value = self.buffer & low_mask(count);
                self.buffer >>= count;
                value
            }
            BitOrder::Msb => {
                let value = (self.buffer >> (self.bits_in_buffer - count)) & low_mask(count);
                self.buffer &= low_mask(self.bits_in_buffer - count);
                value
            }
        };
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;
        value
    }

    /// Read one code of `width` bits.
    ///
    /// Returns `None` when the input ran out first; the bits gathered so far
    /// stay buffered and the next call continues from them.
    #[inline]
    pub fn read_code(&mut self, input: &mut &[u8], width: u8) -> Option<u16> {
        debug_assert!((1..=16).contains(&width), "code width must be 1-16");

        while self.bits_in_buffer < width {
            if !self.pull_byte(input) {
                return None;
            }
        }

        Some(self.drop_bits(width) as u16)
    }

    /// Skip up to `count` bits, returning how many were actually skipped.
    pub fn skip_bits(&mut self, input: &mut &[u8], count: u32) -> u32 {
        let mut skipped = 0;
        while skipped < count {
            if self.bits_in_buffer == 0 && !self.pull_byte(input) {
                break;
            }
            let take = (count - skipped).min(self.bits_in_buffer as u32) as u8;
            self.drop_bits(take);
            skipped += take as u32;
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(order: BitOrder) {
        let codes: [(u16, u8); 6] = [
            (0x41, 9),
            (0x1FF, 9),
            (0x200, 10),
            (0x3FF, 10),
            (0xABCD, 16),
            (0x1, 1),
        ];

        let mut output = Vec::new();
        let mut writer = CodeWriter::new(order);
        for &(code, width) in &codes {
            writer.write_code(code, width, &mut output);
        }
        writer.finish(&mut output);

        let mut reader = CodeReader::new(order);
        let mut input = &output[..];
        for &(code, width) in &codes {
            assert_eq!(reader.read_code(&mut input, width), Some(code));
        }
        assert!(reader.buffered_bits() < 8);
        assert!(reader.buffered_bits_are_zero());
    }

    #[test]
    fn test_lsb_roundtrip() {
        roundtrip(BitOrder::Lsb);
    }

    #[test]
    fn test_msb_roundtrip() {
        roundtrip(BitOrder::Msb);
    }

    #[test]
    fn test_lsb_layout() {
        let mut output = Vec::new();
        let mut writer = CodeWriter::new(BitOrder::Lsb);
        writer.write_code(0x41, 9, &mut output);
        writer.finish(&mut output);
        assert_eq!(output, vec![0x41, 0x00]);
    }

    #[test]
    fn test_msb_layout() {
        let mut output = Vec::new();
        let mut writer = CodeWriter::new(BitOrder::Msb);
        writer.write_code(0x41, 9, &mut output);
        writer.finish(&mut output);
        assert_eq!(output, vec![0x20, 0x80]);
    }

    #[test]
    fn test_read_resumes_across_slices() {
        let mut output = Vec::new();
        let mut writer = CodeWriter::new(BitOrder::Lsb);
        writer.write_code(0x155, 9, &mut output);
        writer.write_code(0x0AA, 9, &mut output);
        writer.finish(&mut output);
        assert_eq!(output.len(), 3);

        let mut reader = CodeReader::new(BitOrder::Lsb);

        let mut first = &output[..1];
        assert_eq!(reader.read_code(&mut first, 9), None);
        assert!(first.is_empty());

        let mut rest = &output[1..];
        assert_eq!(reader.read_code(&mut rest, 9), Some(0x155));
        assert_eq!(reader.read_code(&mut rest, 9), Some(0x0AA));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_write_zeros_and_skip() {
        for order in [BitOrder::Lsb, BitOrder::Msb] {
            let mut output = Vec::new();
            let mut writer = CodeWriter::new(order);
            writer.write_code(0x123, 9, &mut output);
            writer.write_zeros(45, &mut output);
            writer.write_code(0x2AB, 10, &mut output);
            writer.finish(&mut output);
            assert_eq!(writer.bits_written() % 8, 0);

            let mut reader = CodeReader::new(order);
            let mut input = &output[..];
            assert_eq!(reader.read_code(&mut input, 9), Some(0x123));
            assert_eq!(reader.skip_bits(&mut input, 45), 45);
            assert_eq!(reader.read_code(&mut input, 10), Some(0x2AB));
        }
    }

    #[test]
    fn test_skip_stops_at_end_of_input() {
        let data = [0u8; 2];
        let mut reader = CodeReader::new(BitOrder::Lsb);
        let mut input = &data[..];
        assert_eq!(reader.skip_bits(&mut input, 40), 16);
        assert_eq!(reader.bits_read(), 16);
    }

    #[test]
    fn test_nonzero_trailing_bits_detected() {
        let data = [0xFFu8];
        let mut reader = CodeReader::new(BitOrder::Lsb);
        let mut input = &data[..];
        assert_eq!(reader.read_code(&mut input, 9), None);
        assert_eq!(reader.buffered_bits(), 8);
        assert!(!reader.buffered_bits_are_zero());
    }
}
