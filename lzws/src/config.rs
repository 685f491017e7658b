//! Compressor and decompressor options.

use crate::format::{BIGGEST_MAX_CODE_BIT_LENGTH, LOWEST_MAX_CODE_BIT_LENGTH, StreamHeader};
use lzws_core::bitstream::BitOrder;
use lzws_core::error::{LzwsError, Result};

/// Options for compression.
///
/// The defaults produce streams readable by the classic `compress(1)`
/// utility: 16-bit maximum codes, block mode, LSB-first packing and aligned
/// bit groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressorOptions {
    /// Maximum code size in bits (9-16).
    pub max_code_bit_length: u8,
    /// Whether to reset the dictionary with CLEAR codes when it fills up.
    pub block_mode: bool,
    /// Pack codes MSB-first instead of LSB-first.
    pub msb: bool,
    /// Skip the zero padding normally inserted when the code width changes.
    pub unaligned_bit_groups: bool,
    /// Suppress diagnostic log output.
    pub quiet: bool,
    /// Destination buffer length; 0 selects the engine's recommendation.
    pub destination_buffer_length: usize,
}

impl Default for CompressorOptions {
    fn default() -> Self {
        Self {
            max_code_bit_length: BIGGEST_MAX_CODE_BIT_LENGTH,
            block_mode: true,
            msb: false,
            unaligned_bit_groups: false,
            quiet: false,
            destination_buffer_length: 0,
        }
    }
}

impl CompressorOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum code bit length.
    pub fn with_max_code_bit_length(mut self, max_code_bit_length: u8) -> Self {
        self.max_code_bit_length = max_code_bit_length;
        self
    }

    /// Enable or disable block mode.
    pub fn with_block_mode(mut self, block_mode: bool) -> Self {
        self.block_mode = block_mode;
        self
    }

    /// Select MSB-first packing.
    pub fn with_msb(mut self, msb: bool) -> Self {
        self.msb = msb;
        self
    }

    /// Disable bit group alignment.
    pub fn with_unaligned_bit_groups(mut self, unaligned_bit_groups: bool) -> Self {
        self.unaligned_bit_groups = unaligned_bit_groups;
        self
    }

    /// Suppress diagnostic log output.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the destination buffer length (0 for the engine's recommendation).
    pub fn with_destination_buffer_length(mut self, length: usize) -> Self {
        self.destination_buffer_length = length;
        self
    }

    /// Check the parameter combination.
    pub fn validate(&self) -> Result<()> {
        if !(LOWEST_MAX_CODE_BIT_LENGTH..=BIGGEST_MAX_CODE_BIT_LENGTH)
            .contains(&self.max_code_bit_length)
        {
            return Err(LzwsError::configuration(format!(
                "max code bit length {} out of range {}-{}",
                self.max_code_bit_length, LOWEST_MAX_CODE_BIT_LENGTH, BIGGEST_MAX_CODE_BIT_LENGTH
            )));
        }
        Ok(())
    }

    /// Bit packing order.
    pub fn bit_order(&self) -> BitOrder {
        BitOrder::from_msb(self.msb)
    }

    /// Header written for these options.
    pub fn stream_header(&self) -> StreamHeader {
        StreamHeader {
            max_code_bit_length: self.max_code_bit_length,
            block_mode: self.block_mode,
        }
    }

    /// Decompressor options able to read streams produced with these options.
    pub fn decompressor_options(&self) -> DecompressorOptions {
        DecompressorOptions {
            msb: self.msb,
            unaligned_bit_groups: self.unaligned_bit_groups,
            quiet: self.quiet,
            destination_buffer_length: self.destination_buffer_length,
        }
    }
}

/// Options for decompression.
///
/// Code width and block mode are read from the stream header; only the
/// packing details that the header does not record are configured here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecompressorOptions {
    /// Codes are packed MSB-first.
    pub msb: bool,
    /// The stream has no padding at code width changes.
    pub unaligned_bit_groups: bool,
    /// Suppress diagnostic log output.
    pub quiet: bool,
    /// Destination buffer length; 0 selects the engine's recommendation.
    pub destination_buffer_length: usize,
}

impl DecompressorOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select MSB-first unpacking.
    pub fn with_msb(mut self, msb: bool) -> Self {
        self.msb = msb;
        self
    }

    /// Expect no bit group alignment.
    pub fn with_unaligned_bit_groups(mut self, unaligned_bit_groups: bool) -> Self {
        self.unaligned_bit_groups = unaligned_bit_groups;
        self
    }

    /// Suppress diagnostic log output.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the destination buffer length (0 for the engine's recommendation).
    pub fn with_destination_buffer_length(mut self, length: usize) -> Self {
        self.destination_buffer_length = length;
        self
    }

    /// Bit unpacking order.
    pub fn bit_order(&self) -> BitOrder {
        BitOrder::from_msb(self.msb)
    }
}
