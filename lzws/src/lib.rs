//! # lzws: Pure Rust streaming LZW
//!
//! This crate compresses and decompresses the LZW format written by the
//! classic `compress(1)` utility (`.Z` files), with streaming adapters that
//! work against a fixed-capacity output buffer.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **compress(1) compatible**: 9-16 bit codes, block mode with CLEAR codes,
//!   bit group alignment
//! - **Variants**: MSB-first packing and unaligned bit groups
//! - **Streaming**: [`Compressor`] / [`Decompressor`] sessions that can stop
//!   at any output boundary and resume, plus `io::Write` / `io::Read` adapters
//!
//! ## Format
//!
//! - **Magic bytes**: `1F 9D`
//! - **Header byte**: maximum code bit length in bits 0-4, block mode in bit 7
//! - **Codes**: start at 9 bits and grow to the maximum; in block mode code
//!   256 resets the dictionary
//! - **Padding**: on every width change the codes written at the old width are
//!   padded to a multiple of 8 (unless `unaligned_bit_groups`)
//!
//! ## Example
//!
//! ```rust
//! use lzws::{compress, decompress, CompressorOptions, DecompressorOptions};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = compress(original, &CompressorOptions::default()).unwrap();
//! assert_eq!(&compressed[..2], &[0x1F, 0x9D]);
//!
//! let decompressed = decompress(&compressed, &DecompressorOptions::default()).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! Malformed input is a distinct, catchable error:
//!
//! ```rust
//! use lzws::{decompress, DecompressorOptions};
//!
//! let err = decompress(b"not lzw", &DecompressorOptions::default().with_quiet(true))
//!     .unwrap_err();
//! assert!(err.is_corrupted_source());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod format;
pub mod stream;

pub use config::{CompressorOptions, DecompressorOptions};
pub use decoder::LzwDecoder;
pub use encoder::LzwEncoder;
pub use format::StreamHeader;
pub use lzws_core::error::{LzwsError, Result};
pub use stream::{CompressWriter, Compressor, DecompressReader, Decompressor, Phase, Status};

use lzws_core::traits::{IncrementalDecoder, IncrementalEncoder, Progress, Step};

/// Output vector grown in fixed steps with fallible reservation.
struct GrowableOutput {
    data: Vec<u8>,
    step: usize,
}

impl GrowableOutput {
    fn new(step: usize) -> Self {
        Self {
            data: Vec::new(),
            step,
        }
    }

    /// Run one engine call against `step` bytes of fresh space.
    fn run<F>(&mut self, call: F) -> Result<Progress>
    where
        F: FnOnce(&mut [u8]) -> Result<Progress>,
    {
        let start = self.data.len();
        self.data
            .try_reserve(self.step)
            .map_err(|e| LzwsError::from_reserve(self.step, e))?;
        self.data.resize(start + self.step, 0);

        let result = call(&mut self.data[start..]);
        let written = result.as_ref().map_or(0, |progress| progress.written);
        self.data.truncate(start + written);
        result
    }

    fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

fn step_length(requested: usize, recommended: usize) -> usize {
    if requested == 0 { recommended } else { requested }
}

/// Compress `source` into a complete framed stream.
///
/// # Errors
///
/// [`LzwsError::Validation`] if `options` are invalid,
/// [`LzwsError::Allocation`] if the output cannot grow.
///
/// # Example
///
/// ```rust
/// use lzws::{compress, CompressorOptions};
///
/// let compressed = compress(b"", &CompressorOptions::default()).unwrap();
/// assert_eq!(compressed, vec![0x1F, 0x9D, 0x90]);
/// ```
pub fn compress(source: &[u8], options: &CompressorOptions) -> Result<Vec<u8>> {
    options
        .validate()
        .map_err(|e| LzwsError::validation(e.to_string()))?;

    let mut encoder = LzwEncoder::new(*options)?;
    let mut output = GrowableOutput::new(step_length(
        options.destination_buffer_length,
        encoder.recommended_buffer_length(),
    ));

    while output.run(|d| encoder.write_magic_header(d))?.step != Step::Complete {}
    while output.run(|d| encoder.write_header(d))?.step != Step::Complete {}

    let mut rest = source;
    while !rest.is_empty() {
        let progress = output.run(|d| encoder.encode(rest, d))?;
        rest = &rest[progress.consumed..];
    }

    while output.run(|d| encoder.flush(d))?.step != Step::Complete {}

    Ok(output.into_inner())
}

/// Decompress a complete framed stream.
///
/// # Errors
///
/// [`LzwsError::CorruptedSource`] if `source` is not a well-formed stream,
/// [`LzwsError::Allocation`] if the output cannot grow.
pub fn decompress(source: &[u8], options: &DecompressorOptions) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(*options)?;
    let mut output = GrowableOutput::new(step_length(
        options.destination_buffer_length,
        decoder.recommended_buffer_length(),
    ));

    let mut rest = source;
    loop {
        let progress = output.run(|d| decoder.decode(rest, d))?;
        rest = &rest[progress.consumed..];
        match progress.step {
            Step::NeedsMoreSource => break,
            Step::NeedsMoreDestination => {}
            Step::Complete => {
                return Err(LzwsError::engine_fault("decoder reported completion mid-stream"));
            }
        }
    }

    while output.run(|d| decoder.finish(d))?.step != Step::Complete {}

    Ok(output.into_inner())
}
