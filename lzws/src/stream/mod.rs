//! Streaming adapters.
//!
//! A session couples one engine with one fixed-capacity
//! [`DestinationBuffer`](lzws_core::buffer::DestinationBuffer). Callers feed
//! source bytes, drain the produced region with `read()`, and retry whenever a
//! call reports that the buffer ran out of room:
//!
//! ```rust
//! use lzws::{Compressor, CompressorOptions, Status};
//!
//! let mut compressor = Compressor::new(CompressorOptions::default()).unwrap();
//! let mut output = Vec::new();
//!
//! while compressor.write_magic_header().unwrap() == Status::NeedsMoreOutputSpace {
//!     output.extend(compressor.read());
//! }
//! while compressor.write_header().unwrap() == Status::NeedsMoreOutputSpace {
//!     output.extend(compressor.read());
//! }
//!
//! let mut source: &[u8] = b"hello hello hello";
//! while !source.is_empty() {
//!     let consumed = compressor.write(source).unwrap();
//!     source = &source[consumed..];
//!     output.extend(compressor.read());
//! }
//!
//! while compressor.flush().unwrap() == Status::NeedsMoreOutputSpace {
//!     output.extend(compressor.read());
//! }
//! output.extend(compressor.read());
//!
//! assert_eq!(&output[..3], &[0x1F, 0x9D, 0x90]);
//! ```
//!
//! [`CompressWriter`] and [`DecompressReader`] wrap the sessions as
//! `std::io::Write` and `std::io::Read`.

mod compressor;
mod decompressor;
mod reader;
mod writer;

pub use compressor::Compressor;
pub use decompressor::Decompressor;
pub use reader::DecompressReader;
pub use writer::CompressWriter;

use lzws_core::buffer::DestinationBuffer;
use lzws_core::error::Result;

/// Lifecycle position of a session.
///
/// Phases only move forward. Optional phases may be skipped, but a call that
/// belongs to an earlier phase fails with an engine fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Nothing written yet.
    Created,
    /// Magic header partially written.
    MagicHeaderPending,
    /// Magic header written.
    MagicHeaderDone,
    /// Parameter header waiting for output space.
    HeaderPending,
    /// Parameter header written.
    HeaderDone,
    /// Payload in progress.
    Streaming,
    /// Flush (or finish) in progress.
    Flushing,
    /// Stream complete; only `read()` is allowed.
    Terminal,
}

/// Outcome of a header write, flush or finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation finished.
    Complete,
    /// The buffer is full: call `read()`, then repeat the same call.
    NeedsMoreOutputSpace,
}

/// Allocate the session buffer: the requested length, or the engine's
/// recommendation when 0.
fn allocate_buffer(requested: usize, recommended: usize) -> Result<DestinationBuffer> {
    let length = if requested == 0 { recommended } else { requested };
    DestinationBuffer::with_capacity(length)
}
