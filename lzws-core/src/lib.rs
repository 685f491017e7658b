//! # lzws Core
//!
//! Core components shared by the lzws engine and streaming adapters.
//!
//! - [`bitstream`]: Variable-width code packing (LSB-first or MSB-first)
//! - [`buffer`]: Fixed-capacity destination buffer with a write cursor
//! - [`traits`]: Incremental encoder/decoder traits and their step results
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Surfaces                                            │
//! │     one-shot compress/decompress, io::Write/io::Read, CLI│
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Streaming adapters                                  │
//! │     Compressor / Decompressor sessions                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Engine                                              │
//! │     LzwEncoder / LzwDecoder (dictionary, framing)       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: Core (this crate)                                   │
//! │     CodeReader/CodeWriter, DestinationBuffer, traits    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lzws_core::buffer::DestinationBuffer;
//!
//! let mut buffer = DestinationBuffer::with_capacity(4).unwrap();
//! buffer.free_mut()[..2].copy_from_slice(&[0x1F, 0x9D]);
//! buffer.advance(2).unwrap();
//! assert_eq!(buffer.take(), vec![0x1F, 0x9D]);
//! assert!(buffer.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod buffer;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitOrder, CodeReader, CodeWriter};
pub use buffer::DestinationBuffer;
pub use error::{LzwsError, Result};
pub use traits::{IncrementalDecoder, IncrementalEncoder, Progress, Step};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitOrder, CodeReader, CodeWriter};
    pub use crate::buffer::DestinationBuffer;
    pub use crate::error::{LzwsError, Result};
    pub use crate::traits::{IncrementalDecoder, IncrementalEncoder, Progress, Step};
}
