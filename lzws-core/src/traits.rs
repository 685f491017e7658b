//! Engine traits for incremental compression and decompression.
//!
//! Engines work against caller-provided slices. Every call reports how much
//! source it consumed, how much output it wrote, and why it stopped. The
//! streaming adapters own the buffers; the engines own only coder state.

use crate::error::Result;

/// Why an engine call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The requested operation finished.
    Complete,
    /// All source was consumed; call again with more.
    NeedsMoreSource,
    /// The destination filled up; drain it and call again.
    NeedsMoreDestination,
}

/// Outcome of a single engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes consumed from the front of the source slice.
    pub consumed: usize,
    /// Bytes written to the front of the destination slice.
    pub written: usize,
    /// Why the call returned.
    pub step: Step,
}

impl Progress {
    /// Progress of a call that took no source.
    pub fn output(written: usize, step: Step) -> Self {
        Self {
            consumed: 0,
            written,
            step,
        }
    }
}

/// A stateful encoder that can stop at any output boundary and resume.
///
/// Output is a pure function of the sequence of source bytes: splitting the
/// source or the destination differently never changes the concatenated
/// result.
pub trait IncrementalEncoder {
    /// Destination buffer length the engine works best with.
    fn recommended_buffer_length(&self) -> usize;

    /// Emit the format's magic bytes.
    ///
    /// Returns [`Step::Complete`] or [`Step::NeedsMoreDestination`]; in the
    /// latter case the next call continues after the bytes already written.
    fn write_magic_header(&mut self, destination: &mut [u8]) -> Result<Progress>;

    /// Emit the parameter header. Same contract as `write_magic_header`.
    fn write_header(&mut self, destination: &mut [u8]) -> Result<Progress>;

    /// Encode a prefix of `source`.
    ///
    /// Returns [`Step::NeedsMoreSource`] once every byte was consumed, or
    /// [`Step::NeedsMoreDestination`] when output could not be placed.
    fn encode(&mut self, source: &[u8], destination: &mut [u8]) -> Result<Progress>;

    /// Emit all buffered state and terminate the stream.
    ///
    /// Returns [`Step::Complete`] or [`Step::NeedsMoreDestination`]; flush
    /// progress is tracked by the engine, so repeated calls never duplicate
    /// output.
    fn flush(&mut self, destination: &mut [u8]) -> Result<Progress>;
}

/// A stateful decoder that can stop at any input or output boundary.
pub trait IncrementalDecoder {
    /// Destination buffer length the engine works best with.
    fn recommended_buffer_length(&self) -> usize;

    /// Decode a prefix of `source`, including any framing.
    ///
    /// Returns [`Step::NeedsMoreSource`] once every byte was consumed, or
    /// [`Step::NeedsMoreDestination`] when decoded bytes could not be placed.
    fn decode(&mut self, source: &[u8], destination: &mut [u8]) -> Result<Progress>;

    /// Declare the end of the source, drain remaining output and validate the
    /// stream tail.
    ///
    /// Returns [`Step::Complete`] or [`Step::NeedsMoreDestination`].
    fn finish(&mut self, destination: &mut [u8]) -> Result<Progress>;
}
