//! Streaming decompression session.

use super::{Phase, Status, allocate_buffer};
use crate::config::DecompressorOptions;
use crate::decoder::LzwDecoder;
use lzws_core::buffer::DestinationBuffer;
use lzws_core::error::{LzwsError, Result};
use lzws_core::traits::{IncrementalDecoder, Step};
use tracing::{debug, trace, warn};

/// Streaming decompressor: one engine plus one destination buffer.
///
/// The magic bytes and the parameter header are parsed from the written
/// source, so the only phases used are `Created`, `Streaming`, `Flushing`
/// (while `finish` drains) and `Terminal`.
#[derive(Debug)]
pub struct Decompressor<D: IncrementalDecoder = LzwDecoder> {
    engine: D,
    buffer: DestinationBuffer,
    options: DecompressorOptions,
    phase: Phase,
}

impl Decompressor<LzwDecoder> {
    /// Create the LZW engine and allocate the buffer.
    pub fn new(options: DecompressorOptions) -> Result<Self> {
        let engine = LzwDecoder::new(options)?;
        Self::with_engine(engine, options)
    }
}

impl<D: IncrementalDecoder> Decompressor<D> {
    /// Wrap an existing engine.
    pub fn with_engine(engine: D, options: DecompressorOptions) -> Result<Self> {
        let buffer = allocate_buffer(
            options.destination_buffer_length,
            engine.recommended_buffer_length(),
        )?;

        debug!(
            msb = options.msb,
            unaligned_bit_groups = options.unaligned_bit_groups,
            buffer_capacity = buffer.capacity(),
            "created decompressor"
        );

        Ok(Self {
            engine,
            buffer,
            options,
            phase: Phase::Created,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Capacity of the destination buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Decoded bytes not yet read.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Options the session was created with.
    pub fn options(&self) -> &DecompressorOptions {
        &self.options
    }

    /// Decompress a prefix of `source`, returning how many bytes were consumed.
    ///
    /// # Errors
    ///
    /// [`LzwsError::CorruptedSource`] if `source` is not a well-formed stream.
    pub fn write(&mut self, source: &[u8]) -> Result<usize> {
        if !matches!(self.phase, Phase::Created | Phase::Streaming) {
            return Err(self.fault(&format!("write not allowed in phase {:?}", self.phase)));
        }
        self.phase = Phase::Streaming;

        let progress = self.engine.decode(source, self.buffer.free_mut());
        let progress = self.close_on_error(progress)?;
        let advanced = self.buffer.advance(progress.written);
        self.close_on_error(advanced)?;

        match progress.step {
            Step::NeedsMoreSource => {}
            Step::NeedsMoreDestination => {
                trace!(consumed = progress.consumed, "decompressor buffer full");
            }
            Step::Complete => {
                self.phase = Phase::Terminal;
                return Err(self.fault("decoder reported completion during write"));
            }
        }
        if progress.consumed > source.len() {
            self.phase = Phase::Terminal;
            return Err(self.fault("decoder consumed more than it was given"));
        }
        Ok(progress.consumed)
    }

    /// Take everything decoded so far and empty the buffer.
    pub fn read(&mut self) -> Vec<u8> {
        self.buffer.take()
    }

    /// Declare the end of the source and validate the stream tail.
    ///
    /// Repeat with `read()` in between until [`Status::Complete`].
    pub fn finish(&mut self) -> Result<Status> {
        if self.phase == Phase::Terminal {
            return Err(self.fault("finish called on a terminal session"));
        }
        self.phase = Phase::Flushing;

        let progress = self.engine.finish(self.buffer.free_mut());
        let progress = self.close_on_error(progress)?;
        let advanced = self.buffer.advance(progress.written);
        self.close_on_error(advanced)?;

        match progress.step {
            Step::Complete => {
                debug!("decompressor finished");
                self.phase = Phase::Terminal;
                Ok(Status::Complete)
            }
            Step::NeedsMoreDestination => Ok(Status::NeedsMoreOutputSpace),
            Step::NeedsMoreSource => {
                self.phase = Phase::Terminal;
                Err(self.fault("decoder asked for source during finish"))
            }
        }
    }

    /// An engine error ends the session: later calls are faults.
    fn close_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.phase = Phase::Terminal;
        }
        result
    }

    fn fault(&self, message: &str) -> LzwsError {
        if !self.options.quiet {
            warn!(reason = message, "decompressor engine fault");
        }
        LzwsError::engine_fault(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressorOptions;

    fn quiet() -> DecompressorOptions {
        DecompressorOptions::default().with_quiet(true)
    }

    fn run_to_end(decompressor: &mut Decompressor, source: &[u8], chunk: usize) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        for piece in source.chunks(chunk.max(1)) {
            let mut rest = piece;
            while !rest.is_empty() {
                let consumed = decompressor.write(rest)?;
                rest = &rest[consumed..];
                output.extend(decompressor.read());
            }
        }
        while decompressor.finish()? == Status::NeedsMoreOutputSpace {
            output.extend(decompressor.read());
        }
        output.extend(decompressor.read());
        Ok(output)
    }

    #[test]
    fn test_streaming_roundtrip() {
        let original = b"streaming decompression, streaming decompression".repeat(30);
        let compressed = crate::compress(&original, &CompressorOptions::default()).unwrap();

        for capacity in [1, 3, 1024] {
            for chunk in [1, 4, compressed.len()] {
                let mut decompressor =
                    Decompressor::new(quiet().with_destination_buffer_length(capacity)).unwrap();
                let output = run_to_end(&mut decompressor, &compressed, chunk).unwrap();
                assert_eq!(output, original, "capacity={} chunk={}", capacity, chunk);
                assert_eq!(decompressor.phase(), Phase::Terminal);
            }
        }
    }

    #[test]
    fn test_uses_recommended_buffer() {
        let decompressor = Decompressor::new(quiet()).unwrap();
        assert_eq!(
            decompressor.buffer_capacity(),
            crate::format::RECOMMENDED_DECOMPRESSOR_BUFFER_LENGTH
        );
        assert_eq!(decompressor.pending_len(), 0);
        assert!(decompressor.options().quiet);
    }

    #[test]
    fn test_corrupted_magic() {
        let mut decompressor = Decompressor::new(quiet()).unwrap();
        let err = decompressor.write(&[0x1F, 0x8B, 0x08]).unwrap_err();
        assert!(matches!(err, LzwsError::CorruptedSource { offset: 1, .. }));
    }

    #[test]
    fn test_finish_on_truncated_stream() {
        let mut decompressor = Decompressor::new(quiet()).unwrap();
        assert_eq!(decompressor.write(&[0x1F]).unwrap(), 1);
        assert!(decompressor.finish().unwrap_err().is_corrupted_source());
    }

    #[test]
    fn test_calls_after_corrupted_source() {
        let mut compressed = crate::compress(b"abcabcabc", &CompressorOptions::default()).unwrap();
        compressed.extend_from_slice(&[0xFF, 0xFF, 0xFF]);

        let mut decompressor = Decompressor::new(quiet()).unwrap();
        let err = decompressor.write(&compressed).unwrap_err();
        assert!(err.is_corrupted_source());
        assert_eq!(decompressor.phase(), Phase::Terminal);

        assert!(decompressor.write(&[0, 0]).unwrap_err().is_engine_fault());
        assert!(decompressor.finish().unwrap_err().is_engine_fault());
    }

    #[test]
    fn test_truncated_finish_closes_session() {
        let mut decompressor = Decompressor::new(quiet()).unwrap();
        decompressor.write(&[0x1F, 0x9D]).unwrap();
        assert!(decompressor.finish().unwrap_err().is_corrupted_source());
        assert_eq!(decompressor.phase(), Phase::Terminal);
        assert!(decompressor.finish().unwrap_err().is_engine_fault());
    }

    #[test]
    fn test_calls_after_terminal_fault() {
        let compressed = crate::compress(b"abc", &CompressorOptions::default()).unwrap();
        let mut decompressor = Decompressor::new(quiet()).unwrap();
        run_to_end(&mut decompressor, &compressed, 64).unwrap();

        assert!(decompressor.write(b"x").unwrap_err().is_engine_fault());
        assert!(decompressor.finish().unwrap_err().is_engine_fault());
        assert!(decompressor.read().is_empty());
    }
}
