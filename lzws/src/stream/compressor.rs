//! Streaming compression session.

use super::{Phase, Status, allocate_buffer};
use crate::config::CompressorOptions;
use crate::encoder::LzwEncoder;
use lzws_core::buffer::DestinationBuffer;
use lzws_core::error::{LzwsError, Result};
use lzws_core::traits::{IncrementalEncoder, Progress, Step};
use tracing::{debug, trace, warn};

/// Streaming compressor: one engine plus one destination buffer.
///
/// Both are owned by the session and released together when it is dropped.
#[derive(Debug)]
pub struct Compressor<E: IncrementalEncoder = LzwEncoder> {
    engine: E,
    buffer: DestinationBuffer,
    options: CompressorOptions,
    phase: Phase,
}

impl Compressor<LzwEncoder> {
    /// Validate `options`, create the LZW engine and allocate the buffer.
    ///
    /// # Errors
    ///
    /// [`LzwsError::Configuration`] for rejected options,
    /// [`LzwsError::Allocation`] if the buffer cannot be reserved.
    pub fn new(options: CompressorOptions) -> Result<Self> {
        let engine = LzwEncoder::new(options)?;
        Self::with_engine(engine, options)
    }
}

impl<E: IncrementalEncoder> Compressor<E> {
    /// Wrap an existing engine.
    pub fn with_engine(engine: E, options: CompressorOptions) -> Result<Self> {
        let buffer = allocate_buffer(
            options.destination_buffer_length,
            engine.recommended_buffer_length(),
        )?;

        debug!(
            max_code_bit_length = options.max_code_bit_length,
            block_mode = options.block_mode,
            msb = options.msb,
            unaligned_bit_groups = options.unaligned_bit_groups,
            buffer_capacity = buffer.capacity(),
            "created compressor"
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

    /// Bytes produced and not yet read.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Options the session was created with.
    pub fn options(&self) -> &CompressorOptions {
        &self.options
    }

    /// Emit the magic bytes.
    pub fn write_magic_header(&mut self) -> Result<Status> {
        self.enter("write_magic_header", &[Phase::Created, Phase::MagicHeaderPending])?;
        self.phase = Phase::MagicHeaderPending;

        let progress = self.engine.write_magic_header(self.buffer.free_mut())?;
        self.buffer.advance(progress.written)?;

        let status = self.header_status("write_magic_header", progress)?;
        if status == Status::Complete {
            debug!("magic header written");
            self.phase = Phase::MagicHeaderDone;
        }
        Ok(status)
    }

    /// Emit the parameter header.
    pub fn write_header(&mut self) -> Result<Status> {
        self.enter(
            "write_header",
            &[Phase::Created, Phase::MagicHeaderDone, Phase::HeaderPending],
        )?;
        self.phase = Phase::HeaderPending;

        let progress = self.engine.write_header(self.buffer.free_mut())?;
        self.buffer.advance(progress.written)?;

        let status = self.header_status("write_header", progress)?;
        if status == Status::Complete {
            debug!("header written");
            self.phase = Phase::HeaderDone;
        }
        Ok(status)
    }

    /// Compress a prefix of `source`, returning how many bytes were consumed.
    ///
    /// A result shorter than `source` means the buffer is full: `read()` it
    /// and call again with the rest.
    pub fn write(&mut self, source: &[u8]) -> Result<usize> {
        self.enter(
            "write",
            &[
                Phase::Created,
                Phase::MagicHeaderDone,
                Phase::HeaderDone,
                Phase::Streaming,
            ],
        )?;
        self.phase = Phase::Streaming;

        let progress = self.engine.encode(source, self.buffer.free_mut())?;
        self.buffer.advance(progress.written)?;

        match progress.step {
            Step::NeedsMoreSource | Step::NeedsMoreDestination => {}
            Step::Complete => return Err(self.fault("encoder reported completion during write")),
        }
        if progress.consumed > source.len() {
            return Err(self.fault("encoder consumed more than it was given"));
        }
        if progress.consumed < source.len() {
            trace!(
                consumed = progress.consumed,
                remaining = source.len() - progress.consumed,
                "compressor buffer full"
            );
        }
        Ok(progress.consumed)
    }

    /// Take everything produced so far and empty the buffer.
    pub fn read(&mut self) -> Vec<u8> {
        self.buffer.take()
    }

    /// Emit the final code and padding.
    ///
    /// Repeat with `read()` in between until [`Status::Complete`]; the session
    /// is then terminal.
    pub fn flush(&mut self) -> Result<Status> {
        self.enter(
            "flush",
            &[
                Phase::Created,
                Phase::MagicHeaderDone,
                Phase::HeaderDone,
                Phase::Streaming,
                Phase::Flushing,
            ],
        )?;
        self.phase = Phase::Flushing;

        let progress = self.engine.flush(self.buffer.free_mut())?;
        self.buffer.advance(progress.written)?;

        let status = self.header_status("flush", progress)?;
        if status == Status::Complete {
            debug!("compressor flushed");
            self.phase = Phase::Terminal;
        }
        Ok(status)
    }

    fn enter(&self, call: &str, allowed: &[Phase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            return Ok(());
        }
        Err(self.fault(&format!("{} not allowed in phase {:?}", call, self.phase)))
    }

    fn header_status(&self, call: &str, progress: Progress) -> Result<Status> {
        match progress.step {
            Step::Complete => Ok(Status::Complete),
            Step::NeedsMoreDestination => {
                trace!(call, "compressor buffer full");
                Ok(Status::NeedsMoreOutputSpace)
            }
            Step::NeedsMoreSource => {
                Err(self.fault(&format!("encoder asked for source during {}", call)))
            }
        }
    }

    fn fault(&self, message: &str) -> LzwsError {
        if !self.options.quiet {
            warn!(reason = message, "compressor engine fault");
        }
        LzwsError::engine_fault(message)
    }
}
