//! Incremental LZW encoder (compression).
//!
//! The encoder never needs the whole input. Each source byte either extends
//! the current match or emits one code, possibly followed by a width change
//! or a CLEAR. Emitted bits are packed into a small pending queue that is
//! drained into whatever destination space the caller provides, so output is
//! identical no matter how source and destination are split across calls.

use crate::config::CompressorOptions;
use crate::dictionary::EncoderDictionary;
use crate::format::{
    CLEAR_CODE, INITIAL_CODE_BIT_LENGTH, MAGIC_HEADER, RECOMMENDED_COMPRESSOR_BUFFER_LENGTH,
    alignment_padding_bits, code_width_limit, max_code_for_width,
};
use lzws_core::bitstream::CodeWriter;
use lzws_core::error::{LzwsError, Result};
use lzws_core::traits::{IncrementalEncoder, Progress, Step};
use tracing::{trace, warn};

/// LZW encoder for compression.
#[derive(Debug)]
pub struct LzwEncoder {
    /// Validated options.
    options: CompressorOptions,
    /// Dictionary for string lookup.
    dict: EncoderDictionary,
    /// Code packer.
    writer: CodeWriter,
    /// Packed bytes not yet handed to a destination.
    pending: Vec<u8>,
    /// Bytes of `pending` already handed out.
    pending_pos: usize,
    /// Code of the string matched so far.
    current: Option<u16>,
    /// Current code width.
    width: u8,
    /// Codes written at the current width.
    codes_in_group: u32,
    /// Magic header bytes already written.
    magic_written: usize,
    /// Whether the header byte was written.
    header_written: bool,
    /// Whether the final code and padding were queued.
    flushed: bool,
}

impl LzwEncoder {
    /// Create a new LZW encoder with the given options.
    pub fn new(options: CompressorOptions) -> Result<Self> {
        if let Err(e) = options.validate() {
            if !options.quiet {
                warn!(error = %e, "rejected compressor options");
            }
            return Err(e);
        }

        let dict = EncoderDictionary::new(options.max_code_bit_length, options.block_mode)?;

        Ok(Self {
            options,
            dict,
            writer: CodeWriter::new(options.bit_order()),
            pending: Vec::with_capacity(64),
            pending_pos: 0,
            current: None,
            width: INITIAL_CODE_BIT_LENGTH,
            codes_in_group: 0,
            magic_written: 0,
            header_written: false,
            flushed: false,
        })
    }

    /// Options this encoder was created with.
    pub fn options(&self) -> &CompressorOptions {
        &self.options
    }

    /// Whether `flush` has queued the end of the stream.
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    fn has_pending(&self) -> bool {
        self.pending_pos < self.pending.len()
    }

    fn drain_pending(&mut self, destination: &mut [u8]) -> usize {
        let available = &self.pending[self.pending_pos..];
        let n = available.len().min(destination.len());
        destination[..n].copy_from_slice(&available[..n]);
        self.pending_pos += n;

        if self.pending_pos == self.pending.len() {
            self.pending.clear();
            self.pending_pos = 0;
        }
        n
    }

    fn emit(&mut self, code: u16) {
        self.writer.write_code(code, self.width, &mut self.pending);
        self.codes_in_group += 1;
    }

    fn change_width(&mut self, width: u8) {
        if !self.options.unaligned_bit_groups {
            let padding = alignment_padding_bits(self.codes_in_group, self.width);
            self.writer.write_zeros(padding, &mut self.pending);
        }
        self.width = width;
        self.codes_in_group = 0;
    }

    fn push_byte(&mut self, byte: u8) {
        let Some(prefix) = self.current else {
            self.current = Some(byte as u16);
            return;
        };

        if let Some(code) = self.dict.find(prefix, byte) {
            self.current = Some(code);
            return;
        }

        self.emit(prefix);

        // The entry about to be added may be the next code emitted, so it
        // must already fit the width.
        if self.width < code_width_limit(self.options.max_code_bit_length)
            && self.dict.next_code() > max_code_for_width(self.width)
        {
            self.change_width(self.width + 1);
        }

        if !self.dict.insert(prefix, byte) && self.options.block_mode {
            self.emit(CLEAR_CODE);
            self.change_width(INITIAL_CODE_BIT_LENGTH);
            self.dict.reset();
        }

        self.current = Some(byte as u16);
    }

    fn fault(&self, message: &str) -> LzwsError {
        if !self.options.quiet {
            warn!(reason = message, "compressor called out of sequence");
        }
        LzwsError::engine_fault(message)
    }
}

impl IncrementalEncoder for LzwEncoder {
    fn recommended_buffer_length(&self) -> usize {
        RECOMMENDED_COMPRESSOR_BUFFER_LENGTH
    }

    fn write_magic_header(&mut self, destination: &mut [u8]) -> Result<Progress> {
        let remaining = &MAGIC_HEADER[self.magic_written..];
        let n = remaining.len().min(destination.len());
        destination[..n].copy_from_slice(&remaining[..n]);
        self.magic_written += n;

        let step = if self.magic_written == MAGIC_HEADER.len() {
            Step::Complete
        } else {
            Step::NeedsMoreDestination
        };
        Ok(Progress::output(n, step))
    }

    fn write_header(&mut self, destination: &mut [u8]) -> Result<Progress> {
        if self.header_written {
            return Ok(Progress::output(0, Step::Complete));
        }

        let Some(slot) = destination.first_mut() else {
            return Ok(Progress::output(0, Step::NeedsMoreDestination));
        };
        *slot = self.options.stream_header().to_byte();
        self.header_written = true;

        Ok(Progress::output(1, Step::Complete))
    }

    fn encode(&mut self, source: &[u8], destination: &mut [u8]) -> Result<Progress> {
        if self.flushed {
            return Err(self.fault("encode called after flush"));
        }

        let mut consumed = 0;
        let mut written = 0;
        loop {
            written += self.drain_pending(&mut destination[written..]);
            if self.has_pending() {
                trace!(consumed, written, "compressor destination exhausted");
                return Ok(Progress {
                    consumed,
                    written,
                    step: Step::NeedsMoreDestination,
                });
            }

            let Some(&byte) = source.get(consumed) else {
                return Ok(Progress {
                    consumed,
                    written,
                    step: Step::NeedsMoreSource,
                });
            };
            self.push_byte(byte);
            consumed += 1;
        }
    }

    fn flush(&mut self, destination: &mut [u8]) -> Result<Progress> {
        if !self.flushed {
            if let Some(code) = self.current.take() {
                self.emit(code);
            }
            self.writer.finish(&mut self.pending);
            self.flushed = true;
        }

        let written = self.drain_pending(destination);
        let step = if self.has_pending() {
            Step::NeedsMoreDestination
        } else {
            Step::Complete
        };
        Ok(Progress::output(written, step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_all(options: CompressorOptions, input: &[u8]) -> Vec<u8> {
        let mut encoder = LzwEncoder::new(options).unwrap();
        let mut out = vec![0u8; input.len() * 2 + 64];
        let mut pos = 0;

        let p = encoder.write_magic_header(&mut out[pos..]).unwrap();
        pos += p.written;
        let p = encoder.write_header(&mut out[pos..]).unwrap();
        pos += p.written;
        let p = encoder.encode(input, &mut out[pos..]).unwrap();
        assert_eq!(p.consumed, input.len());
        assert_eq!(p.step, Step::NeedsMoreSource);
        pos += p.written;
        let p = encoder.flush(&mut out[pos..]).unwrap();
        assert_eq!(p.step, Step::Complete);
        pos += p.written;

        out.truncate(pos);
        out
    }

    #[test]
    fn test_encode_empty() {
        let out = encode_all(CompressorOptions::default(), b"");
        assert_eq!(out, vec![0x1F, 0x9D, 0x90]);
    }

    #[test]
    fn test_encode_single_byte() {
        let out = encode_all(CompressorOptions::default(), b"A");
        assert_eq!(out, vec![0x1F, 0x9D, 0x90, 0x41, 0x00]);
    }

    #[test]
    fn test_encode_single_byte_msb() {
        let options = CompressorOptions::default().with_msb(true);
        let out = encode_all(options, b"A");
        assert_eq!(out, vec![0x1F, 0x9D, 0x90, 0x20, 0x80]);
    }

    #[test]
    fn test_encode_repeated_pair() {
        // "ABAB": codes A, B, 257 ("AB") at 9 bits each = 27 bits -> 4 bytes
        let out = encode_all(CompressorOptions::default(), b"ABAB");
        assert_eq!(out.len(), 3 + 4);
        assert_eq!(out[3], 0x41);
    }

    #[test]
    fn test_encode_repeating_compresses() {
        let input = vec![b'X'; 1000];
        let out = encode_all(CompressorOptions::default(), &input);
        assert!(out.len() < input.len() / 5);
    }

    #[test]
    fn test_magic_header_resumes() {
        let mut encoder = LzwEncoder::new(CompressorOptions::default()).unwrap();
        let mut one = [0u8; 1];

        let p = encoder.write_magic_header(&mut one).unwrap();
        assert_eq!(p.step, Step::NeedsMoreDestination);
        assert_eq!(p.written, 1);
        assert_eq!(one, [0x1F]);

        let p = encoder.write_magic_header(&mut one).unwrap();
        assert_eq!(p.step, Step::Complete);
        assert_eq!(one, [0x9D]);
    }

    #[test]
    fn test_header_needs_destination() {
        let mut encoder = LzwEncoder::new(CompressorOptions::default()).unwrap();
        let p = encoder.write_header(&mut []).unwrap();
        assert_eq!(p.step, Step::NeedsMoreDestination);
        assert_eq!(p.written, 0);
    }

    #[test]
    fn test_encode_with_tiny_destination() {
        let input = b"TOBEORNOTTOBEORTOBEORNOT".repeat(20);
        let expected = encode_all(CompressorOptions::default(), &input);

        let mut encoder = LzwEncoder::new(CompressorOptions::default()).unwrap();
        let mut out = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            let p = encoder.write_magic_header(&mut byte).unwrap();
            out.extend_from_slice(&byte[..p.written]);
            if p.step == Step::Complete {
                break;
            }
        }
        let p = encoder.write_header(&mut byte).unwrap();
        out.extend_from_slice(&byte[..p.written]);

        let mut source = &input[..];
        while !source.is_empty() {
            let p = encoder.encode(source, &mut byte).unwrap();
            out.extend_from_slice(&byte[..p.written]);
            source = &source[p.consumed..];
        }
        loop {
            let p = encoder.flush(&mut byte).unwrap();
            out.extend_from_slice(&byte[..p.written]);
            if p.step == Step::Complete {
                break;
            }
        }

        assert_eq!(out, expected);
    }

    #[test]
    fn test_full_nine_bit_table_moves_to_ten_bits() {
        let input: Vec<u8> = (0..20_000u32).map(|i| ((i * 7919) % 251) as u8).collect();
        for bits in [9, 10] {
            let options = CompressorOptions::default()
                .with_max_code_bit_length(bits)
                .with_block_mode(false);
            let mut encoder = LzwEncoder::new(options).unwrap();
            let mut out = vec![0u8; input.len() * 2];
            encoder.encode(&input, &mut out).unwrap();

            assert!(encoder.dict.is_full());
            assert_eq!(encoder.width, 10, "bits={}", bits);
        }
    }

    #[test]
    fn test_encode_after_flush_is_fault() {
        let mut encoder =
            LzwEncoder::new(CompressorOptions::default().with_quiet(true)).unwrap();
        let mut out = [0u8; 16];
        encoder.flush(&mut out).unwrap();
        assert!(encoder.is_flushed());

        let err = encoder.encode(b"more", &mut out).unwrap_err();
        assert!(err.is_engine_fault());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = CompressorOptions::default()
            .with_max_code_bit_length(20)
            .with_quiet(true);
        let err = LzwEncoder::new(options).unwrap_err();
        assert!(matches!(err, LzwsError::Configuration { .. }));
    }
}
