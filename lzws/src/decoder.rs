//! Incremental LZW decoder (decompression).
//!
//! The decoder parses the magic bytes and the header itself, then decodes
//! codes one at a time. Decoded strings go through a pending queue so that a
//! long string can be handed out across several destination slices.
//!
//! Malformed input is reported as [`LzwsError::CorruptedSource`] with the
//! byte offset at which it was detected:
//!
//! - wrong magic bytes or an invalid header byte;
//! - a code that is neither a literal, a known entry, nor the next entry;
//! - at [`finish`](IncrementalDecoder::finish): a truncated header, a
//!   truncated code, or non-zero padding bits.

use crate::config::DecompressorOptions;
use crate::dictionary::DecoderDictionary;
use crate::format::{
    CLEAR_CODE, INITIAL_CODE_BIT_LENGTH, MAGIC_HEADER, RECOMMENDED_DECOMPRESSOR_BUFFER_LENGTH,
    StreamHeader, alignment_padding_bits, code_width_limit, max_code_for_width,
};
use lzws_core::bitstream::CodeReader;
use lzws_core::error::{LzwsError, Result};
use lzws_core::traits::{IncrementalDecoder, Progress, Step};
use tracing::{debug, trace, warn};

/// Where the decoder is in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// Reading the magic bytes; holds how many matched so far.
    MagicHeader(usize),
    /// Reading the header byte.
    Header,
    /// Decoding codes.
    Codes,
    /// `finish` validated the tail.
    Finished,
    /// A corrupted source was reported; every later call is a fault.
    Failed,
}

/// LZW decoder for decompression.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Options this decoder was created with.
    options: DecompressorOptions,
    /// Current phase.
    phase: DecoderPhase,
    /// Parameters read from the header.
    header: Option<StreamHeader>,
    /// Dictionary for code lookup.
    dict: DecoderDictionary,
    /// Code unpacker.
    reader: CodeReader,
    /// Decoded bytes not yet handed to a destination.
    pending: Vec<u8>,
    /// Bytes of `pending` already handed out.
    pending_pos: usize,
    /// Previous code (for dictionary building).
    prev: Option<u16>,
    /// Current code width.
    width: u8,
    /// Codes read at the current width.
    codes_in_group: u32,
    /// Alignment bits still to skip.
    skip_remaining: u32,
    /// Source bytes consumed by earlier calls.
    source_offset: u64,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given options.
    pub fn new(options: DecompressorOptions) -> Result<Self> {
        let dict = DecoderDictionary::new()?;

        Ok(Self {
            options,
            phase: DecoderPhase::MagicHeader(0),
            header: None,
            dict,
            reader: CodeReader::new(options.bit_order()),
            pending: Vec::with_capacity(256),
            pending_pos: 0,
            prev: None,
            width: INITIAL_CODE_BIT_LENGTH,
            codes_in_group: 0,
            skip_remaining: 0,
            source_offset: 0,
        })
    }

    /// Options this decoder was created with.
    pub fn options(&self) -> &DecompressorOptions {
        &self.options
    }

    /// Current phase.
    pub fn phase(&self) -> DecoderPhase {
        self.phase
    }

    /// Stream parameters, once the header has been read.
    pub fn stream_header(&self) -> Option<StreamHeader> {
        self.header
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

    fn corrupted(&self, offset: u64, message: String) -> LzwsError {
        if !self.options.quiet {
            warn!(offset, reason = %message, "decompressor received corrupted source");
        }
        LzwsError::corrupted(offset, message)
    }

    /// Reject the stream tail at the current source offset.
    fn fail(&mut self, message: &str) -> LzwsError {
        self.phase = DecoderPhase::Failed;
        self.corrupted(self.source_offset, message.to_string())
    }

    fn change_width(&mut self, width: u8) {
        if !self.options.unaligned_bit_groups {
            self.skip_remaining = alignment_padding_bits(self.codes_in_group, self.width);
        }
        self.width = width;
        self.codes_in_group = 0;
    }

    fn process_code(&mut self, code: u16, header: StreamHeader) -> std::result::Result<(), String> {
        self.codes_in_group += 1;

        if header.block_mode && code == CLEAR_CODE {
            self.dict.reset();
            self.prev = None;
            self.change_width(INITIAL_CODE_BIT_LENGTH);
            return Ok(());
        }

        let start = self.pending.len();
        if self.dict.contains(code) {
            self.dict.expand(code, &mut self.pending);
        } else if code as u32 == self.dict.next_code() {
            // Code not yet in dictionary: previous string + its first byte
            let Some(prev) = self.prev else {
                return Err(format!("code {} used before any string", code));
            };
            self.dict.expand(prev, &mut self.pending);
            self.pending.push(self.dict.first_byte(prev));
        } else {
            return Err(format!(
                "invalid code {} (next free code {})",
                code,
                self.dict.next_code()
            ));
        }

        if let Some(prev) = self.prev {
            let first = self.pending[start];
            self.dict.insert(prev, first);
        }
        self.prev = Some(code);

        if self.width < code_width_limit(header.max_code_bit_length)
            && self.dict.next_code() > max_code_for_width(self.width)
        {
            self.change_width(self.width + 1);
        }
        Ok(())
    }
}

impl IncrementalDecoder for LzwDecoder {
    fn recommended_buffer_length(&self) -> usize {
        RECOMMENDED_DECOMPRESSOR_BUFFER_LENGTH
    }

    fn decode(&mut self, source: &[u8], destination: &mut [u8]) -> Result<Progress> {
        match self.phase {
            DecoderPhase::Finished => {
                return Err(LzwsError::engine_fault("decode called after finish"));
            }
            DecoderPhase::Failed => {
                return Err(LzwsError::engine_fault("decode called after a decoding error"));
            }
            _ => {}
        }

        let mut input = source;
        let mut written = 0;

        let outcome = loop {
            written += self.drain_pending(&mut destination[written..]);
            if self.has_pending() {
                trace!(written, "decompressor destination exhausted");
                break Ok(Step::NeedsMoreDestination);
            }

            let offset = self.source_offset + (source.len() - input.len()) as u64;

            match self.phase {
                DecoderPhase::MagicHeader(matched) => {
                    let Some((&byte, rest)) = input.split_first() else {
                        break Ok(Step::NeedsMoreSource);
                    };
                    if byte != MAGIC_HEADER[matched] {
                        let message = format!("invalid magic byte {:#04x}", byte);
                        break Err(self.corrupted(offset, message));
                    }
                    input = rest;
                    self.phase = if matched + 1 == MAGIC_HEADER.len() {
                        DecoderPhase::Header
                    } else {
                        DecoderPhase::MagicHeader(matched + 1)
                    };
                }
                DecoderPhase::Header => {
                    let Some((&byte, rest)) = input.split_first() else {
                        break Ok(Step::NeedsMoreSource);
                    };
                    let header = match StreamHeader::from_byte(byte) {
                        Ok(header) => header,
                        Err(message) => break Err(self.corrupted(offset, message)),
                    };
                    input = rest;

                    debug!(
                        max_code_bit_length = header.max_code_bit_length,
                        block_mode = header.block_mode,
                        "read stream header"
                    );
                    self.dict
                        .configure(header.max_code_bit_length, header.block_mode);
                    self.header = Some(header);
                    self.phase = DecoderPhase::Codes;
                }
                DecoderPhase::Codes => {
                    let Some(header) = self.header else {
                        break Err(LzwsError::engine_fault("decoding codes without a header"));
                    };

                    if self.skip_remaining > 0 {
                        let skipped = self.reader.skip_bits(&mut input, self.skip_remaining);
                        self.skip_remaining -= skipped;
                        if self.skip_remaining > 0 {
                            break Ok(Step::NeedsMoreSource);
                        }
                        continue;
                    }

                    let Some(code) = self.reader.read_code(&mut input, self.width) else {
                        break Ok(Step::NeedsMoreSource);
                    };
                    if let Err(message) = self.process_code(code, header) {
                        let offset = self.source_offset + (source.len() - input.len()) as u64;
                        break Err(self.corrupted(offset, message));
                    }
                }
                DecoderPhase::Finished | DecoderPhase::Failed => {
                    break Err(LzwsError::engine_fault("decode called on a closed decoder"));
                }
            }
        };

        // Bytes up to and including a rejected code count as consumed.
        let consumed = source.len() - input.len();
        self.source_offset += consumed as u64;

        let step = match outcome {
            Ok(step) => step,
            Err(err) => {
                self.phase = DecoderPhase::Failed;
                return Err(err);
            }
        };

        Ok(Progress {
            consumed,
            written,
            step,
        })
    }

    fn finish(&mut self, destination: &mut [u8]) -> Result<Progress> {
        if self.phase == DecoderPhase::Failed {
            return Err(LzwsError::engine_fault("finish called after a decoding error"));
        }

        let written = self.drain_pending(destination);
        if self.has_pending() {
            return Ok(Progress::output(written, Step::NeedsMoreDestination));
        }

        match self.phase {
            DecoderPhase::MagicHeader(_) => Err(self.fail("truncated magic header")),
            DecoderPhase::Header => Err(self.fail("truncated header")),
            DecoderPhase::Codes => {
                // The encoder pads only the final partial byte, with zeros.
                if self.reader.buffered_bits() >= 8 {
                    return Err(self.fail("truncated code"));
                }
                if !self.reader.buffered_bits_are_zero() {
                    return Err(self.fail("non-zero padding bits"));
                }
                self.phase = DecoderPhase::Finished;
                Ok(Progress::output(written, Step::Complete))
            }
            DecoderPhase::Finished => Ok(Progress::output(written, Step::Complete)),
            DecoderPhase::Failed => {
                Err(LzwsError::engine_fault("finish called after a decoding error"))
            }
        }
    }
}
