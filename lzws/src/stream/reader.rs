//! `std::io::Read` adapter over [`Decompressor`].

use super::{Decompressor, Status};
use crate::config::DecompressorOptions;
use lzws_core::error::Result;
use std::io::{self, Read};

/// Bytes pulled from the inner reader per call.
const STAGING_LENGTH: usize = 16 * 1024;

/// Decompresses a stream read from an inner reader.
///
/// At end of input the stream tail is validated; a truncated or corrupted
/// stream surfaces as [`io::ErrorKind::InvalidData`].
#[derive(Debug)]
pub struct DecompressReader<R: Read> {
    inner: R,
    session: Decompressor,
    staging: Vec<u8>,
    staged_start: usize,
    staged_end: usize,
    output: Vec<u8>,
    output_pos: usize,
    eof: bool,
    done: bool,
}

impl<R: Read> DecompressReader<R> {
    /// Create a reader decompressing from `inner`.
    pub fn new(inner: R, options: DecompressorOptions) -> Result<Self> {
        Ok(Self {
            inner,
            session: Decompressor::new(options)?,
            staging: vec![0; STAGING_LENGTH],
            staged_start: 0,
            staged_end: 0,
            output: Vec::new(),
            output_pos: 0,
            eof: false,
            done: false,
        })
    }

    /// Reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill_output(&mut self) {
        self.output = self.session.read();
        self.output_pos = 0;
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.output_pos < self.output.len() {
                let available = &self.output[self.output_pos..];
                let n = available.len().min(buf.len());
                buf[..n].copy_from_slice(&available[..n]);
                self.output_pos += n;
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }

            if self.staged_start < self.staged_end {
                let consumed = self
                    .session
                    .write(&self.staging[self.staged_start..self.staged_end])?;
                self.staged_start += consumed;
                self.refill_output();
                continue;
            }

            if !self.eof {
                match self.inner.read(&mut self.staging) {
                    Ok(0) => self.eof = true,
                    Ok(n) => {
                        self.staged_start = 0;
                        self.staged_end = n;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
                continue;
            }

            if self.session.finish()? == Status::Complete {
                self.done = true;
            }
            self.refill_output();
        }
    }
}
