//! `std::io::Write` adapter over [`Compressor`].

use super::{Compressor, Status};
use crate::config::CompressorOptions;
use lzws_core::error::Result;
use std::io::{self, Write};

/// Compresses everything written to it into an inner writer.
///
/// The magic bytes and header are emitted before the first payload byte.
/// Call [`finish`](CompressWriter::finish) to terminate the stream and get the
/// inner writer back; dropping an unfinished writer finishes it on a
/// best-effort basis and ignores errors.
///
/// # Example
///
/// ```rust
/// use lzws::{CompressWriter, CompressorOptions, DecompressorOptions};
/// use std::io::Write;
///
/// let mut writer = CompressWriter::new(Vec::new(), CompressorOptions::default()).unwrap();
/// writer.write_all(b"to be or not to be").unwrap();
/// let compressed = writer.finish().unwrap();
///
/// let restored = lzws::decompress(&compressed, &DecompressorOptions::default()).unwrap();
/// assert_eq!(restored, b"to be or not to be");
/// ```
#[derive(Debug)]
pub struct CompressWriter<W: Write> {
    session: Compressor,
    inner: Option<W>,
    headers_written: bool,
}

impl<W: Write> CompressWriter<W> {
    /// Create a writer compressing into `inner`.
    pub fn new(inner: W, options: CompressorOptions) -> Result<Self> {
        Ok(Self {
            session: Compressor::new(options)?,
            inner: Some(inner),
            headers_written: false,
        })
    }

    /// Reference to the inner writer.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Mutable reference to the inner writer.
    ///
    /// Writing to it directly corrupts the compressed stream.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    /// Terminate the stream and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.finish_stream()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::other("compress writer already finished"))
    }

    fn drain(&mut self) -> io::Result<()> {
        let bytes = self.session.read();
        if bytes.is_empty() {
            return Ok(());
        }
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&bytes),
            None => Err(io::Error::other("compress writer already finished")),
        }
    }

    fn write_headers(&mut self) -> io::Result<()> {
        if self.headers_written {
            return Ok(());
        }
        while self.session.write_magic_header()? == Status::NeedsMoreOutputSpace {
            self.drain()?;
        }
        while self.session.write_header()? == Status::NeedsMoreOutputSpace {
            self.drain()?;
        }
        self.headers_written = true;
        Ok(())
    }

    fn finish_stream(&mut self) -> io::Result<()> {
        self.write_headers()?;
        while self.session.flush()? == Status::NeedsMoreOutputSpace {
            self.drain()?;
        }
        self.drain()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Write for CompressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.write_headers()?;

        let mut rest = buf;
        loop {
            let consumed = self.session.write(rest)?;
            rest = &rest[consumed..];
            if rest.is_empty() {
                break;
            }
            self.drain()?;
        }
        Ok(buf.len())
    }

    /// Push produced bytes to the inner writer. The stream stays open.
    ///
    /// Only whole bytes the encoder has already emitted are pushed. The string
    /// currently being matched and the bits of a partially filled byte stay
    /// in the encoder until [`finish`](CompressWriter::finish), so the sink
    /// does not hold a decodable prefix of everything written so far.
    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for CompressWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !std::thread::panicking() {
            let _ = self.finish_stream();
        }
    }
}
