//! Compress command implementation.

use crate::utils::{create_progress_bar, open_input, open_output, space_savings};
use lzws::{CompressWriter, CompressorOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn cmd_compress(
    input: Option<&Path>,
    output: Option<&Path>,
    options: CompressorOptions,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, input_len) = open_input(input)?;
    let pb = create_progress_bar(input_len.unwrap_or(0), progress && input_len.is_some());
    let mut reader = pb.wrap_read(reader);

    let sink = CountingWriter::new(open_output(output)?);
    let mut writer = CompressWriter::new(sink, options)?;
    let read = io::copy(&mut reader, &mut writer)?;
    let mut sink = writer.finish()?;
    sink.flush()?;
    pb.finish_and_clear();

    info!(
        input_bytes = read,
        output_bytes = sink.count,
        savings_percent = space_savings(read, sink.count),
        "compressed"
    );
    Ok(())
}

/// Counts bytes passed through to the inner writer.
struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
