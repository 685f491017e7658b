//! Decompress command implementation.

use crate::utils::{create_progress_bar, open_input, open_output};
use lzws::{DecompressReader, DecompressorOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn cmd_decompress(
    input: Option<&Path>,
    output: Option<&Path>,
    options: DecompressorOptions,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, input_len) = open_input(input)?;
    let pb = create_progress_bar(input_len.unwrap_or(0), progress && input_len.is_some());

    let mut reader = DecompressReader::new(pb.wrap_read(reader), options)?;
    let mut writer = open_output(output)?;
    let written = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    pb.finish_and_clear();

    info!(output_bytes = written, "decompressed");
    Ok(())
}
