//! Info command implementation.

use crate::utils::space_savings;
use lzws::format::read_stream_header;
use lzws::{DecompressorOptions, StreamHeader, decompress};
use serde::Serialize;
use std::path::Path;

/// Machine-readable stream description.
#[derive(Debug, Serialize)]
struct InfoJson {
    file: String,
    compressed_size: u64,
    header: StreamHeader,
    options: DecompressorOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    uncompressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn cmd_info(
    file: &Path,
    options: DecompressorOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    let header = read_stream_header(&data)?;

    // Decoding the payload also validates it
    let (uncompressed_size, error) = match decompress(&data, &options.with_quiet(true)) {
        Ok(decoded) => (Some(decoded.len() as u64), None),
        Err(e) => (None, Some(e.to_string())),
    };

    if json {
        let info = InfoJson {
            file: file.display().to_string(),
            compressed_size: data.len() as u64,
            header,
            options,
            uncompressed_size,
            error,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Stream Information");
    println!("==================");
    println!("File: {}", file.display());
    println!("Magic: 1F 9D");
    println!("Max code bit length: {}", header.max_code_bit_length);
    println!(
        "Block mode: {}",
        if header.block_mode { "yes" } else { "no" }
    );
    println!("Compressed size: {} bytes", data.len());
    match (uncompressed_size, error) {
        (Some(size), _) => {
            println!("Uncompressed size: {} bytes", size);
            if size > 0 {
                println!(
                    "Space savings: {:.1}%",
                    space_savings(size, data.len() as u64)
                );
            }
        }
        (None, Some(error)) => println!("Payload: invalid ({})", error),
        (None, None) => {}
    }
    Ok(())
}
