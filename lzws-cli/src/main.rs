//! lzws CLI
//!
//! Compress and decompress `compress(1)` style .Z streams.

mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info};
use lzws::{CompressorOptions, DecompressorOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lzws")]
#[command(author, version, about = "Streaming LZW compression for .Z files")]
#[command(long_about = "
Pure Rust LZW compression compatible with the classic compress(1) utility.
A missing INPUT reads stdin; a missing --output writes stdout.

Examples:
  lzws compress file.txt -o file.txt.Z
  lzws compress --max-code-bit-length 12 --msb < data > data.Z
  lzws decompress file.txt.Z -o file.txt
  lzws info file.txt.Z --json
")]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file or stdin
    #[command(alias = "c")]
    Compress {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum code bit length (9-16)
        #[arg(short = 'b', long, default_value_t = 16)]
        max_code_bit_length: u8,

        /// Never reset the dictionary with CLEAR codes
        #[arg(long)]
        no_block_mode: bool,

        #[command(flatten)]
        codec: CodecArgs,

        /// Show progress bar (file input only)
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file or stdin
    #[command(alias = "d")]
    Decompress {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,

        /// Show progress bar (file input only)
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Show information about a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        file: PathBuf,

        #[command(flatten)]
        codec: CodecArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Packing options shared by every command.
#[derive(Args, Debug, Clone, Copy)]
struct CodecArgs {
    /// Pack codes MSB-first
    #[arg(long)]
    msb: bool,

    /// No padding at code width changes
    #[arg(long)]
    unaligned_bit_groups: bool,

    /// Suppress library warnings
    #[arg(short, long)]
    quiet: bool,

    /// Destination buffer length in bytes (0 = recommended)
    #[arg(long, default_value_t = 0)]
    buffer_length: usize,
}

impl CodecArgs {
    fn decompressor_options(self) -> DecompressorOptions {
        DecompressorOptions::new()
            .with_msb(self.msb)
            .with_unaligned_bit_groups(self.unaligned_bit_groups)
            .with_quiet(self.quiet)
            .with_destination_buffer_length(self.buffer_length)
    }
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            max_code_bit_length,
            no_block_mode,
            codec,
            progress,
        } => {
            let options = CompressorOptions::new()
                .with_max_code_bit_length(max_code_bit_length)
                .with_block_mode(!no_block_mode)
                .with_msb(codec.msb)
                .with_unaligned_bit_groups(codec.unaligned_bit_groups)
                .with_quiet(codec.quiet)
                .with_destination_buffer_length(codec.buffer_length);
            cmd_compress(input.as_deref(), output.as_deref(), options, progress)
        }
        Commands::Decompress {
            input,
            output,
            codec,
            progress,
        } => cmd_decompress(
            input.as_deref(),
            output.as_deref(),
            codec.decompressor_options(),
            progress,
        ),
        Commands::Info { file, codec, json } => {
            cmd_info(&file, codec.decompressor_options(), json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress_flags() {
        let cli = Cli::parse_from([
            "lzws",
            "-v",
            "compress",
            "in.txt",
            "-o",
            "out.Z",
            "--max-code-bit-length",
            "12",
            "--no-block-mode",
            "--msb",
            "--buffer-length",
            "512",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Compress {
                input,
                output,
                max_code_bit_length,
                no_block_mode,
                codec,
                progress,
            } => {
                assert_eq!(input, Some(PathBuf::from("in.txt")));
                assert_eq!(output, Some(PathBuf::from("out.Z")));
                assert_eq!(max_code_bit_length, 12);
                assert!(no_block_mode);
                assert!(codec.msb);
                assert!(!codec.unaligned_bit_groups);
                assert_eq!(codec.buffer_length, 512);
                assert!(!progress);
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_decompressor_options_from_args() {
        let cli = Cli::parse_from(["lzws", "decompress", "--unaligned-bit-groups", "-q"]);
        match cli.command {
            Commands::Decompress { input, codec, .. } => {
                assert!(input.is_none());
                let options = codec.decompressor_options();
                assert!(options.unaligned_bit_groups);
                assert!(options.quiet);
                assert!(!options.msb);
            }
            _ => panic!("expected decompress"),
        }
    }
}
