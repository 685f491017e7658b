//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Open `path` for reading, or stdin when absent. Also returns the input
/// length when known.
pub fn open_input(path: Option<&Path>) -> io::Result<(Box<dyn Read>, Option<u64>)> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            let len = file.metadata()?.len();
            Ok((Box::new(BufReader::new(file)), Some(len)))
        }
        None => Ok((Box::new(io::stdin().lock()), None)),
    }
}

/// Create `path` for writing, or stdout when absent.
pub fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Space saved, in percent of `original`.
pub fn space_savings(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_savings() {
        assert_eq!(space_savings(0, 3), 0.0);
        assert_eq!(space_savings(100, 25), 75.0);
        assert!(space_savings(10, 20) < 0.0);
    }
}
