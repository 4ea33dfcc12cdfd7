//! Dump files on disk.
//!
//! Monthly dumps arrive as `.xml.gz`; test fixtures are often plain
//! `.xml`. Either way a pass over the file reads through a progress
//! reporter so long runs stay observable.

use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

const READ_BUFFER_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to open dump {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A dump file on disk. Steps open it once per pass; every `open` yields
/// an independent forward-only reader.
#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
}

impl DumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DumpFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the dump for one streaming pass: progress-reporting reader,
    /// gzip decoding when the extension says so, 1MB read buffering.
    pub fn open(&self, label: &str) -> Result<Box<dyn BufRead + Send>, DumpError> {
        let file = File::open(&self.path).map_err(|source| DumpError::Open {
            path: self.path.clone(),
            source,
        })?;
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);

        let bar = ProgressBar::new(len).with_message(label.to_string());
        bar.set_style(progress_style());
        let progress = bar.wrap_read(file);

        let is_gzip = self.path.extension().is_some_and(|ext| ext == "gz");
        let reader: Box<dyn Read + Send> = if is_gzip {
            Box::new(GzDecoder::new(progress))
        } else {
            Box::new(progress)
        };
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, reader)))
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:15}] {bytes}/{total_bytes} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
