//! Download orchestration: copy a stream to disk and report progress.
//!
//! The byte source decides chunk granularity; this layer writes each chunk,
//! forwards cumulative counts through a [`ProgressReporter`] and guarantees the
//! terminal event once the transfer completes.

mod progress;

pub use progress::{ProgressEvent, ProgressReporter, ProgressStats};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DownloadError, Stage, StageExt};
use crate::naming;
use crate::storage::StorageWriter;
use crate::stream::StreamHandle;

/// Where one download goes. Built once per request and not changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    dir: PathBuf,
    filename: String,
    total_size: u64,
}

impl DownloadTarget {
    pub fn new(dir: &Path, filename: &str, total_size: u64) -> Self {
        Self {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
            total_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Expected size as reported upstream.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    /// Bytes actually written; may differ from the reported total.
    pub bytes_written: u64,
}

/// Streams `stream` into `destination_dir/filename`, reporting progress.
///
/// Overwrites an existing file of the same name. On failure the partially
/// written file is left in place and nothing is retried.
pub fn download(
    stream: &mut dyn StreamHandle,
    destination_dir: &Path,
    filename: &str,
    total_size: u64,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<PathBuf, DownloadError> {
    let target = DownloadTarget::new(destination_dir, filename, total_size);
    download_to(stream, &target, on_progress).map(|f| f.path)
}

/// Like [`download`] but takes a prepared target and also returns the byte count.
pub fn download_to(
    stream: &mut dyn StreamHandle,
    target: &DownloadTarget,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<DownloadedFile, DownloadError> {
    transfer(stream, target, on_progress).stage(Stage::Transfer)
}

fn transfer(
    stream: &mut dyn StreamHandle,
    target: &DownloadTarget,
    on_progress: impl FnMut(ProgressEvent),
) -> Result<DownloadedFile> {
    if target.filename().is_empty() || !naming::is_sanitized(target.filename()) {
        anyhow::bail!("invalid output filename {:?}", target.filename());
    }
    fs::create_dir_all(target.dir())
        .with_context(|| format!("failed to create directory {}", target.dir().display()))?;

    let path = target.path();
    let writer = StorageWriter::create(&path)?;
    let mut reporter = ProgressReporter::new(target.total_size(), on_progress);
    let mut written = 0u64;

    tracing::info!(
        path = %path.display(),
        expected = target.total_size(),
        "download started"
    );

    stream
        .pump(&mut |chunk: &[u8]| {
            writer.write_at(written, chunk)?;
            written += chunk.len() as u64;
            reporter.advance(written);
            Ok(())
        })
        .context("stream transfer failed")?;
    writer.sync()?;

    if written != target.total_size() {
        tracing::warn!(
            written,
            expected = target.total_size(),
            "transferred size differs from reported size"
        );
    }
    reporter.finish();

    tracing::info!(path = %path.display(), bytes = written, "download finished");
    Ok(DownloadedFile {
        path: writer.into_path(),
        bytes_written: written,
    })
}
