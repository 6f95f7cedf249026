//! Disk output for downloads.
//!
//! The destination file is created (or truncated) up front and written in
//! place. There is no temp file, no preallocation and no cleanup: a failed
//! download leaves whatever was written so far.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// Writer for a download's destination file.
pub struct StorageWriter {
    file: File,
    path: PathBuf,
}

impl StorageWriter {
    /// Create the file at `path`, overwriting any existing file of that name.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(StorageWriter {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Write `data` at `offset`.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.file
            .write_all_at(data, offset)
            .with_context(|| format!("write to {} failed", self.path.display()))
    }

    /// Non-Unix fallback: seek + write on a cloned handle.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = self.file.try_clone()?;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(data)
            .with_context(|| format!("write to {} failed", self.path.display()))
    }

    /// Flush file data to disk.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all().context("storage sync failed")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the file and return its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
