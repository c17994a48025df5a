//! Disk side of a fetch: stage the body in `<destination>.part`, then rename.
//!
//! The final path only ever appears once the whole body is on disk, so the
//! fetcher's "destination exists" check never mistakes a torn download for a
//! finished one.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.grb2` → `a.grb2.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// A download in progress, buffered in chunks of `chunk_size` bytes.
pub struct StagedFile {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    written: u64,
}

impl StagedFile {
    /// Creates parent directories and a fresh temp file next to `final_path`.
    /// A stale `.part` from an earlier crash is truncated.
    pub fn create(final_path: &Path, chunk_size: usize) -> io::Result<Self> {
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(StagedFile {
            writer: BufWriter::with_capacity(chunk_size.max(1), file),
            temp_path,
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flushes, syncs and renames the temp file onto `final_path`. Returns bytes written.
    /// If any step fails the temp file is removed before the error is returned.
    pub fn finalize(self, final_path: &Path) -> io::Result<u64> {
        let written = self.written;
        let temp_path = self.temp_path;
        let result = commit(self.writer, &temp_path, final_path);
        if let Err(e) = &result {
            tracing::debug!(path = %temp_path.display(), "finalize failed: {}", e);
            remove_temp(&temp_path);
        }
        result.map(|()| written)
    }

    /// Drops the partial body. Errors removing the temp file are logged, not returned.
    pub fn discard(self) {
        drop(self.writer);
        remove_temp(&self.temp_path);
    }
}

fn commit(writer: BufWriter<File>, temp_path: &Path, final_path: &Path) -> io::Result<()> {
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, final_path)
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        tracing::debug!(path = %temp_path.display(), "could not remove temp file: {}", e);
    }
}
