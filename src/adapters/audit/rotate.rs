//! Size-rotated file writer for the audit log.
//!
//! When the active file would exceed the configured cap it is renamed to
//! `<stem>-<timestamp>.log` (optionally gzipped afterwards) and a fresh file
//! is started under the base name. The rename is atomic, so readers of
//! rotated files never observe a partially-moved file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Appends JSON lines to a file, rotating it when it reaches `max_size`.
pub struct RotatingFileWriter {
    path: PathBuf,
    max_size: u64,
    compress: bool,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Opens (or creates) the active file in append mode.
    pub fn open(path: impl Into<PathBuf>, max_size: u64, compress: bool) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self { path, max_size, compress, file, written })
    }

    /// Writes one record plus a trailing newline, rotating first if the
    /// record would push the active file over the cap.
    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let len = line.len() as u64 + 1;
        if self.written > 0 && self.written + len > self.max_size {
            self.rotate()?;
        }

        self.file.write_all(line)?;
        self.file.write_all(b"\n")?;
        self.written += len;

        Ok(())
    }

    /// Flushes buffered data to the active file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let rotated = rotated_path(&self.path);
        fs::rename(&self.path, &rotated)?;

        if self.compress {
            // Compression failure keeps the uncompressed rotated file; the
            // active log keeps going either way.
            if let Err(err) = gzip_file(&rotated) {
                tracing::error!(error = %err, path = %rotated.display(),
                    "failed to compress rotated audit log");
            }
        }

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;

        Ok(())
    }
}

/// `audit.log` -> `audit-2024-05-03T10-00-00.000.log` next to the original.
fn rotated_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("audit");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("log");
    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f");

    path.with_file_name(format!("{stem}-{stamp}.{ext}"))
}

/// Replaces `file` with `file.gz`.
fn gzip_file(path: &Path) -> io::Result<()> {
    let mut gz_path = path.as_os_str().to_owned();
    gz_path.push(".gz");

    let mut source = BufReader::new(File::open(path)?);
    let target = File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(target, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.sync_all()?;

    fs::remove_file(path)
}
