//! Export archives and where finished archives go.

use crate::error::Result;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Collects named files into a single archive blob.
pub trait ArchiveWriter {
    /// Create an (empty) folder, e.g. `blocks`.
    fn add_folder(&mut self, path: &str) -> Result<()>;

    /// Add a file at `path`, e.g. `blocks/stone.png`.
    fn add_file(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Number of files added so far; folders don't count.
    fn file_count(&self) -> usize;

    /// Close the archive and return its bytes.
    fn finish(self) -> Result<Vec<u8>>;
}

/// Deflate-compressed ZIP built in memory.
pub struct ZipArchiveWriter {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    files: usize,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            files: 0,
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_folder(&mut self, path: &str) -> Result<()> {
        let folder = format!("{}/", path.trim_end_matches('/'));
        self.writer.add_directory(folder, Self::options())?;
        Ok(())
    }

    fn add_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        self.writer.start_file(path, Self::options())?;
        self.writer.write_all(data)?;
        self.files += 1;
        Ok(())
    }

    fn file_count(&self) -> usize {
        self.files
    }

    fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Receives a finished archive.
pub trait DownloadSink {
    fn deliver(&mut self, file_name: &str, data: Vec<u8>) -> Result<()>;
}

/// Writes archives into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Paths of the archives written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, data: Vec<u8>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, &data)?;
        tracing::info!("Wrote {} ({} bytes)", path.display(), data.len());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps delivered archives in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub archives: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.archives.last()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, data: Vec<u8>) -> Result<()> {
        self.archives.push((file_name.to_string(), data));
        Ok(())
    }
}
