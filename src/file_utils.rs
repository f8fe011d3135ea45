use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::DEFAULT_CONFIG_FILE;
use crate::export::sink::LineSink;

/// Extension of input documents
pub const DOCUMENT_EXTENSION: &str = "json";

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: `<output_dir>/<document stem>.<extension>`
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        document: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = document.as_ref().file_stem().unwrap_or_default();
        let file_name = format!(
            "{}.{}",
            stem.to_string_lossy(),
            extension.trim_start_matches('.')
        );
        output_dir.as_ref().join(file_name)
    }

    /// JSON documents under `dir`, sorted, excluding the default config file
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() || entry.file_name() == DEFAULT_CONFIG_FILE {
                continue;
            }
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(DOCUMENT_EXTENSION));
            if is_json {
                documents.push(path.to_path_buf());
            }
        }

        documents.sort();
        Ok(documents)
    }

    /// Read a document or config file
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Append lines to a log file under one timestamp
    pub fn append_log_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        let path = path.as_ref();
        if lines.is_empty() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        for line in lines {
            writeln!(writer, "[{}] {}", stamp, line)
                .with_context(|| format!("Failed to write to log file: {:?}", path))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write to log file: {:?}", path))
    }
}

/// Buffered file sink for exported lines.
///
/// Lines go to a `.partial` file next to the target, which only takes the
/// target's name in `finish`. A sink dropped before that removes its
/// partial file, so a failed export leaves nothing behind.
pub struct FileLineSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    partial_path: PathBuf,
}

impl FileLineSink {
    /// Start writing output destined for `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        let partial_path = Self::partial_path_for(&path);
        let file = File::create(&partial_path)
            .with_context(|| format!("Failed to create output file: {:?}", partial_path))?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
            partial_path,
        })
    }

    /// Where output for `path` is staged until `finish`
    pub fn partial_path_for(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".partial");
        path.with_file_name(name)
    }

    /// Flush buffered output and move it into place
    pub fn finish(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .into_inner()
                .map_err(|e| e.into_error())
                .context("Failed to flush output file")?;
        }
        fs::rename(&self.partial_path, &self.path)
            .with_context(|| format!("Failed to move output into place: {:?}", self.path))
    }
}

impl Drop for FileLineSink {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.partial_path);
        }
    }
}

impl LineSink for FileLineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output file already finished"))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }
}
