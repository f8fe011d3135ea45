use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::export::{ExportSummary, LineSink, MarkupEmitter, StandardStyles};
use crate::file_utils::{FileLineSink, FileManager};
use crate::scripture::Scripture;

// @module: Application controller for scripture export

/// Name of the per-folder log collecting numbering problems
pub const ISSUES_LOG_NAME: &str = "sfexport.issues.log";

/// Result of exporting one document
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The document was exported to `path`
    Exported { path: PathBuf, summary: ExportSummary },
    /// Output already existed and overwriting was not requested
    Skipped { path: PathBuf },
}

/// Totals for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub exported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for scripture export
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Export an in-memory document into any sink
    pub fn export_document(
        &self,
        scripture: &Scripture,
        sink: &mut dyn LineSink,
    ) -> Result<ExportSummary> {
        let styles = StandardStyles;
        let mut emitter = MarkupEmitter::new(&self.config.export, &styles, &mut *sink);
        let summary = emitter.export(scripture).context("Export failed")?;
        Ok(summary)
    }

    /// Output directory for a given input file
    fn output_dir_for(&self, input_file: &Path, fallback: &Path) -> PathBuf {
        match &self.config.output.directory {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => input_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| fallback.to_path_buf()),
        }
    }

    /// Export one JSON document into `output_dir`
    pub fn run(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<RunOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(output_dir)?;

        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.output_extension(),
        );
        let overwrite = force_overwrite || self.config.output.force_overwrite;
        if output_path.exists() && !overwrite {
            warn!(
                "Skipping {}, output already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(RunOutcome::Skipped { path: output_path });
        }

        let content = FileManager::read_to_string(input_file)?;
        let scripture = Scripture::from_json(&content)
            .with_context(|| format!("Failed to load document: {:?}", input_file))?;

        let mut sink = FileLineSink::create(&output_path)?;
        let summary = self.export_document(&scripture, &mut sink)?;
        sink.finish()?;

        if !summary.reference_issues.is_empty() {
            warn!(
                "{} numbering problem(s) found in {}",
                summary.reference_issues.len(),
                input_file.display()
            );
            self.log_reference_issues(input_file, output_dir, &summary);
        }

        info!(
            "Success: {} ({} books, {} lines, {})",
            output_path.display(),
            summary.books_exported,
            summary.lines_written,
            Self::format_duration(start_time.elapsed())
        );
        Ok(RunOutcome::Exported {
            path: output_path,
            summary,
        })
    }

    fn log_reference_issues(&self, input_file: &Path, output_dir: &Path, summary: &ExportSummary) {
        let lines: Vec<String> = summary
            .reference_issues
            .iter()
            .map(|issue| {
                format!(
                    "{}: {} {:?} '{}'",
                    input_file.display(),
                    issue.book,
                    issue.kind,
                    issue.text
                )
            })
            .collect();
        if let Err(e) = FileManager::append_log_lines(output_dir.join(ISSUES_LOG_NAME), &lines) {
            warn!("Failed to write issues log: {}", e);
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Export every JSON document under `input_dir`
    /// Documents whose output already exists are skipped unless overwriting
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_documents(input_dir)?;
        if documents.is_empty() {
            return Err(anyhow!("No JSON documents found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(documents.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("=> "));
        folder_pb.set_message("Exporting documents");

        let mut totals = FolderSummary::default();
        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Exporting: {}", file_name));

            let output_dir = self.output_dir_for(document, input_dir);
            match self.run(document, &output_dir, force_overwrite) {
                Ok(RunOutcome::Exported { .. }) => totals.exported += 1,
                Ok(RunOutcome::Skipped { .. }) => totals.skipped += 1,
                Err(e) => {
                    error!("Error exporting {}: {:#}", file_name, e);
                    totals.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder export complete");
        info!(
            "Folder export completed: {} exported, {} skipped, {} errors ({})",
            totals.exported,
            totals.skipped,
            totals.failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(totals)
    }
}
