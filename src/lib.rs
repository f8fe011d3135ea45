/*!
 * # sfexport - Standard Format scripture export
 *
 * A Rust library that serializes an in-memory scripture document into
 * backslash-marker text.
 *
 * ## Features
 *
 * - Two dialects:
 *   - Toolbox: record oriented (`\rcrd`, `\vref`, one field per line)
 *   - Paratext: continuous USFM-style text with inline character styles
 * - Chapter and verse inference for content that precedes the first number
 * - Back translation merge with paired, added and unmarked segments
 * - Footnotes, cross-references and pictures
 * - Reviewer notes placed after the verse or paragraph they belong to
 * - ISO 639-1 and ISO 639-3 writing system validation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `scripture`: Document model and references:
 *   - `scripture::model`: Books, sections, paragraphs and runs
 *   - `scripture::reference`: Chapter/verse references
 *   - `scripture::canon`: Canonical book list
 * - `export`: Serialization engine:
 *   - `export::emitter`: The single-pass markup emitter
 *   - `export::reference_tracker`: Chapter and verse numbering state
 *   - `export::back_translation`: Back translation segment merge
 *   - `export::footnotes`: Footnote and cross-reference rendering
 *   - `export::annotations`: Reviewer note placement
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod scripture;
pub mod export;
pub mod app_controller;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, Dialect, ExportConfig};
pub use scripture::{Book, DocumentProvider, Scripture, ScriptureReference};
pub use export::{ExportSummary, LineSink, MarkupEmitter, StandardStyles, VecSink};
pub use language_utils::{validate_writing_system_id, writing_systems_match, language_name};
pub use errors::{AppError, ConfigError, DocumentError, ExportError};
