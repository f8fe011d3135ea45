/*!
 * Tests for error types and conversions
 */

use std::io;
use sfexport::errors::{AppError, ConfigError, DocumentError, ExportError};
use sfexport::scripture::Scripture;

#[test]
fn test_configError_duplicateWritingSystem_shouldDisplayId() {
    let error = ConfigError::DuplicateWritingSystem("en".to_string());
    let display = format!("{}", error);
    assert!(display.contains("more than once"));
    assert!(display.contains("en"));
}

#[test]
fn test_configError_noDomain_shouldDisplayCorrectly() {
    let display = ConfigError::NoDomainSelected.to_string();
    assert!(display.contains("No export domain selected"));
}

#[test]
fn test_documentError_fromJson_shouldWrapParseError() {
    let error = Scripture::from_json("{ not json").unwrap_err();
    assert!(matches!(error, DocumentError::Parse(_)));
    assert!(error.to_string().contains("Failed to parse scripture document"));
}

#[test]
fn test_documentError_withNoBooks_shouldBeEmpty() {
    let error = Scripture::from_json(r#"{ "books": [] }"#).unwrap_err();
    assert!(matches!(error, DocumentError::Empty));
}

#[test]
fn test_exportError_fromIoError_shouldWrapSinkError() {
    let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
    let error: ExportError = io_error.into();
    assert!(matches!(error, ExportError::Sink(_)));
    assert!(error.to_string().contains("pipe closed"));
}

#[test]
fn test_exportError_fromConfigError_shouldWrapCorrectly() {
    let error: ExportError = ConfigError::MissingWritingSystems.into();
    assert!(matches!(error, ExportError::Config(ConfigError::MissingWritingSystems)));
}

#[test]
fn test_appError_fromExportError_shouldWrapCorrectly() {
    let export_error = ExportError::Config(ConfigError::UnknownDialect("rtf".to_string()));
    let app_error: AppError = export_error.into();
    let display = app_error.to_string();
    assert!(display.contains("Export error"));
    assert!(display.contains("rtf"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref msg) if msg == "something odd"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let app_error: AppError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(app_error, AppError::File(_)));
}
