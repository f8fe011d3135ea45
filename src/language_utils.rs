use isolang::Language;

use crate::errors::ConfigError;

// @module: Writing system utilities
// Writing system ids look like language tags (`en`, `tpi`, `en-US`, `pt-BR`).
// They end up inside markers as `_<ws>` suffixes, so they must not contain
// whitespace or marker syntax.

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Language subtag of a writing system id (`pt-BR` -> `pt`)
pub fn language_subtag(ws: &str) -> &str {
    let ws = ws.trim();
    ws.split(['-', '_']).next().unwrap_or(ws)
}

/// Classify the language subtag of a writing system id
pub fn language_code_type(ws: &str) -> Option<LanguageCodeType> {
    let code = language_subtag(ws).to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code).map(|_| LanguageCodeType::Part1),
        3 => Language::from_639_3(&code).map(|_| LanguageCodeType::Part3),
        _ => None,
    }
}

/// Whether the writing system id starts with a known ISO 639 language
pub fn is_known_language(ws: &str) -> bool {
    language_code_type(ws).is_some()
}

/// English language name for a writing system id, if known
pub fn language_name(ws: &str) -> Option<String> {
    let code = language_subtag(ws).to_lowercase();
    let lang = match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code),
        _ => None,
    }?;
    Some(lang.to_name().to_string())
}

/// Check that a writing system id can be used as a marker suffix
pub fn validate_writing_system_id(ws: &str) -> Result<(), ConfigError> {
    let trimmed = ws.trim();
    let usable = !trimmed.is_empty()
        && trimmed == ws
        && trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if usable {
        Ok(())
    } else {
        Err(ConfigError::InvalidWritingSystem(ws.to_string()))
    }
}

/// Check whether two writing system ids name the same writing system
pub fn writing_systems_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
