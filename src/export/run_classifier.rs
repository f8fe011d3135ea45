/*!
 * Run classification.
 *
 * Every run is mapped once to a closed `RunRole`; the emitter, the back
 * translation aligner and the footnote serializer only ever match on roles.
 */

use log::debug;

use crate::export::styles::{CharacterStyle, StyleLookup};
use crate::scripture::{Book, DocumentProvider, EmbeddedObject, Run, ORC};

pub use crate::export::styles::{StyleClass, StyleMarker};

/// What a run means to the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRole {
    ChapterNumber,
    VerseNumber,
    VerseBridge,
    CharacterStyle(StyleMarker),
    FootnoteAnchor,
    CrossRefAnchor,
    PictureAnchor,
    PlainText,
}

impl RunRole {
    /// Chapter or verse number run
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::ChapterNumber | Self::VerseNumber | Self::VerseBridge)
    }

    /// Footnote, cross-reference or picture anchor
    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::FootnoteAnchor | Self::CrossRefAnchor | Self::PictureAnchor)
    }
}

/// A run with its role resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRun<'d> {
    pub role: RunRole,
    /// Run text; object replacement characters are removed
    pub text: String,
    /// Index of the source run in its paragraph
    pub run_index: usize,
    /// Resolved embedded object for anchors
    pub object: Option<&'d EmbeddedObject>,
}

impl<'d> ClassifiedRun<'d> {
    pub fn new(role: RunRole, text: impl Into<String>, run_index: usize) -> Self {
        Self {
            role,
            text: text.into(),
            run_index,
            object: None,
        }
    }
}

fn is_default_style(style: Option<&str>) -> bool {
    match style {
        None => true,
        Some(s) => {
            let s = s.trim();
            s.is_empty() || s == "Default Paragraph Characters"
        }
    }
}

fn contains_bridge_hyphen(text: &str) -> bool {
    text.chars().any(|c| matches!(c, '-' | '\u{2010}' | '\u{2011}' | '\u{2013}'))
}

/// Classify a single run
pub fn classify_run<'d>(
    run: &Run,
    run_index: usize,
    book: &'d Book,
    provider: &'d dyn DocumentProvider,
    styles: &dyn StyleLookup,
) -> Option<ClassifiedRun<'d>> {
    if let Some(id) = &run.object {
        if let Some(object) = provider.object(book, id) {
            let role = match object {
                EmbeddedObject::Footnote(_) => RunRole::FootnoteAnchor,
                EmbeddedObject::CrossReference(_) => RunRole::CrossRefAnchor,
                EmbeddedObject::Picture(_) => RunRole::PictureAnchor,
            };
            return Some(ClassifiedRun {
                role,
                text: String::new(),
                run_index,
                object: Some(object),
            });
        }
        debug!("{}: dropping unresolved object anchor '{}'", book.code, id);
    }

    let text: String = run.text.chars().filter(|&c| c != ORC).collect();
    if text.is_empty() {
        return None;
    }

    let role = if is_default_style(run.style.as_deref()) {
        RunRole::PlainText
    } else {
        let style = run.style.as_deref().unwrap_or_default();
        match styles.character_style(style) {
            CharacterStyle::ChapterNumber => RunRole::ChapterNumber,
            CharacterStyle::VerseNumber if contains_bridge_hyphen(&text) => RunRole::VerseBridge,
            CharacterStyle::VerseNumber => RunRole::VerseNumber,
            CharacterStyle::Marker(marker) => RunRole::CharacterStyle(marker),
        }
    };

    Some(ClassifiedRun {
        role,
        text,
        run_index,
        object: None,
    })
}

/// Classify a run sequence, dropping runs that carry nothing to emit
pub fn classify_runs<'d>(
    runs: &[Run],
    book: &'d Book,
    provider: &'d dyn DocumentProvider,
    styles: &dyn StyleLookup,
) -> Vec<ClassifiedRun<'d>> {
    runs.iter()
        .enumerate()
        .filter_map(|(i, run)| classify_run(run, i, book, provider, styles))
        .collect()
}
