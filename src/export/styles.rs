/*!
 * Style-name to marker lookup.
 *
 * The exporter never hard-codes marker spellings for user styles: it asks a
 * `StyleLookup`. `StandardStyles` covers the stylesheet shipped with the
 * editor; anything it does not know passes through as a sanitized marker.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::scripture::ParagraphKind;

/// Style name of chapter number runs
pub const CHAPTER_NUMBER_STYLE: &str = "Chapter Number";

/// Style name of verse number runs
pub const VERSE_NUMBER_STYLE: &str = "Verse Number";

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static PARAGRAPH_MARKERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Paragraph", "p"),
        ("Paragraph Continuation", "m"),
        ("Line1", "q1"),
        ("Line2", "q2"),
        ("Line3", "q3"),
        ("Section Head", "s"),
        ("Section Head Major", "ms"),
        ("Section Head Minor", "s2"),
        ("Parallel Passage Reference", "r"),
        ("Title Main", "mt"),
        ("Intro Paragraph", "ip"),
        ("Intro Section Head", "is"),
        ("Intro List Item1", "ili"),
        ("Speech Line1", "q1"),
        ("Speech Line2", "q2"),
        ("Citation Paragraph", "pmo"),
    ])
});

static CHARACTER_STYLES: Lazy<HashMap<&'static str, (&'static str, StyleClass)>> = Lazy::new(|| {
    HashMap::from([
        ("Emphasis", ("em", StyleClass::General)),
        ("Key Word", ("k", StyleClass::General)),
        ("Quoted Text", ("qt", StyleClass::General)),
        ("Words Of Christ", ("wj", StyleClass::General)),
        ("Name Of God", ("nd", StyleClass::General)),
        ("See In Glossary", ("w", StyleClass::General)),
        ("Book Title In Text", ("bk", StyleClass::General)),
        ("Foreign", ("tl", StyleClass::General)),
        ("Title Secondary", ("mt2", StyleClass::TitleLevel(2))),
        ("Title Tertiary", ("mt3", StyleClass::TitleLevel(3))),
        ("Alternate Reading", ("fq", StyleClass::AlternateReading)),
        ("Verse Number In Note", ("fv", StyleClass::VerseNumberInNote)),
    ])
});

/// How a character style behaves once classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    /// Ordinary inline style written with its own marker
    General,
    /// Secondary/tertiary title text; shifts the `\mt` level
    TitleLevel(u8),
    /// `\fq` in footnotes, `\xq` in cross-references
    AlternateReading,
    /// `\fv` inside notes
    VerseNumberInNote,
}

/// Marker (without backslash) and behaviour of a character style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMarker {
    pub marker: String,
    pub class: StyleClass,
}

impl StyleMarker {
    pub fn general(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            class: StyleClass::General,
        }
    }
}

/// Result of looking up a character style name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterStyle {
    ChapterNumber,
    VerseNumber,
    Marker(StyleMarker),
}

/// Maps style names to markers
pub trait StyleLookup {
    /// Marker for a paragraph style
    fn paragraph_marker(&self, style: &str, kind: ParagraphKind) -> String;

    /// Classification of a character style
    fn character_style(&self, style: &str) -> CharacterStyle;
}

/// Make an arbitrary style name usable as a marker
pub fn sanitize_marker(style: &str) -> String {
    let underscored = WHITESPACE_REGEX.replace_all(style.trim(), "_");
    underscored
        .chars()
        .filter(|c| !matches!(c, '\\' | '*' | '|'))
        .collect()
}

/// Lookup for the standard stylesheet
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStyles;

impl StandardStyles {
    fn default_paragraph_marker(kind: ParagraphKind) -> &'static str {
        match kind {
            ParagraphKind::Normal => "p",
            ParagraphKind::SectionHead => "s",
            ParagraphKind::Intro => "ip",
            ParagraphKind::Title => "mt",
        }
    }
}

impl StyleLookup for StandardStyles {
    fn paragraph_marker(&self, style: &str, kind: ParagraphKind) -> String {
        let style = style.trim();
        if style.is_empty() {
            return Self::default_paragraph_marker(kind).to_string();
        }
        match PARAGRAPH_MARKERS.get(style) {
            Some(marker) => marker.to_string(),
            None => {
                let marker = sanitize_marker(style);
                if marker.is_empty() {
                    Self::default_paragraph_marker(kind).to_string()
                } else {
                    marker
                }
            }
        }
    }

    fn character_style(&self, style: &str) -> CharacterStyle {
        let style = style.trim();
        match style {
            CHAPTER_NUMBER_STYLE => CharacterStyle::ChapterNumber,
            VERSE_NUMBER_STYLE => CharacterStyle::VerseNumber,
            _ => match CHARACTER_STYLES.get(style) {
                Some((marker, class)) => CharacterStyle::Marker(StyleMarker {
                    marker: marker.to_string(),
                    class: *class,
                }),
                None => CharacterStyle::Marker(StyleMarker::general(sanitize_marker(style))),
            },
        }
    }
}
