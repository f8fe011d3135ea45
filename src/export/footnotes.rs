/*!
 * Footnote and cross-reference serialization.
 *
 * A note is a small paragraph of its own. Its runs go through the same
 * classifier as body text; the roles are then spelled with note markers
 * (`\ft`/`\fq`/`\fv` or `\xt`/`\xq`).
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{Dialect, FootnoteMarkerStyle};
use crate::export::markers;
use crate::export::run_classifier::{ClassifiedRun, RunRole, StyleClass};

static NOTE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\([^\s\\*]+)(\*| |$)").expect("Invalid note marker regex")
});

/// Footnote or cross-reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Footnote,
    CrossReference,
}

impl NoteKind {
    fn opener(&self) -> &'static str {
        match self {
            Self::Footnote => markers::FOOTNOTE,
            Self::CrossReference => markers::CROSS_REFERENCE,
        }
    }

    fn reference_marker(&self) -> &'static str {
        match self {
            Self::Footnote => markers::FOOTNOTE_REFERENCE,
            Self::CrossReference => markers::CROSS_REFERENCE_ORIGIN,
        }
    }

    /// `ft` / `xt`
    pub fn text_marker(&self) -> &'static str {
        match self {
            Self::Footnote => markers::FOOTNOTE_TEXT,
            Self::CrossReference => markers::CROSS_REFERENCE_TEXT,
        }
    }

    fn alternate_marker(&self) -> &'static str {
        match self {
            Self::Footnote => markers::FOOTNOTE_ALTERNATE,
            Self::CrossReference => markers::CROSS_REFERENCE_ALTERNATE,
        }
    }

    /// Base of the back translation marker (`f` -> `btf`)
    pub fn bt_base(&self) -> &'static str {
        self.opener()
    }
}

/// Settings for rendering one note
#[derive(Debug, Clone, Copy)]
pub struct NoteContext<'a> {
    pub dialect: Dialect,
    pub marker_style: FootnoteMarkerStyle,
    /// The note's own caller symbol
    pub symbol: Option<&'a str>,
    /// `c.v` for `\fr`/`\xo`; `None` suppresses the field
    pub reference: Option<&'a str>,
}

/// Caller written after `\f` or `\x`
pub fn note_caller(kind: NoteKind, style: FootnoteMarkerStyle, symbol: Option<&str>) -> String {
    match (kind, style) {
        (NoteKind::CrossReference, _) => markers::CROSS_REFERENCE_CALLER.to_string(),
        (NoteKind::Footnote, FootnoteMarkerStyle::Auto) => "+".to_string(),
        (NoteKind::Footnote, FootnoteMarkerStyle::Symbolic) => symbol
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("*")
            .to_string(),
    }
}

/// Run spans keyed by the note marker they are written with
fn note_spans(kind: NoteKind, runs: &[ClassifiedRun<'_>]) -> Vec<(String, String)> {
    let mut spans: Vec<(String, String)> = Vec::new();
    for run in runs {
        let marker = match &run.role {
            RunRole::CharacterStyle(style) => match style.class {
                StyleClass::AlternateReading => kind.alternate_marker().to_string(),
                StyleClass::VerseNumberInNote => markers::FOOTNOTE_VERSE.to_string(),
                StyleClass::General | StyleClass::TitleLevel(_) => style.marker.clone(),
            },
            RunRole::FootnoteAnchor | RunRole::CrossRefAnchor | RunRole::PictureAnchor => continue,
            RunRole::PlainText
            | RunRole::ChapterNumber
            | RunRole::VerseNumber
            | RunRole::VerseBridge => kind.text_marker().to_string(),
        };
        match spans.last_mut() {
            Some((last, text)) if *last == marker => text.push_str(&run.text),
            _ => spans.push((marker, run.text.clone())),
        }
    }
    spans
}

/// Render a footnote or cross-reference as a single token string
pub fn render_note(kind: NoteKind, runs: &[ClassifiedRun<'_>], ctx: &NoteContext<'_>) -> String {
    let mut out = format!(
        "\\{} {} ",
        kind.opener(),
        note_caller(kind, ctx.marker_style, ctx.symbol)
    );
    if let Some(reference) = ctx.reference {
        out.push_str(&format!("\\{} {} ", kind.reference_marker(), reference));
    }

    let spans = note_spans(kind, runs);
    let base = kind.text_marker();

    match ctx.dialect {
        Dialect::Toolbox => {
            if spans.first().is_none_or(|(marker, _)| marker != base) {
                out.push_str(&markers::tag(base));
                out.push(' ');
            }
            let parts: Vec<String> = spans
                .iter()
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(marker, text)| markers::field(marker, text))
                .collect();
            out.push_str(&parts.join(" "));
            out.trim_end().to_string()
        }
        Dialect::Paratext => {
            out.push_str(&markers::tag(base));
            out.push(' ');
            for (marker, text) in &spans {
                if marker == base {
                    out.push_str(text);
                } else {
                    out.push_str(&markers::inline_style_spaced(marker, text));
                }
            }
            let mut out = out.trim_end().to_string();
            out.push_str(&markers::close_tag(kind.opener()));
            out
        }
    }
}

/// Back translation of a note as `\btf[_ws] text`; `None` when it has no text
pub fn render_bt_note(
    kind: NoteKind,
    runs: &[ClassifiedRun<'_>],
    ws: &str,
    with_suffix: bool,
) -> Option<String> {
    let text: String = runs
        .iter()
        .filter(|r| !r.role.is_anchor())
        .map(|r| r.text.as_str())
        .collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(markers::field(&markers::bt_marker(kind.bt_base(), ws, with_suffix), text))
}

/// Read a rendered note back into `(marker, text)` spans.
///
/// The opener with its caller and the closing marker are not reported.
pub fn parse_note_styles(note: &str) -> Vec<(String, String)> {
    let mut spans: Vec<(String, String)> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut cursor = 0;

    let push_text = |stack: &[String], text: &str, spans: &mut Vec<(String, String)>| {
        if text.is_empty() {
            return;
        }
        if let Some(current) = stack.last() {
            if current != markers::FOOTNOTE && current != markers::CROSS_REFERENCE {
                spans.push((current.clone(), text.to_string()));
            }
        }
    };

    for caps in NOTE_MARKER_REGEX.captures_iter(note) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&stack, &note[cursor..whole.start()], &mut spans);
        cursor = whole.end();

        let marker = caps[1].to_string();
        let closing = &caps[2] == "*";
        if closing {
            if stack.last() == Some(&marker) {
                stack.pop();
            }
            continue;
        }
        let is_base = marker == markers::FOOTNOTE_TEXT
            || marker == markers::CROSS_REFERENCE_TEXT
            || marker == markers::FOOTNOTE_REFERENCE
            || marker == markers::CROSS_REFERENCE_ORIGIN;
        if is_base {
            // Base markers replace whatever is open inside the note
            stack.retain(|m| m == markers::FOOTNOTE || m == markers::CROSS_REFERENCE);
        } else if stack.len() > 1 && !closes_with_star(note, whole.end(), &marker) {
            // Record dialect styles are never closed; a new one replaces the old
            stack.pop();
        }
        stack.push(marker);
    }
    push_text(&stack, &note[cursor..], &mut spans);
    spans
}

fn closes_with_star(note: &str, from: usize, marker: &str) -> bool {
    note[from..].contains(&markers::close_tag(marker))
}
