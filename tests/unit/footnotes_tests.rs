/*!
 * Tests for footnote and cross-reference serialization
 */

use sfexport::app_config::{Dialect, FootnoteMarkerStyle};
use sfexport::export::footnotes::{parse_note_styles, render_bt_note, render_note, NoteContext, NoteKind};
use sfexport::export::{classify_runs, StandardStyles};
use sfexport::scripture::{Book, Run, Scripture};

fn render(kind: NoteKind, runs: &[Run], ctx: &NoteContext<'_>) -> String {
    let book = Book::new(1);
    let doc = Scripture::default();
    let classified = classify_runs(runs, &book, &doc, &StandardStyles);
    render_note(kind, &classified, ctx)
}

fn paratext(reference: Option<&str>) -> NoteContext<'_> {
    NoteContext {
        dialect: Dialect::Paratext,
        marker_style: FootnoteMarkerStyle::Auto,
        symbol: None,
        reference,
    }
}

fn spans(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(m, t)| (m.to_string(), t.to_string())).collect()
}

/// Test that nested styles survive a write and re-read
#[test]
fn test_render_note_withNestedStyles_shouldRoundTrip() {
    let runs = vec![
        Run::text("Or "),
        Run::styled("really", "Emphasis"),
        Run::text(" the "),
        Run::styled("heavens", "Alternate Reading"),
        Run::text(" above"),
    ];
    let note = render(NoteKind::Footnote, &runs, &paratext(None));

    assert_eq!(note, "\\f + \\ft Or \\em really\\em* the \\fq heavens\\fq* above\\f*");
    assert_eq!(
        parse_note_styles(&note),
        spans(&[("ft", "Or "), ("em", "really"), ("ft", " the "), ("fq", "heavens"), ("ft", " above")])
    );
}

/// Test that spaces at the edges of a styled run stay outside its markers
#[test]
fn test_render_note_withSpacedStyledRun_shouldKeepWordsApart() {
    let runs = vec![
        Run::text("Or"),
        Run::styled(" heavens ", "Alternate Reading"),
        Run::text("above"),
    ];
    let note = render(NoteKind::Footnote, &runs, &paratext(None));

    assert_eq!(note, "\\f + \\ft Or \\fq heavens\\fq* above\\f*");
    assert_eq!(
        parse_note_styles(&note),
        spans(&[("ft", "Or "), ("fq", "heavens"), ("ft", " above")])
    );
}

/// Test that a whitespace-only styled run is written as plain text
#[test]
fn test_render_note_withBlankStyledRun_shouldNotOpenStyle() {
    let runs = vec![Run::text("Or"), Run::styled(" ", "Emphasis"), Run::text("sky")];
    let note = render(NoteKind::Footnote, &runs, &paratext(None));

    assert_eq!(note, "\\f + \\ft Or sky\\f*");
}

/// Test that the cross-reference round trip keeps its alternate reading
#[test]
fn test_render_note_crossReferenceRoundTrip_shouldKeepXq() {
    let runs = vec![Run::text("Gen 2:4; "), Run::styled("Ps 8:3", "Alternate Reading")];
    let note = render(NoteKind::CrossReference, &runs, &paratext(Some("1.1")));

    assert!(note.starts_with("\\x - \\xo 1.1 \\xt "));
    assert!(note.ends_with("\\xq*\\x*"));
    let parsed = parse_note_styles(&note);
    assert_eq!(parsed.last(), Some(&("xq".to_string(), "Ps 8:3".to_string())));
    assert!(parsed.contains(&("xt".to_string(), "Gen 2:4; ".to_string())));
}

/// Test verse numbers inside notes
#[test]
fn test_render_note_withVerseNumberInNote_shouldUseFv() {
    let runs = vec![Run::styled("3", "Verse Number In Note"), Run::text(" Some manuscripts")];
    let note = render(NoteKind::Footnote, &runs, &paratext(None));
    assert_eq!(note, "\\f + \\ft \\fv 3\\fv* Some manuscripts\\f*");
}

/// Test that the record dialect never closes markers
#[test]
fn test_render_note_toolbox_shouldNotCloseMarkers() {
    let ctx = NoteContext {
        dialect: Dialect::Toolbox,
        marker_style: FootnoteMarkerStyle::Symbolic,
        symbol: Some("a"),
        reference: Some("3.16"),
    };
    let runs = vec![Run::styled("Or", "Emphasis"), Run::text(" only")];
    let note = render(NoteKind::Footnote, &runs, &ctx);

    assert_eq!(note, "\\f a \\fr 3.16 \\ft \\em Or \\ft only");
    assert!(!note.contains('*'));
}

/// Test back translation of notes with and without suffix
#[test]
fn test_render_bt_note_withCrossReference_shouldUseBtx() {
    let book = Book::new(1);
    let doc = Scripture::default();
    let runs = classify_runs(&[Run::text("See  Gen 1")], &book, &doc, &StandardStyles);

    assert_eq!(
        render_bt_note(NoteKind::CrossReference, &runs, "fr", true),
        Some("\\btx_fr See  Gen 1".to_string())
    );
    assert_eq!(NoteKind::CrossReference.text_marker(), "xt");
}
