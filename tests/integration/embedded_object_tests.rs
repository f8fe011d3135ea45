/*!
 * Footnote, cross-reference and picture serialization tests
 */

use sfexport::app_config::{ExportConfig, FootnoteMarkerStyle};
use sfexport::scripture::{Book, EmbeddedObject, Note, Paragraph, Picture, Run, Section};
use crate::common;

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|l| l.to_string()).collect()
}

fn book_with(runs: Vec<Run>, objects: Vec<(&str, EmbeddedObject)>) -> Book {
    let mut book = Book::new(1);
    book.sections.push(Section::scripture(
        Paragraph::section_head("h1", "Head"),
        vec![Paragraph::scripture("p1").with_runs(runs)],
    ));
    for (id, object) in objects {
        book.objects.insert(id.to_string(), object);
    }
    book
}

fn footnote_book() -> Book {
    book_with(
        vec![
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("In the beginning"),
            Run::anchor("fn1"),
            Run::text(" God"),
        ],
        vec![(
            "fn1",
            EmbeddedObject::Footnote(Note::new(vec![
                Run::text("Or "),
                Run::styled("heavens", "Alternate Reading"),
            ])),
        )],
    )
}

#[test]
fn test_export_footnote_inParatext_shouldBeInlineAndClosed() {
    let output = common::export_lines(&common::paratext_config(), &common::document(footnote_book()));

    assert_eq!(
        output.last().map(String::as_str),
        Some("\\v 1 In the beginning\\f + \\fr 1.1 \\ft Or \\fq heavens\\fq*\\f* God")
    );
}

#[test]
fn test_export_footnote_withSpacedStyledRun_shouldMatchBodyStyleSpacing() {
    let book = book_with(
        vec![
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("In the"),
            Run::styled(" beginning ", "Emphasis"),
            Run::anchor("fn1"),
            Run::text("God"),
        ],
        vec![(
            "fn1",
            EmbeddedObject::Footnote(Note::new(vec![
                Run::text("Or"),
                Run::styled(" heavens ", "Emphasis"),
                Run::text("above"),
            ])),
        )],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(
        output.last().map(String::as_str),
        Some("\\v 1 In the \\em beginning\\em* \\f + \\fr 1.1 \\ft Or \\em heavens\\em* above\\f*God")
    );
}

#[test]
fn test_export_footnote_inToolbox_shouldTakeItsOwnLine() {
    let output = common::export_lines(&common::toolbox_config(), &common::document(footnote_book()));

    assert_eq!(
        &output[output.len() - 3..],
        &lines(&["\\vt In the beginning", "\\f + \\fr 1.1 \\ft Or \\fq heavens", "\\vt God"])[..]
    );
}

#[test]
fn test_export_footnote_withoutDisplayedReference_shouldOmitFr() {
    let config = ExportConfig {
        display_footnote_reference: false,
        ..common::paratext_config()
    };
    let output = common::export_lines(&config, &common::document(footnote_book()));

    assert_eq!(
        output.last().map(String::as_str),
        Some("\\v 1 In the beginning\\f + \\ft Or \\fq heavens\\fq*\\f* God")
    );
}

#[test]
fn test_export_symbolicFootnote_shouldUseNoteSymbol() {
    let mut book = footnote_book();
    if let Some(EmbeddedObject::Footnote(note)) = book.objects.get_mut("fn1") {
        note.symbol = Some("a".to_string());
    }
    let config = ExportConfig {
        footnote_marker_style: FootnoteMarkerStyle::Symbolic,
        ..common::paratext_config()
    };
    let output = common::export_lines(&config, &common::document(book));

    let last = output.last().expect("verse line");
    assert!(last.contains("\\f a \\fr 1.1 "));
}

#[test]
fn test_export_crossReference_shouldUseDashCaller() {
    let book = book_with(
        vec![Run::chapter("1"), Run::verse("4"), Run::text("generations"), Run::anchor("x1")],
        vec![("x1", EmbeddedObject::CrossReference(Note::new(vec![Run::text("Gen 5:1")])))],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(
        output.last().map(String::as_str),
        Some("\\v 4 generations\\x - \\xo 1.4 \\xt Gen 5:1\\x*")
    );
}

#[test]
fn test_export_footnoteInHeading_shouldHaveNoReference() {
    let mut book = footnote_book();
    book.sections[0].heading[0] = Paragraph::section_head("h1", "Head").with_run(Run::anchor("fn2"));
    book.objects.insert(
        "fn2".to_string(),
        EmbeddedObject::Footnote(Note::new(vec![Run::text("Heading note")])),
    );

    let paratext = common::export_lines(&common::paratext_config(), &common::document(book.clone()));
    assert!(paratext.contains(&"\\s Head\\f + \\ft Heading note\\f*".to_string()));

    let toolbox = common::export_lines(&common::toolbox_config(), &common::document(book));
    let at = common::position_of(&toolbox, "\\s Head").expect("heading");
    assert_eq!(toolbox[at + 1], "\\f + \\ft Heading note");
}

fn picture_book() -> Book {
    let picture = Picture {
        file_name: "creation.jpg".to_string(),
        description: "Creation".to_string(),
        layout_position: "span".to_string(),
        reference_range: "GEN 1.1".to_string(),
        caption: vec![Run::text("The creation")],
        scale: Some(50),
        ..Picture::default()
    };
    book_with(
        vec![
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("a"),
            Run::anchor("pic1"),
            Run::text("b"),
        ],
        vec![("pic1", EmbeddedObject::Picture(picture))],
    )
}

#[test]
fn test_export_picture_inToolbox_shouldWriteFigureFields() {
    let output = common::export_lines(&common::toolbox_config(), &common::document(picture_book()));

    assert_eq!(
        &output[output.len() - 8..],
        &lines(&[
            "\\vt a", "\\figdesc Creation", "\\figcat creation.jpg", "\\figlaypos span",
            "\\figrefrng GEN 1.1", "\\figcap The creation", "\\figscale 50", "\\vt b",
        ])[..]
    );
}

#[test]
fn test_export_picture_inParatext_shouldResumeTextWithoutMarker() {
    let output = common::export_lines(&common::paratext_config(), &common::document(picture_book()));

    assert_eq!(output[output.len() - 8], "\\v 1 a");
    assert_eq!(output.last().map(String::as_str), Some("b"));
}

#[test]
fn test_export_pictureCaptionTranslation_shouldWriteBtCaption() {
    let mut book = picture_book();
    if let Some(EmbeddedObject::Picture(picture)) = book.objects.get_mut("pic1") {
        picture
            .caption_translations
            .insert("en".to_string(), vec![Run::text("Creation scene")]);
    }
    let config = common::with_back_translation(common::toolbox_config(), &["en"]);
    let output = common::export_lines(&config, &common::document(book));

    let at = common::position_of(&output, "\\figscale 50").expect("picture");
    assert_eq!(output[at + 1], "\\btfigcap Creation scene");
}

#[test]
fn test_export_unresolvedAnchor_shouldStripPlaceholder() {
    let book = book_with(
        vec![
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("before"),
            Run::anchor("missing"),
            Run::text(" after"),
        ],
        Vec::new(),
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(output.last().map(String::as_str), Some("\\v 1 before after"));
    assert!(!output.iter().any(|l| l.contains('\u{FFFC}')));
}
