/*!
 * End-to-end export tests in both dialects
 */

use sfexport::app_config::ExportConfig;
use sfexport::export::{MarkupEmitter, ReferenceIssueKind, StandardStyles, VecSink};
use sfexport::scripture::{Book, Paragraph, ParagraphKind, Run, Scripture, Section};
use crate::common;

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|l| l.to_string()).collect()
}

fn book_with_paragraphs(number: u16, paragraphs: Vec<Paragraph>) -> Book {
    let mut book = Book::new(number);
    book.sections
        .push(Section::scripture(Paragraph::section_head("h1", "Head"), paragraphs));
    book
}

/// The documented Toolbox example
#[test]
fn test_export_toolbox_withGenesisExample_shouldMatchExactly() {
    let doc = common::document(common::genesis_book());
    let output = common::export_lines(&common::toolbox_config(), &doc);

    assert_eq!(
        output,
        lines(&[
            "\\rcrd GEN 0", "\\id GEN", "\\h Genesis", "\\mt Gneesis", "\\rcrd GEN 1", "\\c 1",
            "\\s My section head", "\\p", "\\vref GEN.1:1", "\\v 1", "\\vt won", "\\vref GEN.1:2",
            "\\v 2", "\\vt too", "\\vref GEN.1:3", "\\v 3", "\\vt treee",
        ])
    );
}

/// The same document in the continuous dialect
#[test]
fn test_export_paratext_withGenesisExample_shouldWriteInlineVerses() {
    let doc = common::document(common::genesis_book());
    let output = common::export_lines(&common::paratext_config(), &doc);

    assert_eq!(
        output,
        lines(&[
            "\\id GEN", "\\h Genesis", "\\mt Gneesis", "\\c 1", "\\s My section head", "\\p",
            "\\v 1 won", "\\v 2 too", "\\v 3 treee",
        ])
    );
}

/// A one-chapter book gets verse 1 but no inferred chapter marker
#[test]
fn test_export_singleChapterBook_shouldSuppressInferredChapterOnly() {
    let book = book_with_paragraphs(
        65,
        vec![Paragraph::scripture("p1").with_runs([Run::verse("1"), Run::text("From Jude")])],
    );
    let doc = common::document(book);

    let toolbox = common::export_lines(&common::toolbox_config(), &doc);
    assert_eq!(
        toolbox,
        lines(&[
            "\\rcrd JUD 0", "\\id JUD", "\\h Jude", "\\s Head", "\\rcrd JUD 1", "\\p",
            "\\vref JUD.1:1", "\\v 1", "\\vt From Jude",
        ])
    );
    assert!(!toolbox.iter().any(|l| l.starts_with("\\c")));

    let paratext = common::export_lines(&common::paratext_config(), &doc);
    assert_eq!(
        paratext,
        lines(&["\\id JUD", "\\h Jude", "\\s Head", "\\p", "\\v 1 From Jude"])
    );
}

/// Unnumbered content in a one-chapter book still gets verse 1
#[test]
fn test_export_singleChapterBook_withUnnumberedText_shouldInferVerseOne() {
    let book = book_with_paragraphs(
        31,
        vec![Paragraph::scripture("p1").with_run(Run::text("The vision of Obadiah"))],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(
        output,
        lines(&["\\id OBA", "\\h Obadiah", "\\s Head", "\\p", "\\v 1 The vision of Obadiah"])
    );
}

/// Chapter 1 is synthesized once, not per paragraph
#[test]
fn test_export_withoutChapterRun_shouldSynthesizeChapterOnce() {
    let book = book_with_paragraphs(
        1,
        vec![
            Paragraph::scripture("p1").with_runs([Run::verse("1"), Run::text("a")]),
            Paragraph::scripture("p2").with_runs([Run::verse("2"), Run::text("b")]),
        ],
    );
    let doc = common::document(book);

    let toolbox = common::export_lines(&common::toolbox_config(), &doc);
    assert_eq!(
        toolbox,
        lines(&[
            "\\rcrd GEN 0", "\\id GEN", "\\h Genesis", "\\s Head", "\\rcrd GEN 1", "\\c 1", "\\p",
            "\\vref GEN.1:1", "\\v 1", "\\vt a", "\\p", "\\vref GEN.1:2", "\\v 2", "\\vt b",
        ])
    );
    assert_eq!(toolbox.iter().filter(|l| *l == "\\c 1").count(), 1);

    let paratext = common::export_lines(&common::paratext_config(), &doc);
    assert_eq!(
        paratext,
        lines(&["\\id GEN", "\\h Genesis", "\\s Head", "\\c 1", "\\p", "\\v 1 a", "\\p", "\\v 2 b"])
    );
}

/// A chapter followed by verse 2 does not invent verse 1
#[test]
fn test_export_chapterThenVerseTwo_shouldNotInferVerseOne() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([Run::chapter("1"), Run::verse("2"), Run::text("text")])],
    );
    let output = common::export_lines(&common::toolbox_config(), &common::document(book));

    assert!(!output.contains(&"\\v 1".to_string()));
    assert_eq!(
        &output[3..],
        &lines(&["\\rcrd GEN 1", "\\c 1", "\\s Head", "\\p", "\\vref GEN.1:2", "\\v 2", "\\vt text"])[..]
    );
}

/// Text between a chapter and its first verse gets an inferred verse 1
#[test]
fn test_export_textBeforeFirstVerse_shouldInferVerseOne() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([
            Run::chapter("1"),
            Run::text("Before "),
            Run::verse("2"),
            Run::text("after"),
        ])],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(&output[4..], &lines(&["\\p", "\\v 1 Before", "\\v 2 after"])[..]);
}

/// Character styles: own line in Toolbox, inline and closed in Paratext
#[test]
fn test_export_characterStyle_shouldFollowDialect() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("In the "),
            Run::styled("beginning", "Emphasis"),
            Run::text(" God"),
        ])],
    );
    let doc = common::document(book);

    let toolbox = common::export_lines(&common::toolbox_config(), &doc);
    assert_eq!(
        &toolbox[toolbox.len() - 3..],
        &lines(&["\\vt In the", "\\em beginning", "\\vt God"])[..]
    );

    let paratext = common::export_lines(&common::paratext_config(), &doc);
    assert_eq!(paratext.last().map(String::as_str), Some("\\v 1 In the \\em beginning\\em* God"));
}

/// Poetry lines keep their own paragraph markers
#[test]
fn test_export_poetryParagraphs_shouldUseLineMarkers() {
    let book = book_with_paragraphs(
        19,
        vec![
            Paragraph::new("q1", ParagraphKind::Normal, "Line1")
                .with_runs([Run::chapter("1"), Run::verse("1"), Run::text("Blessed is the one")]),
            Paragraph::new("q2", ParagraphKind::Normal, "Line2").with_run(Run::text("who does not walk")),
        ],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(
        &output[2..],
        &lines(&["\\c 1", "\\s Head", "\\q1", "\\v 1 Blessed is the one", "\\q2 who does not walk"])[..]
    );
}

/// Introduction sections come before scripture without reference records
#[test]
fn test_export_introSection_shouldWriteIntroMarkers() {
    let mut book = common::genesis_book();
    book.sections.insert(
        0,
        Section::intro(
            vec![Paragraph::new("is1", ParagraphKind::SectionHead, "Intro Section Head")
                .with_run(Run::text("Introduction"))],
            vec![Paragraph::new("ip1", ParagraphKind::Intro, "Intro Paragraph")
                .with_run(Run::text("Genesis tells of beginnings."))],
        ),
    );
    let output = common::export_lines(&common::toolbox_config(), &common::document(book));

    assert_eq!(
        &output[..7],
        &lines(&[
            "\\rcrd GEN 0", "\\id GEN", "\\h Genesis", "\\mt Gneesis", "\\is Introduction",
            "\\ip Genesis tells of beginnings.", "\\rcrd GEN 1",
        ])[..]
    );
}

/// Secondary title text shifts the title level
#[test]
fn test_export_titleWithSecondaryStyle_shouldWriteMt2() {
    let mut book = common::genesis_book();
    book.title = vec![Paragraph::new("t1", ParagraphKind::Title, "Title Main").with_runs([
        Run::styled("The Book of", "Title Secondary"),
        Run::text("Genesis"),
    ])];
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(&output[2..4], &lines(&["\\mt2 The Book of", "\\mt Genesis"])[..]);
}

/// Out-of-order chapters re-synchronize and are reported
#[test]
fn test_export_chapterOutOfOrder_shouldResyncAndReport() {
    let book = book_with_paragraphs(
        1,
        vec![
            Paragraph::scripture("p1").with_runs([Run::chapter("1"), Run::verse("1"), Run::text("a")]),
            Paragraph::scripture("p2").with_runs([Run::chapter("3"), Run::verse("1"), Run::text("b")]),
        ],
    );
    let doc = common::document(book);
    let config = common::toolbox_config();
    let mut sink = VecSink::new();
    let summary = {
        let mut emitter = MarkupEmitter::new(&config, &StandardStyles, &mut sink);
        emitter.export(&doc).expect("export")
    };

    assert_eq!(
        &sink.lines[sink.lines.len() - 6..],
        &lines(&["\\rcrd GEN 3", "\\c 3", "\\p", "\\vref GEN.3:1", "\\v 1", "\\vt b"])[..]
    );
    assert_eq!(summary.reference_issues.len(), 1);
    assert_eq!(summary.reference_issues[0].kind, ReferenceIssueKind::ChapterOutOfOrder);
}

/// A verse that goes backwards is written where it stands and reported
#[test]
fn test_export_verseOutOfOrder_shouldResyncWithoutDroppingText() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([
            Run::chapter("1"),
            Run::verse("1"),
            Run::text("a"),
            Run::verse("3"),
            Run::text("c"),
            Run::verse("2"),
            Run::text("b"),
        ])],
    );
    let doc = common::document(book);
    let config = common::toolbox_config();
    let mut sink = VecSink::new();
    let summary = {
        let mut emitter = MarkupEmitter::new(&config, &StandardStyles, &mut sink);
        emitter.export(&doc).expect("export")
    };

    assert_eq!(
        &sink.lines[sink.lines.len() - 9..],
        &lines(&[
            "\\vref GEN.1:1", "\\v 1", "\\vt a", "\\vref GEN.1:3", "\\v 3", "\\vt c",
            "\\vref GEN.1:2", "\\v 2", "\\vt b",
        ])[..]
    );
    let kinds: Vec<ReferenceIssueKind> = summary.reference_issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![ReferenceIssueKind::VerseOutOfOrder, ReferenceIssueKind::VerseOutOfOrder]
    );

    let output = common::export_lines(&common::paratext_config(), &doc);
    assert_eq!(output.last().map(String::as_str), Some("\\v 2 b"));
    assert!(output.contains(&"\\v 3 c".to_string()));
}

/// A chapter without digits keeps its marker but loses the reference fields
#[test]
fn test_export_nonNumericChapter_shouldSuppressRecordFields() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([Run::chapter("A"), Run::verse("1"), Run::text("x")])],
    );
    let output = common::export_lines(&common::toolbox_config(), &common::document(book));

    assert_eq!(
        &output[3..],
        &lines(&["\\c A", "\\s Head", "\\p", "\\v 1", "\\vt x"])[..]
    );
}

/// A chapter in the middle of a paragraph re-opens the paragraph
#[test]
fn test_export_chapterMidParagraph_shouldReopenParagraphMarker() {
    let book = book_with_paragraphs(
        1,
        vec![Paragraph::scripture("p1").with_runs([
            Run::chapter("1"),
            Run::verse("31"),
            Run::text("end "),
            Run::chapter("2"),
            Run::verse("1"),
            Run::text("start"),
        ])],
    );
    let output = common::export_lines(&common::paratext_config(), &common::document(book));

    assert_eq!(
        &output[2..],
        &lines(&["\\c 1", "\\s Head", "\\p", "\\v 31 end", "\\c 2", "\\p", "\\v 1 start"])[..]
    );
}

/// Book filter and multi-book documents
#[test]
fn test_export_withBookFilter_shouldOnlyExportSelectedBooks() {
    let exodus = book_with_paragraphs(
        2,
        vec![Paragraph::scripture("p1").with_runs([Run::chapter("1"), Run::verse("1"), Run::text("names")])],
    );
    let doc = Scripture::new(vec![common::genesis_book(), exodus]);

    let all = common::export_lines(&common::toolbox_config(), &doc);
    assert!(all.contains(&"\\id GEN".to_string()));
    assert!(all.contains(&"\\id EXO".to_string()));

    let config = ExportConfig {
        book_filter: vec!["exo".to_string()],
        ..common::toolbox_config()
    };
    let filtered = common::export_lines(&config, &doc);
    assert_eq!(filtered[0], "\\rcrd EXO 0");
    assert!(!filtered.contains(&"\\id GEN".to_string()));
}

/// Without the scripture domain, only the reference skeleton remains
#[test]
fn test_export_withoutScriptureDomain_shouldOmitVernacularText() {
    let config = ExportConfig {
        export_scripture_domain: false,
        ..common::with_notes(common::toolbox_config())
    };
    let output = common::export_lines(&config, &common::document(common::genesis_book()));

    assert!(!output.iter().any(|l| l.starts_with("\\vt") || l.starts_with("\\h ") || l.starts_with("\\mt")));
    assert!(output.contains(&"\\v 3".to_string()));
    assert!(output.contains(&"\\s".to_string()));
}

/// Export refuses an invalid configuration
#[test]
fn test_export_withInvalidConfig_shouldFailBeforeWriting() {
    let config = ExportConfig {
        export_back_translation_domain: true,
        ..common::toolbox_config()
    };
    let doc = common::document(common::genesis_book());
    let mut sink = VecSink::new();
    let result = {
        let mut emitter = MarkupEmitter::new(&config, &StandardStyles, &mut sink);
        emitter.export(&doc)
    };

    assert!(result.is_err());
    assert!(sink.lines.is_empty());
}
