/*!
 * Tests for chapter and verse numbering
 */

use sfexport::export::reference_tracker::{
    chapter_num_string_to_int, parse_verse_num, ReferenceIssueKind, ReferenceTracker,
};
use sfexport::scripture::ScriptureReference;

fn genesis_tracker() -> ReferenceTracker {
    let mut tracker = ReferenceTracker::new(false);
    tracker.start_book("GEN", 1);
    tracker
}

/// Test the documented verse parsing examples
#[test]
fn test_parse_verse_num_withDocumentedExamples_shouldMatch() {
    let bridge = parse_verse_num("4-5d");
    assert_eq!((bridge.start, bridge.end, bridge.invalid_syntax), (4, 5, false));

    let missing_start = parse_verse_num("-12");
    assert_eq!((missing_start.start, missing_start.end, missing_start.invalid_syntax), (12, 12, true));

    let empty = parse_verse_num("");
    assert_eq!((empty.start, empty.end, empty.invalid_syntax), (0, 0, true));
}

/// Test the documented chapter parsing examples
#[test]
fn test_chapter_num_string_to_int_withDocumentedExamples_shouldMatch() {
    assert_eq!(chapter_num_string_to_int("3b"), (3, true));
    assert_eq!(chapter_num_string_to_int("150"), (150, false));
}

/// Test that a chapter jump is recorded with the previous chapter
#[test]
fn test_enter_chapter_withSkippedChapter_shouldRecordIssue() {
    let mut tracker = genesis_tracker();
    tracker.enter_chapter("1");
    let event = tracker.enter_chapter("3");

    assert!(event.out_of_order);
    assert_eq!(event.number, 3);
    let issue = &tracker.issues()[0];
    assert_eq!(issue.kind, ReferenceIssueKind::ChapterOutOfOrder);
    assert_eq!(issue.book, "GEN");
    assert_eq!(issue.previous, Some(1));
    assert_eq!(tracker.last_emitted_chapter(), Some(3));
}

/// Test that an invalid chapter keeps its best-effort number
#[test]
fn test_enter_chapter_withTrailingLetter_shouldBeInvalidButNumeric() {
    let mut tracker = genesis_tracker();
    let event = tracker.enter_chapter("2b");

    assert!(event.invalid);
    assert!(event.numeric);
    assert_eq!(event.tag, "2b");
    assert!(!tracker.current_chapter_valid());
    assert_eq!(tracker.issues()[0].kind, ReferenceIssueKind::InvalidChapter);
}

/// Test that a new chapter clears the verse state
#[test]
fn test_enter_chapter_afterVerses_shouldResetVerse() {
    let mut tracker = genesis_tracker();
    tracker.enter_chapter("1");
    tracker.enter_verse("5");
    tracker.enter_chapter("2");

    assert!(!tracker.has_verse());
    assert_eq!(tracker.last_emitted_verse(), None);
    assert!(!tracker.enter_verse("1").out_of_order);
}

/// Test that the current reference follows chapter and bridge
#[test]
fn test_current_reference_withBridge_shouldCoverBridge() {
    let mut tracker = genesis_tracker();
    assert_eq!(tracker.current_reference(), None);

    tracker.enter_chapter("3");
    tracker.enter_verse("4-6");
    let reference = tracker.current_reference().expect("reference");

    assert_eq!(reference, ScriptureReference::bridge(1, 3, 4, 6));
    assert!(reference.contains(&ScriptureReference::new(1, 3, 5)));
}

/// Test that start_book clears numbering and issues
#[test]
fn test_start_book_afterIssues_shouldResetState() {
    let mut tracker = genesis_tracker();
    tracker.enter_chapter("1");
    tracker.enter_chapter("9");
    assert!(!tracker.issues().is_empty());

    tracker.start_book("EXO", 2);

    assert_eq!(tracker.book_code(), "EXO");
    assert_eq!(tracker.book_number(), 2);
    assert!(!tracker.has_chapter());
    assert!(tracker.issues().is_empty());
    assert!(!tracker.enter_chapter("1").out_of_order);
}

/// Test that digit conversion only changes the tag
#[test]
fn test_enter_verse_withNativeDigits_shouldConvertTagWhenEnabled() {
    let mut tracker = ReferenceTracker::new(true);
    tracker.start_book("GEN", 1);
    tracker.enter_chapter("\u{0661}");
    let verse = tracker.enter_verse("\u{0662}");

    assert_eq!(verse.tag, "2");
    assert_eq!(verse.number.start, 2);
    assert_eq!(tracker.verse_reference_field(&verse), Some("1:2".to_string()));
}

/// Test that Obadiah's inferred chapter is suppressed but verse 1 is not
#[test]
fn test_infer_for_content_inSingleChapterBook_shouldSuppressOnlyChapter() {
    let mut tracker = ReferenceTracker::new(false);
    tracker.start_book("OBA", 31);
    let inference = tracker.infer_for_content();

    assert!(inference.chapter.is_some_and(|c| c.suppressed));
    let verse = inference.verse.expect("verse 1 inferred");
    assert!(verse.inferred);
    assert_eq!(verse.tag, "1");
}
