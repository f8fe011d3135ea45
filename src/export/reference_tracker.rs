/*!
 * Chapter/verse reference tracking.
 *
 * The tracker owns the "current reference" for one book export. It parses
 * chapter and verse number text, infers chapter 1 and verse 1 where the
 * source omits them, and records (but never rejects) invalid or out-of-order
 * numbering so the emitter can always keep writing.
 */

use log::{debug, warn};

use crate::scripture::canon;
use crate::scripture::reference::ScriptureReference;

/// Right-to-left mark, valid around bridge hyphens in RTL scripts
pub const RLM: char = '\u{200F}';

/// Largest verse number found in any chapter (Psalm 119)
pub const MAX_PLAUSIBLE_VERSE: i32 = 176;

/// Code points of native-script digit zeros (Arabic-Indic through Mongolian, fullwidth)
const DIGIT_ZEROS: [u32; 23] = [
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0xFF10,
];

/// Numeric value of an ASCII or native-script decimal digit
pub fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    let cp = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| cp >= zero && cp < zero + 10)
        .map(|zero| cp - zero)
}

fn is_bridge_hyphen(c: char) -> bool {
    matches!(c, '-' | '\u{2010}' | '\u{2011}' | '\u{2013}')
}

fn strip_rlm(text: &str) -> String {
    text.chars().filter(|&c| c != RLM).collect()
}

/// Split off the leading maximal run of decimal digits.
///
/// Returns `None` as value when the text does not start with a digit.
fn leading_number(text: &str) -> (Option<i32>, &str) {
    let mut value: i32 = 0;
    let mut digits = 0;
    let mut split_at = text.len();
    for (i, c) in text.char_indices() {
        match digit_value(c) {
            Some(d) => {
                value = value.saturating_mul(10).saturating_add(d as i32);
                digits += 1;
            }
            None => {
                split_at = i;
                break;
            }
        }
    }
    if digits == 0 {
        (None, text)
    } else {
        (Some(value), &text[split_at..])
    }
}

/// One parsed endpoint of a verse number
#[derive(Debug, Clone, Copy)]
struct VersePart {
    value: i32,
    invalid: bool,
}

fn parse_verse_part(text: &str) -> Option<VersePart> {
    let (value, rest) = leading_number(text.trim());
    let value = value?;
    // A single letter suffix marks a verse segment ("5a") and is valid
    let mut rest_chars = rest.chars();
    let invalid = match (rest_chars.next(), rest_chars.next()) {
        (None, _) => false,
        (Some(c), None) => !c.is_alphabetic(),
        _ => true,
    };
    Some(VersePart { value, invalid })
}

/// Parsed verse number or bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerseNumber {
    pub start: i32,
    pub end: i32,
    pub invalid_syntax: bool,
}

impl VerseNumber {
    fn single(value: i32, invalid_syntax: bool) -> Self {
        Self {
            start: value,
            end: value,
            invalid_syntax,
        }
    }

    pub fn is_bridge(&self) -> bool {
        self.end > self.start
    }

    /// Whether `verse` falls inside this verse or bridge
    pub fn contains(&self, verse: i32) -> bool {
        verse >= self.start && verse <= self.end
    }
}

/// Parse verse number text, including `start-end` bridges.
///
/// Never fails: malformed text yields a best-effort number with
/// `invalid_syntax` set.
pub fn parse_verse_num(text: &str) -> VerseNumber {
    let cleaned = strip_rlm(text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return VerseNumber::single(0, true);
    }

    let Some((start_text, end_text)) = cleaned.split_once(is_bridge_hyphen) else {
        return match parse_verse_part(cleaned) {
            Some(part) => VerseNumber::single(part.value, part.invalid),
            None => VerseNumber::single(0, true),
        };
    };

    match (parse_verse_part(start_text), parse_verse_part(end_text)) {
        (Some(start), Some(end)) => {
            let start_plausible = start.value <= MAX_PLAUSIBLE_VERSE;
            let end_plausible = end.value <= MAX_PLAUSIBLE_VERSE;
            if start_plausible != end_plausible {
                // Discard the endpoint outside any real chapter
                let kept = if start_plausible { start.value } else { end.value };
                return VerseNumber::single(kept, true);
            }
            if end.value < start.value {
                return VerseNumber::single(start.value, true);
            }
            VerseNumber {
                start: start.value,
                end: end.value,
                invalid_syntax: start.invalid || end.invalid,
            }
        }
        (Some(start), None) => VerseNumber::single(start.value, true),
        (None, Some(end)) => VerseNumber::single(end.value, true),
        (None, None) => VerseNumber::single(0, true),
    }
}

/// Parse chapter number text.
///
/// Returns the leading digit run (0 when there is none) and whether the
/// text was anything other than exactly that run.
pub fn chapter_num_string_to_int(text: &str) -> (i32, bool) {
    let cleaned = strip_rlm(text);
    let cleaned = cleaned.trim();
    match leading_number(cleaned) {
        (Some(value), rest) => (value, !rest.is_empty()),
        (None, _) => (0, true),
    }
}

/// Whether chapter/verse text contains any digit at all
pub fn has_digits(text: &str) -> bool {
    text.chars().any(|c| digit_value(c).is_some())
}

/// Produce the literal tag text for a chapter or verse marker.
///
/// RLM marks are always removed; native digits are transliterated only when
/// `convert_digits` is set.
pub fn format_number_tag(text: &str, convert_digits: bool) -> String {
    let cleaned = strip_rlm(text);
    let cleaned = cleaned.trim();
    if !convert_digits {
        return cleaned.to_string();
    }
    cleaned
        .chars()
        .map(|c| match digit_value(c) {
            Some(d) if !c.is_ascii_digit() => char::from_digit(d, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Kinds of numbering problems the tracker records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceIssueKind {
    InvalidChapter,
    InvalidVerse,
    ChapterOutOfOrder,
    VerseOutOfOrder,
}

/// A numbering problem found while exporting; export continues regardless
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIssue {
    pub book: String,
    pub kind: ReferenceIssueKind,
    pub text: String,
    pub previous: Option<i32>,
}

/// Result of entering a chapter (real or inferred)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEvent {
    /// Literal marker text (`\c <tag>`)
    pub tag: String,
    /// Best-effort chapter number
    pub number: i32,
    /// False when the text had no digits at all; reference fields are then suppressed
    pub numeric: bool,
    pub invalid: bool,
    pub out_of_order: bool,
    pub inferred: bool,
    /// The chapter token itself must not be written (inferred chapter of a one-chapter book)
    pub suppressed: bool,
}

/// Result of entering a verse (real or inferred)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseEvent {
    /// Literal marker text (`\v <tag>`)
    pub tag: String,
    pub number: VerseNumber,
    /// False when the text had no digits at all; reference fields are then suppressed
    pub numeric: bool,
    pub out_of_order: bool,
    pub inferred: bool,
}

/// Chapter and verse synthesized ahead of scripture content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inference {
    pub chapter: Option<ChapterEvent>,
    pub verse: Option<VerseEvent>,
}

/// Owned reference state for one book export
#[derive(Debug, Clone, Default)]
pub struct ReferenceTracker {
    book_code: String,
    book_number: u16,
    convert_digits: bool,
    current_chapter_text: Option<String>,
    current_chapter_valid: bool,
    current_chapter_numeric: bool,
    last_emitted_chapter: Option<i32>,
    current_verse_text: Option<String>,
    last_emitted_verse: Option<VerseNumber>,
    issues: Vec<ReferenceIssue>,
}

impl ReferenceTracker {
    /// Create a tracker; `convert_digits` controls digit transliteration in tags
    pub fn new(convert_digits: bool) -> Self {
        Self {
            convert_digits,
            ..Self::default()
        }
    }

    /// Reset all state for a new book
    pub fn start_book(&mut self, book_code: &str, book_number: u16) {
        let convert_digits = self.convert_digits;
        *self = Self::new(convert_digits);
        self.book_code = book_code.to_string();
        self.book_number = book_number;
    }

    pub fn book_code(&self) -> &str {
        &self.book_code
    }

    pub fn book_number(&self) -> u16 {
        self.book_number
    }

    /// Whether any chapter (real or inferred) has been entered in this book
    pub fn has_chapter(&self) -> bool {
        self.current_chapter_text.is_some()
    }

    /// Whether a verse has been entered in the current chapter
    pub fn has_verse(&self) -> bool {
        self.current_verse_text.is_some()
    }

    pub fn current_chapter_text(&self) -> Option<&str> {
        self.current_chapter_text.as_deref()
    }

    pub fn current_chapter_valid(&self) -> bool {
        self.current_chapter_valid
    }

    pub fn current_verse_text(&self) -> Option<&str> {
        self.current_verse_text.as_deref()
    }

    pub fn last_emitted_chapter(&self) -> Option<i32> {
        self.last_emitted_chapter
    }

    pub fn last_emitted_verse(&self) -> Option<VerseNumber> {
        self.last_emitted_verse
    }

    /// Numbering problems recorded so far
    pub fn issues(&self) -> &[ReferenceIssue] {
        &self.issues
    }

    /// Take the recorded problems, leaving the list empty
    pub fn take_issues(&mut self) -> Vec<ReferenceIssue> {
        std::mem::take(&mut self.issues)
    }

    fn record(&mut self, kind: ReferenceIssueKind, text: &str, previous: Option<i32>) {
        warn!(
            "{}: {:?} '{}' (previous: {:?})",
            self.book_code, kind, text, previous
        );
        self.issues.push(ReferenceIssue {
            book: self.book_code.clone(),
            kind,
            text: text.to_string(),
            previous,
        });
    }

    /// Enter a chapter whose number text comes from the source
    pub fn enter_chapter(&mut self, text: &str) -> ChapterEvent {
        self.enter_chapter_internal(text, false)
    }

    fn enter_chapter_internal(&mut self, text: &str, inferred: bool) -> ChapterEvent {
        let (number, invalid) = chapter_num_string_to_int(text);
        let numeric = has_digits(text);
        if invalid {
            self.record(ReferenceIssueKind::InvalidChapter, text, self.last_emitted_chapter);
        }

        let out_of_order = numeric
            && self
                .last_emitted_chapter
                .is_some_and(|last| number != last.saturating_add(1));
        if out_of_order {
            self.record(ReferenceIssueKind::ChapterOutOfOrder, text, self.last_emitted_chapter);
        }

        let suppressed = inferred && canon::is_single_chapter_book(self.book_number);
        self.current_chapter_text = Some(text.to_string());
        self.current_chapter_valid = !invalid;
        self.current_chapter_numeric = numeric;
        if numeric {
            self.last_emitted_chapter = Some(number);
        }
        self.current_verse_text = None;
        self.last_emitted_verse = None;

        ChapterEvent {
            tag: format_number_tag(text, self.convert_digits),
            number,
            numeric,
            invalid,
            out_of_order,
            inferred,
            suppressed,
        }
    }

    /// Enter a verse (or bridge) whose number text comes from the source
    pub fn enter_verse(&mut self, text: &str) -> VerseEvent {
        self.enter_verse_internal(text, false)
    }

    fn enter_verse_internal(&mut self, text: &str, inferred: bool) -> VerseEvent {
        let number = parse_verse_num(text);
        let numeric = has_digits(text);
        if number.invalid_syntax {
            self.record(
                ReferenceIssueKind::InvalidVerse,
                text,
                self.last_emitted_verse.map(|v| v.end),
            );
        }

        let out_of_order = numeric
            && self
                .last_emitted_verse
                .is_some_and(|last| number.start != last.end.saturating_add(1));
        if out_of_order {
            self.record(
                ReferenceIssueKind::VerseOutOfOrder,
                text,
                self.last_emitted_verse.map(|v| v.end),
            );
        }

        self.current_verse_text = Some(text.to_string());
        if numeric {
            self.last_emitted_verse = Some(number);
        }

        VerseEvent {
            tag: format_number_tag(text, self.convert_digits),
            number,
            numeric,
            out_of_order,
            inferred,
        }
    }

    /// Synthesize chapter 1 ahead of a verse marker when the book has no chapter yet
    pub fn infer_chapter_for_verse(&mut self) -> Option<ChapterEvent> {
        if self.has_chapter() {
            return None;
        }
        debug!("{}: inferring chapter 1 before first verse", self.book_code);
        Some(self.enter_chapter_internal("1", true))
    }

    /// Synthesize chapter 1 and/or verse 1 ahead of scripture content that has no marker.
    ///
    /// Verse 1 is only inferred when no verse has been seen in the current chapter.
    pub fn infer_for_content(&mut self) -> Inference {
        let chapter = self.infer_chapter_for_verse();
        let verse = if self.has_verse() {
            None
        } else {
            debug!("{}: inferring verse 1 before unnumbered content", self.book_code);
            Some(self.enter_verse_internal("1", true))
        };
        Inference { chapter, verse }
    }

    /// The current reference, if a chapter has been entered
    pub fn current_reference(&self) -> Option<ScriptureReference> {
        self.current_chapter_text.as_ref()?;
        let chapter = self.last_emitted_chapter.unwrap_or(0);
        let verse = self.last_emitted_verse.unwrap_or_default();
        Some(ScriptureReference {
            book: self.book_number,
            chapter,
            verse: verse.start,
            verse_end: verse.end,
            is_numerically_valid: self.current_chapter_valid && !verse.invalid_syntax,
        })
    }

    /// `c.v` reference shown inside notes; `None` when no numeric chapter is current
    pub fn display_reference(&self) -> Option<String> {
        if !self.current_chapter_numeric {
            return None;
        }
        let chapter = self.last_emitted_chapter.filter(|c| *c > 0)?;
        let verse = self.last_emitted_verse.map(|v| v.start).unwrap_or(0);
        Some(format!("{}.{}", chapter, verse))
    }

    /// Chapter number for a `\rcrd` field; `None` when it must be suppressed
    pub fn record_chapter_field(&self, event: &ChapterEvent) -> Option<i32> {
        event.numeric.then_some(event.number)
    }

    /// `c:v` or `c:v-e` for a `\vref` field; `None` when it must be suppressed
    pub fn verse_reference_field(&self, event: &VerseEvent) -> Option<String> {
        if !event.numeric || !self.current_chapter_numeric {
            return None;
        }
        let chapter = self.last_emitted_chapter?;
        let verse = event.number;
        if verse.is_bridge() {
            Some(format!("{}:{}-{}", chapter, verse.start, verse.end))
        } else {
            Some(format!("{}:{}", chapter, verse.start))
        }
    }
}
