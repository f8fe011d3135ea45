/*!
 * Scripture references.
 */

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::export::reference_tracker::{chapter_num_string_to_int, parse_verse_num};

/// A book/chapter/verse reference, optionally bridged (`verse..=verse_end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureReference {
    /// Canonical book number
    pub book: u16,

    /// Chapter number (0 for introductory material)
    pub chapter: i32,

    /// First verse (0 when the reference is to a chapter or heading)
    pub verse: i32,

    /// Last verse of a bridge; values below `verse` mean "same as verse"
    #[serde(default)]
    pub verse_end: i32,

    /// False when the source text had to be repaired to produce the numbers
    #[serde(default = "default_true")]
    pub is_numerically_valid: bool,
}

fn default_true() -> bool {
    true
}

impl ScriptureReference {
    /// Create a single-verse reference
    pub fn new(book: u16, chapter: i32, verse: i32) -> Self {
        Self {
            book,
            chapter,
            verse,
            verse_end: verse,
            is_numerically_valid: true,
        }
    }

    /// Create a bridged reference
    pub fn bridge(book: u16, chapter: i32, verse: i32, verse_end: i32) -> Self {
        Self {
            verse_end,
            ..Self::new(book, chapter, verse)
        }
    }

    /// Build a reference from chapter and verse source text.
    ///
    /// Digits are extracted on a best-effort basis; anything that is not a clean
    /// number (or verse bridge) clears `is_numerically_valid`.
    pub fn from_text(book: u16, chapter_text: &str, verse_text: &str) -> Self {
        let (chapter, chapter_invalid) = chapter_num_string_to_int(chapter_text);
        let verse = parse_verse_num(verse_text);
        Self {
            book,
            chapter,
            verse: verse.start,
            verse_end: verse.end,
            is_numerically_valid: !chapter_invalid && !verse.invalid_syntax,
        }
    }

    /// Last verse covered by this reference
    pub fn last_verse(&self) -> i32 {
        self.verse_end.max(self.verse)
    }

    /// Whether this reference spans more than one verse
    pub fn is_bridge(&self) -> bool {
        self.last_verse() > self.verse
    }

    /// Reference equality: book, chapter and starting verse match
    pub fn is_reference_equal(&self, other: &ScriptureReference) -> bool {
        self.book == other.book && self.chapter == other.chapter && self.verse == other.verse
    }

    /// Whether `other` starts at a verse covered by this (possibly bridged) reference
    pub fn contains(&self, other: &ScriptureReference) -> bool {
        self.book == other.book
            && self.chapter == other.chapter
            && other.verse >= self.verse
            && other.verse <= self.last_verse()
    }

    /// Ordering key ignoring bridges and validity
    pub fn sort_key(&self) -> (u16, i32, i32) {
        (self.book, self.chapter, self.verse)
    }

    /// Compare start positions
    pub fn compare_start(&self, other: &ScriptureReference) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }

    /// `c:v` or `c:v-e` form used in reference fields
    pub fn chapter_verse_text(&self) -> String {
        if self.is_bridge() {
            format!("{}:{}-{}", self.chapter, self.verse, self.last_verse())
        } else {
            format!("{}:{}", self.chapter, self.verse)
        }
    }
}
