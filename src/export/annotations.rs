/*!
 * Reviewer annotation placement.
 *
 * Notes are placed by the first rule that matches while the book is
 * written:
 * - after the verse they refer to (or the bridge containing it)
 * - after the paragraph that owns them
 * - at the first valid reference boundary past them, when their owning
 *   paragraph is not part of the book
 * - at book end
 *
 * Checking errors never reach the output.
 */

use std::collections::HashSet;

use crate::scripture::{Annotation, AnnotationKind, Book, ParaId, ScriptureReference};

/// Hands out a book's annotations as emission points are reached
#[derive(Debug)]
pub struct AnnotationPlacer<'d> {
    pending: Vec<&'d Annotation>,
    book_paragraphs: HashSet<&'d ParaId>,
    placed: usize,
}

impl<'d> AnnotationPlacer<'d> {
    /// Collect the placeable notes of `book`; empty when notes are not exported
    pub fn for_book(book: &'d Book, notes_enabled: bool) -> Self {
        let pending = if notes_enabled {
            book.annotations
                .iter()
                .filter(|a| a.kind != AnnotationKind::CheckingError)
                .collect()
        } else {
            Vec::new()
        };
        Self {
            pending,
            book_paragraphs: book.paragraphs().map(|p| &p.id).collect(),
            placed: 0,
        }
    }

    /// Notes not yet handed out
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Notes handed out so far
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    fn take_where(&mut self, predicate: impl Fn(&Annotation) -> bool) -> Vec<&'d Annotation> {
        let (taken, kept): (Vec<&'d Annotation>, Vec<&'d Annotation>) =
            self.pending.drain(..).partition(|a| predicate(a));
        self.pending = kept;
        self.placed += taken.len();
        taken
    }

    /// Notes at the verse just written, or inside the bridge just written
    pub fn take_for_reference(&mut self, emitted: &ScriptureReference) -> Vec<&'d Annotation> {
        let emitted = *emitted;
        self.take_where(|a| {
            a.ref_start.is_reference_equal(&emitted) || emitted.contains(&a.ref_start)
        })
    }

    /// Notes owned by the paragraph just finished
    pub fn take_for_paragraph(&mut self, para_id: &ParaId) -> Vec<&'d Annotation> {
        self.take_where(|a| a.para_id.as_ref() == Some(para_id))
    }

    /// Notes without an owning paragraph in this book whose reference lies before `boundary`
    pub fn take_overdue(&mut self, boundary: &ScriptureReference) -> Vec<&'d Annotation> {
        let boundary = *boundary;
        let paragraphs = std::mem::take(&mut self.book_paragraphs);
        let taken = self.take_where(|a| {
            let orphaned = a.para_id.as_ref().is_none_or(|id| !paragraphs.contains(id));
            orphaned && a.ref_start.compare_start(&boundary).is_lt()
        });
        self.book_paragraphs = paragraphs;
        taken
    }

    /// Everything still pending
    pub fn take_remaining(&mut self) -> Vec<&'d Annotation> {
        self.take_where(|_| true)
    }
}

/// Reference to write ahead of a note placed away from its verse.
///
/// `None` when the note points at a chapter or verse 0.
pub fn synthesized_reference(annotation: &Annotation) -> Option<ScriptureReference> {
    let start = annotation.ref_start;
    if start.chapter <= 0 || start.verse <= 0 {
        return None;
    }
    let end = annotation.ref_end;
    let verse_end = if end.chapter == start.chapter && end.verse > start.verse {
        end.verse
    } else {
        start.last_verse()
    };
    Some(ScriptureReference {
        verse_end,
        ..start
    })
}

/// Note content as a single line
pub fn remark_text(annotation: &Annotation) -> String {
    annotation
        .content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
