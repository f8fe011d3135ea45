/*!
 * Scripture document model.
 *
 * - `model`: books, sections, paragraphs, runs and embedded objects
 * - `reference`: chapter/verse references
 * - `canon`: canonical book codes, names and chapter counts
 */

pub mod canon;
pub mod model;
pub mod reference;

pub use model::{
    Annotation, AnnotationKind, Book, DocumentProvider, EmbeddedObject, Note, ParaId, Paragraph,
    ParagraphKind, Picture, Run, Scripture, Section, SectionKind, ORC,
};
pub use reference::ScriptureReference;
