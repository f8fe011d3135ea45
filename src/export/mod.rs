/*!
 * Standard-format export.
 *
 * The emitter walks a document once and writes lines to a `LineSink`.
 * Everything else in this module is a helper it drives:
 * - `reference_tracker`: chapter/verse numbering, inference and issues
 * - `run_classifier`: assigns a role to every run of a paragraph
 * - `back_translation`: pairs vernacular and back translation segments
 * - `footnotes`: footnote and cross-reference serialization
 * - `annotations`: reviewer note placement
 * - `styles`, `markers`: style names and marker spelling
 */

pub mod annotations;
pub mod back_translation;
pub mod emitter;
pub mod footnotes;
pub mod markers;
pub mod reference_tracker;
pub mod run_classifier;
pub mod sink;
pub mod styles;

pub use annotations::AnnotationPlacer;
pub use back_translation::{build_merge_plan, segment_runs, BtPlacementKind, MergePlan};
pub use emitter::{BookPass, EmitterState, ExportSummary, MarkupEmitter};
pub use footnotes::{parse_note_styles, render_note, NoteContext, NoteKind};
pub use reference_tracker::{ReferenceIssue, ReferenceIssueKind, ReferenceTracker};
pub use run_classifier::{classify_runs, ClassifiedRun, RunRole};
pub use sink::{LineSink, VecSink};
pub use styles::{StandardStyles, StyleLookup};
