/*!
 * Read-only scripture document model consumed by the exporter.
 *
 * The model mirrors the structure kept by a translation editor:
 * book → section → paragraph → run, with embedded objects (footnotes,
 * cross-references, pictures) referenced from runs by id, per-writing-system
 * back translations attached to paragraphs and notes, and reviewer
 * annotations attached to the book.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use crate::errors::DocumentError;
use crate::language_utils::writing_systems_match;
use crate::scripture::reference::ScriptureReference;

/// Object replacement character used as an in-text anchor for embedded objects
pub const ORC: char = '\u{FFFC}';

/// Stable identity of a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParaId(pub String);

impl ParaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ParaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest unit of paragraph content: text in one writing system and one character style
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    // @field: Text payload (an ORC for embedded-object anchors)
    pub text: String,

    // @field: Writing system id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws: Option<String>,

    // @field: Character style name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    // @field: Embedded object id (footnote, cross-reference or picture)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    // @field: Source character offsets
    #[serde(default)]
    pub range: Range<usize>,
}

impl Run {
    /// Plain run without a character style
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Run carrying a character style
    pub fn styled(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Some(style.into()),
            ..Self::default()
        }
    }

    /// Anchor run for an embedded object
    pub fn anchor(object_id: impl Into<String>) -> Self {
        Self {
            text: ORC.to_string(),
            object: Some(object_id.into()),
            ..Self::default()
        }
    }

    /// Chapter number run
    pub fn chapter(number: impl Into<String>) -> Self {
        Self::styled(number, "Chapter Number")
    }

    /// Verse number run
    pub fn verse(number: impl Into<String>) -> Self {
        Self::styled(number, "Verse Number")
    }

    /// Set the writing system
    pub fn in_ws(mut self, ws: impl Into<String>) -> Self {
        self.ws = Some(ws.into());
        self
    }
}

/// Structural kind of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphKind {
    #[default]
    Normal,
    SectionHead,
    Intro,
    Title,
}

/// A paragraph with its runs and back translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Stable identity used for annotation and back translation matching
    pub id: ParaId,

    /// Structural kind
    #[serde(default)]
    pub kind: ParagraphKind,

    /// Paragraph style name (e.g. "Paragraph", "Line1", "Section Head")
    #[serde(default = "default_paragraph_style")]
    pub style: String,

    /// Vernacular content
    #[serde(default)]
    pub runs: Vec<Run>,

    /// Back translations keyed by writing system id
    #[serde(default)]
    pub translations: BTreeMap<String, Vec<Run>>,
}

fn default_paragraph_style() -> String {
    "Paragraph".to_string()
}

impl Paragraph {
    /// Create a paragraph of the given kind and style
    pub fn new(id: impl Into<String>, kind: ParagraphKind, style: impl Into<String>) -> Self {
        Self {
            id: ParaId::new(id),
            kind,
            style: style.into(),
            runs: Vec::new(),
            translations: BTreeMap::new(),
        }
    }

    /// Normal scripture paragraph using the "Paragraph" style
    pub fn scripture(id: impl Into<String>) -> Self {
        Self::new(id, ParagraphKind::Normal, "Paragraph")
    }

    /// Section heading paragraph
    pub fn section_head(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, ParagraphKind::SectionHead, "Section Head").with_run(Run::text(text))
    }

    /// Book title paragraph
    pub fn title(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, ParagraphKind::Title, "Title Main").with_run(Run::text(text))
    }

    /// Append a run
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    /// Append several runs
    pub fn with_runs(mut self, runs: impl IntoIterator<Item = Run>) -> Self {
        self.runs.extend(runs);
        self
    }

    /// Attach a back translation
    pub fn with_translation(mut self, ws: impl Into<String>, runs: Vec<Run>) -> Self {
        self.translations.insert(ws.into(), runs);
        self
    }

    /// Back translation for a writing system, if any
    pub fn translation(&self, ws: &str) -> Option<&[Run]> {
        translation_for(&self.translations, ws)
    }
}

/// Kind of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Scripture,
    Intro,
}

/// A section: heading paragraphs followed by content paragraphs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub kind: SectionKind,

    #[serde(default)]
    pub heading: Vec<Paragraph>,

    #[serde(default)]
    pub content: Vec<Paragraph>,
}

impl Section {
    /// Scripture section with one heading paragraph
    pub fn scripture(heading: Paragraph, content: Vec<Paragraph>) -> Self {
        Self {
            kind: SectionKind::Scripture,
            heading: vec![heading],
            content,
        }
    }

    /// Introduction section
    pub fn intro(heading: Vec<Paragraph>, content: Vec<Paragraph>) -> Self {
        Self {
            kind: SectionKind::Intro,
            heading,
            content,
        }
    }
}

/// Footnote or cross-reference body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    /// Note content (text with nested character styles)
    #[serde(default)]
    pub runs: Vec<Run>,

    /// Back translations of the note content
    #[serde(default)]
    pub translations: BTreeMap<String, Vec<Run>>,

    /// Caller symbol used with symbolic footnote markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Note {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Self::default()
        }
    }

    pub fn with_translation(mut self, ws: impl Into<String>, runs: Vec<Run>) -> Self {
        self.translations.insert(ws.into(), runs);
        self
    }

    /// Back translation of the note content, if any
    pub fn translation(&self, ws: &str) -> Option<&[Run]> {
        translation_for(&self.translations, ws)
    }
}

/// Translation stored under `ws`, tolerating case and padding in the key
fn translation_for<'a>(translations: &'a BTreeMap<String, Vec<Run>>, ws: &str) -> Option<&'a [Run]> {
    translations
        .get(ws)
        .or_else(|| {
            translations
                .iter()
                .find(|(key, _)| writing_systems_match(key, ws))
                .map(|(_, runs)| runs)
        })
        .map(Vec::as_slice)
}

/// Picture anchored in a paragraph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub file_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub layout_position: String,

    #[serde(default)]
    pub reference_range: String,

    #[serde(default)]
    pub copyright: String,

    #[serde(default)]
    pub caption: Vec<Run>,

    #[serde(default)]
    pub caption_translations: BTreeMap<String, Vec<Run>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl Picture {
    /// Back translation of the caption, if any
    pub fn caption_translation(&self, ws: &str) -> Option<&[Run]> {
        translation_for(&self.caption_translations, ws)
    }
}

/// Objects that runs can anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmbeddedObject {
    Footnote(Note),
    CrossReference(Note),
    Picture(Picture),
}

/// Classification of a reviewer annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    #[default]
    Note,
    CheckingError,
}

/// Reviewer annotation bound to a reference range and an owning paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,

    pub ref_start: ScriptureReference,

    pub ref_end: ScriptureReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub para_id: Option<ParaId>,

    pub content: String,

    #[serde(default)]
    pub kind: AnnotationKind,
}

impl Annotation {
    /// User note covering a single reference
    pub fn note(
        id: impl Into<String>,
        reference: ScriptureReference,
        para_id: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            ref_start: reference,
            ref_end: reference,
            para_id: para_id.map(ParaId::new),
            content: content.into(),
            kind: AnnotationKind::Note,
        }
    }
}

/// One book of scripture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Canonical book number
    pub number: u16,

    /// Three-letter book code
    pub code: String,

    /// Running header name (`\h`)
    #[serde(default)]
    pub name: String,

    /// Title paragraphs
    #[serde(default)]
    pub title: Vec<Paragraph>,

    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Backing store for embedded-object ids referenced by runs
    #[serde(default)]
    pub objects: BTreeMap<String, EmbeddedObject>,
}

impl Book {
    /// Create an empty book, taking code and name from the canon table when known
    pub fn new(number: u16) -> Self {
        let canon = crate::scripture::canon::by_number(number);
        Self {
            number,
            code: canon.map(|b| b.code.to_string()).unwrap_or_default(),
            name: canon.map(|b| b.name.to_string()).unwrap_or_default(),
            title: Vec::new(),
            sections: Vec::new(),
            annotations: Vec::new(),
            objects: BTreeMap::new(),
        }
    }

    /// Iterate every paragraph in document order (title, headings, content)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.title.iter().chain(
            self.sections
                .iter()
                .flat_map(|s| s.heading.iter().chain(s.content.iter())),
        )
    }
}

/// Source of books and embedded objects for an export
pub trait DocumentProvider {
    /// Books in export order
    fn books(&self) -> Vec<&Book>;

    /// Resolve an embedded-object id anchored in `book`
    fn object<'a>(&'a self, book: &'a Book, id: &str) -> Option<&'a EmbeddedObject> {
        book.objects.get(id)
    }
}

/// In-memory scripture document, loadable from JSON
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scripture {
    #[serde(default)]
    pub books: Vec<Book>,
}

impl Scripture {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let scripture: Scripture = serde_json::from_str(json)?;
        if scripture.books.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(scripture)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DocumentProvider for Scripture {
    fn books(&self) -> Vec<&Book> {
        self.books.iter().collect()
    }
}
