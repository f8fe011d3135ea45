/*!
 * Markup emitter.
 *
 * Walks books → sections → paragraphs in a single forward pass and writes
 * either the Toolbox record dialect or the Paratext continuous dialect.
 *
 * The only look-back is the "rewind chapter" case: a chapter number opening
 * a paragraph is written before that paragraph's marker, and for the first
 * paragraph of a scripture section, before the section heading.
 */

use log::{debug, info};

use crate::app_config::ExportConfig;
use crate::errors::ExportError;
use crate::export::annotations::{remark_text, synthesized_reference, AnnotationPlacer};
use crate::export::back_translation::{
    build_merge_plan, segment_runs, BtPlacement, BtPlacementKind, ChapterVerseSegment, MergePlan,
    SegmentStart,
};
use crate::export::footnotes::{render_bt_note, render_note, NoteContext, NoteKind};
use crate::export::markers;
use crate::export::reference_tracker::{
    format_number_tag, ChapterEvent, ReferenceIssue, ReferenceTracker, VerseEvent,
};
use crate::export::run_classifier::{classify_runs, ClassifiedRun, RunRole, StyleClass, StyleMarker};
use crate::export::sink::LineSink;
use crate::export::styles::StyleLookup;
use crate::scripture::{
    Annotation, Book, DocumentProvider, EmbeddedObject, Paragraph, ParagraphKind,
    ScriptureReference, Section, SectionKind,
};

/// Where the emitter is within the current book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    BookStart,
    InTitle,
    InIntroSection,
    InScriptureSection,
    BookEnd,
}

/// Totals for one export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub books_exported: usize,
    pub lines_written: usize,
    pub annotations_placed: usize,
    pub reference_issues: Vec<ReferenceIssue>,
}

/// Paragraph context that decides note references and resume markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextContext {
    Title,
    Heading,
    Intro,
    Scripture,
}

/// Line under construction
#[derive(Debug, Clone)]
struct PendingLine {
    marker: Option<String>,
    text: String,
    keep_if_empty: bool,
    accepts_text: bool,
}

impl PendingLine {
    fn is_bare(&self, marker: &str) -> bool {
        self.marker.as_deref() == Some(marker) && self.text.trim().is_empty()
    }

    fn render(&self) -> Option<String> {
        let text = self.text.trim();
        match &self.marker {
            Some(marker) if text.is_empty() => self.keep_if_empty.then(|| markers::tag(marker)),
            Some(marker) => Some(format!("\\{} {}", marker, text)),
            None if text.is_empty() => None,
            None => Some(text.to_string()),
        }
    }
}

/// Buffers at most one open line in front of the sink
struct LineWriter<'s> {
    sink: &'s mut dyn LineSink,
    pending: Option<PendingLine>,
    lines: usize,
}

impl<'s> LineWriter<'s> {
    fn new(sink: &'s mut dyn LineSink) -> Self {
        Self {
            sink,
            pending: None,
            lines: 0,
        }
    }

    fn emit(&mut self, line: &str) -> Result<(), ExportError> {
        self.sink.write_line(line.trim_end())?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ExportError> {
        if let Some(line) = self.pending.take().and_then(|p| p.render()) {
            self.emit(&line)?;
        }
        Ok(())
    }

    /// Write a complete line after flushing the open one
    fn write(&mut self, line: &str) -> Result<(), ExportError> {
        self.flush()?;
        self.emit(line)
    }

    fn open(
        &mut self,
        marker: Option<&str>,
        keep_if_empty: bool,
        accepts_text: bool,
    ) -> Result<(), ExportError> {
        self.flush()?;
        self.pending = Some(PendingLine {
            marker: marker.map(str::to_string),
            text: String::new(),
            keep_if_empty,
            accepts_text,
        });
        Ok(())
    }

    fn accepts_text(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.accepts_text)
    }

    fn append(&mut self, text: &str) {
        if let Some(pending) = self.pending.as_mut() {
            pending.text.push_str(text);
        }
    }

    /// Detach the open line if it is `marker` with no text yet
    fn take_bare(&mut self, marker: &str) -> Option<PendingLine> {
        if self.pending.as_ref().is_some_and(|p| p.is_bare(marker)) {
            self.pending.take()
        } else {
            None
        }
    }

    fn restore(&mut self, line: PendingLine) -> Result<(), ExportError> {
        self.flush()?;
        self.pending = Some(line);
        Ok(())
    }
}

/// Per-book state borrowed from the document
pub struct BookPass<'d> {
    pub book: &'d Book,
    pub provider: &'d dyn DocumentProvider,
    pub placer: AnnotationPlacer<'d>,
}

impl<'d> BookPass<'d> {
    pub fn new(book: &'d Book, provider: &'d dyn DocumentProvider, notes_enabled: bool) -> Self {
        Self {
            book,
            provider,
            placer: AnnotationPlacer::for_book(book, notes_enabled),
        }
    }
}

/// Back translation of one paragraph in one writing system
struct BtStream<'d> {
    ws: String,
    runs: Vec<ClassifiedRun<'d>>,
    segments: Vec<ChapterVerseSegment>,
    plan: MergePlan,
}

/// Serializes documents into one of the two markup dialects
pub struct MarkupEmitter<'a> {
    config: &'a ExportConfig,
    styles: &'a dyn StyleLookup,
    out: LineWriter<'a>,
    tracker: ReferenceTracker,
    state: EmitterState,
    deferred_bt: Vec<String>,
    summary: ExportSummary,
}

impl<'a> MarkupEmitter<'a> {
    pub fn new(
        config: &'a ExportConfig,
        styles: &'a dyn StyleLookup,
        sink: &'a mut dyn LineSink,
    ) -> Self {
        Self {
            config,
            styles,
            out: LineWriter::new(sink),
            tracker: ReferenceTracker::new(config.convert_digits_to_western),
            state: EmitterState::BookStart,
            deferred_bt: Vec::new(),
            summary: ExportSummary::default(),
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Totals so far
    pub fn summary(&self) -> &ExportSummary {
        &self.summary
    }

    fn is_record(&self) -> bool {
        self.config.dialect.is_record()
    }

    fn scripture(&self) -> bool {
        self.config.export_scripture_domain
    }

    fn bt_writing_systems(&self) -> &'a [String] {
        if self.config.export_back_translation_domain {
            &self.config.requested_writing_systems
        } else {
            &[]
        }
    }

    fn ws_suffix(&self) -> bool {
        self.config.uses_writing_system_suffix()
    }

    /// Export every book the provider offers that passes the book filter
    pub fn export(&mut self, provider: &dyn DocumentProvider) -> Result<ExportSummary, ExportError> {
        self.config.validate()?;
        for book in provider.books() {
            if !self.config.includes_book(&book.code) {
                debug!("Skipping {} (not in book filter)", book.code);
                continue;
            }
            self.export_book(provider, book)?;
        }
        Ok(self.summary.clone())
    }

    /// Export a single book
    pub fn export_book<'d>(
        &mut self,
        provider: &'d dyn DocumentProvider,
        book: &'d Book,
    ) -> Result<(), ExportError> {
        info!("Exporting {} as {}", book.code, self.config.dialect.display_name());
        let lines_before = self.out.lines;
        self.tracker.start_book(&book.code, book.number);
        self.deferred_bt.clear();
        let mut pass = BookPass::new(book, provider, self.config.export_notes_domain);

        self.state = EmitterState::BookStart;
        self.write_header(&mut pass)?;

        for section in &book.sections {
            match section.kind {
                SectionKind::Intro => {
                    self.state = EmitterState::InIntroSection;
                    self.write_intro_section(&mut pass, section)?;
                }
                SectionKind::Scripture => {
                    self.state = EmitterState::InScriptureSection;
                    self.write_scripture_section(&mut pass, section)?;
                }
            }
        }

        self.out.flush()?;
        self.state = EmitterState::BookEnd;
        let remaining = pass.placer.take_remaining();
        self.write_annotations(book, &remaining, true)?;
        self.out.flush()?;

        self.summary.books_exported += 1;
        self.summary.lines_written = self.out.lines;
        self.summary.annotations_placed += pass.placer.placed_count();
        self.summary
            .reference_issues
            .extend(self.tracker.take_issues());
        info!(
            "Finished {}: {} lines",
            book.code,
            self.out.lines - lines_before
        );
        Ok(())
    }

    fn write_header(&mut self, pass: &mut BookPass<'_>) -> Result<(), ExportError> {
        let book = pass.book;
        if self.is_record() {
            self.out.write(&markers::record_line(&book.code, 0))?;
        }
        self.out.write(&markers::field(markers::ID, &book.code))?;
        if self.scripture() && !book.name.trim().is_empty() {
            self.out.write(&markers::field(markers::HEADER, &book.name))?;
        }

        self.state = EmitterState::InTitle;
        for paragraph in &book.title {
            self.write_text_paragraph(pass, paragraph, TextContext::Title)?;
        }
        Ok(())
    }

    fn write_intro_section(
        &mut self,
        pass: &mut BookPass<'_>,
        section: &Section,
    ) -> Result<(), ExportError> {
        for paragraph in section.heading.iter().chain(section.content.iter()) {
            self.write_text_paragraph(pass, paragraph, TextContext::Intro)?;
        }
        Ok(())
    }

    fn write_scripture_section<'d>(
        &mut self,
        pass: &mut BookPass<'d>,
        section: &'d Section,
    ) -> Result<(), ExportError> {
        let classified: Vec<Vec<ClassifiedRun<'d>>> = section
            .content
            .iter()
            .map(|p| classify_runs(&p.runs, pass.book, pass.provider, self.styles))
            .collect();

        // A chapter opening the section's first paragraph goes before the heading
        let rewound = match (section.content.first(), classified.first()) {
            (Some(first), Some(runs)) if first.kind == ParagraphKind::Normal => {
                match runs.first() {
                    Some(run) if run.role == RunRole::ChapterNumber => {
                        self.write_chapter(pass, &run.text, None)?;
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        };

        for heading in &section.heading {
            self.write_text_paragraph(pass, heading, TextContext::Heading)?;
        }

        for (i, (paragraph, runs)) in section.content.iter().zip(classified.iter()).enumerate() {
            match paragraph.kind {
                ParagraphKind::Normal => {
                    self.write_scripture_paragraph(pass, paragraph, runs, i == 0 && rewound)?
                }
                ParagraphKind::SectionHead | ParagraphKind::Title => {
                    self.write_text_paragraph(pass, paragraph, TextContext::Heading)?
                }
                ParagraphKind::Intro => {
                    self.write_text_paragraph(pass, paragraph, TextContext::Intro)?
                }
            }
        }
        Ok(())
    }

    // Chapters and verses

    fn hold_paragraph_marker(
        &mut self,
        para_marker: Option<&str>,
    ) -> Result<Option<PendingLine>, ExportError> {
        let held = para_marker.and_then(|m| self.out.take_bare(m));
        self.out.flush()?;
        Ok(held)
    }

    fn release_paragraph_marker(
        &mut self,
        held: Option<PendingLine>,
        para_marker: Option<&str>,
    ) -> Result<(), ExportError> {
        match (held, para_marker) {
            (Some(line), _) => self.out.restore(line),
            (None, Some(marker)) => self.open_paragraph_marker(marker),
            (None, None) => Ok(()),
        }
    }

    fn open_paragraph_marker(&mut self, marker: &str) -> Result<(), ExportError> {
        let accepts_text = !self.is_record();
        self.out.open(Some(marker), true, accepts_text)
    }

    fn write_chapter(
        &mut self,
        pass: &mut BookPass<'_>,
        text: &str,
        para_marker: Option<&str>,
    ) -> Result<(), ExportError> {
        let held = self.hold_paragraph_marker(para_marker)?;
        let event = self.tracker.enter_chapter(text);
        self.write_chapter_event(pass, &event)?;
        self.release_paragraph_marker(held, para_marker)
    }

    fn infer_chapter(
        &mut self,
        pass: &mut BookPass<'_>,
        para_marker: &str,
    ) -> Result<(), ExportError> {
        if self.tracker.has_chapter() {
            return Ok(());
        }
        let held = self.hold_paragraph_marker(Some(para_marker))?;
        if let Some(event) = self.tracker.infer_chapter_for_verse() {
            self.write_chapter_event(pass, &event)?;
        }
        self.release_paragraph_marker(held, Some(para_marker))
    }

    fn write_chapter_event(
        &mut self,
        pass: &mut BookPass<'_>,
        event: &ChapterEvent,
    ) -> Result<(), ExportError> {
        if event.numeric && !event.invalid {
            let boundary = ScriptureReference::new(pass.book.number, event.number, 0);
            let overdue = pass.placer.take_overdue(&boundary);
            self.write_annotations(pass.book, &overdue, true)?;
        }
        if self.is_record() {
            if let Some(chapter) = self.tracker.record_chapter_field(event) {
                self.out.write(&markers::record_line(&pass.book.code, chapter))?;
            }
        }
        if !event.suppressed {
            self.out.write(&markers::field(markers::CHAPTER, &event.tag))?;
        }
        Ok(())
    }

    fn write_verse(
        &mut self,
        pass: &mut BookPass<'_>,
        text: &str,
        para_marker: &str,
    ) -> Result<(), ExportError> {
        self.infer_chapter(pass, para_marker)?;
        self.out.flush()?;
        let event = self.tracker.enter_verse(text);
        self.write_verse_event(pass, &event)
    }

    fn write_verse_event(
        &mut self,
        pass: &mut BookPass<'_>,
        event: &VerseEvent,
    ) -> Result<(), ExportError> {
        if event.numeric && !event.number.invalid_syntax {
            if let Some(chapter) = self.tracker.last_emitted_chapter() {
                let boundary = ScriptureReference::new(
                    pass.book.number,
                    chapter,
                    event.number.start,
                );
                let overdue = pass.placer.take_overdue(&boundary);
                self.write_annotations(pass.book, &overdue, true)?;
            }
        }

        if self.is_record() {
            if let Some(chapter_verse) = self.tracker.verse_reference_field(event) {
                self.out
                    .write(&markers::verse_ref_line(&pass.book.code, &chapter_verse))?;
            }
            self.out.write(&markers::field(markers::VERSE, &event.tag))?;
        } else {
            let marker = format!("{} {}", markers::VERSE, event.tag);
            self.out.open(Some(&marker), true, true)?;
        }
        Ok(())
    }

    /// Make sure a chapter and verse are current before scripture content
    fn ensure_content_reference(
        &mut self,
        pass: &mut BookPass<'_>,
        para_marker: &str,
    ) -> Result<(), ExportError> {
        if self.tracker.has_chapter() && self.tracker.has_verse() {
            return Ok(());
        }
        self.infer_chapter(pass, para_marker)?;
        if !self.tracker.has_verse() {
            self.out.flush()?;
            if let Some(event) = self.tracker.infer_for_content().verse {
                self.write_verse_event(pass, &event)?;
            }
        }
        Ok(())
    }

    // Text

    fn append_text(&mut self, text: &str, resume_marker: &str) -> Result<(), ExportError> {
        if !self.out.accepts_text() {
            if self.is_record() {
                self.out.open(Some(resume_marker), false, true)?;
            } else {
                self.out.open(None, false, true)?;
            }
        }
        self.out.append(text);
        Ok(())
    }

    fn write_style(
        &mut self,
        style: &StyleMarker,
        text: &str,
        resume_marker: &str,
    ) -> Result<(), ExportError> {
        if self.is_record() {
            self.out.flush()?;
            if !text.trim().is_empty() {
                self.out.write(&markers::field(&style.marker, text))?;
            }
            return Ok(());
        }
        let inline = markers::inline_style_spaced(&style.marker, text);
        self.append_text(&inline, resume_marker)
    }

    /// Title text at another level goes on its own line
    fn write_title_level(&mut self, marker: &str, text: &str) -> Result<(), ExportError> {
        self.out.open(Some(marker), false, true)?;
        self.out.append(text);
        self.out.flush()
    }

    /// Write the vernacular runs of one chapter/verse segment
    pub fn write_vern_segment(
        &mut self,
        pass: &mut BookPass<'_>,
        runs: &[ClassifiedRun<'_>],
        para_marker: &str,
    ) -> Result<(), ExportError> {
        for run in runs {
            match &run.role {
                RunRole::ChapterNumber => {
                    self.write_chapter(pass, &run.text, Some(para_marker))?;
                }
                RunRole::VerseNumber | RunRole::VerseBridge => {
                    self.write_verse(pass, &run.text, para_marker)?;
                }
                RunRole::PlainText => {
                    self.ensure_content_reference(pass, para_marker)?;
                    if self.scripture() {
                        self.append_text(&run.text, markers::VERSE_TEXT)?;
                    }
                }
                RunRole::CharacterStyle(style) => {
                    self.ensure_content_reference(pass, para_marker)?;
                    if self.scripture() {
                        self.write_style(style, &run.text, markers::VERSE_TEXT)?;
                    }
                }
                RunRole::FootnoteAnchor | RunRole::CrossRefAnchor => {
                    self.ensure_content_reference(pass, para_marker)?;
                    self.write_note(pass, run, TextContext::Scripture, markers::VERSE_TEXT)?;
                }
                RunRole::PictureAnchor => {
                    self.ensure_content_reference(pass, para_marker)?;
                    self.write_picture(pass, run)?;
                }
            }
        }
        Ok(())
    }

    fn bt_streams<'d>(
        &self,
        pass: &BookPass<'d>,
        paragraph: &'d Paragraph,
        vern_segments: &[ChapterVerseSegment],
    ) -> Vec<BtStream<'d>> {
        let chapter_at_start = self.tracker.last_emitted_chapter().unwrap_or(0);
        self.bt_writing_systems()
            .iter()
            .filter_map(|ws| {
                let runs = classify_runs(paragraph.translation(ws)?, pass.book, pass.provider, self.styles);
                let segments = segment_runs(&runs);
                let plan = build_merge_plan(vern_segments, &segments, chapter_at_start);
                Some(BtStream {
                    ws: ws.clone(),
                    runs,
                    segments,
                    plan,
                })
            })
            .collect()
    }

    fn write_scripture_paragraph<'d>(
        &mut self,
        pass: &mut BookPass<'d>,
        paragraph: &'d Paragraph,
        runs: &[ClassifiedRun<'d>],
        chapter_already_written: bool,
    ) -> Result<(), ExportError> {
        let para_marker = self.styles.paragraph_marker(&paragraph.style, paragraph.kind);
        let segments = segment_runs(runs);
        let streams = self.bt_streams(pass, paragraph, &segments);

        self.open_paragraph_marker(&para_marker)?;

        let mut first_run = 0;
        if segments.first().is_some_and(|s| s.start == SegmentStart::Chapter) {
            if !chapter_already_written {
                self.write_chapter(pass, &runs[0].text, Some(&para_marker))?;
            }
            first_run = 1;
        }

        for stream in &streams {
            for placement in &stream.plan.leading {
                self.write_bt_segment(stream, *placement)?;
            }
        }

        for (index, segment) in segments.iter().enumerate() {
            let range = segment.runs.start.max(first_run)..segment.runs.end;
            self.write_vern_segment(pass, &runs[range], &para_marker)?;
            self.finish_segment(pass, index, &streams)?;
        }

        self.out.flush()?;
        self.flush_deferred_bt()?;
        let owned = pass.placer.take_for_paragraph(&paragraph.id);
        self.write_annotations(pass.book, &owned, true)
    }

    fn finish_segment(
        &mut self,
        pass: &mut BookPass<'_>,
        index: usize,
        streams: &[BtStream<'_>],
    ) -> Result<(), ExportError> {
        self.out.flush()?;
        for stream in streams {
            for placement in stream.plan.after_segment(index) {
                self.write_bt_segment(stream, *placement)?;
            }
        }
        self.flush_deferred_bt()?;

        if let Some(reference) = self.tracker.current_reference() {
            if reference.chapter > 0 && reference.verse > 0 {
                let notes = pass.placer.take_for_reference(&reference);
                self.write_annotations(pass.book, &notes, false)?;
            }
        }
        Ok(())
    }

    // Back translation

    fn write_bt_segment(
        &mut self,
        stream: &BtStream<'_>,
        placement: BtPlacement,
    ) -> Result<(), ExportError> {
        let Some(segment) = stream.segments.get(placement.segment) else {
            return Ok(());
        };
        let content: Vec<&ClassifiedRun<'_>> = stream.runs[segment.runs.clone()]
            .iter()
            .filter(|r| !r.role.is_reference() && !r.role.is_anchor())
            .collect();
        if content.iter().all(|r| r.text.trim().is_empty()) {
            return Ok(());
        }

        if placement.kind == BtPlacementKind::Added {
            let marker = markers::bt_verse_added_marker(&stream.ws, self.ws_suffix());
            let number = format_number_tag(&segment.number, self.config.convert_digits_to_western);
            self.out.write(&markers::field(&marker, &number))?;
        }
        self.write_bt_runs(&content, markers::VERSE_TEXT, &stream.ws)
    }

    fn write_bt_runs(
        &mut self,
        runs: &[&ClassifiedRun<'_>],
        base: &str,
        ws: &str,
    ) -> Result<(), ExportError> {
        let suffix = self.ws_suffix();
        let base_marker = markers::bt_marker(base, ws, suffix);
        self.out.open(Some(&base_marker), false, true)?;
        for run in runs {
            match &run.role {
                RunRole::CharacterStyle(style) => match style.class {
                    StyleClass::TitleLevel(_) => {
                        self.write_title_level(&markers::bt_marker(&style.marker, ws, suffix), &run.text)?;
                        self.out.open(Some(&base_marker), false, true)?;
                    }
                    _ if self.is_record() => {
                        let bt_style = StyleMarker {
                            marker: markers::bt_marker(&style.marker, ws, suffix),
                            class: style.class,
                        };
                        self.write_style(&bt_style, &run.text, &base_marker)?;
                    }
                    _ => self.write_style(style, &run.text, &base_marker)?,
                },
                RunRole::FootnoteAnchor | RunRole::CrossRefAnchor | RunRole::PictureAnchor => {}
                RunRole::PlainText
                | RunRole::ChapterNumber
                | RunRole::VerseNumber
                | RunRole::VerseBridge => self.append_text(&run.text, &base_marker)?,
            }
        }
        self.out.flush()
    }

    fn flush_deferred_bt(&mut self) -> Result<(), ExportError> {
        for line in std::mem::take(&mut self.deferred_bt) {
            self.out.write(&line)?;
        }
        Ok(())
    }

    // Titles, headings and introductions

    fn write_text_paragraph(
        &mut self,
        pass: &mut BookPass<'_>,
        paragraph: &Paragraph,
        context: TextContext,
    ) -> Result<(), ExportError> {
        let para_marker = self.styles.paragraph_marker(&paragraph.style, paragraph.kind);
        let runs = classify_runs(&paragraph.runs, pass.book, pass.provider, self.styles);

        if self.scripture() {
            self.out.open(Some(&para_marker), true, true)?;
            for run in &runs {
                match &run.role {
                    RunRole::CharacterStyle(style) => match style.class {
                        StyleClass::TitleLevel(_) if context == TextContext::Title => {
                            self.out.take_bare(&para_marker);
                            self.write_title_level(&style.marker, &run.text)?;
                            self.out.open(Some(&para_marker), false, true)?;
                        }
                        _ => self.write_style(style, &run.text, &para_marker)?,
                    },
                    RunRole::FootnoteAnchor | RunRole::CrossRefAnchor => {
                        self.write_note(pass, run, context, &para_marker)?;
                    }
                    RunRole::PictureAnchor => self.write_picture(pass, run)?,
                    RunRole::PlainText
                    | RunRole::ChapterNumber
                    | RunRole::VerseNumber
                    | RunRole::VerseBridge => self.append_text(&run.text, &para_marker)?,
                }
            }
            self.out.flush()?;
        } else if context != TextContext::Title {
            self.out.write(&markers::tag(&para_marker))?;
        }

        for ws in self.bt_writing_systems() {
            if let Some(translation) = paragraph.translation(ws) {
                let bt_runs = classify_runs(translation, pass.book, pass.provider, self.styles);
                let refs: Vec<&ClassifiedRun<'_>> = bt_runs.iter().collect();
                if refs.iter().any(|r| !r.text.trim().is_empty()) {
                    self.write_bt_runs(&refs, &para_marker, ws)?;
                }
            }
        }
        self.flush_deferred_bt()?;

        let owned = pass.placer.take_for_paragraph(&paragraph.id);
        self.write_annotations(pass.book, &owned, true)
    }

    // Embedded objects

    fn write_note(
        &mut self,
        pass: &mut BookPass<'_>,
        run: &ClassifiedRun<'_>,
        context: TextContext,
        resume_marker: &str,
    ) -> Result<(), ExportError> {
        let (kind, note) = match run.object {
            Some(EmbeddedObject::Footnote(note)) => (NoteKind::Footnote, note),
            Some(EmbeddedObject::CrossReference(note)) => (NoteKind::CrossReference, note),
            _ => return Ok(()),
        };

        if self.scripture() {
            let runs = classify_runs(&note.runs, pass.book, pass.provider, self.styles);
            let reference = if self.config.display_footnote_reference
                && context == TextContext::Scripture
                && self.tracker.current_chapter_valid()
            {
                self.tracker.display_reference()
            } else {
                None
            };
            let ctx = NoteContext {
                dialect: self.config.dialect,
                marker_style: self.config.footnote_marker_style,
                symbol: note.symbol.as_deref(),
                reference: reference.as_deref(),
            };
            let rendered = render_note(kind, &runs, &ctx);
            if self.is_record() {
                self.out.write(&rendered)?;
            } else {
                self.append_text(&rendered, resume_marker)?;
            }
        }

        for ws in self.bt_writing_systems() {
            let Some(translation) = note.translation(ws) else {
                continue;
            };
            let runs = classify_runs(translation, pass.book, pass.provider, self.styles);
            if let Some(line) = render_bt_note(kind, &runs, ws, self.ws_suffix()) {
                if self.is_record() {
                    self.out.write(&line)?;
                } else {
                    self.deferred_bt.push(line);
                }
            }
        }
        Ok(())
    }

    fn write_picture(
        &mut self,
        pass: &mut BookPass<'_>,
        run: &ClassifiedRun<'_>,
    ) -> Result<(), ExportError> {
        let Some(EmbeddedObject::Picture(picture)) = run.object else {
            return Ok(());
        };
        self.out.flush()?;

        if self.scripture() {
            let fields = [
                (markers::FIG_DESCRIPTION, &picture.description),
                (markers::FIG_CATALOG, &picture.file_name),
                (markers::FIG_LAYOUT_POSITION, &picture.layout_position),
                (markers::FIG_REFERENCE_RANGE, &picture.reference_range),
                (markers::FIG_COPYRIGHT, &picture.copyright),
            ];
            for (marker, value) in fields {
                if !value.trim().is_empty() {
                    self.out.write(&markers::field(marker, value))?;
                }
            }

            let caption = classify_runs(&picture.caption, pass.book, pass.provider, self.styles);
            if caption.iter().any(|r| !r.text.trim().is_empty()) {
                self.out.open(Some(markers::FIG_CAPTION), false, true)?;
                for caption_run in &caption {
                    match &caption_run.role {
                        RunRole::CharacterStyle(style) => {
                            self.write_style(style, &caption_run.text, markers::FIG_CAPTION)?
                        }
                        RunRole::FootnoteAnchor
                        | RunRole::CrossRefAnchor
                        | RunRole::PictureAnchor => {}
                        _ => self.append_text(&caption_run.text, markers::FIG_CAPTION)?,
                    }
                }
                self.out.flush()?;
            }

            if let Some(scale) = picture.scale {
                self.out
                    .write(&markers::field(markers::FIG_SCALE, &scale.to_string()))?;
            }
        }

        for ws in self.bt_writing_systems() {
            let Some(translation) = picture.caption_translation(ws) else {
                continue;
            };
            let text: String = translation.iter().map(|r| r.text.as_str()).collect();
            if !text.trim().is_empty() {
                let marker = markers::bt_marker(markers::FIG_CAPTION, ws, self.ws_suffix());
                self.out.write(&markers::field(&marker, &text))?;
            }
        }
        Ok(())
    }

    // Annotations

    fn write_annotations(
        &mut self,
        book: &Book,
        annotations: &[&Annotation],
        synthesize: bool,
    ) -> Result<(), ExportError> {
        for annotation in annotations {
            let text = remark_text(annotation);
            let reference = if synthesize {
                synthesized_reference(annotation)
            } else {
                None
            };
            match reference {
                Some(reference) if self.is_record() => {
                    self.out.write(&markers::verse_ref_line(
                        &book.code,
                        &reference.chapter_verse_text(),
                    ))?;
                    self.out.write(&markers::field(markers::REMARK, &text))?;
                }
                Some(reference) => {
                    let located = format!("{} {} {}", book.code, reference.chapter_verse_text(), text);
                    self.out.write(&markers::field(markers::REMARK, &located))?;
                }
                None => self.out.write(&markers::field(markers::REMARK, &text))?,
            }
        }
        Ok(())
    }
}
