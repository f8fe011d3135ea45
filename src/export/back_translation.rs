/*!
 * Back translation alignment.
 *
 * Vernacular and back translation runs of a paragraph are cut into
 * chapter/verse segments, then paired by `(chapter, verse start, verse end)`.
 * Back translation segments without a vernacular partner are still emitted,
 * marked as "verse added", after the closest preceding vernacular verse.
 */

use std::ops::Range;

use crate::export::reference_tracker::{chapter_num_string_to_int, parse_verse_num};
use crate::export::run_classifier::{ClassifiedRun, RunRole};

/// What opened a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStart {
    /// Content before any chapter or verse number in the paragraph
    Headless,
    Chapter,
    Verse,
}

/// A run range introduced by a chapter or verse number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterVerseSegment {
    pub start: SegmentStart,
    /// Chapter or verse number text; empty for the headless segment
    pub number: String,
    /// Classified run indices covered, including the number run itself
    pub runs: Range<usize>,
}

/// Cut classified runs into chapter/verse segments
pub fn segment_runs(classified: &[ClassifiedRun<'_>]) -> Vec<ChapterVerseSegment> {
    let mut segments: Vec<ChapterVerseSegment> = Vec::new();
    for (i, run) in classified.iter().enumerate() {
        let start = match run.role {
            RunRole::ChapterNumber => Some(SegmentStart::Chapter),
            RunRole::VerseNumber | RunRole::VerseBridge => Some(SegmentStart::Verse),
            _ => None,
        };
        match start {
            Some(start) => {
                if let Some(last) = segments.last_mut() {
                    last.runs.end = i;
                }
                segments.push(ChapterVerseSegment {
                    start,
                    number: run.text.clone(),
                    runs: i..i + 1,
                });
            }
            None if segments.is_empty() => segments.push(ChapterVerseSegment {
                start: SegmentStart::Headless,
                number: String::new(),
                runs: i..i + 1,
            }),
            None => {}
        }
    }
    if let Some(last) = segments.last_mut() {
        last.runs.end = classified.len();
    }
    segments
}

/// Alignment key of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SegmentKey {
    start: SegmentStart,
    chapter: i32,
    verse: i32,
    verse_end: i32,
}

impl SegmentKey {
    fn position(&self) -> (i32, i32) {
        (self.chapter, self.verse)
    }
}

fn segment_keys(segments: &[ChapterVerseSegment], chapter_at_start: i32) -> Vec<SegmentKey> {
    let mut chapter = chapter_at_start;
    segments
        .iter()
        .map(|segment| match segment.start {
            SegmentStart::Headless => SegmentKey {
                start: SegmentStart::Headless,
                chapter,
                verse: 0,
                verse_end: 0,
            },
            SegmentStart::Chapter => {
                chapter = chapter_num_string_to_int(&segment.number).0;
                SegmentKey {
                    start: SegmentStart::Chapter,
                    chapter,
                    verse: 0,
                    verse_end: 0,
                }
            }
            SegmentStart::Verse => {
                let verse = parse_verse_num(&segment.number);
                SegmentKey {
                    start: SegmentStart::Verse,
                    chapter,
                    verse: verse.start,
                    verse_end: verse.end,
                }
            }
        })
        .collect()
}

/// How a back translation segment is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtPlacementKind {
    /// Follows its vernacular partner
    Paired,
    /// No vernacular partner; written with the verse-added marker
    Added,
    /// Headless text without a vernacular partner; written without a marker
    Unmarked,
}

/// One back translation segment scheduled for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtPlacement {
    /// Index into the back translation segments
    pub segment: usize,
    pub kind: BtPlacementKind,
}

/// Where each back translation segment of one writing system goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Written at paragraph start, before any vernacular segment
    pub leading: Vec<BtPlacement>,
    /// Written after vernacular segment `i`
    pub after: Vec<Vec<BtPlacement>>,
}

impl MergePlan {
    /// Placements following vernacular segment `index`
    pub fn after_segment(&self, index: usize) -> &[BtPlacement] {
        self.after.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn find_partner(
    vern: &SegmentKey,
    bt_keys: &[SegmentKey],
    consumed: &[bool],
) -> Option<usize> {
    let free = |j: &usize| !consumed[*j];
    let candidates = (0..bt_keys.len()).filter(free);

    match vern.start {
        SegmentStart::Headless => candidates
            .into_iter()
            .find(|&j| bt_keys[j].start == SegmentStart::Headless),
        SegmentStart::Chapter => candidates.into_iter().find(|&j| {
            bt_keys[j].start == SegmentStart::Chapter && bt_keys[j].chapter == vern.chapter
        }),
        SegmentStart::Verse => {
            let verse_candidates: Vec<usize> = candidates
                .filter(|&j| {
                    let bt = &bt_keys[j];
                    bt.start == SegmentStart::Verse
                        && bt.chapter == vern.chapter
                        && bt.verse == vern.verse
                })
                .collect();
            // Exact bridge match first, then a back translation bridge covering the vernacular verse
            verse_candidates
                .iter()
                .copied()
                .find(|&j| bt_keys[j].verse_end == vern.verse_end)
                .or_else(|| {
                    verse_candidates
                        .iter()
                        .copied()
                        .find(|&j| bt_keys[j].verse_end >= vern.verse_end)
                })
        }
    }
}

/// Pair back translation segments of one writing system with vernacular segments.
///
/// `chapter_at_start` is the chapter current when the paragraph begins (0 when
/// none); chapter segments inside the paragraph update it for later keys.
pub fn build_merge_plan(
    vern_segments: &[ChapterVerseSegment],
    bt_segments: &[ChapterVerseSegment],
    chapter_at_start: i32,
) -> MergePlan {
    let vern_keys = segment_keys(vern_segments, chapter_at_start);
    let bt_keys = segment_keys(bt_segments, chapter_at_start);

    let mut plan = MergePlan {
        leading: Vec::new(),
        after: vec![Vec::new(); vern_segments.len()],
    };
    let mut consumed = vec![false; bt_segments.len()];

    for (i, vern) in vern_keys.iter().enumerate() {
        if let Some(j) = find_partner(vern, &bt_keys, &consumed) {
            consumed[j] = true;
            plan.after[i].push(BtPlacement {
                segment: j,
                kind: BtPlacementKind::Paired,
            });
        }
    }

    for (j, bt) in bt_keys.iter().enumerate() {
        if consumed[j] {
            continue;
        }
        if bt.start == SegmentStart::Headless {
            plan.leading.push(BtPlacement {
                segment: j,
                kind: BtPlacementKind::Unmarked,
            });
            continue;
        }

        let kind = match bt.start {
            SegmentStart::Verse => BtPlacementKind::Added,
            _ => BtPlacementKind::Unmarked,
        };
        let anchor = vern_keys
            .iter()
            .rposition(|v| v.start != SegmentStart::Headless && v.position() <= bt.position());
        let placement = BtPlacement { segment: j, kind };
        match anchor {
            Some(i) => plan.after[i].push(placement),
            None => plan.leading.push(placement),
        }
    }

    plan
}
