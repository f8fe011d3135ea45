/*!
 * Token spellings shared by both dialects.
 *
 * Every backslash marker the exporter writes is built here so the two
 * dialects cannot drift apart on spelling.
 */

pub const RECORD: &str = "rcrd";
pub const ID: &str = "id";
pub const HEADER: &str = "h";
pub const TITLE: &str = "mt";
pub const CHAPTER: &str = "c";
pub const VERSE_REF: &str = "vref";
pub const VERSE: &str = "v";
pub const VERSE_TEXT: &str = "vt";
pub const REMARK: &str = "rem";

pub const FOOTNOTE: &str = "f";
pub const FOOTNOTE_REFERENCE: &str = "fr";
pub const FOOTNOTE_TEXT: &str = "ft";
pub const FOOTNOTE_ALTERNATE: &str = "fq";
pub const FOOTNOTE_VERSE: &str = "fv";
pub const CROSS_REFERENCE: &str = "x";
pub const CROSS_REFERENCE_ORIGIN: &str = "xo";
pub const CROSS_REFERENCE_TEXT: &str = "xt";
pub const CROSS_REFERENCE_ALTERNATE: &str = "xq";
pub const CROSS_REFERENCE_CALLER: &str = "-";

pub const BT_PREFIX: &str = "bt";
pub const BT_VERSE_ADDED: &str = "btv";

pub const FIG_DESCRIPTION: &str = "figdesc";
pub const FIG_CATALOG: &str = "figcat";
pub const FIG_LAYOUT_POSITION: &str = "figlaypos";
pub const FIG_REFERENCE_RANGE: &str = "figrefrng";
pub const FIG_COPYRIGHT: &str = "figcopy";
pub const FIG_CAPTION: &str = "figcap";
pub const FIG_SCALE: &str = "figscale";

/// `\marker`
pub fn tag(marker: &str) -> String {
    format!("\\{}", marker)
}

/// `\marker*`
pub fn close_tag(marker: &str) -> String {
    format!("\\{}*", marker)
}

/// `\marker text`, or just `\marker` when the text is empty
pub fn field(marker: &str, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        tag(marker)
    } else {
        format!("\\{} {}", marker, text)
    }
}

/// `\marker text\marker*`
pub fn inline_style(marker: &str, text: &str) -> String {
    format!("\\{} {}\\{}*", marker, text, marker)
}

/// Inline style with edge whitespace kept outside the markers.
///
/// Whitespace-only text is returned unstyled.
pub fn inline_style_spaced(marker: &str, text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];
    format!("{}{}{}", leading, inline_style(marker, trimmed), trailing)
}

/// Back translation marker for `base` in writing system `ws`
///
/// `vt` becomes `btvt`, or `btvt_en` when several writing systems are exported.
pub fn bt_marker(base: &str, ws: &str, with_suffix: bool) -> String {
    if with_suffix {
        format!("{}{}_{}", BT_PREFIX, base, ws)
    } else {
        format!("{}{}", BT_PREFIX, base)
    }
}

/// Verse-added marker for a writing system
pub fn bt_verse_added_marker(ws: &str, with_suffix: bool) -> String {
    if with_suffix {
        format!("{}_{}", BT_VERSE_ADDED, ws)
    } else {
        BT_VERSE_ADDED.to_string()
    }
}

/// `\rcrd BOOK n`
pub fn record_line(book_code: &str, chapter: i32) -> String {
    format!("\\{} {} {}", RECORD, book_code, chapter)
}

/// `\vref BOOK.c:v[-e]`
pub fn verse_ref_line(book_code: &str, chapter_verse: &str) -> String {
    format!("\\{} {}.{}", VERSE_REF, book_code, chapter_verse)
}
