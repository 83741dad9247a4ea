//! Whitespace and line-start cleanup run before any element.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use stylemark_core::StyledText;
use tracing::trace;

static LINE_ENDINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("line ending pattern is valid"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("blank line pattern is valid"));

static NBSP_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&nbsp;").expect("entity pattern is valid"));

static HARD_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"  \n").expect("hard break pattern is valid"));

/// One leading character that is not whitespace, a word character or a
/// list or header marker.
static STRAY_LINE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\s\w+\-*#]").expect("line start pattern is valid"));

/// As [`STRAY_LINE_START`], but quote, code, link, image, escape and
/// underline markup may also start a line.
static STRAY_LINE_START_KEEPING_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[^\s\w+\-*#>`\[!\\~]").expect("line start pattern is valid")
});

static CONTINUATION_INDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n {1,4}").expect("indent pattern is valid"));

/// Cleans up raw markup so element patterns see canonical input.
///
/// In order: line endings become `\n`, blank lines are dropped so line
/// breaks never repeat, `&nbsp;` becomes a space, two trailing spaces force
/// a paragraph break, a stray character at the start of a line is dropped,
/// and an indent of one to four spaces becomes exactly four. The four-space
/// indent is what marks list sub-items.
///
/// A line may start with whitespace, a word character, `+`, `-`, `*` or
/// `#`; anything else in that position is removed. With
/// [`with_markup_line_starts`](Self::with_markup_line_starts) the characters
/// `` > ` [ ! \ ~ `` are kept as well, so quotes, code, links and images
/// can open a line.
///
/// Edits go through [`StyledText::replace_range`], so attributes already on
/// the text follow it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    markup_line_starts: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep quote, code, link, image, escape and underline markup at the
    /// start of a line.
    pub fn with_markup_line_starts(mut self, keep: bool) -> Self {
        self.markup_line_starts = keep;
        self
    }

    pub fn markup_line_starts(&self) -> bool {
        self.markup_line_starts
    }

    pub fn normalize(&self, text: &mut StyledText) {
        let before = text.len();
        let line_start = if self.markup_line_starts {
            &STRAY_LINE_START_KEEPING_MARKUP
        } else {
            &STRAY_LINE_START
        };
        replace_all(text, &LINE_ENDINGS, "\n");
        replace_all(text, &BLANK_LINES, "\n");
        replace_all(text, &NBSP_ENTITY, " ");
        replace_all(text, &HARD_BREAK, "\n\n");
        replace_all(text, line_start, "");
        replace_all(text, &CONTINUATION_INDENT, "\n    ");
        trace!(before, after = text.len(), "normalized");
    }
}

fn replace_all(text: &mut StyledText, regex: &Regex, replacement: &str) {
    let ranges: Vec<Range<usize>> = regex.find_iter(text.as_str()).map(|m| m.range()).collect();
    text.edit_ranges(&ranges, |head, index| {
        head.replace_range(ranges[index].clone(), replacement);
    });
}
