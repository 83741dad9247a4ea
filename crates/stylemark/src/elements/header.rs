//! ATX-style headers.

use std::ops::Range;

use regex::Captures;
use stylemark_core::{Attributes, Color, LevelTable, ParagraphStyle, StyledText, Typeface};

use super::element::{Element, Pattern};
use super::level::{apply_level_match, level_repetition, LevelElement};
use crate::Result;

/// Number of distinct header sizes.
const HEADER_LEVELS: usize = 6;

/// Header lines: `# Title` through `###### Title`.
///
/// The hashes and the spacing after them are removed. Level `n` is set in
/// a bold face `font_increase * (6 - n)` points larger than the base size.
#[derive(Debug, Clone)]
pub struct HeaderElement {
    max_level: usize,
    font_increase: f32,
    typeface: Typeface,
    foreground: Option<Color>,
    background: Option<Color>,
    paragraph: Option<ParagraphStyle>,
    levels: LevelTable,
    pattern: Pattern,
}

impl HeaderElement {
    /// Create a header element sized from the base typeface
    pub fn new(base: &Attributes) -> Self {
        let mut header = Self {
            max_level: 0,
            font_increase: 2.0,
            typeface: base.typeface.clone().unwrap_or_default(),
            foreground: base.foreground,
            background: base.background,
            paragraph: None,
            levels: LevelTable::new(Vec::new()),
            pattern: header_pattern(0),
        };
        header.levels = header.build_levels();
        header
    }

    /// Deepest header level recognised; zero means unbounded.
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self.pattern = header_pattern(max_level);
        self
    }

    /// Points added per level above the smallest header.
    pub fn with_font_increase(mut self, increase: f32) -> Self {
        self.font_increase = increase;
        self.levels = self.build_levels();
        self
    }

    /// Base face that header sizes are derived from.
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = typeface;
        self.levels = self.build_levels();
        self
    }

    /// Set the text color of every level
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self.levels = self.build_levels();
        self
    }

    /// Set the background color of every level
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self.levels = self.build_levels();
        self
    }

    /// Paragraph layout for header lines; none keeps the surrounding layout.
    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = Some(paragraph);
        self
    }

    /// Replace the derived per-level attributes, level 1 first.
    pub fn with_levels(mut self, levels: LevelTable) -> Self {
        self.levels = levels;
        self
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    fn build_levels(&self) -> LevelTable {
        let entries = (1..=HEADER_LEVELS)
            .map(|level| {
                let steps = (HEADER_LEVELS - level) as f32;
                let size = self.typeface.size + self.font_increase * steps;
                Attributes {
                    typeface: Some(self.typeface.with_size(size).bolded()),
                    foreground: self.foreground,
                    background: self.background,
                    ..Attributes::default()
                }
            })
            .collect();
        LevelTable::new(entries)
    }
}

fn header_pattern(max_level: usize) -> Pattern {
    Pattern::new(format!(
        r"(?m)^(#{})[ \t]+(.+)$",
        level_repetition(max_level)
    ))
}

impl LevelElement for HeaderElement {
    fn format_text(&self, text: &mut StyledText, marker: Range<usize>, _level: usize) {
        text.replace_range(marker, "");
    }

    fn add_full_attributes(&self, text: &mut StyledText, line: Range<usize>, _level: usize) {
        if let Some(paragraph) = &self.paragraph {
            text.add_attributes(line, &Attributes::new().with_paragraph(paragraph.clone()));
        }
    }

    fn add_attributes(&self, text: &mut StyledText, line: Range<usize>, level: usize) {
        text.add_attributes(line, self.levels.for_level(level));
    }
}

impl Element for HeaderElement {
    fn name(&self) -> &str {
        "header"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        apply_level_match(self, "header", text, captures)
    }
}
