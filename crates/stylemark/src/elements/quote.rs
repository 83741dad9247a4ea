//! Block quotes.

use std::ops::Range;

use regex::Captures;
use stylemark_core::{Attributes, Color, LevelTable, ParagraphStyle, StyledText, Typeface};

use super::element::{Element, Pattern};
use super::level::{apply_level_match, level_repetition, LevelElement};
use super::text_style;
use crate::Result;

/// Quoted lines: `> text`, `>> nested`.
///
/// The `>` run becomes the indicator, indented two spaces per level below
/// the first.
#[derive(Debug, Clone)]
pub struct QuoteElement {
    max_level: usize,
    indicator: String,
    separator: String,
    levels: LevelTable,
    paragraph: Option<ParagraphStyle>,
    pattern: Pattern,
}

impl QuoteElement {
    /// Create a quote element styled from the base attributes
    pub fn new(base: &Attributes) -> Self {
        let mut style = text_style(base);
        style.typeface = Some(base.typeface.clone().unwrap_or_default().italicized());
        style.foreground = Some(Color::GRAY);
        Self {
            max_level: 0,
            indicator: "│".to_string(),
            separator: " ".to_string(),
            levels: LevelTable::uniform(style),
            paragraph: None,
            pattern: quote_pattern(0),
        }
    }

    /// Deepest quote level recognised; zero means unbounded.
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self.pattern = quote_pattern(max_level);
        self
    }

    /// Set the glyph that replaces the `>` run
    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = indicator.into();
        self
    }

    /// Set the text between the glyph and the quote
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the typeface of every level
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.levels = self
            .levels
            .edit_entries(|entry| entry.typeface = Some(typeface.clone()));
        self
    }

    /// Set the text color of every level
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.levels = self
            .levels
            .edit_entries(|entry| entry.foreground = Some(color));
        self
    }

    /// Set the background color of every level
    pub fn with_background(mut self, color: Color) -> Self {
        self.levels = self
            .levels
            .edit_entries(|entry| entry.background = Some(color));
        self
    }

    /// Set the paragraph layout of quoted lines
    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = Some(paragraph);
        self
    }

    /// Per-level attributes, level 1 first.
    pub fn with_levels(mut self, levels: LevelTable) -> Self {
        self.levels = levels;
        self
    }

    /// Deepest quote level recognised
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// Per-level attributes
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }
}

fn quote_pattern(max_level: usize) -> Pattern {
    Pattern::new(format!(
        r"(?m)^[ \t]*(>{})[ \t]*(.+)$",
        level_repetition(max_level)
    ))
}

impl LevelElement for QuoteElement {
    fn format_text(&self, text: &mut StyledText, marker: Range<usize>, level: usize) {
        let indent = "  ".repeat(level.saturating_sub(1));
        text.replace_range(
            marker,
            &format!("{indent}{}{}", self.indicator, self.separator),
        );
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

impl Element for QuoteElement {
    fn name(&self) -> &str {
        "quote"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        apply_level_match(self, "quote", text, captures)
    }
}
