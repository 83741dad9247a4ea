//! Bulleted lists.

use std::ops::Range;

use regex::Captures;
use stylemark_core::{Attributes, Color, LevelTable, ParagraphStyle, StyledText, Typeface};

use super::element::{Element, Pattern};
use super::level::{apply_level_match, level_repetition, LevelElement};
use super::text_style;
use crate::Result;

/// Indent that marks a list line as a sub-item.
const CONTINUATION_INDENT: &str = "    ";

/// Bulleted list lines: `- item`, `* item`, `+ item`.
///
/// The marker run is replaced by the indicator glyph, or the sub-item glyph
/// when the marker sits right after a four-space continuation indent. A run
/// of repeated markers (`-- item`) selects a deeper level of the attribute
/// table.
#[derive(Debug, Clone)]
pub struct ListElement {
    max_level: usize,
    indicator: String,
    sub_indicator: String,
    separator: String,
    levels: LevelTable,
    paragraph: ParagraphStyle,
    pattern: Pattern,
}

impl ListElement {
    /// Create a list element styled from the base attributes
    pub fn new(base: &Attributes) -> Self {
        let max_level = 0;
        Self {
            max_level,
            indicator: "•".to_string(),
            sub_indicator: "◦".to_string(),
            separator: " ".to_string(),
            levels: LevelTable::uniform(text_style(base)),
            paragraph: base.paragraph.clone().unwrap_or_default(),
            pattern: list_pattern(max_level),
        }
    }

    /// Deepest marker run treated as a list; zero means unbounded.
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self.pattern = list_pattern(max_level);
        self
    }

    /// Set the glyph that replaces a top-level marker
    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = indicator.into();
        self
    }

    /// Set the glyph for items under a four-space indent
    pub fn with_sub_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.sub_indicator = indicator.into();
        self
    }

    /// Set the text between the glyph and the item
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

    /// Set the paragraph layout of list lines
    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = paragraph;
        self
    }

    /// Per-level attributes, level 1 first.
    pub fn with_levels(mut self, levels: LevelTable) -> Self {
        self.levels = levels;
        self
    }

    /// Deepest marker run treated as a list
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// The top-level glyph
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// The sub-item glyph
    pub fn sub_indicator(&self) -> &str {
        &self.sub_indicator
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Per-level attributes
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn paragraph(&self) -> &ParagraphStyle {
        &self.paragraph
    }
}

fn list_pattern(max_level: usize) -> Pattern {
    Pattern::new(format!(
        r"(?m)^[ \t]*([*+\-]{})[ \t]+(.+)$",
        level_repetition(max_level)
    ))
}

impl LevelElement for ListElement {
    fn format_text(&self, text: &mut StyledText, marker: Range<usize>, _level: usize) {
        let nested = marker
            .start
            .checked_sub(CONTINUATION_INDENT.len())
            .and_then(|start| text.slice(start..marker.start))
            == Some(CONTINUATION_INDENT);
        let indicator = if nested {
            &self.sub_indicator
        } else {
            &self.indicator
        };
        text.replace_range(marker, &format!("{indicator}{}", self.separator));
    }

    fn add_full_attributes(&self, text: &mut StyledText, line: Range<usize>, _level: usize) {
        let paragraph = Attributes::new().with_paragraph(self.paragraph.clone());
        text.add_attributes(line, &paragraph);
    }

    fn add_attributes(&self, text: &mut StyledText, line: Range<usize>, level: usize) {
        text.add_attributes(line, self.levels.for_level(level));
    }
}

impl Element for ListElement {
    fn name(&self) -> &str {
        "list"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        apply_level_match(self, "list", text, captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ListElement {
        ListElement::new(&Attributes::new().with_typeface(Typeface::system(11.0)))
    }

    fn run(element: &ListElement, input: &str) -> StyledText {
        let mut text = StyledText::new(input);
        Element::parse(element, &mut text);
        text
    }

    #[test]
    fn test_top_level_items() {
        let text = run(&list(), "- item one\n- item two");
        assert_eq!(text.as_str(), "• item one\n• item two");
    }

    #[test]
    fn test_all_marker_characters() {
        let text = run(&list(), "* a\n+ b\n- c");
        assert_eq!(text.as_str(), "• a\n• b\n• c");
    }

    #[test]
    fn test_separator_run_is_replaced() {
        let text = run(&list(), "-   spaced");
        assert_eq!(text.as_str(), "• spaced");
    }

    #[test]
    fn test_continuation_indent_gives_sub_indicator() {
        let text = run(&list(), "- parent\n    - child");
        assert_eq!(text.as_str(), "• parent\n    ◦ child");
    }

    #[test]
    fn test_short_indent_is_not_a_sub_item() {
        let text = run(&list(), "- parent\n  - child");
        assert_eq!(text.as_str(), "• parent\n  • child");
    }

    #[test]
    fn test_marker_without_separator_is_not_a_list() {
        let text = run(&list(), "**bold**\n-dash");
        assert_eq!(text.as_str(), "**bold**\n-dash");
    }

    #[test]
    fn test_runs_beyond_max_level_pass_through() {
        let element = list().with_max_level(2);
        let text = run(&element, "-- two\n--- three");
        assert_eq!(text.as_str(), "• two\n--- three");
    }

    #[test]
    fn test_custom_glyphs() {
        let element = list()
            .with_indicator("▪")
            .with_sub_indicator("▫")
            .with_separator("  ");
        let text = run(&element, "- a\n    - b");
        assert_eq!(text.as_str(), "▪  a\n    ▫  b");
    }

    #[test]
    fn test_level_selects_table_entry() {
        let element = list().with_levels(LevelTable::new(vec![
            Attributes::new().with_foreground(Color::BLACK),
            Attributes::new().with_foreground(Color::GRAY),
        ]));
        let text = run(&element, "- one\n-- two\n--- three");

        assert_eq!(text.as_str(), "• one\n• two\n• three");
        let two = text.as_str().find("two").unwrap();
        let three = text.as_str().find("three").unwrap();
        assert_eq!(text.attributes_at(0).unwrap().foreground, Some(Color::BLACK));
        assert_eq!(text.attributes_at(two).unwrap().foreground, Some(Color::GRAY));
        assert_eq!(text.attributes_at(three).unwrap().foreground, Some(Color::GRAY));
    }

    #[test]
    fn test_paragraph_covers_whole_line() {
        let paragraph = ParagraphStyle {
            head_indent: 12.0,
            ..ParagraphStyle::default()
        };
        let text = run(&list().with_paragraph(paragraph.clone()), "intro\n- item");

        assert_eq!(text.attributes_at(0).unwrap().paragraph, None);
        let item = text.as_str().find('•').unwrap();
        let end = text.len() - 1;
        assert_eq!(text.attributes_at(item).unwrap().paragraph, Some(paragraph.clone()));
        assert_eq!(text.attributes_at(end).unwrap().paragraph, Some(paragraph));
    }
}
