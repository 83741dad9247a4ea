//! Text with presentation attributes attached to byte ranges.

use std::fmt;
use std::ops::Range;

use crate::attributes::Attributes;

#[derive(Debug, Clone, PartialEq)]
struct Run {
    start: usize,
    attributes: Attributes,
}

/// A string plus a run list of attributes.
///
/// Runs tile the whole text: the first starts at 0, starts strictly
/// increase, and adjacent runs never carry equal attributes. Runs are found
/// by binary search over their start offsets.
///
/// Offsets are UTF-8 byte offsets. Ranges reaching past the end are clamped;
/// ranges that do not fall on char boundaries are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    text: String,
    runs: Vec<Run>,
}

impl StyledText {
    /// Plain text with no attributes.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_attributes(text, Attributes::default())
    }

    /// Text with a single bundle of attributes covering all of it.
    pub fn with_attributes(text: impl Into<String>, attributes: Attributes) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![Run {
                start: 0,
                attributes,
            }]
        };
        Self { text, runs }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text within `range`, if the range is valid.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    /// Iterate over the attribute runs and the ranges they cover, in order.
    pub fn runs(&self) -> impl Iterator<Item = (Range<usize>, &Attributes)> + '_ {
        self.runs
            .iter()
            .enumerate()
            .map(move |(index, run)| (run.start..self.run_end(index), &run.attributes))
    }

    /// Attributes of the character starting at `offset`.
    pub fn attributes_at(&self, offset: usize) -> Option<&Attributes> {
        self.run_index(offset).map(|index| &self.runs[index].attributes)
    }

    /// Returns true if any run overlapping `range` satisfies `predicate`.
    pub fn has_attribute_in<F>(&self, range: Range<usize>, predicate: F) -> bool
    where
        F: Fn(&Attributes) -> bool,
    {
        let Some(first) = self.run_index(range.start) else {
            return false;
        };
        self.runs[first..]
            .iter()
            .take_while(|run| run.start < range.end)
            .any(|run| predicate(&run.attributes))
    }

    /// Layer `attributes` over `range`; fields set in `attributes` win.
    pub fn add_attributes(&mut self, range: Range<usize>, attributes: &Attributes) {
        self.update(range, |existing| existing.overlay(attributes));
    }

    /// Layer `attributes` under `range`; existing fields win.
    pub fn fill_attributes(&mut self, range: Range<usize>, attributes: &Attributes) {
        self.update(range, |existing| existing.underlay(attributes));
    }

    /// Edit the attributes of every run within `range`.
    pub fn update<F>(&mut self, range: Range<usize>, mut edit: F)
    where
        F: FnMut(&mut Attributes),
    {
        let Some(range) = self.clamp(range) else {
            return;
        };
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            edit(&mut run.attributes);
        }
        self.merge_neighbors(first, last);
    }

    /// Replace the text in `range` with `replacement`.
    ///
    /// The inserted text takes the attributes of the character at
    /// `range.start` (or of the last character when inserting at the end).
    pub fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        let Some(range) = self.clamp(range) else {
            return;
        };
        let inherited = self
            .attributes_at(range.start)
            .or_else(|| self.runs.last().map(|run| &run.attributes))
            .cloned()
            .unwrap_or_default();

        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);

        let (removed, added) = (range.len(), replacement.len());
        for run in &mut self.runs[first..] {
            run.start = run.start - removed + added;
        }
        if !replacement.is_empty() {
            self.runs.insert(
                first,
                Run {
                    start: range.start,
                    attributes: inherited,
                },
            );
        }
        self.text.replace_range(range, replacement);
        self.merge_neighbors(first, first + 1);
    }

    /// Split the text in two at `at`, keeping `[0, at)` and returning the
    /// rest with its attributes.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not on a char boundary.
    pub fn split_off(&mut self, at: usize) -> StyledText {
        let at = at.min(self.text.len());
        let index = self.split_at(at);
        let mut runs = self.runs.split_off(index);
        for run in &mut runs {
            run.start -= at;
        }
        let text = self.text.split_off(at);
        StyledText { text, runs }
    }

    /// Move `other` onto the end of this text.
    pub fn append(&mut self, mut other: StyledText) {
        let offset = self.text.len();
        let joint = self.runs.len();
        self.text.push_str(&other.text);
        for run in &mut other.runs {
            run.start += offset;
        }
        self.runs.append(&mut other.runs);
        self.merge_neighbors(joint, joint);
    }

    /// Edit each of the disjoint `ranges`, given in ascending order.
    ///
    /// `edit` is called with the index of a range, last range first. The
    /// text it receives ends where that range ends, so an edit only moves
    /// the bytes and runs of its own range. The edit must leave the text
    /// before the range start untouched.
    pub fn edit_ranges<F>(&mut self, ranges: &[Range<usize>], mut edit: F)
    where
        F: FnMut(&mut StyledText, usize),
    {
        if ranges.is_empty() {
            return;
        }
        let mut head = std::mem::take(self);
        let mut pieces = Vec::with_capacity(ranges.len() * 2);
        for (index, range) in ranges.iter().enumerate().rev() {
            pieces.push(head.split_off(range.end));
            edit(&mut head, index);
            let start = range.start.min(head.len());
            pieces.push(head.split_off(start));
        }
        head.text.reserve(pieces.iter().map(StyledText::len).sum());
        for piece in pieces.into_iter().rev() {
            head.append(piece);
        }
        *self = head;
    }

    /// Consume and return the plain text.
    pub fn into_string(self) -> String {
        self.text
    }

    fn clamp(&self, range: Range<usize>) -> Option<Range<usize>> {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return None;
        }
        Some(start..end)
    }

    fn run_end(&self, index: usize) -> usize {
        self.runs
            .get(index + 1)
            .map_or(self.text.len(), |run| run.start)
    }

    /// Index of the run covering `offset`.
    fn run_index(&self, offset: usize) -> Option<usize> {
        if offset >= self.text.len() {
            return None;
        }
        Some(self.runs.partition_point(|run| run.start <= offset) - 1)
    }

    /// Ensure a run boundary at `offset` and return the index of the run
    /// that starts there (or the run count at the end of the text).
    fn split_at(&mut self, offset: usize) -> usize {
        let index = self.runs.partition_point(|run| run.start < offset);
        if offset >= self.text.len() || self.runs.get(index).is_some_and(|run| run.start == offset) {
            return index;
        }
        let attributes = self.runs[index - 1].attributes.clone();
        self.runs.insert(
            index,
            Run {
                start: offset,
                attributes,
            },
        );
        index
    }

    /// Merge equal neighbors among the runs `first - 1..=last`.
    fn merge_neighbors(&mut self, first: usize, last: usize) {
        let mut index = last.min(self.runs.len().saturating_sub(1));
        while index > 0 && index >= first {
            if self.runs[index - 1].attributes == self.runs[index].attributes {
                self.runs.remove(index);
            }
            index -= 1;
        }
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
