//! Shared machinery for line-anchored elements whose marker run encodes a
//! nesting level (headers, lists, quotes).

use std::ops::Range;

use regex::Captures;
use stylemark_core::StyledText;

use super::element::capture;
use crate::Result;

/// An element whose pattern captures a marker run (group 1) and the line
/// content (group 2). The level of a match is the length of the marker run.
///
/// Implementors also implement [`Element`](super::Element), delegating
/// `apply_match` to the shared level logic.
pub trait LevelElement: Send + Sync {
    /// Rewrite the marker region: the marker run plus the separator that
    /// follows it.
    fn format_text(&self, text: &mut StyledText, marker: Range<usize>, level: usize);

    /// Attributes covering the whole rewritten line.
    fn add_full_attributes(&self, text: &mut StyledText, line: Range<usize>, level: usize);

    /// Level-dependent attributes for the rewritten line.
    fn add_attributes(&self, text: &mut StyledText, line: Range<usize>, level: usize);
}

/// Apply a level element to one match: rewrite the marker, then style the
/// line at its post-rewrite extent.
pub(crate) fn apply_level_match<E>(
    element: &E,
    name: &str,
    text: &mut StyledText,
    captures: &Captures<'_>,
) -> Result<()>
where
    E: LevelElement + ?Sized,
{
    let line = capture(captures, 0, name)?;
    let marker = capture(captures, 1, name)?;
    let content = capture(captures, 2, name)?;
    let level = marker.as_str().chars().count();

    let before = text.len();
    element.format_text(text, marker.start()..content.start(), level);
    let line_end = (line.end() + text.len()).saturating_sub(before);
    let line = line.start()..line_end;

    element.add_full_attributes(text, line.clone(), level);
    element.add_attributes(text, line, level);
    Ok(())
}

/// Regex repetition for a marker run of at most `max_level` characters,
/// where zero means unbounded.
pub(crate) fn level_repetition(max_level: usize) -> String {
    if max_level > 0 {
        format!("{{1,{max_level}}}")
    } else {
        "+".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_repetition() {
        assert_eq!(level_repetition(0), "+");
        assert_eq!(level_repetition(3), "{1,3}");
    }
}
