//! Element trait, Pattern and the closure-backed custom element.

use std::fmt;
use std::ops::Range;

use once_cell::sync::OnceCell;
use regex::{Captures, Match, Regex};
use stylemark_core::{Attributes, StyledText};
use tracing::{debug, trace, warn};

use crate::{Result, StylemarkError};

/// A regular expression compiled on first use.
///
/// The compiled regex, or the compile error, is cached for the lifetime of
/// the pattern, so an element built once can serve any number of parses.
pub struct Pattern {
    source: String,
    compiled: OnceCell<std::result::Result<Regex, regex::Error>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled regex, or the reason it does not compile.
    pub fn regex(&self) -> Result<&Regex> {
        match self.compiled.get_or_init(|| Regex::new(&self.source)) {
            Ok(regex) => Ok(regex),
            Err(err) => Err(StylemarkError::InvalidPattern {
                pattern: self.source.clone(),
                source: err.clone(),
            }),
        }
    }
}

impl Clone for Pattern {
    fn clone(&self) -> Self {
        Self::new(self.source.clone())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Fetch capture `group`, or report which element expected it.
pub fn capture<'h>(captures: &Captures<'h>, group: usize, element: &str) -> Result<Match<'h>> {
    captures
        .get(group)
        .ok_or_else(|| StylemarkError::MissingCapture {
            element: element.to_string(),
            group,
        })
}

/// A markup construct: a pattern plus what to do with each match.
///
/// Elements are configuration: they are shared between parses and must not
/// keep per-parse state.
pub trait Element: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The pattern whose matches this element rewrites.
    fn pattern(&self) -> &Pattern;

    /// Rewrite one match and style the result.
    ///
    /// The text handed over ends where the match ends, and everything before
    /// the match start must be left as it is. An error skips the match.
    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()>;

    /// The matches one pass rewrites: ascending and non-overlapping.
    fn find_matches<'h>(&self, regex: &Regex, haystack: &'h str) -> Vec<Captures<'h>> {
        regex.captures_iter(haystack).collect()
    }

    /// Run one full pass over `text`.
    fn parse(&self, text: &mut StyledText) {
        let regex = match self.pattern().regex() {
            Ok(regex) => regex,
            Err(err) => {
                warn!(element = self.name(), error = %err, "element skipped");
                return;
            }
        };

        let snapshot = text.as_str().to_owned();
        let matches: Vec<(Range<usize>, Captures<'_>)> = self
            .find_matches(regex, &snapshot)
            .into_iter()
            .filter_map(|captures| Some((captures.get(0)?.range(), captures)))
            .collect();
        trace!(element = self.name(), matches = matches.len(), "element pass");

        let ranges: Vec<Range<usize>> = matches.iter().map(|(range, _)| range.clone()).collect();
        text.edit_ranges(&ranges, |head, index| {
            if let Err(err) = self.apply_match(head, &matches[index].1) {
                debug!(element = self.name(), error = %err, "match skipped");
            }
        });
    }
}

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// An element defined by a pattern and a replacement closure.
///
/// Each match is replaced by whatever the closure returns, and the element's
/// attributes are applied over the replacement.
pub struct CustomElement {
    name: String,
    pattern: Pattern,
    replacement: ReplacementFn,
    attributes: Attributes,
}

impl CustomElement {
    /// Create a new custom element
    pub fn new<F>(pattern: &str, replacement: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name: "custom".to_string(),
            pattern: Pattern::new(pattern),
            replacement: Box::new(replacement),
            attributes: Attributes::default(),
        }
    }

    /// Create an element that keeps capture group 1 (or the whole match when
    /// the pattern has no groups) and styles it with `attributes`.
    pub fn styled(pattern: &str, attributes: Attributes) -> Self {
        Self::new(pattern, |captures| {
            captures
                .get(1)
                .or_else(|| captures.get(0))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .with_attributes(attributes)
    }

    /// Set the name used in log events
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the attributes applied over each replacement
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Element for CustomElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, &self.name)?;
        let replacement = (self.replacement)(captures);
        text.replace_range(whole.range(), &replacement);

        let styled = whole.start()..whole.start() + replacement.len();
        if !self.attributes.is_empty() {
            text.add_attributes(styled, &self.attributes);
        }
        Ok(())
    }
}

impl fmt::Debug for CustomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElement")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylemark_core::Color;

    #[test]
    fn test_pattern_caches_compile_error() {
        let pattern = Pattern::new("(unclosed");
        assert!(matches!(
            pattern.regex(),
            Err(StylemarkError::InvalidPattern { .. })
        ));
        assert!(pattern.regex().is_err());
    }

    #[test]
    fn test_invalid_pattern_contributes_nothing() {
        let element = CustomElement::new("[", |_| "x".to_string());
        let mut text = StyledText::new("a [b] c");
        element.parse(&mut text);
        assert_eq!(text.as_str(), "a [b] c");
    }

    #[test]
    fn test_custom_replacement_is_styled() {
        let element = CustomElement::styled(
            r"==(\S+)==",
            Attributes::new().with_background(Color::LIGHT_GRAY),
        );
        let mut text = StyledText::new("a ==mark== b ==again==");
        element.parse(&mut text);

        assert_eq!(text.as_str(), "a mark b again");
        assert_eq!(
            text.attributes_at(2).unwrap().background,
            Some(Color::LIGHT_GRAY)
        );
        assert_eq!(text.attributes_at(7).unwrap().background, None);
        assert_eq!(
            text.attributes_at(9).unwrap().background,
            Some(Color::LIGHT_GRAY)
        );
    }

    #[test]
    fn test_capture_reports_missing_group() {
        let regex = Regex::new(r"a(b)?").unwrap();
        let captures = regex.captures("a").unwrap();
        assert!(capture(&captures, 0, "test").is_ok());
        assert!(matches!(
            capture(&captures, 1, "test"),
            Err(StylemarkError::MissingCapture { group: 1, .. })
        ));
    }
}
