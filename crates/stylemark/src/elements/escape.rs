//! Backslash escapes.

use regex::Captures;
use stylemark_core::StyledText;

use super::element::{capture, Element, Pattern};
use crate::utilities::{escape_char, unescape_unit};
use crate::Result;

/// Rewrites `\c` so later elements cannot see `c`.
///
/// ASCII punctuation is replaced by its encoded form. Before any other
/// character the backslash itself is encoded, so it survives literally.
#[derive(Debug, Clone)]
pub(crate) struct EscapingElement {
    pattern: Pattern,
}

impl EscapingElement {
    pub(crate) fn new() -> Self {
        Self {
            pattern: Pattern::new(r"\\(.)"),
        }
    }
}

impl Element for EscapingElement {
    fn name(&self) -> &str {
        "escaping"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let escaped = capture(captures, 1, self.name())?.as_str();
        match escaped.chars().next() {
            Some(c) if c.is_ascii_punctuation() => {
                text.replace_range(whole.range(), &escape_char(c));
            }
            _ => {
                let backslash = whole.start()..whole.start() + 1;
                text.replace_range(backslash, &escape_char('\\'));
            }
        }
        Ok(())
    }
}

/// Restores `\hhhh` sequences left by [`EscapingElement`].
#[derive(Debug, Clone)]
pub(crate) struct UnescapingElement {
    pattern: Pattern,
}

impl UnescapingElement {
    pub(crate) fn new() -> Self {
        Self {
            pattern: Pattern::new(r"\\([0-9a-f]{4})"),
        }
    }
}

impl Element for UnescapingElement {
    fn name(&self) -> &str {
        "unescaping"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        // Decoded code may contain text that looks like an escape.
        if text.has_attribute_in(whole.range(), |attributes| {
            attributes.code_language.is_some()
        }) {
            return Ok(());
        }
        let decoded = unescape_unit(capture(captures, 1, self.name())?.as_str())?;
        text.replace_range(whole.range(), &decoded);
        Ok(())
    }
}
