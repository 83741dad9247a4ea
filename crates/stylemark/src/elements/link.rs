//! Explicit links and automatic link detection.

use regex::Captures;
use stylemark_core::{Attributes, Color, StyledText, Typeface};

use super::element::{capture, Element, Pattern};
use crate::utilities::decode_escapes;
use crate::Result;

const LINK_PATTERN: &str = r#"\[([^\[\]\n]*)\]\(([^()\s]*)(?:[ \t]+"[^"\n]*")?\)"#;

const AUTOMATIC_LINK_PATTERN: &str = r#"(?i)\b(?:https?://|www\.)[^\s<>\[\]()"'`]+"#;

/// Trailing characters that end a sentence rather than a bare URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

fn link_style(base: &Attributes) -> Attributes {
    Attributes {
        typeface: base.typeface.clone(),
        foreground: Some(Color::BLUE),
        background: base.background,
        underline: Some(true),
        ..Attributes::default()
    }
}

/// Inline links: `[label](target "optional title")`.
///
/// The markup is replaced by the label (or the target when the label is
/// empty), which carries the link style and the target.
#[derive(Debug, Clone)]
pub struct LinkElement {
    attributes: Attributes,
    pattern: Pattern,
}

impl LinkElement {
    /// Create a link element styled from the base attributes
    pub fn new(base: &Attributes) -> Self {
        Self {
            attributes: link_style(base),
            pattern: Pattern::new(LINK_PATTERN),
        }
    }

    /// Set the typeface of link labels
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.attributes.typeface = Some(typeface);
        self
    }

    /// Set the link color
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.attributes.foreground = Some(color);
        self
    }

    /// Underline link labels or not
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.attributes.underline = Some(underline);
        self
    }

    /// Attributes applied to link labels
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Element for LinkElement {
    fn name(&self) -> &str {
        "link"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let label = capture(captures, 1, self.name())?.as_str();
        let target = capture(captures, 2, self.name())?.as_str();

        let visible = if label.is_empty() { target } else { label };
        text.replace_range(whole.range(), visible);
        if target.is_empty() {
            return Ok(());
        }

        let range = whole.start()..whole.start() + visible.len();
        text.add_attributes(range.clone(), &self.attributes);
        text.add_attributes(range, &Attributes::new().with_link(decode_escapes(target)));
        Ok(())
    }
}

/// Bare `http://`, `https://` and `www.` references.
///
/// Text is left as written; the reference gets the link style and target.
/// Spans that already carry a link (from explicit link markup) are skipped.
#[derive(Debug, Clone)]
pub struct AutomaticLinkElement {
    attributes: Attributes,
    pattern: Pattern,
}

impl AutomaticLinkElement {
    /// Create an element that detects bare references
    pub fn new(base: &Attributes) -> Self {
        Self {
            attributes: link_style(base),
            pattern: Pattern::new(AUTOMATIC_LINK_PATTERN),
        }
    }

    /// Set the link color
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.attributes.foreground = Some(color);
        self
    }

    /// Underline detected references or not
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.attributes.underline = Some(underline);
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Element for AutomaticLinkElement {
    fn name(&self) -> &str {
        "automatic-link"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let reference = whole.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        let range = whole.start()..whole.start() + reference.len();
        if reference.len() <= "www.".len() {
            return Ok(());
        }
        if text.has_attribute_in(range.clone(), |attributes| attributes.link.is_some()) {
            return Ok(());
        }

        let target = if reference.to_ascii_lowercase().starts_with("www.") {
            format!("http://{reference}")
        } else {
            reference.to_string()
        };
        text.add_attributes(range.clone(), &self.attributes);
        text.add_attributes(range, &Attributes::new().with_link(decode_escapes(&target)));
        Ok(())
    }
}
