//! Bold, italic, bold-italic and underline spans.

use regex::{Captures, Regex};
use stylemark_core::{Attributes, Color, StyledText, Typeface};

use super::element::{capture, Element, Pattern};
use crate::Result;

/// The emphasis variants, each with its own delimiters and table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmphasisKind {
    BoldItalic,
    Bold,
    Italic,
    Underline,
}

impl EmphasisKind {
    /// Delimiters in pattern alternation order.
    pub fn delimiters(self) -> &'static [&'static str] {
        match self {
            EmphasisKind::BoldItalic => &["***", "___"],
            EmphasisKind::Bold => &["**", "__"],
            EmphasisKind::Italic => &["*", "_"],
            EmphasisKind::Underline => &["~~"],
        }
    }

    /// Name used for the element in log events
    pub fn name(self) -> &'static str {
        match self {
            EmphasisKind::BoldItalic => "bold-italic",
            EmphasisKind::Bold => "bold",
            EmphasisKind::Italic => "italic",
            EmphasisKind::Underline => "underline",
        }
    }

    /// The base face with this variant's traits.
    fn derive_typeface(self, base: &Typeface) -> Typeface {
        match self {
            EmphasisKind::BoldItalic => base.bolded().italicized(),
            EmphasisKind::Bold => base.bolded(),
            EmphasisKind::Italic => base.italicized(),
            EmphasisKind::Underline => base.clone(),
        }
    }
}

/// Delimited inline emphasis: `***both***`, `**bold**`, `*italic*`,
/// `~~underline~~` and the underscore forms.
///
/// Delimiters are stripped and the variant's attributes applied to the
/// content. Content may not start or end with whitespace, and underscore
/// delimiters are ignored inside words (`snake_case_name`).
#[derive(Debug, Clone)]
pub struct EmphasisElement {
    kind: EmphasisKind,
    attributes: Attributes,
    pattern: Pattern,
}

impl EmphasisElement {
    /// An element for `kind`, styled from the base attributes.
    pub fn new(kind: EmphasisKind, base: &Attributes) -> Self {
        let typeface = kind.derive_typeface(&base.typeface.clone().unwrap_or_default());
        let attributes = Attributes {
            typeface: Some(typeface),
            foreground: base.foreground,
            background: base.background,
            underline: (kind == EmphasisKind::Underline).then_some(true),
            ..Attributes::default()
        };
        Self {
            kind,
            attributes,
            pattern: emphasis_pattern(kind),
        }
    }

    /// Create a `***bold italic***` element
    pub fn bold_italic(base: &Attributes) -> Self {
        Self::new(EmphasisKind::BoldItalic, base)
    }

    /// Create a `**bold**` element
    pub fn bold(base: &Attributes) -> Self {
        Self::new(EmphasisKind::Bold, base)
    }

    /// Create an `*italic*` element
    pub fn italic(base: &Attributes) -> Self {
        Self::new(EmphasisKind::Italic, base)
    }

    /// Create a `~~underline~~` element
    pub fn underline(base: &Attributes) -> Self {
        Self::new(EmphasisKind::Underline, base)
    }

    /// Use `typeface` as is instead of deriving it from the base face.
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.attributes.typeface = Some(typeface);
        self
    }

    /// Set the text color of emphasized content
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.attributes.foreground = Some(color);
        self
    }

    /// Set the background color of emphasized content
    pub fn with_background(mut self, color: Color) -> Self {
        self.attributes.background = Some(color);
        self
    }

    pub fn kind(&self) -> EmphasisKind {
        self.kind
    }

    /// The attribute-table entry applied to emphasized content.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl EmphasisElement {
    fn is_intraword_underscore(&self, haystack: &str, captures: &Captures<'_>) -> bool {
        let Some(whole) = captures.get(0) else {
            return false;
        };
        let underscore = captures
            .iter()
            .skip(1)
            .position(|m| m.is_some())
            .is_some_and(|group| self.kind.delimiters()[group].starts_with('_'));
        underscore && is_intraword(haystack, whole.start(), whole.end())
    }
}

fn emphasis_pattern(kind: EmphasisKind) -> Pattern {
    let alternatives: Vec<String> = kind
        .delimiters()
        .iter()
        .map(|delimiter| {
            let delimiter = regex::escape(delimiter);
            format!(r"{delimiter}(\S(?:.*?\S)?){delimiter}")
        })
        .collect();
    Pattern::new(alternatives.join("|"))
}

/// True if the span is glued to a word character on either side.
fn is_intraword(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
}

impl Element for EmphasisElement {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Underscore spans glued to a word are skipped, and the search resumes
    /// right after their opening underscore so a later span still matches.
    fn find_matches<'h>(&self, regex: &Regex, haystack: &'h str) -> Vec<Captures<'h>> {
        let mut matches = Vec::new();
        let mut at = 0;
        while let Some(captures) = regex.captures_at(haystack, at) {
            let Some(whole) = captures.get(0) else {
                break;
            };
            if self.is_intraword_underscore(haystack, &captures) {
                at = whole.start() + 1;
                continue;
            }
            at = whole.end();
            matches.push(captures);
        }
        matches
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let Some(content) = captures.iter().skip(1).flatten().next() else {
            return Err(crate::StylemarkError::MissingCapture {
                element: self.name().to_string(),
                group: 1,
            });
        };

        text.replace_range(content.end()..whole.end(), "");
        text.replace_range(whole.start()..content.start(), "");
        let start = whole.start();
        text.add_attributes(start..start + content.len(), &self.attributes);
        Ok(())
    }
}
