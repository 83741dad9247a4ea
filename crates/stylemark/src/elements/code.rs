//! Inline code spans and fenced code blocks.
//!
//! Code is protected in two steps. The escaping elements run before anything
//! else and rewrite code bodies to lowercase hex, which no other pattern can
//! match. [`CodeElement`] and [`FencedCodeElement`] run last, decode the hex
//! and apply code styling.

use regex::Captures;
use stylemark_core::{Attributes, Color, ParagraphStyle, StyledText, Typeface};

use super::element::{capture, Element, Pattern};
use crate::utilities::{decode_hex, encode_hex};
use crate::Result;

const FENCED_BLOCK_PATTERN: &str = r"(?ms)^```([\w+#.\-]*)[ \t]*\n(.*?)\n?^```[ \t]*$";

const CODE_SPAN_PATTERN: &str =
    r"(?m)(?:^|[^\\`])(```([^\n]+?)```|``([^\n]+?)``|`([^`\n]+)`)";

const ENCODED_BLOCK_PATTERN: &str = r"(?m)^```([0-9a-f]*)\n([0-9a-f]*)```";

const ENCODED_SPAN_PATTERN: &str = r"`([0-9a-f]+)`";

/// Indent of fenced code blocks, in points.
const BLOCK_INDENT: f32 = 12.0;

fn code_style(base: &Attributes) -> Attributes {
    let size = base.typeface.as_ref().map_or(11.0, |typeface| typeface.size);
    Attributes {
        typeface: Some(Typeface::monospace(size)),
        foreground: Some(Color::DARK_GRAY),
        background: Some(Color::LIGHT_GRAY),
        underline: Some(false),
        ..Attributes::default()
    }
}

/// True if part of `range` is already decoded code.
fn is_code(text: &StyledText, range: std::ops::Range<usize>) -> bool {
    text.has_attribute_in(range, |attributes| attributes.code_language.is_some())
}

/// Hides fenced blocks from every later element.
///
/// ```` ```lang\nbody\n``` ```` becomes ```` ```<hex lang>\n<hex body>``` ````.
#[derive(Debug, Clone)]
pub(crate) struct FencedCodeEscaping {
    pattern: Pattern,
}

impl FencedCodeEscaping {
    pub(crate) fn new() -> Self {
        Self {
            pattern: Pattern::new(FENCED_BLOCK_PATTERN),
        }
    }
}

impl Element for FencedCodeEscaping {
    fn name(&self) -> &str {
        "fenced-code-escaping"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let language = capture(captures, 1, self.name())?.as_str();
        let body = capture(captures, 2, self.name())?.as_str();
        let encoded = format!("```{}\n{}```", encode_hex(language), encode_hex(body));
        text.replace_range(whole.range(), &encoded);
        Ok(())
    }
}

/// Hides inline code spans (one to three backticks, not preceded by a
/// backslash) behind a single-backtick hex span.
#[derive(Debug, Clone)]
pub(crate) struct CodeEscaping {
    pattern: Pattern,
}

impl CodeEscaping {
    pub(crate) fn new() -> Self {
        Self {
            pattern: Pattern::new(CODE_SPAN_PATTERN),
        }
    }
}

impl Element for CodeEscaping {
    fn name(&self) -> &str {
        "code-escaping"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let span = capture(captures, 1, self.name())?;
        let body = captures
            .get(2)
            .or_else(|| captures.get(3))
            .or_else(|| captures.get(4))
            .map(|m| m.as_str())
            .ok_or_else(|| crate::StylemarkError::MissingCapture {
                element: self.name().to_string(),
                group: 2,
            })?;
        text.replace_range(span.range(), &format!("`{}`", encode_hex(body)));
        Ok(())
    }
}

/// Inline code: restores escaped spans and styles them monospaced.
#[derive(Debug, Clone)]
pub struct CodeElement {
    attributes: Attributes,
    pattern: Pattern,
}

impl CodeElement {
    /// Create the element, sized from the base typeface.
    pub fn new(base: &Attributes) -> Self {
        Self {
            attributes: code_style(base).with_code_language(""),
            pattern: Pattern::new(ENCODED_SPAN_PATTERN),
        }
    }

    /// Set the code typeface
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.attributes.typeface = Some(typeface);
        self
    }

    /// Set the code text color
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.attributes.foreground = Some(color);
        self
    }

    /// Set the code background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.attributes.background = Some(color);
        self
    }

    /// Attributes applied to decoded code
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Element for CodeElement {
    fn name(&self) -> &str {
        "code"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        if is_code(text, whole.range()) {
            return Ok(());
        }
        let body = decode_hex(capture(captures, 1, self.name())?.as_str())?;

        text.replace_range(whole.range(), &body);
        let start = whole.start();
        text.add_attributes(start..start + body.len(), &self.attributes);
        Ok(())
    }
}

/// Fenced code blocks: restores escaped blocks, drops the fences and
/// language line, and styles the body as an indented monospaced paragraph.
#[derive(Debug, Clone)]
pub struct FencedCodeElement {
    attributes: Attributes,
    paragraph: ParagraphStyle,
    pattern: Pattern,
}

impl FencedCodeElement {
    /// Create the element, sized from the base typeface.
    pub fn new(base: &Attributes) -> Self {
        let paragraph = ParagraphStyle {
            first_line_head_indent: BLOCK_INDENT,
            head_indent: BLOCK_INDENT,
            ..base.paragraph.clone().unwrap_or_default()
        };
        Self {
            attributes: code_style(base),
            paragraph,
            pattern: Pattern::new(ENCODED_BLOCK_PATTERN),
        }
    }

    /// Set the code typeface
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.attributes.typeface = Some(typeface);
        self
    }

    /// Set the code text color
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.attributes.foreground = Some(color);
        self
    }

    /// Set the code background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.attributes.background = Some(color);
        self
    }

    /// Set the block paragraph layout
    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = paragraph;
        self
    }

    /// Attributes applied to decoded code
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn paragraph(&self) -> &ParagraphStyle {
        &self.paragraph
    }
}

impl Element for FencedCodeElement {
    fn name(&self) -> &str {
        "fenced-code"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let language = decode_hex(capture(captures, 1, self.name())?.as_str())?;
        let body = decode_hex(capture(captures, 2, self.name())?.as_str())?;

        text.replace_range(whole.range(), &body);
        let range = whole.start()..whole.start() + body.len();
        let attributes = self
            .attributes
            .clone()
            .with_paragraph(self.paragraph.clone())
            .with_code_language(language);
        text.add_attributes(range, &attributes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_all(elements: &[&dyn Element], input: &str) -> StyledText {
        let mut text = StyledText::new(input);
        for element in elements {
            element.parse(&mut text);
        }
        text
    }

    #[test]
    fn test_inline_code_is_encoded() {
        let text = run_all(&[&CodeEscaping::new()], "use `*x*` here");
        assert_eq!(text.as_str(), "use `002a0078002a` here");
    }

    #[test]
    fn test_double_backtick_span() {
        let text = run_all(&[&CodeEscaping::new()], "``a`b``");
        assert_eq!(text.as_str(), "`006100600062`");
    }

    #[test]
    fn test_escaped_backtick_is_not_code() {
        let text = run_all(&[&CodeEscaping::new()], r"\`not code`");
        assert_eq!(text.as_str(), r"\`not code`");
    }

    #[test]
    fn test_inline_code_round_trip_is_styled() {
        let base = Attributes::default();
        let code = CodeElement::new(&base);
        let text = run_all(&[&CodeEscaping::new(), &code], "a `**b**` c");

        assert_eq!(text.as_str(), "a **b** c");
        let attributes = text.attributes_at(2).unwrap();
        assert_eq!(attributes.typeface.as_ref().unwrap().family, "monospace");
        assert_eq!(attributes.background, Some(Color::LIGHT_GRAY));
        assert_eq!(text.attributes_at(0).unwrap().background, None);
    }

    #[test]
    fn test_code_clears_underline() {
        let base = Attributes::default();
        let underline = Attributes::new().with_underline(true);
        let mut text = StyledText::new("a `b` c");
        text.add_attributes(0..7, &underline);
        for element in [&CodeEscaping::new() as &dyn Element, &CodeElement::new(&base)] {
            element.parse(&mut text);
        }

        assert_eq!(text.as_str(), "a b c");
        assert_eq!(text.attributes_at(2).unwrap().underline, Some(false));
        assert_eq!(text.attributes_at(0).unwrap().underline, Some(true));
    }

    #[test]
    fn test_fenced_block_is_encoded() {
        let text = run_all(&[&FencedCodeEscaping::new()], "```rs\n*a*\n```\nafter");
        assert_eq!(text.as_str(), "```00720073\n002a0061002a```\nafter");
    }

    #[test]
    fn test_fenced_block_round_trip() {
        let base = Attributes::default();
        let fenced = FencedCodeElement::new(&base);
        let code = CodeElement::new(&base);
        let text = run_all(
            &[&FencedCodeEscaping::new(), &CodeEscaping::new(), &fenced, &code],
            "before\n```rust\nlet `x` = 1;\n```\nafter",
        );

        assert_eq!(text.as_str(), "before\nlet `x` = 1;\nafter");
        let attributes = text.attributes_at(7).unwrap();
        assert_eq!(attributes.code_language.as_deref(), Some("rust"));
        assert_eq!(attributes.paragraph.as_ref().unwrap().head_indent, BLOCK_INDENT);
        assert_eq!(text.attributes_at(0).unwrap().code_language, None);
    }

    #[test]
    fn test_decoded_block_is_not_decoded_again() {
        let base = Attributes::default();
        let text = run_all(
            &[
                &FencedCodeEscaping::new(),
                &FencedCodeElement::new(&base),
                &CodeElement::new(&base),
            ],
            "```\n`cafe`\n```",
        );
        assert_eq!(text.as_str(), "`cafe`");
    }
}
