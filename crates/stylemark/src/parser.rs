//! MarkdownParser - the main entry point for markup to styled text conversion.

use std::fmt;
use std::sync::Arc;

use stylemark_core::{Attributes, Color, ParagraphStyle, Size, StyledText, Typeface};
use tracing::debug;

use crate::elements::{BuiltinElements, Element, Elements};
use crate::normalize::Normalizer;
use crate::Result;

/// Options for MarkdownParser
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Base typeface for unstyled text
    pub typeface: Typeface,

    /// Typeface for `**bold**`; derived from the base typeface when unset
    pub bold_typeface: Option<Typeface>,

    /// Typeface for `*italic*`; derived from the base typeface when unset
    pub italic_typeface: Option<Typeface>,

    /// Typeface for `***bold italic***`; derived when unset
    pub bold_italic_typeface: Option<Typeface>,

    /// Typeface for `~~underline~~`; the base typeface when unset
    pub underline_typeface: Option<Typeface>,

    /// Base text color
    pub foreground: Color,

    /// Base background color
    pub background: Color,

    /// Base paragraph layout
    pub paragraph: ParagraphStyle,

    /// Display size attached to every image
    pub image_size: Option<Size>,

    /// Style bare `http://` and `www.` references as links
    pub automatic_link_detection: bool,

    /// Let quote, code, link, image, escape and underline markup open a
    /// line; by default the normalizer drops such a leading character
    pub markup_line_starts: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            typeface: Typeface::system(11.0),
            bold_typeface: None,
            italic_typeface: None,
            bold_italic_typeface: None,
            underline_typeface: None,
            foreground: Color::BLACK,
            background: Color::CLEAR,
            paragraph: ParagraphStyle::default(),
            image_size: None,
            automatic_link_detection: true,
            markup_line_starts: false,
        }
    }
}

impl ParserOptions {
    /// The attributes every character starts from.
    pub fn base_attributes(&self) -> Attributes {
        Attributes::new()
            .with_typeface(self.typeface.clone())
            .with_foreground(self.foreground)
            .with_background(self.background)
            .with_paragraph(self.paragraph.clone())
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new().with_markup_line_starts(self.markup_line_starts)
    }

    fn builtins(&self) -> BuiltinElements {
        let mut builtins = BuiltinElements::new(&self.base_attributes(), self.image_size);
        let overrides = [
            (&mut builtins.bold, &self.bold_typeface),
            (&mut builtins.italic, &self.italic_typeface),
            (&mut builtins.bold_italic, &self.bold_italic_typeface),
            (&mut builtins.underline, &self.underline_typeface),
        ];
        for (element, typeface) in overrides {
            if let Some(typeface) = typeface {
                *element = element.clone().with_typeface(typeface.clone());
            }
        }
        builtins
    }
}

/// Converts markup into [`StyledText`].
///
/// A parser is configuration only. `parse` takes `&self`, so one parser can
/// be shared between threads and reused for any number of inputs.
pub struct MarkdownParser {
    options: ParserOptions,
    elements: Elements,
}

impl MarkdownParser {
    /// Create a new MarkdownParser with default options
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// Create a MarkdownParser with custom options
    pub fn with_options(options: ParserOptions) -> Self {
        let elements = Elements::new(options.builtins());
        Self { options, elements }
    }

    /// Convert plain markup.
    pub fn parse(&self, markdown: &str) -> StyledText {
        self.parse_styled(&StyledText::new(markdown))
    }

    /// Convert markup that already carries attributes.
    ///
    /// Existing attributes are kept wherever no element overrides them; the
    /// base attributes only fill fields left unset.
    pub fn parse_styled(&self, markdown: &StyledText) -> StyledText {
        let mut text = markdown.clone();
        let pipeline = self.pipeline();
        debug!(len = text.len(), elements = pipeline.len(), "parse");

        self.options.normalizer().normalize(&mut text);
        let len = text.len();
        text.fill_attributes(0..len, &self.options.base_attributes());

        for element in pipeline {
            element.parse(&mut text);
        }
        text
    }

    /// Add a custom element after the built-in ones
    pub fn add_custom_element(&mut self, element: Arc<dyn Element>) -> &mut Self {
        self.elements.add(element);
        self
    }

    /// Remove a custom element previously added, compared by identity
    pub fn remove_custom_element(&mut self, element: &Arc<dyn Element>) -> &mut Self {
        if !self.elements.remove(element) {
            debug!(element = element.name(), "custom element not registered");
        }
        self
    }

    /// Custom elements in the order they run
    pub fn custom_elements(&self) -> impl Iterator<Item = &Arc<dyn Element>> + '_ {
        self.elements.custom()
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Turn automatic link detection on or off
    pub fn set_automatic_link_detection(&mut self, enabled: bool) -> &mut Self {
        self.options.automatic_link_detection = enabled;
        self
    }

    /// Get the current options
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The built-in elements
    pub fn builtins(&self) -> &BuiltinElements {
        &self.elements.builtins
    }

    /// Get mutable access to the built-in elements
    pub fn builtins_mut(&mut self) -> &mut BuiltinElements {
        &mut self.elements.builtins
    }

    /// The elements the next parse runs, in order.
    pub fn pipeline(&self) -> Vec<&dyn Element> {
        self.elements
            .pipeline(self.options.automatic_link_detection)
    }

    /// Compile every pattern in the pipeline and report the first failure.
    ///
    /// Parsing never fails; an element whose pattern does not compile is
    /// skipped. This surfaces such elements up front.
    pub fn check_patterns(&self) -> Result<()> {
        for element in self.pipeline() {
            element.pattern().regex()?;
        }
        Ok(())
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkdownParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownParser")
            .field("options", &self.options)
            .field("builtins", &self.elements.builtins)
            .field("custom_elements", &self.elements.custom().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CustomElement, StylemarkError};

    #[test]
    fn test_base_attributes_cover_text() {
        let parser = MarkdownParser::new();
        let text = parser.parse("plain");
        assert_eq!(text.runs().count(), 1);
        assert_eq!(text.attributes_at(0), Some(&parser.options().base_attributes()));
    }

    #[test]
    fn test_typeface_override() {
        let heavy = Typeface::new("Heavy", 11.0).bolded();
        let parser = MarkdownParser::with_options(ParserOptions {
            bold_typeface: Some(heavy.clone()),
            ..ParserOptions::default()
        });
        let text = parser.parse("**x**");
        assert_eq!(text.attributes_at(0).unwrap().typeface, Some(heavy));
    }

    #[test]
    fn test_check_patterns_reports_bad_custom_element() {
        let mut parser = MarkdownParser::new();
        assert!(parser.check_patterns().is_ok());

        parser.add_custom_element(Arc::new(CustomElement::new("(", |_| String::new())));
        assert!(matches!(
            parser.check_patterns(),
            Err(StylemarkError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_use_plugin() {
        let mut parser = MarkdownParser::new();
        parser.use_plugin(|parser| {
            let list = parser.builtins().list.clone().with_indicator("-");
            parser.builtins_mut().list = list;
        });
        assert_eq!(parser.parse("* item").as_str(), "- item");
    }

    #[test]
    fn test_markup_line_starts_option() {
        let strict = MarkdownParser::new();
        assert_eq!(strict.parse("> said").as_str(), " said");

        let lenient = MarkdownParser::with_options(ParserOptions {
            markup_line_starts: true,
            ..ParserOptions::default()
        });
        assert_eq!(lenient.parse("> said").as_str(), "│ said");
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkdownParser>();
    }
}
