//! # stylemark
//!
//! Convert lightweight markup into styled text.
//!
//! Markup is turned into a [`StyledText`]: the rendered characters plus runs
//! of presentation attributes (typeface, colors, paragraph layout, link and
//! image metadata) ready to hand to a text renderer.
//!
//! ## Design
//!
//! Conversion is a pipeline of [`Element`]s rather than a syntax tree. Each
//! element owns a regular expression, finds its constructs in the evolving
//! text, rewrites them in place and attaches attributes to the result. The
//! [`MarkdownParser`] runs the groups in a fixed order:
//!
//! ```text
//! normalize ─▶ escaping ─▶ built-in ─▶ custom ─▶ unescaping
//! ```
//!
//! Escaping hides code spans and backslash escapes from every later pattern;
//! unescaping restores them and applies code styling last.
//!
//! ## Example
//!
//! ```rust
//! use stylemark::MarkdownParser;
//!
//! let parser = MarkdownParser::new();
//! let styled = parser.parse("**bold** and *italic*");
//!
//! assert_eq!(styled.as_str(), "bold and italic");
//! let bold = styled.attributes_at(0).unwrap();
//! assert!(bold.typeface.as_ref().unwrap().bold);
//! ```
//!
//! ## Custom elements
//!
//! ```rust
//! use std::sync::Arc;
//! use stylemark::{Attributes, Color, CustomElement, Element, MarkdownParser};
//!
//! let mut parser = MarkdownParser::new();
//! let mention: Arc<dyn Element> = Arc::new(CustomElement::styled(
//!     r"@(\w+)",
//!     Attributes::new().with_foreground(Color::BLUE),
//! ));
//! parser.add_custom_element(mention.clone());
//!
//! let styled = parser.parse("ping @alice");
//! assert_eq!(styled.as_str(), "ping alice");
//!
//! parser.remove_custom_element(&mention);
//! assert_eq!(parser.parse("ping @alice").as_str(), "ping @alice");
//! ```

mod elements;
mod normalize;
mod parser;
mod utilities;

pub use elements::{
    capture, AutomaticLinkElement, BuiltinElements, CodeElement, CustomElement, Element,
    EmphasisElement, EmphasisKind, FencedCodeElement, HeaderElement, ImageElement, LevelElement,
    LinkElement, ListElement, Pattern, QuoteElement, ReplacementFn,
};
pub use normalize::Normalizer;
pub use parser::{MarkdownParser, ParserOptions};
pub use stylemark_core::{
    Attributes, Color, ImageRef, LevelTable, ParagraphStyle, Size, StyledText, Typeface,
};

/// Error type for stylemark operations.
///
/// None of these reach the caller of [`MarkdownParser::parse`]: a failing
/// element simply contributes no styling. They surface through
/// [`MarkdownParser::check_patterns`] and [`Pattern::regex`].
#[derive(Debug, thiserror::Error)]
pub enum StylemarkError {
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Element `{element}` matched without capture group {group}")]
    MissingCapture { element: String, group: usize },

    #[error("Invalid escape encoding: {0}")]
    InvalidEncoding(String),
}

pub type Result<T> = std::result::Result<T, StylemarkError>;
