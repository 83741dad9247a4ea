//! stylemark-core - styled text and presentation attributes
//!
//! This crate provides the data structures produced by `stylemark`: a string
//! with attribute runs ([`StyledText`]) and the attribute bundles that style
//! it. It has no dependencies and no knowledge of markup.
//!
//! # Example
//!
//! ```rust
//! use stylemark_core::{Attributes, Color, StyledText, Typeface};
//!
//! let mut text = StyledText::new("Hello World");
//! text.add_attributes(
//!     6..11,
//!     &Attributes::new()
//!         .with_typeface(Typeface::system(11.0).bolded())
//!         .with_foreground(Color::BLUE),
//! );
//!
//! let bold = text.attributes_at(6).unwrap();
//! assert!(bold.typeface.as_ref().unwrap().bold);
//! assert_eq!(text.runs().count(), 2);
//! ```

mod attributes;
mod styled_text;

pub use attributes::{Attributes, Color, ImageRef, LevelTable, ParagraphStyle, Size, Typeface};
pub use styled_text::StyledText;
