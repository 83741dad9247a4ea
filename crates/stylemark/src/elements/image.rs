//! Inline images.

use regex::Captures;
use stylemark_core::{Attributes, ImageRef, Size, StyledText};

use super::element::{capture, Element, Pattern};
use crate::utilities::decode_escapes;
use crate::Result;

/// Character a renderer replaces with the referenced image.
pub(crate) const OBJECT_REPLACEMENT: &str = "\u{FFFC}";

const IMAGE_PATTERN: &str = r#"!\[([^\[\]\n]*)\]\(([^()\s]+)(?:[ \t]+"[^"\n]*")?\)"#;

/// Images: `![alt](source)`.
///
/// The markup collapses to a single object replacement character carrying an
/// [`ImageRef`]. Loading the image is left to the renderer.
#[derive(Debug, Clone)]
pub struct ImageElement {
    size: Option<Size>,
    pattern: Pattern,
}

impl ImageElement {
    /// Create an image element, optionally with a display size
    pub fn new(size: Option<Size>) -> Self {
        Self {
            size,
            pattern: Pattern::new(IMAGE_PATTERN),
        }
    }

    /// Display size requested for every image.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }
}

impl Element for ImageElement {
    fn name(&self) -> &str {
        "image"
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    fn apply_match(&self, text: &mut StyledText, captures: &Captures<'_>) -> Result<()> {
        let whole = capture(captures, 0, self.name())?;
        let alt = capture(captures, 1, self.name())?.as_str();
        let source = capture(captures, 2, self.name())?.as_str();

        let image = ImageRef {
            source: decode_escapes(source),
            alt: decode_escapes(alt),
            size: self.size,
        };
        text.replace_range(whole.range(), OBJECT_REPLACEMENT);
        let range = whole.start()..whole.start() + OBJECT_REPLACEMENT.len();
        text.add_attributes(range, &Attributes::new().with_image(image));
        Ok(())
    }
}
