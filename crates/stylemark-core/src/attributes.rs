//! Presentation attributes carried by runs of styled text.

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(235, 235, 235);
    pub const DARK_GRAY: Color = Color::rgb(64, 64, 64);
    pub const BLUE: Color = Color::rgb(0, 122, 255);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns true if the color is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.a == 0
    }
}

/// A font selection: family, point size and traits.
#[derive(Debug, Clone, PartialEq)]
pub struct Typeface {
    /// Family name. `"system"` and `"monospace"` are generic families.
    pub family: String,
    /// Point size.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Typeface {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// The platform UI font at the given size.
    pub fn system(size: f32) -> Self {
        Self::new("system", size)
    }

    /// A fixed-pitch font at the given size.
    pub fn monospace(size: f32) -> Self {
        Self::new("monospace", size)
    }

    /// Same face with a different size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    /// Bold variant of this face.
    pub fn bolded(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    /// Italic variant of this face.
    pub fn italicized(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::system(11.0)
    }
}

/// Paragraph layout: spacing and indentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    /// Space added after the paragraph.
    pub spacing_after: f32,
    /// Space added before the paragraph.
    pub spacing_before: f32,
    /// Extra space between lines.
    pub line_spacing: f32,
    /// Indent of the first line.
    pub first_line_head_indent: f32,
    /// Indent of lines after the first.
    pub head_indent: f32,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            spacing_after: 0.0,
            spacing_before: 0.0,
            line_spacing: 1.38,
            first_line_head_indent: 0.0,
            head_indent: 0.0,
        }
    }
}

/// Width and height in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Reference to an image that a renderer should draw in place of the
/// object replacement character.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    /// Location of the image, as written in the markup.
    pub source: String,
    /// Alternate text.
    pub alt: String,
    /// Requested display size, if any.
    pub size: Option<Size>,
}

/// A bundle of presentation attributes.
///
/// Every field is optional; unset fields neither override nor erase anything
/// when the bundle is layered onto existing text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub typeface: Option<Typeface>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub paragraph: Option<ParagraphStyle>,
    pub underline: Option<bool>,
    /// Link target.
    pub link: Option<String>,
    pub image: Option<ImageRef>,
    /// Set on code content: the language tag of a fenced block, empty for
    /// inline code and untagged blocks.
    pub code_language: Option<String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = Some(typeface);
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = Some(paragraph);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_link(mut self, target: impl Into<String>) -> Self {
        self.link = Some(target.into());
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_code_language(mut self, language: impl Into<String>) -> Self {
        self.code_language = Some(language.into());
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }

    /// Layer `other` on top of this bundle: every field set in `other` wins.
    pub fn overlay(&mut self, other: &Attributes) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }
        take(&mut self.typeface, &other.typeface);
        take(&mut self.foreground, &other.foreground);
        take(&mut self.background, &other.background);
        take(&mut self.paragraph, &other.paragraph);
        take(&mut self.underline, &other.underline);
        take(&mut self.link, &other.link);
        take(&mut self.image, &other.image);
        take(&mut self.code_language, &other.code_language);
    }

    /// Layer `other` underneath this bundle: only fields unset here are taken.
    pub fn underlay(&mut self, other: &Attributes) {
        fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if slot.is_none() {
                *slot = value.clone();
            }
        }
        fill(&mut self.typeface, &other.typeface);
        fill(&mut self.foreground, &other.foreground);
        fill(&mut self.background, &other.background);
        fill(&mut self.paragraph, &other.paragraph);
        fill(&mut self.underline, &other.underline);
        fill(&mut self.link, &other.link);
        fill(&mut self.image, &other.image);
        fill(&mut self.code_language, &other.code_language);
    }
}

/// Attribute bundles indexed by nesting level.
///
/// Lookups clamp to the table bounds, so a table with a single entry styles
/// every level alike.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    entries: Vec<Attributes>,
}

impl LevelTable {
    /// Build a table from per-level entries, level 1 first. An empty list
    /// yields a single empty entry.
    pub fn new(entries: Vec<Attributes>) -> Self {
        if entries.is_empty() {
            return Self::uniform(Attributes::default());
        }
        Self { entries }
    }

    /// A table that styles every level with `entry`.
    pub fn uniform(entry: Attributes) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    /// Entry for a 1-based `level`, clamped to the available entries.
    pub fn for_level(&self, level: usize) -> &Attributes {
        let index = level.saturating_sub(1).min(self.entries.len() - 1);
        &self.entries[index]
    }

    /// Apply `edit` to every entry.
    pub fn edit_entries<F>(mut self, edit: F) -> Self
    where
        F: FnMut(&mut Attributes),
    {
        self.entries.iter_mut().for_each(edit);
        self
    }

    /// Number of distinct levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
