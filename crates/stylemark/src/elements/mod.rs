//! Elements and the groups the parser runs them in.

mod code;
mod element;
mod emphasis;
mod escape;
mod header;
mod image;
mod level;
mod link;
mod list;
mod quote;

pub use code::{CodeElement, FencedCodeElement};
pub use element::{capture, CustomElement, Element, Pattern, ReplacementFn};
pub use emphasis::{EmphasisElement, EmphasisKind};
pub use header::HeaderElement;
pub use image::ImageElement;
pub use level::LevelElement;
pub use link::{AutomaticLinkElement, LinkElement};
pub use list::ListElement;
pub use quote::QuoteElement;

use std::sync::Arc;

use indexmap::IndexMap;
use stylemark_core::{Attributes, Size};

use code::{CodeEscaping, FencedCodeEscaping};
use escape::{EscapingElement, UnescapingElement};

/// The text-level subset of `base`: typeface and colors.
pub(crate) fn text_style(base: &Attributes) -> Attributes {
    Attributes {
        typeface: base.typeface.clone(),
        foreground: base.foreground,
        background: base.background,
        ..Attributes::default()
    }
}

/// The configurable built-in elements.
///
/// Fields are public so individual elements can be restyled in place, for
/// example `builtins.list = builtins.list.clone().with_indicator("-")`.
#[derive(Debug, Clone)]
pub struct BuiltinElements {
    pub header: HeaderElement,
    pub list: ListElement,
    pub quote: QuoteElement,
    pub image: ImageElement,
    pub link: LinkElement,
    pub automatic_link: AutomaticLinkElement,
    pub bold_italic: EmphasisElement,
    pub bold: EmphasisElement,
    pub italic: EmphasisElement,
    pub underline: EmphasisElement,
    pub code: CodeElement,
    pub fenced_code: FencedCodeElement,
}

impl BuiltinElements {
    /// Every built-in element styled from `base`.
    pub fn new(base: &Attributes, image_size: Option<Size>) -> Self {
        Self {
            header: HeaderElement::new(base),
            list: ListElement::new(base),
            quote: QuoteElement::new(base),
            image: ImageElement::new(image_size),
            link: LinkElement::new(base),
            automatic_link: AutomaticLinkElement::new(base),
            bold_italic: EmphasisElement::bold_italic(base),
            bold: EmphasisElement::bold(base),
            italic: EmphasisElement::italic(base),
            underline: EmphasisElement::underline(base),
            code: CodeElement::new(base),
            fenced_code: FencedCodeElement::new(base),
        }
    }
}

/// Identity of a shared element: the address of its allocation.
fn identity(element: &Arc<dyn Element>) -> usize {
    Arc::as_ptr(element) as *const () as usize
}

/// All element groups, in pipeline order.
pub(crate) struct Elements {
    fenced_code_escaping: FencedCodeEscaping,
    code_escaping: CodeEscaping,
    escaping: EscapingElement,
    pub(crate) builtins: BuiltinElements,
    custom: IndexMap<usize, Arc<dyn Element>>,
    unescaping: UnescapingElement,
}

impl Elements {
    pub(crate) fn new(builtins: BuiltinElements) -> Self {
        Self {
            fenced_code_escaping: FencedCodeEscaping::new(),
            code_escaping: CodeEscaping::new(),
            escaping: EscapingElement::new(),
            builtins,
            custom: IndexMap::new(),
            unescaping: UnescapingElement::new(),
        }
    }

    /// Append a custom element. Adding one that is already present keeps
    /// its position.
    pub(crate) fn add(&mut self, element: Arc<dyn Element>) {
        self.custom.insert(identity(&element), element);
    }

    /// Returns true if the element was present.
    pub(crate) fn remove(&mut self, element: &Arc<dyn Element>) -> bool {
        self.custom.shift_remove(&identity(element)).is_some()
    }

    pub(crate) fn custom(&self) -> impl Iterator<Item = &Arc<dyn Element>> + '_ {
        self.custom.values()
    }

    /// The elements one parse runs, in order.
    pub(crate) fn pipeline(&self, automatic_link: bool) -> Vec<&dyn Element> {
        let builtins = &self.builtins;
        let mut pipeline: Vec<&dyn Element> = vec![
            &self.fenced_code_escaping as &dyn Element,
            &self.code_escaping,
            &self.escaping,
            &builtins.header,
            &builtins.list,
            &builtins.quote,
            &builtins.image,
            &builtins.link,
        ];
        if automatic_link {
            pipeline.push(&builtins.automatic_link);
        }
        pipeline.extend([
            &builtins.bold_italic as &dyn Element,
            &builtins.bold,
            &builtins.italic,
            &builtins.underline,
        ]);
        pipeline.extend(self.custom.values().map(|element| element.as_ref()));
        pipeline.extend([
            &builtins.fenced_code as &dyn Element,
            &builtins.code,
            &self.unescaping,
        ]);
        pipeline
    }
}
