use super::document::Document;
use super::element::{Content, ElementId};
use super::style::InlineStyle;

/// Declarative element tree for tests, fixtures and demo pages.
///
/// ```
/// use pageglide_core::page::builder::div;
/// use pageglide_core::page::Document;
///
/// let mut doc = Document::default();
/// let body = doc.body();
/// div()
///     .id("hero")
///     .class("c-section")
///     .child(div().class("c-row").text("hello"))
///     .build(&mut doc, body);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    styles: InlineStyle,
    content: Option<Content>,
    children: Vec<ElementSpec>,
}

pub fn element(tag: impl Into<String>) -> ElementSpec {
    ElementSpec {
        tag: tag.into(),
        ..ElementSpec::default()
    }
}

/// Convenience for the most common tag.
pub fn div() -> ElementSpec {
    element("div")
}

impl ElementSpec {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.set(property, value);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Some(Content::Text(text.into()));
        self
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.content = Some(Content::Markup(markup.into()));
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Materialize the tree under `parent`, returning the root's id.
    pub fn build(self, doc: &mut Document, parent: ElementId) -> ElementId {
        let id = doc.create_element(self.tag);
        if let Some(el) = doc.element_mut(id) {
            el.id = self.id;
            el.styles = self.styles;
            el.content = self.content;
            for class in &self.classes {
                el.add_class(class);
            }
        }
        doc.append_child(parent, id);
        for child in self.children {
            child.build(doc, id);
        }
        id
    }
}
