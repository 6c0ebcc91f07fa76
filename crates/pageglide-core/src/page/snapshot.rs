use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::document::Document;
use super::element::{Content, ElementId};
use super::geometry::Viewport;
use crate::error::Result;

/// Serializable image of a whole page, used for fixtures and the CLI.
///
/// Snapshots carry structure and presentation only. Event handlers and the
/// mutation history are runtime state and are not captured; instantiating a
/// snapshot yields a document with an empty history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub viewport: Viewport,
    /// Measured height of the page content. Omitted means "fits the
    /// viewport", leaving nothing to scroll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<NodeSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

fn default_location() -> String {
    "/".to_string()
}

impl PageSnapshot {
    pub fn capture(doc: &Document) -> Self {
        Self {
            location: doc.location().to_string(),
            viewport: doc.viewport(),
            content_height: Some(doc.content_height()),
            head: capture_children(doc, doc.head()),
            body: capture_children(doc, doc.body()),
        }
    }

    /// Build a fresh document from this snapshot.
    pub fn instantiate(&self) -> Document {
        let mut doc = Document::new(self.viewport);
        doc.set_location(&self.location);
        doc.set_content_height(self.content_height.unwrap_or(self.viewport.height));
        let head = doc.head();
        for node in &self.head {
            node.build(&mut doc, head);
        }
        let body = doc.body();
        for node in &self.body {
            node.build(&mut doc, body);
        }
        doc.clear_mutations();
        doc
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn capture_children(doc: &Document, parent: ElementId) -> Vec<NodeSnapshot> {
    doc.children_of(parent)
        .iter()
        .filter_map(|&child| NodeSnapshot::capture(doc, child))
        .collect()
}

impl NodeSnapshot {
    fn capture(doc: &Document, id: ElementId) -> Option<Self> {
        let el = doc.element(id)?;
        let (text, markup) = match &el.content {
            Some(Content::Text(s)) => (Some(s.clone()), None),
            Some(Content::Markup(s)) => (None, Some(s.clone())),
            None => (None, None),
        };
        Some(Self {
            tag: el.tag.clone(),
            id: el.id.clone(),
            classes: el.classes.clone(),
            styles: el.styles.iter().map(|(p, v)| (p.to_string(), v.to_string())).collect(),
            text,
            markup,
            children: capture_children(doc, id),
        })
    }

    fn build(&self, doc: &mut Document, parent: ElementId) -> ElementId {
        let id = doc.create_element(&self.tag);
        if let Some(el) = doc.element_mut(id) {
            el.id = self.id.clone();
            el.classes = self.classes.clone();
            el.styles = self.styles.clone().into();
            el.content = match (&self.text, &self.markup) {
                (Some(t), _) => Some(Content::Text(t.clone())),
                (None, Some(m)) => Some(Content::Markup(m.clone())),
                (None, None) => None,
            };
        }
        doc.append_child(parent, id);
        for child in &self.children {
            child.build(doc, id);
        }
        id
    }
}
