//! Utility surface over [`Document`]: the everyday page operations hosts
//! reach for, each one a quiet no-op when its target is absent.

use std::fmt;

use tracing::warn;

use crate::page::document::Document;
use crate::page::element::{Content, ElementId};
use crate::page::event::{HandlerId, PageEvent};
use crate::page::selector::Selector;
use crate::page::style::InlineStyle;

/// Host-page convention classes surfaced by [`inspect_structure`].
pub const SECTION_CLASS: &str = "c-section";
pub const ROW_CLASS: &str = "c-row";
pub const WRAPPER_CLASS: &str = "c-wrapper";

/// Parent argument for [`nested_element`]: an id attribute value or an
/// already-resolved handle.
#[derive(Debug, Clone, Copy)]
pub enum ParentRef<'a> {
    Id(&'a str),
    Element(ElementId),
}

impl<'a> From<&'a str> for ParentRef<'a> {
    fn from(id: &'a str) -> Self {
        ParentRef::Id(id)
    }
}

impl<'a> From<&'a String> for ParentRef<'a> {
    fn from(id: &'a String) -> Self {
        ParentRef::Id(id)
    }
}

impl From<ElementId> for ParentRef<'_> {
    fn from(el: ElementId) -> Self {
        ParentRef::Element(el)
    }
}

/// Find the first descendant of `parent` matching `child_selector`.
///
/// A string parent is resolved as an id attribute first, then as a selector.
/// Returns `None` when the parent cannot be resolved or the selector text is
/// invalid.
pub fn nested_element<'a>(
    doc: &Document,
    parent: impl Into<ParentRef<'a>>,
    child_selector: &str,
) -> Option<ElementId> {
    let parent = match parent.into() {
        ParentRef::Element(el) => Some(el),
        ParentRef::Id(text) => doc.element_by_id(text).or_else(|| {
            Selector::parse(text)
                .ok()
                .and_then(|sel| doc.query_first(&sel))
        }),
    }?;
    let selector = match Selector::parse(child_selector) {
        Ok(sel) => sel,
        Err(err) => {
            warn!(selector = child_selector, %err, "nested lookup skipped");
            return None;
        }
    };
    doc.query_first_in(parent, &selector)
}

/// Merge `styles` onto the element's inline style.
pub fn apply_styles(doc: &mut Document, el: Option<ElementId>, styles: &InlineStyle) {
    let Some(el) = el else { return };
    if styles.is_empty() {
        return;
    }
    if let Some(element) = doc.element_mut(el) {
        element.styles.merge(styles);
    }
}

/// Attach an event handler. Nothing is attached when the target is absent
/// or the event name is empty.
pub fn bind(
    doc: &mut Document,
    el: Option<ElementId>,
    event: &str,
    handler: impl FnMut(&mut Document, &mut PageEvent) + 'static,
) -> Option<HandlerId> {
    let el = el?;
    if event.is_empty() {
        return None;
    }
    doc.element(el)?;
    Some(doc.add_handler(el, event, handler))
}

pub fn unbind(doc: &mut Document, handler: HandlerId) -> bool {
    doc.remove_handler(handler)
}

/// How [`set_content`] interprets the content string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Markup,
}

/// Replace the element's children with the given content.
pub fn set_content(doc: &mut Document, el: Option<ElementId>, content: &str, kind: ContentKind) {
    let Some(el) = el else { return };
    let content = match kind {
        ContentKind::Text => Content::Text(content.to_string()),
        ContentKind::Markup => Content::Markup(content.to_string()),
    };
    doc.set_content(el, content);
}

/// Flip the inline `display` between `none` and unset.
pub fn toggle_visibility(doc: &mut Document, el: Option<ElementId>) {
    let Some(el) = el else { return };
    if let Some(element) = doc.element_mut(el) {
        if element.styles.get("display") == Some("none") {
            element.styles.remove("display");
        } else {
            element.styles.set("display", "none");
        }
    }
}

pub fn add_class(doc: &mut Document, el: Option<ElementId>, class: &str) {
    let Some(el) = el else { return };
    if let Some(element) = doc.element_mut(el) {
        element.add_class(class);
    }
}

pub fn remove_class(doc: &mut Document, el: Option<ElementId>, class: &str) {
    let Some(el) = el else { return };
    if let Some(element) = doc.element_mut(el) {
        element.remove_class(class);
    }
}

/// One entry of a [`StructureReport`].
#[derive(Debug, Clone)]
pub struct StructureEntry {
    pub element: ElementId,
    /// `tag#id.class` form, captured at inspection time.
    pub descriptor: String,
}

/// Page layout overview grouped by the structural convention classes.
#[derive(Debug, Clone, Default)]
pub struct StructureReport {
    pub sections: Vec<StructureEntry>,
    pub rows: Vec<StructureEntry>,
    pub wrappers: Vec<StructureEntry>,
}

pub fn inspect_structure(doc: &Document) -> StructureReport {
    StructureReport {
        sections: collect_class(doc, SECTION_CLASS),
        rows: collect_class(doc, ROW_CLASS),
        wrappers: collect_class(doc, WRAPPER_CLASS),
    }
}

fn collect_class(doc: &Document, class: &str) -> Vec<StructureEntry> {
    doc.elements_by_class(class)
        .into_iter()
        .filter_map(|id| {
            doc.element(id).map(|el| StructureEntry {
                element: id,
                descriptor: el.descriptor(),
            })
        })
        .collect()
}

impl fmt::Display for StructureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, entries) in [
            ("sections", &self.sections),
            ("rows", &self.rows),
            ("wrappers", &self.wrappers),
        ] {
            writeln!(f, "{name} ({})", entries.len())?;
            for entry in entries {
                writeln!(f, "  {}", entry.descriptor)?;
            }
        }
        Ok(())
    }
}

/// Options for [`wrap_page_content`].
#[derive(Debug, Clone)]
pub struct WrapOptions {
    pub wrapper_id: String,
    pub content_id: String,
    /// Overrides the default target of wrappable direct `body` children.
    pub target_selector: Option<String>,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            wrapper_id: "smooth-wrapper".to_string(),
            content_id: "smooth-content".to_string(),
            target_selector: None,
        }
    }
}

impl WrapOptions {
    fn target(&self) -> String {
        self.target_selector.clone().unwrap_or_else(|| {
            format!(
                "body > div:not(script):not(style):not(#{}):not(#{})",
                self.wrapper_id, self.content_id
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapOutcome {
    /// Wrapper pair created, `moved` elements relocated into it.
    Wrapped { moved: usize },
    /// The wrapper id already exists; the page is left untouched.
    AlreadyWrapped,
    /// Nothing matched the target selector; the page is left untouched.
    NoMatches,
}

/// Move all wrappable top-level elements into a fresh
/// `div#wrapper > div#content` pair appended to `body`.
pub fn wrap_page_content(doc: &mut Document, options: &WrapOptions) -> WrapOutcome {
    if doc.element_by_id(&options.wrapper_id).is_some() {
        return WrapOutcome::AlreadyWrapped;
    }

    let target = options.target();
    let selector = match Selector::parse(&target) {
        Ok(sel) => sel,
        Err(err) => {
            warn!(selector = %target, %err, "wrap: bad target selector");
            return WrapOutcome::NoMatches;
        }
    };
    let matches = doc.query_all(&selector);
    if matches.is_empty() {
        warn!(selector = %target, "wrap: no elements matched");
        return WrapOutcome::NoMatches;
    }

    let wrapper = doc.create_element("div");
    if let Some(el) = doc.element_mut(wrapper) {
        el.id = Some(options.wrapper_id.clone());
    }
    let content = doc.create_element("div");
    if let Some(el) = doc.element_mut(content) {
        el.id = Some(options.content_id.clone());
    }

    let moved = matches.len();
    for el in matches {
        doc.append_child(content, el);
    }
    doc.append_child(wrapper, content);
    let body = doc.body();
    doc.append_child(body, wrapper);
    WrapOutcome::Wrapped { moved }
}

/// Ensure a `<style>` element with this id exists in `head`, creating it
/// with `css` as its content on first use. Returns the element either way.
pub fn inject_style(doc: &mut Document, id: &str, css: &str) -> ElementId {
    if let Some(existing) = doc.element_by_id(id) {
        return existing;
    }
    let style = doc.create_element("style");
    if let Some(el) = doc.element_mut(style) {
        el.id = Some(id.to_string());
        el.content = Some(Content::Text(css.to_string()));
    }
    let head = doc.head();
    doc.append_child(head, style);
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::builder::{div, element};
    use crate::page::geometry::Viewport;

    fn doc() -> Document {
        Document::new(Viewport::new(1200.0, 800.0))
    }

    fn sample_page(doc: &mut Document) {
        let body = doc.body();
        div()
            .id("hero")
            .class(SECTION_CLASS)
            .child(div().class(ROW_CLASS).child(element("p").text("hi")))
            .build(doc, body);
        div().id("footer").class(SECTION_CLASS).build(doc, body);
    }

    #[test]
    fn test_nested_element_resolves_parent_by_id_then_selector() {
        let mut doc = doc();
        sample_page(&mut doc);

        let by_id = nested_element(&doc, "hero", "p");
        assert!(by_id.is_some());

        // falls back to selector resolution when no id attribute matches
        let by_selector = nested_element(&doc, ".c-row", "p");
        assert_eq!(by_selector, by_id);

        let hero = doc.element_by_id("hero").unwrap();
        assert_eq!(nested_element(&doc, hero, "p"), by_id);

        assert_eq!(nested_element(&doc, "missing", "p"), None);
        assert_eq!(nested_element(&doc, "hero", "not a selector"), None);
    }

    #[test]
    fn test_apply_styles_merges_or_does_nothing() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero");

        apply_styles(&mut doc, hero, &InlineStyle::new().with("color", "red"));
        apply_styles(&mut doc, None, &InlineStyle::new().with("color", "blue"));
        apply_styles(&mut doc, hero, &InlineStyle::new());

        let el = doc.element(hero.unwrap()).unwrap();
        assert_eq!(el.styles.get("color"), Some("red"));
        assert_eq!(el.styles.len(), 1);
    }

    #[test]
    fn test_set_content_replaces_children() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero");

        set_content(&mut doc, hero, "<b>sale</b>", ContentKind::Markup);

        let hero = hero.unwrap();
        assert!(doc.children_of(hero).is_empty());
        assert_eq!(
            doc.element(hero).unwrap().content,
            Some(Content::Markup("<b>sale</b>".to_string()))
        );

        set_content(&mut doc, None, "ignored", ContentKind::Text);
    }

    #[test]
    fn test_toggle_visibility_round_trip() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero");

        toggle_visibility(&mut doc, hero);
        assert_eq!(
            doc.element(hero.unwrap()).unwrap().styles.get("display"),
            Some("none")
        );

        toggle_visibility(&mut doc, hero);
        assert_eq!(doc.element(hero.unwrap()).unwrap().styles.get("display"), None);

        toggle_visibility(&mut doc, None); // no-op
    }

    #[test]
    fn test_class_helpers() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero");

        add_class(&mut doc, hero, "dark");
        add_class(&mut doc, hero, "dark");
        remove_class(&mut doc, hero, SECTION_CLASS);
        remove_class(&mut doc, None, "dark");

        let el = doc.element(hero.unwrap()).unwrap();
        assert_eq!(el.classes, vec!["dark"]);
    }

    #[test]
    fn test_inspect_structure_counts_convention_classes() {
        let mut doc = doc();
        sample_page(&mut doc);
        let body = doc.body();
        div().class(WRAPPER_CLASS).build(&mut doc, body);

        let report = inspect_structure(&doc);
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.wrappers.len(), 1);
        assert_eq!(report.sections[0].descriptor, "div#hero.c-section");

        let rendered = report.to_string();
        assert!(rendered.contains("sections (2)"));
        assert!(rendered.contains("  div#footer.c-section"));
    }

    #[test]
    fn test_wrap_moves_top_level_divs_in_order() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero").unwrap();
        let footer = doc.element_by_id("footer").unwrap();

        let outcome = wrap_page_content(&mut doc, &WrapOptions::default());
        assert_eq!(outcome, WrapOutcome::Wrapped { moved: 2 });

        let wrapper = doc.element_by_id("smooth-wrapper").unwrap();
        let content = doc.element_by_id("smooth-content").unwrap();
        assert_eq!(doc.children_of(doc.body()), &[wrapper]);
        assert_eq!(doc.children_of(wrapper), &[content]);
        assert_eq!(doc.children_of(content), &[hero, footer]);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let mut doc = doc();
        sample_page(&mut doc);

        wrap_page_content(&mut doc, &WrapOptions::default());
        let outcome = wrap_page_content(&mut doc, &WrapOptions::default());

        assert_eq!(outcome, WrapOutcome::AlreadyWrapped);
        assert_eq!(doc.elements_by_class(SECTION_CLASS).len(), 2);
        assert_eq!(doc.children_of(doc.body()).len(), 1);
    }

    #[test]
    fn test_wrap_without_matches_leaves_page_untouched() {
        let mut doc = doc();
        let before = doc.revision();

        let outcome = wrap_page_content(&mut doc, &WrapOptions::default());

        assert_eq!(outcome, WrapOutcome::NoMatches);
        assert_eq!(doc.element_by_id("smooth-wrapper"), None);
        assert_eq!(doc.revision(), before);
    }

    #[test]
    fn test_wrap_honours_custom_target_selector() {
        let mut doc = doc();
        sample_page(&mut doc);
        let body = doc.body();
        element("section").id("keep").build(&mut doc, body);

        let options = WrapOptions {
            target_selector: Some("body > *:not(#keep):not(#smooth-wrapper):not(#smooth-content)".to_string()),
            ..WrapOptions::default()
        };
        let outcome = wrap_page_content(&mut doc, &options);

        assert_eq!(outcome, WrapOutcome::Wrapped { moved: 2 });
        let keep = doc.element_by_id("keep").unwrap();
        let wrapper = doc.element_by_id("smooth-wrapper").unwrap();
        assert_eq!(doc.children_of(doc.body()), &[keep, wrapper]);
    }

    #[test]
    fn test_inject_style_is_keyed_by_id() {
        let mut doc = doc();

        let first = inject_style(&mut doc, "glide-css", "body { margin: 0; }");
        let second = inject_style(&mut doc, "glide-css", "body { margin: 8px; }");

        assert_eq!(first, second);
        assert_eq!(doc.children_of(doc.head()).len(), 1);
        assert_eq!(
            doc.element(first).unwrap().content,
            Some(Content::Text("body { margin: 0; }".to_string()))
        );
    }

    #[test]
    fn test_bind_requires_target_and_event_name() {
        let mut doc = doc();
        sample_page(&mut doc);
        let hero = doc.element_by_id("hero");

        assert!(bind(&mut doc, None, "click", |_, _| {}).is_none());
        assert!(bind(&mut doc, hero, "", |_, _| {}).is_none());

        let handler = bind(&mut doc, hero, "click", |_, _| {}).unwrap();
        assert!(unbind(&mut doc, handler));
        assert!(!unbind(&mut doc, handler));
    }
}
