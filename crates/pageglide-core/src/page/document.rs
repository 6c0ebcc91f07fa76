use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::element::{Content, Element, ElementId};
use super::event::{HandlerId, PageEvent};
use super::geometry::Viewport;
use super::mutation::{MutationBatch, MutationLog};
use super::selector::{Scope, Selector};

type Handler = Rc<RefCell<dyn FnMut(&mut Document, &mut PageEvent)>>;

/// An in-memory page: element tree, viewport, scroll offset and event seam.
///
/// Elements live in an arena and are addressed by [`ElementId`]. Two roots
/// (`head`, `body`) always exist; queries walk the tree from the roots, so a
/// detached element is unreachable until it is re-attached.
///
/// The document performs no layout. Hosts measure real content and feed the
/// result through [`set_content_height`](Self::set_content_height); the
/// scroll offset is always kept inside `[0, max_scroll()]`.
pub struct Document {
    arena: Vec<Element>,
    head: ElementId,
    body: ElementId,
    location: String,
    viewport: Viewport,
    content_height: f64,
    scroll_y: f64,
    mutations: MutationLog,
    #[allow(clippy::type_complexity)]
    handlers: HashMap<(ElementId, String), Vec<(HandlerId, Handler)>>,
    next_handler: u64,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.arena.len())
            .field("location", &self.location)
            .field("viewport", &self.viewport)
            .field("content_height", &self.content_height)
            .field("scroll_y", &self.scroll_y)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        let mut arena = Vec::new();
        arena.push(Element::new("head"));
        arena.push(Element::new("body"));
        Self {
            arena,
            head: ElementId(0),
            body: ElementId(1),
            location: "/".to_string(),
            viewport,
            content_height: viewport.height,
            scroll_y: 0.0,
            mutations: MutationLog::new(),
            handlers: HashMap::new(),
            next_handler: 0,
        }
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Record a navigation as the host performs it. Deliberately does not
    /// produce a mutation batch; location changes are observed either by
    /// polling or alongside the tree churn that accompanies them.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height.max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// Distance between the bottom of the content and the bottom of the
    /// viewport when scrolled to the top. Zero when content fits.
    pub fn max_scroll(&self) -> f64 {
        (self.content_height - self.viewport.height).max(0.0)
    }

    // ---- tree -----------------------------------------------------------

    /// Create a detached element. It joins the page once appended.
    pub fn create_element(&mut self, tag: impl Into<String>) -> ElementId {
        let id = ElementId(self.arena.len() as u32);
        self.arena.push(Element::new(tag));
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.arena.get(id.index())
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.arena.get_mut(id.index())
    }

    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(|el| el.children()).unwrap_or(&[])
    }

    /// Append `child` to `parent`, detaching it from any previous parent
    /// first. Refused (returning `false`) when either id is unknown or the
    /// move would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if parent == child
            || self.element(parent).is_none()
            || self.element(child).is_none()
            || self.is_ancestor(child, parent)
        {
            debug!(?parent, ?child, "append_child refused");
            return false;
        }

        let previous = self.arena[child.index()].parent;
        if let Some(prev) = previous {
            self.arena[prev.index()].children.retain(|&c| c != child);
        }
        self.arena[parent.index()].children.push(child);
        self.arena[child.index()].parent = Some(parent);

        let removed = if previous.is_some() { vec![child] } else { Vec::new() };
        self.mutations.record(vec![child], removed);
        true
    }

    /// Detach an element from its parent. The subtree below it stays intact
    /// but becomes unreachable from queries.
    pub fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.element(id).and_then(Element::parent) else {
            return false;
        };
        self.arena[parent.index()].children.retain(|&c| c != id);
        self.arena[id.index()].parent = None;
        self.mutations.record(Vec::new(), vec![id]);
        true
    }

    /// Replace an element's children with opaque content. The removed
    /// children are recorded as one child-list change; setting content on a
    /// childless element records nothing.
    pub fn set_content(&mut self, id: ElementId, content: Content) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let removed = std::mem::take(&mut self.arena[id.index()].children);
        for &child in &removed {
            self.arena[child.index()].parent = None;
        }
        self.arena[id.index()].content = Some(content);
        if !removed.is_empty() {
            self.mutations.record(Vec::new(), removed);
        }
        true
    }

    fn is_ancestor(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut cursor = self.element(of).and_then(Element::parent);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.element(id).and_then(Element::parent);
        }
        false
    }

    // ---- queries --------------------------------------------------------

    /// First attached element carrying this id attribute, in document order.
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.reachable()
            .into_iter()
            .find(|&el| self.arena[el.index()].id.as_deref() == Some(id))
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<ElementId> {
        self.reachable()
            .into_iter()
            .filter(|&el| self.arena[el.index()].has_class(class))
            .collect()
    }

    pub fn query_first(&self, selector: &Selector) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        let candidates: Vec<ElementId> = match selector.scope {
            Some(Scope::Body) => self.children_of(self.body).to_vec(),
            Some(Scope::Head) => self.children_of(self.head).to_vec(),
            None => self.reachable(),
        };
        candidates
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    /// Match among the descendants of `root` (excluding `root` itself).
    /// A scope prefix on the selector is ignored here; scope is a
    /// document-level notion.
    pub fn query_first_in(&self, root: ElementId, selector: &Selector) -> Option<ElementId> {
        self.query_all_in(root, selector).into_iter().next()
    }

    pub fn query_all_in(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut out = Vec::new();
        for &child in self.children_of(root) {
            self.collect_matching(child, selector, &mut out);
        }
        out
    }

    fn collect_matching(&self, id: ElementId, selector: &Selector, out: &mut Vec<ElementId>) {
        if self.matches(id, selector) {
            out.push(id);
        }
        for &child in self.children_of(id) {
            self.collect_matching(child, selector, out);
        }
    }

    fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        self.element(id).is_some_and(|el| selector.matches(el))
    }

    /// All attached elements in document order: head subtree, then body.
    fn reachable(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.arena.len());
        self.collect_subtree(self.head, &mut out);
        self.collect_subtree(self.body, &mut out);
        out
    }

    fn collect_subtree(&self, id: ElementId, out: &mut Vec<ElementId>) {
        out.push(id);
        for &child in self.children_of(id) {
            self.collect_subtree(child, out);
        }
    }

    // ---- events ---------------------------------------------------------

    pub fn add_handler(
        &mut self,
        target: ElementId,
        event: impl Into<String>,
        handler: impl FnMut(&mut Document, &mut PageEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers
            .entry((target, event.into()))
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let mut found = false;
        self.handlers.retain(|_, list| {
            let before = list.len();
            list.retain(|(hid, _)| *hid != id);
            found |= list.len() != before;
            !list.is_empty()
        });
        found
    }

    /// Run every handler attached to (`target`, event name), in attach
    /// order. Handlers may mutate the document, attach and detach handlers;
    /// the set that runs is the one present when dispatch began. Recursive
    /// dispatch that reaches the handler currently running is not supported.
    pub fn dispatch(&mut self, target: ElementId, event: &mut PageEvent) {
        let key = (target, event.name().to_string());
        let snapshot: Vec<Handler> = match self.handlers.get(&key) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return,
        };
        for handler in snapshot {
            (handler.borrow_mut())(self, event);
        }
    }

    /// Dispatch a wheel event to `body`, then apply native scrolling unless
    /// a handler prevented it or the body's inline `overflow` is `hidden`.
    pub fn wheel(&mut self, delta_y: f64) -> PageEvent {
        let mut event = PageEvent::wheel(delta_y);
        let body = self.body;
        self.dispatch(body, &mut event);
        if !event.default_prevented() && !self.native_scroll_blocked() {
            self.set_scroll_y(self.scroll_y + delta_y);
        }
        event
    }

    fn native_scroll_blocked(&self) -> bool {
        self.element(self.body)
            .is_some_and(|body| body.styles.get("overflow") == Some("hidden"))
    }

    // ---- mutations ------------------------------------------------------

    /// Revision of the latest child-list change, 0 before any change.
    pub fn revision(&self) -> u64 {
        self.mutations.revision()
    }

    /// Child-list changes recorded after `cursor`, oldest first.
    pub fn mutations_since(&self, cursor: u64) -> Vec<MutationBatch> {
        self.mutations.since(cursor).cloned().collect()
    }

    pub(crate) fn clear_mutations(&mut self) {
        self.mutations.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
