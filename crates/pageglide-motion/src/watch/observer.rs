//! Child-list observation scoped to the body subtree.

use tracing::debug;

use pageglide_core::page::{Document, ElementId, Selector};

use crate::scheduler::{Control, SchedulerHandle, TaskHandle};

/// Call `callback` for each element added under `body` that matches
/// `selector`, starting with changes recorded after this call. Runs until
/// cancelled.
///
/// Additions are matched against the added element itself; descendants of
/// an added subtree are not searched. An element detached again before the
/// frame that reads its batch is no longer under `body` and is not
/// reported. A scope prefix on the selector is ignored here.
pub fn observe_added(
    doc: &Document,
    sched: &SchedulerHandle,
    selector: Selector,
    mut callback: impl FnMut(&mut Document, ElementId) + 'static,
) -> TaskHandle {
    let mut cursor = doc.revision();
    sched.spawn(move |doc, _now| {
        let batches = doc.mutations_since(cursor);
        let Some(last) = batches.last() else {
            return Control::Continue;
        };
        // advance before the callbacks run so mutations they cause are
        // read on the next frame, not re-read on this one
        cursor = last.revision;

        let mut matched = Vec::new();
        for batch in &batches {
            for &added in &batch.added {
                let hit = doc.element(added).is_some_and(|el| selector.matches(el));
                if hit && under_body(doc, added) {
                    matched.push(added);
                }
            }
        }
        for id in matched {
            debug!(?id, selector = %selector, "observed addition");
            callback(doc, id);
        }
        Control::Continue
    })
}

fn under_body(doc: &Document, id: ElementId) -> bool {
    let body = doc.body();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        if current == body {
            return true;
        }
        cursor = doc.element(current).and_then(|el| el.parent());
    }
    false
}
