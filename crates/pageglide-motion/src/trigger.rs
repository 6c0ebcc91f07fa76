//! Bridges the scroll engine into the external library's trigger system.
//!
//! The library keeps asking "where is the scroller?"; the bridge answers
//! with the engine's interpolated position instead of the native document
//! offset, and nudges the library to recalculate after every frame.

use std::rc::Rc;

use tracing::debug;

use pageglide_core::page::Rect;

use crate::library::{ScrollerProxy, SharedAnimationLibrary};
use crate::scroll::engine::SmoothScrollBuilder;

impl SmoothScrollBuilder {
    /// Attach an external scroll-trigger library to the engine.
    ///
    /// When a library is present, starting the engine registers a scroller
    /// proxy with it (getter reads the interpolated position, setter jumps
    /// both offsets the way [`restart`](crate::scroll::SmoothScroll::restart)
    /// does, bounding rectangle sized to the viewport at the origin) and a
    /// post-frame hook refreshes the library after each frame, keeping
    /// trigger positions in step with the interpolated scroll. With `None`
    /// the builder is returned unchanged and nothing is registered.
    ///
    /// A proxy-set position lands on the page when the frame task next
    /// applies it: within the same scheduler step when the library calls
    /// from a hook that runs before the engine task, on the next step
    /// otherwise. Out-of-range positions are pulled back into the
    /// scrollable range at that point.
    pub fn with_trigger(self, lib: Option<&SharedAnimationLibrary>) -> Self {
        let Some(lib) = lib else {
            debug!("no animation library; scroll trigger not bridged");
            return self;
        };

        let lib_setup = Rc::clone(lib);
        let lib_frame = Rc::clone(lib);
        self.on_start(move |doc, state| {
            let getter_state = Rc::clone(state);
            let setter_state = Rc::clone(state);
            let proxy = ScrollerProxy::new(
                move || getter_state.borrow().current,
                move |position| {
                    let mut state = setter_state.borrow_mut();
                    state.current = position;
                    state.target = position;
                },
                Rect::from_viewport(doc.viewport()),
            );
            lib_setup.borrow_mut().set_scroller_proxy(proxy);
        })
        .post_frame(move |_, _| lib_frame.borrow_mut().refresh())
    }
}
