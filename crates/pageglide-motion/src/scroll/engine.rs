//! Wheel-driven smooth scrolling.
//!
//! The engine owns the document's scroll offset while it runs: native wheel
//! scrolling is suppressed, wheel deltas move a clamped target, and a frame
//! task chases the target with an exponential ease and writes the result to
//! the page each step.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use pageglide_core::page::event::WHEEL;
use pageglide_core::page::{Document, HandlerId};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::smoothing::{approach, frame_factor};
use crate::scheduler::{Control, SchedulerHandle, TaskHandle};

/// Offsets shared between the wheel handler, the frame task and the
/// scroller proxy.
pub(crate) struct ScrollState {
    pub(crate) current: f64,
    pub(crate) target: f64,
    pub(crate) smoothness: f64,
}

type PostFrameHook = Box<dyn FnMut(&mut Document, f64)>;
type StartHook = Box<dyn FnOnce(&mut Document, &Rc<RefCell<ScrollState>>)>;

/// Configured but not yet running engine.
///
/// Hooks and the scroller proxy attach here, then
/// [`start`](SmoothScrollBuilder::start) wires the page and the frame loop
/// and hands back the running engine.
pub struct SmoothScrollBuilder {
    config: ScrollConfig,
    state: Rc<RefCell<ScrollState>>,
    hooks: Vec<PostFrameHook>,
    start_hooks: Vec<StartHook>,
}

/// A running (or destroyed) smooth-scroll engine.
pub struct SmoothScroll {
    state: Rc<RefCell<ScrollState>>,
    wheel_handler: HandlerId,
    frame_task: TaskHandle,
    sched: SchedulerHandle,
    saved_overflow: Option<String>,
    destroyed: bool,
}

impl SmoothScroll {
    pub fn builder(config: ScrollConfig) -> SmoothScrollBuilder {
        SmoothScrollBuilder {
            config,
            state: Rc::new(RefCell::new(ScrollState {
                current: 0.0,
                target: 0.0,
                smoothness: 0.0,
            })),
            hooks: Vec::new(),
            start_hooks: Vec::new(),
        }
    }

    /// Interpolated offset as of the last frame.
    pub fn position(&self) -> f64 {
        self.state.borrow().current
    }

    /// Where the interpolation is heading.
    pub fn target(&self) -> f64 {
        self.state.borrow().target
    }

    pub fn smoothness(&self) -> f64 {
        self.state.borrow().smoothness
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Jump both offsets to `position` immediately, clamped to the
    /// scrollable range. No interpolation happens; the page is updated on
    /// the spot.
    pub fn restart(&self, doc: &mut Document, position: f64) {
        if self.destroyed {
            debug!("restart ignored, engine destroyed");
            return;
        }
        let position = position.clamp(0.0, doc.max_scroll());
        {
            let mut state = self.state.borrow_mut();
            state.current = position;
            state.target = position;
        }
        doc.set_scroll_y(position);
    }

    /// Tear the engine down: detach the wheel handler, restore native
    /// scrolling and cancel the frame task. Idempotent; the engine cannot
    /// be started again.
    pub fn destroy(&mut self, doc: &mut Document) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        doc.remove_handler(self.wheel_handler);
        let body = doc.body();
        if let Some(el) = doc.element_mut(body) {
            match &self.saved_overflow {
                Some(value) => el.styles.set("overflow", value.clone()),
                None => {
                    el.styles.remove("overflow");
                }
            }
        }
        self.sched.cancel(self.frame_task);
        info!("smooth scroll destroyed");
    }
}

impl Drop for SmoothScroll {
    fn drop(&mut self) {
        if !self.destroyed {
            self.sched.cancel(self.frame_task);
            warn!("smooth scroll dropped while running; wheel handler left attached");
        }
    }
}

impl SmoothScrollBuilder {
    /// Run `hook` after every frame, with the position just applied.
    pub fn post_frame(mut self, hook: impl FnMut(&mut Document, f64) + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run `hook` once during [`start`](Self::start), after the offsets are
    /// seeded and the page is wired. The trigger bridge registers its
    /// scroller proxy through this.
    pub(crate) fn on_start(
        mut self,
        hook: impl FnOnce(&mut Document, &Rc<RefCell<ScrollState>>) + 'static,
    ) -> Self {
        self.start_hooks.push(Box::new(hook));
        self
    }

    /// Wire the engine to the page and spawn its frame task.
    ///
    /// Picks the smoothness tier from the current viewport width, seeds both
    /// offsets from the current scroll position, hides native scrolling and
    /// installs the wheel handler.
    pub fn start(mut self, doc: &mut Document, sched: &SchedulerHandle) -> SmoothScroll {
        let viewport = doc.viewport();
        let smoothness = self.config.smoothness_for(viewport.width);
        {
            let mut state = self.state.borrow_mut();
            state.smoothness = smoothness;
            state.current = doc.scroll_y();
            state.target = doc.scroll_y();
        }

        let body = doc.body();
        let saved_overflow = doc
            .element(body)
            .and_then(|el| el.styles.get("overflow").map(String::from));
        if let Some(el) = doc.element_mut(body) {
            el.styles.set("overflow", "hidden");
        }

        let wheel_state = Rc::clone(&self.state);
        let wheel_handler = doc.add_handler(body, WHEEL, move |doc, event| {
            event.prevent_default();
            let mut state = wheel_state.borrow_mut();
            state.target = (state.target + event.delta_y).clamp(0.0, doc.max_scroll());
        });

        for hook in self.start_hooks.drain(..) {
            hook(doc, &self.state);
        }

        let frame_state = Rc::clone(&self.state);
        let mut hooks = self.hooks;
        let mut last = sched.now();
        let frame_task = sched.spawn(move |doc, now| {
            let dt = (now - last).max(0.0);
            last = now;
            let max = doc.max_scroll();
            let position = {
                let mut state = frame_state.borrow_mut();
                // re-validate against the live range; content may have been
                // resized or the proxy may have set an out-of-range value
                state.target = state.target.clamp(0.0, max);
                let factor = frame_factor(state.smoothness, dt);
                state.current = approach(state.current, state.target, factor).clamp(0.0, max);
                state.current
            };
            doc.set_scroll_y(position);
            for hook in &mut hooks {
                hook(doc, position);
            }
            Control::Continue
        });

        info!(smoothness, width = viewport.width, "smooth scroll started");
        SmoothScroll {
            state: self.state,
            wheel_handler,
            frame_task,
            sched: sched.clone(),
            saved_overflow,
            destroyed: false,
        }
    }
}
