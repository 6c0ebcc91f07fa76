//! Waiting for an element to appear.

use tracing::debug;

use pageglide_core::config::WatchConfig;
use pageglide_core::page::{Document, ElementId, Selector};

use crate::scheduler::{Control, SchedulerHandle, TaskHandle};

use super::{deadline_reached, secs};

/// Poll for the first element matching `selector` and hand it to
/// `callback`, then stop. Gives up quietly once polls run longer than the
/// configured timeout.
///
/// The first check happens on the next frame; an element found on the
/// timeout poll itself still wins.
pub fn wait_for_element(
    sched: &SchedulerHandle,
    selector: Selector,
    config: &WatchConfig,
    callback: impl FnOnce(&mut Document, ElementId) + 'static,
) -> TaskHandle {
    let interval = secs(config.poll_interval_ms);
    let timeout = secs(config.wait_timeout_ms);
    let start = sched.now();
    let mut next_poll = start;
    let mut callback = Some(callback);
    sched.spawn(move |doc, now| {
        if !deadline_reached(now, next_poll) {
            return Control::Continue;
        }
        next_poll = now + interval;

        if let Some(found) = doc.query_first(&selector) {
            debug!(selector = %selector, ?found, "element appeared");
            if let Some(callback) = callback.take() {
                callback(doc, found);
            }
            return Control::Stop;
        }
        if now - start > timeout {
            debug!(selector = %selector, "gave up waiting for element");
            return Control::Stop;
        }
        Control::Continue
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::scheduler::FrameScheduler;
    use pageglide_core::page::Viewport;

    const TICK: f64 = 0.1;

    fn doc() -> Document {
        Document::new(Viewport::new(1200.0, 800.0))
    }

    fn sel(text: &str) -> Selector {
        Selector::parse(text).unwrap()
    }

    fn add_cta(doc: &mut Document) -> ElementId {
        let el = doc.create_element("a");
        doc.element_mut(el).unwrap().id = Some("cta".to_string());
        doc.append_child(doc.body(), el);
        el
    }

    #[test]
    fn test_callback_fires_when_element_appears() {
        let mut doc = doc();
        let mut sched = FrameScheduler::new();
        let seen = Rc::new(RefCell::new(None));
        let seen_in = Rc::clone(&seen);
        wait_for_element(
            &sched.handle(),
            sel("#cta"),
            &WatchConfig::default(),
            move |_, found| *seen_in.borrow_mut() = Some(found),
        );

        sched.step(&mut doc, TICK);
        sched.step(&mut doc, TICK);
        assert_eq!(*seen.borrow(), None);

        let el = add_cta(&mut doc);
        sched.step(&mut doc, TICK);
        assert_eq!(*seen.borrow(), Some(el));
        assert!(sched.is_idle());
    }

    #[test]
    fn test_existing_element_found_on_first_poll() {
        let mut doc = doc();
        let el = add_cta(&mut doc);
        let mut sched = FrameScheduler::new();
        let seen = Rc::new(RefCell::new(None));
        let seen_in = Rc::clone(&seen);
        wait_for_element(
            &sched.handle(),
            sel("#cta"),
            &WatchConfig::default(),
            move |_, found| *seen_in.borrow_mut() = Some(found),
        );

        sched.step(&mut doc, TICK);
        assert_eq!(*seen.borrow(), Some(el));
        assert!(sched.is_idle());
    }

    #[test]
    fn test_gives_up_after_timeout() {
        let mut doc = doc();
        let mut sched = FrameScheduler::new();
        let config = WatchConfig {
            poll_interval_ms: 100,
            wait_timeout_ms: 200,
            ..WatchConfig::default()
        };
        let fired = Rc::new(RefCell::new(false));
        let fired_in = Rc::clone(&fired);
        wait_for_element(&sched.handle(), sel("#missing"), &config, move |_, _| {
            *fired_in.borrow_mut() = true;
        });

        sched.step(&mut doc, TICK); // 100ms, within time
        sched.step(&mut doc, TICK); // 200ms, still within (bound is strict)
        assert!(!sched.is_idle());

        sched.step(&mut doc, TICK); // 300ms, over
        assert!(sched.is_idle());
        assert!(!*fired.borrow());
    }

    #[test]
    fn test_element_on_timeout_poll_still_wins() {
        let mut doc = doc();
        let mut sched = FrameScheduler::new();
        let config = WatchConfig {
            poll_interval_ms: 100,
            wait_timeout_ms: 200,
            ..WatchConfig::default()
        };
        let seen = Rc::new(RefCell::new(None));
        let seen_in = Rc::clone(&seen);
        wait_for_element(&sched.handle(), sel("#cta"), &config, move |_, found| {
            *seen_in.borrow_mut() = Some(found)
        });

        sched.step(&mut doc, TICK);
        sched.step(&mut doc, TICK);
        let el = add_cta(&mut doc);
        sched.step(&mut doc, TICK); // over time, but found on this poll
        assert_eq!(*seen.borrow(), Some(el));
    }

    #[test]
    fn test_cancelled_wait_never_fires() {
        let mut doc = doc();
        add_cta(&mut doc);
        let mut sched = FrameScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let fired_in = Rc::clone(&fired);
        let task = wait_for_element(
            &sched.handle(),
            sel("#cta"),
            &WatchConfig::default(),
            move |_, _| *fired_in.borrow_mut() = true,
        );

        sched.cancel(task);
        sched.step(&mut doc, TICK);
        assert!(!*fired.borrow());
        assert!(sched.is_idle());
    }
}
