//! Frame-clocked page watchers.
//!
//! Everything here runs as tasks on the
//! [`FrameScheduler`](crate::scheduler::FrameScheduler): waiting for an
//! element to appear, reacting to child-list changes and re-running setup
//! when a single-page site navigates. Timers are frame-quantized, so a
//! deadline fires on the first frame at or past it.

pub mod navigation;
pub mod observer;
pub mod wait;

pub use navigation::{DetectionStrategy, NavigationWatcher};
pub use observer::observe_added;
pub use wait::wait_for_element;

pub(crate) fn secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Deadline check tolerant of accumulated frame-time error, so a deadline
/// landing exactly on a frame boundary fires on that frame.
pub(crate) fn deadline_reached(now: f64, deadline: f64) -> bool {
    now + 1e-9 >= deadline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_tolerates_float_drift() {
        let mut now = 0.0;
        for _ in 0..5 {
            now += 0.1;
        }
        // five 100ms frames reach a 500ms deadline even when the sum
        // lands a hair under it
        assert!(deadline_reached(now, 0.5));
        assert!(!deadline_reached(0.4, 0.5));
    }

    #[test]
    fn test_secs_converts_milliseconds() {
        assert_eq!(secs(500), 0.5);
        assert_eq!(secs(0), 0.0);
    }
}
