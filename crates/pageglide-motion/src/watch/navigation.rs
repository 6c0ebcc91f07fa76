//! Re-running setup when a single-page site navigates.
//!
//! Soft navigations swap content without reloading, so anything wired to
//! the page has to be wired again. The watcher compares the location
//! between frames and reruns its callback once things settle.

use tracing::{debug, info};

use pageglide_core::config::WatchConfig;
use pageglide_core::page::Document;

use crate::scheduler::{Control, SchedulerHandle, TaskHandle};

use super::{deadline_reached, secs};

/// How location changes are noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStrategy {
    /// Check the location only on frames where child-list changes were
    /// recorded. Cheap, and sufficient for sites that redraw on navigation.
    Mutations,
    /// Check the location every `interval_ms`, catching navigations that
    /// change no markup.
    Poll { interval_ms: u64 },
}

/// Watches for navigations and re-runs a setup callback.
///
/// The callback fires once after an initial delay, then again a debounce
/// after each detected location change. Changes arriving inside the
/// debounce window collapse into a single run.
#[derive(Debug, Clone)]
pub struct NavigationWatcher {
    initial_delay: f64,
    debounce: f64,
    strategy: DetectionStrategy,
}

impl NavigationWatcher {
    /// Watcher with the configured timings; detection defaults to
    /// [`DetectionStrategy::Mutations`].
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            initial_delay: secs(config.initial_delay_ms),
            debounce: secs(config.nav_debounce_ms),
            strategy: DetectionStrategy::Mutations,
        }
    }

    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Spawn the watcher task. The location at spawn time is the baseline;
    /// the task runs until cancelled.
    pub fn spawn(
        self,
        doc: &Document,
        sched: &SchedulerHandle,
        mut callback: impl FnMut(&mut Document) + 'static,
    ) -> TaskHandle {
        info!(strategy = ?self.strategy, "navigation watcher started");
        let start = sched.now();
        let mut initial_at = Some(start + self.initial_delay);
        let mut fire_at: Option<f64> = None;
        let mut last_location = doc.location().to_string();
        let mut cursor = doc.revision();
        let mut next_poll = start;
        sched.spawn(move |doc, now| {
            let check = match self.strategy {
                DetectionStrategy::Mutations => {
                    let revision = doc.revision();
                    let churned = revision != cursor;
                    cursor = revision;
                    churned
                }
                DetectionStrategy::Poll { interval_ms } => {
                    if deadline_reached(now, next_poll) {
                        next_poll = now + secs(interval_ms);
                        true
                    } else {
                        false
                    }
                }
            };
            if check && last_location != doc.location() {
                last_location = doc.location().to_string();
                debug!(location = %last_location, "navigation detected");
                fire_at = Some(now + self.debounce);
            }

            if let Some(at) = initial_at {
                if deadline_reached(now, at) {
                    initial_at = None;
                    callback(doc);
                }
            }
            if let Some(at) = fire_at {
                if deadline_reached(now, at) {
                    fire_at = None;
                    callback(doc);
                }
            }
            Control::Continue
        })
    }
}
