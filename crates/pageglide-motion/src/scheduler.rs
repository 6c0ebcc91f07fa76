//! Cooperative frame stepper standing in for the host's animation-frame and
//! timer machinery.
//!
//! Hosts call [`FrameScheduler::step`] once per rendered frame. Tasks run in
//! spawn order with mutable access to the page; anything timer-like (delays,
//! debounces, polls) is expressed as deadline checks against the scheduler
//! clock passed to each task.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::trace;

use pageglide_core::page::Document;

/// What a task wants after one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Handle to a spawned task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

type Task = Box<dyn FnMut(&mut Document, f64) -> Control>;

#[derive(Default)]
struct SharedState {
    now: f64,
    next_handle: u64,
    pending: Vec<(TaskHandle, Task)>,
    cancelled: HashSet<TaskHandle>,
}

/// Cheap cloneable handle for spawning and cancelling tasks.
///
/// Task closures and engine teardown paths hold one of these; the scheduler
/// itself stays uniquely owned by the host loop. Spawns land in a pending
/// queue and join the run set at the start of the next step.
#[derive(Clone)]
pub struct SchedulerHandle {
    shared: Rc<RefCell<SharedState>>,
}

impl SchedulerHandle {
    /// Scheduler clock in seconds. Advances only through
    /// [`FrameScheduler::step`].
    pub fn now(&self) -> f64 {
        self.shared.borrow().now
    }

    pub fn spawn(&self, task: impl FnMut(&mut Document, f64) -> Control + 'static) -> TaskHandle {
        let mut shared = self.shared.borrow_mut();
        let handle = TaskHandle(shared.next_handle);
        shared.next_handle += 1;
        shared.pending.push((handle, Box::new(task)));
        handle
    }

    /// Cancel a task. Takes effect before its next run; cancelling an
    /// already-finished task is a no-op.
    pub fn cancel(&self, handle: TaskHandle) {
        self.shared.borrow_mut().cancelled.insert(handle);
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("SchedulerHandle")
            .field("now", &shared.now)
            .field("pending", &shared.pending.len())
            .finish()
    }
}

/// The frame loop driver. One per document.
pub struct FrameScheduler {
    active: Vec<(TaskHandle, Task)>,
    shared: Rc<RefCell<SharedState>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            shared: Rc::new(RefCell::new(SharedState::default())),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn now(&self) -> f64 {
        self.shared.borrow().now
    }

    /// Spawn directly on the scheduler. Equivalent to spawning through
    /// [`handle`](Self::handle).
    pub fn spawn(&mut self, task: impl FnMut(&mut Document, f64) -> Control + 'static) -> TaskHandle {
        self.handle().spawn(task)
    }

    pub fn cancel(&mut self, handle: TaskHandle) {
        self.handle().cancel(handle);
    }

    /// Live tasks, counting ones spawned but not yet admitted.
    pub fn task_count(&self) -> usize {
        self.active.len() + self.shared.borrow().pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.task_count() == 0
    }

    /// Advance the clock by `dt` seconds and run every task once.
    ///
    /// Tasks spawned during a step first run on the following step; tasks
    /// cancelled during a step are skipped from that point on, including
    /// later in the same step.
    pub fn step(&mut self, doc: &mut Document, dt: f64) {
        {
            let mut shared = self.shared.borrow_mut();
            shared.now += dt.max(0.0);
            let pending = std::mem::take(&mut shared.pending);
            let cancelled = &mut shared.cancelled;
            self.active
                .extend(pending.into_iter().filter(|(h, _)| !cancelled.remove(h)));
        }
        let now = self.shared.borrow().now;

        let mut index = 0;
        while index < self.active.len() {
            let handle = self.active[index].0;
            if self.shared.borrow_mut().cancelled.remove(&handle) {
                trace!(?handle, "task cancelled");
                drop(self.active.remove(index));
                continue;
            }
            match (self.active[index].1)(doc, now) {
                Control::Continue => index += 1,
                Control::Stop => {
                    trace!(?handle, "task finished");
                    drop(self.active.remove(index));
                }
            }
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::default()
    }

    #[test]
    fn test_tasks_run_in_spawn_order_each_step() {
        let mut sched = FrameScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b"] {
            let order = Rc::clone(&order);
            sched.spawn(move |_, _| {
                order.borrow_mut().push(name);
                Control::Continue
            });
        }

        let mut doc = doc();
        sched.step(&mut doc, 0.016);
        sched.step(&mut doc, 0.016);

        assert_eq!(*order.borrow(), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_clock_accumulates_dt() {
        let mut sched = FrameScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        sched.spawn(move |_, now| {
            seen_in.borrow_mut().push(now);
            Control::Continue
        });

        let mut doc = doc();
        sched.step(&mut doc, 0.5);
        sched.step(&mut doc, 0.25);

        let seen = seen.borrow();
        assert!((seen[0] - 0.5).abs() < 1e-9);
        assert!((seen[1] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_stop_retires_task() {
        let mut sched = FrameScheduler::new();
        let runs = Rc::new(RefCell::new(0u32));
        let runs_in = Rc::clone(&runs);
        sched.spawn(move |_, _| {
            *runs_in.borrow_mut() += 1;
            Control::Stop
        });

        let mut doc = doc();
        sched.step(&mut doc, 0.016);
        sched.step(&mut doc, 0.016);

        assert_eq!(*runs.borrow(), 1);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_cancel_prevents_future_runs() {
        let mut sched = FrameScheduler::new();
        let runs = Rc::new(RefCell::new(0u32));
        let runs_in = Rc::clone(&runs);
        let task = sched.spawn(move |_, _| {
            *runs_in.borrow_mut() += 1;
            Control::Continue
        });

        let mut doc = doc();
        sched.step(&mut doc, 0.016);
        sched.cancel(task);
        sched.step(&mut doc, 0.016);

        assert_eq!(*runs.borrow(), 1);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_cancel_before_first_run_discards_pending_task() {
        let mut sched = FrameScheduler::new();
        let runs = Rc::new(RefCell::new(0u32));
        let runs_in = Rc::clone(&runs);
        let task = sched.spawn(move |_, _| {
            *runs_in.borrow_mut() += 1;
            Control::Continue
        });
        sched.cancel(task);

        let mut doc = doc();
        sched.step(&mut doc, 0.016);

        assert_eq!(*runs.borrow(), 0);
        assert!(sched.is_idle());
    }

    #[test]
    fn test_task_cancelled_earlier_in_same_step_does_not_run() {
        let mut sched = FrameScheduler::new();
        let handle = sched.handle();
        let runs = Rc::new(RefCell::new(0u32));

        // first task cancels the second before it gets its turn
        let victim = Rc::new(RefCell::new(None));
        let victim_in = Rc::clone(&victim);
        sched.spawn(move |_, _| {
            if let Some(task) = *victim_in.borrow() {
                handle.cancel(task);
            }
            Control::Continue
        });
        let runs_in = Rc::clone(&runs);
        let second = sched.spawn(move |_, _| {
            *runs_in.borrow_mut() += 1;
            Control::Continue
        });
        *victim.borrow_mut() = Some(second);

        let mut doc = doc();
        sched.step(&mut doc, 0.016);

        assert_eq!(*runs.borrow(), 0);
    }

    #[test]
    fn test_spawn_during_step_runs_next_step() {
        let mut sched = FrameScheduler::new();
        let handle = sched.handle();
        let runs = Rc::new(RefCell::new(0u32));
        let runs_in = Rc::clone(&runs);

        sched.spawn(move |_, _| {
            let runs_inner = Rc::clone(&runs_in);
            handle.spawn(move |_, _| {
                *runs_inner.borrow_mut() += 1;
                Control::Continue
            });
            Control::Stop
        });

        let mut doc = doc();
        sched.step(&mut doc, 0.016);
        assert_eq!(*runs.borrow(), 0);
        sched.step(&mut doc, 0.016);
        assert_eq!(*runs.borrow(), 1);
    }
}
