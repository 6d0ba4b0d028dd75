//! Cancelable delayed-task scheduling.
//!
//! The engine's only asynchrony is two one-shot timers: the visibility-
//! scan throttle and the re-render unblock delay. It schedules them
//! through [`TimerScheduler`] and the host fires elapsed tasks back via
//! `Layout::timer_fired`. Scheduling a new timer for a purpose always
//! cancels the pending one first, so at most one timer per purpose is
//! ever outstanding.
//!
//! [`ManualScheduler`] is a deterministic implementation for tests and
//! for hosts that pump their own clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// The purposes the engine schedules timers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Run a throttled visibility scan.
    VisibilityScan,
    /// Resume re-render-on-zoom work after scrolling has settled.
    RerenderUnblock,
}

/// Opaque handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Create a handle from a raw id (for scheduler implementations).
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id of this handle.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A cooperative one-shot timer facility.
///
/// Implementations must guarantee that a canceled task never fires and
/// that a task fires at most once.
pub trait TimerScheduler {
    /// Schedule `task` to fire after `delay`.
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Cancel a pending task. Canceling an already-fired or unknown
    /// handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug)]
struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
    task: TimerTask,
}

#[derive(Debug, Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Deterministic scheduler driven by explicit [`advance`] calls.
///
/// Clones share the same queue, so a test can keep one handle while the
/// engine owns another boxed clone.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<ManualQueue>>);

impl ManualScheduler {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and pop every task that became due, in due
    /// order. The caller feeds the returned tasks to
    /// `Layout::timer_fired`.
    pub fn advance(&self, by: Duration) -> Vec<TimerTask> {
        let mut queue = self.0.borrow_mut();
        queue.now += by;
        let now = queue.now;

        let mut due: Vec<PendingTimer> = Vec::new();
        let mut still_pending = Vec::new();
        for timer in queue.pending.drain(..) {
            if timer.due <= now {
                due.push(timer);
            } else {
                still_pending.push(timer);
            }
        }
        queue.pending = still_pending;

        due.sort_by_key(|timer| (timer.due, timer.handle.get()));
        due.into_iter().map(|timer| timer.task).collect()
    }

    /// Number of tasks currently pending.
    pub fn pending_count(&self) -> usize {
        self.0.borrow().pending.len()
    }

    /// True if a task of the given kind is pending.
    pub fn has_pending(&self, task: TimerTask) -> bool {
        self.0.borrow().pending.iter().any(|timer| timer.task == task)
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerHandle {
        let mut queue = self.0.borrow_mut();
        queue.next_id += 1;
        let handle = TimerHandle::new(queue.next_id);
        let due = queue.now + delay;
        queue.pending.push(PendingTimer { handle, due, task });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.0.borrow_mut().pending.retain(|timer| timer.handle != handle);
    }
}
