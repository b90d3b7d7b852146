//! Cooperative timers polled against an explicit clock reading.
//!
//! Nothing here sleeps or spawns: the host passes `now` to `poll` and a timer
//! reports whether it fired. Every timer a run arms is recorded in that run's
//! `TimerRegistry`, which is how a whole run is cancelled at once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Armed,
    /// A one-shot that has gone off. Recurring timers never reach this.
    Fired,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TimerHandle(Rc<Cell<TimerState>>);

impl TimerHandle {
    fn new(state: TimerState) -> Self {
        Self(Rc::new(Cell::new(state)))
    }

    pub fn state(&self) -> TimerState {
        self.0.get()
    }

    pub fn is_armed(&self) -> bool {
        self.state() == TimerState::Armed
    }

    /// No-op on a timer that already fired or was cancelled.
    pub fn cancel(&self) {
        if self.is_armed() {
            self.0.set(TimerState::Cancelled);
        }
    }
}

/// A recurring timer.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
    handle: TimerHandle,
}

impl Interval {
    /// Fires at most once per call. If the caller fell behind by more than a
    /// period, missed periods are skipped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.handle.is_armed() || now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.handle.is_armed().then_some(self.next_due)
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn handle(&self) -> &TimerHandle {
        &self.handle
    }
}

/// A one-shot timer.
#[derive(Debug)]
pub struct Timeout {
    due: Instant,
    handle: TimerHandle,
}

impl Timeout {
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.handle.is_armed() || now < self.due {
            return false;
        }
        self.handle.0.set(TimerState::Fired);
        true
    }

    pub fn due(&self) -> Option<Instant> {
        self.handle.is_armed().then_some(self.due)
    }

    pub fn handle(&self) -> &TimerHandle {
        &self.handle
    }
}

#[derive(Debug, Default)]
struct Registry {
    recurring: Vec<TimerHandle>,
    deferred: Vec<TimerHandle>,
    closed: bool,
}

/// Every timer one run has armed. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct TimerRegistry(Rc<RefCell<Registry>>);

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn initial_state(&self) -> TimerState {
        if self.0.borrow().closed {
            TimerState::Cancelled
        } else {
            TimerState::Armed
        }
    }

    /// Arm a recurring timer whose first firing is one `period` after `now`.
    pub fn interval(&self, now: Instant, period: Duration) -> Interval {
        let handle = TimerHandle::new(self.initial_state());
        self.0.borrow_mut().recurring.push(handle.clone());
        Interval {
            period,
            next_due: now + period,
            handle,
        }
    }

    pub fn timeout(&self, now: Instant, delay: Duration) -> Timeout {
        let handle = TimerHandle::new(self.initial_state());
        self.0.borrow_mut().deferred.push(handle.clone());
        Timeout {
            due: now + delay,
            handle,
        }
    }

    /// Cancel everything armed so far and anything armed later.
    pub fn cancel_all(&self) {
        let mut registry = self.0.borrow_mut();
        registry.closed = true;
        for handle in registry.recurring.iter().chain(&registry.deferred) {
            handle.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }

    /// Number of timers still able to fire.
    pub fn live(&self) -> usize {
        let registry = self.0.borrow();
        registry
            .recurring
            .iter()
            .chain(&registry.deferred)
            .filter(|h| h.is_armed())
            .count()
    }

    /// `(recurring, deferred)` entry counts, live or not.
    pub fn len(&self) -> (usize, usize) {
        let registry = self.0.borrow();
        (registry.recurring.len(), registry.deferred.len())
    }
}

/// Handle on one started run. Dropping it does not stop the run; `cancel`
/// does.
#[derive(Debug, Clone)]
pub struct RunHandle {
    timers: TimerRegistry,
}

impl RunHandle {
    pub(crate) fn new(timers: TimerRegistry) -> Self {
        Self { timers }
    }

    pub fn cancel(&self) {
        self.timers.cancel_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.timers.is_closed()
    }

    pub fn live_timers(&self) -> usize {
        self.timers.live()
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }
}
