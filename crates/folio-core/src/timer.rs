#![forbid(unsafe_code)]

//! Host-driven time: a deterministic clock plus a queue of delayed DOM edits.
//!
//! Every delay on the page (notification fades, status auto-hide, theme
//! transition reset, ripple cleanup, easter-egg reset) is a [`TimerTask`]
//! scheduled relative to the [`Scheduler`]'s current time. The host advances
//! the clock once per animation frame and applies whatever became due.
//!
//! # Invariants
//!
//! 1. The clock never moves backwards; `advance_to` with an earlier instant
//!    is ignored.
//! 2. Due tasks run in `(due, insertion)` order, so two tasks scheduled for
//!    the same instant apply in the order they were scheduled.
//! 3. A task runs at most once.

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::dom::{Dom, ElementId};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move to `now`; earlier instants are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// A delayed DOM edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    SetStyle {
        element: ElementId,
        property: &'static str,
        value: String,
    },
    SetText {
        element: ElementId,
        text: String,
    },
    /// Detach the element if it is still attached.
    Remove(ElementId),
    /// Hide the form status panel unless a newer status replaced it.
    HideStatus { panel: ElementId, sequence: u64 },
}

impl TimerTask {
    #[must_use]
    pub fn set_style(element: ElementId, property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            element,
            property,
            value: value.into(),
        }
    }

    /// Apply the task.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &D) {
        match self {
            Self::SetStyle {
                element,
                property,
                value,
            } => dom.set_style(*element, property, value),
            Self::SetText { element, text } => dom.set_text(*element, text),
            Self::Remove(element) => {
                if dom.is_connected(*element) {
                    dom.remove(*element);
                }
            }
            Self::HideStatus { panel, sequence } => {
                let current = dom
                    .attribute(*panel, crate::feedback::STATUS_SEQUENCE_ATTR)
                    .and_then(|raw| raw.parse::<u64>().ok());
                if current == Some(*sequence) {
                    dom.set_style(*panel, "display", "none");
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task_index: usize,
}

/// Shared timer queue keyed on the host clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    clock: RefCell<DeterministicClock>,
    heap: RefCell<BinaryHeap<Reverse<Scheduled>>>,
    tasks: RefCell<Vec<Option<TimerTask>>>,
    next_seq: Cell<u64>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.borrow().now()
    }

    /// Move the clock to the host's `now` without running anything.
    ///
    /// Event handlers call this before scheduling so that delays count from
    /// the event, not from the last animation frame.
    pub fn sync(&self, now: Duration) {
        self.clock.borrow_mut().set(now);
    }

    /// Schedule `task` to run `delay` after the current time.
    pub fn schedule_in(&self, delay: Duration, task: TimerTask) {
        let due = self.now().saturating_add(delay);
        let seq = self.next_seq.get();
        self.next_seq.set(seq.wrapping_add(1));
        let mut tasks = self.tasks.borrow_mut();
        let task_index = tasks.len();
        tasks.push(Some(task));
        self.heap.borrow_mut().push(Reverse(Scheduled {
            due,
            seq,
            task_index,
        }));
    }

    /// Number of tasks not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.heap.borrow().len()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.borrow().peek().map(|Reverse(s)| s.due)
    }

    /// Move the clock to `now` and take every task that became due.
    pub fn advance_to(&self, now: Duration) -> Vec<TimerTask> {
        self.clock.borrow_mut().set(now);
        let now = self.now();
        let mut due = Vec::new();
        let mut heap = self.heap.borrow_mut();
        let mut tasks = self.tasks.borrow_mut();
        while heap.peek().is_some_and(|Reverse(s)| s.due <= now) {
            let Some(Reverse(entry)) = heap.pop() else {
                break;
            };
            if let Some(task) = tasks.get_mut(entry.task_index).and_then(Option::take) {
                due.push(task);
            }
        }
        if heap.is_empty() {
            tasks.clear();
        }
        due
    }

    /// Advance the clock and apply every due task to `dom`.
    ///
    /// Returns how many tasks ran.
    pub fn run_due<D: Dom + ?Sized>(&self, dom: &D, now: Duration) -> usize {
        let due = self.advance_to(now);
        for task in &due {
            tracing::trace!(target: "folio.timer", task = ?task, "timer task due");
            task.apply(dom);
        }
        due.len()
    }
}
