//! Transient user-facing messages with timed dismissal.
//!
//! Each message lives on its own timers:
//!
//! ```text
//! post ──(visible, 4000 ms)──> exiting ──(exit, 300 ms)──> removed
//! dismiss ─────────────────────> exiting ──(exit, 300 ms)──> removed
//! ```
//!
//! Posting another message never restarts or extends an existing one's
//! timers. [`NotificationCenter::shutdown`] cancels everything still
//! pending so nothing fires after the owning view is gone.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use crate::scheduler::{Scheduler, TimerHandle};

/// Time a message stays fully visible before its exit transition.
pub const VISIBLE_DURATION: Duration = Duration::from_millis(4000);

/// Length of the exit transition before the message is removed.
pub const EXIT_DURATION: Duration = Duration::from_millis(300);

pub type NotificationId = u64;

/// Per-message lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimings {
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        NotificationTimings {
            visible: VISIBLE_DURATION,
            exit: EXIT_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    /// Exit transition running; removal follows after the exit delay.
    Exiting,
}

/// One queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub id: NotificationId,
    pub message: String,
    pub phase: NotificationPhase,
}

type PostObserver = Box<dyn FnMut(&NotificationMessage)>;

struct Entry {
    message: NotificationMessage,
    timer: TimerHandle,
}

#[derive(Default)]
struct Queue {
    next_id: NotificationId,
    entries: Vec<Entry>,
    observers: Vec<PostObserver>,
}

/// Message queue shared by everything that wants to tell the user something.
///
/// Clones share the same queue.
#[derive(Clone)]
pub struct NotificationCenter {
    queue: Rc<RefCell<Queue>>,
    scheduler: Rc<dyn Scheduler>,
    timings: NotificationTimings,
}

impl NotificationCenter {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        NotificationCenter::with_timings(scheduler, NotificationTimings::default())
    }

    pub fn with_timings(scheduler: Rc<dyn Scheduler>, timings: NotificationTimings) -> Self {
        NotificationCenter {
            queue: Rc::new(RefCell::new(Queue::default())),
            scheduler,
            timings,
        }
    }

    /// Append a message and start its lifetime. Identical text posted
    /// twice gives two independent entries.
    pub fn post(&self, message: impl Into<String>) -> NotificationId {
        let id = {
            let mut queue = self.queue.borrow_mut();
            queue.next_id += 1;
            queue.next_id
        };

        let weak = Rc::downgrade(&self.queue);
        let scheduler = self.scheduler.clone();
        let exit = self.timings.exit;
        let timer = self.scheduler.schedule_once(
            self.timings.visible,
            Box::new(move || {
                if let Some(queue) = weak.upgrade() {
                    begin_exit(&queue, scheduler.as_ref(), id, exit, false);
                }
            }),
        );

        let message = NotificationMessage {
            id,
            message: message.into(),
            phase: NotificationPhase::Visible,
        };
        debug!(id, message = %message.message, "notification posted");

        // Observers run without the queue borrowed so they may read it.
        let mut observers = {
            let mut queue = self.queue.borrow_mut();
            queue.entries.push(Entry {
                message: message.clone(),
                timer,
            });
            std::mem::take(&mut queue.observers)
        };
        for observer in observers.iter_mut() {
            observer(&message);
        }
        let mut queue = self.queue.borrow_mut();
        observers.append(&mut queue.observers);
        queue.observers = observers;

        id
    }

    /// Start the exit transition now instead of waiting out the visible time.
    /// Unknown or already-exiting ids are ignored.
    pub fn dismiss(&self, id: NotificationId) {
        begin_exit(&self.queue, self.scheduler.as_ref(), id, self.timings.exit, true);
    }

    /// Snapshot of the queue in posting order.
    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.queue
            .borrow()
            .entries
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().entries.is_empty()
    }

    /// Call `observer` with every message as it is posted.
    pub fn subscribe(&self, observer: impl FnMut(&NotificationMessage) + 'static) {
        self.queue.borrow_mut().observers.push(Box::new(observer));
    }

    /// Cancel every pending timer and drop all messages.
    pub fn shutdown(&self) {
        let entries = std::mem::take(&mut self.queue.borrow_mut().entries);
        for entry in entries {
            entry.timer.cancel();
        }
    }
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("timings", &self.timings)
            .field("messages", &self.messages())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Internal helpers
// -----------------------------------------------------------------------------

/// Move `id` to `Exiting` and schedule its removal.
///
/// `cancel_visible` is set for user dismissal, where the visible-time
/// timer is still pending; when called from that timer it has already
/// fired.
fn begin_exit(
    queue: &Rc<RefCell<Queue>>,
    scheduler: &dyn Scheduler,
    id: NotificationId,
    exit: Duration,
    cancel_visible: bool,
) {
    let visible_timer = {
        let mut guard = queue.borrow_mut();
        let Some(entry) = guard.entries.iter_mut().find(|e| e.message.id == id) else {
            return;
        };
        if entry.message.phase == NotificationPhase::Exiting {
            return;
        }
        entry.message.phase = NotificationPhase::Exiting;
        entry.timer.clone()
    };

    if cancel_visible {
        visible_timer.cancel();
    }

    let weak: Weak<RefCell<Queue>> = Rc::downgrade(queue);
    let removal = scheduler.schedule_once(
        exit,
        Box::new(move || {
            if let Some(queue) = weak.upgrade() {
                queue.borrow_mut().entries.retain(|e| e.message.id != id);
            }
        }),
    );

    let mut guard = queue.borrow_mut();
    if let Some(entry) = guard.entries.iter_mut().find(|e| e.message.id == id) {
        entry.timer = removal;
    }
}
