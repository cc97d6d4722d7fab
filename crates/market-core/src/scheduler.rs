//! Timer scheduling.
//!
//! Views never touch a clock directly. They register callbacks through
//! the [`Scheduler`] trait and keep the returned [`TimerHandle`] so the
//! timer can be cancelled on teardown:
//!
//! - [`VirtualScheduler`]: manual clock driven by [`VirtualScheduler::advance`],
//!   used by tests.
//! - `TokioScheduler` (in `market-server`): `spawn_local` tasks on a
//!   current-thread runtime.
//!
//! Execution is single-threaded and cooperative, so tasks are `!Send`
//! closures that typically hold `Rc`/`Weak` handles to view state.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Callback run on every interval.
pub type RepeatingTask = Box<dyn FnMut()>;

/// Callback run once after a delay.
pub type OnceTask = Box<dyn FnOnce()>;

/// Registers timer callbacks on a run loop.
pub trait Scheduler {
    /// Run `task` every `interval` until the handle is cancelled.
    /// The first run happens one full interval after registration.
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> TimerHandle;

    /// Run `task` once after `delay` unless the handle is cancelled first.
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerHandle;
}

/// Cancellation handle for a scheduled timer.
///
/// Clones share state: cancelling any clone cancels the timer.
/// Cancelling twice is harmless.
#[derive(Clone, Default)]
pub struct TimerHandle {
    state: Rc<TimerState>,
}

#[derive(Default)]
struct TimerState {
    cancelled: Cell<bool>,
    on_cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl TimerHandle {
    pub fn new() -> Self {
        TimerHandle::default()
    }

    /// Install a hook run on the first `cancel()` (e.g. abort a task).
    /// If the handle is already cancelled the hook runs immediately.
    pub fn set_on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
            return;
        }
        *self.state.on_cancel.borrow_mut() = Some(Box::new(hook));
    }

    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        let hook = self.state.on_cancel.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Virtual clock
// -----------------------------------------------------------------------------

/// Shortest interval a repeating timer may use; zero would never let
/// `advance` make progress.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A manually driven clock.
///
/// Timers fire inside [`advance`](VirtualScheduler::advance) in due-time
/// order; timers due at the same instant fire in registration order.
/// Callbacks may register or cancel timers while running.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Pending>,
}

struct Pending {
    handle: TimerHandle,
    kind: PendingKind,
}

enum PendingKind {
    Once(OnceTask),
    Repeating {
        interval: Duration,
        task: RepeatingTask,
    },
}

impl VirtualScheduler {
    pub fn new() -> Self {
        VirtualScheduler::default()
    }

    /// Time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of registered timers that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.clock
            .borrow()
            .queue
            .values()
            .filter(|p| !p.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                match clock.queue.first_key_value() {
                    Some((&(due, _), _)) if due <= target => {}
                    _ => break,
                }
                let Some(((due, _), pending)) = clock.queue.pop_first() else {
                    break;
                };
                clock.now = due;
                (due, pending)
            };

            let (due, Pending { handle, kind }) = next;
            if handle.is_cancelled() {
                continue;
            }

            match kind {
                PendingKind::Once(task) => task(),
                PendingKind::Repeating { interval, mut task } => {
                    task();
                    if !handle.is_cancelled() {
                        self.push(
                            due + interval,
                            Pending {
                                handle,
                                kind: PendingKind::Repeating { interval, task },
                            },
                        );
                    }
                }
            }
        }

        self.clock.borrow_mut().now = target;
    }

    fn push(&self, due: Duration, pending: Pending) {
        let mut clock = self.clock.borrow_mut();
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.queue.insert((due, seq), pending);
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let handle = TimerHandle::new();
        let due = self.now() + interval;
        self.push(
            due,
            Pending {
                handle: handle.clone(),
                kind: PendingKind::Repeating { interval, task },
            },
        );
        handle
    }

    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerHandle {
        let handle = TimerHandle::new();
        let due = self.now() + delay;
        self.push(
            due,
            Pending {
                handle: handle.clone(),
                kind: PendingKind::Once(task),
            },
        );
        handle
    }
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn once_fires_at_its_due_time() {
        let sched = VirtualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        sched.schedule_once(ms(300), Box::new(move || flag.set(true)));

        sched.advance(ms(299));
        assert!(!fired.get());
        sched.advance(ms(1));
        assert!(fired.get());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn repeating_fires_every_interval_until_cancelled() {
        let sched = VirtualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = sched.schedule_repeating(ms(5000), Box::new(move || c.set(c.get() + 1)));

        sched.advance(ms(15_000));
        assert_eq!(count.get(), 3);

        handle.cancel();
        sched.advance(ms(50_000));
        assert_eq!(count.get(), 3);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn callbacks_can_schedule_more_timers() {
        let sched = VirtualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_sched = sched.clone();
        let inner_log = log.clone();
        sched.schedule_once(
            ms(100),
            Box::new(move || {
                inner_log.borrow_mut().push(inner_sched.now());
                let l = inner_log.clone();
                let s = inner_sched.clone();
                inner_sched.schedule_once(ms(50), Box::new(move || l.borrow_mut().push(s.now())));
            }),
        );

        sched.advance(ms(1000));
        assert_eq!(*log.borrow(), vec![ms(100), ms(150)]);
        assert_eq!(sched.now(), ms(1000));
    }

    #[test]
    fn cancel_hook_runs_once() {
        let handle = TimerHandle::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        handle.set_on_cancel(move || h.set(h.get() + 1));

        handle.cancel();
        handle.clone().cancel();
        assert_eq!(hits.get(), 1);
        assert!(handle.is_cancelled());
    }
}
