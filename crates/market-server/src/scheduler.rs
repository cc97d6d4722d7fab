//! [`Scheduler`] backed by tokio timers.
//!
//! Every timer is a `spawn_local` task, so the scheduler must be used from
//! inside a [`tokio::task::LocalSet`] on a current-thread runtime.
//! Cancelling a [`TimerHandle`] aborts the task.

use std::time::Duration;

use market_core::{OnceTask, RepeatingTask, Scheduler, TimerHandle};
use tokio::task;
use tokio::time::{self, Instant, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        TokioScheduler
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, mut task: RepeatingTask) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let handle = TimerHandle::new();
        let guard = handle.clone();

        let join = task::spawn_local(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if guard.is_cancelled() {
                    break;
                }
                task();
            }
        });

        handle.set_on_cancel(move || join.abort());
        handle
    }

    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerHandle {
        let handle = TimerHandle::new();
        let guard = handle.clone();

        let join = task::spawn_local(async move {
            time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });

        handle.set_on_cancel(move || join.abort());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn repeating_timer_fires_each_interval_until_cancelled() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let count = Rc::new(Cell::new(0));
                let c = count.clone();
                let handle = TokioScheduler
                    .schedule_repeating(ms(100), Box::new(move || c.set(c.get() + 1)));

                time::sleep(ms(350)).await;
                assert_eq!(count.get(), 3);

                handle.cancel();
                time::sleep(ms(500)).await;
                assert_eq!(count.get(), 3);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn once_timer_fires_once() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(Cell::new(0));
                let f = fired.clone();
                TokioScheduler.schedule_once(ms(2000), Box::new(move || f.set(f.get() + 1)));

                time::sleep(ms(1999)).await;
                assert_eq!(fired.get(), 0);
                time::sleep(ms(10)).await;
                assert_eq!(fired.get(), 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancelled_once_timer_never_fires() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let f = fired.clone();
                let handle = TokioScheduler.schedule_once(ms(300), Box::new(move || f.set(true)));

                time::sleep(ms(100)).await;
                handle.cancel();
                handle.cancel();
                time::sleep(ms(1000)).await;
                assert!(!fired.get());
            })
            .await;
    }
}
