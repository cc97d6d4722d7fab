//! The live market view: owns the price feed and drives it from a timer.
//!
//! On mount a repeating tick is registered with the injected
//! [`Scheduler`]. Each tick:
//!
//! 1. updates every listing price,
//! 2. runs the alert evaluator against that snapshot,
//! 3. hands the snapshot to listing observers (renderers).
//!
//! Unmounting (or dropping the view) cancels the tick timer and every
//! notification timer, so no callback fires after teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, info};

use crate::alert::{AlertCondition, PriceAlert};
use crate::alert_evaluator::{AlertEvaluator, FiredAlert};
use crate::alert_store::AlertStore;
use crate::error::MarketError;
use crate::listing::Listing;
use crate::notification::NotificationCenter;
use crate::price_feed::PriceFeed;
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TimerHandle};

type ListingObserver = Box<dyn FnMut(&[Listing])>;

struct ViewInner {
    feed: RefCell<PriceFeed>,
    rng: RefCell<Box<dyn RandomSource>>,
    evaluator: AlertEvaluator,
    notifications: NotificationCenter,
    observers: RefCell<Vec<ListingObserver>>,
}

pub struct MarketView {
    inner: Rc<ViewInner>,
    tick_timer: Option<TimerHandle>,
}

impl MarketView {
    /// Build an unmounted view with no listings yet; they usually arrive
    /// later through [`MarketView::replace_listings`].
    pub fn new(
        store: AlertStore,
        notifications: NotificationCenter,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        MarketView {
            inner: Rc::new(ViewInner {
                feed: RefCell::new(PriceFeed::default()),
                rng: RefCell::new(rng),
                evaluator: AlertEvaluator::new(store),
                notifications,
                observers: RefCell::new(Vec::new()),
            }),
            tick_timer: None,
        }
    }

    /// Start ticking every `interval`. Mounting again replaces the
    /// previous timer.
    pub fn mount(&mut self, scheduler: &dyn Scheduler, interval: Duration) {
        self.cancel_tick();

        let weak: Weak<ViewInner> = Rc::downgrade(&self.inner);
        let handle = scheduler.schedule_repeating(
            interval,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    tick_inner(&inner);
                }
            }),
        );
        info!(interval_ms = interval.as_millis() as u64, "market view mounted");
        self.tick_timer = Some(handle);
    }

    /// Cancel the tick timer and all outstanding notification timers.
    pub fn unmount(&mut self) {
        if self.tick_timer.is_some() {
            info!("market view unmounted");
        }
        self.cancel_tick();
        self.inner.notifications.shutdown();
    }

    pub fn is_mounted(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Run one tick now, outside the timer.
    pub fn tick(&self) -> Vec<FiredAlert> {
        tick_inner(&self.inner)
    }

    /// Swap in a freshly loaded listing set. Does not touch the timer.
    pub fn replace_listings(&self, listings: Vec<Listing>) {
        self.inner.feed.borrow_mut().replace_listings(listings);
        let snapshot = self.listings();
        debug!(count = snapshot.len(), "listings replaced");
        notify_observers(&self.inner, &snapshot);
    }

    /// Snapshot of the current listings.
    pub fn listings(&self) -> Vec<Listing> {
        self.inner.feed.borrow().listings().to_vec()
    }

    pub fn listing(&self, id: &str) -> Option<Listing> {
        self.inner.feed.borrow().get(id).cloned()
    }

    /// Listings whose name or farm contains `term`.
    pub fn search(&self, term: &str) -> Vec<Listing> {
        self.inner
            .feed
            .borrow()
            .search(term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn tick_count(&self) -> u64 {
        self.inner.feed.borrow().tick_count()
    }

    /// Call `observer` with the listing snapshot after every tick and
    /// every listing replacement.
    pub fn subscribe(&self, observer: impl FnMut(&[Listing]) + 'static) {
        self.inner.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn alerts(&self) -> &AlertStore {
        self.inner.evaluator.store()
    }

    /// Create or replace the alert for a listing currently in the view.
    pub fn set_alert(
        &self,
        listing_id: &str,
        condition: AlertCondition,
        target_price: f64,
    ) -> Result<PriceAlert, MarketError> {
        let listing = self
            .listing(listing_id)
            .ok_or_else(|| MarketError::UnknownListing(listing_id.to_string()))?;
        let alert = PriceAlert::for_listing(&listing, condition, target_price)?;
        self.alerts().set(alert.clone())?;
        Ok(alert)
    }

    pub fn remove_alert(&self, listing_id: &str) -> Result<(), MarketError> {
        self.alerts().remove(listing_id)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    fn cancel_tick(&mut self) {
        if let Some(timer) = self.tick_timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for MarketView {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for MarketView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketView")
            .field("listings", &self.inner.feed.borrow().len())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

fn tick_inner(inner: &ViewInner) -> Vec<FiredAlert> {
    {
        let mut rng = inner.rng.borrow_mut();
        inner.feed.borrow_mut().tick(rng.as_mut());
    }

    let snapshot = inner.feed.borrow().listings().to_vec();
    let fired = inner.evaluator.run(&snapshot, &inner.notifications);
    notify_observers(inner, &snapshot);
    fired
}

fn notify_observers(inner: &ViewInner, snapshot: &[Listing]) {
    let mut observers = std::mem::take(&mut *inner.observers.borrow_mut());
    for observer in observers.iter_mut() {
        observer(snapshot);
    }
    let mut slot = inner.observers.borrow_mut();
    observers.append(&mut slot);
    *slot = observers;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::scheduler::VirtualScheduler;
    use crate::store::MemoryStore;

    const TICK: Duration = Duration::from_millis(5000);

    fn view() -> (MarketView, VirtualScheduler) {
        let sched = VirtualScheduler::new();
        let notifications = NotificationCenter::new(Rc::new(sched.clone()));
        let store = AlertStore::new(Rc::new(MemoryStore::new()));
        let view = MarketView::new(store, notifications, Box::new(SequenceRandom::constant(1.0)));
        view.replace_listings(vec![
            Listing::new("1", "Hard Red Wheat", 100.0, "/ bushel"),
            Listing::new("2", "Soybeans", 200.0, "/ bushel"),
        ]);
        (view, sched)
    }

    #[test]
    fn ticks_only_while_mounted() {
        let (mut view, sched) = view();
        view.mount(&sched, TICK);

        sched.advance(TICK);
        assert_eq!(view.tick_count(), 1);
        assert!(view.listing("1").unwrap().price > 100.0);

        view.unmount();
        sched.advance(TICK * 3);
        assert_eq!(view.tick_count(), 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn set_alert_requires_known_listing() {
        let (view, _) = view();
        let err = view.set_alert("99", AlertCondition::Above, 10.0).unwrap_err();
        assert!(matches!(err, MarketError::UnknownListing(_)));

        let alert = view.set_alert("2", AlertCondition::Below, 150.0).unwrap();
        assert_eq!(alert.crop_name, "Soybeans");
        assert!(view.alerts().has("2"));

        view.remove_alert("2").unwrap();
        assert!(!view.alerts().has("2"));
    }

    #[test]
    fn observers_receive_tick_snapshots() {
        let (view, _) = view();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.subscribe(move |listings| sink.borrow_mut().push(listings.len()));

        view.tick();
        view.tick();
        assert_eq!(*seen.borrow(), vec![2, 2]);
    }

    #[test]
    fn dropping_the_view_cancels_its_timers() {
        let (mut view, sched) = view();
        view.mount(&sched, TICK);
        view.set_alert("1", AlertCondition::Above, 100.5).unwrap();
        view.tick();
        assert_eq!(view.notifications().len(), 1);
        assert_eq!(sched.pending(), 2);

        drop(view);
        assert_eq!(sched.pending(), 0);
    }
}
