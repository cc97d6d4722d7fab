//! Market runtime.
//!
//! Owns the `MarketView` and applies operator commands to it. Listing
//! snapshots and posted notifications are forwarded as `MarketEvent`s;
//! who listens is not the runtime's concern.

use std::collections::HashSet;
use std::rc::Rc;

use market_core::{
    AlertStore, KeyValueStore, Listing, MarketError, MarketView, NotificationCenter, RandomSource,
    Scheduler, ThreadRandom,
};
use market_protocol::Command;
use tracing::info;

use crate::config::Config;
use crate::types::{EventTx, ListingRow, MarketEvent};

pub struct MarketRuntime {
    view: MarketView,
}

impl MarketRuntime {
    /// Build the view and mount its tick timer right away; listings may
    /// arrive later through [`MarketRuntime::replace_listings`].
    pub fn start(
        config: &Config,
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn KeyValueStore>,
        events: EventTx,
    ) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(ThreadRandom::seeded(seed)),
            None => Box::new(ThreadRandom::new()),
        };
        MarketRuntime::with_random(config, scheduler, store, events, rng)
    }

    /// Like [`MarketRuntime::start`] with an explicit random source.
    pub fn with_random(
        config: &Config,
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn KeyValueStore>,
        events: EventTx,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let notifications = NotificationCenter::with_timings(scheduler.clone(), config.notifications);
        let alerts = AlertStore::new(store);

        {
            let events = events.clone();
            notifications.subscribe(move |message| {
                let _ = events.send(MarketEvent::Notification(message.clone()));
            });
        }

        let mut view = MarketView::new(alerts.clone(), notifications, rng);
        view.subscribe(move |listings| {
            let _ = events.send(MarketEvent::Listings(rows(&alerts, listings)));
        });
        view.mount(scheduler.as_ref(), config.tick_interval);

        MarketRuntime { view }
    }

    pub fn replace_listings(&self, listings: Vec<Listing>) {
        self.view.replace_listings(listings);
    }

    pub fn view(&self) -> &MarketView {
        &self.view
    }

    /// Apply one operator command.
    pub fn apply(&self, command: Command) -> Result<(), MarketError> {
        match command {
            Command::SetAlert {
                crop_id,
                condition,
                target_price,
            } => {
                let alert = self.view.set_alert(&crop_id, condition, target_price)?;
                info!(crop_id = %alert.crop_id, condition = alert.condition.as_str(), target = alert.target_price, "alert set");
            }
            Command::RemoveAlert { crop_id } => {
                self.view.remove_alert(&crop_id)?;
                info!(crop_id = %crop_id, "alert removed");
            }
            Command::Dismiss { id } => self.view.notifications().dismiss(id),
        }
        Ok(())
    }

    /// Cancel every timer the runtime registered.
    pub fn shutdown(&mut self) {
        self.view.unmount();
    }
}

fn rows(alerts: &AlertStore, listings: &[Listing]) -> Vec<ListingRow> {
    let watched: HashSet<String> = alerts.load().into_iter().map(|a| a.crop_id).collect();
    listings
        .iter()
        .map(|listing| ListingRow {
            has_alert: watched.contains(&listing.id),
            listing: listing.clone(),
        })
        .collect()
}
