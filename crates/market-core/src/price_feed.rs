//! Simulated live prices.
//!
//! Every tick applies a multiplicative random walk to each listing:
//!
//! ```text
//! delta = (u - 0.5) * 0.02        u ~ U[0, 1)
//! price = price * (1 + delta)     delta in [-1%, +1%)
//! ```
//!
//! The walk is not mean-reverting and is never clamped; a price can
//! drift arbitrarily far from where it started. Since `1 + delta > 0`,
//! a positive price stays positive.

use std::time::Duration;

use tracing::warn;

use crate::listing::Listing;
use crate::random::RandomSource;

/// Interval between ticks in the reference behavior.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Width of the per-tick perturbation band (`0.02` = ±1 %).
pub const PRICE_STEP_RANGE: f64 = 0.02;

/// Perturbation for a uniform draw `u ∈ [0, 1)`.
pub fn price_delta(u: f64) -> f64 {
    (u - 0.5) * PRICE_STEP_RANGE
}

/// The authoritative in-memory listing set of one market view.
#[derive(Debug, Clone, Default)]
pub struct PriceFeed {
    listings: Vec<Listing>,
    ticks: u64,
}

impl PriceFeed {
    /// Seed a feed. Listings without a finite positive price are dropped.
    pub fn new(listings: Vec<Listing>) -> Self {
        PriceFeed {
            listings: retain_tradable(listings),
            ticks: 0,
        }
    }

    /// Swap in a freshly fetched listing set (e.g. when an async fetch
    /// completes after the tick timer was registered).
    pub fn replace_listings(&mut self, listings: Vec<Listing>) {
        self.listings = retain_tradable(listings);
    }

    /// Apply one random-walk step to every listing.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        for listing in &mut self.listings {
            let delta = price_delta(rng.next());
            listing.price *= 1.0 + delta;
        }
        self.ticks += 1;
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings whose name or farm contains `term` (case-insensitive).
    pub fn search(&self, term: &str) -> Vec<&Listing> {
        self.listings.iter().filter(|l| l.matches(term)).collect()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Number of ticks applied since the feed was created.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

fn retain_tradable(listings: Vec<Listing>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| {
            let ok = l.has_valid_price();
            if !ok {
                warn!(id = %l.id, price = l.price, "dropping listing without a positive price");
            }
            ok
        })
        .collect()
}
