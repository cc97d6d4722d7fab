//! Trade offer totals and the simulated submission flow.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::info;

use crate::money::parse_positive_amount;
use crate::scheduler::{Scheduler, TimerHandle};

/// Fixed platform surcharge applied to every offer.
pub const PLATFORM_FEE_RATE: f64 = 0.01;

/// Quantity the offer form starts at.
pub const DEFAULT_QUANTITY: u32 = 10;

/// Simulated round-trip before a submitted offer reports success.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Offer quantity; never below 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(u32);

impl Quantity {
    /// Clamp to at least 1.
    pub fn new(value: u32) -> Self {
        Quantity(value.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Step by `delta`; the result is clamped to `[1, u32::MAX]`.
    pub fn adjust(&mut self, delta: i64) {
        let next = (self.0 as i64).saturating_add(delta);
        self.0 = next.clamp(1, u32::MAX as i64) as u32;
    }

    pub fn increment(&mut self) {
        self.adjust(1);
    }

    pub fn decrement(&mut self) {
        self.adjust(-1);
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity(DEFAULT_QUANTITY)
    }
}

/// Derived totals for an offer.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct OfferQuote {
    pub total_offer_value: f64,
    pub platform_fee: f64,
    pub total: f64,
}

impl OfferQuote {
    /// Totals from a quantity and free-text unit price.
    ///
    /// Unparseable or non-positive prices give an all-zero quote.
    pub fn compute(quantity: Quantity, unit_price: &str) -> Self {
        match parse_positive_amount(unit_price) {
            Some(price) => OfferQuote::from_price(quantity, price),
            None => OfferQuote::default(),
        }
    }

    /// Totals from an already-parsed price.
    pub fn from_price(quantity: Quantity, unit_price: f64) -> Self {
        if !(unit_price.is_finite() && unit_price > 0.0) {
            return OfferQuote::default();
        }
        let total_offer_value = quantity.get() as f64 * unit_price;
        let platform_fee = total_offer_value * PLATFORM_FEE_RATE;
        OfferQuote {
            total_offer_value,
            platform_fee,
            total: total_offer_value + platform_fee,
        }
    }

    /// Submission is only enabled for a positive total.
    pub fn can_submit(&self) -> bool {
        self.total > 0.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OfferStatus {
    Idle,
    Submitting,
    Success,
}

/// Offer entry state for one listing.
///
/// Submission is simulated: after [`SUBMIT_DELAY`] the status flips to
/// `Success`. Dropping the form (or calling [`OfferForm::cancel`])
/// cancels the pending timer.
#[derive(Debug)]
pub struct OfferForm {
    pub listing_id: String,
    pub quantity: Quantity,
    pub price_input: String,
    status: Rc<Cell<OfferStatus>>,
    timer: Option<TimerHandle>,
}

impl OfferForm {
    pub fn new(listing_id: impl Into<String>) -> Self {
        OfferForm {
            listing_id: listing_id.into(),
            quantity: Quantity::default(),
            price_input: String::new(),
            status: Rc::new(Cell::new(OfferStatus::Idle)),
            timer: None,
        }
    }

    pub fn quote(&self) -> OfferQuote {
        OfferQuote::compute(self.quantity, &self.price_input)
    }

    pub fn status(&self) -> OfferStatus {
        self.status.get()
    }

    /// Start the simulated submission. Returns `false` (and does nothing)
    /// while the quote is zero or a submission is already under way.
    pub fn submit(&mut self, scheduler: &dyn Scheduler) -> bool {
        if self.status.get() != OfferStatus::Idle || !self.quote().can_submit() {
            return false;
        }

        info!(
            listing = %self.listing_id,
            quantity = self.quantity.get(),
            total = self.quote().total,
            "submitting offer"
        );
        self.status.set(OfferStatus::Submitting);

        let status = Rc::downgrade(&self.status);
        self.timer = Some(scheduler.schedule_once(
            SUBMIT_DELAY,
            Box::new(move || {
                if let Some(status) = status.upgrade() {
                    status.set(OfferStatus::Success);
                }
            }),
        ));
        true
    }

    /// Cancel a pending submission timer.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for OfferForm {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::VirtualScheduler;

    #[test]
    fn ten_at_one_hundred() {
        let quote = OfferQuote::compute(Quantity::new(10), "100");
        assert_eq!(quote.total_offer_value, 1000.0);
        assert_eq!(quote.platform_fee, 10.0);
        assert_eq!(quote.total, 1010.0);
        assert!(quote.can_submit());
    }

    #[test]
    fn unparsed_price_gives_zero_quote() {
        for input in ["", "abc", "NaN", "0", "-10"] {
            let quote = OfferQuote::compute(Quantity::new(1), input);
            assert_eq!(quote, OfferQuote::default(), "input {input:?}");
            assert!(!quote.can_submit());
        }
    }

    #[test]
    fn quantity_never_below_one() {
        let mut q = Quantity::new(2);
        for _ in 0..10 {
            q.decrement();
        }
        assert_eq!(q.get(), 1);
        q.adjust(-1_000);
        assert_eq!(q.get(), 1);
        assert_eq!(Quantity::new(0).get(), 1);
        q.increment();
        assert_eq!(q.get(), 2);
    }

    #[test]
    fn submission_succeeds_after_delay() {
        let sched = VirtualScheduler::new();
        let mut form = OfferForm::new("1");
        assert!(!form.submit(&sched));

        form.price_input = "12000".to_string();
        assert!(form.submit(&sched));
        assert_eq!(form.status(), OfferStatus::Submitting);
        assert!(!form.submit(&sched));

        sched.advance(SUBMIT_DELAY);
        assert_eq!(form.status(), OfferStatus::Success);
    }

    #[test]
    fn dropping_the_form_cancels_the_timer() {
        let sched = VirtualScheduler::new();
        let mut form = OfferForm::new("1");
        form.price_input = "5".to_string();
        form.submit(&sched);
        assert_eq!(sched.pending(), 1);

        drop(form);
        assert_eq!(sched.pending(), 0);
    }
}
