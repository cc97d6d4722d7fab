//! One-shot alert matching, run once per price tick.
//!
//! Per tick:
//! 1. read the alert set through the store (store is truth),
//! 2. match each alert against the freshly updated listing by id
//!    (alerts for listings no longer present are skipped),
//! 3. post one notification per fired alert,
//! 4. remove every fired alert in a single persisted write.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::alert::PriceAlert;
use crate::alert_store::AlertStore;
use crate::listing::Listing;
use crate::money::format_currency;
use crate::notification::NotificationCenter;

/// An alert whose condition held on this tick, with the triggering price.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredAlert {
    pub alert: PriceAlert,
    pub price: f64,
}

impl FiredAlert {
    /// User-facing text, e.g. `Price Alert: Kenyan Tea reached ₦3,512.40!`.
    pub fn message(&self) -> String {
        format!(
            "Price Alert: {} reached {}!",
            self.alert.crop_name,
            format_currency(self.price)
        )
    }
}

/// Match `alerts` against `listings`, returning the ones that fire, in
/// alert order.
pub fn evaluate(alerts: &[PriceAlert], listings: &[Listing]) -> Vec<FiredAlert> {
    let prices: HashMap<&str, f64> = listings
        .iter()
        .map(|l| (l.id.as_str(), l.price))
        .collect();

    alerts
        .iter()
        .filter_map(|alert| {
            let price = *prices.get(alert.crop_id.as_str())?;
            alert.is_triggered_by(price).then(|| FiredAlert {
                alert: alert.clone(),
                price,
            })
        })
        .collect()
}

/// Runs [`evaluate`] against the store and applies its side effects.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    store: AlertStore,
}

impl AlertEvaluator {
    pub fn new(store: AlertStore) -> Self {
        AlertEvaluator { store }
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    /// Evaluate one tick's listing snapshot, notify, and consume fired alerts.
    ///
    /// A failed removal write is logged; the alerts stay and may fire
    /// again next tick.
    pub fn run(&self, listings: &[Listing], notifications: &NotificationCenter) -> Vec<FiredAlert> {
        let alerts = self.store.load();
        if alerts.is_empty() {
            return Vec::new();
        }

        let fired = evaluate(&alerts, listings);
        if fired.is_empty() {
            return fired;
        }

        for hit in &fired {
            info!(
                crop_id = %hit.alert.crop_id,
                condition = hit.alert.condition.as_str(),
                target = hit.alert.target_price,
                price = hit.price,
                "price alert fired"
            );
            notifications.post(hit.message());
        }

        let consumed: Vec<PriceAlert> = fired.iter().map(|f| f.alert.clone()).collect();
        if let Err(e) = self.store.remove_fired(&consumed) {
            warn!("failed to remove fired alerts: {}", e);
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertCondition;

    fn listings() -> Vec<Listing> {
        vec![
            Listing::new("1", "Hard Red Wheat", 12500.0, "/ bushel"),
            Listing::new("7", "Kenyan Tea", 3500.0, "/ kg"),
        ]
    }

    fn alert(id: &str, name: &str, condition: AlertCondition, target: f64) -> PriceAlert {
        PriceAlert::new(id, name, condition, target).unwrap()
    }

    #[test]
    fn fires_on_inclusive_boundaries() {
        let alerts = vec![
            alert("1", "Hard Red Wheat", AlertCondition::Above, 12500.0),
            alert("7", "Kenyan Tea", AlertCondition::Below, 3500.0),
        ];
        let fired = evaluate(&alerts, &listings());
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn does_not_fire_on_the_wrong_side() {
        let alerts = vec![
            alert("1", "Hard Red Wheat", AlertCondition::Above, 12500.01),
            alert("7", "Kenyan Tea", AlertCondition::Below, 3499.99),
        ];
        assert!(evaluate(&alerts, &listings()).is_empty());
    }

    #[test]
    fn missing_listing_is_skipped() {
        let alerts = vec![alert("99", "Gone", AlertCondition::Above, 1.0)];
        assert!(evaluate(&alerts, &listings()).is_empty());
    }

    #[test]
    fn message_uses_currency_format() {
        let hit = FiredAlert {
            alert: alert("7", "Kenyan Tea", AlertCondition::Above, 3500.0),
            price: 3512.4,
        };
        assert_eq!(hit.message(), "Price Alert: Kenyan Tea reached ₦3,512.40!");
    }
}
