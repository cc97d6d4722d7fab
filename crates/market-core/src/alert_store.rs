//! Persisted price alerts, at most one per listing.
//!
//! The backing [`KeyValueStore`] is the single source of truth: every
//! read goes through it and every write recomputes the collection from
//! what is currently stored, never from a copy cached earlier. The whole
//! collection is written in one `set` per mutation.
//!
//! Persisted form, under [`ALERTS_KEY`]:
//!
//! ```json
//! [{"cropId":"2","cropName":"Forastero Cocoa Beans","targetPrice":4600000.0,"condition":"above"}]
//! ```

use std::rc::Rc;

use tracing::{debug, warn};

use crate::alert::PriceAlert;
use crate::error::MarketError;
use crate::store::KeyValueStore;

/// Storage key holding the alert collection.
pub const ALERTS_KEY: &str = "priceAlerts";

/// Replace-by-key alert storage over an injected backend.
#[derive(Clone)]
pub struct AlertStore {
    backend: Rc<dyn KeyValueStore>,
}

impl AlertStore {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        AlertStore { backend }
    }

    /// Current alert set.
    ///
    /// Never fails: missing, unreadable or malformed data yields an empty
    /// set. Individually invalid records are skipped and duplicate ids
    /// keep the last record.
    pub fn load(&self) -> Vec<PriceAlert> {
        let bytes = match self.backend.get(ALERTS_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("alert storage unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match decode_alerts(&bytes) {
            Ok(alerts) => normalize(alerts),
            Err(e) => {
                warn!("malformed alert data, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Whether an alert exists for `crop_id` (drives the listing indicator).
    pub fn has(&self, crop_id: &str) -> bool {
        self.load().iter().any(|a| a.crop_id == crop_id)
    }

    /// The alert for `crop_id`, if any.
    pub fn get(&self, crop_id: &str) -> Option<PriceAlert> {
        self.load().into_iter().find(|a| a.crop_id == crop_id)
    }

    /// Insert `alert`, replacing any existing alert for the same listing.
    pub fn set(&self, alert: PriceAlert) -> Result<(), MarketError> {
        alert.validate()?;

        let mut alerts = self.load();
        alerts.retain(|a| a.crop_id != alert.crop_id);
        debug!(crop_id = %alert.crop_id, condition = alert.condition.as_str(), target = alert.target_price, "setting alert");
        alerts.push(alert);

        self.persist(&alerts)
    }

    /// Delete the alert for `crop_id`. Absent ids are a no-op.
    pub fn remove(&self, crop_id: &str) -> Result<(), MarketError> {
        let mut alerts = self.load();
        let before = alerts.len();
        alerts.retain(|a| a.crop_id != crop_id);

        if alerts.len() == before {
            return Ok(());
        }

        debug!(crop_id, "removing alert");
        self.persist(&alerts)
    }

    /// Remove a batch of fired alerts in a single write.
    ///
    /// Only records equal to a fired alert are dropped; if the user
    /// replaced an alert after it was read for evaluation, the new one
    /// stays. Returns how many records were removed.
    pub fn remove_fired(&self, fired: &[PriceAlert]) -> Result<usize, MarketError> {
        if fired.is_empty() {
            return Ok(0);
        }

        let mut alerts = self.load();
        let before = alerts.len();
        alerts.retain(|a| !fired.contains(a));
        let removed = before - alerts.len();

        if removed > 0 {
            self.persist(&alerts)?;
        }
        Ok(removed)
    }

    fn persist(&self, alerts: &[PriceAlert]) -> Result<(), MarketError> {
        let bytes = encode_alerts(alerts).map_err(|source| MarketError::Encode {
            what: "price alerts",
            source,
        })?;
        self.backend.set(ALERTS_KEY, &bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for AlertStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertStore").finish_non_exhaustive()
    }
}

/// Serialize an alert collection to its persisted JSON form.
pub fn encode_alerts(alerts: &[PriceAlert]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(alerts)
}

/// Parse the persisted JSON form.
pub fn decode_alerts(bytes: &[u8]) -> Result<Vec<PriceAlert>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn normalize(alerts: Vec<PriceAlert>) -> Vec<PriceAlert> {
    let mut out: Vec<PriceAlert> = Vec::with_capacity(alerts.len());
    for alert in alerts {
        if let Err(e) = alert.validate() {
            warn!("skipping stored alert: {}", e);
            continue;
        }
        out.retain(|a| a.crop_id != alert.crop_id);
        out.push(alert);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertCondition;
    use crate::store::MemoryStore;

    fn store() -> (AlertStore, MemoryStore) {
        let mem = MemoryStore::new();
        (AlertStore::new(Rc::new(mem.clone())), mem)
    }

    fn alert(id: &str, condition: AlertCondition, target: f64) -> PriceAlert {
        PriceAlert::new(id, format!("Crop {id}"), condition, target).unwrap()
    }

    #[test]
    fn first_run_is_empty() {
        let (alerts, _) = store();
        assert!(alerts.load().is_empty());
        assert!(!alerts.has("1"));
    }

    #[test]
    fn set_replaces_existing_alert_for_same_id() {
        let (alerts, mem) = store();
        alerts.set(alert("1", AlertCondition::Above, 100.0)).unwrap();
        alerts.set(alert("2", AlertCondition::Below, 50.0)).unwrap();
        alerts.set(alert("1", AlertCondition::Below, 90.0)).unwrap();

        let loaded = alerts.load();
        assert_eq!(loaded.iter().filter(|a| a.crop_id == "1").count(), 1);
        let one = alerts.get("1").unwrap();
        assert_eq!(one.condition, AlertCondition::Below);
        assert_eq!(one.target_price, 90.0);
        assert_eq!(loaded.len(), 2);
        assert_eq!(mem.write_count(), 3);
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let (alerts, mem) = store();
        alerts.remove("nope").unwrap();
        assert_eq!(mem.write_count(), 0);

        alerts.set(alert("1", AlertCondition::Above, 100.0)).unwrap();
        alerts.remove("1").unwrap();
        assert!(alerts.load().is_empty());
        assert_eq!(mem.write_count(), 2);
    }

    #[test]
    fn corrupt_storage_loads_as_empty() {
        let (alerts, mem) = store();
        mem.insert_raw(ALERTS_KEY, "{not json");
        assert!(alerts.load().is_empty());

        mem.insert_raw(ALERTS_KEY, r#"[{"cropId":"1"}]"#);
        assert!(alerts.load().is_empty());
    }

    #[test]
    fn invalid_records_are_skipped_and_duplicates_collapse() {
        let (alerts, mem) = store();
        mem.insert_raw(
            ALERTS_KEY,
            r#"[
                {"cropId":"1","cropName":"A","targetPrice":10.0,"condition":"above"},
                {"cropId":"2","cropName":"B","targetPrice":-4.0,"condition":"below"},
                {"cropId":"1","cropName":"A","targetPrice":12.0,"condition":"below"}
            ]"#,
        );

        let loaded = alerts.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].target_price, 12.0);
    }

    #[test]
    fn remove_fired_keeps_alerts_replaced_since_evaluation() {
        let (alerts, mem) = store();
        let stale = alert("1", AlertCondition::Above, 100.0);
        alerts.set(stale.clone()).unwrap();
        alerts.set(alert("2", AlertCondition::Below, 50.0)).unwrap();

        // The user replaces alert 1 after the tick read it.
        let replacement = alert("1", AlertCondition::Above, 200.0);
        alerts.set(replacement.clone()).unwrap();
        let writes = mem.write_count();

        let removed = alerts
            .remove_fired(&[stale, alert("2", AlertCondition::Below, 50.0)])
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(mem.write_count(), writes + 1);
        assert_eq!(alerts.load(), vec![replacement]);
    }

    #[test]
    fn set_rejects_invalid_alert() {
        let (alerts, _) = store();
        let mut bad = alert("1", AlertCondition::Above, 1.0);
        bad.target_price = 0.0;
        assert!(alerts.set(bad).is_err());
    }
}
