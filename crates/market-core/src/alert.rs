//! Price alerts: a one-shot threshold watch on a single listing.

use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::listing::Listing;

/// Direction of the threshold crossing an alert waits for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    /// Fires when the price is at or above the target.
    Above,
    /// Fires when the price is at or below the target.
    Below,
}

impl AlertCondition {
    /// Inclusive comparison: a price exactly on the target fires either way.
    pub fn is_met(self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        }
    }

    /// Parse `"above"` / `"below"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Some(AlertCondition::Above),
            "below" => Some(AlertCondition::Below),
            _ => None,
        }
    }

    /// The other direction; the alert editor flips between the two.
    pub fn toggled(self) -> Self {
        match self {
            AlertCondition::Above => AlertCondition::Below,
            AlertCondition::Below => AlertCondition::Above,
        }
    }
}

/// A user-defined price threshold on one listing.
///
/// Persisted as `{cropId, cropName, targetPrice, condition}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    /// Listing id this alert watches.
    pub crop_id: String,

    /// Display copy of the listing name, used in the fired message.
    pub crop_name: String,

    /// Threshold price, always positive.
    pub target_price: f64,

    pub condition: AlertCondition,
}

impl PriceAlert {
    /// Build an alert, rejecting empty ids and non-positive targets.
    pub fn new(
        crop_id: impl Into<String>,
        crop_name: impl Into<String>,
        condition: AlertCondition,
        target_price: f64,
    ) -> Result<Self, MarketError> {
        let alert = PriceAlert {
            crop_id: crop_id.into(),
            crop_name: crop_name.into(),
            target_price,
            condition,
        };
        alert.validate()?;
        Ok(alert)
    }

    /// Build an alert for `listing`, copying its id and name.
    pub fn for_listing(
        listing: &Listing,
        condition: AlertCondition,
        target_price: f64,
    ) -> Result<Self, MarketError> {
        PriceAlert::new(listing.id.clone(), listing.name.clone(), condition, target_price)
    }

    /// Whether `price` satisfies this alert's condition.
    pub fn is_triggered_by(&self, price: f64) -> bool {
        self.condition.is_met(price, self.target_price)
    }

    pub fn validate(&self) -> Result<(), MarketError> {
        if self.crop_id.trim().is_empty() {
            return Err(MarketError::InvalidAlert("empty crop id".to_string()));
        }
        if !(self.target_price.is_finite() && self.target_price > 0.0) {
            return Err(MarketError::InvalidAlert(format!(
                "target price must be positive, got {}",
                self.target_price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_fires_in_both_directions() {
        assert!(AlertCondition::Above.is_met(100.0, 100.0));
        assert!(AlertCondition::Below.is_met(100.0, 100.0));
        assert!(AlertCondition::Above.is_met(100.01, 100.0));
        assert!(!AlertCondition::Above.is_met(99.99, 100.0));
        assert!(AlertCondition::Below.is_met(99.99, 100.0));
        assert!(!AlertCondition::Below.is_met(100.01, 100.0));
    }

    #[test]
    fn rejects_non_positive_targets() {
        assert!(PriceAlert::new("1", "Wheat", AlertCondition::Above, 0.0).is_err());
        assert!(PriceAlert::new("1", "Wheat", AlertCondition::Above, -5.0).is_err());
        assert!(PriceAlert::new("1", "Wheat", AlertCondition::Above, f64::NAN).is_err());
        assert!(PriceAlert::new("", "Wheat", AlertCondition::Above, 5.0).is_err());
        assert!(PriceAlert::new("1", "Wheat", AlertCondition::Below, 5.0).is_ok());
    }

    #[test]
    fn serializes_with_camel_case_and_lowercase_condition() {
        let alert = PriceAlert::new("7", "Kenyan Tea", AlertCondition::Below, 3400.0).unwrap();
        let json = serde_json::to_string(&alert).unwrap();
        assert_eq!(
            json,
            r#"{"cropId":"7","cropName":"Kenyan Tea","targetPrice":3400.0,"condition":"below"}"#
        );
    }

    #[test]
    fn condition_parse_and_toggle() {
        assert_eq!(AlertCondition::parse(" Above "), Some(AlertCondition::Above));
        assert_eq!(AlertCondition::parse("sideways"), None);
        assert_eq!(AlertCondition::Above.toggled(), AlertCondition::Below);
    }
}
