//! Tradable crop listing.

use serde::{Deserialize, Serialize};

/// A crop offered on the market with a live, mutable price.
///
/// Only `id`, `name`, `price` and `price_unit` matter to the price
/// engine; the remaining fields are descriptive data from the listing
/// source and default to empty when absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique listing identifier.
    pub id: String,

    /// Crop name, e.g. `"Kenyan Tea"`.
    pub name: String,

    #[serde(default)]
    pub farm: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub country: String,

    /// Free-form age of the listing, e.g. `"2h ago"`.
    #[serde(default)]
    pub posted_time: String,

    /// Current price in currency units. Always `> 0` once inside a feed.
    pub price: f64,

    /// Display unit appended after the price, e.g. `"/ ton"`.
    #[serde(default)]
    pub price_unit: String,

    /// Recent change in percent, as reported by the source.
    #[serde(default)]
    pub price_change: f64,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub grade: String,
}

impl Listing {
    /// Build a listing with only the fields the price engine uses.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        price_unit: impl Into<String>,
    ) -> Self {
        Listing {
            id: id.into(),
            name: name.into(),
            price,
            price_unit: price_unit.into(),
            ..Listing::default()
        }
    }

    /// `true` when the price can seed a multiplicative walk (finite and positive).
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Case-insensitive match on name or farm (the market search bar).
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.farm.to_lowercase().contains(&term)
    }
}
