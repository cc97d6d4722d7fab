// crates/market-protocol/src/app_data.rs

//! The data-source payload.
//!
//! The generative data service returns one JSON object:
//!
//! ```text
//! {
//!   "marketListings": [Listing],
//!   "cropDetails":    {id: CropDetails} | [CropDetails],
//!   "userProfile":    UserProfile,
//!   "wallet":         {"balance": number, "transactions": [Transaction]}
//! }
//! ```
//!
//! The text may be wrapped in a Markdown code fence. `cropDetails` may
//! come as an array and is reshaped into a map keyed by listing id.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use market_core::{Listing, UserProfile, Wallet};

/// Errors decoding a data-source payload.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Nothing left after trimming and fence stripping.
    #[error("empty app data payload")]
    Empty,

    /// Not valid JSON, or not the `AppData` shape.
    #[error("malformed app data: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Specification {
    pub label: String,
    pub value: String,
}

/// Extended record for a listing's detail view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropDetails {
    #[serde(flatten)]
    pub listing: Listing,

    #[serde(default)]
    pub origin: String,

    /// Free text, e.g. `"15 Tons available"`.
    #[serde(default)]
    pub available: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub seller: Seller,

    #[serde(default)]
    pub specifications: Vec<Specification>,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub market_listings: Vec<Listing>,

    #[serde(default, deserialize_with = "crop_details_by_id")]
    pub crop_details: BTreeMap<String, CropDetails>,

    pub user_profile: UserProfile,

    pub wallet: Wallet,
}

impl AppData {
    pub fn details(&self, id: &str) -> Option<&CropDetails> {
        self.crop_details.get(id)
    }
}

/// Remove a surrounding ```` ```json ```` or ```` ``` ```` fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Decode a raw data-source response.
pub fn decode_app_data(text: &str) -> Result<AppData, ProtocolError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CropDetailsShape {
    ById(BTreeMap<String, CropDetails>),
    List(Vec<CropDetails>),
}

fn crop_details_by_id<'de, D>(deserializer: D) -> Result<BTreeMap<String, CropDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CropDetailsShape::deserialize(deserializer)? {
        CropDetailsShape::ById(map) => map,
        CropDetailsShape::List(list) => list
            .into_iter()
            .map(|details| (details.listing.id.clone(), details))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "marketListings": [
            {"id":"1","name":"Hard Red Wheat","farm":"Green Acres Farm","price":12500,"priceUnit":"/ bushel"}
        ],
        "cropDetails": [
            {"id":"1","name":"Hard Red Wheat","price":12500,"origin":"From Kansas, USA",
             "seller":{"name":"Johnathan Miller","rating":4.5,"reviews":34},
             "specifications":[{"label":"Moisture","value":"13.5%"}]}
        ],
        "userProfile": {"name":"AJAYI OLALEKAN","farm":{"name":"Olalekan Farms","crops":"Ginger, Cocoa"}},
        "wallet": {"balance":1000,"transactions":[{"id":"t1","type":"sale","title":"Sale","date":"Oct 1","amount":200}]}
    }"#;

    #[test]
    fn strips_json_and_bare_fences() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  ```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn decodes_fenced_payload_and_reshapes_details() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        let data = decode_app_data(&fenced).unwrap();

        assert_eq!(data.market_listings.len(), 1);
        assert_eq!(data.market_listings[0].price_unit, "/ bushel");
        let details = data.details("1").unwrap();
        assert_eq!(details.listing.name, "Hard Red Wheat");
        assert_eq!(details.seller.reviews, 34);
        assert_eq!(data.user_profile.farm.crops, "Ginger, Cocoa");
        assert_eq!(data.wallet.history(), vec![800.0, 1000.0]);
    }

    #[test]
    fn accepts_details_already_keyed_by_id() {
        let payload = r#"{
            "marketListings": [],
            "cropDetails": {"5": {"id":"5","name":"Nigerian Ginger","price":850000}},
            "userProfile": {"name":"A"},
            "wallet": {"balance":0}
        }"#;
        let data = decode_app_data(payload).unwrap();
        assert_eq!(data.details("5").unwrap().listing.price, 850000.0);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(decode_app_data("```json\n```"), Err(ProtocolError::Empty)));
        assert!(matches!(decode_app_data("not json"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(
            decode_app_data(r#"{"marketListings": 3}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
