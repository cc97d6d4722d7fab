//! Static dataset served when the data source is unavailable.

use std::collections::BTreeMap;

use market_core::{FarmInfo, Listing, Transaction, TransactionType, UserProfile, Wallet};

use crate::app_data::{AppData, CropDetails, Seller, Specification};

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    name: &str,
    farm: &str,
    region: &str,
    country: &str,
    posted_time: &str,
    price: f64,
    price_unit: &str,
    price_change: f64,
    seed: &str,
    grade: &str,
) -> Listing {
    Listing {
        id: id.to_string(),
        name: name.to_string(),
        farm: farm.to_string(),
        region: region.to_string(),
        country: country.to_string(),
        posted_time: posted_time.to_string(),
        price,
        price_unit: price_unit.to_string(),
        price_change,
        image: format!("https://picsum.photos/seed/{seed}/200"),
        grade: grade.to_string(),
    }
}

fn details(
    base: &Listing,
    origin: &str,
    available: &str,
    seller: (&str, &str, f64, u32),
    specs: &[(&str, &str)],
    description: &str,
) -> CropDetails {
    let large_image = base.image.replace("/200", "/800");
    let (name, avatar_seed, rating, reviews) = seller;
    CropDetails {
        listing: Listing {
            image: large_image.clone(),
            ..base.clone()
        },
        origin: origin.to_string(),
        available: available.to_string(),
        images: vec![large_image],
        seller: Seller {
            name: name.to_string(),
            avatar: format!("https://picsum.photos/seed/{avatar_seed}/200"),
            rating,
            reviews,
        },
        specifications: specs
            .iter()
            .map(|(label, value)| Specification {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect(),
        description: description.to_string(),
    }
}

/// The built-in market: 8 listings, details for three of them, a wallet
/// with two transactions and the demo farmer's profile.
pub fn fallback_app_data() -> AppData {
    let market_listings = vec![
        listing("1", "Hard Red Wheat", "Green Acres Farm", "Midwest", "USA", "2h ago", 12500.0, "/ bushel", 2.5, "wheat", "Grade 1"),
        listing("2", "Forastero Cocoa Beans", "Ashanti Gold Farms", "Ashanti", "Ghana", "3h ago", 4500000.0, "/ ton", 5.1, "cocoa", "Grade A"),
        listing("3", "Soybeans", "Valley Organics", "Southeast", "Brazil", "5h ago", 20000.0, "/ bushel", -1.2, "soy", "Grade 2"),
        listing("4", "Arabica Coffee Beans", "Yirgacheffe Union", "Yirgacheffe", "Ethiopia", "8h ago", 7000.0, "/ lb", -0.5, "coffee", "Specialty Grade"),
        listing("5", "Nigerian Ginger", "Kaduna Spice Co.", "Kaduna", "Nigeria", "1d ago", 850000.0, "/ ton", 3.2, "ginger", "Grade A"),
        listing("6", "Tanzanian Cashews", "Mtwara Groves", "Mtwara", "Tanzania", "1d ago", 2300000.0, "/ ton", 1.8, "cashew", "W320"),
        listing("7", "Kenyan Tea", "Kericho Highlands", "Kericho", "Kenya", "2d ago", 3500.0, "/ kg", 0.8, "tea", "BP1"),
        listing("8", "Egyptian Cotton", "Nile Delta Textiles", "Nile Delta", "Egypt", "2d ago", 1500.0, "/ lb", -2.1, "cotton", "Giza 87"),
    ];

    let crop_details: BTreeMap<String, CropDetails> = [
        details(
            &market_listings[0],
            "From Kansas, USA",
            "5000 bushels available",
            ("Johnathan Miller", "seller1", 4.5, 34),
            &[("Moisture", "13.5%"), ("Protein", "12.5%")],
            "High-quality hard red winter wheat, perfect for baking and milling. Harvested this season.",
        ),
        details(
            &market_listings[1],
            "From Kumasi, Ghana",
            "15 Tons available",
            ("Kwame Asante", "seller2", 4.9, 88),
            &[("Bean Count", "95-105/100g"), ("Moisture", "7.5%")],
            "Sun-dried Forastero cocoa beans, known for their rich, full-bodied chocolate flavor. Certified Fair Trade.",
        ),
        details(
            &market_listings[4],
            "From Kaduna, Nigeria",
            "50 Tons available",
            ("Amina Bello", "seller5", 4.7, 45),
            &[("Oil Content", "2%"), ("Moisture", "10%")],
            "Potent and spicy ginger, sourced from the premier growing regions of Nigeria.",
        ),
    ]
    .into_iter()
    .map(|d| (d.listing.id.clone(), d))
    .collect();

    AppData {
        market_listings,
        crop_details,
        user_profile: fallback_profile(),
        wallet: Wallet::new(
            1_500_000.75,
            vec![
                Transaction {
                    id: "t1".to_string(),
                    kind: TransactionType::Deposit,
                    title: "Deposit from Bank".to_string(),
                    date: "Oct 26, 2023".to_string(),
                    amount: 750_000.0,
                },
                Transaction {
                    id: "t2".to_string(),
                    kind: TransactionType::Purchase,
                    title: "Purchase: Wheat".to_string(),
                    date: "Oct 25, 2023".to_string(),
                    amount: -350_000.0,
                },
            ],
        ),
    }
}

/// Profile used at login when nothing is stored yet.
pub fn fallback_profile() -> UserProfile {
    UserProfile {
        name: "AJAYI OLALEKAN".to_string(),
        title: "Farmer".to_string(),
        avatar: "https://picsum.photos/seed/user/200".to_string(),
        email: "ajayi.o@example.com".to_string(),
        phone: "+234 801 234 5678".to_string(),
        location: "Lagos, NG".to_string(),
        farm: FarmInfo {
            name: "Olalekan Farms".to_string(),
            reg: "Reg# 123456789".to_string(),
            crops: "Ginger, Cocoa".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_eight_tradable_listings() {
        let data = fallback_app_data();
        assert_eq!(data.market_listings.len(), 8);
        assert!(data.market_listings.iter().all(Listing::has_valid_price));
        assert_eq!(data.market_listings[6].name, "Kenyan Tea");
    }

    #[test]
    fn details_are_keyed_by_listing_id() {
        let data = fallback_app_data();
        let keys: Vec<_> = data.crop_details.keys().cloned().collect();
        assert_eq!(keys, vec!["1", "2", "5"]);
        assert_eq!(data.details("2").unwrap().listing.image, "https://picsum.photos/seed/cocoa/800");
    }

    #[test]
    fn wallet_history_starts_before_both_transactions() {
        let data = fallback_app_data();
        assert_eq!(data.wallet.history(), vec![1_100_000.75, 750_000.75, 1_500_000.75]);
    }

    #[test]
    fn survives_a_json_round_trip() {
        let data = fallback_app_data();
        let text = serde_json::to_string(&data).unwrap();
        assert_eq!(crate::decode_app_data(&text).unwrap(), data);
    }
}
