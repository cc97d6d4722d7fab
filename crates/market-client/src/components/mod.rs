// crates/market-client/src/components/mod.rs

pub mod alert_editor;
pub mod help;
pub mod market_list;
pub mod notifications;
pub mod offer_entry;
pub mod profile_editor;
pub mod status_bar;
pub mod wallet;
pub mod welcome;
