//! market-server
//!
//! Tokio-backed runtime pieces for the crop market, plus the headless
//! daemon that drives a `MarketView` from stdin/stdout.

pub mod config;
pub mod types;
pub mod scheduler;
pub mod file_store;
pub mod data_source;
pub mod market_task;
pub mod server;

pub use config::Config;
pub use data_source::{load_app_data, DataOrigin};
pub use file_store::FileStore;
pub use market_task::MarketRuntime;
pub use scheduler::TokioScheduler;
