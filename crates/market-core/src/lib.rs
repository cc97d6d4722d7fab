//! market-core
//!
//! Pure market logic for the crop marketplace:
//! - listings and the simulated price feed
//! - price alerts, their store and the per-tick evaluator
//! - the transient notification queue
//! - offer totals and wallet balance history
//!
//! Timers, persistence and randomness are injected through the
//! [`Scheduler`], [`KeyValueStore`] and [`RandomSource`] traits so the
//! whole crate runs the same under a real run loop or a virtual clock.

pub mod error;
pub mod money;
pub mod listing;
pub mod alert;
pub mod wallet;
pub mod random;
pub mod scheduler;
pub mod store;
pub mod price_feed;
pub mod alert_store;
pub mod alert_evaluator;
pub mod notification;
pub mod offer;
pub mod balance;
pub mod session;
pub mod market_view;

pub use error::{MarketError, StoreError};
pub use money::{format_currency, format_signed_currency, parse_positive_amount};

pub use listing::Listing;
pub use alert::{AlertCondition, PriceAlert};
pub use wallet::{Transaction, TransactionType, Wallet};

pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use scheduler::{OnceTask, RepeatingTask, Scheduler, TimerHandle, VirtualScheduler};
pub use store::{KeyValueStore, MemoryStore};

pub use price_feed::PriceFeed;
pub use alert_store::AlertStore;
pub use alert_evaluator::{AlertEvaluator, FiredAlert};
pub use notification::{
    NotificationCenter,
    NotificationId,
    NotificationMessage,
    NotificationPhase,
    NotificationTimings,
};
pub use offer::{OfferForm, OfferQuote, OfferStatus, Quantity};
pub use balance::{balance_history, trend_points, ChartBox};
pub use session::{FarmInfo, Session, UserProfile};
pub use market_view::MarketView;
