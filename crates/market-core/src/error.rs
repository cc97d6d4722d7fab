//! Error types for the market core.
//!
//! Most core operations are infallible by construction: bad numeric
//! input degrades to "no valid value yet", corrupt persisted data
//! degrades to an empty set. What remains fallible is writing to the
//! key-value backend and building an alert from invalid parts.

use thiserror::Error;

/// Failure reported by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend hit an I/O error reading or writing `key`.
    #[error("storage I/O error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests at all (e.g. quota, closed).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by market operations that write state.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A value could not be serialized before persisting it.
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An alert was built from an id, name or target that cannot be watched.
    #[error("invalid alert: {0}")]
    InvalidAlert(String),

    /// The requested listing is not part of the current market.
    #[error("unknown listing: {0}")]
    UnknownListing(String),
}
