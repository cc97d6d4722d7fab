//! Shared types for the market daemon.
//!
//! This module defines:
//! - `ListingRow`: a listing as shown to the operator, with its alert flag
//! - `MarketEvent`: everything the market loop reports outward
//! - channel aliases between the stdin reader, the market loop and the
//!   output writer

use market_core::{Listing, NotificationMessage};
use market_protocol::Command;
use tokio::sync::mpsc;

/// Listing snapshot plus whether an alert is set on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub listing: Listing,
    pub has_alert: bool,
}

/// Output of the market loop.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    /// Full listing snapshot after a tick or a listing replacement.
    Listings(Vec<ListingRow>),

    /// A notification was posted.
    Notification(NotificationMessage),
}

/// Market loop → output writer.
pub type EventTx = mpsc::UnboundedSender<MarketEvent>;
pub type EventRx = mpsc::UnboundedReceiver<MarketEvent>;

/// Stdin reader → market loop.
pub type CommandTx = mpsc::UnboundedSender<Command>;
pub type CommandRx = mpsc::UnboundedReceiver<Command>;
