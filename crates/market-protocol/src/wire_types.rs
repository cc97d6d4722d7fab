//! Line tags and storage keys shared by every front end.
//!
//! The first field of every line names its message type. The actual
//! parse/format logic lives in `csv_codec`.

pub use market_core::alert_store::ALERTS_KEY;
pub use market_core::session::PROFILE_KEY;

/// Marker in the last column of a listing line when an alert is set.
pub const ALERT_SET_MARK: char = '*';

/// Marker in the last column of a listing line when no alert is set.
pub const ALERT_UNSET_MARK: char = '-';

/// Input line types (operator → daemon).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputTag {
    /// `A, cropId, above|below, targetPrice`
    SetAlert,

    /// `R, cropId`
    RemoveAlert,

    /// `D, notificationId`
    Dismiss,
}

impl InputTag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(InputTag::SetAlert),
            'R' => Some(InputTag::RemoveAlert),
            'D' => Some(InputTag::Dismiss),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            InputTag::SetAlert => 'A',
            InputTag::RemoveAlert => 'R',
            InputTag::Dismiss => 'D',
        }
    }
}

/// Output line types (daemon → operator).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputTag {
    /// `L, id, name, price, unit, alert`
    Listing,

    /// `N, id, message`
    Notification,
}

impl OutputTag {
    pub fn as_char(self) -> char {
        match self {
            OutputTag::Listing => 'L',
            OutputTag::Notification => 'N',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_tags_round_trip_through_chars() {
        for tag in [InputTag::SetAlert, InputTag::RemoveAlert, InputTag::Dismiss] {
            assert_eq!(InputTag::from_char(tag.as_char()), Some(tag));
        }
        assert_eq!(InputTag::from_char('N'), None);
    }
}
