// crates/market-protocol/src/csv_codec.rs

//! Headless CSV line codec.
//!
//! Input format (lines → `Command`):
//!
//! - Set alert:
//!   `A, cropId(string), condition(above|below), targetPrice(number)`
//!
//! - Remove alert:
//!   `R, cropId(string)`
//!
//! - Dismiss notification:
//!   `D, notificationId(int)`
//!
//! Output format (market state → line):
//!
//! - Listing (one per listing per tick):
//!   `L, id, name, price(2dp), unit, alert(* or -)`
//!   Commas inside `id`, `name` and `unit` are written as `;` so the
//!   column count is fixed.
//!
//! - Notification posted:
//!   `N, id, message`
//!   `message` is the last column and is written as is; it may contain
//!   commas (formatted prices do).

use std::borrow::Cow;

use market_core::{AlertCondition, Listing, NotificationId, NotificationMessage};

use crate::wire_types::{InputTag, OutputTag, ALERT_SET_MARK, ALERT_UNSET_MARK};

/// One operator command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetAlert {
        crop_id: String,
        condition: AlertCondition,
        target_price: f64,
    },
    RemoveAlert {
        crop_id: String,
    },
    Dismiss {
        id: NotificationId,
    },
}

/// Parse a single CSV line into a `Command`.
///
/// Returns `None` for blank lines, comments (starting with `#`) and
/// anything malformed.
pub fn parse_command_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let tokens = split_and_trim(trimmed, ',');
    if tokens[0].chars().count() != 1 {
        return None;
    }
    let tag = InputTag::from_char(tokens[0].chars().next()?)?;

    match tag {
        InputTag::SetAlert => parse_set_alert(&tokens),
        InputTag::RemoveAlert => parse_remove_alert(&tokens),
        InputTag::Dismiss => parse_dismiss(&tokens),
    }
}

fn parse_set_alert(tokens: &[&str]) -> Option<Command> {
    // A, cropId, condition, targetPrice
    if tokens.len() != 4 || tokens[1].is_empty() {
        return None;
    }

    let condition = AlertCondition::parse(tokens[2])?;
    let target_price = tokens[3].parse::<f64>().ok()?;
    if !(target_price.is_finite() && target_price > 0.0) {
        return None;
    }

    Some(Command::SetAlert {
        crop_id: tokens[1].to_string(),
        condition,
        target_price,
    })
}

fn parse_remove_alert(tokens: &[&str]) -> Option<Command> {
    // R, cropId
    if tokens.len() != 2 || tokens[1].is_empty() {
        return None;
    }
    Some(Command::RemoveAlert {
        crop_id: tokens[1].to_string(),
    })
}

fn parse_dismiss(tokens: &[&str]) -> Option<Command> {
    // D, notificationId
    if tokens.len() != 2 {
        return None;
    }
    let id = tokens[1].parse::<NotificationId>().ok()?;
    Some(Command::Dismiss { id })
}

/// Format one listing row. `has_alert` drives the last column.
pub fn format_listing_line(listing: &Listing, has_alert: bool) -> String {
    let mark = if has_alert { ALERT_SET_MARK } else { ALERT_UNSET_MARK };
    format!(
        "{}, {}, {}, {:.2}, {}, {}",
        OutputTag::Listing.as_char(),
        field(&listing.id),
        field(&listing.name),
        listing.price,
        field(&listing.price_unit),
        mark
    )
}

/// Format a posted notification.
pub fn format_notification_line(message: &NotificationMessage) -> String {
    format!(
        "{}, {}, {}",
        OutputTag::Notification.as_char(),
        message.id,
        message.message
    )
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// A free-text value for a non-final column.
fn field(value: &str) -> Cow<'_, str> {
    if value.contains(',') {
        Cow::Owned(value.replace(',', ";"))
    } else {
        Cow::Borrowed(value)
    }
}

fn split_and_trim(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::NotificationPhase;

    #[test]
    fn parses_each_command() {
        assert_eq!(
            parse_command_line("A, 2, above, 4600000"),
            Some(Command::SetAlert {
                crop_id: "2".to_string(),
                condition: AlertCondition::Above,
                target_price: 4_600_000.0,
            })
        );
        assert_eq!(
            parse_command_line("R,7"),
            Some(Command::RemoveAlert { crop_id: "7".to_string() })
        );
        assert_eq!(parse_command_line(" D, 12 "), Some(Command::Dismiss { id: 12 }));
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in [
            "",
            "# comment",
            "A, 2, sideways, 10",
            "A, 2, above, 0",
            "A, 2, above, -5",
            "A, 2, above, abc",
            "A, , above, 10",
            "A, 2, above",
            "R",
            "D, x",
            "AB, 2",
            "Z, 1",
        ] {
            assert_eq!(parse_command_line(line), None, "line {line:?}");
        }
    }

    #[test]
    fn formats_listing_with_alert_marker() {
        let mut tea = Listing::new("7", "Kenyan Tea", 3512.456, "/ kg");
        assert_eq!(format_listing_line(&tea, true), "L, 7, Kenyan Tea, 3512.46, / kg, *");
        tea.price = 3500.0;
        assert_eq!(format_listing_line(&tea, false), "L, 7, Kenyan Tea, 3500.00, / kg, -");
    }

    #[test]
    fn commas_in_listing_text_keep_the_column_count() {
        let cocoa = Listing::new("2", "Cocoa, Grade A", 4500.0, "/ ton, bagged");
        let line = format_listing_line(&cocoa, true);
        assert_eq!(line, "L, 2, Cocoa; Grade A, 4500.00, / ton; bagged, *");

        let columns = split_and_trim(&line, ',');
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[5], "*");
    }

    #[test]
    fn formats_notification() {
        let msg = NotificationMessage {
            id: 3,
            message: "Price Alert: Kenyan Tea reached ₦3,535.00!".to_string(),
            phase: NotificationPhase::Visible,
        };
        assert_eq!(
            format_notification_line(&msg),
            "N, 3, Price Alert: Kenyan Tea reached ₦3,535.00!"
        );
    }
}
