//! Naive local time helpers.
//!
//! All lottery timestamps are stored as naive local datetime strings in a
//! fixed UTC+8 offset, the timezone the bot's groups operate in. The stored
//! format sorts lexicographically in chronological order, so due-time
//! comparisons work directly on the strings.

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

const UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Storage format for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The fixed offset all stored timestamps are interpreted in.
pub fn bot_timezone() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current wall-clock time in the bot timezone.
pub fn now_local() -> NaiveDateTime {
    Utc::now().with_timezone(&bot_timezone()).naive_local()
}

/// Current time in the stored string form.
pub fn now_local_string() -> String {
    format_timestamp(&now_local())
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| anyhow!("invalid timestamp '{}': {}", value, e))
}

/// Human-facing rendering for announcements and lottery listings.
pub fn format_display(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn timestamp_round_trips() {
        let now = now_local();
        let parsed = parse_timestamp(&format_timestamp(&now)).unwrap();
        // Sub-second precision is not stored
        assert_eq!(parsed.and_utc().timestamp(), now.and_utc().timestamp());
    }

    #[test]
    fn stored_format_orders_lexicographically() {
        let earlier = now_local();
        let later = earlier + Duration::hours(3);
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not a time").is_err());
        assert!(parse_timestamp("2025-13-40 99:00:00").is_err());
    }

    #[test]
    fn bot_timezone_is_utc_plus_eight() {
        assert_eq!(bot_timezone().local_minus_utc(), 8 * 3600);
    }
}
