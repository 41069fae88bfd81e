//! Command handlers, one module per subcommand.

pub mod assign;
pub mod attach;
pub mod completions;
pub mod create;
pub mod init;
pub mod profile;
pub mod resolve;
pub mod stage;
pub mod take;
pub mod transition;

use anyhow::{Context, Result};
use chrono::DateTime;

/// Resolve an optional `--at` RFC 3339 timestamp to epoch microseconds,
/// defaulting to the current wall clock.
///
/// # Errors
///
/// Returns an error if the value is present but not valid RFC 3339.
pub fn occurred_at_us(at: Option<&str>) -> Result<i64> {
    match at {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --at timestamp '{raw}': expected RFC 3339"))?;
            Ok(parsed.timestamp_micros())
        }
        None => Ok(baton_core::db::now_us()),
    }
}

#[cfg(test)]
mod tests {
    use super::occurred_at_us;

    #[test]
    fn parses_rfc3339_to_micros() {
        let us = occurred_at_us(Some("2024-03-01T12:00:00Z")).expect("parse");
        assert_eq!(us, 1_709_294_400_000_000);
    }

    #[test]
    fn parses_offset_timestamps() {
        let utc = occurred_at_us(Some("2024-03-01T12:00:00Z")).expect("parse");
        let offset = occurred_at_us(Some("2024-03-01T14:00:00+02:00")).expect("parse");
        assert_eq!(utc, offset);
    }

    #[test]
    fn rejects_non_rfc3339() {
        assert!(occurred_at_us(Some("yesterday")).is_err());
        assert!(occurred_at_us(Some("2024-03-01")).is_err());
    }

    #[test]
    fn defaults_to_now() {
        // 2020-01-01T00:00:00Z in microseconds.
        assert!(occurred_at_us(None).expect("now") > 1_577_836_800_000_000);
    }
}
