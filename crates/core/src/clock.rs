//! Mission clock: elapsed time since the record was created.

use crate::record::EpochMillis;

/// Current time in epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// Format the time elapsed between `start` and `now` as `HH:MM:SS`.
///
/// Hours are padded to two digits but not capped. A `now` earlier than
/// `start` reads as zero.
pub fn format_elapsed(start: EpochMillis, now: EpochMillis) -> String {
    let elapsed = chrono::Duration::milliseconds(now.saturating_sub(start).max(0));

    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;
    let seconds = elapsed.num_seconds() % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0, 0), "00:00:00");
        assert_eq!(format_elapsed(0, 999), "00:00:00");
        assert_eq!(format_elapsed(0, 61_000), "00:01:01");
        assert_eq!(format_elapsed(1_000, 3_600_000 + 1_000), "01:00:00");
        assert_eq!(format_elapsed(0, 100 * 3_600_000 + 5_000), "100:00:05");
    }

    #[test]
    fn test_clock_skew_reads_zero() {
        assert_eq!(format_elapsed(10_000, 0), "00:00:00");
    }
}
