use chrono::{DateTime, Local, Utc};

pub fn now_timestamp_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Display helper for epoch-ms timestamps (local clock, HH:MM:SS).
pub fn format_clock_time(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Short date label for chart axes ("%m-%d %H:%M").
pub fn format_axis_time(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.with_timezone(&Local).format("%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_timestamp_renders_placeholder() {
        assert_eq!(format_clock_time(i64::MAX), "--:--:--");
    }
}
