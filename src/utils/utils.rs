use chrono::{DateTime, Utc};

// Format a timestamp for logging
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
