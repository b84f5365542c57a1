use chrono::{DateTime, Utc};

/// Formats the duration between two optional timestamps as a human-readable string.
///
/// Example output: `"0.148s"`
pub fn format_duration(started_at: DateTime<Utc>, ended_at: Option<DateTime<Utc>>) -> String {
    ended_at
        .map(|e| {
            let duration = e - started_at;
            format!("{:.3}s", duration.num_milliseconds() as f64 / 1000.0)
        })
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
