use chrono::Utc;
use tokio::time::Instant;

/// Seconds since the UNIX epoch with millisecond precision.
pub fn now_f64() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

pub fn get_instant() -> Instant {
    Instant::now()
}
