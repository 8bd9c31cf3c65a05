use chrono::Utc;

/// Get current Unix timestamp in milliseconds (UTC)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
