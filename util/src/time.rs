use chrono::{DateTime, Utc};

#[must_use]
pub fn now() -> DateTime<Utc> { Utc::now() }

#[must_use]
pub fn get_unix_timestamp_ms() -> i64 { Utc::now().timestamp_millis() }

#[must_use]
pub fn get_unix_timestamp_us() -> i64 { Utc::now().timestamp_micros() }

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H:%M:%S";

#[must_use]
pub fn now_str() -> String { Utc::now().format(TIMESTAMP_FORMAT).to_string() }
