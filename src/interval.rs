/*
    Helper for turning the user's interval text into timer milliseconds.
 */

use log::info;

use crate::config::DEFAULT_INTERVAL_MS;

// Seconds as typed by the user -> milliseconds. Never fails: anything unusable becomes the default.
pub fn configure_interval(raw_input: &str) -> u64 {
    let parsed = raw_input.trim().parse::<i64>();

    let millis = match parsed {
        Ok(seconds) if seconds > 0 => seconds.checked_mul(1000),
        _ => None,
    };

    match millis {
        Some(ms) => ms as u64,
        None => {
            info!("Invalid interval '{}', falling back to {} ms", raw_input, DEFAULT_INTERVAL_MS);
            DEFAULT_INTERVAL_MS
        }
    }
}

pub fn seconds_text(interval_ms: u64) -> String {
    format!("{}", interval_ms / 1000)
}
