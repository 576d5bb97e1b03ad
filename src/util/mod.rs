//! Utility modules
//!
//! - `input`: reading the input file into lines
//! - `logging`: tracing subscriber setup
//! - `time`: duration and rate formatting

pub mod input;
pub mod logging;
pub mod time;

/// Get node identifier (hostname)
pub fn node_id() -> String {
    if let Ok(hostname) = hostname::get() {
        if let Ok(hostname_str) = hostname.into_string() {
            return hostname_str;
        }
    }

    "unknown".to_string()
}
