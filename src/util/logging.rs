//! Logging initialization
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for the
//! result table.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity level
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing for the process
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(verbose >= 3) // Show line numbers for -vvv
        .try_init();

    if result.is_ok() {
        debug!("wordpulse started with verbosity level: {}", verbose);
        trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "info");
        assert_eq!(log_level(1), "debug");
        assert_eq!(log_level(2), "trace");
        assert_eq!(log_level(9), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(0);
        init_logging(1);
    }
}
