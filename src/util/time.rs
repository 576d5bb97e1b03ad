//! Duration display

use std::time::Duration;

/// Short human-readable duration for reports
///
/// Sub-second durations are shown in milliseconds, longer ones in seconds,
/// both with three decimals.
///
/// ```
/// use std::time::Duration;
/// use wordpulse::util::time::human_duration;
///
/// assert_eq!(human_duration(Duration::from_micros(1250)), "1.250 ms");
/// assert_eq!(human_duration(Duration::from_millis(2500)), "2.500 s");
/// ```
pub fn human_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{:.3} ms", duration.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.3} s", duration.as_secs_f64())
    }
}
