//! Small helpers shared across the pipeline.
//!
//! - Randomized pre-request delays used to spread out API polling
//! - String truncation for logging response bodies

use rand::{Rng, rng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::trace;

/// Pick a delay uniformly from `[0, max)`.
///
/// A zero `max` yields a zero delay.
pub fn disperse_delay(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let ms: u64 = rng().random_range(0..max_ms);
    Duration::from_millis(ms)
}

/// Sleep for a random duration in `[0, max)`.
///
/// Concurrent polling loops call this before each request so they do not
/// all hit the same API at the same instant. Never fails.
pub async fn disperse(max: Duration) {
    let delay = disperse_delay(max);
    trace!(?delay, "Dispersing request");
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) and
/// suffixed with `"…(+N bytes)"`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
