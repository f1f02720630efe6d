//! Opt-in timings, enabled via DIFI_METRICS=1 and reported through the log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Environment switch.
pub const METRICS_ENV: &str = "DIFI_METRICS";

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Read the environment switch. Call once at startup.
pub fn init() {
    let enabled = std::env::var(METRICS_ENV)
        .map(|v| is_truthy(&v))
        .unwrap_or(false);
    set_enabled(enabled);
}

/// Force metrics on or off.
pub fn set_enabled(enabled: bool) {
    METRICS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether timers are recorded.
#[inline]
pub fn enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Logs its lifetime on drop.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// `None` when metrics are off, so the guard costs nothing.
    #[inline]
    pub fn start(label: &'static str) -> Option<Self> {
        enabled().then(|| Self {
            label,
            start: Instant::now(),
        })
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        record(self.label, self.start.elapsed());
    }
}

fn record(label: &'static str, elapsed: Duration) {
    tracing::info!(
        target: "difi::metrics",
        label,
        micros = elapsed.as_micros() as u64,
        "timing"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
