use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time as milliseconds since Unix epoch,
/// or 0 if the system clock reads before the epoch.
pub fn epoch_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Source of wall-clock milliseconds. The autosave debounce window and draft
/// timestamps are measured against this, so tests can drive time by hand.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        epoch_ms_now()
    }
}
