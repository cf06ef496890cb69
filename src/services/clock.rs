use chrono::{DateTime, Utc};

/// Source of "now" for anything that compares against wall-clock time.
///
/// Cache expiry and release-date gating both branch on the current time,
/// so they take a clock instead of calling `Utc::now()` inline.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
