// src/clock.rs

//! Time source injected into extractors that compute countdowns.

use chrono::{DateTime, Utc};

/// Supplies "now" to extraction calls.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Seconds until `timestamp` (negative once it has passed), saturating
    /// at the `i64` bounds.
    fn until(&self, timestamp: i64) -> i64 {
        timestamp.saturating_sub(self.now().timestamp())
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at a unix timestamp; out-of-range values clamp to the epoch.
    pub fn at(timestamp: i64) -> Self {
        Self(DateTime::from_timestamp(timestamp, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
