//! Time management for the scheduler
//!
//! Two clocks matter to a tracker:
//! - The local monotonic clock (RTC counter, seconds since boot) that paces
//!   sessions and ages the assistance record
//! - Absolute Unix time, which the device only knows through the assistance
//!   record and network time syncs
//!
//! Everything in this crate takes `now` as an argument rather than reading a
//! clock itself, so the arithmetic below is pure and trivially testable.

use crate::constants::time::{GPS_EPOCH_UNIX_OFFSET_S, GPS_UTC_LEAP_SECONDS};

pub use crate::traits::time::Clock;

/// Local monotonic timestamp in seconds since boot
pub type Timestamp = u32;

/// Seconds elapsed from `earlier` to `later`, zero if the clock went backwards
pub fn elapsed_s(earlier: Timestamp, later: Timestamp) -> u32 {
    later.saturating_sub(earlier)
}

/// Convert GPS seconds (as delivered by the network time sync) to Unix time
pub fn gps_to_unix(gps_time_s: u32) -> u32 {
    gps_time_s
        .wrapping_add(GPS_EPOCH_UNIX_OFFSET_S)
        .wrapping_sub(GPS_UTC_LEAP_SECONDS)
}

/// Clock with manually controlled time, for tests and host simulation
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Timestamp,
}

impl MockClock {
    /// Clock frozen at `now`
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    /// Jump to an absolute reading
    pub fn set(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Move forward by `seconds`
    pub fn advance(&mut self, seconds: u32) {
        self.now = self.now.saturating_add(seconds);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}
