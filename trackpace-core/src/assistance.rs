//! Assistance Cache and Quality Model
//!
//! Holds the most recent position/time estimate the satellite receiver can be
//! seeded with, and grades how useful it still is.
//!
//! ## Sources of truth
//!
//! 1. **Relay messages** (a nearby vessel or gateway broadcasting its own
//!    position) always overwrite the record.
//! 2. **Our own satellite fixes** only fill in when nothing fresher exists:
//!    a relayed position is trusted over a fix taken while drifting.
//! 3. **Network time syncs** tighten the time estimate but never touch the
//!    position.
//!
//! ## Time model
//!
//! The record is anchored to the local monotonic clock twice: `captured_at`
//! dates the position (quality decays from here) and `time_anchor` dates the
//! last time correction (clock drift accrues from here). Drift is modelled as
//! 125 ms per elapsed whole hour on top of the uncertainty at the anchor.
//!
//! ```rust
//! use trackpace_core::assistance::{AssistanceCache, AssistanceQuality};
//!
//! let mut cache = AssistanceCache::new();
//! assert_eq!(cache.quality(0), AssistanceQuality::Poor);
//!
//! cache.ingest_external(100, 48.85, 2.35, Some(1_700_000_000), 60);
//! assert_eq!(cache.quality(100 + 29 * 60), AssistanceQuality::Excellent);
//! assert_eq!(cache.estimated_time(110), 1_700_000_010);
//! ```

use crate::constants::assistance::{
    CLOCK_DRIFT_MS_PER_HOUR, EXCELLENT_MAX_AGE_MIN, FAIR_MAX_AGE_MIN, GOOD_MAX_AGE_MIN,
    NO_ASSISTANCE_UNCERTAINTY_S,
};
use crate::constants::time::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::time::{elapsed_s, Timestamp};

/// Freshness class of the cached assistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssistanceQuality {
    /// Less than 30 minutes old
    Excellent,
    /// Less than 90 minutes old
    Good,
    /// Less than 180 minutes old
    Fair,
    /// Older, or nothing cached
    Poor,
}

impl AssistanceQuality {
    /// Grade a record age in seconds
    pub const fn from_age_s(age_s: u32) -> Self {
        let age_min = age_s / SECONDS_PER_MINUTE;
        if age_min < EXCELLENT_MAX_AGE_MIN {
            Self::Excellent
        } else if age_min < GOOD_MAX_AGE_MIN {
            Self::Good
        } else if age_min < FAIR_MAX_AGE_MIN {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Short name for traces
    pub const fn name(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Cached position and time estimate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AssistanceRecord {
    /// Latitude in degrees
    pub latitude: f32,
    /// Longitude in degrees
    pub longitude: f32,
    /// Unix time at `time_anchor`
    pub reference_time: u32,
    /// Time uncertainty at `time_anchor` (seconds)
    pub uncertainty_s: u32,
    /// Local time the position was captured
    pub captured_at: Timestamp,
    /// Local time `reference_time` was last corrected
    pub time_anchor: Timestamp,
    /// Whether the position is meaningful
    pub valid: bool,
    /// Whether `reference_time` came from an authoritative source
    pub time_known: bool,
}

impl AssistanceRecord {
    /// Nothing cached
    pub const fn empty() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            reference_time: 0,
            uncertainty_s: NO_ASSISTANCE_UNCERTAINTY_S,
            captured_at: 0,
            time_anchor: 0,
            valid: false,
            time_known: false,
        }
    }
}

impl Default for AssistanceRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// Owner of the assistance record
#[derive(Debug, Clone, Default)]
pub struct AssistanceCache {
    record: AssistanceRecord,
}

impl AssistanceCache {
    /// Empty cache
    pub const fn new() -> Self {
        Self { record: AssistanceRecord::empty() }
    }

    /// Current record
    pub fn record(&self) -> &AssistanceRecord {
        &self.record
    }

    /// Whether a position is cached
    pub fn is_valid(&self) -> bool {
        self.record.valid
    }

    /// Whether the estimated time is backed by a real time source
    pub fn has_time(&self) -> bool {
        self.record.time_known
    }

    /// Store a relayed position, unconditionally
    ///
    /// Without `time_hint` the reference time is carried forward from the
    /// current estimate and keeps its uncertainty, since the message says
    /// nothing about time.
    pub fn ingest_external(
        &mut self,
        now: Timestamp,
        latitude: f32,
        longitude: f32,
        time_hint: Option<u32>,
        uncertainty_s: u32,
    ) {
        let (reference_time, uncertainty_s, time_known) = match time_hint {
            Some(unix_time) => (unix_time, uncertainty_s, true),
            None => (
                self.estimated_time(now),
                self.estimated_uncertainty_s(now).max(uncertainty_s),
                self.record.time_known,
            ),
        };

        self.record = AssistanceRecord {
            latitude,
            longitude,
            reference_time,
            uncertainty_s,
            captured_at: now,
            time_anchor: now,
            valid: true,
            time_known,
        };
        trace_info!("assistance: relayed position stored, uncertainty {}s", uncertainty_s);
    }

    /// Store our own satellite fix if nothing fresher is cached
    ///
    /// Returns whether the record was replaced.
    pub fn ingest_self_fix(&mut self, now: Timestamp, latitude: f32, longitude: f32) -> bool {
        let quality = self.quality(now);
        if quality != AssistanceQuality::Poor {
            trace_debug!("assistance: own fix ignored, cache still {}", quality.name());
            return false;
        }

        self.record = AssistanceRecord {
            latitude,
            longitude,
            reference_time: self.estimated_time(now),
            uncertainty_s: self.estimated_uncertainty_s(now),
            captured_at: now,
            time_anchor: now,
            valid: true,
            time_known: self.record.time_known,
        };
        trace_info!("assistance: own fix stored");
        true
    }

    /// Lower the time uncertainty after a sync of the given precision
    ///
    /// Never raises the uncertainty and never touches the position. Without
    /// any time reference there is nothing to tighten.
    pub fn tighten_time(&mut self, now: Timestamp, uncertainty_s: u32) {
        if !self.record.valid && !self.record.time_known {
            trace_debug!("assistance: time sync ignored, nothing cached");
            return;
        }

        let current = self.estimated_uncertainty_s(now);
        self.record.reference_time = self.estimated_time(now);
        self.record.time_anchor = now;
        self.record.uncertainty_s = current.min(uncertainty_s);
    }

    /// Re-anchor the reference time to an authoritative network time
    pub fn anchor_time(&mut self, now: Timestamp, unix_time: u32, uncertainty_s: u32) {
        let uncertainty_s = if self.record.time_known {
            self.estimated_uncertainty_s(now).min(uncertainty_s)
        } else {
            uncertainty_s
        };

        self.record.reference_time = unix_time;
        self.record.time_anchor = now;
        self.record.uncertainty_s = uncertainty_s;
        self.record.time_known = true;
        trace_info!("assistance: time anchored to {}, uncertainty {}s", unix_time, uncertainty_s);
    }

    /// Age-based freshness class
    pub fn quality(&self, now: Timestamp) -> AssistanceQuality {
        if !self.record.valid {
            return AssistanceQuality::Poor;
        }
        AssistanceQuality::from_age_s(elapsed_s(self.record.captured_at, now))
    }

    /// Seconds since the position was captured
    pub fn position_age_s(&self, now: Timestamp) -> Option<u32> {
        self.record.valid.then(|| elapsed_s(self.record.captured_at, now))
    }

    /// Whether the receiver should refresh its almanac
    ///
    /// Fails open: with nothing cached maintenance is always due.
    pub fn is_almanac_maintenance_due(&self, now: Timestamp, days_threshold: u32) -> bool {
        match self.position_age_s(now) {
            Some(age_s) => age_s / SECONDS_PER_DAY >= days_threshold,
            None => true,
        }
    }

    /// Current time uncertainty including drift since the anchor (seconds)
    pub fn estimated_uncertainty_s(&self, now: Timestamp) -> u32 {
        if !self.record.valid && !self.record.time_known {
            return NO_ASSISTANCE_UNCERTAINTY_S;
        }
        let hours = elapsed_s(self.record.time_anchor, now) / SECONDS_PER_HOUR;
        let drift_s = hours.saturating_mul(CLOCK_DRIFT_MS_PER_HOUR) / 1000;
        self.record.uncertainty_s.saturating_add(drift_s)
    }

    /// Current unix time estimate, or the local clock when no time is known
    pub fn estimated_time(&self, now: Timestamp) -> u32 {
        if !self.record.time_known {
            return now;
        }
        self.record
            .reference_time
            .wrapping_add(elapsed_s(self.record.time_anchor, now))
    }
}
