//! Constants for the Positioning Scheduler
//!
//! Centralised numeric values used throughout the scheduler, each with the
//! unit in its name. Values that a deployment may want to change at runtime
//! live in [`crate::config`] instead and only take their defaults from here.
//!
//! ## Organization
//!
//! - **Time**: Unit conversions and scheduler pacing intervals
//! - **Assistance**: Freshness thresholds, scan durations and drift model
//! - **Buffers**: Fixed capacities for results, frames and command strings
//! - **Frame**: Uplink type tags, reason codes and downlink identifiers

/// Time-related constants for pacing and unit conversion.
pub mod time;

/// Assistance freshness thresholds and satellite scan durations.
pub mod assistance;

/// Buffer sizes for scan results, frames and receiver commands.
pub mod buffers;

/// Uplink frame tags and downlink command identifiers.
pub mod frame;

// Re-export commonly used constants for convenience
pub use time::{
    SECONDS_PER_MINUTE, SECONDS_PER_HOUR, SECONDS_PER_DAY,
    INTER_FRAME_SPACING_S, IMMEDIATE_WAKE_S, POST_JOIN_WAKE_S,
    TIME_RESYNC_INTERVAL_S,
};

pub use assistance::{
    EXCELLENT_MAX_AGE_MIN, GOOD_MAX_AGE_MIN, FAIR_MAX_AGE_MIN,
    ALMANAC_MAINTENANCE_SCAN_S, ALMANAC_MAINTENANCE_DAYS,
};

pub use buffers::{
    SENSOR_RESULT_CAPACITY, SCAN_ENTRY_SIZE, MAX_SCAN_ENTRIES, MAX_FRAME_SIZE,
};
