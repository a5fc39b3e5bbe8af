//! Assistance Freshness and Satellite Scan Durations
//!
//! A satellite receiver that already knows roughly where it is and what time
//! it is acquires a fix in seconds instead of a minute. These thresholds
//! describe how quickly that knowledge goes stale and how much scan time
//! each freshness tier buys.

// ===== FRESHNESS THRESHOLDS =====

/// Upper bound (exclusive) of the `Excellent` tier, minutes since capture.
pub const EXCELLENT_MAX_AGE_MIN: u32 = 30;

/// Upper bound (exclusive) of the `Good` tier, minutes since capture.
pub const GOOD_MAX_AGE_MIN: u32 = 90;

/// Upper bound (exclusive) of the `Fair` tier, minutes since capture.
///
/// Anything older is `Poor` and treated like a cold start.
pub const FAIR_MAX_AGE_MIN: u32 = 180;

// ===== SATELLITE SCAN DURATIONS =====

/// Scan duration with `Excellent` assistance (seconds).
pub const SATELLITE_SCAN_EXCELLENT_S: u32 = 10;

/// Scan duration with `Good` assistance (seconds).
pub const SATELLITE_SCAN_GOOD_S: u32 = 15;

/// Scan duration with `Fair` assistance (seconds).
pub const SATELLITE_SCAN_FAIR_S: u32 = 25;

/// Default ceiling, used for `Poor` assistance and cold starts (seconds).
pub const SATELLITE_SCAN_COLD_S: u32 = 60;

/// Almanac maintenance scan duration (seconds).
///
/// 12.5 minutes covers a full almanac broadcast cycle from one satellite.
pub const ALMANAC_MAINTENANCE_SCAN_S: u32 = 750;

/// Days without a fresh record before almanac maintenance is due.
pub const ALMANAC_MAINTENANCE_DAYS: u32 = 14;

// ===== TIME UNCERTAINTY MODEL =====

/// Uncertainty reported when no record exists at all (seconds).
pub const NO_ASSISTANCE_UNCERTAINTY_S: u32 = 3_600;

/// Base uncertainty of a relayed position/time message (seconds).
///
/// Covers queuing inside the relay and the downlink scheduling delay.
pub const RELAY_MESSAGE_UNCERTAINTY_S: u32 = 60;

/// Local clock drift, milliseconds per elapsed hour.
///
/// 3 s/day, typical for an uncompensated 32 kHz crystal.
pub const CLOCK_DRIFT_MS_PER_HOUR: u32 = 125;

// ===== WARM START CRITERIA =====

/// Time uncertainty must be below this for a warm start (seconds).
pub const WARM_START_MAX_UNCERTAINTY_S: u32 = 3;

/// Position must be younger than this for a warm start (hours).
pub const WARM_START_MAX_POSITION_AGE_H: u32 = 4;

/// Horizontal accuracy quoted with an injected position (metres).
pub const INJECTED_POSITION_ACCURACY_M: f32 = 50.0;
