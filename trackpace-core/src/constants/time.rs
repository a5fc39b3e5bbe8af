//! Time-Related Constants
//!
//! The scheduler counts in whole seconds on the local monotonic clock; the
//! alarm seam has one-second resolution, so nothing here is finer than that.

// ===== TIME UNIT CONVERSIONS =====

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u32 = 3_600;

/// Seconds per day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Offset between the GPS epoch (1980-01-06) and the Unix epoch, seconds.
pub const GPS_EPOCH_UNIX_OFFSET_S: u32 = 315_964_800;

/// GPS-UTC leap second difference currently in force.
pub const GPS_UTC_LEAP_SECONDS: u32 = 18;

// ===== SCHEDULER PACING =====

/// Delay between two frames of the same session (seconds).
///
/// Gives the network a fair share of the channel between uplinks instead
/// of queueing the whole session back to back.
pub const INTER_FRAME_SPACING_S: u32 = 30;

/// Wake delay used by "run now" requests (seconds).
pub const IMMEDIATE_WAKE_S: u32 = 1;

/// First wake after the network join completes (seconds).
pub const POST_JOIN_WAKE_S: u32 = 15;

/// Minimum delay ever programmed into the alarm (seconds).
pub const MIN_ALARM_DELAY_S: u32 = 1;

/// Interval between network time requests (seconds).
///
/// Four hours keeps the drift term well inside the warm-start bound.
pub const TIME_RESYNC_INTERVAL_S: u32 = 4 * SECONDS_PER_HOUR;

// ===== CONFIGURATION LIMITS =====

/// Shortest periodic reporting interval accepted (seconds).
pub const MIN_PERIODIC_INTERVAL_S: u32 = SECONDS_PER_MINUTE;

/// Longest periodic reporting interval accepted (seconds, one week).
pub const MAX_PERIODIC_INTERVAL_S: u32 = 7 * SECONDS_PER_DAY;

/// Longest Bluetooth scan window accepted (seconds).
pub const MAX_BLUETOOTH_SCAN_S: u32 = 30;
