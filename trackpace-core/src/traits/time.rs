//! Clock Abstraction
//!
//! The scheduler only ever needs the local monotonic second counter. It is
//! read once per entry point and threaded through as `now`.

use crate::time::Timestamp;

/// Source of local monotonic time
///
/// ## Implementation Requirements
///
/// - Seconds since boot (or any fixed origin), never adjusted by time syncs
/// - Must keep counting across low-power sleep
/// - Wrap-around after ~136 years is not handled
///
/// ```rust
/// use trackpace_core::traits::Clock;
/// use trackpace_core::time::Timestamp;
///
/// struct RtcCounter {
///     // ... RTC peripheral handle
/// }
///
/// impl Clock for RtcCounter {
///     fn now(&self) -> Timestamp {
///         0 // read the RTC counter register
///     }
/// }
/// ```
pub trait Clock {
    /// Current local time in seconds
    fn now(&self) -> Timestamp;
}
