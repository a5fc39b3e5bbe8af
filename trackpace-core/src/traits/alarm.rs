//! Single-Shot Alarm
//!
//! The scheduler's only clock source for sequencing. There is never more than
//! one alarm outstanding: arming a new one replaces whatever was pending.

use fugit::SecsDurationU32;

/// Single-shot wake-up timer
pub trait Alarm {
    /// Arm the alarm to fire once after `delay`, replacing any pending alarm
    fn start(&mut self, delay: SecsDurationU32);

    /// Cancel the pending alarm, if any
    fn clear(&mut self);
}
