//! Collaborator Traits for the Scheduler
//!
//! The scheduler owns the decisions; everything that touches hardware or the
//! network sits behind one of these traits. A board support package provides
//! the implementations, tests provide mocks.
//!
//! ## Module Organization
//!
//! - [`time`] - Local monotonic clock
//! - [`alarm`] - The single-shot alarm that drives every scheduler step
//! - [`link`] - Uplink/downlink stack with duty-cycle and payload feedback
//! - [`sensors`] - Satellite receiver, radio scan drivers and the board bundle
//!
//! ## Design Philosophy
//!
//! All calls are synchronous and bounded. A driver's `begin` may block for a
//! power-up handshake but never for the duration of a scan: the scan window
//! is enforced by the alarm alone. Generics keep dispatch static, which
//! matters on a microcontroller with no spare flash for vtables.

pub mod alarm;
pub mod link;
pub mod sensors;
pub mod time;

pub use alarm::Alarm;
pub use link::{LinkLayer, SendOutcome};
pub use sensors::{
    Board, SatelliteFix, SatelliteReceiver, ScanDriver, ScanEntry, ScanEntries, SensorBlock,
};
pub use time::Clock;
