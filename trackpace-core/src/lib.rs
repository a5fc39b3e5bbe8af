//! Adaptive positioning scheduler for trackpace
//!
//! Decides which positioning source a battery-powered tracker samples, for
//! how long and in what order, then frames and paces the results over a
//! duty-cycled, payload-limited uplink.
//!
//! Key constraints:
//! - Runs on a microcontroller with a few KB of RAM to spare
//! - No heap allocation anywhere
//! - One alarm drives everything; no threads, no locks
//!
//! ```no_run
//! use trackpace_core::{AssistanceCache, DurationPlanner};
//!
//! let mut cache = AssistanceCache::new();
//! cache.ingest_external(0, 37.1, -8.46, Some(1_700_000_000), 60);
//!
//! let planner = DurationPlanner::default();
//! let window_s = planner.recommended_satellite_duration(&cache, 600, false);
//! assert_eq!(window_s, 10);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod assistance;
pub mod config;
pub mod constants;
pub mod downlink;
pub mod errors;
pub mod gnss_assist;
pub mod planner;
pub mod policy;
pub mod results;
pub mod scheduler;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod traits;

// Public API
pub use assistance::{AssistanceCache, AssistanceQuality, AssistanceRecord};
pub use config::{PacketPolicy, TrackerConfig};
pub use errors::{TrackerError, TrackerResult};
pub use planner::{DurationPlanner, PlannerConfig};
pub use policy::{ScanPolicy, Source};
pub use scheduler::Tracker;
pub use session::{Phase, ScanSession, TriggerReason};
pub use telemetry::TelemetryPacer;
pub use traits::{Alarm, Board, Clock, LinkLayer, SatelliteReceiver, ScanDriver, SendOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
