//! Telemetry Encoder and Pacer
//!
//! Turns a session's results into uplink frames and spaces them out.
//!
//! - [`frame`] - Wire layout of position and status frames
//! - [`pacer`] - One frame per tick, duty-cycle and payload-size aware
//!
//! ## Frame layout
//!
//! ```text
//! ┌─────┬────────┬─────────┬──────────┬───────┬──────────────┬─────────────────┐
//! │ tag │ reason │ battery │ temp i16 │ light │ [accel 3×i16]│ modality block  │
//! │ 1 B │  1 B   │  1 B %  │ 0.1 °C   │ u16   │   optional   │ sat: lon,lat    │
//! │     │        │         │   BE     │  BE   │     BE       │ scan: n + n×7 B │
//! └─────┴────────┴─────────┴──────────┴───────┴──────────────┴─────────────────┘
//! ```
//!
//! The tag encodes both the modality and whether the accelerometer block is
//! present, so the network side can parse without a length table.

pub mod frame;
pub mod pacer;

pub use frame::{battery_percent, encode_position_frame, encode_status_frame, frame_tag, FrameBuffer};
pub use pacer::{DrainContext, PacerState, TelemetryPacer};
