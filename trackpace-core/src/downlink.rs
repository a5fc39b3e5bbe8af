//! Downlink Decoding
//!
//! Two ports carry data to the tracker:
//!
//! - **Vessel assistance** (port 10): a nearby vessel or gateway relays its
//!   own position, optionally with the current unix time.
//! - **Application** (port 5): configuration commands.
//!
//! ## Vessel position message
//!
//! ```text
//! ┌──────┬─────────────┬─────────────┬─────────────────┐
//! │ 0x01 │ lat i32 LE  │ lon i32 LE  │ [unix u32 LE]   │
//! │      │  1e-7 deg   │  1e-7 deg   │   13-byte form  │
//! └──────┴─────────────┴─────────────┴─────────────────┘
//! ```
//!
//! ## Application commands
//!
//! | Id   | Payload            | Effect                          |
//! |------|--------------------|---------------------------------|
//! | 0x81 | policy code (0..7) | Change scan policy              |
//! | 0x82 | -                  | Send a status frame             |
//! | 0x83 | minutes u16 BE     | Change reporting period         |

use crate::constants::frame::{
    CMD_REQUEST_STATUS, CMD_SET_INTERVAL, CMD_SET_POLICY, VESSEL_MSG_POSITION, VESSEL_POSITION_LEN,
    VESSEL_POSITION_TIME_LEN,
};
use crate::constants::time::{MAX_PERIODIC_INTERVAL_S, MIN_PERIODIC_INTERVAL_S, SECONDS_PER_MINUTE};
use crate::errors::{TrackerError, TrackerResult};
use crate::policy::ScanPolicy;

/// Degrees per wire unit of the vessel message
const DEGREES_PER_UNIT: f64 = 1e-7;

/// Decoded vessel position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VesselPosition {
    /// Latitude in degrees
    pub latitude: f32,
    /// Longitude in degrees
    pub longitude: f32,
    /// Unix time, when the 13-byte form was used
    pub unix_time: Option<u32>,
}

fn le_i32(bytes: &[u8]) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(raw)
}

/// Decode a vessel-assistance payload
pub fn decode_vessel_position(payload: &[u8]) -> TrackerResult<VesselPosition> {
    let (&msg_type, _) = payload
        .split_first()
        .ok_or(TrackerError::InvalidDownlink { reason: "empty vessel message" })?;
    if msg_type != VESSEL_MSG_POSITION {
        return Err(TrackerError::InvalidDownlink { reason: "unknown vessel message type" });
    }

    let unix_time = match payload.len() {
        VESSEL_POSITION_LEN => None,
        VESSEL_POSITION_TIME_LEN => Some(le_i32(&payload[9..13]) as u32),
        _ => return Err(TrackerError::InvalidDownlink { reason: "vessel message length" }),
    };

    let latitude = le_i32(&payload[1..5]) as f64 * DEGREES_PER_UNIT;
    let longitude = le_i32(&payload[5..9]) as f64 * DEGREES_PER_UNIT;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackerError::InvalidDownlink { reason: "vessel position out of range" });
    }

    Ok(VesselPosition { latitude: latitude as f32, longitude: longitude as f32, unix_time })
}

/// Application-port command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppCommand {
    /// Switch to another scan policy
    SetPolicy(ScanPolicy),
    /// Report configuration now
    RequestStatus,
    /// Change the reporting period (seconds)
    SetInterval(u32),
}

/// Decode an application-port payload
pub fn decode_app_command(payload: &[u8]) -> TrackerResult<AppCommand> {
    match payload {
        [CMD_SET_POLICY, code, ..] => ScanPolicy::from_code(*code)
            .map(AppCommand::SetPolicy)
            .ok_or(TrackerError::InvalidDownlink { reason: "unknown policy code" }),
        [CMD_REQUEST_STATUS, ..] => Ok(AppCommand::RequestStatus),
        [CMD_SET_INTERVAL, hi, lo, ..] => {
            let interval_s = u16::from_be_bytes([*hi, *lo]) as u32 * SECONDS_PER_MINUTE;
            if (MIN_PERIODIC_INTERVAL_S..=MAX_PERIODIC_INTERVAL_S).contains(&interval_s) {
                Ok(AppCommand::SetInterval(interval_s))
            } else {
                Err(TrackerError::InvalidDownlink { reason: "interval out of range" })
            }
        }
        [] => Err(TrackerError::InvalidDownlink { reason: "empty command" }),
        _ => Err(TrackerError::InvalidDownlink { reason: "unknown or truncated command" }),
    }
}
