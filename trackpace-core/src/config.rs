//! Tracker Configuration
//!
//! Runtime parameters that the network (via downlink) or the host (via
//! persistent storage) may change. Defaults match a freshly flashed device:
//! satellite-only tracking once a minute.
//!
//! ```rust
//! use trackpace_core::config::TrackerConfig;
//! use trackpace_core::policy::ScanPolicy;
//!
//! let config = TrackerConfig::default()
//!     .with_policy(ScanPolicy::WifiSatellite)
//!     .with_periodic_interval_s(15 * 60);
//! assert!(config.validate().is_ok());
//! ```

use crate::constants::buffers::MAX_SCAN_ENTRIES;
use crate::constants::time::{MAX_BLUETOOTH_SCAN_S, MAX_PERIODIC_INTERVAL_S, MIN_PERIODIC_INTERVAL_S};
use crate::errors::{TrackerError, TrackerResult};
use crate::policy::ScanPolicy;

/// Whether position uplinks request acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketPolicy {
    /// Fire and forget
    #[default]
    Unconfirmed,
    /// Every position frame is confirmed
    Confirmed,
}

/// Behaviour of the SOS trigger, reported in the status frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SosMode {
    /// One session per press
    Single = 0,
    /// Sessions repeat until cancelled
    #[default]
    Continuous = 1,
}

/// Major/minor version pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Major
    pub major: u8,
    /// Minor
    pub minor: u8,
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Sources scanned each session
    pub policy: ScanPolicy,
    /// Reporting period, measured from session start (seconds)
    pub periodic_interval_s: u32,
    /// Longest satellite window outside almanac maintenance (seconds)
    pub satellite_ceiling_s: u32,
    /// Wi-Fi scan window (seconds)
    pub wifi_scan_s: u32,
    /// Bluetooth scan window (seconds)
    pub bluetooth_scan_s: u32,
    /// Access points kept per frame
    pub wifi_max: u8,
    /// Beacons kept per frame
    pub bluetooth_max: u8,
    /// Include accelerometer axes in every frame
    pub accel_enabled: bool,
    /// Confirmation policy for position frames
    pub packet_policy: PacketPolicy,
    /// SOS trigger behaviour
    pub sos_mode: SosMode,
    /// Run every source every session, never stopping early
    pub test_mode: bool,
    /// Firmware version reported in the status frame
    pub firmware: Version,
    /// Hardware version reported in the status frame
    pub hardware: Version,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            policy: ScanPolicy::SatelliteOnly,
            periodic_interval_s: MIN_PERIODIC_INTERVAL_S,
            satellite_ceiling_s: 60,
            wifi_scan_s: 3,
            bluetooth_scan_s: 3,
            wifi_max: 3,
            bluetooth_max: 3,
            accel_enabled: false,
            packet_policy: PacketPolicy::Unconfirmed,
            sos_mode: SosMode::Continuous,
            test_mode: false,
            firmware: Version { major: 1, minor: 0 },
            hardware: Version { major: 1, minor: 0 },
        }
    }
}

impl TrackerConfig {
    /// Set the scan policy
    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the reporting period (seconds)
    pub fn with_periodic_interval_s(mut self, interval_s: u32) -> Self {
        self.periodic_interval_s = interval_s;
        self
    }

    /// Set the satellite window ceiling (seconds)
    pub fn with_satellite_ceiling_s(mut self, ceiling_s: u32) -> Self {
        self.satellite_ceiling_s = ceiling_s;
        self
    }

    /// Set the Wi-Fi scan window (seconds)
    pub fn with_wifi_scan_s(mut self, duration_s: u32) -> Self {
        self.wifi_scan_s = duration_s;
        self
    }

    /// Set the Bluetooth scan window, clamped to the supported maximum
    pub fn with_bluetooth_scan_s(mut self, duration_s: u32) -> Self {
        self.bluetooth_scan_s = duration_s.min(MAX_BLUETOOTH_SCAN_S);
        self
    }

    /// Set how many entries per scan are reported
    pub fn with_entry_limits(mut self, wifi_max: u8, bluetooth_max: u8) -> Self {
        self.wifi_max = wifi_max;
        self.bluetooth_max = bluetooth_max;
        self
    }

    /// Enable or disable the accelerometer block
    pub fn with_accel(mut self, enabled: bool) -> Self {
        self.accel_enabled = enabled;
        self
    }

    /// Set the confirmation policy
    pub fn with_packet_policy(mut self, policy: PacketPolicy) -> Self {
        self.packet_policy = policy;
        self
    }

    /// Enable or disable test mode
    pub fn with_test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Check every field against the ranges the firmware supports
    pub fn validate(&self) -> TrackerResult<()> {
        if !(MIN_PERIODIC_INTERVAL_S..=MAX_PERIODIC_INTERVAL_S).contains(&self.periodic_interval_s) {
            return Err(TrackerError::InvalidConfig { field: "periodic_interval_s" });
        }
        if self.satellite_ceiling_s == 0 {
            return Err(TrackerError::InvalidConfig { field: "satellite_ceiling_s" });
        }
        if self.wifi_scan_s == 0 {
            return Err(TrackerError::InvalidConfig { field: "wifi_scan_s" });
        }
        if self.bluetooth_scan_s == 0 || self.bluetooth_scan_s > MAX_BLUETOOTH_SCAN_S {
            return Err(TrackerError::InvalidConfig { field: "bluetooth_scan_s" });
        }
        if self.wifi_max == 0 || self.wifi_max as usize > MAX_SCAN_ENTRIES {
            return Err(TrackerError::InvalidConfig { field: "wifi_max" });
        }
        if self.bluetooth_max == 0 || self.bluetooth_max as usize > MAX_SCAN_ENTRIES {
            return Err(TrackerError::InvalidConfig { field: "bluetooth_max" });
        }
        Ok(())
    }

    /// Reporting period in whole minutes, as carried on the wire
    pub fn interval_minutes(&self) -> u16 {
        (self.periodic_interval_s / 60).min(u16::MAX as u32) as u16
    }
}
