//! Sensor Driver Contracts
//!
//! Each positioning source is a begin/end pair. `begin` powers the radio and
//! starts acquisition; `end` collects whatever was found and powers down.
//! The time between the two is decided by the scheduler, never by the driver.

use crate::constants::buffers::SCAN_CANDIDATE_CAPACITY;
use crate::errors::TrackerResult;

/// Outcome of a satellite acquisition window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SatelliteFix {
    /// Whether the receiver produced a position
    pub valid: bool,
    /// Latitude in degrees
    pub latitude: f32,
    /// Longitude in degrees
    pub longitude: f32,
}

impl SatelliteFix {
    /// A window that produced nothing
    pub const fn none() -> Self {
        Self { valid: false, latitude: 0.0, longitude: 0.0 }
    }

    /// A window that produced a position
    pub const fn at(latitude: f32, longitude: f32) -> Self {
        Self { valid: true, latitude, longitude }
    }
}

/// One access point or beacon heard during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanEntry {
    /// MAC address (BSSID or beacon address)
    pub address: [u8; 6],
    /// Received signal strength (dBm)
    pub rssi: i8,
}

/// Unsorted candidates as reported by a scan driver
pub type ScanEntries = heapless::Vec<ScanEntry, SCAN_CANDIDATE_CAPACITY>;

/// Satellite receiver (GNSS) driver
///
/// The injection calls are only made between `begin` and `end`, while the
/// receiver is powered. They are best-effort: an error is logged by the
/// scheduler and the acquisition window still runs to completion.
pub trait SatelliteReceiver {
    /// Power on and start acquisition
    fn begin(&mut self) -> TrackerResult<()>;

    /// Stop acquisition, power down and report the fix
    fn end(&mut self) -> SatelliteFix;

    /// Seed the receiver with the current UTC time (unix seconds)
    fn inject_time(&mut self, unix_time: u32) -> TrackerResult<()>;

    /// Seed the receiver with an approximate position
    fn inject_position(&mut self, latitude: f32, longitude: f32, accuracy_m: f32) -> TrackerResult<()>;

    /// Ask for a warm start using the injected aids
    fn request_warm_start(&mut self) -> TrackerResult<()>;
}

/// Wi-Fi or Bluetooth scanner
///
/// Entries may be reported in any order and may exceed what fits in a
/// frame; the scheduler sorts by RSSI and keeps the strongest.
pub trait ScanDriver {
    /// Power on and start scanning
    fn begin(&mut self) -> TrackerResult<()>;

    /// Stop scanning, power down and report what was heard
    fn end(&mut self) -> ScanEntries;
}

/// Fixed sensor readings included in every uplink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorBlock {
    /// Battery voltage (mV)
    pub battery_mv: u16,
    /// Temperature in tenths of a degree Celsius
    pub temperature_dc: i16,
    /// Ambient light (raw ADC counts)
    pub light: u16,
    /// Accelerometer axes, when sampled
    pub accel: Option<[i16; 3]>,
}

/// Everything the scheduler needs from the board
///
/// ```rust,ignore
/// impl Board for TrackerBoard {
///     type Satellite = Ag3335;
///     type Wifi = Lr1110Wifi;
///     type Bluetooth = NrfScanner;
///
///     fn satellite(&mut self) -> &mut Ag3335 { &mut self.gnss }
///     // ...
/// }
/// ```
pub trait Board {
    /// Satellite receiver type
    type Satellite: SatelliteReceiver;
    /// Wi-Fi scanner type
    type Wifi: ScanDriver;
    /// Bluetooth scanner type
    type Bluetooth: ScanDriver;

    /// Satellite receiver
    fn satellite(&mut self) -> &mut Self::Satellite;

    /// Wi-Fi scanner
    fn wifi(&mut self) -> &mut Self::Wifi;

    /// Bluetooth scanner
    fn bluetooth(&mut self) -> &mut Self::Bluetooth;

    /// Sample the fixed sensors; accelerometer only when `with_accel`
    fn sensor_block(&mut self, with_accel: bool) -> SensorBlock;

    /// Whether external power is connected
    fn is_charging(&self) -> bool;
}
