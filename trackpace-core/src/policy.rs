//! Scan Policies and Source Ordering
//!
//! A policy names which positioning sources a session may use and in what
//! order. It is fixed when the session starts; a policy change arriving
//! mid-session waits until the session has drained.

use heapless::Vec;

/// Positioning source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Satellite receiver (GNSS)
    Satellite,
    /// Wi-Fi access point scan
    Wifi,
    /// Bluetooth beacon scan
    Bluetooth,
}

impl Source {
    /// Short name for traces
    pub const fn name(self) -> &'static str {
        match self {
            Self::Satellite => "satellite",
            Self::Wifi => "wifi",
            Self::Bluetooth => "bluetooth",
        }
    }
}

/// Phase order for one session (at most one phase per source)
pub type SourceOrder = Vec<Source, 3>;

/// Which sources a session scans, in nominal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScanPolicy {
    /// Satellite only
    #[default]
    SatelliteOnly = 0,
    /// Wi-Fi only
    WifiOnly = 1,
    /// Bluetooth only
    BluetoothOnly = 2,
    /// Wi-Fi, then satellite if Wi-Fi heard nothing
    WifiSatellite = 3,
    /// Satellite, then Wi-Fi if no fix
    SatelliteWifi = 4,
    /// Bluetooth, then Wi-Fi
    BluetoothWifi = 5,
    /// Bluetooth, then satellite
    BluetoothSatellite = 6,
    /// Bluetooth, then Wi-Fi, then satellite
    BluetoothWifiSatellite = 7,
}

impl ScanPolicy {
    /// All policies in wire-code order
    pub const ALL: [ScanPolicy; 8] = [
        Self::SatelliteOnly,
        Self::WifiOnly,
        Self::BluetoothOnly,
        Self::WifiSatellite,
        Self::SatelliteWifi,
        Self::BluetoothWifi,
        Self::BluetoothSatellite,
        Self::BluetoothWifiSatellite,
    ];

    /// Wire code used in status frames and downlinks
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Sources in nominal order
    pub const fn sources(self) -> &'static [Source] {
        use Source::*;
        match self {
            Self::SatelliteOnly => &[Satellite],
            Self::WifiOnly => &[Wifi],
            Self::BluetoothOnly => &[Bluetooth],
            Self::WifiSatellite => &[Wifi, Satellite],
            Self::SatelliteWifi => &[Satellite, Wifi],
            Self::BluetoothWifi => &[Bluetooth, Wifi],
            Self::BluetoothSatellite => &[Bluetooth, Satellite],
            Self::BluetoothWifiSatellite => &[Bluetooth, Wifi, Satellite],
        }
    }

    /// Whether the policy scans `source` at all
    pub fn uses(self, source: Source) -> bool {
        self.sources().contains(&source)
    }

    /// Whether the policy has more than one phase
    pub fn is_composite(self) -> bool {
        self.sources().len() > 1
    }

    /// Phase order for a session
    ///
    /// With `satellite_first` set, the satellite phase (if the policy has
    /// one) is pulled to the front and the others keep their relative order.
    pub fn session_order(self, satellite_first: bool) -> SourceOrder {
        let mut order = SourceOrder::new();
        let promote = satellite_first && self.uses(Source::Satellite);
        if promote {
            let _ = order.push(Source::Satellite);
        }
        for &source in self.sources() {
            if promote && source == Source::Satellite {
                continue;
            }
            let _ = order.push(source);
        }
        order
    }

    /// Short name for traces
    pub const fn name(self) -> &'static str {
        match self {
            Self::SatelliteOnly => "satellite",
            Self::WifiOnly => "wifi",
            Self::BluetoothOnly => "bluetooth",
            Self::WifiSatellite => "wifi+satellite",
            Self::SatelliteWifi => "satellite+wifi",
            Self::BluetoothWifi => "bluetooth+wifi",
            Self::BluetoothSatellite => "bluetooth+satellite",
            Self::BluetoothWifiSatellite => "bluetooth+wifi+satellite",
        }
    }
}
