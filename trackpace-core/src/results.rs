//! Per-Session Scan Results
//!
//! One fixed buffer per modality, filled by the matching `end` call and
//! drained by the pacer one frame at a time. Buffers hold the modality block
//! exactly as it goes on the wire, so framing is a plain copy.

use heapless::Vec;

use crate::constants::buffers::{MAX_SCAN_ENTRIES, SATELLITE_BLOCK_SIZE, SCAN_ENTRY_SIZE, SENSOR_RESULT_CAPACITY};
use crate::policy::Source;
use crate::traits::sensors::{SatelliteFix, ScanEntries};

/// Scale from degrees to the integer wire unit (1e-6 degree)
const MICRODEGREES_PER_DEGREE: f64 = 1_000_000.0;

/// Raw result of one modality
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorResult {
    raw: Vec<u8, SENSOR_RESULT_CAPACITY>,
}

impl SensorResult {
    /// Empty result
    pub const fn new() -> Self {
        Self { raw: Vec::new() }
    }

    /// Whether nothing usable was captured
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Encoded length (bytes)
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Encoded block
    pub fn as_slice(&self) -> &[u8] {
        &self.raw
    }

    /// Number of scan entries held
    pub fn entry_count(&self) -> u8 {
        (self.raw.len() / SCAN_ENTRY_SIZE) as u8
    }

    /// Drop the contents
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Store a satellite fix as longitude then latitude, i32 big-endian
    ///
    /// An invalid fix leaves the result empty.
    pub fn record_fix(&mut self, fix: &SatelliteFix) {
        self.raw.clear();
        if !fix.valid {
            return;
        }
        let _ = self.raw.extend_from_slice(&to_microdegrees(fix.longitude).to_be_bytes());
        let _ = self.raw.extend_from_slice(&to_microdegrees(fix.latitude).to_be_bytes());
        debug_assert_eq!(self.raw.len(), SATELLITE_BLOCK_SIZE);
    }

    /// Store the strongest `max` entries, strongest first
    ///
    /// Returns the number of entries kept.
    pub fn record_entries(&mut self, mut entries: ScanEntries, max: u8) -> usize {
        self.raw.clear();
        entries.sort_unstable_by(|a, b| b.rssi.cmp(&a.rssi));

        let keep = entries.len().min(max as usize).min(MAX_SCAN_ENTRIES);
        for entry in entries.iter().take(keep) {
            let _ = self.raw.extend_from_slice(&entry.address);
            let _ = self.raw.push(entry.rssi as u8);
        }
        keep
    }
}

fn to_microdegrees(degrees: f32) -> i32 {
    libm::round(degrees as f64 * MICRODEGREES_PER_DEGREE) as i32
}

/// The three modality buffers of the active session
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    satellite: SensorResult,
    wifi: SensorResult,
    bluetooth: SensorResult,
    pending_count: u8,
}

impl ResultSet {
    /// Transmit priority
    pub const PRIORITY: [Source; 3] = [Source::Satellite, Source::Wifi, Source::Bluetooth];

    /// Empty set
    pub const fn new() -> Self {
        Self {
            satellite: SensorResult::new(),
            wifi: SensorResult::new(),
            bluetooth: SensorResult::new(),
            pending_count: 0,
        }
    }

    /// Buffer for a source
    pub fn get(&self, source: Source) -> &SensorResult {
        match source {
            Source::Satellite => &self.satellite,
            Source::Wifi => &self.wifi,
            Source::Bluetooth => &self.bluetooth,
        }
    }

    /// Mutable buffer for a source
    pub fn get_mut(&mut self, source: Source) -> &mut SensorResult {
        match source {
            Source::Satellite => &mut self.satellite,
            Source::Wifi => &mut self.wifi,
            Source::Bluetooth => &mut self.bluetooth,
        }
    }

    /// Number of non-empty buffers
    pub fn non_empty_count(&self) -> u8 {
        Self::PRIORITY.iter().filter(|s| !self.get(**s).is_empty()).count() as u8
    }

    /// Frames left to send this session
    pub fn pending_count(&self) -> u8 {
        self.pending_count
    }

    /// Close the set for draining and return the number of frames owed
    ///
    /// A session that found nothing still owes one sensor-only frame.
    pub fn seal(&mut self) -> u8 {
        self.pending_count = self.non_empty_count().max(1);
        self.pending_count
    }

    /// Highest-priority buffer still holding data, `None` for sensor-only
    pub fn next_block(&self) -> Option<Source> {
        Self::PRIORITY.iter().copied().find(|s| !self.get(*s).is_empty())
    }

    /// Mark the frame for `block` as handed to the link
    pub fn complete(&mut self, block: Option<Source>) {
        if let Some(source) = block {
            self.get_mut(source).clear();
        }
        self.pending_count = self.pending_count.saturating_sub(1);
    }

    /// Whether every owed frame has been sent
    pub fn is_drained(&self) -> bool {
        self.pending_count == 0
    }

    /// Reset for a new session
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
