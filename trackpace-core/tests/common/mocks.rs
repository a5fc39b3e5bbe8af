//! Recording mocks for every collaborator the tracker talks to
//!
//! Each mock keeps a log of the calls it received so tests can assert on
//! ordering and arguments, and takes scripted responses for the calls that
//! return data.

use std::collections::VecDeque;
use std::vec::Vec;

use fugit::SecsDurationU32;
use trackpace_core::traits::sensors::{SatelliteFix, ScanEntries, ScanEntry, SensorBlock};
use trackpace_core::{Alarm, Board, LinkLayer, SatelliteReceiver, ScanDriver, SendOutcome, TrackerError, TrackerResult};

/// One frame handed to the link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    pub payload: Vec<u8>,
    pub confirmed: bool,
}

/// Link layer with adjustable duty cycle and payload window
#[derive(Debug)]
pub struct MockLink {
    pub joined: bool,
    pub max_payload: u16,
    pub duty_cycle_ms: i32,
    pub sent: Vec<SentFrame>,
    pub flush_requests: u32,
    pub time_sync_requests: u32,
}

impl Default for MockLink {
    fn default() -> Self {
        Self {
            joined: true,
            max_payload: 242,
            duty_cycle_ms: 0,
            sent: Vec::new(),
            flush_requests: 0,
            time_sync_requests: 0,
        }
    }
}

impl MockLink {
    /// Type tags of every frame sent, in order
    pub fn tags(&self) -> Vec<u8> {
        self.sent.iter().map(|frame| frame.payload[0]).collect()
    }
}

impl LinkLayer for MockLink {
    fn is_joined(&self) -> bool {
        self.joined
    }

    fn send(&mut self, payload: &[u8], confirmed: bool) -> SendOutcome {
        if self.duty_cycle_ms < 0 {
            return SendOutcome::DutyCycleBlocked;
        }
        if payload.len() > self.max_payload as usize {
            return SendOutcome::TooLarge;
        }
        self.sent.push(SentFrame { payload: payload.to_vec(), confirmed });
        SendOutcome::Enqueued
    }

    fn max_payload_len(&self) -> u16 {
        self.max_payload
    }

    fn request_flush_frame(&mut self, _confirmed: bool) {
        self.flush_requests += 1;
    }

    fn duty_cycle_remaining_ms(&self) -> i32 {
        self.duty_cycle_ms
    }

    fn request_time_sync(&mut self) {
        self.time_sync_requests += 1;
    }
}

/// Alarm that remembers every delay it was armed with
#[derive(Debug, Default)]
pub struct MockAlarm {
    pub armed: Option<u32>,
    pub history: Vec<u32>,
    pub clears: u32,
}

impl Alarm for MockAlarm {
    fn start(&mut self, delay: SecsDurationU32) {
        self.armed = Some(delay.to_secs());
        self.history.push(delay.to_secs());
    }

    fn clear(&mut self) {
        self.armed = None;
        self.clears += 1;
    }
}

/// Satellite receiver with scripted fixes
#[derive(Debug, Default)]
pub struct MockSatellite {
    pub fixes: VecDeque<SatelliteFix>,
    pub begins: u32,
    pub ends: u32,
    pub fail_begin: bool,
    pub injected_times: Vec<u32>,
    pub injected_positions: Vec<(f32, f32, f32)>,
    pub warm_starts: u32,
}

impl SatelliteReceiver for MockSatellite {
    fn begin(&mut self) -> TrackerResult<()> {
        self.begins += 1;
        if self.fail_begin {
            return Err(TrackerError::Driver { reason: "receiver did not power up" });
        }
        Ok(())
    }

    fn end(&mut self) -> SatelliteFix {
        self.ends += 1;
        self.fixes.pop_front().unwrap_or(SatelliteFix::none())
    }

    fn inject_time(&mut self, unix_time: u32) -> TrackerResult<()> {
        self.injected_times.push(unix_time);
        Ok(())
    }

    fn inject_position(&mut self, latitude: f32, longitude: f32, accuracy_m: f32) -> TrackerResult<()> {
        self.injected_positions.push((latitude, longitude, accuracy_m));
        Ok(())
    }

    fn request_warm_start(&mut self) -> TrackerResult<()> {
        self.warm_starts += 1;
        Ok(())
    }
}

/// Wi-Fi or Bluetooth scanner with scripted results
#[derive(Debug, Default)]
pub struct MockScanner {
    pub results: VecDeque<Vec<ScanEntry>>,
    pub begins: u32,
    pub ends: u32,
}

impl MockScanner {
    /// Queue one scan hearing `count` devices with descending RSSI
    pub fn script_hits(&mut self, count: u8) {
        let entries = (0..count)
            .map(|i| ScanEntry { address: [0x02, 0, 0, 0, 0, i], rssi: -40 - i as i8 })
            .collect();
        self.results.push_back(entries);
    }
}

impl ScanDriver for MockScanner {
    fn begin(&mut self) -> TrackerResult<()> {
        self.begins += 1;
        Ok(())
    }

    fn end(&mut self) -> ScanEntries {
        self.ends += 1;
        let mut entries = ScanEntries::new();
        for entry in self.results.pop_front().unwrap_or_default() {
            let _ = entries.push(entry);
        }
        entries
    }
}

/// Board bundling the mock drivers
#[derive(Debug)]
pub struct MockBoard {
    pub satellite: MockSatellite,
    pub wifi: MockScanner,
    pub bluetooth: MockScanner,
    pub charging: bool,
    pub sensors: SensorBlock,
}

impl Default for MockBoard {
    fn default() -> Self {
        Self {
            satellite: MockSatellite::default(),
            wifi: MockScanner::default(),
            bluetooth: MockScanner::default(),
            charging: false,
            sensors: SensorBlock { battery_mv: 3_900, temperature_dc: 215, light: 120, accel: None },
        }
    }
}

impl Board for MockBoard {
    type Satellite = MockSatellite;
    type Wifi = MockScanner;
    type Bluetooth = MockScanner;

    fn satellite(&mut self) -> &mut MockSatellite {
        &mut self.satellite
    }

    fn wifi(&mut self) -> &mut MockScanner {
        &mut self.wifi
    }

    fn bluetooth(&mut self) -> &mut MockScanner {
        &mut self.bluetooth
    }

    fn sensor_block(&mut self, with_accel: bool) -> SensorBlock {
        SensorBlock {
            accel: if with_accel { Some([12, -3, 1_000]) } else { None },
            ..self.sensors
        }
    }

    fn is_charging(&self) -> bool {
        self.charging
    }
}
