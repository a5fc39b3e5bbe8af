//! Canned downlinks and tracker setups

use std::vec::Vec;

use trackpace_core::constants::frame::VESSEL_MSG_POSITION;
use trackpace_core::time::MockClock;
use trackpace_core::{Tracker, TrackerConfig};

use super::mocks::{MockAlarm, MockBoard, MockLink};

/// Tracker wired to recording mocks
pub type TestTracker = Tracker<MockBoard, MockLink, MockAlarm, MockClock>;

/// 2024-01-01T00:00:00Z
pub const NEW_YEAR_2024: u32 = 1_704_067_200;

/// Build a tracker at local time zero
pub fn tracker(config: TrackerConfig) -> TestTracker {
    Tracker::new(
        MockBoard::default(),
        MockLink::default(),
        MockAlarm::default(),
        MockClock::new(0),
        config,
    )
    .expect("test configuration is valid")
}

/// Vessel position downlink, 9-byte form or 13-byte form with time
pub fn vessel_message(latitude: f64, longitude: f64, unix_time: Option<u32>) -> Vec<u8> {
    let mut payload = vec![VESSEL_MSG_POSITION];
    payload.extend_from_slice(&((latitude * 1e7).round() as i32).to_le_bytes());
    payload.extend_from_slice(&((longitude * 1e7).round() as i32).to_le_bytes());
    if let Some(time) = unix_time {
        payload.extend_from_slice(&time.to_le_bytes());
    }
    payload
}

/// Advance the clock by `delay_s` and fire the alarm
pub fn fire_after(tracker: &mut TestTracker, delay_s: u32) {
    tracker.clock_mut().advance(delay_s);
    tracker.on_alarm();
}

/// Fire the currently armed alarm after its delay
pub fn fire_armed(tracker: &mut TestTracker) -> u32 {
    let delay_s = tracker.alarm().armed.expect("an alarm is armed");
    fire_after(tracker, delay_s);
    delay_s
}
