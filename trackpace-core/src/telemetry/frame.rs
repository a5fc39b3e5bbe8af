//! Frame Encoding
//!
//! Every multi-byte field is big-endian. Frames are built into a fixed
//! buffer sized for the largest possible frame, so encoding only fails if a
//! result buffer was filled outside this crate.

use heapless::Vec;

use crate::config::TrackerConfig;
use crate::constants::buffers::MAX_FRAME_SIZE;
use crate::constants::frame::{
    TAG_BLUETOOTH, TAG_BLUETOOTH_ACCEL, TAG_SATELLITE, TAG_SATELLITE_ACCEL, TAG_SENSORS,
    TAG_SENSORS_ACCEL, TAG_STATUS, TAG_WIFI, TAG_WIFI_ACCEL,
};
use crate::errors::{TrackerError, TrackerResult};
use crate::policy::Source;
use crate::results::SensorResult;
use crate::session::TriggerReason;
use crate::traits::sensors::SensorBlock;

/// Encoded uplink frame
pub type FrameBuffer = Vec<u8, MAX_FRAME_SIZE>;

/// Battery voltage treated as empty (mV)
const BATTERY_EMPTY_MV: u16 = 3_000;

/// Battery voltage treated as full (mV)
const BATTERY_FULL_MV: u16 = 4_200;

/// Length of the status frame
pub const STATUS_FRAME_LEN: usize = 13;

/// Battery level in percent, linear between empty and full
pub fn battery_percent(battery_mv: u16) -> u8 {
    let clamped = battery_mv.clamp(BATTERY_EMPTY_MV, BATTERY_FULL_MV);
    let span = (BATTERY_FULL_MV - BATTERY_EMPTY_MV) as u32;
    ((clamped - BATTERY_EMPTY_MV) as u32 * 100 / span) as u8
}

/// Type tag for a modality block (or sensor-only) with or without accelerometer
pub const fn frame_tag(block: Option<Source>, with_accel: bool) -> u8 {
    match (block, with_accel) {
        (None, false) => TAG_SENSORS,
        (None, true) => TAG_SENSORS_ACCEL,
        (Some(Source::Satellite), false) => TAG_SATELLITE,
        (Some(Source::Satellite), true) => TAG_SATELLITE_ACCEL,
        (Some(Source::Wifi), false) => TAG_WIFI,
        (Some(Source::Wifi), true) => TAG_WIFI_ACCEL,
        (Some(Source::Bluetooth), false) => TAG_BLUETOOTH,
        (Some(Source::Bluetooth), true) => TAG_BLUETOOTH_ACCEL,
    }
}

fn put(frame: &mut FrameBuffer, bytes: &[u8]) -> TrackerResult<()> {
    frame.extend_from_slice(bytes).map_err(|_| TrackerError::BufferOverflow {
        required: frame.len() + bytes.len(),
        capacity: MAX_FRAME_SIZE,
    })
}

/// Build a position frame
///
/// `block` is the modality being sent with its result, or `None` for a
/// sensor-only frame.
pub fn encode_position_frame(
    block: Option<(Source, &SensorResult)>,
    reason: TriggerReason,
    sensors: &SensorBlock,
) -> TrackerResult<FrameBuffer> {
    let mut frame = FrameBuffer::new();
    let tag = frame_tag(block.map(|(source, _)| source), sensors.accel.is_some());

    put(&mut frame, &[tag, reason.code(), battery_percent(sensors.battery_mv)])?;
    put(&mut frame, &sensors.temperature_dc.to_be_bytes())?;
    put(&mut frame, &sensors.light.to_be_bytes())?;
    if let Some(axes) = sensors.accel {
        for axis in axes {
            put(&mut frame, &axis.to_be_bytes())?;
        }
    }

    match block {
        Some((Source::Satellite, result)) => put(&mut frame, result.as_slice())?,
        Some((Source::Wifi | Source::Bluetooth, result)) => {
            put(&mut frame, &[result.entry_count()])?;
            put(&mut frame, result.as_slice())?;
        }
        None => {}
    }

    Ok(frame)
}

/// Build the status frame: versions and the active configuration
pub fn encode_status_frame(config: &TrackerConfig, battery_mv: u16) -> FrameBuffer {
    let mut frame = FrameBuffer::new();
    let interval = config.interval_minutes().to_be_bytes();
    let fields = [
        TAG_STATUS,
        battery_percent(battery_mv),
        config.firmware.major,
        config.firmware.minor,
        config.hardware.major,
        config.hardware.minor,
        config.policy.code(),
        interval[0],
        interval[1],
        config.accel_enabled as u8,
        config.sos_mode as u8,
        config.wifi_max,
        config.bluetooth_max,
    ];
    // Fixed 13 bytes, always fits
    let _ = frame.extend_from_slice(&fields);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ScanPolicy;
    use crate::traits::sensors::{SatelliteFix, ScanEntries, ScanEntry};

    fn sensors(accel: Option<[i16; 3]>) -> SensorBlock {
        SensorBlock { battery_mv: 3_600, temperature_dc: -125, light: 0x0102, accel }
    }

    #[test]
    fn battery_scale_is_clamped() {
        assert_eq!(battery_percent(2_500), 0);
        assert_eq!(battery_percent(3_600), 50);
        assert_eq!(battery_percent(5_000), 100);
    }

    #[test]
    fn sensor_only_frame() {
        let frame = encode_position_frame(None, TriggerReason::Sos, &sensors(None)).unwrap();
        assert_eq!(frame.as_slice(), &[TAG_SENSORS, 0x40, 50, 0xFF, 0x83, 0x01, 0x02]);
    }

    #[test]
    fn accel_axes_follow_sensor_block() {
        let frame = encode_position_frame(None, TriggerReason::Periodic, &sensors(Some([1, -1, 256]))).unwrap();
        assert_eq!(frame[0], TAG_SENSORS_ACCEL);
        assert_eq!(&frame[7..], &[0x00, 0x01, 0xFF, 0xFF, 0x01, 0x00]);
    }

    #[test]
    fn satellite_block_has_no_count() {
        let mut result = SensorResult::new();
        result.record_fix(&SatelliteFix::at(1.0, 2.0));
        let frame = encode_position_frame(
            Some((Source::Satellite, &result)),
            TriggerReason::Periodic,
            &sensors(None),
        )
        .unwrap();
        assert_eq!(frame[0], TAG_SATELLITE);
        assert_eq!(frame.len(), 7 + 8);
        assert_eq!(&frame[7..11], &2_000_000i32.to_be_bytes());
    }

    #[test]
    fn scan_block_prefixed_by_count() {
        let mut entries = ScanEntries::new();
        entries.push(ScanEntry { address: [1, 2, 3, 4, 5, 6], rssi: -70 }).unwrap();
        entries.push(ScanEntry { address: [6, 5, 4, 3, 2, 1], rssi: -50 }).unwrap();
        let mut result = SensorResult::new();
        result.record_entries(entries, 3);

        let frame = encode_position_frame(
            Some((Source::Bluetooth, &result)),
            TriggerReason::UserConfirm,
            &sensors(None),
        )
        .unwrap();
        assert_eq!(frame[0], TAG_BLUETOOTH);
        assert_eq!(frame[1], 0x80);
        assert_eq!(frame[7], 2);
        assert_eq!(&frame[8..14], &[6, 5, 4, 3, 2, 1]);
        assert_eq!(frame.len(), 8 + 14);
    }

    #[test]
    fn status_frame_layout() {
        let config = TrackerConfig::default()
            .with_policy(ScanPolicy::BluetoothWifi)
            .with_periodic_interval_s(300 * 60)
            .with_accel(true);
        let frame = encode_status_frame(&config, 4_200);
        assert_eq!(frame.len(), STATUS_FRAME_LEN);
        assert_eq!(frame.as_slice(), &[0x01, 100, 1, 0, 1, 0, 5, 0x01, 0x2C, 1, 1, 3, 3]);
    }
}
