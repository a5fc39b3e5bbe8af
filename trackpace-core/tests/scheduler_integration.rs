//! End-to-end scheduler behaviour against recording mocks
//!
//! Each test drives the tracker only through its public event entry points
//! (alarm, trigger, downlink, time sync) and checks what reached the drivers,
//! the alarm and the link.

mod common;

use trackpace_core::config::PacketPolicy;
use trackpace_core::constants::frame::{
    APP_PORT, TAG_BLUETOOTH, TAG_SATELLITE, TAG_SENSORS, TAG_SENSORS_ACCEL, TAG_STATUS, TAG_WIFI,
    VESSEL_ASSISTANCE_PORT,
};
use trackpace_core::traits::sensors::SatelliteFix;
use trackpace_core::{Phase, ScanPolicy, Source, TrackerConfig, TriggerReason};

use common::{fire_after, fire_armed, tracker, vessel_message, NEW_YEAR_2024};

/// GPS seconds for `NEW_YEAR_2024`
const NEW_YEAR_2024_GPS: u32 = 1_388_102_418;

#[test]
fn trigger_while_active_changes_nothing() {
    let mut tracker = tracker(TrackerConfig::default());

    assert!(tracker.request_session(TriggerReason::Sos));
    assert_eq!(tracker.alarm().history, vec![1]);
    assert_eq!(tracker.alarm().clears, 1);

    assert!(!tracker.request_session(TriggerReason::UserConfirm));
    assert_eq!(tracker.alarm().history, vec![1]);
    assert_eq!(tracker.alarm().clears, 1);
    assert_eq!(tracker.session().map(|s| s.reason()), Some(TriggerReason::Sos));

    fire_armed(&mut tracker);
    assert_eq!(tracker.session().map(|s| s.phase()), Some(Phase::Scanning { index: 0 }));
    assert!(!tracker.request_session(TriggerReason::Periodic));
    assert_eq!(tracker.metrics().triggers_dropped, 2);
}

#[test]
fn trigger_before_join_is_dropped() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.link_mut().joined = false;

    assert!(!tracker.request_session(TriggerReason::Sos));
    assert!(tracker.session().is_none());
    assert!(tracker.alarm().history.is_empty());
}

#[test]
fn periodic_tick_before_join_waits_for_join() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.link_mut().joined = false;

    tracker.on_alarm();
    assert!(tracker.session().is_none());
    assert!(tracker.alarm().history.is_empty());
    assert_eq!(tracker.metrics().triggers_dropped, 1);

    tracker.link_mut().joined = true;
    tracker.on_joined();
    assert_eq!(tracker.alarm().armed, Some(15));
    fire_armed(&mut tracker);
    assert!(tracker.session().is_some());
    assert_eq!(tracker.board().satellite.begins, 1);
}

#[test]
fn tx_done_counts_uplinks() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_tx_done(true);
    tracker.on_tx_done(false);
    assert_eq!(tracker.metrics().uplinks_done, 2);
}

#[test]
fn satellite_only_cycle_with_fresh_assistance() {
    let mut tracker = tracker(TrackerConfig::default().with_policy(ScanPolicy::SatelliteOnly));
    tracker.on_downlink(VESSEL_ASSISTANCE_PORT, &vessel_message(37.5, -8.25, Some(NEW_YEAR_2024)));
    tracker.board_mut().satellite.fixes.push_back(SatelliteFix::at(37.5, -8.25));

    tracker.on_alarm();
    assert_eq!(tracker.alarm().armed, Some(10));

    fire_after(&mut tracker, 10);
    assert_eq!(tracker.link().tags(), vec![TAG_SATELLITE]);
    assert_eq!(&tracker.link().sent[0].payload[7..11], &(-8_250_000i32).to_be_bytes());
    assert_eq!(&tracker.link().sent[0].payload[11..15], &37_500_000i32.to_be_bytes());
    assert_eq!(tracker.alarm().armed, Some(50));
    assert!(tracker.session().is_none());

    // next period starts exactly one interval after the first
    fire_after(&mut tracker, 50);
    assert_eq!(tracker.board().satellite.begins, 2);
}

#[test]
fn three_results_drain_in_priority_order() {
    let config = TrackerConfig::default()
        .with_policy(ScanPolicy::BluetoothWifiSatellite)
        .with_periodic_interval_s(300)
        .with_test_mode(true);
    let mut tracker = tracker(config);
    tracker.board_mut().bluetooth.script_hits(2);
    tracker.board_mut().wifi.script_hits(3);
    tracker.board_mut().satellite.fixes.push_back(SatelliteFix::at(37.5, -8.25));

    tracker.on_alarm();
    for _ in 0..5 {
        fire_armed(&mut tracker);
    }

    assert_eq!(tracker.link().tags(), vec![TAG_SATELLITE, TAG_WIFI, TAG_BLUETOOTH]);
    assert_eq!(tracker.alarm().history, vec![3, 3, 60, 30, 30, 174]);
    for source in [Source::Satellite, Source::Wifi, Source::Bluetooth] {
        assert!(tracker.pacer().results().get(source).is_empty());
    }
    assert!(tracker.session().is_none());
    assert_eq!(tracker.pacer().frames_sent(), 3);
}

#[test]
fn usable_wifi_result_skips_satellite() {
    let mut tracker = tracker(TrackerConfig::default().with_policy(ScanPolicy::WifiSatellite));
    tracker.board_mut().wifi.script_hits(2);

    tracker.on_alarm();
    assert_eq!(tracker.alarm().armed, Some(3));
    fire_armed(&mut tracker);

    assert_eq!(tracker.board().satellite.begins, 0);
    assert_eq!(tracker.link().tags(), vec![TAG_WIFI]);
    assert_eq!(tracker.link().sent[0].payload[7], 2);
    assert_eq!(tracker.alarm().armed, Some(57));
}

#[test]
fn empty_wifi_result_falls_through_to_satellite() {
    let mut tracker = tracker(TrackerConfig::default().with_policy(ScanPolicy::WifiSatellite));

    tracker.on_alarm();
    fire_armed(&mut tracker);
    assert_eq!(tracker.board().satellite.begins, 1);
    assert_eq!(tracker.alarm().armed, Some(60));

    fire_armed(&mut tracker);
    assert_eq!(tracker.link().tags(), vec![TAG_SENSORS]);
}

#[test]
fn maintenance_moves_satellite_first_and_withholds_fix() {
    let mut tracker = tracker(TrackerConfig::default().with_policy(ScanPolicy::BluetoothWifiSatellite));
    tracker.board_mut().charging = true;
    tracker.board_mut().satellite.fixes.push_back(SatelliteFix::at(37.5, -8.25));

    tracker.on_alarm();
    assert_eq!(tracker.board().satellite.begins, 1);
    assert_eq!(tracker.board().bluetooth.begins, 0);
    assert_eq!(tracker.alarm().armed, Some(750));
    assert_eq!(tracker.session().map(|s| s.order().to_vec()), Some(vec![
        Source::Satellite,
        Source::Bluetooth,
        Source::Wifi,
    ]));

    fire_armed(&mut tracker);
    assert!(tracker.cache().is_valid());
    assert_eq!(tracker.board().bluetooth.begins, 1);
    assert_eq!(tracker.metrics().maintenance_scans, 1);

    fire_armed(&mut tracker);
    fire_armed(&mut tracker);
    assert_eq!(tracker.link().tags(), vec![TAG_SENSORS]);
}

#[test]
fn failed_receiver_start_still_closes_phase() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.board_mut().satellite.fail_begin = true;

    tracker.on_alarm();
    fire_armed(&mut tracker);
    assert_eq!(tracker.board().satellite.ends, 1);
    assert_eq!(tracker.link().tags(), vec![TAG_SENSORS]);
}

#[test]
fn exhausted_duty_cycle_defers_frame() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.link_mut().duty_cycle_ms = -1_000;

    tracker.on_alarm();
    fire_armed(&mut tracker);
    assert!(tracker.link().sent.is_empty());
    assert_eq!(tracker.alarm().armed, Some(30));
    assert_eq!(tracker.session().map(|s| s.phase()), Some(Phase::Draining));
    assert_eq!(tracker.metrics().deferred_frames, 1);

    tracker.link_mut().duty_cycle_ms = 0;
    fire_armed(&mut tracker);
    assert_eq!(tracker.link().tags(), vec![TAG_SENSORS]);
    assert_eq!(tracker.alarm().armed, Some(1));
    assert!(tracker.session().is_none());
}

#[test]
fn oversized_frame_requests_flush_then_retries() {
    let config = TrackerConfig::default()
        .with_policy(ScanPolicy::WifiOnly)
        .with_entry_limits(9, 3);
    let mut tracker = tracker(config);
    tracker.board_mut().wifi.script_hits(12);
    tracker.link_mut().max_payload = 51;

    tracker.on_alarm();
    fire_armed(&mut tracker);
    assert_eq!(tracker.link().flush_requests, 1);
    assert!(tracker.link().sent.is_empty());
    assert_eq!(tracker.alarm().armed, Some(30));

    tracker.link_mut().max_payload = 242;
    fire_armed(&mut tracker);
    assert_eq!(tracker.link().sent[0].payload.len(), 8 + 9 * 7);
    assert!(tracker.session().is_none());
}

#[test]
fn fresh_assistance_is_injected_with_warm_start() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_downlink(VESSEL_ASSISTANCE_PORT, &vessel_message(37.5, -8.25, Some(NEW_YEAR_2024)));
    tracker.clock_mut().advance(100);
    tracker.on_time_sync(NEW_YEAR_2024_GPS + 100, 1);

    tracker.on_alarm();
    let receiver = &tracker.board().satellite;
    assert_eq!(receiver.injected_times, vec![NEW_YEAR_2024 + 100]);
    assert_eq!(receiver.injected_positions, vec![(37.5, -8.25, 50.0)]);
    assert_eq!(receiver.warm_starts, 1);
    assert_eq!(tracker.alarm().armed, Some(10));
}

#[test]
fn loose_time_skips_warm_start() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_downlink(VESSEL_ASSISTANCE_PORT, &vessel_message(37.5, -8.25, Some(NEW_YEAR_2024)));

    tracker.on_alarm();
    let receiver = &tracker.board().satellite;
    assert_eq!(receiver.injected_times.len(), 1);
    assert_eq!(receiver.warm_starts, 0);
}

#[test]
fn position_only_relay_without_time_injects_no_time() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_downlink(VESSEL_ASSISTANCE_PORT, &vessel_message(37.5, -8.25, None));
    assert!(tracker.cache().is_valid());

    tracker.on_alarm();
    let receiver = &tracker.board().satellite;
    assert!(receiver.injected_times.is_empty());
    assert_eq!(receiver.injected_positions.len(), 1);
}

#[test]
fn join_reports_status_and_schedules_first_session() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_joined();

    assert_eq!(tracker.link().tags(), vec![TAG_STATUS]);
    assert_eq!(tracker.link().time_sync_requests, 1);
    assert_eq!(tracker.alarm().armed, Some(15));

    fire_armed(&mut tracker);
    assert_eq!(tracker.link().time_sync_requests, 1);
    assert_eq!(tracker.board().satellite.begins, 1);
}

#[test]
fn time_resynced_every_four_hours() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_joined();

    fire_after(&mut tracker, 4 * 3_600);
    assert_eq!(tracker.link().time_sync_requests, 2);
    fire_after(&mut tracker, 60);
    assert_eq!(tracker.link().time_sync_requests, 2);
}

#[test]
fn user_confirm_session_sends_confirmed_frames() {
    let mut tracker = tracker(TrackerConfig::default());
    assert!(tracker.request_session(TriggerReason::UserConfirm));
    fire_armed(&mut tracker);
    fire_armed(&mut tracker);

    let frame = &tracker.link().sent[0];
    assert!(frame.confirmed);
    assert_eq!(frame.payload[1], 0x80);
}

#[test]
fn confirmed_policy_applies_to_periodic_frames() {
    let mut tracker = tracker(TrackerConfig::default().with_packet_policy(PacketPolicy::Confirmed));
    tracker.on_alarm();
    fire_armed(&mut tracker);
    assert!(tracker.link().sent[0].confirmed);
    assert_eq!(tracker.link().sent[0].payload[1], 0x00);
}

#[test]
fn accelerometer_block_when_enabled() {
    let mut tracker = tracker(TrackerConfig::default().with_accel(true));
    tracker.on_alarm();
    fire_armed(&mut tracker);

    let frame = &tracker.link().sent[0].payload;
    assert_eq!(frame[0], TAG_SENSORS_ACCEL);
    assert_eq!(frame.len(), 13);
    assert_eq!(&frame[7..9], &12i16.to_be_bytes());
}

#[test]
fn interval_downlink_applies_when_idle() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_downlink(APP_PORT, &[0x83, 0x00, 0x05]);

    assert_eq!(tracker.config().periodic_interval_s, 300);
    let status = &tracker.link().sent[0].payload;
    assert_eq!(status[0], TAG_STATUS);
    assert_eq!(&status[7..9], &[0x00, 0x05]);
    assert_eq!(tracker.alarm().armed, Some(1));
    assert!(tracker.session().is_some());
}

#[test]
fn status_request_and_bad_downlinks() {
    let mut tracker = tracker(TrackerConfig::default());
    tracker.on_downlink(APP_PORT, &[0x82]);
    assert_eq!(tracker.link().tags(), vec![TAG_STATUS]);

    tracker.on_downlink(APP_PORT, &[0x81, 42]);
    tracker.on_downlink(VESSEL_ASSISTANCE_PORT, &[0x07, 0, 0]);
    assert_eq!(tracker.metrics().invalid_downlinks, 2);
    assert_eq!(tracker.config().policy, ScanPolicy::SatelliteOnly);
    assert!(!tracker.cache().is_valid());
}
