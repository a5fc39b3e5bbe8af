//! Uplink Frame Tags and Downlink Identifiers
//!
//! The first byte of every uplink tells the network server how to parse the
//! rest. Tags come in pairs: the odd value of each pair carries the three
//! accelerometer axes after the sensor block, the even value does not.

// ===== UPLINK TYPE TAGS =====

/// Configuration summary sent on boot and after configuration changes.
pub const TAG_STATUS: u8 = 0x01;

/// Sensor block only, no position.
pub const TAG_SENSORS: u8 = 0x10;

/// Sensor block with accelerometer, no position.
pub const TAG_SENSORS_ACCEL: u8 = 0x11;

/// Sensor block + satellite fix.
pub const TAG_SATELLITE: u8 = 0x12;

/// Sensor block with accelerometer + satellite fix.
pub const TAG_SATELLITE_ACCEL: u8 = 0x13;

/// Sensor block + Wi-Fi access point list.
pub const TAG_WIFI: u8 = 0x14;

/// Sensor block with accelerometer + Wi-Fi access point list.
pub const TAG_WIFI_ACCEL: u8 = 0x15;

/// Sensor block + Bluetooth beacon list.
pub const TAG_BLUETOOTH: u8 = 0x16;

/// Sensor block with accelerometer + Bluetooth beacon list.
pub const TAG_BLUETOOTH_ACCEL: u8 = 0x17;

// ===== REASON CODES =====

/// Scheduled periodic report.
pub const REASON_PERIODIC: u8 = 0x00;

/// SOS raised from the button.
pub const REASON_SOS: u8 = 0x40;

/// User pressed the button to confirm an alarm.
pub const REASON_USER_CONFIRM: u8 = 0x80;

// ===== DOWNLINK =====

/// Port carrying vessel position/time assistance.
pub const VESSEL_ASSISTANCE_PORT: u8 = 10;

/// Port carrying application commands.
pub const APP_PORT: u8 = 5;

/// Vessel assistance message type: position update.
pub const VESSEL_MSG_POSITION: u8 = 0x01;

/// Vessel position message without time: type + lat + lon.
pub const VESSEL_POSITION_LEN: usize = 9;

/// Vessel position message with time: type + lat + lon + unix time.
pub const VESSEL_POSITION_TIME_LEN: usize = 13;

/// Application command: change the scan policy.
pub const CMD_SET_POLICY: u8 = 0x81;

/// Application command: send a status frame now.
pub const CMD_REQUEST_STATUS: u8 = 0x82;

/// Application command: change the periodic interval (u16 minutes, BE).
pub const CMD_SET_INTERVAL: u8 = 0x83;
