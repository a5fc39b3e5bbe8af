//! Buffer Sizes and Memory Constraints
//!
//! Every buffer in the scheduler is fixed at compile time. The numbers below
//! are sized against the smallest uplink the link layer can offer at the
//! slowest data rate, not against what the radio could theoretically carry.

/// Capacity of one modality's raw result buffer (bytes).
pub const SENSOR_RESULT_CAPACITY: usize = 64;

/// Size of one Wi-Fi or Bluetooth entry on the wire: 6-byte address + RSSI.
pub const SCAN_ENTRY_SIZE: usize = 7;

/// Maximum entries one result buffer can hold.
pub const MAX_SCAN_ENTRIES: usize = SENSOR_RESULT_CAPACITY / SCAN_ENTRY_SIZE;

/// Candidates a scan driver may report before the core sorts and caps them.
pub const SCAN_CANDIDATE_CAPACITY: usize = 16;

/// Size of the encoded satellite block: longitude + latitude, i32 each.
pub const SATELLITE_BLOCK_SIZE: usize = 8;

/// Sensor block without accelerometer: reason, battery, temperature, light.
pub const SENSOR_BLOCK_SIZE: usize = 6;

/// Additional bytes when the accelerometer axes are included.
pub const ACCEL_BLOCK_SIZE: usize = 6;

/// Largest uplink frame the encoder will ever build (bytes).
pub const MAX_FRAME_SIZE: usize = 1 + SENSOR_BLOCK_SIZE + ACCEL_BLOCK_SIZE + 1 + SENSOR_RESULT_CAPACITY;

/// Capacity of one receiver command sentence, including checksum and CRLF.
pub const MAX_COMMAND_LEN: usize = 96;
