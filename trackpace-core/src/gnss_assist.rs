//! Receiver Assistance Commands
//!
//! Builds the `$PAIR` sentences that seed the satellite receiver with time,
//! position and a warm-start request, and delivers them with bounded,
//! acknowledgment-checked retries.
//!
//! ## Sentence format
//!
//! ```text
//! $PAIR590,2024,01,01,00,00,00*32\r\n
//!  └────────── body ─────────┘ └┘
//!                         XOR of body
//! ```
//!
//! The receiver answers every command with `$PAIR001,<command>,<result>`,
//! where result `0` is success, `1` means still processing and `5` means busy.
//!
//! ## Delivery
//!
//! [`send_with_ack`] writes a sentence and polls the port for the matching
//! acknowledgment, retransmitting a bounded number of times. Ports that
//! cannot read responses fall back to [`send_repeated`].
//!
//! ## Where it sits
//!
//! The scheduler never writes sentences itself. A board support package
//! implements [`crate::traits::SatelliteReceiver`] for its receiver on top of
//! a [`PairAssistant`]: the trait's `inject_*` and `request_warm_start` calls
//! forward to the assistant, and `end` parks the receiver with
//! [`PairAssistant::power_down`].

use core::fmt::Write;

use chrono::{DateTime, Datelike, Timelike};
use heapless::String;

use crate::constants::buffers::MAX_COMMAND_LEN;
use crate::errors::{TrackerError, TrackerResult};

/// One encoded sentence, including checksum and CRLF
pub type Sentence = String<MAX_COMMAND_LEN>;

/// Acknowledgment
pub const PAIR_ACK: u16 = 1;
/// Warm start
pub const PAIR_WARM_START: u16 = 5;
/// Lock or unlock low-power sleep
pub const PAIR_SLEEP_LOCK: u16 = 382;
/// Set reference UTC time
pub const PAIR_SET_TIME: u16 = 590;
/// Set reference position
pub const PAIR_SET_POSITION: u16 = 600;
/// Enter RTC mode
pub const PAIR_RTC_MODE: u16 = 650;

/// Blind repeats of the sleep lock, which the receiver may miss while waking
pub const SLEEP_LOCK_REPEATS: u8 = 25;
/// Blind repeats of the sleep unlock
pub const SLEEP_UNLOCK_REPEATS: u8 = 4;
/// Blind repeats of the RTC mode command
pub const RTC_MODE_REPEATS: u8 = 25;

const ACK_SUCCESS: u8 = 0;
const ACK_PROCESSING: u8 = 1;
const ACK_BUSY: u8 = 5;

/// XOR checksum over the sentence body
///
/// Starts after a leading `$` if present and stops at `*` or the end.
pub fn nmea_checksum(sentence: &str) -> u8 {
    let body = sentence.strip_prefix('$').unwrap_or(sentence);
    body.bytes().take_while(|&b| b != b'*').fold(0, |acc, b| acc ^ b)
}

fn overflow() -> TrackerError {
    TrackerError::BufferOverflow { required: MAX_COMMAND_LEN + 1, capacity: MAX_COMMAND_LEN }
}

/// Frame a body as `$<body>*<checksum>\r\n`
pub fn finish_sentence(body: core::fmt::Arguments<'_>) -> TrackerResult<Sentence> {
    let mut sentence = Sentence::new();
    sentence.push('$').map_err(|_| overflow())?;
    sentence.write_fmt(body).map_err(|_| overflow())?;
    let checksum = nmea_checksum(&sentence);
    write!(sentence, "*{:02X}\r\n", checksum).map_err(|_| overflow())?;
    Ok(sentence)
}

/// PAIR590: reference UTC time as calendar fields
pub fn time_sentence(unix_time: u32) -> TrackerResult<Sentence> {
    let utc = DateTime::from_timestamp(unix_time as i64, 0)
        .ok_or(TrackerError::Driver { reason: "time outside calendar range" })?;
    finish_sentence(format_args!(
        "PAIR{},{:04},{:02},{:02},{:02},{:02},{:02}",
        PAIR_SET_TIME,
        utc.year(),
        utc.month(),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    ))
}

/// PAIR600: reference position with horizontal accuracy
///
/// Altitude is unknown and sent as zero; the vertical accuracy is set wide
/// so the receiver does not trust it.
pub fn position_sentence(latitude: f32, longitude: f32, accuracy_m: f32) -> TrackerResult<Sentence> {
    finish_sentence(format_args!(
        "PAIR{},{:.6},{:.6},0.0,{:.1},{:.1},0.0,{:.1}",
        PAIR_SET_POSITION,
        latitude,
        longitude,
        accuracy_m,
        accuracy_m,
        accuracy_m * 10.0
    ))
}

/// PAIR005: warm start
pub fn warm_start_sentence() -> TrackerResult<Sentence> {
    finish_sentence(format_args!("PAIR{:03}", PAIR_WARM_START))
}

/// PAIR382: keep the receiver awake (`true`) or let it sleep
pub fn sleep_lock_sentence(locked: bool) -> TrackerResult<Sentence> {
    finish_sentence(format_args!("PAIR{},{}", PAIR_SLEEP_LOCK, locked as u8))
}

/// PAIR650: enter RTC mode
pub fn rtc_mode_sentence() -> TrackerResult<Sentence> {
    finish_sentence(format_args!("PAIR{},0", PAIR_RTC_MODE))
}

/// Parse `$PAIR001,<command>,<result>[*CS]`
///
/// Returns `None` for other sentences or a checksum mismatch.
pub fn parse_ack(line: &str) -> Option<(u16, u8)> {
    let line = line.trim_end();
    let body = line.strip_prefix('$')?;
    let (fields, checksum) = match body.split_once('*') {
        Some((fields, cs)) => (fields, Some(u8::from_str_radix(cs, 16).ok()?)),
        None => (body, None),
    };
    if checksum.is_some_and(|cs| cs != nmea_checksum(fields)) {
        return None;
    }

    let mut parts = fields.split(',');
    if parts.next()? != "PAIR001" {
        return None;
    }
    let command = parts.next()?.parse().ok()?;
    let result = parts.next()?.parse().ok()?;
    Some((command, result))
}

/// Serial link to the receiver
pub trait CommandPort {
    /// Transmit a complete sentence
    fn write_sentence(&mut self, sentence: &str) -> TrackerResult<()>;

    /// Poll for the acknowledgment of `command`
    ///
    /// `WouldBlock` while nothing matching has arrived; `Ok(result)` once it has.
    fn read_ack(&mut self, command: u16) -> nb::Result<u8, TrackerError>;
}

/// Retry bounds for acknowledged delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Transmissions before giving up
    pub attempts: u8,
    /// Acknowledgment polls per transmission
    pub polls: u16,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, polls: 50 }
    }
}

/// Send a command and wait for its acknowledgment
///
/// Returns the number of transmissions it took.
pub fn send_with_ack<P: CommandPort>(
    port: &mut P,
    command: u16,
    sentence: &str,
    policy: RetryPolicy,
) -> TrackerResult<u8> {
    for attempt in 1..=policy.attempts {
        port.write_sentence(sentence)?;

        let mut polls = 0;
        while polls < policy.polls {
            polls += 1;
            match port.read_ack(command) {
                Ok(ACK_SUCCESS) => {
                    trace_debug!("gnss: PAIR{} acknowledged after {} attempt(s)", command, attempt);
                    return Ok(attempt);
                }
                Ok(ACK_PROCESSING) | Err(nb::Error::WouldBlock) => continue,
                Ok(ACK_BUSY) => break,
                Ok(code) => return Err(TrackerError::CommandRejected { command, code }),
                Err(nb::Error::Other(err)) => return Err(err),
            }
        }
        trace_debug!("gnss: PAIR{} attempt {} unanswered", command, attempt);
    }

    trace_warn!("gnss: PAIR{} never acknowledged", command);
    Err(TrackerError::CommandNotAcknowledged { command, attempts: policy.attempts })
}

/// Write a sentence `repeats` times without waiting for responses
pub fn send_repeated<P: CommandPort>(port: &mut P, sentence: &str, repeats: u8) -> TrackerResult<()> {
    for _ in 0..repeats {
        port.write_sentence(sentence)?;
    }
    Ok(())
}

/// Assistance injection over a command port
///
/// A [`crate::traits::SatelliteReceiver`] for a PAIR-speaking receiver
/// forwards its `inject_*` calls here.
#[derive(Debug)]
pub struct PairAssistant<P> {
    port: P,
    retry: RetryPolicy,
}

impl<P: CommandPort> PairAssistant<P> {
    /// Assistant with the default retry bounds
    pub fn new(port: P) -> Self {
        Self { port, retry: RetryPolicy::default() }
    }

    /// Override the retry bounds
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Release the port
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Send PAIR590
    pub fn inject_time(&mut self, unix_time: u32) -> TrackerResult<()> {
        let sentence = time_sentence(unix_time)?;
        send_with_ack(&mut self.port, PAIR_SET_TIME, &sentence, self.retry).map(|_| ())
    }

    /// Send PAIR600
    pub fn inject_position(&mut self, latitude: f32, longitude: f32, accuracy_m: f32) -> TrackerResult<()> {
        let sentence = position_sentence(latitude, longitude, accuracy_m)?;
        send_with_ack(&mut self.port, PAIR_SET_POSITION, &sentence, self.retry).map(|_| ())
    }

    /// Send PAIR005
    pub fn request_warm_start(&mut self) -> TrackerResult<()> {
        let sentence = warm_start_sentence()?;
        send_with_ack(&mut self.port, PAIR_WARM_START, &sentence, self.retry).map(|_| ())
    }

    /// Lock or unlock low-power sleep (PAIR382), repeated blindly
    pub fn set_sleep_lock(&mut self, locked: bool) -> TrackerResult<()> {
        let sentence = sleep_lock_sentence(locked)?;
        let repeats = if locked { SLEEP_LOCK_REPEATS } else { SLEEP_UNLOCK_REPEATS };
        send_repeated(&mut self.port, &sentence, repeats)
    }

    /// Park the receiver: unlock sleep, then enter RTC mode (PAIR650)
    ///
    /// The receiver stops answering once it is in RTC mode, so neither
    /// command waits for an acknowledgment.
    pub fn power_down(&mut self) -> TrackerResult<()> {
        self.set_sleep_lock(false)?;
        let sentence = rtc_mode_sentence()?;
        send_repeated(&mut self.port, &sentence, RTC_MODE_REPEATS)?;
        trace_debug!("gnss: receiver parked in RTC mode");
        Ok(())
    }
}
