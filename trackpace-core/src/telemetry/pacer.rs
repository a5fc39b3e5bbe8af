//! Frame Pacer
//!
//! Sends at most one frame per alarm tick and decides when the next tick
//! happens. While frames remain the tick comes after the inter-frame spacing;
//! once the last one is out, the next tick is the start of the next
//! reporting period.
//!
//! ## Deferral rules
//!
//! - **Duty cycle exhausted**: nothing is sent, the frame waits for the next tick.
//! - **Frame too large**: an empty flush frame is requested so the link can
//!   clear pending MAC commands (or step up the data rate), and the frame
//!   waits for the next tick.
//!
//! Neither consumes the frame; only a frame the link accepted is dropped.

use fugit::SecsDurationU32;

use crate::config::PacketPolicy;
use crate::constants::time::{INTER_FRAME_SPACING_S, MIN_ALARM_DELAY_S};
use crate::results::ResultSet;
use crate::session::TriggerReason;
use crate::telemetry::frame::encode_position_frame;
use crate::time::{elapsed_s, Timestamp};
use crate::traits::{Alarm, LinkLayer, SendOutcome, SensorBlock};

/// Pacer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacerState {
    /// No frames owed
    #[default]
    Idle,
    /// Frames owed for the draining session
    Sending,
}

/// Session facts the pacer needs for one tick
#[derive(Debug, Clone, Copy)]
pub struct DrainContext {
    /// Current local time
    pub now: Timestamp,
    /// When the session began scanning
    pub session_started_at: Timestamp,
    /// Reporting period (seconds)
    pub periodic_interval_s: u32,
    /// Trigger reason of the session
    pub reason: TriggerReason,
    /// Configured confirmation policy
    pub packet_policy: PacketPolicy,
}

impl DrainContext {
    /// Whether frames of this session are confirmed
    pub fn confirmed(&self) -> bool {
        self.packet_policy == PacketPolicy::Confirmed || self.reason.requires_confirmation()
    }

    /// Delay from now until the next reporting period, at least one second
    pub fn next_period_delay_s(&self) -> u32 {
        let spent = elapsed_s(self.session_started_at, self.now);
        self.periodic_interval_s.saturating_sub(spent).max(MIN_ALARM_DELAY_S)
    }
}

/// Result buffers plus send pacing
#[derive(Debug, Clone, Default)]
pub struct TelemetryPacer {
    results: ResultSet,
    state: PacerState,
    frames_sent: u32,
}

impl TelemetryPacer {
    /// Idle pacer with empty buffers
    pub const fn new() -> Self {
        Self { results: ResultSet::new(), state: PacerState::Idle, frames_sent: 0 }
    }

    /// Current state
    pub fn state(&self) -> PacerState {
        self.state
    }

    /// Session results
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Session results, for the scan phases to fill
    pub fn results_mut(&mut self) -> &mut ResultSet {
        &mut self.results
    }

    /// Frames accepted by the link since boot
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Drop any leftovers before a new session scans
    pub fn reset(&mut self) {
        self.results.clear();
        self.state = PacerState::Idle;
    }

    /// Stop collecting and start owing frames
    pub fn start_draining(&mut self) -> u8 {
        self.state = PacerState::Sending;
        let owed = self.results.seal();
        trace_debug!("pacer: {} frame(s) to send", owed);
        owed
    }

    /// Whether every owed frame has gone out
    pub fn is_drained(&self) -> bool {
        self.results.is_drained()
    }

    /// Try to send the next frame and arm the alarm for the following tick
    ///
    /// Returns whether a frame was handed to the link. When the last frame
    /// goes out the pacer returns to `Idle` and the alarm is set for the next
    /// reporting period. An `Idle` pacer owes nothing and sends nothing until
    /// [`start_draining`](Self::start_draining) is called again.
    pub fn drain_and_send<L: LinkLayer, A: Alarm>(
        &mut self,
        link: &mut L,
        alarm: &mut A,
        sensors: &SensorBlock,
        ctx: &DrainContext,
    ) -> bool {
        if self.state == PacerState::Idle {
            trace_debug!("pacer: idle, nothing owed");
            return false;
        }

        let sent = self.try_send(link, sensors, ctx);

        if self.results.is_drained() {
            let delay_s = ctx.next_period_delay_s();
            trace_info!("pacer: session drained, next period in {}s", delay_s);
            alarm.start(SecsDurationU32::secs(delay_s));
            self.results.clear();
            self.state = PacerState::Idle;
        } else {
            trace_debug!("pacer: {} frame(s) left", self.results.pending_count());
            alarm.start(SecsDurationU32::secs(INTER_FRAME_SPACING_S));
        }
        sent
    }

    fn try_send<L: LinkLayer>(&mut self, link: &mut L, sensors: &SensorBlock, ctx: &DrainContext) -> bool {
        if link.duty_cycle_remaining_ms() < 0 {
            trace_warn!("pacer: duty cycle exhausted, deferring");
            return false;
        }

        let block = self.results.next_block();
        let confirmed = ctx.confirmed();
        let frame = match encode_position_frame(
            block.map(|source| (source, self.results.get(source))),
            ctx.reason,
            sensors,
        ) {
            Ok(frame) => frame,
            Err(_err) => {
                trace_warn!("pacer: frame dropped, encoding failed: {}", _err);
                self.results.complete(block);
                return false;
            }
        };

        if frame.len() > link.max_payload_len() as usize {
            trace_warn!("pacer: {} byte frame exceeds payload window, flushing", frame.len());
            link.request_flush_frame(confirmed);
            return false;
        }

        match link.send(&frame, confirmed) {
            SendOutcome::Enqueued => {
                trace_info!("pacer: {} byte frame sent, confirmed={}", frame.len(), confirmed);
                self.results.complete(block);
                self.frames_sent = self.frames_sent.wrapping_add(1);
                true
            }
            SendOutcome::TooLarge => {
                trace_warn!("pacer: link rejected frame size, flushing");
                link.request_flush_frame(confirmed);
                false
            }
            SendOutcome::DutyCycleBlocked => {
                trace_warn!("pacer: link blocked by duty cycle");
                false
            }
        }
    }
}
