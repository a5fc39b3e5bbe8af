//! Scan Session State Machine
//!
//! A session walks the sources of its policy one phase at a time:
//!
//! ```text
//! Armed ──▶ Scanning(0) ──▶ … ──▶ Scanning(n-1) ──▶ Draining ──▶ (dropped)
//!                 │                                     ▲
//!                 └──── usable result (early exit) ─────┘
//! ```
//!
//! The state machine itself performs no I/O. [`ScanSession::next_transition`]
//! is a pure function of the current phase, whether the phase that just
//! ended yielded something usable, and the phase durations; the scheduler
//! carries out the returned transition (arm the alarm, call `begin`).

use crate::constants::frame::{REASON_PERIODIC, REASON_SOS, REASON_USER_CONFIRM};
use crate::policy::{ScanPolicy, Source, SourceOrder};
use crate::time::Timestamp;

/// Why a session was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerReason {
    /// Regular reporting cycle
    #[default]
    Periodic,
    /// Emergency trigger
    Sos,
    /// User asked for an acknowledged position
    UserConfirm,
}

impl TriggerReason {
    /// Reason byte carried in every position frame
    pub const fn code(self) -> u8 {
        match self {
            Self::Periodic => REASON_PERIODIC,
            Self::Sos => REASON_SOS,
            Self::UserConfirm => REASON_USER_CONFIRM,
        }
    }

    /// Whether frames of this session must be confirmed regardless of policy
    pub const fn requires_confirmation(self) -> bool {
        matches!(self, Self::UserConfirm)
    }

    /// Short name for traces
    pub const fn name(self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::Sos => "sos",
            Self::UserConfirm => "user-confirm",
        }
    }
}

/// Where a session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Requested, waiting for the start alarm
    Armed,
    /// Source `order[index]` is powered and scanning
    Scanning {
        /// Position in the session order
        index: u8,
    },
    /// Scanning done, frames being sent
    Draining,
}

/// Scan windows for the sources (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Satellite window from the planner
    pub satellite_s: u32,
    /// Wi-Fi window
    pub wifi_s: u32,
    /// Bluetooth window
    pub bluetooth_s: u32,
}

impl PhaseDurations {
    /// Window for a source
    pub const fn for_source(&self, source: Source) -> u32 {
        match source {
            Source::Satellite => self.satellite_s,
            Source::Wifi => self.wifi_s,
            Source::Bluetooth => self.bluetooth_s,
        }
    }
}

/// What the scheduler must do to move a session on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Phase after the transition
    pub phase: Phase,
    /// Alarm to arm, if the phase has a window
    pub alarm_s: Option<u32>,
    /// Source to power on
    pub begin: Option<Source>,
}

/// The single active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    policy: ScanPolicy,
    order: SourceOrder,
    phase: Phase,
    started_at: Timestamp,
    reason: TriggerReason,
    early_exit: bool,
    maintenance_scan: bool,
}

impl ScanSession {
    /// New session waiting for its start alarm
    ///
    /// `satellite_first` pulls the satellite phase to the front (almanac
    /// maintenance). `early_exit` stops scanning at the first usable result.
    pub fn new(
        policy: ScanPolicy,
        reason: TriggerReason,
        now: Timestamp,
        satellite_first: bool,
        early_exit: bool,
    ) -> Self {
        Self {
            policy,
            order: policy.session_order(satellite_first),
            phase: Phase::Armed,
            started_at: now,
            reason,
            early_exit,
            maintenance_scan: false,
        }
    }

    /// Policy fixed at creation
    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Phase order of this session
    pub fn order(&self) -> &[Source] {
        &self.order
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Local time scanning began
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Trigger reason
    pub fn reason(&self) -> TriggerReason {
        self.reason
    }

    /// Whether the running satellite phase is an almanac refresh
    pub fn is_maintenance_scan(&self) -> bool {
        self.maintenance_scan
    }

    /// Flag the satellite phase about to run
    pub fn set_maintenance_scan(&mut self, maintenance: bool) {
        self.maintenance_scan = maintenance;
    }

    /// Source whose window is open
    pub fn current_source(&self) -> Option<Source> {
        match self.phase {
            Phase::Scanning { index } => self.order.get(index as usize).copied(),
            _ => None,
        }
    }

    /// Source the next transition would power on
    pub fn upcoming_source(&self) -> Option<Source> {
        match self.phase {
            Phase::Armed => self.order.first().copied(),
            Phase::Scanning { index } => self.order.get(index as usize + 1).copied(),
            Phase::Draining => None,
        }
    }

    /// Compute the next transition
    ///
    /// `yielded` reports whether the phase that just ended produced a usable
    /// result; it is ignored when leaving `Armed`.
    pub fn next_transition(&self, yielded: bool, durations: &PhaseDurations) -> Transition {
        let next_index = match self.phase {
            Phase::Armed => 0,
            Phase::Scanning { index } if !(yielded && self.early_exit) => index as usize + 1,
            Phase::Scanning { .. } | Phase::Draining => return Self::draining(),
        };

        match self.order.get(next_index) {
            Some(&source) => Transition {
                phase: Phase::Scanning { index: next_index as u8 },
                alarm_s: Some(durations.for_source(source)),
                begin: Some(source),
            },
            None => Self::draining(),
        }
    }

    /// Commit a transition computed by [`Self::next_transition`]
    ///
    /// Leaving `Armed` restarts the session clock: the reporting period is
    /// measured from when scanning actually began.
    pub fn apply(&mut self, transition: &Transition, now: Timestamp) {
        if self.phase == Phase::Armed {
            self.started_at = now;
        }
        self.phase = transition.phase;
    }

    const fn draining() -> Transition {
        Transition { phase: Phase::Draining, alarm_s: None, begin: None }
    }
}
