//! Tracker Scheduler
//!
//! ## Overview
//!
//! The [`Tracker`] is the only stateful object the firmware talks to. It is
//! driven entirely by events from the host:
//!
//! ```text
//!   joined ──▶ on_joined ──┐
//!   alarm  ──▶ on_alarm  ──┼──▶ session step ──▶ begin/end drivers
//!   button ──▶ request_session                  │
//!   rx     ──▶ on_downlink                      ▼
//!   time   ──▶ on_time_sync            pacer ──▶ link.send
//!                                        │
//!                                        └──▶ alarm.start(next tick)
//! ```
//!
//! ## Design Principles
//!
//! ### 1. One alarm, one session
//!
//! Every step re-arms the single alarm, so there is never more than one
//! wake-up pending. The session is an `Option`: a second trigger while one
//! is active finds `Some` and is dropped with a trace, never queued.
//!
//! ### 2. Powered sensors always get their `end`
//!
//! Nothing cancels a phase in progress. Configuration changes that arrive
//! mid-session are parked and applied once the session has drained.
//!
//! ### 3. Nothing is fatal
//!
//! Driver failures, rejected assistance commands and malformed downlinks are
//! traced and absorbed. The worst outcome of any tick is an empty scan and a
//! sensor-only frame.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut tracker = Tracker::new(board, link, alarm, clock, TrackerConfig::default())?;
//!
//! // from the link-layer event loop
//! match event {
//!     LinkEvent::Joined => tracker.on_joined(),
//!     LinkEvent::Alarm => tracker.on_alarm(),
//!     LinkEvent::TimeUpdated(gps_s) => tracker.on_time_sync(gps_s, 1),
//!     LinkEvent::Downlink { port, payload } => tracker.on_downlink(port, &payload),
//!     LinkEvent::TxDone { acknowledged } => tracker.on_tx_done(acknowledged),
//! }
//! ```

use fugit::SecsDurationU32;

use crate::assistance::{AssistanceCache, AssistanceQuality};
use crate::config::TrackerConfig;
use crate::constants::assistance::{INJECTED_POSITION_ACCURACY_M, RELAY_MESSAGE_UNCERTAINTY_S};
use crate::constants::frame::{APP_PORT, VESSEL_ASSISTANCE_PORT};
use crate::constants::time::{IMMEDIATE_WAKE_S, POST_JOIN_WAKE_S, TIME_RESYNC_INTERVAL_S};
use crate::downlink::{decode_app_command, decode_vessel_position, AppCommand};
use crate::errors::TrackerResult;
use crate::planner::{DurationPlanner, PlannerConfig, SatellitePlan};
use crate::policy::Source;
use crate::session::{Phase, PhaseDurations, ScanSession, TriggerReason};
use crate::telemetry::{encode_status_frame, DrainContext, TelemetryPacer};
use crate::time::{elapsed_s, gps_to_unix, Timestamp};
use crate::traits::{Alarm, Board, Clock, LinkLayer, SatelliteReceiver, ScanDriver, SendOutcome};

/// Counters for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerMetrics {
    /// Sessions opened
    pub sessions_started: u32,
    /// Triggers dropped because a session was active or the link was down
    pub triggers_dropped: u32,
    /// Almanac maintenance windows run
    pub maintenance_scans: u32,
    /// Drain ticks that could not send
    pub deferred_frames: u32,
    /// Uplinks the link reported as transmitted
    pub uplinks_done: u32,
    /// Downlinks that failed to decode
    pub invalid_downlinks: u32,
}

/// Adaptive positioning scheduler
pub struct Tracker<B, L, A, C> {
    board: B,
    link: L,
    alarm: A,
    clock: C,
    config: TrackerConfig,
    /// Configuration waiting for the active session to drain
    pending_config: Option<TrackerConfig>,
    cache: AssistanceCache,
    planner: DurationPlanner,
    session: Option<ScanSession>,
    pacer: TelemetryPacer,
    last_time_sync: Option<Timestamp>,
    metrics: SchedulerMetrics,
}

impl<B, L, A, C> Tracker<B, L, A, C>
where
    B: Board,
    L: LinkLayer,
    A: Alarm,
    C: Clock,
{
    /// Create a scheduler with a validated configuration
    pub fn new(board: B, link: L, alarm: A, clock: C, config: TrackerConfig) -> TrackerResult<Self> {
        config.validate()?;
        let planner = DurationPlanner::new(
            PlannerConfig::default().with_ceiling_s(config.satellite_ceiling_s),
        );

        Ok(Self {
            board,
            link,
            alarm,
            clock,
            config,
            pending_config: None,
            cache: AssistanceCache::new(),
            planner,
            session: None,
            pacer: TelemetryPacer::new(),
            last_time_sync: None,
            metrics: SchedulerMetrics::default(),
        })
    }

    /// Replace the planner tuning; the ceiling still follows the configuration
    pub fn with_planner(mut self, planner: PlannerConfig) -> Self {
        self.planner = DurationPlanner::new(planner.with_ceiling_s(self.config.satellite_ceiling_s));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Configuration waiting to be applied
    pub fn pending_config(&self) -> Option<&TrackerConfig> {
        self.pending_config.as_ref()
    }

    /// Assistance cache
    pub fn cache(&self) -> &AssistanceCache {
        &self.cache
    }

    /// Active session
    pub fn session(&self) -> Option<&ScanSession> {
        self.session.as_ref()
    }

    /// Frame pacer
    pub fn pacer(&self) -> &TelemetryPacer {
        &self.pacer
    }

    /// Monitoring counters
    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Board, mutably
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Link layer
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Link layer, mutably
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Alarm
    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    /// Clock, mutably
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The device joined the network
    ///
    /// Reports the configuration, asks for the network time and schedules
    /// the first session shortly after.
    pub fn on_joined(&mut self) {
        let now = self.clock.now();
        trace_info!("tracker: joined, first session in {}s", POST_JOIN_WAKE_S);

        self.send_status_frame();
        self.link.request_time_sync();
        self.last_time_sync = Some(now);
        self.alarm.start(SecsDurationU32::secs(POST_JOIN_WAKE_S));
    }

    /// The alarm fired
    ///
    /// A periodic tick that finds the link not joined is dropped without
    /// re-arming the alarm; [`on_joined`](Self::on_joined) restarts the cycle.
    pub fn on_alarm(&mut self) {
        let now = self.clock.now();
        self.resync_time_if_due(now);

        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                if !self.link.is_joined() {
                    trace_warn!("tracker: periodic trigger skipped, not joined");
                    self.metrics.triggers_dropped = self.metrics.triggers_dropped.wrapping_add(1);
                    return;
                }
                self.open_session(TriggerReason::Periodic, now)
            }
        };

        let finished = match session.phase() {
            Phase::Armed => self.advance(&mut session, false, now),
            Phase::Scanning { .. } => {
                let yielded = self.end_phase(&mut session, now);
                self.advance(&mut session, yielded, now)
            }
            Phase::Draining => self.drain(&session, now),
        };

        if finished {
            trace_info!("tracker: session complete");
            self.apply_pending_config();
        } else {
            self.session = Some(session);
        }
    }

    /// Start a session now
    ///
    /// Returns `false` (and changes nothing) when a session is already
    /// active or the device has not joined.
    pub fn request_session(&mut self, reason: TriggerReason) -> bool {
        if self.session.is_some() {
            trace_info!("tracker: {} trigger dropped, session active", reason.name());
            self.metrics.triggers_dropped = self.metrics.triggers_dropped.wrapping_add(1);
            return false;
        }
        if !self.link.is_joined() {
            trace_info!("tracker: {} trigger dropped, not joined", reason.name());
            self.metrics.triggers_dropped = self.metrics.triggers_dropped.wrapping_add(1);
            return false;
        }

        let now = self.clock.now();
        self.alarm.clear();
        self.session = Some(self.open_session(reason, now));
        self.alarm.start(SecsDurationU32::secs(IMMEDIATE_WAKE_S));
        trace_info!("tracker: {} session armed", reason.name());
        true
    }

    /// The link layer obtained network time (GPS seconds)
    pub fn on_time_sync(&mut self, gps_time_s: u32, precision_s: u32) {
        let now = self.clock.now();
        let unix_time = gps_to_unix(gps_time_s);
        self.cache.anchor_time(now, unix_time, precision_s);
        self.last_time_sync = Some(now);
    }

    /// A downlink arrived
    pub fn on_downlink(&mut self, port: u8, payload: &[u8]) {
        let now = self.clock.now();
        match port {
            VESSEL_ASSISTANCE_PORT => match decode_vessel_position(payload) {
                Ok(position) => self.cache.ingest_external(
                    now,
                    position.latitude,
                    position.longitude,
                    position.unix_time,
                    RELAY_MESSAGE_UNCERTAINTY_S,
                ),
                Err(_err) => {
                    trace_warn!("tracker: vessel message ignored: {}", _err);
                    self.metrics.invalid_downlinks = self.metrics.invalid_downlinks.wrapping_add(1);
                }
            },
            APP_PORT => match decode_app_command(payload) {
                Ok(command) => self.handle_command(command),
                Err(_err) => {
                    trace_warn!("tracker: command ignored: {}", _err);
                    self.metrics.invalid_downlinks = self.metrics.invalid_downlinks.wrapping_add(1);
                }
            },
            _other => trace_debug!("tracker: downlink on port {} ignored", _other),
        }
    }

    /// The link finished an uplink
    pub fn on_tx_done(&mut self, _acknowledged: bool) {
        self.metrics.uplinks_done = self.metrics.uplinks_done.wrapping_add(1);
        trace_debug!("tracker: uplink {} done, acknowledged={}", self.metrics.uplinks_done, _acknowledged);
    }

    /// Replace the configuration
    ///
    /// Applied immediately when idle (followed by a status frame and a fresh
    /// session), otherwise parked until the active session drains.
    pub fn set_config(&mut self, config: TrackerConfig) -> TrackerResult<()> {
        config.validate()?;
        if self.session.is_some() {
            trace_info!("tracker: configuration change deferred until session drains");
            self.pending_config = Some(config);
        } else {
            self.apply_config(config);
        }
        Ok(())
    }

    /// Send the status frame; returns whether the link accepted it
    pub fn send_status_frame(&mut self) -> bool {
        if self.link.duty_cycle_remaining_ms() < 0 {
            trace_warn!("tracker: status frame skipped, duty cycle exhausted");
            return false;
        }

        let battery_mv = self.board.sensor_block(false).battery_mv;
        let frame = encode_status_frame(&self.config, battery_mv);
        if frame.len() > self.link.max_payload_len() as usize {
            self.link.request_flush_frame(false);
            return false;
        }
        self.link.send(&frame, false) == SendOutcome::Enqueued
    }

    fn handle_command(&mut self, command: AppCommand) {
        let base = self.pending_config.unwrap_or(self.config);
        let updated = match command {
            AppCommand::RequestStatus => {
                self.send_status_frame();
                return;
            }
            AppCommand::SetPolicy(policy) => base.with_policy(policy),
            AppCommand::SetInterval(interval_s) => base.with_periodic_interval_s(interval_s),
        };

        if let Err(_err) = self.set_config(updated) {
            trace_warn!("tracker: command rejected: {}", _err);
        }
    }

    fn apply_pending_config(&mut self) {
        if let Some(config) = self.pending_config.take() {
            self.apply_config(config);
        }
    }

    fn apply_config(&mut self, config: TrackerConfig) {
        self.config = config;
        self.planner.set_ceiling_s(config.satellite_ceiling_s);
        trace_info!(
            "tracker: configuration applied, policy {} every {}s",
            config.policy.name(),
            config.periodic_interval_s
        );
        self.send_status_frame();
        self.request_session(TriggerReason::Periodic);
    }

    fn resync_time_if_due(&mut self, now: Timestamp) {
        if let Some(last) = self.last_time_sync {
            if elapsed_s(last, now) >= TIME_RESYNC_INTERVAL_S {
                trace_info!("tracker: periodic time resync");
                self.link.request_time_sync();
                self.last_time_sync = Some(now);
            }
        }
    }

    fn open_session(&mut self, reason: TriggerReason, now: Timestamp) -> ScanSession {
        let charging = self.board.is_charging();
        let satellite_first = self.planner.maintenance_pending(&self.cache, now, charging);
        if satellite_first {
            trace_info!("tracker: almanac maintenance due, satellite first");
        }

        self.pacer.reset();
        self.metrics.sessions_started = self.metrics.sessions_started.wrapping_add(1);
        ScanSession::new(self.config.policy, reason, now, satellite_first, !self.config.test_mode)
    }

    fn satellite_plan(&self, now: Timestamp) -> SatellitePlan {
        self.planner.plan(&self.cache, now, self.board.is_charging())
    }

    /// Move to the next phase; returns whether the session finished
    fn advance(&mut self, session: &mut ScanSession, yielded: bool, now: Timestamp) -> bool {
        let plan = match session.upcoming_source() {
            Some(Source::Satellite) => self.satellite_plan(now),
            _ => SatellitePlan { duration_s: self.planner.config().ceiling_s, maintenance: false },
        };
        let durations = PhaseDurations {
            satellite_s: plan.duration_s,
            wifi_s: self.config.wifi_scan_s,
            bluetooth_s: self.config.bluetooth_scan_s,
        };

        let transition = session.next_transition(yielded, &durations);
        session.apply(&transition, now);

        match transition.begin {
            Some(source) => {
                if let Some(delay_s) = transition.alarm_s {
                    self.alarm.start(SecsDurationU32::secs(delay_s));
                    trace_info!("tracker: {} phase for {}s", source.name(), delay_s);
                }
                if source == Source::Satellite {
                    session.set_maintenance_scan(plan.maintenance);
                    if plan.maintenance {
                        self.metrics.maintenance_scans = self.metrics.maintenance_scans.wrapping_add(1);
                    }
                }
                self.begin_source(source, now);
                false
            }
            None => {
                self.pacer.start_draining();
                self.drain(session, now)
            }
        }
    }

    fn begin_source(&mut self, source: Source, now: Timestamp) {
        let started = match source {
            Source::Satellite => self.begin_satellite(now),
            Source::Wifi => self.board.wifi().begin(),
            Source::Bluetooth => self.board.bluetooth().begin(),
        };
        if let Err(_err) = started {
            trace_warn!("tracker: {} failed to start: {}", source.name(), _err);
        }
    }

    /// Power the receiver and feed it whatever assistance is usable
    fn begin_satellite(&mut self, now: Timestamp) -> TrackerResult<()> {
        let cache = &self.cache;
        let warm_start = self.planner.is_ready_for_warm_start(cache, now);
        let receiver = self.board.satellite();
        receiver.begin()?;

        if cache.has_time() {
            if let Err(_err) = receiver.inject_time(cache.estimated_time(now)) {
                trace_warn!("tracker: time injection failed: {}", _err);
            }
        }
        if cache.quality(now) != AssistanceQuality::Poor {
            let record = cache.record();
            if let Err(_err) = receiver.inject_position(
                record.latitude,
                record.longitude,
                INJECTED_POSITION_ACCURACY_M,
            ) {
                trace_warn!("tracker: position injection failed: {}", _err);
            }
        }
        if warm_start {
            if let Err(_err) = receiver.request_warm_start() {
                trace_warn!("tracker: warm start request failed: {}", _err);
            }
        }
        Ok(())
    }

    /// Close the running phase; returns whether it yielded a usable result
    fn end_phase(&mut self, session: &mut ScanSession, now: Timestamp) -> bool {
        let Some(source) = session.current_source() else {
            return false;
        };

        let yielded = match source {
            Source::Satellite => {
                let fix = self.board.satellite().end();
                if fix.valid {
                    self.cache.ingest_self_fix(now, fix.latitude, fix.longitude);
                }

                let result = self.pacer.results_mut().get_mut(Source::Satellite);
                if session.is_maintenance_scan() {
                    trace_info!("tracker: maintenance fix kept out of uplink");
                    result.clear();
                } else {
                    result.record_fix(&fix);
                }
                !result.is_empty()
            }
            Source::Wifi => {
                let entries = self.board.wifi().end();
                let result = self.pacer.results_mut().get_mut(Source::Wifi);
                result.record_entries(entries, self.config.wifi_max) > 0
            }
            Source::Bluetooth => {
                let entries = self.board.bluetooth().end();
                let result = self.pacer.results_mut().get_mut(Source::Bluetooth);
                result.record_entries(entries, self.config.bluetooth_max) > 0
            }
        };

        session.set_maintenance_scan(false);
        trace_info!("tracker: {} phase ended, usable={}", source.name(), yielded);
        yielded
    }

    /// Run one pacer tick; returns whether the session finished
    fn drain(&mut self, session: &ScanSession, now: Timestamp) -> bool {
        let sensors = self.board.sensor_block(self.config.accel_enabled);
        let ctx = DrainContext {
            now,
            session_started_at: session.started_at(),
            periodic_interval_s: self.config.periodic_interval_s,
            reason: session.reason(),
            packet_policy: self.config.packet_policy,
        };

        if !self.pacer.drain_and_send(&mut self.link, &mut self.alarm, &sensors, &ctx) {
            self.metrics.deferred_frames = self.metrics.deferred_frames.wrapping_add(1);
        }
        self.pacer.is_drained()
    }
}
