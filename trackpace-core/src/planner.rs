//! Adaptive Duration Planner
//!
//! Decides how long the satellite receiver stays powered. Fresh assistance
//! means the receiver knows roughly where to look and converges quickly;
//! stale or missing assistance means a full cold search.
//!
//! | Quality   | Window                      |
//! |-----------|-----------------------------|
//! | Excellent | 10 s                        |
//! | Good      | 15 s                        |
//! | Fair      | 25 s                        |
//! | Poor      | configured ceiling (60 s)   |
//!
//! Table entries are capped by the ceiling. Every 14 days the receiver also
//! needs one long uninterrupted window (750 s) to download a fresh almanac.
//! That only happens on external power, and it overrides the table.

use crate::assistance::{AssistanceCache, AssistanceQuality};
use crate::constants::assistance::{
    ALMANAC_MAINTENANCE_DAYS, ALMANAC_MAINTENANCE_SCAN_S, SATELLITE_SCAN_COLD_S,
    SATELLITE_SCAN_EXCELLENT_S, SATELLITE_SCAN_FAIR_S, SATELLITE_SCAN_GOOD_S,
    WARM_START_MAX_POSITION_AGE_H, WARM_START_MAX_UNCERTAINTY_S,
};
use crate::constants::time::SECONDS_PER_HOUR;
use crate::time::Timestamp;

/// Planner tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Window for excellent assistance (seconds)
    pub excellent_s: u32,
    /// Window for good assistance (seconds)
    pub good_s: u32,
    /// Window for fair assistance (seconds)
    pub fair_s: u32,
    /// Upper bound for every non-maintenance window (seconds)
    pub ceiling_s: u32,
    /// Almanac maintenance window (seconds)
    pub maintenance_s: u32,
    /// Assistance age that makes maintenance due (days)
    pub maintenance_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            excellent_s: SATELLITE_SCAN_EXCELLENT_S,
            good_s: SATELLITE_SCAN_GOOD_S,
            fair_s: SATELLITE_SCAN_FAIR_S,
            ceiling_s: SATELLITE_SCAN_COLD_S,
            maintenance_s: ALMANAC_MAINTENANCE_SCAN_S,
            maintenance_days: ALMANAC_MAINTENANCE_DAYS,
        }
    }
}

impl PlannerConfig {
    /// Set the ceiling
    pub fn with_ceiling_s(mut self, ceiling_s: u32) -> Self {
        self.ceiling_s = ceiling_s;
        self
    }
}

/// Satellite window chosen for one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SatellitePlan {
    /// Window length (seconds)
    pub duration_s: u32,
    /// Whether this is an almanac maintenance window
    pub maintenance: bool,
}

/// Duration planner
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationPlanner {
    config: PlannerConfig,
}

impl DurationPlanner {
    /// Planner with the given tuning
    pub const fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Current tuning
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Replace the ceiling (follows the tracker configuration)
    pub fn set_ceiling_s(&mut self, ceiling_s: u32) {
        self.config.ceiling_s = ceiling_s;
    }

    /// Whether the next satellite window should be an almanac refresh
    pub fn maintenance_pending(&self, cache: &AssistanceCache, now: Timestamp, charging: bool) -> bool {
        charging && cache.is_almanac_maintenance_due(now, self.config.maintenance_days)
    }

    /// Window length for the next satellite phase (seconds)
    pub fn recommended_satellite_duration(
        &self,
        cache: &AssistanceCache,
        now: Timestamp,
        charging: bool,
    ) -> u32 {
        self.plan(cache, now, charging).duration_s
    }

    /// Window length and kind for the next satellite phase
    pub fn plan(&self, cache: &AssistanceCache, now: Timestamp, charging: bool) -> SatellitePlan {
        if self.maintenance_pending(cache, now, charging) {
            trace_info!("planner: almanac maintenance, {}s window", self.config.maintenance_s);
            return SatellitePlan { duration_s: self.config.maintenance_s, maintenance: true };
        }

        let quality = cache.quality(now);
        let tier_s = match quality {
            AssistanceQuality::Excellent => self.config.excellent_s,
            AssistanceQuality::Good => self.config.good_s,
            AssistanceQuality::Fair => self.config.fair_s,
            AssistanceQuality::Poor => self.config.ceiling_s,
        };
        let duration_s = tier_s.min(self.config.ceiling_s);
        trace_debug!("planner: {} assistance, {}s window", quality.name(), duration_s);
        SatellitePlan { duration_s, maintenance: false }
    }

    /// Whether the receiver can be asked for a warm start
    pub fn is_ready_for_warm_start(&self, cache: &AssistanceCache, now: Timestamp) -> bool {
        let position_fresh = cache
            .position_age_s(now)
            .is_some_and(|age_s| age_s < WARM_START_MAX_POSITION_AGE_H * SECONDS_PER_HOUR);

        position_fresh
            && cache.estimated_uncertainty_s(now) < WARM_START_MAX_UNCERTAINTY_S
            && !cache.is_almanac_maintenance_due(now, self.config.maintenance_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_aged(age_s: u32, now: Timestamp) -> AssistanceCache {
        let mut cache = AssistanceCache::new();
        cache.ingest_external(now - age_s, 1.0, 2.0, Some(1_700_000_000), 60);
        cache
    }

    #[test]
    fn durations_follow_quality() {
        let planner = DurationPlanner::default();
        let now = 100_000;
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(0, now), now, false), 10);
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(45 * 60, now), now, false), 15);
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(120 * 60, now), now, false), 25);
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(200 * 60, now), now, false), 60);
        assert_eq!(planner.recommended_satellite_duration(&AssistanceCache::new(), now, false), 60);
    }

    #[test]
    fn ceiling_caps_every_tier() {
        let planner = DurationPlanner::new(PlannerConfig::default().with_ceiling_s(12));
        let now = 100_000;
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(0, now), now, false), 10);
        assert_eq!(planner.recommended_satellite_duration(&cache_aged(45 * 60, now), now, false), 12);
        assert_eq!(planner.recommended_satellite_duration(&AssistanceCache::new(), now, false), 12);
    }

    #[test]
    fn maintenance_requires_charging() {
        let planner = DurationPlanner::default();
        let cache = AssistanceCache::new();
        assert_eq!(planner.recommended_satellite_duration(&cache, 0, true), 750);
        assert_eq!(planner.recommended_satellite_duration(&cache, 0, false), 60);
        assert!(planner.plan(&cache, 0, true).maintenance);
    }

    #[test]
    fn warm_start_needs_tight_time() {
        let planner = DurationPlanner::default();
        let mut cache = cache_aged(0, 1_000);
        assert!(!planner.is_ready_for_warm_start(&cache, 1_000));

        cache.tighten_time(1_000, 1);
        assert!(planner.is_ready_for_warm_start(&cache, 1_000));
        assert!(!planner.is_ready_for_warm_start(&cache, 1_000 + 4 * SECONDS_PER_HOUR));
    }
}
