// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration for simulated test execution
//!
//! Every knob has a default matching the reference dashboard behavior, so an
//! empty `[simulation]` table (or none at all) reproduces it exactly.

use crate::CoreError;
use serde::{Deserialize, Serialize};

/// Default pass bar when a test case carries no threshold
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Generic response used for the "model gave up" variation
pub const DEFAULT_FALLBACK_RESPONSE: &str = "information is currently unavailable";

/// Longest simulated data age accepted by [`SimulationConfig::validate`], days
pub const MAX_FRESHNESS_AGE_DAYS: u32 = 36_500;

pub const SEED_ENV: &str = "TRUSTSCORE_SEED";
pub const DEFAULT_THRESHOLD_ENV: &str = "TRUSTSCORE_DEFAULT_THRESHOLD";

/// Settings for the test execution simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Pass bar applied when a test case has no threshold
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Simulated response time lower bound (inclusive), milliseconds
    #[serde(default = "default_min_response_ms")]
    pub min_response_ms: u64,

    /// Simulated response time upper bound (exclusive), milliseconds
    #[serde(default = "default_max_response_ms")]
    pub max_response_ms: u64,

    /// Half-width of the symmetric score jitter
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// Score range for metrics without a registered scorer, `[low, high)`
    #[serde(default = "default_fallback_score_range")]
    pub fallback_score_range: (f64, f64),

    /// Age of the simulated data for the freshness metric, days
    #[serde(default = "default_freshness_age_days")]
    pub freshness_age_days: u32,

    /// Age at which data counts as fully stale, days
    #[serde(default = "default_freshness_max_age_days")]
    pub freshness_max_age_days: u32,

    #[serde(default = "default_fallback_response")]
    pub fallback_response: String,

    /// Seed for reproducible runs; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_min_response_ms() -> u64 {
    800
}

fn default_max_response_ms() -> u64 {
    2000
}

fn default_jitter() -> f64 {
    0.05
}

fn default_fallback_score_range() -> (f64, f64) {
    (0.7, 1.0)
}

fn default_freshness_age_days() -> u32 {
    7
}

fn default_freshness_max_age_days() -> u32 {
    30
}

fn default_fallback_response() -> String {
    DEFAULT_FALLBACK_RESPONSE.to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            min_response_ms: default_min_response_ms(),
            max_response_ms: default_max_response_ms(),
            jitter: default_jitter(),
            fallback_score_range: default_fallback_score_range(),
            freshness_age_days: default_freshness_age_days(),
            freshness_max_age_days: default_freshness_max_age_days(),
            fallback_response: default_fallback_response(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a config whose runs are reproducible from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject settings that would make the simulator panic or emit NaN
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(CoreError::InvalidConfig(format!(
                "default_threshold must lie in [0, 1], got {}",
                self.default_threshold
            )));
        }
        if self.min_response_ms >= self.max_response_ms {
            return Err(CoreError::InvalidConfig(format!(
                "min_response_ms ({}) must be below max_response_ms ({})",
                self.min_response_ms, self.max_response_ms
            )));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "jitter must be a non-negative number, got {}",
                self.jitter
            )));
        }
        let (low, high) = self.fallback_score_range;
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(CoreError::InvalidConfig(format!(
                "fallback_score_range must be a non-empty range, got [{}, {})",
                low, high
            )));
        }
        if self.freshness_max_age_days == 0 {
            return Err(CoreError::InvalidConfig(
                "freshness_max_age_days must be positive".to_string(),
            ));
        }
        for (field, days) in [
            ("freshness_age_days", self.freshness_age_days),
            ("freshness_max_age_days", self.freshness_max_age_days),
        ] {
            if days > MAX_FRESHNESS_AGE_DAYS {
                return Err(CoreError::InvalidConfig(format!(
                    "{} must not exceed {} days, got {}",
                    field, MAX_FRESHNESS_AGE_DAYS, days
                )));
            }
        }
        Ok(())
    }

    /// Apply environment overrides (env takes priority over file values)
    pub fn merge_with_env(mut self) -> Result<Self, CoreError> {
        if let Ok(raw) = std::env::var(SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|_| {
                CoreError::InvalidConfig(format!("{} is not a valid seed: {:?}", SEED_ENV, raw))
            })?;
            tracing::debug!("Seed overridden from environment: {}", seed);
            self.seed = Some(seed);
        }
        if let Ok(raw) = std::env::var(DEFAULT_THRESHOLD_ENV) {
            let threshold = raw.trim().parse::<f64>().map_err(|_| {
                CoreError::InvalidConfig(format!(
                    "{} is not a valid threshold: {:?}",
                    DEFAULT_THRESHOLD_ENV, raw
                ))
            })?;
            self.default_threshold = threshold;
        }
        Ok(self)
    }
}
