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

//! # Trustscore Core
//!
//! Shared contracts for the trust score engine:
//!
//! - [`TestCaseDescriptor`] and [`DatasetEntry`]: what is tested, and on what
//! - [`ScoredResult`]: the per-test outcome every aggregation is built from
//! - [`TrustSuite`]: a TOML-loadable bundle of test cases, dataset and settings
//! - [`SimulationConfig`]: knobs for the simulated test executor

use thiserror::Error;

pub mod config;
pub mod eval_dataset;
pub mod eval_result;

pub use config::{
    SimulationConfig, DEFAULT_FALLBACK_RESPONSE, DEFAULT_THRESHOLD, MAX_FRESHNESS_AGE_DAYS,
};
pub use eval_dataset::{DatasetEntry, MetricWeights, TestCaseDescriptor, TrustSuite};
pub use eval_result::{EvalType, ScoredResult, TestStatus};

/// Errors raised while loading or validating suites and configuration
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
