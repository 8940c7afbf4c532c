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

//! # Trustscore Evaluation Engine
//!
//! Scores evaluation outcomes and rolls them up into a trust index.
//!
//! ## Features
//!
//! - **Text metrics**: faithfulness, groundedness, context relevance
//! - **Signal detectors**: freshness, PII leakage, bias gap, latency consistency
//! - **Simulated execution**: seedable stand-in for real model calls
//! - **Aggregation**: per metric, per risk and per use case
//! - **Reports**: weighted trust index plus JSON export
//!
//! ## Example
//!
//! ```rust,ignore
//! use trustscore_core::TrustSuite;
//! use trustscore_evals::{export_report, ReportGenerator, SuiteRunner};
//!
//! let suite = TrustSuite::from_file(path)?;
//! let results = SuiteRunner::new(&suite).run();
//! let report = ReportGenerator::from_suite(&suite).generate(&results);
//! println!("{}", export_report(&report)?);
//! ```

use thiserror::Error;

pub mod aggregation;
pub mod export;
pub mod metrics;
pub mod registry;
pub mod report;
pub mod runner;
pub mod signals;
pub mod similarity;
pub mod simulator;
pub mod trust_index;

pub use aggregation::{
    aggregate_all, aggregate_by_metric, aggregate_by_risk, aggregate_by_use_case, AggregationSet,
    MetricAggregation, RiskAggregation, UseCaseAggregation,
};
pub use export::{export_report, export_results, import_report, import_results};
pub use metrics::{context_relevance, faithfulness, groundedness};
pub use registry::{MetricKind, MetricSpec, ScoringInput, METRIC_TABLE};
pub use report::{generate_report, ReportGenerator, TrustIndexReport};
pub use runner::SuiteRunner;
pub use signals::{
    bias_gap, freshness_index, latency_consistency, privacy_leakage_rate, PrivacyLeakageDetector,
};
pub use similarity::cosine_similarity;
pub use simulator::{ResponseVariation, TestSimulator};
pub use trust_index::overall_trust_index;

/// Errors that can occur while exporting or importing evaluation data
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] trustscore_core::CoreError),
}
