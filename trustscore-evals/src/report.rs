// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Trust index reports
//!
//! A report is a read-only snapshot derived from a result list. Nothing is
//! cached: regenerate whenever the results change.
//!
//! ```rust,ignore
//! use trustscore_evals::report::ReportGenerator;
//!
//! let report = ReportGenerator::new("Claims Assistant", "RAG-CS")
//!     .with_weight("Faithfulness Score", 2.0)
//!     .generate(&results);
//! println!("{}", report);
//! ```

use crate::aggregation::{
    aggregate_all, pass_rate, MetricAggregation, RiskAggregation, UseCaseAggregation,
};
use crate::trust_index::overall_trust_index;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use trustscore_core::{MetricWeights, ScoredResult, TrustSuite};

/// Top-level summary of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustIndexReport {
    pub application: String,
    pub archetype: String,
    pub overall_trust_index: f64,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage, 0-100
    pub pass_rate: f64,
    pub metric_aggregations: Vec<MetricAggregation>,
    pub risk_aggregations: Vec<RiskAggregation>,
    pub use_case_aggregations: Vec<UseCaseAggregation>,
    pub generated_date: DateTime<Utc>,
}

impl std::fmt::Display for TrustIndexReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): trust index {:.3}, {}/{} passed ({:.1}%), {} failed",
            self.application,
            self.archetype,
            self.overall_trust_index,
            self.passed,
            self.total_tests,
            self.pass_rate,
            self.failed
        )
    }
}

/// Builds [`TrustIndexReport`]s for one application
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    application: String,
    archetype: String,
    weights: MetricWeights,
}

impl ReportGenerator {
    pub fn new(application: impl Into<String>, archetype: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            archetype: archetype.into(),
            weights: MetricWeights::new(),
        }
    }

    /// Generator carrying a suite's labels and metric weights
    pub fn from_suite(suite: &TrustSuite) -> Self {
        Self::new(suite.application.clone(), suite.archetype.clone())
            .with_weights(suite.weights.clone())
    }

    /// Set the relative weight of one metric in the trust index
    pub fn with_weight(mut self, metric: &str, weight: f64) -> Self {
        self.weights.insert(metric.to_string(), weight);
        self
    }

    pub fn with_weights(mut self, weights: MetricWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Build a report stamped with the current time
    pub fn generate(&self, results: &[ScoredResult]) -> TrustIndexReport {
        self.generate_at(results, Utc::now())
    }

    pub fn generate_at(&self, results: &[ScoredResult], generated_date: DateTime<Utc>) -> TrustIndexReport {
        let aggregations = aggregate_all(results);
        let weights = if self.weights.is_empty() {
            None
        } else {
            Some(&self.weights)
        };

        let total_tests = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = results.iter().filter(|r| r.failed()).count();

        let report = TrustIndexReport {
            application: self.application.clone(),
            archetype: self.archetype.clone(),
            overall_trust_index: overall_trust_index(results, weights),
            total_tests,
            passed,
            failed,
            pass_rate: pass_rate(passed, total_tests),
            metric_aggregations: aggregations.by_metric,
            risk_aggregations: aggregations.by_risk,
            use_case_aggregations: aggregations.by_use_case,
            generated_date,
        };

        info!("Generated report: {}", report);
        report
    }
}

/// One-shot report generation
pub fn generate_report(
    results: &[ScoredResult],
    application: &str,
    archetype: &str,
    weights: Option<&MetricWeights>,
) -> TrustIndexReport {
    let generator = ReportGenerator::new(application, archetype);
    match weights {
        Some(w) => generator.with_weights(w.clone()).generate(results),
        None => generator.generate(results),
    }
}
