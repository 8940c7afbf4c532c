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

//! Metric scorer registry
//!
//! Maps metric names to scorer functions and eval types. Adding a metric is
//! a new [`MetricKind`] variant plus one row in [`METRIC_TABLE`].

use crate::metrics::{context_relevance, faithfulness, groundedness};
use crate::signals::{freshness_index, privacy_leakage_rate};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use trustscore_core::{DatasetEntry, EvalType, SimulationConfig};

/// Metrics with a registered scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Faithfulness,
    Groundedness,
    FreshnessIndex,
    PrivacyLeakageRate,
    ContextRelevance,
}

/// Everything a scorer may look at
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Response produced for the test case
    pub actual: &'a str,
    pub dataset: &'a DatasetEntry,
    pub now: DateTime<Utc>,
    pub config: &'a SimulationConfig,
}

pub type ScorerFn = fn(&ScoringInput<'_>) -> f64;

/// One row of the dispatch table
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub kind: MetricKind,
    /// Metric name as it appears on test cases
    pub name: &'static str,
    pub eval_type: EvalType,
    pub scorer: ScorerFn,
}

fn score_faithfulness(input: &ScoringInput<'_>) -> f64 {
    faithfulness(input.actual, &input.dataset.expected_response)
}

fn score_groundedness(input: &ScoringInput<'_>) -> f64 {
    groundedness(input.actual, &input.dataset.expected_response)
}

// Ignores the response: scores simulated data of a fixed age.
// Data older than the representable date range counts as fully stale.
fn score_freshness(input: &ScoringInput<'_>) -> f64 {
    let age = Duration::days(i64::from(input.config.freshness_age_days));
    let max_age = Duration::days(i64::from(input.config.freshness_max_age_days));
    match input.now.checked_sub_signed(age) {
        Some(observed) => freshness_index(observed, input.now, max_age),
        None => 0.0,
    }
}

fn score_privacy(input: &ScoringInput<'_>) -> f64 {
    1.0 - privacy_leakage_rate(&[input.actual])
}

fn score_context_relevance(input: &ScoringInput<'_>) -> f64 {
    context_relevance(input.actual, &input.dataset.input_prompt)
}

pub const METRIC_TABLE: &[MetricSpec] = &[
    MetricSpec {
        kind: MetricKind::Faithfulness,
        name: "Faithfulness Score",
        eval_type: EvalType::LlmPlusCode,
        scorer: score_faithfulness,
    },
    MetricSpec {
        kind: MetricKind::Groundedness,
        name: "Groundedness Score",
        eval_type: EvalType::LlmEval,
        scorer: score_groundedness,
    },
    MetricSpec {
        kind: MetricKind::FreshnessIndex,
        name: "Freshness Index",
        eval_type: EvalType::CodeEval,
        scorer: score_freshness,
    },
    MetricSpec {
        kind: MetricKind::PrivacyLeakageRate,
        name: "Privacy Leakage Rate",
        eval_type: EvalType::CodeEval,
        scorer: score_privacy,
    },
    MetricSpec {
        kind: MetricKind::ContextRelevance,
        name: "Context Relevance",
        eval_type: EvalType::LlmPlusCode,
        scorer: score_context_relevance,
    },
];

impl MetricKind {
    /// Look up a metric by its exact name
    pub fn from_name(name: &str) -> Option<Self> {
        lookup(name).map(|spec| spec.kind)
    }

    pub fn spec(&self) -> &'static MetricSpec {
        // Rows are ordered by variant
        let index = match self {
            MetricKind::Faithfulness => 0,
            MetricKind::Groundedness => 1,
            MetricKind::FreshnessIndex => 2,
            MetricKind::PrivacyLeakageRate => 3,
            MetricKind::ContextRelevance => 4,
        };
        &METRIC_TABLE[index]
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn all() -> Vec<Self> {
        METRIC_TABLE.iter().map(|spec| spec.kind).collect()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Table row for a metric name, if one is registered
pub fn lookup(name: &str) -> Option<&'static MetricSpec> {
    METRIC_TABLE.iter().find(|spec| spec.name == name)
}
