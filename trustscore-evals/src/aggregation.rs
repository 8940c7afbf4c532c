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

//! Grouped summaries of scored results
//!
//! Results are grouped by metric, risk or use case. Groups come out in the
//! order their key first appears in the input; nothing is sorted. `Running`
//! and `Error` results count towards `total_tests` but neither `passed` nor
//! `failed`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trustscore_core::{ScoredResult, TestStatus};

/// Summary of all results sharing a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAggregation {
    pub metric_name: String,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Percentage, 0-100
    pub pass_rate: f64,
}

/// Summary of all results sharing a risk category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAggregation {
    pub risk: String,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    /// Mean score within the group
    pub weighted_score: f64,
    pub pass_rate: f64,
    /// Fail if any member failed, else Pass
    pub status: TestStatus,
}

/// Summary of all results sharing a use case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseAggregation {
    pub use_case: String,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    /// Mean score within the group
    pub trust_index: f64,
    pub pass_rate: f64,
    pub status: TestStatus,
}

/// All three groupings of one result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationSet {
    pub by_metric: Vec<MetricAggregation>,
    pub by_risk: Vec<RiskAggregation>,
    pub by_use_case: Vec<UseCaseAggregation>,
}

/// `passed / total * 100`, 0 for an empty set
pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// Running counters for one group
#[derive(Debug, Clone)]
struct Tally {
    total: usize,
    passed: usize,
    failed: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, result: &ScoredResult) {
        self.total += 1;
        match result.status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Running | TestStatus::Error => {}
        }
        self.sum += result.score;
        self.min = self.min.min(result.score);
        self.max = self.max.max(result.score);
    }

    fn mean(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sum / self.total as f64
        }
    }

    fn min(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.min
        }
    }

    fn max(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.max
        }
    }

    fn pass_rate(&self) -> f64 {
        pass_rate(self.passed, self.total)
    }

    fn status(&self) -> TestStatus {
        if self.failed > 0 {
            TestStatus::Fail
        } else {
            TestStatus::Pass
        }
    }
}

/// Insertion-ordered group tallies keyed by string
#[derive(Debug, Default)]
struct Groups {
    index: HashMap<String, usize>,
    entries: Vec<(String, Tally)>,
}

impl Groups {
    fn add(&mut self, key: &str, result: &ScoredResult) {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.entries.push((key.to_string(), Tally::new()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].1.add(result);
    }

    fn collect<F>(results: &[ScoredResult], key: F) -> Self
    where
        F: Fn(&ScoredResult) -> &str,
    {
        let mut groups = Self::default();
        for result in results {
            groups.add(key(result), result);
        }
        groups
    }

    fn into_metrics(self) -> Vec<MetricAggregation> {
        self.entries
            .into_iter()
            .map(|(metric_name, t)| MetricAggregation {
                metric_name,
                total_tests: t.total,
                passed: t.passed,
                failed: t.failed,
                average_score: t.mean(),
                min_score: t.min(),
                max_score: t.max(),
                pass_rate: t.pass_rate(),
            })
            .collect()
    }

    fn into_risks(self) -> Vec<RiskAggregation> {
        self.entries
            .into_iter()
            .map(|(risk, t)| RiskAggregation {
                risk,
                total_tests: t.total,
                passed: t.passed,
                failed: t.failed,
                weighted_score: t.mean(),
                pass_rate: t.pass_rate(),
                status: t.status(),
            })
            .collect()
    }

    fn into_use_cases(self) -> Vec<UseCaseAggregation> {
        self.entries
            .into_iter()
            .map(|(use_case, t)| UseCaseAggregation {
                use_case,
                total_tests: t.total,
                passed: t.passed,
                failed: t.failed,
                trust_index: t.mean(),
                pass_rate: t.pass_rate(),
                status: t.status(),
            })
            .collect()
    }
}

pub fn aggregate_by_metric(results: &[ScoredResult]) -> Vec<MetricAggregation> {
    Groups::collect(results, |r| r.metric.as_str()).into_metrics()
}

pub fn aggregate_by_risk(results: &[ScoredResult]) -> Vec<RiskAggregation> {
    Groups::collect(results, |r| r.risk.as_str()).into_risks()
}

pub fn aggregate_by_use_case(results: &[ScoredResult]) -> Vec<UseCaseAggregation> {
    Groups::collect(results, |r| r.use_case.as_str()).into_use_cases()
}

/// All three groupings in a single pass over `results`
pub fn aggregate_all(results: &[ScoredResult]) -> AggregationSet {
    let mut metrics = Groups::default();
    let mut risks = Groups::default();
    let mut use_cases = Groups::default();

    for result in results {
        metrics.add(&result.metric, result);
        risks.add(&result.risk, result);
        use_cases.add(&result.use_case, result);
    }

    AggregationSet {
        by_metric: metrics.into_metrics(),
        by_risk: risks.into_risks(),
        by_use_case: use_cases.into_use_cases(),
    }
}
