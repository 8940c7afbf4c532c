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

//! Simulated test execution
//!
//! Stands in for a real model call: fabricates a plausible response by
//! perturbing the expected one, scores it with the metric's registered
//! scorer, adds a little jitter and assigns a Pass/Fail verdict.
//!
//! All randomness flows through the caller's [`rand::Rng`], so a seeded
//! generator reproduces a run exactly.
//!
//! ```rust,ignore
//! use trustscore_evals::simulator::TestSimulator;
//! use trustscore_core::SimulationConfig;
//!
//! let simulator = TestSimulator::new(SimulationConfig::seeded(42));
//! let mut rng = simulator.rng();
//! let result = simulator.simulate(&test_case, &dataset_entry, &mut rng);
//! ```

use crate::registry::{self, ScoringInput};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::ops::Range;
use tracing::debug;
use trustscore_core::{
    DatasetEntry, EvalType, ScoredResult, SimulationConfig, TestCaseDescriptor, TestStatus,
};

/// Ways a simulated model can deviate from the expected response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseVariation {
    /// Expected response, unchanged
    Verbatim,
    /// "approximately" reworded as "about"
    Approximation,
    /// "$" spelled out as a currency code
    CurrencyCode,
    /// Last two words dropped
    Truncated,
    /// Generic non-answer
    Fallback,
}

impl ResponseVariation {
    pub const ALL: [ResponseVariation; 5] = [
        ResponseVariation::Verbatim,
        ResponseVariation::Approximation,
        ResponseVariation::CurrencyCode,
        ResponseVariation::Truncated,
        ResponseVariation::Fallback,
    ];

    /// Produce the varied response
    pub fn apply(&self, expected: &str, fallback: &str) -> String {
        match self {
            ResponseVariation::Verbatim => expected.to_string(),
            ResponseVariation::Approximation => expected.replace("approximately", "about"),
            ResponseVariation::CurrencyCode => expected.replace('$', "USD "),
            ResponseVariation::Truncated => {
                // Cut in place so the kept words retain their original spacing
                let mut kept = expected.trim_end();
                for _ in 0..2 {
                    kept = match kept.rfind(char::is_whitespace) {
                        Some(end) => kept[..end].trim_end(),
                        None => "",
                    };
                }
                kept.trim_start().to_string()
            }
            ResponseVariation::Fallback => fallback.to_string(),
        }
    }
}

/// Simulated test executor
#[derive(Debug, Clone, Default)]
pub struct TestSimulator {
    config: SimulationConfig,
}

impl TestSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Random source for this simulator: seeded when the config has a seed
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Simulate one test case against one dataset entry
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        test_case: &TestCaseDescriptor,
        dataset: &DatasetEntry,
        rng: &mut R,
    ) -> ScoredResult {
        self.simulate_at(test_case, dataset, Utc::now(), rng)
    }

    /// Simulate with an explicit clock
    pub fn simulate_at<R: Rng + ?Sized>(
        &self,
        test_case: &TestCaseDescriptor,
        dataset: &DatasetEntry,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> ScoredResult {
        let response_time_ms = sample_u64(
            rng,
            self.config.min_response_ms..self.config.max_response_ms,
        );
        let variation = *ResponseVariation::ALL
            .choose(rng)
            .unwrap_or(&ResponseVariation::Verbatim);

        self.score_variation(test_case, dataset, variation, response_time_ms, now, rng)
    }

    /// Score a specific variation; only the jitter (and the fallback score
    /// for unregistered metrics) is drawn from `rng`
    pub fn score_variation<R: Rng + ?Sized>(
        &self,
        test_case: &TestCaseDescriptor,
        dataset: &DatasetEntry,
        variation: ResponseVariation,
        response_time_ms: u64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> ScoredResult {
        let actual_response = variation.apply(&dataset.expected_response, &self.config.fallback_response);

        let (raw_score, eval_type) = match registry::lookup(&test_case.metric) {
            Some(spec) => {
                let input = ScoringInput {
                    actual: &actual_response,
                    dataset,
                    now,
                    config: &self.config,
                };
                ((spec.scorer)(&input), spec.eval_type)
            }
            None => {
                let (low, high) = self.config.fallback_score_range;
                let score = sample_f64(rng, low..high);
                let eval_type = test_case.eval_type.unwrap_or(EvalType::CodeEval);
                (score, eval_type)
            }
        };

        let jitter = sample_f64(rng, -self.config.jitter..self.config.jitter);
        let score = clamp_score(raw_score + jitter);
        let threshold = test_case.effective_threshold(self.config.default_threshold);
        let status = TestStatus::from_score(score, threshold);

        debug!(
            "Simulated {} ({}): variation={:?} raw={:.3} score={:.3} status={}",
            test_case.id, test_case.metric, variation, raw_score, score, status
        );

        ScoredResult {
            test_case_id: test_case.id.clone(),
            use_case: test_case.use_case.clone(),
            risk: test_case.risk.clone(),
            metric: test_case.metric.clone(),
            score,
            threshold,
            status,
            response_time_ms,
            eval_type,
            timestamp: now,
            actual_response,
            expected_response: dataset.expected_response.clone(),
            error_message: None,
        }
    }
}

/// Clamp to [0, 1]; non-finite scores become 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// gen_range panics on empty ranges; collapse them to their start
fn sample_u64<R: Rng + ?Sized>(rng: &mut R, range: Range<u64>) -> u64 {
    if range.start >= range.end {
        range.start
    } else {
        rng.gen_range(range)
    }
}

// NaN bounds compare as unordered and collapse too
fn sample_f64<R: Rng + ?Sized>(rng: &mut R, range: Range<f64>) -> f64 {
    if range.start.partial_cmp(&range.end) != Some(Ordering::Less) {
        range.start
    } else {
        rng.gen_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faithfulness_case() -> TestCaseDescriptor {
        TestCaseDescriptor::new("TC-001", "Knowledge QA", "Hallucination", "Faithfulness Score")
            .with_threshold(0.8)
    }

    fn sky() -> DatasetEntry {
        DatasetEntry::new("DS-001", "What colour is the sky?", "The sky is blue")
    }

    #[test]
    fn test_variations() {
        let expected = "The premium is approximately $120 per month";
        let fallback = "information is currently unavailable";

        assert_eq!(ResponseVariation::Verbatim.apply(expected, fallback), expected);
        assert_eq!(
            ResponseVariation::Approximation.apply(expected, fallback),
            "The premium is about $120 per month"
        );
        assert_eq!(
            ResponseVariation::CurrencyCode.apply(expected, fallback),
            "The premium is approximately USD 120 per month"
        );
        assert_eq!(
            ResponseVariation::Truncated.apply(expected, fallback),
            "The premium is approximately $120"
        );
        assert_eq!(ResponseVariation::Fallback.apply(expected, fallback), fallback);
    }

    #[test]
    fn test_truncating_short_response() {
        assert_eq!(ResponseVariation::Truncated.apply("yes", "x"), "");
        assert_eq!(ResponseVariation::Truncated.apply("", "x"), "");
        assert_eq!(ResponseVariation::Truncated.apply("two words", "x"), "");
    }

    #[test]
    fn test_truncating_keeps_original_spacing() {
        assert_eq!(
            ResponseVariation::Truncated.apply("Total:\t$500  due\nnext week  ", "x"),
            "Total:\t$500  due"
        );
    }

    #[test]
    fn test_nan_range_does_not_sample() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(sample_f64(&mut rng, f64::NAN..1.0).is_nan());
        assert_eq!(sample_f64(&mut rng, 0.5..0.5), 0.5);
        let drawn = sample_f64(&mut rng, 0.2..0.4);
        assert!((0.2..0.4).contains(&drawn));
    }

    #[test]
    fn test_verbatim_faithfulness_passes() {
        let simulator = TestSimulator::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let result = simulator.score_variation(
                &faithfulness_case(),
                &sky(),
                ResponseVariation::Verbatim,
                1000,
                Utc::now(),
                &mut rng,
            );
            assert!(result.score >= 0.95 && result.score <= 1.0, "score {}", result.score);
            assert_eq!(result.status, TestStatus::Pass);
            assert_eq!(result.eval_type, EvalType::LlmPlusCode);
        }
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let config = SimulationConfig {
            jitter: 0.0,
            ..SimulationConfig::default()
        };
        let simulator = TestSimulator::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        let result = simulator.score_variation(
            &faithfulness_case(),
            &sky(),
            ResponseVariation::Verbatim,
            900,
            Utc::now(),
            &mut rng,
        );
        assert!((result.score - 1.0).abs() < 1e-9);
        assert_eq!(result.response_time_ms, 900);
        assert_eq!(result.actual_response, "The sky is blue");
    }

    #[test]
    fn test_fallback_response_fails_faithfulness() {
        let simulator = TestSimulator::default();
        let mut rng = StdRng::seed_from_u64(3);

        let result = simulator.score_variation(
            &faithfulness_case(),
            &sky(),
            ResponseVariation::Fallback,
            1000,
            Utc::now(),
            &mut rng,
        );
        assert_eq!(result.status, TestStatus::Fail);
        assert_eq!(result.actual_response, "information is currently unavailable");
    }

    #[test]
    fn test_simulate_invariants() {
        let simulator = TestSimulator::default();
        let mut rng = StdRng::seed_from_u64(99);
        let case = TestCaseDescriptor::new("TC-9", "Support", "Privacy", "Privacy Leakage Rate");

        for _ in 0..200 {
            let result = simulator.simulate(&case, &sky(), &mut rng);
            assert!((0.0..=1.0).contains(&result.score));
            assert!((800..2000).contains(&result.response_time_ms));
            assert_eq!(result.threshold, 0.8);
            assert_eq!(result.status == TestStatus::Pass, result.score >= result.threshold);
            assert_eq!(result.eval_type, EvalType::CodeEval);
            assert!(result.error_message.is_none());
        }
    }

    #[test]
    fn test_unknown_metric_uses_fallback_range() {
        let simulator = TestSimulator::default();
        let mut rng = StdRng::seed_from_u64(5);
        let case = TestCaseDescriptor::new("TC-7", "Support", "Bias", "Demographic Parity")
            .with_eval_type(EvalType::CodePlusHuman);

        for _ in 0..100 {
            let result = simulator.simulate(&case, &sky(), &mut rng);
            assert!(result.score >= 0.65 && result.score <= 1.0);
            assert_eq!(result.eval_type, EvalType::CodePlusHuman);
        }

        let bare = TestCaseDescriptor::new("TC-8", "Support", "Bias", "Demographic Parity");
        let result = simulator.simulate(&bare, &sky(), &mut rng);
        assert_eq!(result.eval_type, EvalType::CodeEval);
    }

    #[test]
    fn test_freshness_ignores_response() {
        let config = SimulationConfig {
            jitter: 0.0,
            ..SimulationConfig::default()
        };
        let simulator = TestSimulator::new(config);
        let mut rng = StdRng::seed_from_u64(11);
        let case = TestCaseDescriptor::new("TC-3", "Ops", "Staleness", "Freshness Index");

        let result = simulator.simulate(&case, &sky(), &mut rng);
        assert!((result.score - (1.0 - 7.0 / 30.0)).abs() < 1e-9);
        assert_eq!(result.status, TestStatus::Fail);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let simulator = TestSimulator::new(SimulationConfig::seeded(42));
        let now = Utc::now();
        let case = faithfulness_case();

        let mut rng_a = simulator.rng();
        let mut rng_b = simulator.rng();
        for _ in 0..20 {
            let a = simulator.simulate_at(&case, &sky(), now, &mut rng_a);
            let b = simulator.simulate_at(&case, &sky(), now, &mut rng_b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_degenerate_ranges_do_not_panic() {
        let config = SimulationConfig {
            min_response_ms: 500,
            max_response_ms: 500,
            fallback_score_range: (0.9, 0.9),
            ..SimulationConfig::default()
        };
        let simulator = TestSimulator::new(config);
        let mut rng = StdRng::seed_from_u64(0);
        let case = TestCaseDescriptor::new("TC-1", "u", "r", "Unregistered");

        let result = simulator.simulate(&case, &sky(), &mut rng);
        assert_eq!(result.response_time_ms, 500);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(1.04), 1.0);
        assert_eq!(clamp_score(-0.2), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(0.5), 0.5);
    }
}
