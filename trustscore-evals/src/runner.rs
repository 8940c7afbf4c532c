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

//! Suite execution
//!
//! Pairs every test case in a [`TrustSuite`] with its dataset entry and runs
//! it through the [`TestSimulator`]. Test cases that cannot be paired are
//! reported as `Error` results instead of aborting the run.
//!
//! ```rust,ignore
//! let suite = TrustSuite::from_file(path)?;
//! let results = SuiteRunner::new(&suite).run();
//! let report = ReportGenerator::from_suite(&suite).generate(&results);
//! ```

use crate::simulator::TestSimulator;
use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};
use trustscore_core::{EvalType, ScoredResult, TestCaseDescriptor, TestStatus, TrustSuite};

/// Runs every test case of a suite through the simulator
pub struct SuiteRunner<'a> {
    suite: &'a TrustSuite,
    simulator: TestSimulator,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(suite: &'a TrustSuite) -> Self {
        Self {
            suite,
            simulator: TestSimulator::new(suite.simulation.clone()),
        }
    }

    /// Run with the simulator's own random source (seeded if configured)
    pub fn run(&self) -> Vec<ScoredResult> {
        let mut rng = self.simulator.rng();
        self.run_with_rng(&mut rng)
    }

    /// Run with a caller-supplied random source
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ScoredResult> {
        info!(
            "Running {} test cases for {} ({})",
            self.suite.test_cases.len(),
            self.suite.application,
            self.suite.archetype
        );

        let results: Vec<ScoredResult> = self
            .suite
            .test_cases
            .iter()
            .enumerate()
            .map(|(index, case)| match self.suite.dataset_for(index, case) {
                Some(entry) => self.simulator.simulate(case, entry, &mut *rng),
                None => {
                    let message = match &case.dataset_id {
                        Some(id) => format!("dataset entry {} not found", id),
                        None => "suite has no dataset entries".to_string(),
                    };
                    warn!("Test case {} not executed: {}", case.id, message);
                    self.error_result(case, message)
                }
            })
            .collect();

        let passed = results.iter().filter(|r| r.passed()).count();
        info!("Suite finished: {}/{} passed", passed, results.len());
        results
    }

    fn error_result(&self, case: &TestCaseDescriptor, message: String) -> ScoredResult {
        ScoredResult {
            test_case_id: case.id.clone(),
            use_case: case.use_case.clone(),
            risk: case.risk.clone(),
            metric: case.metric.clone(),
            score: 0.0,
            threshold: case.effective_threshold(self.simulator.config().default_threshold),
            status: TestStatus::Error,
            response_time_ms: 0,
            eval_type: crate::registry::lookup(&case.metric)
                .map(|spec| spec.eval_type)
                .or(case.eval_type)
                .unwrap_or(EvalType::CodeEval),
            timestamp: Utc::now(),
            actual_response: String::new(),
            expected_response: String::new(),
            error_message: Some(message),
        }
    }
}
