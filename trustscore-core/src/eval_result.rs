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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single test case execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    Pass,
    Fail,
    /// Still executing; set by an orchestrator, never by a scorer
    Running,
    /// Execution failed before a score could be produced
    Error,
}

impl TestStatus {
    /// Pass/Fail verdict for a score against its threshold
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        }
    }

    /// Whether this status is a scored verdict (Pass or Fail)
    pub fn is_verdict(&self) -> bool {
        matches!(self, TestStatus::Pass | TestStatus::Fail)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestStatus::Pass => "Pass",
            TestStatus::Fail => "Fail",
            TestStatus::Running => "Running",
            TestStatus::Error => "Error",
        };
        f.write_str(s)
    }
}

/// How a metric's score was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EvalType {
    #[default]
    #[serde(rename = "Code Eval")]
    CodeEval,
    #[serde(rename = "LLM Eval")]
    LlmEval,
    #[serde(rename = "LLM + Code", alias = "LLM+Code")]
    LlmPlusCode,
    #[serde(rename = "Code + Human", alias = "Code+Human")]
    CodePlusHuman,
}

impl fmt::Display for EvalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EvalType::CodeEval => "Code Eval",
            EvalType::LlmEval => "LLM Eval",
            EvalType::LlmPlusCode => "LLM + Code",
            EvalType::CodePlusHuman => "Code + Human",
        };
        f.write_str(s)
    }
}

/// Scored outcome of one test case run against one dataset entry
///
/// Created once per execution and never mutated afterwards. For results
/// produced by a scorer, `status` is `Pass` exactly when `score >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// ID of the test case that produced this result
    pub test_case_id: String,

    /// Use case label (grouping key)
    pub use_case: String,

    /// Risk category label (grouping key)
    pub risk: String,

    /// Metric name (grouping key and scorer selector)
    pub metric: String,

    /// Score clamped to [0, 1]
    pub score: f64,

    /// Effective pass bar
    pub threshold: f64,

    pub status: TestStatus,

    pub response_time_ms: u64,

    pub eval_type: EvalType,

    pub timestamp: DateTime<Utc>,

    pub actual_response: String,

    pub expected_response: String,

    /// Set when `status` is `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ScoredResult {
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Pass
    }

    pub fn failed(&self) -> bool {
        self.status == TestStatus::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_score() {
        assert_eq!(TestStatus::from_score(0.8, 0.8), TestStatus::Pass);
        assert_eq!(TestStatus::from_score(0.79, 0.8), TestStatus::Fail);
        assert!(TestStatus::Pass.is_verdict());
        assert!(!TestStatus::Running.is_verdict());
    }

    #[test]
    fn test_eval_type_serialization() {
        let json = serde_json::to_string(&EvalType::LlmPlusCode).unwrap();
        assert_eq!(json, "\"LLM + Code\"");

        let parsed: EvalType = serde_json::from_str("\"LLM+Code\"").unwrap();
        assert_eq!(parsed, EvalType::LlmPlusCode);

        let parsed: EvalType = serde_json::from_str("\"Code Eval\"").unwrap();
        assert_eq!(parsed, EvalType::CodeEval);
    }

    #[test]
    fn test_error_message_omitted_when_absent() {
        let result = ScoredResult {
            test_case_id: "TC-001".to_string(),
            use_case: "Claims".to_string(),
            risk: "Hallucination".to_string(),
            metric: "Faithfulness Score".to_string(),
            score: 0.9,
            threshold: 0.8,
            status: TestStatus::Pass,
            response_time_ms: 1200,
            eval_type: EvalType::LlmPlusCode,
            timestamp: Utc::now(),
            actual_response: "a".to_string(),
            expected_response: "a".to_string(),
            error_message: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("error_message").is_none());
        assert_eq!(value["status"], "Pass");
        assert_eq!(value["eval_type"], "LLM + Code");
    }
}
