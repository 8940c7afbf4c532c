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

use crate::{CoreError, EvalType, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Relative weight per metric name for the trust index
pub type MetricWeights = HashMap<String, f64>;

/// Identifies what a test case measures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCaseDescriptor {
    /// Unique identifier for the test case
    pub id: String,

    /// Use case label (e.g. "Claims Summarization")
    pub use_case: String,

    /// Risk category label (e.g. "Hallucination")
    pub risk: String,

    /// Metric name; selects which scorer runs
    pub metric: String,

    /// Pass bar in [0, 1]; falls back to the configured default
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Dataset entry to run against; positional pairing when absent
    #[serde(default)]
    pub dataset_id: Option<String>,

    /// Eval type reported for metrics without a registered scorer
    #[serde(default)]
    pub eval_type: Option<EvalType>,
}

impl TestCaseDescriptor {
    /// Create a test case with no explicit threshold
    pub fn new(
        id: impl Into<String>,
        use_case: impl Into<String>,
        risk: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            use_case: use_case.into(),
            risk: risk.into(),
            metric: metric.into(),
            threshold: None,
            dataset_id: None,
            eval_type: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_dataset_id(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }

    pub fn with_eval_type(mut self, eval_type: EvalType) -> Self {
        self.eval_type = Some(eval_type);
        self
    }

    /// Threshold in effect, given the configured default
    pub fn effective_threshold(&self, default: f64) -> f64 {
        self.threshold.unwrap_or(default)
    }
}

/// Input/output pair under test
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    pub id: String,
    pub input_prompt: String,
    pub expected_response: String,
}

impl DatasetEntry {
    pub fn new(
        id: impl Into<String>,
        input_prompt: impl Into<String>,
        expected_response: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            input_prompt: input_prompt.into(),
            expected_response: expected_response.into(),
        }
    }
}

/// An evaluation suite: context labels, test cases and the dataset they run on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustSuite {
    /// Application under evaluation
    pub application: String,

    /// Archetype code of the application (e.g. "RAG-CS")
    pub archetype: String,

    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Metric weights for the trust index; empty means unweighted
    #[serde(default)]
    pub weights: MetricWeights,

    #[serde(default)]
    pub test_cases: Vec<TestCaseDescriptor>,

    #[serde(default)]
    pub dataset: Vec<DatasetEntry>,
}

impl TrustSuite {
    /// Create an empty suite
    pub fn new(application: impl Into<String>, archetype: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            archetype: archetype.into(),
            simulation: SimulationConfig::default(),
            weights: MetricWeights::new(),
            test_cases: Vec::new(),
            dataset: Vec::new(),
        }
    }

    /// Parse a suite from TOML text and validate it
    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let suite: TrustSuite = toml::from_str(raw)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Read a suite from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load a suite file and apply environment overrides
    pub fn load(path: PathBuf) -> Result<Self, CoreError> {
        tracing::info!("Loading suite from file: {:?}", path);
        let mut suite = Self::from_file(&path)?;
        suite.simulation = suite.simulation.merge_with_env()?;
        suite.simulation.validate()?;
        Ok(suite)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.simulation.validate()?;

        for case in &self.test_cases {
            if let Some(threshold) = case.threshold {
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(CoreError::InvalidConfig(format!(
                        "test case {} has threshold {} outside [0, 1]",
                        case.id, threshold
                    )));
                }
            }
        }

        for (metric, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "weight for {:?} must be a non-negative number, got {}",
                    metric, weight
                )));
            }
        }

        Ok(())
    }

    /// Dataset entry a test case runs against
    ///
    /// An explicit `dataset_id` must match an entry; otherwise test case `i`
    /// pairs with entry `i` modulo the dataset length.
    pub fn dataset_for(&self, index: usize, case: &TestCaseDescriptor) -> Option<&DatasetEntry> {
        match &case.dataset_id {
            Some(id) => self.dataset.iter().find(|entry| &entry.id == id),
            None if self.dataset.is_empty() => None,
            None => self.dataset.get(index % self.dataset.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SUITE: &str = r#"
application = "Claims Assistant"
archetype = "RAG-CS"

[simulation]
seed = 42

[weights]
"Faithfulness Score" = 2.0

[[test_cases]]
id = "TC-001"
use_case = "Claims Summarization"
risk = "Hallucination"
metric = "Faithfulness Score"
threshold = 0.85
dataset_id = "DS-002"

[[test_cases]]
id = "TC-002"
use_case = "Claims Summarization"
risk = "Privacy"
metric = "Privacy Leakage Rate"

[[dataset]]
id = "DS-001"
input_prompt = "What is the deductible?"
expected_response = "The deductible is approximately $500"

[[dataset]]
id = "DS-002"
input_prompt = "Summarize the claim"
expected_response = "The claim covers water damage"
"#;

    #[test]
    fn test_parse_suite() {
        let suite = TrustSuite::from_toml_str(SUITE).unwrap();
        assert_eq!(suite.application, "Claims Assistant");
        assert_eq!(suite.archetype, "RAG-CS");
        assert_eq!(suite.simulation.seed, Some(42));
        assert_eq!(suite.simulation.default_threshold, 0.8);
        assert_eq!(suite.weights.get("Faithfulness Score"), Some(&2.0));
        assert_eq!(suite.test_cases.len(), 2);
        assert_eq!(suite.test_cases[0].threshold, Some(0.85));
        assert_eq!(suite.test_cases[1].threshold, None);
        assert_eq!(suite.dataset.len(), 2);
    }

    #[test]
    fn test_dataset_resolution() {
        let suite = TrustSuite::from_toml_str(SUITE).unwrap();

        let first = suite.dataset_for(0, &suite.test_cases[0]).unwrap();
        assert_eq!(first.id, "DS-002");

        // Positional pairing
        let second = suite.dataset_for(1, &suite.test_cases[1]).unwrap();
        assert_eq!(second.id, "DS-002");
        let wrapped = suite.dataset_for(2, &suite.test_cases[1]).unwrap();
        assert_eq!(wrapped.id, "DS-001");

        let missing = TestCaseDescriptor::new("TC-X", "u", "r", "m").with_dataset_id("DS-404");
        assert!(suite.dataset_for(0, &missing).is_none());
    }

    #[test]
    fn test_empty_dataset_resolves_nothing() {
        let suite = TrustSuite::new("App", "ARC");
        let case = TestCaseDescriptor::new("TC-1", "u", "r", "m");
        assert!(suite.dataset_for(0, &case).is_none());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let raw = r#"
application = "A"
archetype = "B"

[[test_cases]]
id = "TC-1"
use_case = "u"
risk = "r"
metric = "m"
threshold = 1.2
"#;
        let err = TrustSuite::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let raw = r#"
application = "A"
archetype = "B"

[weights]
"Faithfulness Score" = -1.0
"#;
        assert!(TrustSuite::from_toml_str(raw).is_err());
    }

    #[test]
    fn test_unrepresentable_freshness_age_rejected() {
        let raw = r#"
application = "A"
archetype = "B"

[simulation]
freshness_age_days = 4000000000

[[test_cases]]
id = "TC-1"
use_case = "u"
risk = "Staleness"
metric = "Freshness Index"
"#;
        let err = TrustSuite::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = TrustSuite::from_toml_str("application = ").unwrap_err();
        assert!(matches!(err, CoreError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SUITE.as_bytes()).unwrap();

        let suite = TrustSuite::from_file(file.path()).unwrap();
        assert_eq!(suite.test_cases[0].id, "TC-001");

        let err = TrustSuite::from_file(Path::new("/nonexistent/suite.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn test_effective_threshold() {
        let case = TestCaseDescriptor::new("TC-1", "u", "r", "m");
        assert_eq!(case.effective_threshold(0.8), 0.8);
        assert_eq!(case.with_threshold(0.6).effective_threshold(0.8), 0.6);
    }
}
