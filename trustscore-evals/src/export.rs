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

//! JSON interchange for results and reports (pretty-printed, 2-space indent)

use crate::report::TrustIndexReport;
use crate::EvalError;
use trustscore_core::ScoredResult;

/// Export results as a JSON array
pub fn export_results(results: &[ScoredResult]) -> Result<String, EvalError> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Parse a JSON array produced by [`export_results`]
///
/// Rejects results whose score lies outside [0, 1].
pub fn import_results(json: &str) -> Result<Vec<ScoredResult>, EvalError> {
    let results: Vec<ScoredResult> = serde_json::from_str(json)?;
    if let Some(bad) = results.iter().find(|r| !(0.0..=1.0).contains(&r.score)) {
        return Err(EvalError::InvalidInput(format!(
            "result {} has score {} outside [0, 1]",
            bad.test_case_id, bad.score
        )));
    }
    Ok(results)
}

/// Export a report as a JSON object
pub fn export_report(report: &TrustIndexReport) -> Result<String, EvalError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Parse a JSON object produced by [`export_report`]
pub fn import_report(json: &str) -> Result<TrustIndexReport, EvalError> {
    Ok(serde_json::from_str(json)?)
}
