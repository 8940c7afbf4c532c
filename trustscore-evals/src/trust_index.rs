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

//! Overall trust index

use trustscore_core::{MetricWeights, ScoredResult};

/// Weight applied to metrics missing from a weight map
pub const DEFAULT_METRIC_WEIGHT: f64 = 1.0;

/// Single scalar summarizing every result's score
///
/// Without weights this is the arithmetic mean. With weights it is
/// `Σ(score × w(metric)) / Σ w(metric)`, where unlisted metrics weigh 1.
/// Negative, NaN and infinite weights also fall back to 1. Returns 0 for an
/// empty list or when the weighted mean is not a finite number.
pub fn overall_trust_index(results: &[ScoredResult], weights: Option<&MetricWeights>) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let weight_of = |result: &ScoredResult| -> f64 {
        weights
            .and_then(|w| w.get(&result.metric).copied())
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or(DEFAULT_METRIC_WEIGHT)
    };

    let (weighted_sum, total_weight) = results.iter().fold((0.0, 0.0), |(sum, total), r| {
        let w = weight_of(r);
        (sum + r.score * w, total + w)
    });

    if !total_weight.is_finite() || total_weight <= 0.0 {
        return 0.0;
    }

    let index = weighted_sum / total_weight;
    if index.is_finite() {
        index
    } else {
        0.0
    }
}
