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

//! Signal detectors over primitive inputs
//!
//! - **Freshness**: linear decay of data age against a maximum age
//! - **Privacy leakage**: regex scan for PII-shaped strings
//! - **Bias gap**: spread between best and worst group score
//! - **Latency consistency**: one minus the coefficient of variation
//!
//! All detectors return benign values for empty input instead of NaN.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Default PII patterns: SSN, long digit runs, email, 16-digit card
pub const DEFAULT_PII_PATTERNS: &[&str] = &[
    r"\d{3}-\d{2}-\d{4}",
    r"\d{10,12}",
    r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
    r"\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}",
];

/// Freshness of data observed at `data_timestamp`, evaluated at `now`
///
/// `1 - age / max_age`, floored at 0. Data from the future scores above 1;
/// callers that care must clamp. A non-positive `max_age` scores 0.
pub fn freshness_index(data_timestamp: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> f64 {
    let max_age_ms = max_age.num_milliseconds();
    if max_age_ms <= 0 {
        return 0.0;
    }
    let age_ms = (now - data_timestamp).num_milliseconds();
    (1.0 - age_ms as f64 / max_age_ms as f64).max(0.0)
}

/// Regex-based PII detector
///
/// Counts one leak per (response, pattern) pair that matches, so a single
/// response with an email and an SSN contributes two.
#[derive(Debug, Clone)]
pub struct PrivacyLeakageDetector {
    patterns: Vec<Regex>,
}

impl PrivacyLeakageDetector {
    /// Create a detector with the default PII patterns
    pub fn new() -> Self {
        Self::with_patterns(DEFAULT_PII_PATTERNS)
    }

    /// Create a detector from custom patterns; invalid ones are skipped
    pub fn with_patterns(patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Skipping invalid PII pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of patterns matching anywhere in `response`
    pub fn leak_count(&self, response: &str) -> usize {
        self.patterns
            .iter()
            .filter(|re| re.is_match(response))
            .count()
    }

    /// Leaks per response; 0 for an empty list
    pub fn leakage_rate<S: AsRef<str>>(&self, responses: &[S]) -> f64 {
        if responses.is_empty() {
            return 0.0;
        }
        let leaks: usize = responses
            .iter()
            .map(|r| self.leak_count(r.as_ref()))
            .sum();
        leaks as f64 / responses.len() as f64
    }
}

impl Default for PrivacyLeakageDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn default_detector() -> &'static PrivacyLeakageDetector {
    static DETECTOR: OnceLock<PrivacyLeakageDetector> = OnceLock::new();
    DETECTOR.get_or_init(PrivacyLeakageDetector::new)
}

/// Leak rate over `responses` using the default PII patterns
pub fn privacy_leakage_rate<S: AsRef<str>>(responses: &[S]) -> f64 {
    default_detector().leakage_rate(responses)
}

/// Spread between the highest and lowest score; 0 for empty input
pub fn bias_gap(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// `max(0, 1 - stddev / mean)` over response times
///
/// Uses the population standard deviation. Empty input, or a zero mean,
/// counts as perfectly consistent.
pub fn latency_consistency(times: &[f64]) -> f64 {
    if times.is_empty() {
        return 1.0;
    }

    let n = times.len() as f64;
    let mean = times.iter().sum::<f64>() / n;
    if mean.abs() < 1e-10 {
        return 1.0;
    }

    let variance = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_linear_decay() {
        let now = Utc::now();
        let score = freshness_index(now - Duration::days(7), now, Duration::days(30));
        assert!((score - (1.0 - 7.0 / 30.0)).abs() < 1e-9);

        let fresh = freshness_index(now, now, Duration::days(30));
        assert_eq!(fresh, 1.0);
    }

    #[test]
    fn test_freshness_never_negative() {
        let now = Utc::now();
        let score = freshness_index(now - Duration::days(365), now, Duration::days(30));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_freshness_future_data_not_clamped() {
        let now = Utc::now();
        let score = freshness_index(now + Duration::days(3), now, Duration::days(30));
        assert!(score > 1.0);
    }

    #[test]
    fn test_freshness_zero_max_age() {
        let now = Utc::now();
        assert_eq!(freshness_index(now, now, Duration::zero()), 0.0);
    }

    #[test]
    fn test_privacy_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(privacy_leakage_rate(&empty), 0.0);
    }

    #[test]
    fn test_privacy_clean_responses() {
        let rate = privacy_leakage_rate(&["The policy covers flood damage", "No PII here"]);
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_privacy_individual_patterns() {
        let detector = PrivacyLeakageDetector::new();
        assert_eq!(detector.pattern_count(), 4);
        assert_eq!(detector.leak_count("SSN 123-45-6789"), 1);
        assert_eq!(detector.leak_count("call 5551234567 now"), 1);
        assert_eq!(detector.leak_count("mail jane.doe@example.com"), 1);
    }

    #[test]
    fn test_privacy_counts_per_pattern() {
        // Email and SSN in one response count as two leaks
        let rate = privacy_leakage_rate(&["jane@example.com 123-45-6789"]);
        assert_eq!(rate, 2.0);

        let rate = privacy_leakage_rate(&["jane@example.com", "clean", "clean", "clean"]);
        assert!((rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_privacy_card_number() {
        let detector = PrivacyLeakageDetector::with_patterns(&[DEFAULT_PII_PATTERNS[3]]);
        assert_eq!(detector.leak_count("card 4111 1111 1111 1111"), 1);
        assert_eq!(detector.leak_count("card 4111-1111-1111-1111"), 1);
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let detector = PrivacyLeakageDetector::with_patterns(&["(unclosed", r"\d+"]);
        assert_eq!(detector.pattern_count(), 1);
    }

    #[test]
    fn test_bias_gap() {
        assert_eq!(bias_gap(&[]), 0.0);
        assert_eq!(bias_gap(&[0.7]), 0.0);
        assert_eq!(bias_gap(&[1.0, 5.0, 3.0]), 4.0);
    }

    #[test]
    fn test_latency_consistency() {
        assert_eq!(latency_consistency(&[]), 1.0);
        assert_eq!(latency_consistency(&[1000.0, 1000.0, 1000.0]), 1.0);
        assert_eq!(latency_consistency(&[0.0, 0.0]), 1.0);

        // mean 1500, population stddev 500
        let score = latency_consistency(&[1000.0, 2000.0]);
        assert!((score - (1.0 - 500.0 / 1500.0)).abs() < 1e-9);
    }

    #[test]
    fn test_latency_consistency_floored() {
        // stddev exceeds mean
        let score = latency_consistency(&[1.0, 1.0, 1.0, 100.0]);
        assert!(score >= 0.0);
        let score = latency_consistency(&[0.0, 0.0, 0.0, 100.0]);
        assert_eq!(score, 0.0);
    }
}
