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

//! Bag-of-words text similarity
//!
//! Deliberately crude: lowercase plus whitespace split, no stemming, no
//! stopword removal, punctuation stays attached to its word. Deterministic
//! and allocation-light so it can score thousands of responses per second.
//!
//! ```rust,ignore
//! use trustscore_evals::similarity::cosine_similarity;
//!
//! let score = cosine_similarity("The sky is blue", "the sky is BLUE");
//! assert!((score - 1.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;

/// Lowercase and split on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Raw occurrence count per token
fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of the term-count vectors of two texts
///
/// Returns a value in [0, 1]; 0 when either text has no tokens.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(&tokens_a);
    let counts_b = term_counts(&tokens_b);

    // Terms missing from either side contribute nothing to the dot product
    let dot: f64 = counts_a
        .iter()
        .filter_map(|(term, ca)| counts_b.get(term).map(|cb| (*ca * *cb) as f64))
        .sum();

    let norm_a = counts_a
        .values()
        .map(|c| (*c * *c) as f64)
        .sum::<f64>()
        .sqrt();
    let norm_b = counts_b
        .values()
        .map(|c| (*c * *c) as f64)
        .sum::<f64>()
        .sqrt();

    if norm_a < 1e-10 || norm_b < 1e-10 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_texts() {
        let text = "The quick brown fox jumps over the lazy dog";
        assert!((cosine_similarity(text, text) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_case_insensitive() {
        assert!((cosine_similarity("The Sky is Blue", "the sky is blue") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_texts() {
        assert_eq!(cosine_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // [1,1,0] vs [1,0,1] over {a, b, c}
        let score = cosine_similarity("a b", "a c");
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_counts_matter() {
        // [2,0] vs [1,1]: 2 / (2 * sqrt(2))
        let score = cosine_similarity("a a", "a b");
        assert!((score - 1.0 / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_punctuation_is_part_of_token() {
        assert_eq!(cosine_similarity("blue.", "blue"), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(cosine_similarity("", "anything"), 0.0);
        assert_eq!(cosine_similarity("anything", ""), 0.0);
        assert_eq!(cosine_similarity("   ", "   "), 0.0);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Hello   World\tagain "), vec!["hello", "world", "again"]);
        assert!(tokenize("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in "[a-d ]{0,24}", b in "[a-d ]{0,24}") {
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-12);
        }

        #[test]
        fn prop_bounded(a in "[a-e ]{0,32}", b in "[a-e ]{0,32}") {
            let score = cosine_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_self_similarity(words in proptest::collection::vec("[a-z]{1,6}", 1..10)) {
            let text = words.join(" ");
            prop_assert!((cosine_similarity(&text, &text) - 1.0).abs() < 1e-9);
        }
    }
}
