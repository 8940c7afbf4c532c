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

//! Text metric scorers built on bag-of-words similarity
//!
//! Scores are intended to lie in [0, 1]; callers clamp before comparing
//! against a threshold.

use crate::similarity::{cosine_similarity, tokenize};
use std::collections::HashSet;

/// How closely the response matches the expected answer
pub fn faithfulness(actual: &str, expected: &str) -> f64 {
    cosine_similarity(actual, expected)
}

/// Fraction of response tokens that appear anywhere in `context`
///
/// Membership only: order and repetition in the context are ignored, so every
/// occurrence of a supported token in `actual` counts. 0 for an empty response.
pub fn groundedness(actual: &str, context: &str) -> f64 {
    let actual_tokens = tokenize(actual);
    if actual_tokens.is_empty() {
        return 0.0;
    }

    let context_tokens = tokenize(context);
    let context_set: HashSet<&str> = context_tokens.iter().map(String::as_str).collect();

    let supported = actual_tokens
        .iter()
        .filter(|t| context_set.contains(t.as_str()))
        .count();

    supported as f64 / actual_tokens.len() as f64
}

/// How closely the response tracks the prompt it answers
pub fn context_relevance(actual: &str, prompt: &str) -> f64 {
    cosine_similarity(actual, prompt)
}
