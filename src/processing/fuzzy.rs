//! Approximate string matching against a canonical vocabulary.

use std::cmp::min;

/// Default minimum similarity for a correction to be applied.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Optimal string alignment distance (restricted Damerau-Levenshtein).
///
/// Counts insertions, deletions, substitutions and transpositions of adjacent characters, with
/// no substring edited more than once. Operates on Unicode scalar values.
#[allow(clippy::needless_range_loop)]
pub fn osa_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (len1, len2) = (a.len(), b.len());

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut matrix = vec![vec![0usize; len2 + 1]; len1 + 1];
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = min(
                min(
                    matrix[i - 1][j] + 1, // deletion
                    matrix[i][j - 1] + 1, // insertion
                ),
                matrix[i - 1][j - 1] + cost, // substitution
            );
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = min(best, matrix[i - 2][j - 2] + 1); // transposition
            }
            matrix[i][j] = best;
        }
    }

    matrix[len1][len2]
}

/// Normalized similarity in `[0, 1]`: `1 - distance / max_len`.
///
/// Symmetric; `1.0` iff the strings are identical (two empty strings included).
pub fn similarity(s1: &str, s2: &str) -> f64 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - osa_distance(s1, s2) as f64 / max_len as f64
}

/// Returns the first candidate with the highest similarity to `value`, with its score.
pub fn best_match<'a, S: AsRef<str>>(value: &str, vocabulary: &'a [S]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in vocabulary {
        let candidate = candidate.as_ref();
        let score = similarity(value, candidate);
        // Strict comparison keeps the earliest candidate among ties.
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best
}

/// Correct `value` to the closest entry of `vocabulary` if it is similar enough.
///
/// Returns `value` unchanged when the vocabulary is empty or the best score is below `threshold`.
pub fn correct<S: AsRef<str>>(value: &str, vocabulary: &[S], threshold: f64) -> String {
    match best_match(value, vocabulary) {
        Some((candidate, score)) if score >= threshold => candidate.to_string(),
        _ => value.to_string(),
    }
}

/// A fuzzy corrector bound to one immutable vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyCorrector {
    vocabulary: Vec<String>,
    threshold: f64,
}

impl FuzzyCorrector {
    /// Create a corrector. Vocabulary order decides ties.
    pub fn new<I, S>(vocabulary: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
            threshold,
        }
    }

    /// Canonical values, in declared order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Minimum similarity for a correction.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Correct a single value. Never fails.
    pub fn correct(&self, value: &str) -> String {
        correct(value, &self.vocabulary, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::{best_match, correct, osa_distance, similarity, FuzzyCorrector, DEFAULT_THRESHOLD};

    const SMALL: [&str; 3] = ["Spain", "USA", "Italy"];

    #[test]
    fn test_osa_distance() {
        assert_eq!(osa_distance("", ""), 0);
        assert_eq!(osa_distance("abc", ""), 3);
        assert_eq!(osa_distance("kitten", "sitting"), 3);
        assert_eq!(osa_distance("fialed", "failed"), 1); // transposition
        assert_eq!(osa_distance("Sopain", "Spain"), 1);
        assert_eq!(osa_distance("ca", "abc"), 3);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        for (a, b) in [("Sopain", "Spain"), ("Xyzzy", "Italy"), ("", "USA"), ("pwnding", "pending")] {
            let s = similarity(a, b);
            assert_eq!(s, similarity(b, a));
            assert!((0.0..=1.0).contains(&s));
        }
        assert_eq!(similarity("USA", "USA"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn corrects_close_typo() {
        assert_eq!(correct("Sopain", &SMALL, DEFAULT_THRESHOLD), "Spain");
    }

    #[test]
    fn leaves_distant_value_unchanged() {
        assert_eq!(correct("Xyzzy", &SMALL, DEFAULT_THRESHOLD), "Xyzzy");
    }

    #[test]
    fn canonical_values_are_fixed_points() {
        for v in SMALL {
            assert_eq!(correct(v, &SMALL, DEFAULT_THRESHOLD), v);
        }
        let once = correct("Itakly", &SMALL, DEFAULT_THRESHOLD);
        assert_eq!(once, "Italy");
        assert_eq!(correct(&once, &SMALL, DEFAULT_THRESHOLD), once);
    }

    #[test]
    fn ties_pick_first_in_vocabulary_order() {
        // "ab" is one edit away from both.
        assert_eq!(best_match("ab", &["ac", "ad"]).unwrap().0, "ac");
        assert_eq!(best_match("ab", &["ad", "ac"]).unwrap().0, "ad");
    }

    #[test]
    fn empty_vocabulary_returns_input() {
        let empty: [&str; 0] = [];
        assert_eq!(correct("anything", &empty, 0.0), "anything");
    }

    #[test]
    fn threshold_is_inclusive() {
        // 1 - 1/4 = 0.75
        assert_eq!(correct("abcx", &["abcd"], 0.75), "abcd");
        assert_eq!(correct("abcx", &["abcd"], 0.76), "abcx");
    }

    #[test]
    fn corrector_struct_matches_free_function() {
        let c = FuzzyCorrector::new(["pending", "failed", "completed"], DEFAULT_THRESHOLD);
        assert_eq!(c.correct("pendhing"), "pending");
        assert_eq!(c.correct("fialed"), "failed");
        assert_eq!(c.correct("faoleid"), "failed");
        assert_eq!(c.correct("compoletd"), "completed");
        assert_eq!(c.correct("complete"), "completed");
        assert_eq!(c.vocabulary().len(), 3);
    }
}
