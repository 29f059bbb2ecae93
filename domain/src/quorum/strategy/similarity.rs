//! Normalized edit-distance similarity.
//!
//! Full Levenshtein over serialized payloads is O(L²) per pair and the
//! committee compares every pair, so comparisons are capped at a prefix of
//! `max_chars` characters and pairs whose length difference alone rules out
//! the threshold are skipped without running the DP.

/// Default cap on the number of characters compared per payload.
pub const DEFAULT_MAX_COMPARE_CHARS: usize = 4096;

/// Levenshtein distance between two character sequences (two-row DP).
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in `0.0..=1.0`; exactly `1.0` only for identical strings.
pub fn similarity(a: &str, b: &str, max_chars: usize) -> f64 {
    if a == b {
        return 1.0;
    }
    let ac: Vec<char> = a.chars().take(max_chars).collect();
    let bc: Vec<char> = b.chars().take(max_chars).collect();
    let longest = ac.len().max(bc.len());
    if longest == 0 {
        return 0.0;
    }

    let score = 1.0 - levenshtein(&ac, &bc) as f64 / longest as f64;
    if score >= 1.0 {
        // Prefixes match but the full strings differ beyond the cap.
        let full = a.chars().count().max(b.chars().count());
        return 1.0 - 1.0 / (full as f64 + 1.0);
    }
    score
}

/// Whether `a` and `b` are at least `threshold` similar.
pub fn is_similar(a: &str, b: &str, threshold: f64, max_chars: usize) -> bool {
    if a == b {
        return true;
    }
    if threshold >= 1.0 {
        return false;
    }

    let la = a.chars().take(max_chars).count();
    let lb = b.chars().take(max_chars).count();
    let longest = la.max(lb);
    if longest > 0 {
        let upper_bound = 1.0 - la.abs_diff(lb) as f64 / longest as f64;
        if upper_bound < threshold {
            return false;
        }
    }
    similarity(a, b, max_chars) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
        assert_eq!(levenshtein(&chars("same"), &chars("same")), 0);
    }

    #[test]
    fn test_similarity_range() {
        assert_eq!(similarity("abc", "abc", 100), 1.0);
        assert_eq!(similarity("abc", "xyz", 100), 0.0);
        let s = similarity(r#"{"x":1}"#, r#"{"x":2}"#, 100);
        assert!((s - (1.0 - 1.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_prefix_never_reaches_one() {
        let a = format!("{}a", "x".repeat(10));
        let b = format!("{}b", "x".repeat(10));
        let s = similarity(&a, &b, 5);
        assert!(s < 1.0);
        assert!(s > 0.9);
    }

    #[test]
    fn test_is_similar_length_bound() {
        assert!(!is_similar("a", "aaaaaaaaaa", 0.5, 100));
        assert!(is_similar("aaaaaaaaab", "aaaaaaaaaa", 0.8, 100));
        assert!(!is_similar("aaaaaaaaab", "aaaaaaaaaa", 1.0, 100));
    }
}
