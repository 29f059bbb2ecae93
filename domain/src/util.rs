//! UTF-8 safe string cutting shared by cache keys and error messages.

/// Longest prefix of `s` that fits in `max_bytes` and ends on a char boundary.
pub fn char_prefix(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten `s` to at most `max_bytes`, marking the cut with `...`.
pub fn excerpt(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    format!("{}...", char_prefix(s, max_bytes.saturating_sub(3)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_keeps_short_strings() {
        assert_eq!(char_prefix("quorum", 10), "quorum");
        assert_eq!(char_prefix("", 4), "");
        assert_eq!(char_prefix("consensus", 5), "conse");
    }

    #[test]
    fn test_prefix_backs_off_to_char_boundary() {
        // each of these is 3 bytes
        let s = "合意形成";
        assert_eq!(char_prefix(s, 4), "合");
        assert_eq!(char_prefix(s, 6), "合意");
        assert_eq!(char_prefix(s, 2), "");
    }

    #[test]
    fn test_excerpt_marks_the_cut() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("service unavailable", 10), "service...");
        assert_eq!(excerpt("合意形成", 10), "合意...");
    }
}
