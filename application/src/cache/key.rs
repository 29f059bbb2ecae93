//! Cache key derivation

use quorum_domain::Question;
use quorum_domain::util::char_prefix;

/// Key under which the consensus for one question asked by one agent is stored.
///
/// `<agent>:<blake3 hex of the normalized question prefix>`. Questions that
/// differ only in case or whitespace share a key.
///
/// # Example
///
/// ```
/// use quorum_application::cache::cache_key;
/// use quorum_domain::Question;
///
/// let a = cache_key("reviewer", &Question::parse("Is  Rust safe?").unwrap(), 512);
/// let b = cache_key("reviewer", &Question::parse("is rust SAFE?").unwrap(), 512);
/// assert_eq!(a, b);
/// assert!(a.starts_with("reviewer:"));
/// ```
pub fn cache_key(agent: &str, question: &Question, prefix_bytes: usize) -> String {
    let normalized = question.normalized();
    let prefix = char_prefix(&normalized, prefix_bytes);
    format!("{}:{}", agent, blake3::hash(prefix.as_bytes()).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_is_part_of_key() {
        let q = Question::parse("What is a quorum?").unwrap();
        assert_ne!(cache_key("planner", &q, 512), cache_key("reviewer", &q, 512));
    }

    #[test]
    fn test_only_prefix_counts() {
        let a = Question::parse(format!("{} tail one", "x".repeat(600))).unwrap();
        let b = Question::parse(format!("{} tail two", "x".repeat(600))).unwrap();
        assert_eq!(cache_key("a", &a, 512), cache_key("a", &b, 512));
        assert_ne!(cache_key("a", &a, 1024), cache_key("a", &b, 1024));
    }

    #[test]
    fn test_key_shape() {
        let key = cache_key("agent", &Question::parse("q").unwrap(), 512);
        let (agent, hash) = key.split_once(':').unwrap();
        assert_eq!(agent, "agent");
        assert_eq!(hash.len(), 64);
    }
}
