//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text posed to every provider of a profile.
///
/// Never blank. The cache derives its lookup key from [`Question::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Question {
    content: String,
}

impl Question {
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question is empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Lower-cased content with whitespace runs collapsed to one space.
    pub fn normalized(&self) -> String {
        self.content
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Question {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Question {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Question> for String {
    fn from(q: Question) -> Self {
        q.content
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_rejected() {
        for blank in ["", "   ", "\n\t"] {
            assert!(matches!(
                Question::parse(blank),
                Err(DomainError::InvalidQuestion(_))
            ));
        }
    }

    #[test]
    fn test_content_is_kept_verbatim() {
        let q: Question = "  Is 7 prime? ".parse().unwrap();
        assert_eq!(q.content(), "  Is 7 prime? ");
        assert_eq!(q.to_string(), "  Is 7 prime? ");
    }

    #[test]
    fn test_normalized_collapses_case_and_whitespace() {
        let a = Question::parse("  What   is\tRust? ").unwrap();
        let b = Question::parse("what is rust?").unwrap();
        assert_eq!(a.normalized(), "what is rust?");
        assert_eq!(a.normalized(), b.normalized());
    }

    #[test]
    fn test_serde_rejects_blank() {
        let q: Question = serde_json::from_str("\"Why?\"").unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"Why?\"");
        assert!(serde_json::from_str::<Question>("\" \"").is_err());
    }
}
