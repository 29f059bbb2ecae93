//! Request complexity and the keyword heuristic that estimates it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Words that push the estimate towards [`Complexity::Complex`]
const COMPLEX_KEYWORDS: &[&str] = &[
    "architecture",
    "concurrency",
    "distributed",
    "security",
    "vulnerability",
    "optimize",
    "performance",
    "migration",
    "refactor",
    "algorithm",
    "compliance",
    "tradeoffs",
];

/// Words that push the estimate towards [`Complexity::Simple`]
const SIMPLE_KEYWORDS: &[&str] = &[
    "format", "rename", "typo", "list", "summarize", "simple", "quick", "translate", "spell",
];

const LONG_INPUT_CHARS: usize = 2000;
const SHORT_INPUT_CHARS: usize = 200;

/// How demanding a request is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
    Critical,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
            Complexity::Critical => "critical",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "low" => Ok(Complexity::Simple),
            "medium" | "moderate" => Ok(Complexity::Medium),
            "complex" | "high" => Ok(Complexity::Complex),
            "critical" => Ok(Complexity::Critical),
            other => Err(format!(
                "unknown complexity '{}' (expected simple, medium, complex or critical)",
                other
            )),
        }
    }
}

/// Heuristic estimate with the score that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityEstimate {
    pub complexity: Complexity,
    pub score: i32,
}

/// Estimate complexity from the request text.
///
/// Each complex keyword adds one, each simple keyword subtracts one, long
/// input adds one and short input subtracts one. A score above 1 is
/// complex, below -1 simple, anything else medium. Never returns critical.
///
/// # Example
///
/// ```
/// use quorum_domain::tier::{Complexity, estimate_complexity};
///
/// let e = estimate_complexity("Quick typo fix please");
/// assert_eq!(e.complexity, Complexity::Simple);
/// ```
pub fn estimate_complexity(text: &str) -> ComplexityEstimate {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let hits = |keywords: &[&str]| {
        keywords
            .iter()
            .filter(|k| words.iter().any(|w| w.starts_with(*k)))
            .count() as i32
    };

    let mut score = hits(COMPLEX_KEYWORDS) - hits(SIMPLE_KEYWORDS);
    let chars = text.chars().count();
    if chars > LONG_INPUT_CHARS {
        score += 1;
    } else if chars < SHORT_INPUT_CHARS {
        score -= 1;
    }

    let complexity = if score > 1 {
        Complexity::Complex
    } else if score < -1 {
        Complexity::Simple
    } else {
        Complexity::Medium
    };
    ComplexityEstimate { complexity, score }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Simple".parse::<Complexity>().unwrap(), Complexity::Simple);
        assert_eq!("critical".parse::<Complexity>().unwrap(), Complexity::Critical);
        assert!("extreme".parse::<Complexity>().is_err());
    }

    #[test]
    fn test_short_plain_question_is_medium() {
        // -1 for length only
        let e = estimate_complexity("What is the capital of France?");
        assert_eq!(e.score, -1);
        assert_eq!(e.complexity, Complexity::Medium);
    }

    #[test]
    fn test_keywords_drive_complex() {
        let e = estimate_complexity(
            "Review the security architecture of this distributed service and its concurrency model",
        );
        assert_eq!(e.score, 3);
        assert_eq!(e.complexity, Complexity::Complex);
    }

    #[test]
    fn test_long_input_counts() {
        let long = "word ".repeat(500);
        assert_eq!(estimate_complexity(&long).score, 1);
    }

    #[test]
    fn test_simple_keywords() {
        let e = estimate_complexity("Rename this variable and format the file");
        assert_eq!(e.score, -3);
        assert_eq!(e.complexity, Complexity::Simple);
    }
}
