//! Output format value object

use serde::{Deserialize, Serialize};

/// How a consensus result is rendered for the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the winning payload (default)
    #[default]
    Answer,
    /// Payload plus agreement, strategy and explanation
    Full,
    /// The whole result as JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "answer" | "payload" => Ok(OutputFormat::Answer),
            "full" | "verbose" => Ok(OutputFormat::Full),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unknown output format: {}. Valid: answer, full, json",
                other
            )),
        }
    }
}
