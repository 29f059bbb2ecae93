//! Output formatter trait

use quorum_application::ConsensusAnswer;
use quorum_domain::OutputFormat;
use std::collections::BTreeMap;

/// Trait for formatting consensus answers
pub trait OutputFormatter {
    /// Only the agreed payload
    fn format_answer(&self, answer: &ConsensusAnswer) -> String;

    /// Payload with agreement details
    fn format_full(&self, question: &str, answer: &ConsensusAnswer) -> String;

    /// Format as JSON
    fn format_json(&self, answer: &ConsensusAnswer) -> String;

    /// Several answers keyed by question id
    fn format_batch(
        &self,
        questions: &BTreeMap<String, String>,
        answers: &BTreeMap<String, ConsensusAnswer>,
        format: OutputFormat,
    ) -> String;

    fn render(&self, format: OutputFormat, question: &str, answer: &ConsensusAnswer) -> String {
        match format {
            OutputFormat::Answer => self.format_answer(answer),
            OutputFormat::Full => self.format_full(question, answer),
            OutputFormat::Json => self.format_json(answer),
        }
    }
}
