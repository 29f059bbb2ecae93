//! Console output formatter for consensus results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use quorum_application::{ConsensusAnswer, UsageSnapshot};
use quorum_domain::OutputFormat;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Formats consensus answers for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The payload alone: strings print raw, everything else as pretty JSON
    pub fn format_answer(answer: &ConsensusAnswer) -> String {
        Self::payload_text(answer.result.winning_payload())
    }

    /// The payload together with how agreement was reached
    pub fn format_full(question: &str, answer: &ConsensusAnswer) -> String {
        let result = &answer.result;
        let mut output = String::new();

        output.push_str(&Self::header("Consensus"));
        output.push('\n');
        output.push_str(&format!("{} {}\n\n", "Q:".cyan().bold(), question));
        output.push_str(&Self::payload_text(result.winning_payload()));
        output.push('\n');

        output.push_str(&Self::section_header("Agreement"));
        output.push_str(&format!(
            "{} {:.1}% ({}/{} agreeing, {}/{} answered)\n",
            "Agreement:".cyan().bold(),
            result.agreement_percent(),
            result.agreeing_count(),
            result.success_count(),
            result.success_count(),
            result.participant_count()
        ));
        let strategy = result
            .strategy_used()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        output.push_str(&format!("{} {}\n", "Strategy:".cyan().bold(), strategy));
        output.push_str(&format!(
            "{} {}\n",
            "Winner:".cyan().bold(),
            result.winning_provider()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Explanation:".cyan().bold(),
            result.explanation()
        ));

        if !result.cluster_shares().is_empty() {
            let shares: Vec<String> = result
                .cluster_shares()
                .iter()
                .map(|s| format!("{:.1}%", s))
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Clusters:".cyan().bold(),
                shares.join(" / ")
            ));
        }

        if !result.ranking().is_empty() {
            output.push_str(&format!("{}\n", "Ranking:".cyan().bold()));
            for (place, entry) in result.ranking().iter().enumerate() {
                output.push_str(&format!(
                    "  #{} response {} score {:.3}\n",
                    place + 1,
                    entry.index,
                    entry.score
                ));
            }
        }

        if let Some(decision) = &answer.decision {
            output.push_str(&format!(
                "{} {} via profile '{}' ({})\n",
                "Tier:".cyan().bold(),
                decision.tier,
                decision.profile_name,
                decision.reason
            ));
        }

        let mut flags = Vec::new();
        if answer.from_cache {
            flags.push("served from cache".green().to_string());
        }
        if answer.escalated {
            flags.push("escalated to expensive tier".yellow().to_string());
        }
        if !flags.is_empty() {
            output.push_str(&format!("{}\n", flags.join(", ")));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(answer: &ConsensusAnswer) -> String {
        serde_json::to_string_pretty(&Self::answer_value(answer))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Several answers, in question-id order
    pub fn format_batch(
        questions: &BTreeMap<String, String>,
        answers: &BTreeMap<String, ConsensusAnswer>,
        format: OutputFormat,
    ) -> String {
        if format == OutputFormat::Json {
            let map: serde_json::Map<String, Value> = answers
                .iter()
                .map(|(id, answer)| (id.clone(), Self::answer_value(answer)))
                .collect();
            return serde_json::to_string_pretty(&Value::Object(map))
                .unwrap_or_else(|_| "{}".to_string());
        }

        let mut output = String::new();
        for (id, question) in questions {
            let Some(answer) = answers.get(id) else {
                continue;
            };
            match format {
                OutputFormat::Full => output.push_str(&Self::format_full(question, answer)),
                _ => {
                    output.push_str(&format!("{} {}\n", format!("[{}]", id).bold(), question));
                    output.push_str(&Self::indent(&Self::format_answer(answer), "  "));
                    output.push_str("\n\n");
                }
            }
        }
        output.trim_end().to_string()
    }

    /// Usage and cost summary
    pub fn format_usage(snapshot: &UsageSnapshot) -> String {
        let mut output = Self::section_header("Usage");
        output.push_str(&format!(
            "{} {}\n",
            "Since:".dimmed(),
            snapshot.since.to_rfc3339()
        ));

        for (name, usage) in &snapshot.providers {
            output.push_str(&format!(
                "  {:<36} {:>3} calls  {:>3} ok  {:>3} failed  avg {:>6}ms  cost {:.3}\n",
                name,
                usage.calls,
                usage.successes,
                usage.failures,
                usage.average_elapsed_ms(),
                usage.estimated_cost
            ));
        }

        output.push_str(&format!(
            "Cache: {} hits, {} misses\n",
            snapshot.cache_hits, snapshot.cache_misses
        ));
        output.push_str(&format!(
            "Consensus: {} reached, mean agreement {:.1}%\n",
            snapshot.consensus_count,
            snapshot.mean_agreement * 100.0
        ));
        output.push_str(&format!(
            "{} {:.3} units\n",
            "Estimated cost:".bold(),
            snapshot.total_estimated_cost
        ));
        output
    }

    fn answer_value(answer: &ConsensusAnswer) -> Value {
        json!({
            "result": &*answer.result,
            "from_cache": answer.from_cache,
            "escalated": answer.escalated,
            "decision": answer.decision,
        })
    }

    fn payload_text(payload: &Value) -> String {
        match payload {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_answer(&self, answer: &ConsensusAnswer) -> String {
        Self::format_answer(answer)
    }

    fn format_full(&self, question: &str, answer: &ConsensusAnswer) -> String {
        Self::format_full(question, answer)
    }

    fn format_json(&self, answer: &ConsensusAnswer) -> String {
        Self::format_json(answer)
    }

    fn format_batch(
        &self,
        questions: &BTreeMap<String, String>,
        answers: &BTreeMap<String, ConsensusAnswer>,
        format: OutputFormat,
    ) -> String {
        Self::format_batch(questions, answers, format)
    }
}
