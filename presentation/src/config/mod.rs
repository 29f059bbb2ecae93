//! Presentation-level configuration
//!
//! Resolved output settings after merging CLI flags over the config file.

use quorum_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// CLI values win over file values; `quiet` always hides progress.
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        show_progress: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or_default();
        Self {
            format,
            color,
            // progress never interleaves with JSON output
            show_progress: show_progress && !quiet && format != OutputFormat::Json,
        }
    }
}
