//! Presentation-level configuration
//!
//! How reports and progress are shown, after merging file config and flags.

use paxos_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress while requests are in flight
    pub show_progress: bool,
    /// Draw progress bars rather than plain lines
    pub progress_bars: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
            progress_bars: true,
        }
    }
}

impl OutputConfig {
    /// Apply command-line overrides
    ///
    /// `--quiet` suppresses progress entirely. JSON output keeps progress on
    /// stderr but drops the bars so logs stay line-oriented.
    pub fn with_overrides(mut self, format: Option<OutputFormat>, quiet: bool, no_color: bool) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        if quiet {
            self.show_progress = false;
        }
        if no_color {
            self.color = false;
        }
        if self.format == OutputFormat::Json {
            self.progress_bars = false;
        }
        self
    }

    /// Apply the color setting to terminal output
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
