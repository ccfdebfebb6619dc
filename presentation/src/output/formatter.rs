//! Output formatter trait

use crate::output::console::ConsoleFormatter;
use crate::output::json::JsonFormatter;
use paxos_domain::{BroadcastReport, OutputFormat, ProposalReport, StateReport};

/// Trait for rendering command reports
pub trait OutputFormatter {
    /// Format the trace and verdict of a proposal run
    fn format_proposal(&self, report: &ProposalReport) -> String;

    /// Format the responses of a single-phase broadcast
    fn format_broadcast(&self, report: &BroadcastReport) -> String;

    /// Format the acceptor states of the pool
    fn format_state(&self, report: &StateReport) -> String;
}

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
