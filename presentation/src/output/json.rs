//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use paxos_domain::{BroadcastReport, ProposalReport, StateReport};
use serde::Serialize;

/// Formats reports as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_proposal(&self, report: &ProposalReport) -> String {
        Self::to_json(report)
    }

    fn format_broadcast(&self, report: &BroadcastReport) -> String {
        Self::to_json(report)
    }

    fn format_state(&self, report: &StateReport) -> String {
        Self::to_json(report)
    }
}
