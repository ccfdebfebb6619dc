//! Console output formatter for proposer reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use paxos_domain::{
    AcceptResponse, BroadcastReport, PeerId, PrepareResponse, ProposalReport, ResponseSet,
    StateReport, Verdict,
};

/// Formats reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete proposal trace
    pub fn format(report: &ProposalReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Paxos Proposal"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Proposal id:".cyan().bold(),
            report.proposal_id
        ));
        output.push_str(&format!(
            "{} {} acceptors (majority {})\n",
            "Pool:".cyan().bold(),
            report.pool_size,
            report.majority
        ));
        output.push_str(&format!(
            "{} \"{}\"\n",
            "Proposed value:".cyan().bold(),
            report.proposed_value
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Contacted:".cyan().bold(),
            Self::peer_list(&report.contacted)
        ));

        // Phase 1
        output.push_str(&Self::section_header("Phase 1: Prepare"));
        output.push_str(&Self::prepare_lines(&report.prepare));

        if let Some(chosen) = &report.chosen {
            match &chosen.overridden_by {
                Some(accepted) => output.push_str(&format!(
                    "\n{} \"{}\" (adopted from accepted proposal {})\n",
                    "Value:".yellow().bold(),
                    chosen.value,
                    accepted.id
                )),
                None => output.push_str(&format!(
                    "\n{} \"{}\"\n",
                    "Value:".bold(),
                    chosen.value
                )),
            }
        }

        // Phase 2 (if it ran)
        if let Some(accept) = &report.accept {
            output.push_str(&Self::section_header("Phase 2: Accept"));
            output.push_str(&Self::accept_lines(accept));
        }

        output.push('\n');
        output.push_str(&Self::verdict_line(report.verdict.as_ref()));
        output.push_str(&format!("{} {}\n", "State:".dimmed(), report.state));
        output.push_str(&Self::footer());

        output
    }

    /// Format a single-phase broadcast
    pub fn format_broadcast(report: &BroadcastReport) -> String {
        let mut output = String::new();

        match report {
            BroadcastReport::Prepare {
                proposal_id,
                responses,
            } => {
                output.push_str(&Self::section_header(&format!(
                    "Prepare (id {})",
                    proposal_id
                )));
                output.push_str(&Self::prepare_lines(responses));
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Promised:".green().bold(),
                    Self::peer_list(&report.affirmative())
                ));
            }
            BroadcastReport::Accept {
                proposal_id,
                value,
                responses,
            } => {
                output.push_str(&Self::section_header(&format!(
                    "Accept (id {}, value \"{}\")",
                    proposal_id, value
                )));
                output.push_str(&Self::accept_lines(responses));
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Accepted:".green().bold(),
                    Self::peer_list(&report.affirmative())
                ));
            }
        }

        output
    }

    /// Format acceptor states as a table
    pub fn format_state(report: &StateReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header(&format!(
            "Acceptor state ({} of {} responding)",
            report.responded(),
            report.pool_size
        )));
        output.push_str(&format!(
            "  {:<6} {:>10} {:>10}  {}\n",
            "peer".bold(),
            "promised".bold(),
            "accepted".bold(),
            "value".bold()
        ));

        for (peer, state) in &report.states {
            match state {
                Some(state) => {
                    let promised = state
                        .promised_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let (accepted, value) = match &state.accepted {
                        Some(accepted) => (accepted.id.to_string(), format!("\"{}\"", accepted.value)),
                        None => ("-".to_string(), "-".to_string()),
                    };
                    output.push_str(&format!(
                        "  {:<6} {:>10} {:>10}  {}\n",
                        peer.to_string(),
                        promised,
                        accepted,
                        value
                    ));
                }
                None => output.push_str(&format!(
                    "  {:<6} {}\n",
                    peer.to_string(),
                    "no response".dimmed()
                )),
            }
        }

        match report.chosen() {
            Some((accepted, progress)) => output.push_str(&format!(
                "\n{} \"{}\" (proposal {}, {} acceptors)\n",
                "Chosen:".green().bold(),
                accepted.value,
                accepted.id,
                progress.achieved
            )),
            None => output.push_str(&format!(
                "\n{}\n",
                "No value is accepted by a majority of the pool".yellow()
            )),
        }

        output
    }

    fn prepare_lines(responses: &ResponseSet<PrepareResponse>) -> String {
        responses
            .iter()
            .map(|(peer, response)| {
                let text = response.to_string();
                let text = match response {
                    PrepareResponse::Promise { .. } => text.green(),
                    PrepareResponse::Ignored { .. } => text.yellow(),
                    PrepareResponse::Absent => text.red(),
                };
                format!("  {} {}\n", Self::peer_label(*peer), text)
            })
            .collect()
    }

    fn accept_lines(responses: &ResponseSet<AcceptResponse>) -> String {
        responses
            .iter()
            .map(|(peer, response)| {
                let text = response.to_string();
                let text = match response {
                    AcceptResponse::Accepted => text.green(),
                    AcceptResponse::Ignored => text.yellow(),
                    AcceptResponse::Absent => text.red(),
                };
                format!("  {} {}\n", Self::peer_label(*peer), text)
            })
            .collect()
    }

    fn verdict_line(verdict: Option<&Verdict>) -> String {
        let Some(verdict) = verdict else {
            return format!("{}\n", "Run aborted before a verdict".red().bold());
        };
        let text = verdict.to_string();
        match verdict {
            Verdict::ConsensusReached { progress, .. } => {
                format!("{} ({})\n", text.green().bold(), progress)
            }
            Verdict::NoConsensus { .. } => format!("{}\n", text.red().bold()),
            Verdict::NoPromises => format!("{}\n", text.red().bold()),
        }
    }

    fn peer_label(peer: PeerId) -> String {
        format!("peer {:<3}", peer.to_string())
    }

    fn peer_list(peers: &[PeerId]) -> String {
        if peers.is_empty() {
            return "(none)".to_string();
        }
        peers
            .iter()
            .map(|peer| peer.to_string())
            .collect::<Vec<_>>()
            .join(", ")
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
}

impl OutputFormatter for ConsoleFormatter {
    fn format_proposal(&self, report: &ProposalReport) -> String {
        Self::format(report)
    }

    fn format_broadcast(&self, report: &BroadcastReport) -> String {
        Self::format_broadcast(report)
    }

    fn format_state(&self, report: &StateReport) -> String {
        Self::format_state(report)
    }
}
