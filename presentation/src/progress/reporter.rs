//! Progress reporting for proposer runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use paxos_application::ports::progress::ProgressNotifier;
use paxos_domain::{AcceptResponse, AcceptedProposal, Phase, PeerId, PrepareResponse};
use std::sync::Mutex;

/// Reports progress with one progress bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn record(&self, peer: PeerId, affirmative: bool, text: String) {
        if let Ok(guard) = self.phase_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            let status = if affirmative {
                format!("{} peer {}: {}", "v".green(), peer, text)
            } else {
                format!("{} peer {}: {}", "x".red(), peer, text)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: Phase, peers: &[PeerId]) {
        let pb = self.multi.add(ProgressBar::new(peers.len() as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name().to_string());
        pb.set_message("Waiting for acceptors...");

        if let Ok(mut guard) = self.phase_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_prepare_response(&self, peer: PeerId, response: &PrepareResponse) {
        self.record(peer, response.is_promise(), response.to_string());
    }

    fn on_accept_response(&self, peer: PeerId, response: &AcceptResponse) {
        self.record(peer, response.is_accepted(), response.to_string());
    }

    fn on_phase_complete(&self, phase: Phase) {
        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }

    fn on_value_overridden(&self, accepted: &AcceptedProposal) {
        let _ = self.multi.println(format!(
            "{} adopting value \"{}\" from accepted proposal {}",
            "!".yellow().bold(),
            accepted.value,
            accepted.id
        ));
    }
}

/// Simple text-based progress (no progress bars), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: Phase, peers: &[PeerId]) {
        eprintln!(
            "{} {} ({} peers)",
            "->".cyan(),
            phase.display_name().bold(),
            peers.len()
        );
    }

    fn on_prepare_response(&self, peer: PeerId, response: &PrepareResponse) {
        if response.is_promise() {
            eprintln!("  {} peer {}: {}", "v".green(), peer, response);
        } else {
            eprintln!("  {} peer {}: {}", "x".red(), peer, response);
        }
    }

    fn on_accept_response(&self, peer: PeerId, response: &AcceptResponse) {
        if response.is_accepted() {
            eprintln!("  {} peer {}: {}", "v".green(), peer, response);
        } else {
            eprintln!("  {} peer {}: {}", "x".red(), peer, response);
        }
    }

    fn on_phase_complete(&self, _phase: Phase) {
        eprintln!();
    }

    fn on_value_overridden(&self, accepted: &AcceptedProposal) {
        eprintln!(
            "  {} adopting value \"{}\" from accepted proposal {}",
            "!".yellow().bold(),
            accepted.value,
            accepted.id
        );
    }
}
