//! CLI entrypoint for Paxos Proposer
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use paxos_application::{
    BehaviorConfig, BroadcastInput, BroadcastMessage, BroadcastUseCase, NoProgress,
    ProgressNotifier, QueryStateUseCase, RunProposalInput, RunProposalUseCase,
};
use paxos_domain::{PeerPool, Verdict};
use paxos_infrastructure::{ConfigLoader, FileConfig, HttpAcceptorGateway, PeerAddressing};
use paxos_presentation::{
    Cli, Command, ContactArgs, OutputConfig, ProgressReporter, SimpleProgress, formatter_for,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when the proposal ran but no value was chosen
const EXIT_NO_QUORUM: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = &cli.command else {
        bail!("A command is required: propose, prepare, accept, or state (see --help)");
    };

    info!("Starting Paxos Proposer");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_transport_overrides(&mut config, &cli);

    let pool_size = command.pool_size().or(config.cluster.pool_size);
    let issues = config.validate_for_pool(pool_size);
    if !issues.is_empty() {
        let messages: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
        bail!("Invalid configuration:\n  {}", messages.join("\n  "));
    }

    let output = OutputConfig {
        format: config.output.format.unwrap_or_default(),
        color: config.output.color,
        show_progress: config.output.show_progress,
        progress_bars: true,
    }
    .with_overrides(cli.output.map(Into::into), cli.quiet, cli.no_color);
    output.apply_color();

    // === Dependency Injection ===
    let timeout = Duration::from_millis(config.transport.timeout_ms);
    let gateway = Arc::new(
        HttpAcceptorGateway::new(PeerAddressing::from_config(&config.transport), timeout)
            .context("Failed to create acceptor gateway")?,
    );
    let behavior = BehaviorConfig::with_timeout_millis(config.transport.timeout_ms);

    let progress: Box<dyn ProgressNotifier> = if !output.show_progress {
        Box::new(NoProgress)
    } else if output.progress_bars {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };
    let formatter = formatter_for(output.format);

    match command {
        Command::Propose(args) => {
            let pool = required_pool(pool_size)?;
            let input = RunProposalInput::new(pool, args.id, args.value.clone())
                .with_contact(args.contact.plan(&pool));

            let use_case = RunProposalUseCase::new(gateway).with_behavior(behavior);
            let report = match use_case.execute_with_progress(input, progress.as_ref()).await {
                Ok(report) => report,
                Err(err) => {
                    // Show what the acceptors said before the run was aborted
                    if let Some(report) = err.report() {
                        println!("{}", formatter.format_proposal(report));
                    }
                    return Err(err.into());
                }
            };

            println!("{}", formatter.format_proposal(&report));

            if let Some(Verdict::ConsensusReached { .. }) = report.verdict {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("Proposal {} did not reach a quorum", report.proposal_id);
                Ok(ExitCode::from(EXIT_NO_QUORUM))
            }
        }
        Command::Prepare(args) => {
            let input = broadcast_input(pool_size, &args.contact, args.id, BroadcastMessage::Prepare)?;
            let use_case = BroadcastUseCase::new(gateway).with_behavior(behavior);
            let report = use_case
                .execute_with_progress(input, progress.as_ref())
                .await?;

            println!("{}", formatter.format_broadcast(&report));
            Ok(ExitCode::SUCCESS)
        }
        Command::Accept(args) => {
            let message = BroadcastMessage::Accept {
                value: args.value.clone(),
            };
            let input = broadcast_input(pool_size, &args.contact, args.id, message)?;
            let use_case = BroadcastUseCase::new(gateway).with_behavior(behavior);
            let report = use_case
                .execute_with_progress(input, progress.as_ref())
                .await?;

            println!("{}", formatter.format_broadcast(&report));
            Ok(ExitCode::SUCCESS)
        }
        Command::State(_) => {
            let pool = required_pool(pool_size)?;
            let use_case = QueryStateUseCase::new(gateway).with_behavior(behavior);
            let report = use_case.execute(pool).await;

            println!("{}", formatter.format_state(&report));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Command-line transport flags take precedence over every config source
fn apply_transport_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.transport.host = host.clone();
    }
    if let Some(port) = cli.base_port {
        config.transport.base_port = port;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.transport.timeout_ms = timeout_ms;
    }
}

fn required_pool(pool_size: Option<usize>) -> Result<PeerPool> {
    let size = pool_size.context("Pool size is required: pass -n or set [cluster].pool_size")?;
    Ok(PeerPool::new(size)?)
}

/// Single-phase sends may omit the pool size when peers are listed explicitly
fn broadcast_input(
    pool_size: Option<usize>,
    contact: &ContactArgs,
    id: u64,
    message: BroadcastMessage,
) -> Result<BroadcastInput> {
    if contact.peers.is_empty() {
        let pool = required_pool(pool_size)?;
        Ok(BroadcastInput::new(pool, contact.plan(&pool), id, message))
    } else {
        let pool = pool_size.map(PeerPool::new).transpose()?;
        Ok(BroadcastInput::to_peers(pool, contact.peer_ids(), id, message)?)
    }
}
