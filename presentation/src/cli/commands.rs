//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use paxos_domain::{ContactPlan, PeerId, PeerPool};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable trace and verdict
    Text,
    /// JSON report
    Json,
}

impl From<OutputFormat> for paxos_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => paxos_domain::OutputFormat::Text,
            OutputFormat::Json => paxos_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for paxos-proposer
#[derive(Parser, Debug)]
#[command(name = "paxos-proposer")]
#[command(author, version, about = "Single-decree Paxos proposer for a pool of HTTP acceptors")]
#[command(long_about = r#"
Paxos Proposer drives one proposal against a pool of acceptors.

A proposal runs two phases:
1. Prepare: ask acceptors to promise; adopt the highest previously accepted value
2. Accept: ask the peers that promised to accept the chosen value

A value is chosen once a majority of the whole pool (n/2 + 1) accepts it.
Peer p is reached at http://localhost:(8081 + p - 1) by default.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./paxos.toml        Project-level config
3. ~/.config/paxos-proposer/config.toml   Global config
4. PAXOS_* environment variables (e.g. PAXOS_TRANSPORT__BASE_PORT=9000)

Example:
  paxos-proposer propose -n 5 --id 12 hello
  paxos-proposer propose -n 5 -k 3 --id 13 world
  paxos-proposer prepare --id 14 --peers 1,2,3
  paxos-proposer state -n 5
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output].format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Acceptor host (overrides [transport].host)
    #[arg(long, value_name = "HOST", global = true)]
    pub host: Option<String>,

    /// Port of peer 1 (overrides [transport].base_port)
    #[arg(long, value_name = "PORT", global = true)]
    pub base_port: Option<u16>,

    /// Per-request timeout in milliseconds (overrides [transport].timeout_ms)
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full proposal: Prepare, then Accept to the peers that promised
    Propose(ProposeArgs),
    /// Send only a Prepare request and print the responses
    Prepare(PrepareArgs),
    /// Send only an Accept request and print the responses
    Accept(AcceptArgs),
    /// Show each acceptor's promised and accepted state
    State(StateArgs),
}

/// Which peers a command contacts
#[derive(Args, Debug, Clone, Default)]
pub struct ContactArgs {
    /// Contact this many randomly chosen peers instead of the whole pool
    #[arg(short = 'k', long, value_name = "K", conflicts_with = "peers")]
    pub contact_count: Option<usize>,

    /// Contact exactly these peers (comma separated ids)
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub peers: Vec<usize>,
}

impl ContactArgs {
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.iter().copied().map(PeerId::new).collect()
    }

    /// Contact plan for `pool`
    pub fn plan(&self, pool: &PeerPool) -> ContactPlan {
        if !self.peers.is_empty() {
            ContactPlan::Explicit(self.peer_ids())
        } else if let Some(count) = self.contact_count {
            ContactPlan::from_count(count, pool)
        } else {
            ContactPlan::All
        }
    }
}

#[derive(Args, Debug)]
pub struct ProposeArgs {
    /// Number of acceptors in the pool (overrides [cluster].pool_size)
    #[arg(short = 'n', long, value_name = "N")]
    pub pool_size: Option<usize>,

    /// Proposal id
    #[arg(long)]
    pub id: u64,

    /// Value to propose
    pub value: String,

    #[command(flatten)]
    pub contact: ContactArgs,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Number of acceptors in the pool; inferred from --peers when omitted
    #[arg(short = 'n', long, value_name = "N")]
    pub pool_size: Option<usize>,

    /// Proposal id
    #[arg(long)]
    pub id: u64,

    #[command(flatten)]
    pub contact: ContactArgs,
}

#[derive(Args, Debug)]
pub struct AcceptArgs {
    /// Number of acceptors in the pool; inferred from --peers when omitted
    #[arg(short = 'n', long, value_name = "N")]
    pub pool_size: Option<usize>,

    /// Proposal id
    #[arg(long)]
    pub id: u64,

    /// Value to ask acceptors to accept
    pub value: String,

    #[command(flatten)]
    pub contact: ContactArgs,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Number of acceptors in the pool (overrides [cluster].pool_size)
    #[arg(short = 'n', long, value_name = "N")]
    pub pool_size: Option<usize>,
}

impl Command {
    /// Pool size given on the command line, if any
    pub fn pool_size(&self) -> Option<usize> {
        match self {
            Command::Propose(args) => args.pool_size,
            Command::Prepare(args) => args.pool_size,
            Command::Accept(args) => args.pool_size,
            Command::State(args) => args.pool_size,
        }
    }
}
