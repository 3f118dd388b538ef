//! Command-line configuration.

use crate::commands::{Command, CommandResult};
use cap::{ConsistencyLevel, Mode, OperationKind, RequestLatency};
use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(name = "distsim")]
#[command(about = "Consistent hashing and CAP theorem simulations", long_about = None)]
pub struct CliConfig {
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct RingArgs {
    /// Physical node name (repeatable).
    #[arg(long = "node", default_values_t = ["Node A".to_string(), "Node B".to_string(), "Node C".to_string()])]
    pub nodes: Vec<String>,

    /// Virtual replicas per node.
    #[arg(long, default_value_t = corelib::ring::DEFAULT_VNODES)]
    pub vnodes: usize,

    /// Key to place (repeatable).
    #[arg(
        long = "key",
        default_values_t = [
            "user:1".to_string(),
            "product:123".to_string(),
            "order:456".to_string(),
            "cart:789".to_string(),
            "session:abc".to_string(),
        ]
    )]
    pub keys: Vec<String>,

    /// Also show which keys move if this node joins.
    #[arg(long)]
    pub join: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CapArgs {
    /// Trade-off mode: cp, ap or ca.
    #[arg(long, default_value = "cp")]
    pub mode: Mode,

    /// Odd node count between 3 and 9.
    #[arg(long, default_value_t = 5)]
    pub nodes: usize,

    /// Consistency level: strong, quorum or eventual.
    #[arg(long, default_value = "strong")]
    pub consistency: ConsistencyLevel,

    /// Request latency: low, medium or high.
    #[arg(long, default_value = "low")]
    pub latency: RequestLatency,

    /// Start with the network partitioned.
    #[arg(long)]
    pub partition: bool,

    /// Base delay unit in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub base_delay_ms: u64,

    /// Operations to run in order.
    #[arg(required = true, value_name = "read|write")]
    pub operations: Vec<OperationKind>,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<CommandResult> {
        self.command.execute(self.json)
    }
}
