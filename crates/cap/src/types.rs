//! Vocabulary types for the CAP simulator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which two of consistency, availability and partition tolerance a system keeps.
///
/// - **CP**: refuses requests it cannot serve consistently (HBase, MongoDB, Redis)
/// - **AP**: serves every request from whatever nodes it can reach (Cassandra, DynamoDB)
/// - **CA**: consistent and available only while the network is whole (single-node RDBMS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    CP,
    AP,
    CA,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::CP => "CP",
            Mode::AP => "AP",
            Mode::CA => "CA",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cp" => Ok(Mode::CP),
            "ap" => Ok(Mode::AP),
            "ca" => Ok(Mode::CA),
            other => Err(format!("unknown mode {other:?} (expected cp, ap or ca)")),
        }
    }
}

/// How many replicas must take part before a CP operation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyLevel {
    /// Every node.
    Strong,
    /// A majority, `ceil(n / 2)`.
    Quorum,
    /// Any reachable node; replicas converge later.
    Eventual,
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConsistencyLevel::Strong => "strong",
            ConsistencyLevel::Quorum => "quorum",
            ConsistencyLevel::Eventual => "eventual",
        })
    }
}

impl FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strong" => Ok(ConsistencyLevel::Strong),
            "quorum" => Ok(ConsistencyLevel::Quorum),
            "eventual" => Ok(ConsistencyLevel::Eventual),
            other => Err(format!(
                "unknown consistency level {other:?} (expected strong, quorum or eventual)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Read,
    Write,
}

impl OperationKind {
    /// Upper-case label used in the trace, e.g. `WRITE`.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Read => "READ",
            OperationKind::Write => "WRITE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Read => "read",
            OperationKind::Write => "write",
        })
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(OperationKind::Read),
            "write" => Ok(OperationKind::Write),
            other => Err(format!("unknown operation {other:?} (expected read or write)")),
        }
    }
}

/// Simulated network latency, scaling the commit delay by 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestLatency {
    #[default]
    Low,
    Medium,
    High,
}

impl RequestLatency {
    pub fn multiplier(self) -> u32 {
        match self {
            RequestLatency::Low => 0,
            RequestLatency::Medium => 1,
            RequestLatency::High => 2,
        }
    }
}

impl FromStr for RequestLatency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "0" => Ok(RequestLatency::Low),
            "medium" | "1" => Ok(RequestLatency::Medium),
            "high" | "2" => Ok(RequestLatency::High),
            other => Err(format!("unknown latency {other:?} (expected low, medium or high)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Healthy,
    Disconnected,
}

/// One replica in the simulated cluster, derived from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNode {
    /// 1-based node number.
    pub id: usize,
    pub region: String,
    pub status: NodeStatus,
    pub value: i64,
}

/// Why a simulated operation failed. A designed outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// CA mode met a partition.
    NotPartitionTolerant,
    /// CP mode could not reach enough replicas for the consistency level.
    ConsistencyLevelUnmet,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureReason::NotPartitionTolerant => "not partition tolerant",
            FailureReason::ConsistencyLevelUnmet => "consistency level unmet",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure(FailureReason),
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Result event emitted when an operation reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub kind: OperationKind,
    pub outcome: Outcome,
    /// Set when the operation succeeded but data may have diverged.
    pub warning: Option<String>,
    /// Trace lines appended while this operation ran, oldest first.
    pub log_lines: Vec<String>,
}
