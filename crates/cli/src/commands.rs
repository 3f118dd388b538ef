//! Command implementations.

use crate::config::{CapArgs, RingArgs};
use anyhow::Context;
use cap::{
    CapSimulator, ClusterNode, OperationResult, SimulatorConfig, TokioScheduler, TracingNotifier,
};
use clap::Subcommand;
use corelib::{movement, ownership, Distribution, KeyMove, Ownership, RingCache, RingPosition};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a hash ring and distribute keys over it.
    Ring(RingArgs),
    /// Run reads and writes through the CAP simulator.
    Cap(CapArgs),
}

/// Rendered output of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
}

impl Command {
    pub fn execute(self, json: bool) -> anyhow::Result<CommandResult> {
        self.execute_with(&RingCache::new(), json)
    }

    /// Runs the command, reusing rings already built in `rings`.
    pub fn execute_with(self, rings: &RingCache, json: bool) -> anyhow::Result<CommandResult> {
        let output = match self {
            Command::Ring(args) => {
                let report = ring_report(&args, rings)?;
                if json {
                    serde_json::to_string_pretty(&report)? + "\n"
                } else {
                    report.render()
                }
            }
            Command::Cap(args) => {
                let report = cap_report(&args)?;
                if json {
                    serde_json::to_string_pretty(&report)? + "\n"
                } else {
                    report.render()
                }
            }
        };
        Ok(CommandResult { output })
    }
}

// ============================================================================
// ring
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RingReport {
    pub positions: Vec<RingPosition>,
    pub ownership: Vec<Ownership>,
    pub distribution: Distribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinReport>,
}

#[derive(Debug, Serialize)]
pub struct JoinReport {
    pub node: String,
    pub moves: Vec<KeyMove>,
}

pub fn ring_report(args: &RingArgs, rings: &RingCache) -> anyhow::Result<RingReport> {
    let ring = rings.get(&args.nodes, args.vnodes).context("building ring")?;
    let distribution = ring.distribute(&args.keys).context("distributing keys")?;

    let join = match &args.join {
        Some(node) => {
            let after = ring
                .with_node(node.clone())
                .with_context(|| format!("adding {node:?} to the ring"))?;
            Some(JoinReport {
                node: node.clone(),
                moves: movement(ring.as_ref(), &after, &args.keys)?,
            })
        }
        None => None,
    };

    Ok(RingReport {
        positions: ring.positions().to_vec(),
        ownership: ownership(ring.as_ref()),
        distribution,
        join,
    })
}

impl RingReport {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Ring ({} positions)", self.positions.len());
        for pos in &self.positions {
            let _ = writeln!(out, "  {pos}");
        }

        let _ = writeln!(out, "\nOwnership");
        for share in &self.ownership {
            let _ = writeln!(
                out,
                "  {:<16} {:>3}° {:>5.1}%",
                share.node,
                share.degrees,
                share.fraction() * 100.0
            );
        }

        let _ = writeln!(out, "\nKeys");
        for entry in self.distribution.iter() {
            let _ = writeln!(out, "  {:<16} [{}]", entry.node, entry.keys.join(", "));
        }

        if let Some(join) = &self.join {
            let _ = writeln!(out, "\nIf {} joins", join.node);
            if join.moves.is_empty() {
                let _ = writeln!(out, "  no keys move");
            }
            for m in &join.moves {
                let _ = writeln!(out, "  {} : {} -> {}", m.key, m.from, m.to);
            }
        }
        out
    }
}

// ============================================================================
// cap
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CapReport {
    pub results: Vec<OperationResult>,
    pub nodes: Vec<ClusterNode>,
    pub log: Vec<String>,
}

/// Replays the requested operations in real time on a Tokio runtime.
pub fn cap_report(args: &CapArgs) -> anyhow::Result<CapReport> {
    let config = SimulatorConfig {
        mode: args.mode,
        node_count: args.nodes,
        consistency: args.consistency,
        latency: args.latency,
        base_delay_ms: args.base_delay_ms,
        ..Default::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;

    runtime.block_on(async {
        let (scheduler, mut timers) = TokioScheduler::new();
        let mut sim: CapSimulator<TokioScheduler, TracingNotifier> =
            CapSimulator::new(config, scheduler)?;
        sim.set_partition(args.partition)?;

        let mut results = Vec::with_capacity(args.operations.len());
        for &kind in &args.operations {
            sim.request_operation(kind)?;
            let result = loop {
                let timer = timers
                    .recv()
                    .await
                    .context("scheduler stopped before the operation finished")?;
                debug!(%timer, "timer fired");
                if let Some(result) = sim.on_timer(timer) {
                    break result;
                }
            };
            results.push(result);
        }

        Ok::<_, anyhow::Error>(CapReport {
            results,
            nodes: sim.cluster_nodes(),
            log: sim.log(),
        })
    })
}

impl CapReport {
    fn render(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let status = match result.outcome {
                cap::Outcome::Success => "ok".to_string(),
                cap::Outcome::Failure(reason) => format!("failed ({reason})"),
            };
            let _ = writeln!(out, "{}: {status}", result.kind.label());
            if let Some(warning) = &result.warning {
                let _ = writeln!(out, "  warning: {warning}");
            }
        }

        let _ = writeln!(out, "\nNodes");
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "  Node {} {:<14} {:<12} value={}",
                node.id,
                node.region,
                format!("{:?}", node.status).to_lowercase(),
                node.value
            );
        }

        let _ = writeln!(out, "\nLog");
        for line in &self.log {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap::{ConsistencyLevel, Mode, OperationKind, RequestLatency};

    fn ring_args() -> RingArgs {
        RingArgs {
            nodes: vec!["Node A".into(), "Node B".into(), "Node C".into()],
            vnodes: 3,
            keys: vec!["user:1".into(), "cart:789".into(), "hello".into()],
            join: None,
        }
    }

    fn cap_args(mode: Mode, partition: bool, operations: Vec<OperationKind>) -> CapArgs {
        CapArgs {
            mode,
            nodes: 5,
            consistency: ConsistencyLevel::Strong,
            latency: RequestLatency::Low,
            partition,
            base_delay_ms: 0,
            operations,
        }
    }

    #[test]
    fn test_ring_report() {
        let report = ring_report(&ring_args(), &RingCache::new()).unwrap();
        assert_eq!(report.positions.len(), 12);
        assert_eq!(report.distribution.get("Node A").unwrap(), &["hello".to_string()]);
        assert_eq!(report.distribution.get("Node B").unwrap(), &["cart:789".to_string()]);
        assert_eq!(report.distribution.get("Node C").unwrap(), &["user:1".to_string()]);

        let text = report.render();
        assert!(text.contains("Ring (12 positions)"));
        assert!(text.contains("[cart:789]"));
    }

    #[test]
    fn test_ring_report_reuses_cached_ring() {
        let args = ring_args();
        let rings = RingCache::new();
        let cached = rings.get(&args.nodes, args.vnodes).unwrap();

        let report = ring_report(&args, &rings).unwrap();
        assert_eq!(report.positions, cached.positions());
        let again = rings.get(&args.nodes, args.vnodes).unwrap();
        assert!(std::sync::Arc::ptr_eq(&cached, &again));

        let output = Command::Ring(args).execute_with(&rings, false).unwrap().output;
        assert!(output.contains("Ring (12 positions)"));
    }

    #[test]
    fn test_ring_report_join() {
        let mut args = ring_args();
        args.join = Some("Node D".into());
        let report = ring_report(&args, &RingCache::new()).unwrap();
        let join = report.join.unwrap();
        assert!(join.moves.iter().all(|m| m.to == "Node D"));
    }

    #[test]
    fn test_ring_rejects_duplicates() {
        let mut args = ring_args();
        args.nodes.push("Node A".into());
        let err = ring_report(&args, &RingCache::new()).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate node name"));
    }

    #[test]
    fn test_ring_json() {
        let result = Command::Ring(ring_args()).execute(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(value["positions"].as_array().unwrap().len(), 12);
        assert_eq!(value["distribution"][1]["node"], "Node B");
    }

    #[test]
    fn test_cap_report_runs_operations_in_order() {
        let args = cap_args(Mode::AP, true, vec![OperationKind::Read, OperationKind::Write]);
        let report = cap_report(&args).unwrap();
        assert_eq!(report.results.len(), 2);
        assert!(report.results.iter().all(|r| r.outcome.is_success()));
        assert!(report.results[0].warning.is_none());
        assert!(report.results[1].warning.is_some());
        assert!(report.render().contains("WRITE: ok"));
    }

    #[test]
    fn test_cap_report_failure() {
        let report = cap_report(&cap_args(Mode::CA, true, vec![OperationKind::Write])).unwrap();
        assert!(!report.results[0].outcome.is_success());
        assert!(report.render().contains("failed (not partition tolerant)"));
    }

    #[test]
    fn test_cap_rejects_bad_node_count() {
        let mut args = cap_args(Mode::CP, false, vec![OperationKind::Read]);
        args.nodes = 4;
        assert!(cap_report(&args).is_err());
    }
}
