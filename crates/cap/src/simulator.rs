//! The CAP operation simulator.
//!
//! # State machine
//!
//! ```text
//!          request_operation            on_timer (more phases)
//!  Idle ────────────────────▶ Pending ◀──────────────────────┐
//!   ▲                           │                            │
//!   │                           └────────────────────────────┘
//!   │   on_timer (last phase)   │
//!   └───────────────────────────┘   Succeeded / Failed -> Idle
//! ```
//!
//! At most one operation is in flight. A second request, a partition toggle
//! or a latency change while Pending is rejected. Mode, consistency level and
//! node count may change at any time; doing so abandons the pending
//! operation (its timer is cancelled) and clears the trace.

use crate::cluster::{cluster_nodes, is_valid_node_count};
use crate::config::SimulatorConfig;
use crate::error::{CapError, Result};
use crate::log::TraceLog;
use crate::notifier::{Notice, Notifier, Severity, TracingNotifier};
use crate::plan::{decide, Delay, Phase, Situation};
use crate::scheduler::{Scheduler, TimerId};
use crate::types::{
    ClusterNode, ConsistencyLevel, Mode, OperationKind, OperationResult, Outcome, RequestLatency,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Current knobs of the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationState {
    pub mode: Mode,
    pub partition_active: bool,
    pub node_count: usize,
    pub consistency: ConsistencyLevel,
    pub latency: RequestLatency,
    /// Last committed value on the client's side of the network.
    pub value: i64,
}

impl SimulationState {
    fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            mode: config.mode,
            partition_active: false,
            node_count: config.node_count,
            consistency: config.consistency,
            latency: config.latency,
            value: config.initial_value,
        }
    }
}

/// An accepted request whose outcome is decided but not yet committed.
#[derive(Debug)]
struct PendingOperation {
    kind: OperationKind,
    timer: TimerId,
    phases: VecDeque<Phase>,
    outcome: Outcome,
    warning: Option<String>,
    notice: Notice,
    lines: Vec<String>,
}

/// Simulates reads and writes against a cluster under a CAP trade-off.
pub struct CapSimulator<S: Scheduler, N: Notifier = TracingNotifier> {
    config: SimulatorConfig,
    state: SimulationState,
    log: TraceLog,
    pending: Option<PendingOperation>,
    scheduler: S,
    notifier: N,
    next_timer: u64,
    /// Committed value when the current partition began.
    partition_value: i64,
}

impl<S: Scheduler> CapSimulator<S, TracingNotifier> {
    /// Creates a simulator that reports notices through `tracing`.
    pub fn new(config: SimulatorConfig, scheduler: S) -> Result<Self> {
        Self::with_notifier(config, scheduler, TracingNotifier)
    }
}

impl<S: Scheduler, N: Notifier> CapSimulator<S, N> {
    pub fn with_notifier(config: SimulatorConfig, scheduler: S, notifier: N) -> Result<Self> {
        config.validate()?;
        let state = SimulationState::from_config(&config);
        Ok(Self {
            partition_value: state.value,
            state,
            log: TraceLog::new(config.log_capacity),
            config,
            pending: None,
            scheduler,
            notifier,
            next_timer: 0,
        })
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Trace lines, oldest first.
    pub fn log(&self) -> Vec<String> {
        self.log.lines().map(str::to_string).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Kind of the operation in flight, if any.
    pub fn pending(&self) -> Option<OperationKind> {
        self.pending.as_ref().map(|p| p.kind)
    }

    pub fn cluster_nodes(&self) -> Vec<ClusterNode> {
        cluster_nodes(
            self.state.node_count,
            self.state.mode,
            self.state.partition_active,
            self.state.value,
            self.partition_value,
        )
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Accepts a read or write and schedules its first phase.
    ///
    /// The outcome is fixed here; later configuration changes cannot alter
    /// it, only abandon it.
    pub fn request_operation(&mut self, kind: OperationKind) -> Result<TimerId> {
        if let Some(current) = self.pending() {
            warn!(requested = %kind, %current, "rejecting request while another is pending");
            self.notifier.notify(Notice::new(
                "Operation in progress",
                "Please wait for the current operation to complete",
                Severity::Destructive,
            ));
            return Err(CapError::OperationInProgress(current));
        }
        if kind == OperationKind::Write && self.state.value.checked_add(1).is_none() {
            warn!(value = self.state.value, "rejecting write that would overflow the value");
            return Err(CapError::ValueOutOfRange(self.state.value));
        }

        let plan = decide(&Situation {
            mode: self.state.mode,
            partitioned: self.state.partition_active,
            node_count: self.state.node_count,
            consistency: self.state.consistency,
            kind,
            value: self.state.value,
        });

        self.log
            .retain(|line| !line.contains("READ") && !line.contains("WRITE"));
        let lines: Vec<String> = plan
            .immediate
            .iter()
            .map(|msg| self.append(msg))
            .collect();

        let phases: VecDeque<Phase> = plan.phases.into();
        let first = phases.front().map_or(Delay::Contact, |p| p.delay);
        let timer = self.schedule(first);
        info!(
            %kind,
            mode = %self.state.mode,
            partitioned = self.state.partition_active,
            nodes = self.state.node_count,
            consistency = %self.state.consistency,
            outcome = ?plan.outcome,
            "operation accepted"
        );

        self.pending = Some(PendingOperation {
            kind,
            timer,
            phases,
            outcome: plan.outcome,
            warning: plan.warning,
            notice: plan.notice,
            lines,
        });
        Ok(timer)
    }

    /// Commits the phase belonging to `id`.
    ///
    /// Returns the result when the terminal phase commits. Timers that do not
    /// belong to the pending operation (cancelled, stale or foreign) are
    /// ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Option<OperationResult> {
        let Some(mut pending) = self.pending.take() else {
            debug!(%id, "ignoring timer with no pending operation");
            return None;
        };
        if pending.timer != id {
            debug!(%id, expected = %pending.timer, "ignoring stale timer");
            self.pending = Some(pending);
            return None;
        }

        let phase = pending.phases.pop_front()?;
        for msg in &phase.lines {
            let line = self.append(msg);
            pending.lines.push(line);
        }

        if let Some(next) = pending.phases.front() {
            pending.timer = self.schedule(next.delay);
            debug!(kind = %pending.kind, timer = %pending.timer, "phase committed");
            self.pending = Some(pending);
            return None;
        }

        if pending.outcome.is_success() && pending.kind == OperationKind::Write {
            self.state.value = self.state.value.saturating_add(1);
        }
        info!(kind = %pending.kind, outcome = ?pending.outcome, "operation finished");
        self.notifier.notify(pending.notice);
        Some(OperationResult {
            kind: pending.kind,
            outcome: pending.outcome,
            warning: pending.warning,
            log_lines: pending.lines,
        })
    }

    /// Activates or resolves the network partition.
    pub fn set_partition(&mut self, active: bool) -> Result<()> {
        if self.pending.is_some() {
            warn!(active, "rejecting partition change while an operation is pending");
            self.notifier.notify(Notice::new(
                "Operation in progress",
                "Cannot change network state during an operation",
                Severity::Destructive,
            ));
            return Err(CapError::NetworkChangeDuringOperation);
        }
        if self.state.partition_active == active {
            return Ok(());
        }

        self.state.partition_active = active;
        if active {
            self.partition_value = self.state.value;
            self.log_partition();
            self.notifier.notify(Notice::new(
                "Network Partition Activated",
                "The network is now partitioned",
                Severity::Warning,
            ));
        } else {
            self.log.clear();
            self.notifier.notify(Notice::new(
                "Network Partition Resolved",
                "The network is now fully connected",
                Severity::Default,
            ));
        }
        info!(active, "network partition changed");
        Ok(())
    }

    pub fn toggle_partition(&mut self) -> Result<bool> {
        let next = !self.state.partition_active;
        self.set_partition(next)?;
        Ok(next)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.abandon_pending("mode changed");
        self.log.clear();
        self.state.mode = mode;
    }

    pub fn set_consistency_level(&mut self, level: ConsistencyLevel) {
        self.abandon_pending("consistency level changed");
        self.log.clear();
        self.state.consistency = level;
    }

    /// Resizes the cluster. `n` must be odd and within 3..=9.
    pub fn set_node_count(&mut self, n: usize) -> Result<()> {
        if !is_valid_node_count(n) {
            return Err(CapError::InvalidNodeCount(n));
        }
        self.abandon_pending("node count changed");
        self.log.clear();
        self.state.node_count = n;
        if self.state.partition_active {
            self.log_partition();
        }
        Ok(())
    }

    pub fn set_latency(&mut self, latency: RequestLatency) -> Result<()> {
        if self.pending.is_some() {
            return Err(CapError::LatencyChangeDuringOperation);
        }
        self.state.latency = latency;
        Ok(())
    }

    /// Cancels any pending commit and restores the configured initial state.
    pub fn reset(&mut self) {
        self.abandon_pending("reset");
        self.log.clear();
        self.state = SimulationState::from_config(&self.config);
        self.partition_value = self.state.value;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn append(&mut self, msg: &str) -> String {
        self.log.push(self.scheduler.now(), msg)
    }

    fn log_partition(&mut self) {
        let n = self.state.node_count;
        let cut = n / 2;
        self.append(&format!(
            "Network partition detected! Nodes 1-{cut} can't communicate with nodes {}-{n}.",
            cut + 1
        ));
    }

    fn delay(&self, delay: Delay) -> Duration {
        let base = self.config.base_delay();
        match delay {
            Delay::Contact => base,
            Delay::Commit => base * self.state.latency.multiplier(),
            Delay::FailFast => base * 2,
        }
    }

    fn schedule(&mut self, delay: Delay) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        let after = self.delay(delay);
        self.scheduler.schedule(id, after);
        id
    }

    fn abandon_pending(&mut self, why: &str) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.timer);
            debug!(kind = %pending.kind, timer = %pending.timer, why, "pending operation abandoned");
        }
    }
}

impl<S: Scheduler, N: Notifier> Drop for CapSimulator<S, N> {
    fn drop(&mut self) {
        self.abandon_pending("dropped");
    }
}
