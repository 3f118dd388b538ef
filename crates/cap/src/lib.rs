//! CAP theorem operation simulator.
//!
//! This crate simulates what happens to a read or write against a small
//! replicated cluster under each CAP trade-off:
//! - Mode, partition and consistency level decide success or failure
//! - Latency is an injected scheduler effect, never a blocking sleep
//! - Every step appends to a bounded, timestamped trace
//!
//! ```rust
//! use cap::{CapSimulator, ManualScheduler, Mode, OperationKind, SimulatorConfig};
//!
//! let mut sim = CapSimulator::new(SimulatorConfig::default(), ManualScheduler::new())?;
//! sim.set_mode(Mode::CA);
//! sim.set_partition(true)?;
//! sim.request_operation(OperationKind::Read)?;
//!
//! let timer = sim.scheduler_mut().fire_next().unwrap();
//! let result = sim.on_timer(timer).unwrap();
//! assert!(!result.outcome.is_success());
//! # Ok::<(), cap::CapError>(())
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod log;
pub mod notifier;
pub mod plan;
pub mod scheduler;
pub mod simulator;
pub mod types;

pub use config::SimulatorConfig;
pub use error::{CapError, Result};
pub use notifier::{Notice, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use scheduler::{ManualScheduler, Scheduler, TimerId, TokioScheduler};
pub use simulator::{CapSimulator, SimulationState};
pub use types::{
    ClusterNode, ConsistencyLevel, FailureReason, Mode, NodeStatus, OperationKind,
    OperationResult, Outcome, RequestLatency,
};

/// Runs the pending operation to completion on a [`ManualScheduler`].
///
/// Fires timers in order until the simulator reports a result. Returns
/// `None` if nothing is pending.
pub fn run_to_completion<N: Notifier>(
    sim: &mut CapSimulator<ManualScheduler, N>,
) -> Option<OperationResult> {
    while let Some(timer) = sim.scheduler_mut().fire_next() {
        if let Some(result) = sim.on_timer(timer) {
            return Some(result);
        }
    }
    None
}
