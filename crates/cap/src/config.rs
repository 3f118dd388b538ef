//! Simulator configuration.

use crate::cluster::is_valid_node_count;
use crate::error::{CapError, Result};
use crate::types::{ConsistencyLevel, Mode, RequestLatency};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Initial state and timing for a [`CapSimulator`](crate::CapSimulator).
///
/// `reset` returns the simulator to exactly this configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub mode: Mode,
    pub node_count: usize,
    pub consistency: ConsistencyLevel,
    pub latency: RequestLatency,
    /// Unit delay in milliseconds; contacting replicas takes one unit.
    pub base_delay_ms: u64,
    /// Trace lines kept before the oldest is dropped.
    pub log_capacity: usize,
    /// Value every replica starts with.
    pub initial_value: i64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            mode: Mode::CP,
            node_count: 5,
            consistency: ConsistencyLevel::Strong,
            latency: RequestLatency::Low,
            base_delay_ms: 500,
            log_capacity: 10,
            initial_value: 42,
        }
    }
}

impl SimulatorConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_node_count(self.node_count) {
            return Err(CapError::InvalidNodeCount(self.node_count));
        }
        if self.log_capacity == 0 {
            return Err(CapError::InvalidConfig(
                "log_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
