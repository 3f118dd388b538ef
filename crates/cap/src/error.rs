//! Error types for the CAP simulator.
//!
//! Only invalid-state rejections live here. A simulated operation that fails
//! because of the chosen trade-off is an ordinary
//! [`Outcome::Failure`](crate::types::Outcome) value, not an error.

use crate::types::OperationKind;
use thiserror::Error;

/// Result type alias for the simulator.
pub type Result<T> = std::result::Result<T, CapError>;

/// Requests rejected at the call boundary. Nothing is applied when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapError {
    #[error("operation in progress: {0} has not completed")]
    OperationInProgress(OperationKind),
    #[error("cannot change network state during an operation")]
    NetworkChangeDuringOperation,
    #[error("cannot change request latency during an operation")]
    LatencyChangeDuringOperation,
    #[error("node count must be odd and between 3 and 9, got {0}")]
    InvalidNodeCount(usize),
    #[error("committed value {0} cannot be incremented by a write")]
    ValueOutOfRange(i64),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
