//! Outcome decision for a single request.
//!
//! The whole fate of a request is decided up front, the moment it is
//! accepted. What remains is a list of delayed phases whose trace lines are
//! committed one by one as the scheduler fires. Keeping the decision pure
//! means every branch can be checked without a scheduler at all.
//!
//! # Timeline
//!
//! ```text
//! accept ──(Contact)──▶ "n nodes contacted" ──(Commit)──▶ terminal
//! accept ──(FailFast)──────────────────────────────────▶ terminal
//! ```

use crate::cluster::{quorum, reachable};
use crate::notifier::{Notice, Severity};
use crate::types::{ConsistencyLevel, FailureReason, Mode, OperationKind, Outcome};

/// Inputs that decide a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Situation {
    pub mode: Mode,
    pub partitioned: bool,
    pub node_count: usize,
    pub consistency: ConsistencyLevel,
    pub kind: OperationKind,
    /// Value held by the first node when the request arrives.
    pub value: i64,
}

/// Delay before a phase commits, in units the simulator maps to durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// One base unit.
    Contact,
    /// Base unit times the latency multiplier (possibly zero).
    Commit,
    /// Two base units; used when the request is refused outright.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub delay: Delay,
    pub lines: Vec<String>,
}

/// Everything that will happen to an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Logged at acceptance, before any delay.
    pub immediate: Vec<String>,
    /// Non-empty; the last phase is terminal.
    pub phases: Vec<Phase>,
    pub outcome: Outcome,
    pub warning: Option<String>,
    /// Raised when the terminal phase commits.
    pub notice: Notice,
}

const DIVERGENCE_WARNING: &str = "Data may be inconsistent across partitions";

/// Decides the fate of a request.
pub fn decide(s: &Situation) -> Plan {
    let op = s.kind.label();
    let n = s.node_count;
    let initiated = match s.kind {
        OperationKind::Read => format!("{op} operation initiated: Getting current value"),
        OperationKind::Write => {
            format!(
                "{op} operation initiated: Setting value to {}",
                s.value.saturating_add(1)
            )
        }
    };
    let mut immediate = vec![initiated];

    match s.mode {
        Mode::CA => {
            if s.partitioned {
                return fail_fast(
                    immediate,
                    format!("ERROR: {op} failed due to network partition. The system is not partition tolerant."),
                    FailureReason::NotPartitionTolerant,
                    "CA systems cannot handle network partitions".to_string(),
                );
            }
            Plan {
                immediate,
                phases: vec![
                    phase(Delay::Contact, format!("All {n} nodes contacted successfully.")),
                    phase(
                        Delay::Commit,
                        format!("{op} successful on all nodes. Consistent view achieved."),
                    ),
                ],
                outcome: Outcome::Success,
                warning: None,
                notice: Notice::new(
                    "Operation Successful",
                    format!("{op} completed with consistent view"),
                    Severity::Default,
                ),
            }
        }
        Mode::CP => {
            let reach = reachable(n, s.partitioned);
            let needed = quorum(n);
            let level = s.consistency;
            if s.partitioned {
                immediate.push(format!("Only {reach} out of {n} nodes are reachable."));
                let unmet = match level {
                    ConsistencyLevel::Strong => true,
                    ConsistencyLevel::Quorum => reach < needed,
                    ConsistencyLevel::Eventual => false,
                };
                if unmet {
                    return fail_fast(
                        immediate,
                        format!("ERROR: {op} failed. Cannot achieve required consistency level with current available nodes."),
                        FailureReason::ConsistencyLevelUnmet,
                        format!("Cannot achieve {level} consistency during partition"),
                    );
                }
            }

            let contact = phase(Delay::Contact, format!("{reach} nodes contacted successfully."));
            if level == ConsistencyLevel::Eventual || reach >= needed {
                Plan {
                    immediate,
                    phases: vec![
                        contact,
                        phase(Delay::Commit, format!("{op} successful with {level} consistency.")),
                    ],
                    outcome: Outcome::Success,
                    warning: None,
                    notice: Notice::new(
                        "Operation Successful",
                        format!("{op} completed with {level} consistency"),
                        Severity::Default,
                    ),
                }
            } else {
                Plan {
                    immediate,
                    phases: vec![
                        contact,
                        phase(
                            Delay::Commit,
                            format!("ERROR: {op} failed. Consistency requirement not met."),
                        ),
                    ],
                    outcome: Outcome::Failure(FailureReason::ConsistencyLevelUnmet),
                    warning: None,
                    notice: Notice::new(
                        "Operation Failed",
                        "Consistency requirement not met",
                        Severity::Destructive,
                    ),
                }
            }
        }
        Mode::AP => {
            let reach = reachable(n, s.partitioned);
            let mut commit = vec![format!(
                "{op} successful on reachable nodes. System remains available."
            )];
            let diverges = s.partitioned && s.kind == OperationKind::Write;
            let notice = if diverges {
                commit.push(format!(
                    "WARNING: Network partition detected. {DIVERGENCE_WARNING}."
                ));
                Notice::new(
                    "Operation Successful with Warning",
                    DIVERGENCE_WARNING,
                    Severity::Warning,
                )
            } else {
                Notice::new(
                    "Operation Successful",
                    format!("{op} completed on available nodes"),
                    Severity::Default,
                )
            };
            Plan {
                immediate,
                phases: vec![
                    phase(Delay::Contact, format!("{reach} out of {n} nodes contacted.")),
                    Phase {
                        delay: Delay::Commit,
                        lines: commit,
                    },
                ],
                outcome: Outcome::Success,
                warning: diverges.then(|| DIVERGENCE_WARNING.to_string()),
                notice,
            }
        }
    }
}

fn phase(delay: Delay, line: String) -> Phase {
    Phase {
        delay,
        lines: vec![line],
    }
}

fn fail_fast(immediate: Vec<String>, line: String, reason: FailureReason, description: String) -> Plan {
    Plan {
        immediate,
        phases: vec![phase(Delay::FailFast, line)],
        outcome: Outcome::Failure(reason),
        warning: None,
        notice: Notice::new("Operation Failed", description, Severity::Destructive),
    }
}
