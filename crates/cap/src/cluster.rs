//! Cluster arithmetic shared by the decision logic and the node view.

use crate::types::{ClusterNode, Mode, NodeStatus};

pub const MIN_NODES: usize = 3;
pub const MAX_NODES: usize = 9;

/// Regions handed out to nodes in turn.
pub const REGIONS: [&str; 5] = ["US East", "US West", "EU West", "Asia Pacific", "South America"];

/// True for odd counts in `MIN_NODES..=MAX_NODES`.
pub fn is_valid_node_count(n: usize) -> bool {
    (MIN_NODES..=MAX_NODES).contains(&n) && n % 2 == 1
}

/// Majority of `n` nodes, `ceil(n / 2)`.
pub fn quorum(n: usize) -> usize {
    n.div_ceil(2)
}

/// Nodes on the client's side of the network.
///
/// A partition cuts the cluster at `floor(n / 2)`; the client only reaches
/// the lower half.
pub fn reachable(n: usize, partitioned: bool) -> usize {
    if partitioned {
        n / 2
    } else {
        n
    }
}

/// Builds the per-node view of the cluster.
///
/// Nodes with a zero-based index at or past `floor(n / 2)` are disconnected
/// while partitioned and never see writes committed after `partition_value`
/// was taken. In AP mode those nodes kept accepting writes on their own, so
/// they show a value diverged from that snapshot.
pub fn cluster_nodes(
    n: usize,
    mode: Mode,
    partitioned: bool,
    value: i64,
    partition_value: i64,
) -> Vec<ClusterNode> {
    let cut = n / 2;
    (0..n)
        .map(|index| {
            let far = partitioned && index >= cut;
            ClusterNode {
                id: index + 1,
                region: REGIONS[index % REGIONS.len()].to_string(),
                status: if far {
                    NodeStatus::Disconnected
                } else {
                    NodeStatus::Healthy
                },
                value: match (far, mode) {
                    (false, _) => value,
                    (true, Mode::AP) => partition_value.saturating_add(1),
                    (true, _) => partition_value,
                },
            }
        })
        .collect()
}
