// SPDX-License-Identifier: MIT

use crate::{LocalNodeId, NodeAddress, PartitionId};

/// Recommended number of allowed node expansions in
/// [find_route](crate::find_route) before
/// [RouteError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_route](crate::find_route).
///
/// An exhausted frontier is *not* an error: it is the normal "no route"
/// outcome, reported as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// An address does not resolve to a stored node: either the start/goal
    /// of the request, or an already-frontiered address whose record
    /// disappeared mid-search (corrupt or partially loaded partition data).
    #[error("no node stored at address {0}")]
    InvalidAddress(NodeAddress),

    /// A stored edge references a local node id with no record in its
    /// partition. The search aborts rather than silently skipping the node.
    #[error("partition {partition} stores no node with id {id}")]
    InvalidReference {
        partition: PartitionId,
        id: LocalNodeId,
    },

    /// Route search has exceeded its limit of expansions.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires settling every node
    /// reachable from the start across all loaded partitions, which can
    /// take arbitrarily long. The step limit bounds the search; it is also
    /// the hook for cancelling an unwanted search, since aborting between
    /// expansions leaves no state behind beyond the discarded labels.
    #[error("step limit exceeded")]
    StepLimitExceeded,
}
