// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};

use crate::{MultiPartitionState, NodeAddress, NodeLookup, RouteError};

/// A found path: the visited node addresses from start to goal inclusive,
/// and the total accumulated cost. A border crossing contributes both twin
/// copies of the shared node to `nodes`, back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeAddress>,
    pub cost: f32,
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: NodeAddress,
    cost: f32,
    score: f32,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.at == other.at
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Equal scores fall back to address order, so that repeated
        // searches over unchanged data expand nodes in the same sequence.
        other
            .score
            .partial_cmp(&self.score)
            .unwrap()
            .then_with(|| other.at.cmp(&self.at))
    }
}

fn reconstruct_path(
    came_from: &HashMap<NodeAddress, NodeAddress>,
    mut last: NodeAddress,
) -> Vec<NodeAddress> {
    let mut path = vec![last];

    while let Some(&at) = came_from.get(&last) {
        path.push(at);
        last = at;
    }

    path.reverse();
    return path;
}

/// Uses a label-setting shortest-path search (A* over non-negative costs)
/// to find the cheapest route between two stored nodes, possibly located
/// in different partitions.
///
/// Local edges are priced by the partition's own [Profile](crate::Profile)
/// from `state`; whenever the expanded node has twin copies in other
/// partitions (per the state's overlap indices), the frontier crosses the
/// border over synthetic zero-cost bridge edges. The goal counts as reached
/// through any of its own twins as well. Edges reported inaccessible by a
/// profile are silently left out of the expansion.
///
/// Returns `Ok(None)` when the frontier is exhausted without reaching the
/// goal: no route exists over the loaded partitions for this vehicle. An
/// unresolvable start, goal or mid-search address is an error, as the data
/// is missing or corrupt; no partial path is ever returned.
///
/// `step_limit` bounds how many nodes may be expanded before giving up with
/// [RouteError::StepLimitExceeded]; the recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
///
/// Panics when `start` or `goal` names a partition that is not part of
/// `state` (a caller defect, per [MultiPartitionState] preconditions).
pub fn find_route<L: NodeLookup>(
    stores: &L,
    state: &MultiPartitionState<'_>,
    start: NodeAddress,
    goal: NodeAddress,
    step_limit: usize,
) -> Result<Option<Route>, RouteError> {
    let goal_node = stores
        .node_at(goal)
        .ok_or(RouteError::InvalidAddress(goal))?;
    let (goal_lat, goal_lon) = (goal_node.lat, goal_node.lon);

    // Reaching any twin copy of the goal reaches the goal.
    let mut goal_set = state.twins(goal.partition, goal_node.id);
    goal_set.push(goal);

    let start_node = stores
        .node_at(start)
        .ok_or(RouteError::InvalidAddress(start))?;

    // Scale for the crow-flies heuristic, admissible across every
    // partition's profile and the zero-cost bridges.
    let rate = state.lower_bound_rate();

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<NodeAddress, NodeAddress> = HashMap::default();
    let mut known_costs: HashMap<NodeAddress, f32> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(QueueItem {
        at: start,
        cost: 0.0,
        score: start_node.distance_to(goal_lat, goal_lon) * rate,
    });
    known_costs.insert(start, 0.0);

    while let Some(item) = queue.pop() {
        if goal_set.contains(&item.at) {
            debug!(
                "route {} -> {} found after {} expansions, cost {}",
                start, goal, steps, item.cost
            );
            return Ok(Some(Route {
                nodes: reconstruct_path(&came_from, item.at),
                cost: item.cost,
            }));
        }

        // The queue may hold multiple items for the same address; entries
        // made stale by a later improvement are skipped, never re-settled.
        if item.cost > known_costs.get(&item.at).copied().unwrap_or(f32::INFINITY) {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            return Err(RouteError::StepLimitExceeded);
        }

        let node = stores
            .node_at(item.at)
            .ok_or(RouteError::InvalidAddress(item.at))?;
        let profile = state.profile(item.at.partition);

        for edge in &node.edges {
            let edge_cost = profile.edge_cost(edge);
            if !edge_cost.is_finite() {
                // Inaccessible for this vehicle; left out of the expansion.
                continue;
            }

            let target = stores
                .node_by_id(item.at.partition, edge.to)
                .ok_or(RouteError::InvalidReference {
                    partition: item.at.partition,
                    id: edge.to,
                })?;
            let target_at = target.address(item.at.partition);

            // Only a strict improvement may replace a label; ties keep the
            // first-discovered predecessor.
            let candidate = item.cost + edge_cost;
            if candidate
                >= known_costs
                    .get(&target_at)
                    .copied()
                    .unwrap_or(f32::INFINITY)
            {
                continue;
            }

            came_from.insert(target_at, item.at);
            known_costs.insert(target_at, candidate);
            queue.push(QueueItem {
                at: target_at,
                cost: candidate,
                score: candidate + target.distance_to(goal_lat, goal_lon) * rate,
            });
        }

        // A twin stores the same physical node in another partition, so the
        // bridge there is free and the heuristic carries over unchanged.
        // Once settled, the twin expands with its own partition's edges and
        // profile, which is what lets the frontier cross the border.
        for twin in state.twins(item.at.partition, node.id) {
            if item.cost
                >= known_costs
                    .get(&twin)
                    .copied()
                    .unwrap_or(f32::INFINITY)
            {
                continue;
            }

            trace!("bridging {} -> {} at cost {}", item.at, twin, item.cost);
            came_from.insert(twin, item.at);
            known_costs.insert(twin, item.cost);
            queue.push(QueueItem {
                at: twin,
                cost: item.cost,
                score: item.cost + node.distance_to(goal_lat, goal_lon) * rate,
            });
        }
    }

    debug!(
        "no route {} -> {}, frontier exhausted after {} expansions",
        start, goal, steps
    );
    return Ok(None);
}
