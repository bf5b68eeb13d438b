// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::{LocalNodeId, NodeAddress, PartitionId, StorageOffset};

/// Border overlap index between one pair of partitions.
///
/// Partitions are produced by tiling a larger import, so a node on the
/// shared border is stored twice: once per partition, under unrelated local
/// ids and offsets. This index records those correspondences, computed once
/// at data-preparation time, and resolves a node's "twin" address in the
/// other partition during a search. A node with no entry is interior to its
/// partition; looking it up yields [None], never an invented address.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapIndex {
    partition_a: PartitionId,
    partition_b: PartitionId,
    a_to_b: BTreeMap<LocalNodeId, StorageOffset>,
    b_to_a: BTreeMap<LocalNodeId, StorageOffset>,
}

impl OverlapIndex {
    /// Creates an empty index between two distinct partitions.
    pub fn new(partition_a: PartitionId, partition_b: PartitionId) -> Self {
        assert_ne!(
            partition_a, partition_b,
            "an overlap index connects two distinct partitions"
        );
        Self {
            partition_a,
            partition_b,
            a_to_b: BTreeMap::default(),
            b_to_a: BTreeMap::default(),
        }
    }

    /// The pair of partitions this index connects, in constructor order.
    pub fn partitions(&self) -> (PartitionId, PartitionId) {
        (self.partition_a, self.partition_b)
    }

    /// Returns the number of registered twin pairs.
    pub fn len(&self) -> usize {
        self.a_to_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a_to_b.is_empty()
    }

    /// Records that node `a_id` stored at `a_offset` in the first partition
    /// and node `b_id` stored at `b_offset` in the second partition are the
    /// same physical node. Registering the same id again replaces its entry.
    pub fn register(
        &mut self,
        a_id: LocalNodeId,
        a_offset: StorageOffset,
        b_id: LocalNodeId,
        b_offset: StorageOffset,
    ) {
        self.a_to_b.insert(a_id, b_offset);
        self.b_to_a.insert(b_id, a_offset);
    }

    /// Resolves the address of the given node's copy in the other partition.
    ///
    /// Returns [None] when the node was never registered (it is interior to
    /// its partition), or when `partition` is not one of the two partitions
    /// this index connects.
    pub fn twin(&self, partition: PartitionId, id: LocalNodeId) -> Option<NodeAddress> {
        if partition == self.partition_a {
            self.a_to_b
                .get(&id)
                .map(|&offset| NodeAddress::new(self.partition_b, offset))
        } else if partition == self.partition_b {
            self.b_to_a
                .get(&id)
                .map(|&offset| NodeAddress::new(self.partition_a, offset))
        } else {
            None
        }
    }
}
