// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::{LocalNodeId, NodeAddress, PartitionId, RouteNode, StorageOffset};

/// Capability to retrieve stored node records, the boundary between the
/// search engine and whatever holds the partition data.
///
/// Both lookups return [None] when the partition is not loaded or the
/// address/id is invalid for it; the search engine turns that into a
/// [RouteError](crate::RouteError) instead of silently skipping the node.
pub trait NodeLookup {
    /// Fetches the node record stored at the given address.
    fn node_at(&self, address: NodeAddress) -> Option<&RouteNode>;

    /// Resolves a node by its partition-local id.
    fn node_by_id(&self, partition: PartitionId, id: LocalNodeId) -> Option<&RouteNode>;
}

/// In-memory node store for a single partition, keyed by storage offset
/// with a secondary local-id index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartitionStore {
    partition: PartitionId,
    by_offset: BTreeMap<StorageOffset, RouteNode>,
    by_id: BTreeMap<LocalNodeId, StorageOffset>,
}

impl PartitionStore {
    pub fn new(partition: PartitionId) -> Self {
        Self {
            partition,
            by_offset: BTreeMap::default(),
            by_id: BTreeMap::default(),
        }
    }

    /// The partition whose nodes this store holds.
    pub fn partition(&self) -> PartitionId {
        self.partition
    }

    /// Returns the number of stored nodes.
    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }

    /// Returns an iterator over all stored nodes, in offset order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.by_offset.values()
    }

    /// Creates or replaces the record stored at `node.offset`.
    ///
    /// When an offset is reused for a record with a different local id,
    /// the previous id stops resolving.
    pub fn insert(&mut self, node: RouteNode) {
        if let Some(old) = self.by_offset.get(&node.offset) {
            self.by_id.remove(&old.id);
        }
        self.by_id.insert(node.id, node.offset);
        self.by_offset.insert(node.offset, node);
    }

    /// Retrieves the node record stored at the given offset.
    pub fn node_at(&self, offset: StorageOffset) -> Option<&RouteNode> {
        self.by_offset.get(&offset)
    }

    /// Retrieves a node record by its partition-local id.
    pub fn node_by_id(&self, id: LocalNodeId) -> Option<&RouteNode> {
        self.by_offset.get(self.by_id.get(&id)?)
    }

    /// Finds the stored node closest to the given position, for resolving a
    /// requested location into a search start or goal address.
    ///
    /// This walks every node in the store and is only suitable for
    /// partition-sized datasets.
    pub fn find_nearest_node(&self, lat: f32, lon: f32) -> Option<&RouteNode> {
        self.by_offset
            .values()
            .map(|node| (node.distance_to(lat, lon), node))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.partial_cmp(b_dist).unwrap())
            .map(|(_, node)| node)
    }
}

impl NodeLookup for PartitionStore {
    fn node_at(&self, address: NodeAddress) -> Option<&RouteNode> {
        if address.partition != self.partition {
            return None;
        }
        self.node_at(address.offset)
    }

    fn node_by_id(&self, partition: PartitionId, id: LocalNodeId) -> Option<&RouteNode> {
        if partition != self.partition {
            return None;
        }
        self.node_by_id(id)
    }
}

/// A set of [PartitionStores](PartitionStore) acting as one [NodeLookup]
/// across every loaded partition.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartitionSet {
    stores: BTreeMap<PartitionId, PartitionStore>,
}

impl PartitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a store to the set, replacing any previous store for the
    /// same partition.
    pub fn add(&mut self, store: PartitionStore) {
        self.stores.insert(store.partition(), store);
    }

    /// Retrieves the store for a given partition, if loaded.
    pub fn get(&self, partition: PartitionId) -> Option<&PartitionStore> {
        self.stores.get(&partition)
    }

    /// Returns the loaded partition ids, in ascending order.
    pub fn partitions(&self) -> impl Iterator<Item = PartitionId> + '_ {
        self.stores.keys().copied()
    }
}

impl FromIterator<PartitionStore> for PartitionSet {
    fn from_iter<I: IntoIterator<Item = PartitionStore>>(stores: I) -> Self {
        let mut set = Self::new();
        for store in stores {
            set.add(store);
        }
        set
    }
}

impl NodeLookup for PartitionSet {
    fn node_at(&self, address: NodeAddress) -> Option<&RouteNode> {
        self.stores.get(&address.partition)?.node_at(address.offset)
    }

    fn node_by_id(&self, partition: PartitionId, id: LocalNodeId) -> Option<&RouteNode> {
        self.stores.get(&partition)?.node_by_id(id)
    }
}
