// SPDX-License-Identifier: MIT

//! Shortest-path routing across partitioned road network databases.
//!
//! Large road network imports are usually tiled into several independently
//! stored partitions. A junction on a tile border is stored twice, once per
//! partition, under unrelated local ids and storage offsets. This crate finds
//! lowest-cost paths across such a split: a label-setting search expands a
//! single frontier over [NodeAddress] keys and crosses partition borders
//! through zero-cost bridge edges provided by pre-built
//! [overlap indices](OverlapIndex). Costs and access restrictions are
//! evaluated per partition by a vehicle-specific [Profile].
//!
//! # Example
//!
//! ```
//! use partroute::{
//!     find_route, AccessMask, Costing, EdgeAttributes, MultiPartitionState, NodeAddress,
//!     OverlapIndex, PartitionSet, PartitionStore, Profile, RouteEdge, RouteNode, Vehicle,
//!     DEFAULT_STEP_LIMIT,
//! };
//!
//! fn edge(to: i64, length: f32) -> RouteEdge {
//!     RouteEdge {
//!         to,
//!         attrs: EdgeAttributes {
//!             length,
//!             speed: 50.0,
//!             grade: 1,
//!             access: AccessMask::ALL,
//!             oneway: false,
//!             backward: false,
//!         },
//!     }
//! }
//!
//! // Partition 1 stores nodes 10 and 11, partition 2 stores nodes 20 and 21.
//! let mut west = PartitionStore::new(1);
//! west.insert(RouteNode { id: 10, offset: 0, lat: 0.0, lon: 0.0, edges: vec![edge(11, 100.0)] });
//! west.insert(RouteNode { id: 11, offset: 8, lat: 0.0, lon: 0.0008, edges: vec![] });
//! let mut east = PartitionStore::new(2);
//! east.insert(RouteNode { id: 20, offset: 0, lat: 0.0, lon: 0.0008, edges: vec![edge(21, 100.0)] });
//! east.insert(RouteNode { id: 21, offset: 8, lat: 0.0, lon: 0.0016, edges: vec![] });
//!
//! // Node 11 and node 20 are the same physical junction on the tile border.
//! let mut border = OverlapIndex::new(1, 2);
//! border.register(11, 8, 20, 0);
//!
//! let stores = PartitionSet::from_iter([west, east]);
//! let profile = Profile {
//!     vehicle: Vehicle::Car,
//!     costing: Costing::Distance,
//!     grade_penalties: [1.0; 5],
//!     respect_oneway: true,
//! };
//! let state = MultiPartitionState::new(vec![(1, &profile), (2, &profile)], vec![&border]);
//!
//! let route = find_route(
//!     &stores,
//!     &state,
//!     NodeAddress::new(1, 0),
//!     NodeAddress::new(2, 8),
//!     DEFAULT_STEP_LIMIT,
//! )
//! .expect("search failed")
//! .expect("no route found");
//!
//! assert_eq!(route.cost, 200.0); // the border crossing itself is free
//! assert_eq!(
//!     route.nodes,
//!     vec![
//!         NodeAddress::new(1, 0),
//!         NodeAddress::new(1, 8),
//!         NodeAddress::new(2, 0),
//!         NodeAddress::new(2, 8),
//!     ],
//! );
//! ```

mod overlap;
mod profile;
mod search;
mod state;
mod store;

pub use overlap::OverlapIndex;
pub use profile::{Costing, Profile, BICYCLE_PROFILE, CAR_PROFILE, FOOT_PROFILE};
pub use search::{find_route, Route, RouteError, DEFAULT_STEP_LIMIT};
pub use state::MultiPartitionState;
pub use store::{NodeLookup, PartitionSet, PartitionStore};

/// Identifies one loaded database partition. Distinct partitions may cover
/// adjacent or overlapping geographic regions.
pub type PartitionId = u32;

/// Identifies a node within one partition's stored graph. Not globally
/// unique: the same physical junction may carry a different LocalNodeId
/// in another partition, and the same id may be reused by an unrelated node.
pub type LocalNodeId = i64;

/// Position of a stored node record within its partition's database.
pub type StorageOffset = u64;

/// Address of a stored node, the only node key stable across a whole
/// multi-partition search. Two addresses are equal iff they name the same
/// partition and the same storage offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeAddress {
    pub partition: PartitionId,
    pub offset: StorageOffset,
}

impl NodeAddress {
    pub const fn new(partition: PartitionId, offset: StorageOffset) -> Self {
        Self { partition, offset }
    }
}

impl std::fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.partition, self.offset)
    }
}

/// Vehicle class for which a route is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vehicle {
    Foot,
    Bicycle,
    Car,
}

impl Vehicle {
    const fn bit(self) -> u8 {
        match self {
            Vehicle::Foot => 0b001,
            Vehicle::Bicycle => 0b010,
            Vehicle::Car => 0b100,
        }
    }
}

/// Bitset of [Vehicle] classes allowed to traverse an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessMask(u8);

impl AccessMask {
    /// No vehicle may traverse the edge.
    pub const NONE: Self = Self(0);

    /// Every vehicle may traverse the edge.
    pub const ALL: Self = Self(0b111);

    pub const fn only(vehicle: Vehicle) -> Self {
        Self(vehicle.bit())
    }

    pub const fn with(self, vehicle: Vehicle) -> Self {
        Self(self.0 | vehicle.bit())
    }

    pub const fn without(self, vehicle: Vehicle) -> Self {
        Self(self.0 & !vehicle.bit())
    }

    pub const fn allows(self, vehicle: Vehicle) -> bool {
        self.0 & vehicle.bit() != 0
    }
}

/// Traversal attributes attached to a stored edge, produced by the
/// (out-of-scope) import pipeline and consumed here as opaque metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAttributes {
    /// Physical length of the edge, in meters.
    ///
    /// Must not be smaller than the crow-flies distance between the edge
    /// endpoints, otherwise the search heuristic may overestimate the
    /// remaining cost and return suboptimal paths.
    pub length: f32,

    /// Assumed travel speed over the edge, in km/h. Zero when unknown,
    /// in which case profiles fall back to a default.
    pub speed: f32,

    /// Surface grade, from 1 (paved) to 5 (barely passable).
    /// Values outside that range are clamped by profiles.
    pub grade: u8,

    /// Vehicle classes allowed on this edge.
    pub access: AccessMask,

    /// The underlying way is one-way in its forward orientation.
    pub oneway: bool,

    /// This edge traverses its way against the forward orientation.
    pub backward: bool,
}

/// Outgoing (one-way) connection stored on a [RouteNode].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEdge {
    /// Target node, as an id local to the partition storing this edge.
    pub to: LocalNodeId,
    pub attrs: EdgeAttributes,
}

/// Stored record of a road network node within one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    /// Partition-local identifier.
    pub id: LocalNodeId,

    /// Position of this record within its partition's database.
    pub offset: StorageOffset,

    pub lat: f32,
    pub lon: f32,

    /// Outgoing edges, in storage order.
    pub edges: Vec<RouteEdge>,
}

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6_371_008.8;

impl RouteNode {
    /// The address of this record within the given partition.
    pub const fn address(&self, partition: PartitionId) -> NodeAddress {
        NodeAddress::new(partition, self.offset)
    }

    /// Calculates the great-circle distance from this node to the given
    /// lat-lon position using the
    /// [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
    /// Returns the result in meters.
    pub fn distance_to(&self, lat: f32, lon: f32) -> f32 {
        let lat1 = (self.lat as f64).to_radians();
        let lon1 = (self.lon as f64).to_radians();
        let lat2 = (lat as f64).to_radians();
        let lon2 = (lon as f64).to_radians();

        let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
        let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

        let h = sin_dlat_half * sin_dlat_half
            + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

        (2.0 * EARTH_RADIUS * h.sqrt().asin()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_mask() {
        assert!(AccessMask::ALL.allows(Vehicle::Car));
        assert!(AccessMask::ALL.allows(Vehicle::Foot));
        assert!(!AccessMask::NONE.allows(Vehicle::Bicycle));
        assert!(AccessMask::only(Vehicle::Foot).allows(Vehicle::Foot));
        assert!(!AccessMask::only(Vehicle::Foot).allows(Vehicle::Car));
        assert!(AccessMask::NONE.with(Vehicle::Car).allows(Vehicle::Car));
        assert!(!AccessMask::ALL.without(Vehicle::Car).allows(Vehicle::Car));
        assert!(AccessMask::ALL.without(Vehicle::Car).allows(Vehicle::Bicycle));
    }

    #[test]
    fn node_address_ordering() {
        assert!(NodeAddress::new(1, 100) < NodeAddress::new(2, 0));
        assert!(NodeAddress::new(1, 0) < NodeAddress::new(1, 8));
        assert_eq!(NodeAddress::new(3, 40), NodeAddress::new(3, 40));
        assert_eq!(NodeAddress::new(3, 40).to_string(), "3:40");
    }

    #[test]
    fn distance() {
        let warsaw = RouteNode {
            id: 1,
            offset: 0,
            lat: 52.23,
            lon: 21.01,
            edges: vec![],
        };

        // Warsaw-Berlin is about 517 km
        let d = warsaw.distance_to(52.52, 13.40);
        assert!((d - 517_000.0).abs() < 5_000.0, "unexpected distance: {}", d);

        assert_eq!(warsaw.distance_to(52.23, 21.01), 0.0);
    }
}
