// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::{LocalNodeId, NodeAddress, OverlapIndex, PartitionId, Profile, Vehicle};

/// Read-only aggregate of everything one search needs to know about the
/// partitions it touches: a cost [Profile] per partition and the
/// [overlap indices](OverlapIndex) bridging between them.
///
/// The state only borrows profiles and indices; they are shared, immutable
/// and must outlive the search, so any number of concurrent searches may
/// use the same underlying data.
#[derive(Debug, Clone)]
pub struct MultiPartitionState<'a> {
    vehicle: Vehicle,
    profiles: BTreeMap<PartitionId, &'a Profile>,
    overlaps: Vec<&'a OverlapIndex>,
}

impl<'a> MultiPartitionState<'a> {
    /// Builds a state from per-partition profiles and the overlap indices
    /// between those partitions.
    ///
    /// Panics when the set is empty, a partition appears twice, the
    /// profiles disagree on the vehicle class, or an overlap index connects
    /// a partition outside the set. All of these are caller defects, never
    /// a property of the map data.
    pub fn new(
        profiles: Vec<(PartitionId, &'a Profile)>,
        overlaps: Vec<&'a OverlapIndex>,
    ) -> Self {
        assert!(
            !profiles.is_empty(),
            "a routing state covers at least one partition"
        );

        let vehicle = profiles[0].1.vehicle;
        let mut by_partition = BTreeMap::new();
        for (partition, profile) in profiles {
            assert_eq!(
                profile.vehicle, vehicle,
                "all profiles of one routing state must share a vehicle class"
            );
            let previous = by_partition.insert(partition, profile);
            assert!(
                previous.is_none(),
                "duplicate profile for partition {}",
                partition
            );
        }

        for overlap in &overlaps {
            let (a, b) = overlap.partitions();
            assert!(
                by_partition.contains_key(&a) && by_partition.contains_key(&b),
                "overlap index {}<->{} references a partition outside the routing state",
                a,
                b
            );
        }

        Self {
            vehicle,
            profiles: by_partition,
            overlaps,
        }
    }

    /// The single vehicle class this state was constructed for.
    pub fn vehicle(&self) -> Vehicle {
        self.vehicle
    }

    /// The cost profile active within the given partition.
    ///
    /// Panics when the partition is not part of this state; the search only
    /// ever reaches addresses of partitions it was configured with, so such
    /// a lookup is a caller defect.
    pub fn profile(&self, partition: PartitionId) -> &'a Profile {
        match self.profiles.get(&partition) {
            Some(&profile) => profile,
            None => panic!("partition {} is not part of this routing state", partition),
        }
    }

    /// Resolves every cross-partition twin of the given node: the addresses
    /// under which other partitions of this state store the same physical
    /// node. Usually empty or a single address; more when the node sits on
    /// a corner where more than two partitions meet.
    ///
    /// Panics when the partition is not part of this state.
    pub fn twins(&self, partition: PartitionId, id: LocalNodeId) -> Vec<NodeAddress> {
        assert!(
            self.profiles.contains_key(&partition),
            "partition {} is not part of this routing state",
            partition
        );

        self.overlaps
            .iter()
            .filter_map(|overlap| overlap.twin(partition, id))
            .collect()
    }

    /// The smallest per-meter cost lower bound across all member profiles.
    /// Scaling the crow-flies distance by this rate yields a heuristic that
    /// stays admissible over the combined cost landscape, including the
    /// zero-cost border bridges.
    pub fn lower_bound_rate(&self) -> f32 {
        self.profiles
            .values()
            .map(|profile| profile.lower_bound_rate())
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Costing;

    const CAR_A: Profile = Profile {
        vehicle: Vehicle::Car,
        costing: Costing::Distance,
        grade_penalties: [1.0; 5],
        respect_oneway: true,
    };

    const CAR_B: Profile = Profile {
        vehicle: Vehicle::Car,
        costing: Costing::Time { max_speed: 90.0 },
        grade_penalties: [1.0; 5],
        respect_oneway: true,
    };

    const FOOT: Profile = Profile {
        vehicle: Vehicle::Foot,
        costing: Costing::Distance,
        grade_penalties: [1.0; 5],
        respect_oneway: false,
    };

    #[test]
    fn per_partition_profiles() {
        let state = MultiPartitionState::new(vec![(1, &CAR_A), (2, &CAR_B)], vec![]);

        assert_eq!(state.vehicle(), Vehicle::Car);
        assert_eq!(state.profile(1), &CAR_A);
        assert_eq!(state.profile(2), &CAR_B);
    }

    #[test]
    #[should_panic]
    fn unknown_partition_profile() {
        let state = MultiPartitionState::new(vec![(1, &CAR_A)], vec![]);
        let _ = state.profile(2);
    }

    #[test]
    #[should_panic]
    fn mixed_vehicle_classes() {
        let _ = MultiPartitionState::new(vec![(1, &CAR_A), (2, &FOOT)], vec![]);
    }

    #[test]
    #[should_panic]
    fn duplicate_partition() {
        let _ = MultiPartitionState::new(vec![(1, &CAR_A), (1, &CAR_B)], vec![]);
    }

    #[test]
    #[should_panic]
    fn foreign_overlap_partition() {
        let mut index = OverlapIndex::new(1, 3);
        index.register(10, 0, 20, 0);
        let _ = MultiPartitionState::new(vec![(1, &CAR_A), (2, &CAR_B)], vec![&index]);
    }

    #[test]
    #[should_panic]
    fn twins_of_unknown_partition() {
        let state = MultiPartitionState::new(vec![(1, &CAR_A)], vec![]);
        let _ = state.twins(2, 10);
    }

    #[test]
    fn twins_concatenate_across_indices() {
        // node 10 of partition 1 sits on a corner shared with partitions 2 and 3
        let mut with_2 = OverlapIndex::new(1, 2);
        with_2.register(10, 16, 70, 8);
        let mut with_3 = OverlapIndex::new(3, 1);
        with_3.register(80, 40, 10, 16);

        let state = MultiPartitionState::new(
            vec![(1, &CAR_A), (2, &CAR_B), (3, &CAR_B)],
            vec![&with_2, &with_3],
        );

        assert_eq!(
            state.twins(1, 10),
            vec![NodeAddress::new(2, 8), NodeAddress::new(3, 40)],
        );
        assert_eq!(state.twins(2, 70), vec![NodeAddress::new(1, 16)]);
        assert_eq!(state.twins(1, 11), vec![]);
    }

    #[test]
    fn lower_bound_rate_is_the_minimum() {
        let state = MultiPartitionState::new(vec![(1, &CAR_A), (2, &CAR_B)], vec![]);
        // CAR_B covers a meter in 3.6/90 = 0.04 s, cheaper than CAR_A's 1.0
        assert!((state.lower_bound_rate() - 0.04).abs() < 1e-6);
    }
}
