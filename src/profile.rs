// SPDX-License-Identifier: MIT

use crate::{RouteEdge, Vehicle};

/// Travel speed assumed for edges whose stored speed is unknown, in km/h.
const FALLBACK_SPEED: f32 = 50.0;

/// How a [Profile] turns an edge length into a traversal cost.
///
/// This is deliberately a closed set of variants instead of a pluggable
/// cost callback: the search engine may evaluate the same edge many times
/// and relies on the evaluation being deterministic and side-effect-free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Costing {
    /// Cost equals the physical edge length, in meters.
    Distance,

    /// Cost equals the travel time over the edge, in seconds, assuming the
    /// stored edge speed capped at `max_speed` (the vehicle's own top
    /// speed, in km/h; must be positive).
    Time { max_speed: f32 },
}

/// Vehicle- and partition-specific cost and access-restriction function
/// over stored edge attributes.
///
/// Each partition participating in a search may use its own Profile
/// instance (for example to express region-specific legal restrictions),
/// as long as all of them are built for the same [Vehicle] class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// The vehicle class this profile evaluates costs for.
    pub vehicle: Vehicle,

    /// How edge lengths are converted into costs.
    pub costing: Costing,

    /// Cost multiplier per surface grade (index 0 = grade 1). Every entry
    /// must be at least one, so that the crow-flies heuristic stays
    /// admissible; an entry may be [f32::INFINITY] to make a grade
    /// impassable for this vehicle.
    pub grade_penalties: [f32; 5],

    /// Whether edges running against a one-way way are rejected.
    /// Pedestrian profiles typically ignore one-way restrictions.
    pub respect_oneway: bool,
}

impl Profile {
    /// Returns the cost of traversing `edge`, or [f32::INFINITY] when the
    /// edge is not accessible for this profile's vehicle (access bitset
    /// exclusion, or travel against a one-way way).
    ///
    /// The result is deterministic: the search engine may call this many
    /// times per edge and must get identical answers.
    pub fn edge_cost(&self, edge: &RouteEdge) -> f32 {
        let attrs = &edge.attrs;

        if !attrs.access.allows(self.vehicle) {
            return f32::INFINITY;
        }
        if self.respect_oneway && attrs.oneway && attrs.backward {
            return f32::INFINITY;
        }

        let base = match self.costing {
            Costing::Distance => attrs.length,
            Costing::Time { max_speed } => {
                let speed = if attrs.speed > 0.0 {
                    attrs.speed.min(max_speed)
                } else {
                    FALLBACK_SPEED.min(max_speed)
                };
                attrs.length / (speed / 3.6)
            }
        };

        base * self.grade_penalties[(attrs.grade.clamp(1, 5) - 1) as usize]
    }

    /// A lower bound of the cost of covering `1` meter under this profile,
    /// used to scale the crow-flies distance into an admissible search
    /// heuristic. The bound holds because edge lengths are never smaller
    /// than the crow-flies distance between their endpoints and grade
    /// penalties are never smaller than one.
    pub fn lower_bound_rate(&self) -> f32 {
        match self.costing {
            Costing::Distance => 1.0,
            Costing::Time { max_speed } => 3.6 / max_speed,
        }
    }
}

/// Example [Profile] for cars: fastest path, one-ways respected,
/// rough surfaces impassable.
pub const CAR_PROFILE: Profile = Profile {
    vehicle: Vehicle::Car,
    costing: Costing::Time { max_speed: 130.0 },
    grade_penalties: [1.0, 1.2, 2.0, f32::INFINITY, f32::INFINITY],
    respect_oneway: true,
};

/// Example [Profile] for bicycles: fastest path with a preference for
/// better surfaces, one-ways respected.
pub const BICYCLE_PROFILE: Profile = Profile {
    vehicle: Vehicle::Bicycle,
    costing: Costing::Time { max_speed: 20.0 },
    grade_penalties: [1.0, 1.1, 1.3, 2.0, 4.0],
    respect_oneway: true,
};

/// Example [Profile] for walking: one-way restrictions do not apply.
pub const FOOT_PROFILE: Profile = Profile {
    vehicle: Vehicle::Foot,
    costing: Costing::Time { max_speed: 5.0 },
    grade_penalties: [1.0, 1.0, 1.1, 1.3, 2.0],
    respect_oneway: false,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessMask, EdgeAttributes};

    const DISTANCE_PROFILE: Profile = Profile {
        vehicle: Vehicle::Car,
        costing: Costing::Distance,
        grade_penalties: [1.0, 2.0, 3.0, 4.0, f32::INFINITY],
        respect_oneway: true,
    };

    fn edge(attrs: EdgeAttributes) -> RouteEdge {
        RouteEdge { to: 1, attrs }
    }

    fn plain_attrs(length: f32) -> EdgeAttributes {
        EdgeAttributes {
            length,
            speed: 0.0,
            grade: 1,
            access: AccessMask::ALL,
            oneway: false,
            backward: false,
        }
    }

    #[test]
    fn distance_costing() {
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(plain_attrs(120.0))), 120.0);

        let rough = EdgeAttributes {
            grade: 2,
            ..plain_attrs(120.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(rough)), 240.0);
    }

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-3),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn time_costing() {
        let profile = Profile {
            costing: Costing::Time { max_speed: 90.0 },
            ..DISTANCE_PROFILE
        };

        // 1 km at 36 km/h (10 m/s) takes 100 s
        let slow = EdgeAttributes {
            speed: 36.0,
            ..plain_attrs(1000.0)
        };
        assert_almost_eq!(profile.edge_cost(&edge(slow)), 100.0);

        // edge speed above the vehicle's top speed is capped
        let fast = EdgeAttributes {
            speed: 180.0,
            ..plain_attrs(1000.0)
        };
        assert_almost_eq!(profile.edge_cost(&edge(fast)), 40.0);

        // unknown edge speed falls back to the 50 km/h default
        let unknown = plain_attrs(1000.0);
        assert_almost_eq!(profile.edge_cost(&edge(unknown)), 72.0);
    }

    #[test]
    fn access_restrictions() {
        let forbidden = EdgeAttributes {
            access: AccessMask::only(Vehicle::Foot),
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(forbidden)), f32::INFINITY);

        let allowed = EdgeAttributes {
            access: AccessMask::only(Vehicle::Car),
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(allowed)), 10.0);
    }

    #[test]
    fn oneway_restrictions() {
        let against = EdgeAttributes {
            oneway: true,
            backward: true,
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(against)), f32::INFINITY);

        let along = EdgeAttributes {
            oneway: true,
            backward: false,
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(along)), 10.0);

        // a profile which ignores one-ways may travel against them
        let ignoring = Profile {
            respect_oneway: false,
            ..DISTANCE_PROFILE
        };
        assert_eq!(ignoring.edge_cost(&edge(against)), 10.0);
    }

    #[test]
    fn impassable_grade() {
        let terrible = EdgeAttributes {
            grade: 5,
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(terrible)), f32::INFINITY);
    }

    #[test]
    fn grade_out_of_range_is_clamped() {
        let unknown = EdgeAttributes {
            grade: 0,
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(unknown)), 10.0);

        let oversized = EdgeAttributes {
            grade: 9,
            ..plain_attrs(10.0)
        };
        assert_eq!(DISTANCE_PROFILE.edge_cost(&edge(oversized)), f32::INFINITY);
    }

    #[test]
    fn lower_bound_rate() {
        assert_eq!(DISTANCE_PROFILE.lower_bound_rate(), 1.0);

        let time = Profile {
            costing: Costing::Time { max_speed: 36.0 },
            ..DISTANCE_PROFILE
        };
        // 36 km/h = 10 m/s, so at least 0.1 s per meter
        assert!((time.lower_bound_rate() - 0.1).abs() < 1e-6);
    }
}
