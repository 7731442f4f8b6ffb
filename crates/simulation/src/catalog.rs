//! Geometry catalog: per-building-kind shape and material descriptors.
//!
//! The generator consumes these profiles; rendering maps [`MaterialKind`]
//! to actual PBR materials. Everything here is plain data so the generator
//! stays pure.

use serde::{Deserialize, Serialize};

/// The three buildable structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Bare post-and-slab frame on a 2x2 m footprint. No basement, thin
    /// pillars — deliberately fragile so it collapses readily.
    Simple,
    /// Mid-rise apartment block with solid perimeter walls and a basement.
    Apartment,
    /// Wide bank tower with glass curtain walls above ground and a basement.
    Bank,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 3] = [
        BuildingKind::Simple,
        BuildingKind::Apartment,
        BuildingKind::Bank,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Simple => "Simple frame",
            BuildingKind::Apartment => "Apartment block",
            BuildingKind::Bank => "Bank tower",
        }
    }

    /// Only the bank tower scenario exposes the two-phase high-magnitude
    /// quake triggers.
    pub fn supports_major_quake(self) -> bool {
        matches!(self, BuildingKind::Bank)
    }
}

/// Visual material category carried on each body placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Standard above-ground concrete.
    Concrete,
    /// Heavy basement concrete (story 0 of apartment/bank).
    Basement,
    /// Transparent glass curtain-wall panel (bank, above ground).
    Window,
    /// Decorative steel (facade bracing, railings).
    Steel,
    /// Loose interior debris cubes.
    Debris,
    /// The kinematic ground platform.
    Ground,
}

/// Static layout profile for one building kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    /// Room grid along X.
    pub rooms_x: u32,
    /// Room grid along Z.
    pub rooms_z: u32,
    /// Grid pitch: the side length of one room cell.
    pub pitch: f32,
    /// Square pillar cross-section side.
    pub pillar_side: f32,
    /// Story 0 is a buried-mass basement.
    pub has_basement: bool,
    /// Above-ground perimeter walls use the transparent window material.
    pub window_walls: bool,
    /// Perimeter wall panels exist at all (the simple frame has none).
    pub has_walls: bool,
    /// Non-basement stories get loose debris cubes (the simple frame
    /// stays bare).
    pub has_debris: bool,
}

/// Fixed grid pitch and per-story layout rule for each kind.
pub fn profile(kind: BuildingKind) -> KindProfile {
    match kind {
        BuildingKind::Simple => KindProfile {
            rooms_x: 1,
            rooms_z: 1,
            pitch: 2.0,
            pillar_side: 0.22,
            has_basement: false,
            window_walls: false,
            has_walls: false,
            has_debris: false,
        },
        BuildingKind::Apartment => KindProfile {
            rooms_x: 3,
            rooms_z: 2,
            pitch: 4.0,
            pillar_side: 0.4,
            has_basement: true,
            window_walls: false,
            has_walls: true,
            has_debris: true,
        },
        BuildingKind::Bank => KindProfile {
            rooms_x: 4,
            rooms_z: 4,
            pitch: 5.0,
            pillar_side: 0.5,
            has_basement: true,
            window_walls: true,
            has_walls: true,
            has_debris: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bank_supports_major_quake() {
        assert!(!BuildingKind::Simple.supports_major_quake());
        assert!(!BuildingKind::Apartment.supports_major_quake());
        assert!(BuildingKind::Bank.supports_major_quake());
    }

    #[test]
    fn test_simple_profile_is_single_cell() {
        let p = profile(BuildingKind::Simple);
        assert_eq!((p.rooms_x, p.rooms_z), (1, 1));
        assert!(!p.has_basement);
        assert!(!p.has_walls);
    }

    #[test]
    fn test_simple_pillars_thinner_than_others() {
        let simple = profile(BuildingKind::Simple).pillar_side;
        assert!(simple < profile(BuildingKind::Apartment).pillar_side);
        assert!(simple < profile(BuildingKind::Bank).pillar_side);
    }

    #[test]
    fn test_window_walls_only_on_bank() {
        for kind in BuildingKind::ALL {
            assert_eq!(
                profile(kind).window_walls,
                kind == BuildingKind::Bank,
                "{:?}",
                kind
            );
        }
    }
}
