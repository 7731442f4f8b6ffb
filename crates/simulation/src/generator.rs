//! Procedural structure generator.
//!
//! `generate` is a pure function mapping a [`BuildingSpec`] to a flat list
//! of rigid-body placements. Identical inputs always yield identical
//! outputs: debris jitter comes from a splitmix64 hash of the debris cell
//! index, never from RNG state.
//!
//! Per story the layout rule is: pillars on the `(rooms_x+1) x (rooms_z+1)`
//! grid points, one perimeter wall panel per room face, one slab on top,
//! and loose debris cubes inside non-basement stories. Story 0 is a
//! basement for apartment/bank: heavier, its own material, solid walls,
//! no debris.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{profile, BuildingKind, KindProfile, MaterialKind};
use crate::config::{
    ANGULAR_DAMPING, BASEMENT_MASS_MULTIPLIER, BODY_DENSITY, DEBRIS_SIZE, LINEAR_DAMPING,
    SLAB_THICKNESS, STORY_HEIGHT, WALL_THICKNESS,
};

// =============================================================================
// Types
// =============================================================================

/// What the user asked to build. Immutable once a rebuild consumes it; a new
/// spec fully replaces the structure.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub kind: BuildingKind,
    pub stories: u32,
}

impl Default for BuildingSpec {
    fn default() -> Self {
        Self {
            kind: BuildingKind::Apartment,
            stories: 5,
        }
    }
}

/// Which structural role a placement plays. Carried through to spawn time
/// so counts stay auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructurePart {
    Pillar,
    Wall,
    Slab,
    Debris,
}

/// A decorative, non-colliding child mesh. Inherits its parent body's
/// transform; carries zero physics state.
#[derive(Debug, Clone, PartialEq)]
pub struct Ornament {
    pub offset: Vec3,
    pub rotation: Quat,
    pub extents: Vec3,
    pub material: MaterialKind,
}

/// One rigid body to spawn: pose, full extents, mass (0 = static), damping,
/// material, plus visual-only ornaments.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlacement {
    pub part: StructurePart,
    pub position: Vec3,
    pub extents: Vec3,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub material: MaterialKind,
    pub ornaments: Vec<Ornament>,
}

// =============================================================================
// Deterministic hash helpers (no RNG state — keeps `generate` pure)
// =============================================================================

/// splitmix64: good distribution from sequential seeds.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Deterministic f32 in [-0.5, 0.5) from a seed.
fn hash_jitter(seed: u64) -> f32 {
    (splitmix64(seed) % 1_000_000) as f32 / 1_000_000.0 - 0.5
}

// =============================================================================
// Generation
// =============================================================================

struct StoryFrame {
    base_y: f32,
    pillar_h: f32,
    half_w: f32,
    half_d: f32,
    mass_scale: f32,
    is_basement: bool,
}

/// Maps a building spec to the flat list of rigid-body placements.
///
/// Pure and deterministic. `stories == 0` yields an empty list.
pub fn generate(spec: &BuildingSpec) -> Vec<BodyPlacement> {
    let p = profile(spec.kind);
    let width = p.rooms_x as f32 * p.pitch;
    let depth = p.rooms_z as f32 * p.pitch;
    let pillar_h = STORY_HEIGHT - SLAB_THICKNESS;

    let mut placements = Vec::new();

    for story in 0..spec.stories {
        let is_basement = p.has_basement && story == 0;
        let frame = StoryFrame {
            base_y: story as f32 * STORY_HEIGHT,
            pillar_h,
            half_w: width / 2.0,
            half_d: depth / 2.0,
            mass_scale: if is_basement {
                BASEMENT_MASS_MULTIPLIER
            } else {
                1.0
            },
            is_basement,
        };

        emit_pillars(&mut placements, &p, &frame);
        if p.has_walls {
            emit_walls(&mut placements, &p, &frame);
        }
        emit_slab(&mut placements, spec, &p, &frame, story);
        if p.has_debris && !is_basement {
            emit_debris(&mut placements, &p, &frame, story);
        }
    }

    placements
}

fn body_material(frame: &StoryFrame, above_ground: MaterialKind) -> MaterialKind {
    if frame.is_basement {
        MaterialKind::Basement
    } else {
        above_ground
    }
}

fn make_body(
    part: StructurePart,
    position: Vec3,
    extents: Vec3,
    mass_scale: f32,
    material: MaterialKind,
) -> BodyPlacement {
    let volume = extents.x * extents.y * extents.z;
    BodyPlacement {
        part,
        position,
        extents,
        mass: volume * BODY_DENSITY * mass_scale,
        linear_damping: LINEAR_DAMPING,
        angular_damping: ANGULAR_DAMPING,
        material,
        ornaments: Vec::new(),
    }
}

fn emit_pillars(
    out: &mut Vec<BodyPlacement>,
    p: &KindProfile,
    frame: &StoryFrame,
) {
    let material = body_material(frame, MaterialKind::Concrete);
    for i in 0..=p.rooms_x {
        for j in 0..=p.rooms_z {
            let x = -frame.half_w + i as f32 * p.pitch;
            let z = -frame.half_d + j as f32 * p.pitch;
            let y = frame.base_y + frame.pillar_h / 2.0;
            out.push(make_body(
                StructurePart::Pillar,
                Vec3::new(x, y, z),
                Vec3::new(p.pillar_side, frame.pillar_h, p.pillar_side),
                frame.mass_scale,
                material,
            ));
        }
    }
}

fn emit_walls(out: &mut Vec<BodyPlacement>, p: &KindProfile, frame: &StoryFrame) {
    // Basements are always solid; above ground the bank gets glass panels.
    let material = body_material(
        frame,
        if p.window_walls {
            MaterialKind::Window
        } else {
            MaterialKind::Concrete
        },
    );
    let panel_w = p.pitch - p.pillar_side;
    let y = frame.base_y + frame.pillar_h / 2.0;

    // North/south faces: one panel per room column.
    for i in 0..p.rooms_x {
        let x = -frame.half_w + (i as f32 + 0.5) * p.pitch;
        for z in [-frame.half_d, frame.half_d] {
            out.push(make_body(
                StructurePart::Wall,
                Vec3::new(x, y, z),
                Vec3::new(panel_w, frame.pillar_h, WALL_THICKNESS),
                frame.mass_scale,
                material,
            ));
        }
    }
    // East/west faces: one panel per room row.
    for j in 0..p.rooms_z {
        let z = -frame.half_d + (j as f32 + 0.5) * p.pitch;
        for x in [-frame.half_w, frame.half_w] {
            out.push(make_body(
                StructurePart::Wall,
                Vec3::new(x, y, z),
                Vec3::new(WALL_THICKNESS, frame.pillar_h, panel_w),
                frame.mass_scale,
                material,
            ));
        }
    }
}

fn emit_slab(
    out: &mut Vec<BodyPlacement>,
    spec: &BuildingSpec,
    p: &KindProfile,
    frame: &StoryFrame,
    story: u32,
) {
    let width = frame.half_w * 2.0;
    let depth = frame.half_d * 2.0;
    let y = frame.base_y + frame.pillar_h + SLAB_THICKNESS / 2.0;
    let mut slab = make_body(
        StructurePart::Slab,
        Vec3::new(0.0, y, 0.0),
        Vec3::new(width + p.pillar_side, SLAB_THICKNESS, depth + p.pillar_side),
        frame.mass_scale,
        body_material(frame, MaterialKind::Concrete),
    );
    slab.ornaments = slab_ornaments(spec, frame, story, width, depth);
    out.push(slab);
}

/// Decorative steel attached to slabs: diagonal facade bracing on bank
/// stories, a rooftop railing on the apartment block's top slab.
fn slab_ornaments(
    spec: &BuildingSpec,
    frame: &StoryFrame,
    story: u32,
    width: f32,
    depth: f32,
) -> Vec<Ornament> {
    let mut ornaments = Vec::new();
    match spec.kind {
        BuildingKind::Bank if !frame.is_basement => {
            // An X-brace bar across the front and back faces of the story
            // under this slab.
            let length = (width * width + frame.pillar_h * frame.pillar_h).sqrt();
            let angle = (frame.pillar_h / width).atan();
            let y = -(SLAB_THICKNESS + frame.pillar_h) / 2.0;
            for z in [-frame.half_d, frame.half_d] {
                for dir in [1.0, -1.0] {
                    ornaments.push(Ornament {
                        offset: Vec3::new(0.0, y, z + 0.1 * z.signum()),
                        rotation: Quat::from_rotation_z(angle * dir),
                        extents: Vec3::new(length, 0.08, 0.08),
                        material: MaterialKind::Steel,
                    });
                }
            }
        }
        BuildingKind::Apartment if story + 1 == spec.stories => {
            // Rooftop railing along all four slab edges.
            let rail_h = 0.5;
            let y = SLAB_THICKNESS / 2.0 + rail_h / 2.0;
            for z in [-frame.half_d, frame.half_d] {
                ornaments.push(Ornament {
                    offset: Vec3::new(0.0, y, z),
                    rotation: Quat::IDENTITY,
                    extents: Vec3::new(width, rail_h, 0.06),
                    material: MaterialKind::Steel,
                });
            }
            for x in [-frame.half_w, frame.half_w] {
                ornaments.push(Ornament {
                    offset: Vec3::new(x, y, 0.0),
                    rotation: Quat::IDENTITY,
                    extents: Vec3::new(0.06, rail_h, depth),
                    material: MaterialKind::Steel,
                });
            }
        }
        _ => {}
    }
    ornaments
}

fn emit_debris(
    out: &mut Vec<BodyPlacement>,
    p: &KindProfile,
    frame: &StoryFrame,
    story: u32,
) {
    for i in 0..p.rooms_x {
        for j in 0..p.rooms_z {
            let seed = story as u64 * 10_007 + i as u64 * 97 + j as u64;
            let jitter_x = hash_jitter(seed) * p.pitch * 0.5;
            let jitter_z = hash_jitter(splitmix64(seed)) * p.pitch * 0.5;
            let x = -frame.half_w + (i as f32 + 0.5) * p.pitch + jitter_x;
            let z = -frame.half_d + (j as f32 + 0.5) * p.pitch + jitter_z;
            let y = frame.base_y + DEBRIS_SIZE / 2.0;
            out.push(make_body(
                StructurePart::Debris,
                Vec3::new(x, y, z),
                Vec3::splat(DEBRIS_SIZE),
                1.0,
                MaterialKind::Debris,
            ));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: BuildingKind, stories: u32) -> BuildingSpec {
        BuildingSpec { kind, stories }
    }

    /// Story index a placement belongs to, recovered from its height.
    fn story_of(placement: &BodyPlacement) -> u32 {
        (placement.position.y / STORY_HEIGHT).floor() as u32
    }

    fn count(placements: &[BodyPlacement], story: u32, part: StructurePart) -> usize {
        placements
            .iter()
            .filter(|b| b.part == part && story_of(b) == story)
            .count()
    }

    #[test]
    fn test_zero_stories_is_empty() {
        for kind in BuildingKind::ALL {
            assert!(generate(&spec(kind, 0)).is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_simple_four_stories_is_twenty_bodies() {
        let bodies = generate(&spec(BuildingKind::Simple, 4));
        assert_eq!(bodies.len(), 20);
        for story in 0..4 {
            assert_eq!(count(&bodies, story, StructurePart::Pillar), 4);
            assert_eq!(count(&bodies, story, StructurePart::Slab), 1);
        }
        // No basement: nothing uses the basement material.
        assert!(bodies.iter().all(|b| b.material != MaterialKind::Basement));
    }

    #[test]
    fn test_apartment_counts_match_grid_formula() {
        let p = profile(BuildingKind::Apartment);
        let bodies = generate(&spec(BuildingKind::Apartment, 3));
        let pillars = ((p.rooms_x + 1) * (p.rooms_z + 1)) as usize;
        let walls = (2 * (p.rooms_x + p.rooms_z)) as usize;
        let debris = (p.rooms_x * p.rooms_z) as usize;
        for story in 0..3 {
            assert_eq!(count(&bodies, story, StructurePart::Pillar), pillars);
            assert_eq!(count(&bodies, story, StructurePart::Wall), walls);
            assert_eq!(count(&bodies, story, StructurePart::Slab), 1);
            let expected_debris = if story == 0 { 0 } else { debris };
            assert_eq!(count(&bodies, story, StructurePart::Debris), expected_debris);
        }
        let per_story = pillars + walls + 1;
        assert_eq!(bodies.len(), 3 * per_story + 2 * debris);
    }

    #[test]
    fn test_basement_is_heavy_and_distinct() {
        let bodies = generate(&spec(BuildingKind::Bank, 2));
        let pillar_mass = |story: u32| -> f32 {
            bodies
                .iter()
                .find(|b| b.part == StructurePart::Pillar && story_of(b) == story)
                .map(|b| b.mass)
                .unwrap()
        };
        let ratio = pillar_mass(0) / pillar_mass(1);
        assert!((ratio - BASEMENT_MASS_MULTIPLIER).abs() < 1e-3, "{}", ratio);

        for body in bodies.iter().filter(|b| story_of(b) == 0) {
            assert_eq!(body.material, MaterialKind::Basement, "{:?}", body.part);
            assert_ne!(body.part, StructurePart::Debris);
        }
    }

    #[test]
    fn test_bank_walls_are_windows_above_ground_only() {
        let bodies = generate(&spec(BuildingKind::Bank, 3));
        for wall in bodies.iter().filter(|b| b.part == StructurePart::Wall) {
            let expected = if story_of(wall) == 0 {
                MaterialKind::Basement
            } else {
                MaterialKind::Window
            };
            assert_eq!(wall.material, expected);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        for kind in BuildingKind::ALL {
            let a = generate(&spec(kind, 6));
            let b = generate(&spec(kind, 6));
            assert_eq!(a, b, "{:?}", kind);
        }
    }

    #[test]
    fn test_ornaments_where_expected() {
        // Simple frame: bare.
        let simple = generate(&spec(BuildingKind::Simple, 3));
        assert!(simple.iter().all(|b| b.ornaments.is_empty()));

        // Bank: braces on every above-ground slab, none on the basement slab.
        let bank = generate(&spec(BuildingKind::Bank, 3));
        for slab in bank.iter().filter(|b| b.part == StructurePart::Slab) {
            if story_of(slab) == 0 {
                assert!(slab.ornaments.is_empty());
            } else {
                assert!(!slab.ornaments.is_empty());
                assert!(slab
                    .ornaments
                    .iter()
                    .all(|o| o.material == MaterialKind::Steel));
            }
        }

        // Apartment: railing on the top slab only.
        let apt = generate(&spec(BuildingKind::Apartment, 4));
        for slab in apt.iter().filter(|b| b.part == StructurePart::Slab) {
            let expected = story_of(slab) == 3;
            assert_eq!(!slab.ornaments.is_empty(), expected);
        }
    }

    #[test]
    fn test_all_bodies_have_positive_mass_and_damping() {
        let bodies = generate(&spec(BuildingKind::Apartment, 4));
        for body in &bodies {
            assert!(body.mass > 0.0);
            assert!(body.linear_damping > 0.0);
            assert!(body.angular_damping > 0.0);
        }
    }

    #[test]
    fn test_debris_stays_inside_footprint() {
        let p = profile(BuildingKind::Bank);
        let half_w = p.rooms_x as f32 * p.pitch / 2.0;
        let half_d = p.rooms_z as f32 * p.pitch / 2.0;
        let bodies = generate(&spec(BuildingKind::Bank, 5));
        for debris in bodies.iter().filter(|b| b.part == StructurePart::Debris) {
            assert!(debris.position.x.abs() < half_w);
            assert!(debris.position.z.abs() < half_d);
        }
    }

    #[test]
    fn test_hash_jitter_bounded() {
        for seed in 0..1000u64 {
            let v = hash_jitter(seed);
            assert!((-0.5..0.5).contains(&v), "hash_jitter({}) = {}", seed, v);
        }
    }
}
