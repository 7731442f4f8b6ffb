//! World-scale constants shared across crates.
//!
//! All lengths are in meters, masses in kilograms. These are gameplay
//! numbers, not engineering numbers: they are tuned so structures stand
//! under gravity but come apart convincingly under excitation.

/// Vertical extent of one story, slab included.
pub const STORY_HEIGHT: f32 = 3.0;

/// Thickness of a floor slab.
pub const SLAB_THICKNESS: f32 = 0.3;

/// Thickness of a perimeter wall panel.
pub const WALL_THICKNESS: f32 = 0.12;

/// Edge length of a loose debris cube.
pub const DEBRIS_SIZE: f32 = 0.35;

/// Uniform gameplay density used to derive body masses from volume.
/// Thin parts (the simple frame's pillars) end up light and fragile
/// without any per-part special casing.
pub const BODY_DENSITY: f32 = 150.0;

/// Basement bodies (story 0 of apartment/bank) are this much heavier,
/// anchoring the structure to the shaking ground.
pub const BASEMENT_MASS_MULTIPLIER: f32 = 2.5;

/// Damping applied to every dynamic body.
pub const LINEAR_DAMPING: f32 = 0.05;
pub const ANGULAR_DAMPING: f32 = 0.08;

/// Kinematic ground platform the whole scene rests on.
pub const PLATFORM_SIZE: f32 = 60.0;
pub const PLATFORM_THICKNESS: f32 = 1.0;
/// Rest pose puts the platform's top face at y = 0.
pub const PLATFORM_REST_Y: f32 = -PLATFORM_THICKNESS / 2.0;
