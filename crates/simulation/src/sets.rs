//! Per-frame ordering contract via `SystemSet` phases.
//!
//! Within one frame the order is: input handling → state update → physics
//! step → render. The first two phases are these sets, chained in `Update`;
//! the physics step itself runs later in `PostUpdate` (rapier's default
//! placement), so a drag-cursor target written during [`SimulationSet::Input`]
//! is always consumed by the same frame's constraint solve.

use bevy::prelude::*;

/// Ordered phases for systems running in the `Update` schedule.
///
/// Configured as a chain: `Input` → `StateUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Pointer and keyboard handling: drag sessions, pause toggles.
    Input,
    /// State machines and world mutation: rebuilds, quake phases,
    /// scripted platform motion.
    StateUpdate,
}
