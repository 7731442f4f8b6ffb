//! Visual attachment for physics bodies.
//!
//! The simulation spawns bare rigid bodies; this module watches for them via
//! `Added<StructureBody>` and bolts on meshes, materials, and ornament child
//! entities. Ornaments are pure decoration: children with no collider, so
//! they ride along with the body without changing its physics.

use bevy::prelude::*;

use simulation::catalog::MaterialKind;
use simulation::config::{PLATFORM_SIZE, PLATFORM_THICKNESS};
use simulation::structure::{GroundPlatform, StructureBody};

/// Shared PBR material handles, one per [`MaterialKind`].
#[derive(Resource)]
pub struct MaterialLibrary {
    concrete: Handle<StandardMaterial>,
    basement: Handle<StandardMaterial>,
    window: Handle<StandardMaterial>,
    steel: Handle<StandardMaterial>,
    debris: Handle<StandardMaterial>,
    ground: Handle<StandardMaterial>,
}

impl MaterialLibrary {
    pub fn handle(&self, kind: MaterialKind) -> Handle<StandardMaterial> {
        match kind {
            MaterialKind::Concrete => self.concrete.clone(),
            MaterialKind::Basement => self.basement.clone(),
            MaterialKind::Window => self.window.clone(),
            MaterialKind::Steel => self.steel.clone(),
            MaterialKind::Debris => self.debris.clone(),
            MaterialKind::Ground => self.ground.clone(),
        }
    }
}

impl FromWorld for MaterialLibrary {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self {
            concrete: materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.73, 0.70),
                perceptual_roughness: 0.9,
                ..default()
            }),
            basement: materials.add(StandardMaterial {
                base_color: Color::srgb(0.45, 0.44, 0.42),
                perceptual_roughness: 0.95,
                ..default()
            }),
            window: materials.add(StandardMaterial {
                base_color: Color::srgba(0.55, 0.75, 0.90, 0.35),
                alpha_mode: AlphaMode::Blend,
                perceptual_roughness: 0.1,
                metallic: 0.2,
                ..default()
            }),
            steel: materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.38, 0.42),
                perceptual_roughness: 0.4,
                metallic: 0.8,
                ..default()
            }),
            debris: materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.55, 0.3),
                perceptual_roughness: 0.8,
                ..default()
            }),
            ground: materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.45, 0.3),
                perceptual_roughness: 1.0,
                ..default()
            }),
        }
    }
}

/// Attach mesh, material, and ornament children to freshly spawned bodies.
pub fn attach_body_visuals(
    mut commands: Commands,
    new_bodies: Query<(Entity, &StructureBody), Added<StructureBody>>,
    mut meshes: ResMut<Assets<Mesh>>,
    library: Res<MaterialLibrary>,
) {
    for (entity, body) in &new_bodies {
        let placement = &body.placement;
        let extents = placement.extents;
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(extents.x, extents.y, extents.z))),
            MeshMaterial3d(library.handle(placement.material)),
        ));
        for ornament in &placement.ornaments {
            let child = commands
                .spawn((
                    Mesh3d(meshes.add(Cuboid::new(
                        ornament.extents.x,
                        ornament.extents.y,
                        ornament.extents.z,
                    ))),
                    MeshMaterial3d(library.handle(ornament.material)),
                    Transform::from_translation(ornament.offset)
                        .with_rotation(ornament.rotation),
                ))
                .id();
            commands.entity(entity).add_child(child);
        }
    }
}

/// The platform gets its slab mesh the same way.
pub fn attach_platform_visual(
    mut commands: Commands,
    platforms: Query<Entity, Added<GroundPlatform>>,
    mut meshes: ResMut<Assets<Mesh>>,
    library: Res<MaterialLibrary>,
) {
    for entity in &platforms {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(PLATFORM_SIZE, PLATFORM_THICKNESS, PLATFORM_SIZE))),
            MeshMaterial3d(library.handle(MaterialKind::Ground)),
        ));
    }
}
