//! Startup systems for the demo scene.
//!
//! Spawns a floor with a few platforms to jump onto, the player capsule with
//! its foot anchor, the three camera rigs and a light. Everything that can be
//! stood on carries a `GroundCollider` matching its mesh.
use bevy::prelude::*;
use wayfarer::player::{
    CameraRig, CharacterBody, FootAnchor, GroundCollider, OrbitLook, PlayerController, RigSlot,
};

/// Platforms as `(centre, half extents)`.
const PLATFORMS: [(Vec3, Vec3); 4] = [
    (Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0)),
    (Vec3::new(4.0, 0.25, -4.0), Vec3::new(1.5, 0.25, 1.5)),
    (Vec3::new(-5.0, 0.4, -2.0), Vec3::new(2.0, 0.4, 1.0)),
    (Vec3::new(0.0, 0.3, -9.0), Vec3::new(1.0, 0.3, 1.0)),
];

/// Where the object-focus rig looks at.
const PEDESTAL: Vec3 = Vec3::new(0.0, 0.6, -9.0);

/// Spawn the demo scene.
///
/// # Arguments
/// - `commands`: Commands used to spawn entities.
/// - `meshes`: Asset storage for the floor, platform and capsule meshes.
/// - `materials`: Asset storage for their materials.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.5, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });

    for (centre, half) in PLATFORMS {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::from_size(half * 2.0)),
                material: ground_material.clone(),
                transform: Transform::from_translation(centre),
                ..default()
            },
            GroundCollider::new(half),
        ));
    }

    let body = CharacterBody::default();
    commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Capsule3d::new(body.radius, body.height - 2.0 * body.radius)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(0.8, 0.6, 0.3),
                    ..default()
                }),
                transform: Transform::from_xyz(0.0, 3.0, 4.0),
                ..default()
            },
            PlayerController::default(),
            body,
            Name::new("Player"),
        ))
        .with_children(|parent| {
            parent.spawn((
                FootAnchor,
                SpatialBundle::from_transform(Transform::from_xyz(0.0, -body.half_height(), 0.0)),
            ));
        });

    for slot in RigSlot::ALL {
        let transform = match slot {
            RigSlot::Object => Transform::from_xyz(2.0, 2.0, -6.0).looking_at(PEDESTAL, Vec3::Y),
            RigSlot::Free | RigSlot::LockOn => Transform::from_xyz(0.0, 4.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        };
        let mut rig = commands.spawn((
            Camera3dBundle {
                camera: Camera { is_active: slot == RigSlot::Free, ..default() },
                transform,
                ..default()
            },
            CameraRig::new(slot),
            Name::new(format!("{slot:?} rig")),
        ));
        if slot == RigSlot::Free {
            rig.insert(OrbitLook { yaw: 0.0, pitch: 0.35 });
        }
    }

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}
