//! Ground detection: a sphere at the character's feet against ground colliders.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Bitmask of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    pub const NONE: CollisionLayers = CollisionLayers(0);
    pub const GROUND: CollisionLayers = CollisionLayers(1);
    pub const ALL: CollisionLayers = CollisionLayers(u32::MAX);

    #[must_use]
    pub const fn intersects(self, other: CollisionLayers) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::GROUND
    }
}

/// Axis-aligned box collider centred on the entity's global translation.
/// Rotation is ignored.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundCollider {
    pub half_extents: Vec3,
    pub layers: CollisionLayers,
}

impl GroundCollider {
    #[must_use]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents, layers: CollisionLayers::GROUND }
    }
}

/// Marks the child entity whose position the ground probe is centred on.
#[derive(Component, Debug, Default)]
pub struct FootAnchor;

/// Sphere vs axis-aligned box overlap (touching counts).
#[must_use]
pub fn sphere_overlaps_box(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> bool {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    closest.distance_squared(center) <= radius * radius
}

/// Whether a sphere touches any collider on one of the `mask` layers.
///
/// # Arguments
/// * `center` - probe centre (the foot anchor)
/// * `radius` - probe radius
/// * `mask` - layers that count as ground
/// * `colliders` - `(world position, collider)` pairs to test
pub fn sphere_overlaps_ground<'a>(
    center: Vec3,
    radius: f32,
    mask: CollisionLayers,
    colliders: impl IntoIterator<Item = (Vec3, &'a GroundCollider)>,
) -> bool {
    colliders.into_iter().any(|(pos, collider)| {
        collider.layers.intersects(mask) && sphere_overlaps_box(center, radius, pos, collider.half_extents)
    })
}
