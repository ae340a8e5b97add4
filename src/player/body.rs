//! Kinematic character body.
//!
//! A capsule that moves by whatever displacement it is given and refuses to
//! sink into the top face of a collider it lands on. There is no sliding or
//! wall handling; the controller only ever needs floors.

use bevy::prelude::*;

use crate::player::ground::GroundCollider;

/// Tolerance for deciding the body started above a collider's top face.
const SKIN: f32 = 0.05;

/// Capsule dimensions. The entity's translation is the capsule centre.
/// `radius` sizes the capsule mesh; landing uses the footing passed
/// to [`CharacterBody::move_by`].
#[derive(Component, Debug, Clone, Copy)]
pub struct CharacterBody {
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self { radius: 0.5, height: 2.0 }
    }
}

impl CharacterBody {
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Apply `delta` starting at `from` and return the resolved position.
    ///
    /// The body only comes to rest on a top face that lies within `footing`
    /// of its centre line, measured horizontally to the closest point of the
    /// face. The controller passes the ground check radius here, so the body
    /// never rests where the ground check would report it airborne.
    ///
    /// # Arguments
    /// * `from` - current capsule centre
    /// * `delta` - requested world-space displacement
    /// * `footing` - horizontal reach of the feet
    /// * `colliders` - `(world position, collider)` pairs that can be stood on
    pub fn move_by<'a>(
        &self,
        from: Vec3,
        delta: Vec3,
        footing: f32,
        colliders: impl IntoIterator<Item = (Vec3, &'a GroundCollider)>,
    ) -> Vec3 {
        let mut to = from + delta;
        if delta.y >= 0.0 {
            return to;
        }

        let start_bottom = from.y - self.half_height();
        let feet = to.xz();
        for (pos, collider) in colliders {
            let min = pos - collider.half_extents;
            let max = pos + collider.half_extents;
            let closest = feet.clamp(min.xz(), max.xz());
            if closest.distance_squared(feet) > footing * footing || start_bottom < max.y - SKIN {
                continue;
            }
            let bottom = to.y - self.half_height();
            if bottom < max.y {
                to.y = max.y + self.half_height();
            }
        }
        to
    }
}
