//! Motion integration: ground snap, gravity, jump impulse and facing.
//!
//! Headings are expressed in degrees, clockwise when seen from above, with
//! 0 meaning world forward (-Z). This matches how the camera yaw is read
//! from its transform, so "input angle + camera yaw" composes directly.

use bevy::math::{Quat, Vec2, Vec3};
use bevy::transform::components::GlobalTransform;

use crate::player::state::CameraMode;

/// Vertical velocity a grounded character rests at. Slightly negative so
/// the body keeps pressing into the floor and the probe stays in contact.
pub const GROUND_SNAP_VELOCITY: f32 = -2.0;

/// Folds the `2` of `v = sqrt(2gh)` together with the sign of a negative
/// gravity into one factor.
pub const JUMP_CONST: f32 = -3.0;

/// Camera orientation the input is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub yaw_degrees: f32,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self { forward: Vec3::NEG_Z, right: Vec3::X, yaw_degrees: 0.0 }
    }
}

impl CameraBasis {
    #[must_use]
    pub fn from_transform(tf: &GlobalTransform) -> Self {
        let forward: Vec3 = tf.forward().into();
        let right: Vec3 = tf.right().into();
        Self { forward, right, yaw_degrees: yaw_degrees(forward) }
    }
}

/// Heading of a direction vector, ignoring its vertical component.
#[must_use]
pub fn yaw_degrees(forward: Vec3) -> f32 {
    forward.x.atan2(-forward.z).to_degrees()
}

/// Rotation about +Y that faces the given heading.
#[must_use]
pub fn facing_rotation(heading_degrees: f32) -> Quat {
    Quat::from_rotation_y(-heading_degrees.to_radians())
}

/// Clamp a falling velocity to [`GROUND_SNAP_VELOCITY`] while grounded.
#[must_use]
pub fn ground_snap(vertical_velocity: f32, grounded: bool) -> f32 {
    if grounded && vertical_velocity < 0.0 { GROUND_SNAP_VELOCITY } else { vertical_velocity }
}

/// Planar displacement for this frame.
///
/// The camera basis is combined first and the vertical part dropped
/// afterwards, so a pitched camera walks slower.
#[must_use]
pub fn horizontal_displacement(input: Vec2, basis: &CameraBasis, speed: f32, dt: f32) -> Vec3 {
    let mut dir = basis.forward * input.y + basis.right * input.x;
    dir.y = 0.0;
    dir * dt * speed
}

/// Upward velocity that reaches `jump_height` under `gravity` (negative).
#[must_use]
pub fn jump_impulse(jump_height: f32, gravity: f32) -> f32 {
    (jump_height * JUMP_CONST * gravity).max(0.0).sqrt()
}

#[must_use]
pub fn apply_gravity(vertical_velocity: f32, gravity: f32, dt: f32) -> f32 {
    vertical_velocity + gravity * dt
}

#[must_use]
pub fn vertical_displacement(vertical_velocity: f32, dt: f32) -> Vec3 {
    Vec3::new(0.0, vertical_velocity * dt, 0.0)
}

/// Heading the character should turn toward while moving.
///
/// Free camera: input direction relative to the camera. Lock-on: the camera
/// heading itself, so the character strafes. Other modes face world forward.
#[must_use]
pub fn heading_target(input: Vec2, mode: CameraMode, camera_yaw_degrees: f32) -> f32 {
    match mode {
        CameraMode::Free => input.x.atan2(input.y).to_degrees() + camera_yaw_degrees,
        CameraMode::LockOn => camera_yaw_degrees,
        CameraMode::Cutscene | CameraMode::OnObject => 0.0,
    }
}

/// Turn `current` part of the way toward `heading_degrees`.
///
/// The blend factor is `rotation_speed * dt`, clamped to `[0, 1]`.
#[must_use]
pub fn smooth_facing(current: Quat, heading_degrees: f32, rotation_speed: f32, dt: f32) -> Quat {
    let t = (rotation_speed * dt).clamp(0.0, 1.0);
    current.slerp(facing_rotation(heading_degrees), t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::transform::components::Transform;

    const EPS: f32 = 1e-4;

    #[test]
    fn snap_only_applies_when_grounded_and_falling() {
        assert_eq!(ground_snap(-30.0, true), GROUND_SNAP_VELOCITY);
        assert_eq!(ground_snap(-30.0, false), -30.0);
        assert_eq!(ground_snap(5.0, true), 5.0);
        assert_eq!(ground_snap(0.0, true), 0.0);
    }

    #[test]
    fn jump_impulse_matches_kinematics() {
        // sqrt(1 * -3 * -100)
        assert!((jump_impulse(1.0, -100.0) - 300.0_f32.sqrt()).abs() < EPS);
        assert_eq!(jump_impulse(0.0, -100.0), 0.0);
    }

    #[test]
    fn horizontal_motion_is_planar_and_scaled() {
        let basis = CameraBasis {
            forward: Vec3::new(0.0, -0.6, -0.8),
            right: Vec3::X,
            yaw_degrees: 0.0,
        };
        let d = horizontal_displacement(Vec2::new(1.0, 1.0), &basis, 2.0, 0.5);
        assert_eq!(d.y, 0.0);
        assert!((d.x - 1.0).abs() < EPS);
        assert!((d.z + 0.8).abs() < EPS);
    }

    #[test]
    fn heading_in_free_mode_adds_camera_yaw() {
        assert!(heading_target(Vec2::new(0.0, 1.0), CameraMode::Free, 0.0).abs() < EPS);
        assert!((heading_target(Vec2::new(1.0, 0.0), CameraMode::Free, 0.0) - 90.0).abs() < EPS);
        assert!((heading_target(Vec2::new(0.0, 1.0), CameraMode::Free, 45.0) - 45.0).abs() < EPS);
        assert!((heading_target(Vec2::new(0.0, -1.0), CameraMode::Free, 0.0).abs() - 180.0).abs() < EPS);
    }

    #[test]
    fn heading_in_lock_on_is_camera_yaw() {
        assert_eq!(heading_target(Vec2::new(1.0, 0.0), CameraMode::LockOn, 30.0), 30.0);
        assert_eq!(heading_target(Vec2::new(1.0, 0.0), CameraMode::OnObject, 30.0), 0.0);
    }

    #[test]
    fn facing_rotation_points_toward_heading() {
        let right: Vec3 = facing_rotation(90.0) * Vec3::NEG_Z;
        assert!(right.abs_diff_eq(Vec3::X, EPS));
        assert!((yaw_degrees(right) - 90.0).abs() < EPS);
        assert!(yaw_degrees(Vec3::NEG_Z).abs() < EPS);
    }

    #[test]
    fn camera_basis_reads_yaw_from_transform() {
        let tf = Transform::from_rotation(facing_rotation(-60.0));
        let basis = CameraBasis::from_transform(&GlobalTransform::from(tf));
        assert!((basis.yaw_degrees + 60.0).abs() < EPS);
        assert!(basis.right.abs_diff_eq(facing_rotation(30.0) * Vec3::NEG_Z, EPS));
    }

    #[test]
    fn smoothing_is_partial_and_clamped() {
        let start = Quat::IDENTITY;
        let half = smooth_facing(start, 90.0, 4.0, 0.125);
        let angle = half.angle_between(facing_rotation(90.0));
        assert!(angle > 0.1 && angle < std::f32::consts::FRAC_PI_2);

        let full = smooth_facing(start, 90.0, 4.0, 10.0);
        assert!(full.abs_diff_eq(facing_rotation(90.0), EPS));
    }
}
