//! Camera rigs, mouse orbit and cursor helpers.
//!
//! The player has three rigs (free orbit, lock-on, object focus). Each rig
//! carries an integer priority; the rig with the highest positive priority
//! is the active Bevy camera. Priorities are rewritten from the controller's
//! camera mode through [`camera_priorities`], never patched incrementally.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::player::PlayerController;
use crate::player::setup::ControllerLinks;
use crate::player::state::{camera_priorities, CursorState, RigSlot};
use crate::settings::{CameraSettings, Settings};

/// One of the player's camera rigs.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRig {
    pub slot: RigSlot,
    pub priority: i32,
}

impl CameraRig {
    #[must_use]
    pub fn new(slot: RigSlot) -> Self {
        Self { slot, priority: 0 }
    }
}

/// Accumulated orbit angles for the free rig, in radians.
///
/// - `yaw`: horizontal rotation around the Y axis.
/// - `pitch`: vertical angle, positive looks down on the player.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct OrbitLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitLook {
    /// Apply a raw mouse delta (updates yaw/pitch and clamps pitch).
    pub fn apply_delta(&mut self, delta: Vec2, settings: &CameraSettings) {
        let max_pitch = settings.max_pitch_deg.to_radians();
        let scale = settings.mouse_sensitivity / 1000.0;
        let dx = if settings.invert_x { -delta.x } else { delta.x };
        let dy = if settings.invert_y { -delta.y } else { delta.y };

        self.yaw -= dx * scale;
        self.pitch = (self.pitch + dy * scale).clamp(-max_pitch, max_pitch);
    }

    /// Rig position relative to the point it orbits.
    #[must_use]
    pub fn offset(&self, distance: f32) -> Vec3 {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0) * Vec3::new(0.0, 0.0, distance)
    }
}

/// Index of the rig that should be live, or `None` if no rig has a positive
/// priority. The first slot wins a tie.
#[must_use]
pub fn top_rig(priorities: impl IntoIterator<Item = i32>) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (i, p) in priorities.into_iter().enumerate() {
        if p > 0 && best.is_none_or(|(_, b)| p > b) {
            best = Some((i, p));
        }
    }
    best.map(|(i, _)| i)
}

/// Rewrite each linked rig's priority from its controller's camera mode.
///
/// Controllers in `Cutscene` are skipped.
pub fn sync_rig_priorities(
    controllers: Query<(&PlayerController, &ControllerLinks)>,
    mut rigs: Query<&mut CameraRig>,
) {
    for (controller, links) in &controllers {
        // cutscenes leave the rigs as they were
        let Some(table) = camera_priorities(controller.state.camera) else { continue };
        for slot in RigSlot::ALL {
            if let Ok(mut rig) = rigs.get_mut(links.rig(slot)) {
                let desired = table[slot.index()];
                if rig.priority != desired {
                    rig.priority = desired;
                }
            }
        }
    }
}

/// Activate the Bevy camera of the highest-priority rig.
pub fn activate_top_rig(mut rigs: Query<(&CameraRig, &mut Camera)>) {
    let winner = top_rig(rigs.iter().map(|(rig, _)| rig.priority));
    for (i, (_, mut camera)) in rigs.iter_mut().enumerate() {
        let active = Some(i) == winner;
        if camera.is_active != active {
            camera.is_active = active;
        }
    }
}

/// Feed mouse motion into the free rig's orbit while the cursor is captured.
///
/// # Arguments
/// * `windows` - primary window, used to skip input while the cursor is visible
/// * `motion` - mouse motion events for this update
/// * `rigs` - free rigs to rotate
#[allow(clippy::needless_pass_by_value)]
pub fn orbit_free_rig(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut motion: EventReader<MouseMotion>,
    settings: Res<Settings>,
    mut rigs: Query<(&CameraRig, &mut OrbitLook)>,
) {
    let delta: Vec2 = motion.read().map(|ev| ev.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }
    if windows.get_single().is_ok_and(|w| w.cursor.visible) {
        return;
    }
    for (rig, mut look) in &mut rigs {
        if rig.slot == RigSlot::Free {
            look.apply_delta(delta, &settings.camera);
        }
    }
}

/// Place the free and lock-on rigs around their player.
///
/// The free rig orbits the player's head; the lock-on rig sits behind the
/// player's facing. The object rig is left where the scene put it.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_rigs(
    settings: Res<Settings>,
    players: Query<(&Transform, &ControllerLinks), Without<CameraRig>>,
    mut rigs: Query<(&CameraRig, &mut Transform, Option<&OrbitLook>)>,
) {
    let cam = &settings.camera;
    for (player, links) in &players {
        let focus = player.translation + Vec3::Y * cam.eye_height;

        if let Ok((_, mut tf, look)) = rigs.get_mut(links.rig(RigSlot::Free)) {
            let look = look.copied().unwrap_or_default();
            tf.translation = focus + look.offset(cam.orbit_distance);
            tf.look_at(focus, Vec3::Y);
        }

        if let Ok((_, mut tf, _)) = rigs.get_mut(links.rig(RigSlot::LockOn)) {
            let behind = player.rotation * Vec3::Z * cam.lock_distance;
            tf.translation = focus + behind + Vec3::Y * 0.5;
            tf.look_at(focus + player.rotation * Vec3::NEG_Z * 10.0, Vec3::Y);
        }
    }
}

/// Apply a cursor state to a window.
pub fn apply_cursor(window: &mut Window, cursor: CursorState) {
    window.cursor.grab_mode = cursor.grab;
    window.cursor.visible = cursor.visible;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_rig_prefers_highest_positive() {
        assert_eq!(top_rig([1, 0, 0]), Some(0));
        assert_eq!(top_rig([0, 1, 0]), Some(1));
        assert_eq!(top_rig([0, 2, 3]), Some(2));
        assert_eq!(top_rig([1, 1, 0]), Some(0));
        assert_eq!(top_rig([0, 0, 0]), None);
        assert_eq!(top_rig([-1, 0, -5]), None);
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let settings = CameraSettings::default();
        let mut look = OrbitLook::default();
        look.apply_delta(Vec2::new(0.0, 1.0e6), &settings);
        assert!((look.pitch - settings.max_pitch_deg.to_radians()).abs() < 1e-5);
        look.apply_delta(Vec2::new(0.0, -1.0e7), &settings);
        assert!((look.pitch + settings.max_pitch_deg.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn orbit_respects_inverted_axes() {
        let mut settings = CameraSettings::default();
        let mut normal = OrbitLook::default();
        normal.apply_delta(Vec2::new(10.0, 10.0), &settings);

        settings.invert_x = true;
        settings.invert_y = true;
        let mut inverted = OrbitLook::default();
        inverted.apply_delta(Vec2::new(10.0, 10.0), &settings);

        assert!((normal.yaw + inverted.yaw).abs() < 1e-6);
        assert!((normal.pitch + inverted.pitch).abs() < 1e-6);
    }

    #[test]
    fn default_orbit_sits_behind_player() {
        let offset = OrbitLook::default().offset(6.0);
        assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, 6.0), 1e-5));

        let raised = OrbitLook { yaw: 0.0, pitch: 0.5 }.offset(6.0);
        assert!(raised.y > 0.0);
    }
}
