//! The per-frame controller system.
//!
//! Samples input, probes the ground, runs [`ControllerState::advance`] and
//! carries out its output: two body moves, facing, announcements, input
//! channel gating and cursor changes.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::player::PlayerController;
use crate::player::body::CharacterBody;
use crate::player::camera::{apply_cursor, top_rig, CameraRig};
use crate::player::events::{Announcer, AnimationCue, CameraModeOverride, InteractTriggered, MenuToggled};
use crate::player::ground::{sphere_overlaps_ground, FootAnchor, GroundCollider};
use crate::player::input::{InputBindings, InputChannels};
use crate::player::motion::{smooth_facing, CameraBasis};
use crate::player::setup::ControllerLinks;
use crate::player::state::{ControllerState, FrameContext, RigSlot, SideEffect};
use crate::settings::Settings;

/// Read-only inputs of the frame step.
#[derive(SystemParam)]
pub struct StepInputs<'w> {
    pub time: Res<'w, Time>,
    pub settings: Res<'w, Settings>,
    pub bindings: Res<'w, InputBindings>,
    pub keys: Res<'w, ButtonInput<KeyCode>>,
    pub mouse: Res<'w, ButtonInput<MouseButton>>,
}

/// Camera basis of whichever rig is live, falling back to the free rig.
fn view_basis(links: &ControllerLinks, rigs: &Query<(&CameraRig, &GlobalTransform)>) -> CameraBasis {
    let priorities = RigSlot::ALL.map(|slot| rigs.get(links.rig(slot)).map_or(0, |(rig, _)| rig.priority));
    let slot = top_rig(priorities).map_or(RigSlot::Free, |i| RigSlot::ALL[i]);
    rigs.get(links.rig(slot)).map_or_else(|_| CameraBasis::default(), |(_, tf)| CameraBasis::from_transform(tf))
}

/// Step every linked controller by one frame.
///
/// # Arguments
/// * `inputs` - time, settings, bindings and raw button state
/// * `channels` - input channel gate, toggled around the menu
/// * `players` - controllers with their body, transform and links
/// * `anchors` - foot anchor positions for the ground probe
/// * `colliders` - ground colliders for the probe and the body
/// * `rigs` - camera rigs, read for the view basis
/// * `windows` - primary window for cursor changes
/// * `announcer` - outgoing controller events
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn step_controllers(
    inputs: StepInputs<'_>,
    mut channels: ResMut<InputChannels>,
    mut players: Query<(Entity, &mut Transform, &mut PlayerController, &CharacterBody, &ControllerLinks)>,
    anchors: Query<&GlobalTransform, With<FootAnchor>>,
    colliders: Query<(&GlobalTransform, &GroundCollider)>,
    rigs: Query<(&CameraRig, &GlobalTransform)>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut announcer: Announcer<'_>,
) {
    let tuning = &inputs.settings.movement;
    let dt = inputs.time.delta_seconds();
    let ground: Vec<(Vec3, &GroundCollider)> = colliders.iter().map(|(tf, c)| (tf.translation(), c)).collect();

    for (entity, mut transform, mut controller, body, links) in &mut players {
        // A missing anchor was rejected at setup; if it was despawned since, fall back to the body's feet.
        let foot = anchors
            .get(links.foot)
            .map_or(transform.translation - Vec3::Y * body.half_height(), GlobalTransform::translation);
        let grounded = sphere_overlaps_ground(
            foot,
            tuning.ground_check_radius,
            tuning.ground_layers,
            ground.iter().copied(),
        );

        let input = inputs.bindings.sample(&channels, &inputs.keys, &inputs.mouse);
        let frame = FrameContext { dt, basis: view_basis(links, &rigs) };
        let out = controller.state.advance(&input, grounded, &frame, tuning);

        let footing = tuning.ground_check_radius;
        let after_horizontal = body.move_by(transform.translation, out.horizontal, footing, ground.iter().copied());
        transform.translation = body.move_by(after_horizontal, out.vertical, footing, ground.iter().copied());

        if let Some(heading) = out.facing_target {
            transform.rotation = smooth_facing(transform.rotation, heading, tuning.rotation_speed, dt);
        }

        for effect in out.effects {
            match effect {
                SideEffect::Cue(cue) => {
                    announcer.cues.send(AnimationCue { controller: entity, cue });
                }
                SideEffect::CameraSwitched { mode, priorities } => {
                    debug!("controller {entity:?} camera -> {mode:?} {priorities:?}");
                }
                SideEffect::AnnounceMenu { opening } => {
                    announcer.menu.send(MenuToggled { controller: entity, opened: opening });
                }
                SideEffect::MenuSwitched { open, cursor } => {
                    channels.set_gameplay(!open);
                    if let Ok(mut window) = windows.get_single_mut() {
                        apply_cursor(&mut window, cursor);
                    }
                    debug!("controller {entity:?} menu open: {open}");
                }
                SideEffect::AnnounceInteract => {
                    announcer.interact.send(InteractTriggered { controller: entity });
                }
            }
        }
    }
}

/// Apply camera-mode requests sent by other gameplay code.
pub fn apply_camera_overrides(
    mut requests: EventReader<CameraModeOverride>,
    mut controllers: Query<&mut PlayerController>,
) {
    for request in requests.read() {
        let Ok(mut controller) = controllers.get_mut(request.controller) else {
            warn!("camera override for unknown controller {:?}", request.controller);
            continue;
        };
        if let Some(mode) = controller.state.override_camera(request.request) {
            info!("controller {:?} camera overridden to {mode:?}", request.controller);
        }
    }
}

/// Snapshot of a controller's state for listeners and debug views.
#[must_use]
pub fn describe(state: &ControllerState) -> String {
    format!(
        "state: {:?}\ncamera: {:?}\ngrounded: {}\nvertical velocity: {:.2}",
        state.movement, state.camera, state.motion.grounded, state.motion.vertical_velocity
    )
}
