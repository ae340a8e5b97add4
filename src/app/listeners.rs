//! Demo listeners for the controller's events.
//!
//! These stand in for the menu screen, interaction prompts and inventory
//! that would normally subscribe to the controller.
use bevy::prelude::*;
use wayfarer::player::{
    AnimationCue, CameraModeOverride, InputBindings, InputChannel, InputChannels, InteractTriggered,
    MenuToggled, ModeOverride, PlayerController,
};

#[allow(clippy::needless_pass_by_value)]
pub fn log_menu_toggles(mut events: EventReader<MenuToggled>, controllers: Query<&PlayerController>) {
    for ev in events.read() {
        let state = controllers.get(ev.controller).map(|c| c.state.movement).ok();
        info!("menu {} (controller state {state:?})", if ev.opened { "opened" } else { "closed" });
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn log_interactions(mut events: EventReader<InteractTriggered>, controllers: Query<&Transform, With<PlayerController>>) {
    for ev in events.read() {
        if let Ok(tf) = controllers.get(ev.controller) {
            info!("interact at {:.1?}", tf.translation);
        }
    }
}

pub fn log_animation_cues(mut events: EventReader<AnimationCue>) {
    for ev in events.read() {
        debug!("animation cue {:?} for {:?}", ev.cue, ev.controller);
    }
}

/// Toggle object focus from the keyboard, the way an inventory screen would.
///
/// Ignored while gameplay input is locked out by the menu.
#[allow(clippy::needless_pass_by_value)]
pub fn request_object_focus(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<InputBindings>,
    channels: Res<InputChannels>,
    controllers: Query<Entity, With<PlayerController>>,
    mut overrides: EventWriter<CameraModeOverride>,
) {
    if !channels.is_enabled(InputChannel::Interact) || !bindings.focus_object.just_pressed(&keys, &mouse) {
        return;
    }
    for controller in &controllers {
        overrides.send(CameraModeOverride { controller, request: ModeOverride::ToggleObjectFocus });
    }
}
