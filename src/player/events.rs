//! Controller notifications.
//!
//! Events are registered on the `App` by the controller plugin, so every app
//! (and every test app) gets its own channels. Listeners read them with an
//! `EventReader` later in the same frame and can look the controller up by
//! entity to query its current state.

use bevy::prelude::*;

use crate::player::state::{Cue, ModeOverride};

/// The menu trigger fired. `opened` is true when the menu just opened.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuToggled {
    pub controller: Entity,
    pub opened: bool,
}

/// The interact trigger fired.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractTriggered {
    pub controller: Entity,
}

/// Animation hook raised by a state transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCue {
    pub controller: Entity,
    pub cue: Cue,
}

/// Inbound request from other gameplay code (inventory, cutscenes) to change
/// a controller's camera mode.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraModeOverride {
    pub controller: Entity,
    pub request: ModeOverride,
}

/// Writers for everything the controller announces.
#[derive(bevy::ecs::system::SystemParam)]
pub struct Announcer<'w> {
    pub menu: EventWriter<'w, MenuToggled>,
    pub interact: EventWriter<'w, InteractTriggered>,
    pub cues: EventWriter<'w, AnimationCue>,
}
