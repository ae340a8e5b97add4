//! Third-person player controller: state machine, motion, camera rigs.
//!
//! The decision logic lives in [`state`] and [`motion`] and is plain Rust over
//! `bevy::math` types. The remaining modules are the Bevy glue that samples
//! input, probes the ground, moves the body and announces events.
//!
//! # Example:
//!
//! ```ignore
//! app.add_plugins(PlayerControllerPlugin);
//! commands
//!     .spawn((PlayerController::default(), CharacterBody::default(), SpatialBundle::default()))
//!     .with_children(|p| {
//!         p.spawn((FootAnchor, SpatialBundle::from_transform(Transform::from_xyz(0.0, -1.0, 0.0))));
//!     });
//! for slot in RigSlot::ALL {
//!     commands.spawn((CameraRig::new(slot), Camera3dBundle::default()));
//! }
//! ```
pub mod body;
pub mod camera;
pub mod controller;
pub mod events;
pub mod ground;
pub mod input;
pub mod motion;
pub mod setup;
pub mod state;

use bevy::prelude::*;

pub use body::CharacterBody;
pub use camera::{CameraRig, OrbitLook};
pub use controller::{apply_camera_overrides, step_controllers};
pub use events::{AnimationCue, CameraModeOverride, InteractTriggered, MenuToggled};
pub use ground::{CollisionLayers, FootAnchor, GroundCollider};
pub use input::{InputBindings, InputChannel, InputChannels, InputSnapshot};
pub use setup::{ControllerLinks, ControllerSetupError};
pub use state::{CameraMode, ControllerState, Cue, ModeOverride, MovementState, RigSlot};

/// The player controller. Holds everything the state machine remembers
/// between frames; the rest is recomputed every frame.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerController {
    pub state: ControllerState,
}

/// Systems of the controller, chained in frame order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerControllerSet;

/// Registers the controller's events, resources and systems.
///
/// Expects `Time`, `ButtonInput<KeyCode>`, `ButtonInput<MouseButton>` and
/// `MouseMotion` events to be provided by the host (the default plugins do).
pub struct PlayerControllerPlugin;

impl Plugin for PlayerControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::settings::Settings>()
            .init_resource::<InputChannels>()
            .init_resource::<InputBindings>()
            .add_event::<MenuToggled>()
            .add_event::<InteractTriggered>()
            .add_event::<AnimationCue>()
            .add_event::<CameraModeOverride>()
            .add_systems(
                Update,
                (
                    input::sync_input_bindings,
                    setup::link_controllers,
                    setup::release_input_channels,
                    camera::orbit_free_rig,
                    apply_camera_overrides,
                    step_controllers,
                    camera::sync_rig_priorities,
                    camera::activate_top_rig,
                    camera::follow_rigs,
                )
                    .chain()
                    .in_set(PlayerControllerSet),
            );
    }
}
