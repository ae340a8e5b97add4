//! Controller setup and teardown.
//!
//! A controller only starts stepping once its collaborators are resolved:
//! the foot anchor child used by the ground probe and the three camera rigs.
//! Missing collaborators abort the app instead of letting the character
//! run with degenerate motion.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use thiserror::Error;

use crate::player::PlayerController;
use crate::player::camera::{apply_cursor, CameraRig};
use crate::player::ground::FootAnchor;
use crate::player::input::InputChannels;
use crate::player::state::{CursorState, RigSlot};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ControllerSetupError {
    #[error("controller {0:?} has no child with a FootAnchor")]
    MissingFootAnchor(Entity),
    #[error("controller {controller:?} has {count} FootAnchor children, expected one")]
    AmbiguousFootAnchor { controller: Entity, count: usize },
    #[error("no camera rig for slot {0:?}")]
    MissingRig(RigSlot),
    #[error("more than one camera rig for slot {0:?}")]
    DuplicateRig(RigSlot),
}

/// Collaborators resolved for a controller at setup.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerLinks {
    pub foot: Entity,
    pub rigs: [Entity; 3],
}

impl ControllerLinks {
    #[must_use]
    pub fn rig(&self, slot: RigSlot) -> Entity {
        self.rigs[slot.index()]
    }
}

/// Resolve a controller's foot anchor and camera rigs.
///
/// # Arguments
/// * `controller` - the controller entity (used in error messages)
/// * `children` - its direct children
/// * `is_anchor` - whether an entity carries `FootAnchor`
/// * `rigs` - every camera rig in the world with its slot
///
/// # Errors
/// Returns a [`ControllerSetupError`] naming the first collaborator that is
/// missing or ambiguous.
pub fn resolve_links(
    controller: Entity,
    children: &[Entity],
    is_anchor: impl Fn(Entity) -> bool,
    rigs: &[(Entity, RigSlot)],
) -> Result<ControllerLinks, ControllerSetupError> {
    let anchors: Vec<Entity> = children.iter().copied().filter(|&e| is_anchor(e)).collect();
    let foot = match anchors.as_slice() {
        [] => return Err(ControllerSetupError::MissingFootAnchor(controller)),
        [one] => *one,
        many => {
            return Err(ControllerSetupError::AmbiguousFootAnchor { controller, count: many.len() });
        }
    };

    let mut resolved = [Entity::PLACEHOLDER; 3];
    for slot in RigSlot::ALL {
        let mut found = rigs.iter().filter(|(_, s)| *s == slot).map(|(e, _)| *e);
        resolved[slot.index()] = found.next().ok_or(ControllerSetupError::MissingRig(slot))?;
        if found.next().is_some() {
            return Err(ControllerSetupError::DuplicateRig(slot));
        }
    }

    Ok(ControllerLinks { foot, rigs: resolved })
}

/// Link every newly spawned controller to its collaborators.
///
/// On success all input channels are enabled and the gameplay cursor is
/// applied, unless an already linked controller has its menu open; then the
/// menu keeps its input lockout and cursor. On failure the error is logged
/// and the app is asked to exit.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn link_controllers(
    mut commands: Commands,
    unlinked: Query<(Entity, Option<&Children>), (With<PlayerController>, Without<ControllerLinks>)>,
    linked: Query<&PlayerController, With<ControllerLinks>>,
    anchors: Query<(), With<FootAnchor>>,
    rigs: Query<(Entity, &CameraRig)>,
    mut channels: ResMut<InputChannels>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut exit: EventWriter<AppExit>,
) {
    let rig_slots: Vec<(Entity, RigSlot)> = rigs.iter().map(|(e, rig)| (e, rig.slot)).collect();

    for (entity, children) in &unlinked {
        let children: &[Entity] = children.map(|c| &**c).unwrap_or_default();
        match resolve_links(entity, children, |e| anchors.contains(e), &rig_slots) {
            Ok(links) => {
                info!("player controller {entity:?} linked: foot {:?}, rigs {:?}", links.foot, links.rigs);
                commands.entity(entity).insert(links);
                if linked.iter().any(|c| c.state.menu_open()) {
                    debug!("menu open elsewhere, leaving input channels as they are");
                    continue;
                }
                *channels = InputChannels::all_enabled();
                if let Ok(mut window) = windows.get_single_mut() {
                    apply_cursor(&mut window, CursorState::GAMEPLAY);
                }
            }
            Err(e) => {
                error!("player controller setup failed: {e}");
                exit.send(AppExit::error());
            }
        }
    }
}

/// Disable every input channel when a controller goes away.
pub fn release_input_channels(
    mut removed: RemovedComponents<PlayerController>,
    mut channels: ResMut<InputChannels>,
) {
    if removed.read().count() > 0 {
        *channels = InputChannels::default();
        info!("player controller removed, input channels disabled");
    }
}
