//! Gizmo helpers for tuning the controller in the editor-less demo.
use bevy::prelude::*;

use crate::player::ground::FootAnchor;
use crate::player::PlayerController;
use crate::player::setup::ControllerLinks;
use crate::settings::Settings;

/// Draw the ground probe sphere at every linked controller's foot anchor.
///
/// Yellow while grounded, red while airborne.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_ground_probe(
    settings: Res<Settings>,
    mut gizmos: Gizmos,
    controllers: Query<(&PlayerController, &ControllerLinks)>,
    anchors: Query<&GlobalTransform, With<FootAnchor>>,
) {
    if !settings.debug.draw_ground_probe {
        return;
    }
    let radius = settings.movement.ground_check_radius;
    for (controller, links) in &controllers {
        let Ok(anchor) = anchors.get(links.foot) else { continue };
        let color = if controller.state.motion.grounded {
            Color::srgb(1.0, 1.0, 0.0)
        } else {
            Color::srgb(1.0, 0.2, 0.2)
        };
        gizmos.sphere(anchor.translation(), Quat::IDENTITY, radius, color);
    }
}
