//! Debug overlay showing the controller's state.
//!
//! A single text node in the top-left corner, toggled with the
//! `toggle_debug` binding (F1 by default). It is refreshed on a short timer
//! rather than every frame.

use crate::player::controller::describe;
use crate::player::PlayerController;
use crate::settings::Settings;
use bevy::prelude::*;

/// How often the overlay text is rebuilt, in seconds.
const REFRESH_SECS: f32 = 0.1;

/// Whether the overlay is shown. Seeded from `debug.show_overlay`.
#[derive(Resource, Default)]
pub struct OverlayVisibility(pub bool);

#[derive(Resource)]
pub struct OverlayRefresh(pub Timer);

impl Default for OverlayRefresh {
    fn default() -> Self {
        Self(Timer::from_seconds(REFRESH_SECS, TimerMode::Repeating))
    }
}

#[derive(Component)]
pub struct ControllerReadout;

/// Seed the overlay resources from the loaded settings.
#[allow(clippy::needless_pass_by_value)]
pub fn setup_debug_overlay(mut commands: Commands, settings: Res<Settings>) {
    commands.init_resource::<OverlayRefresh>();
    commands.insert_resource(OverlayVisibility(settings.debug.show_overlay));
}

pub fn spawn_debug_overlay(mut commands: Commands) {
    let style = TextStyle { font_size: 16.0, color: Color::srgb(0.9, 0.95, 0.6), ..default() };
    commands.spawn((
        TextBundle::from_section("", style).with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            ..default()
        }),
        ControllerReadout,
        Name::new("controller readout"),
    ));
}

/// Flip overlay visibility on the `toggle_debug` binding.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut shown: ResMut<OverlayVisibility>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let key = settings
        .keybind("toggle_debug")
        .and_then(Settings::keycode_from_str)
        .unwrap_or(KeyCode::F1);
    if keys.just_pressed(key) {
        shown.0 = !shown.0;
    }
}

/// Rewrite the readout with one block per controller.
///
/// # Arguments
/// * `time` - drives the refresh timer
/// * `refresh` - refresh timer
/// * `shown` - overlay visibility; a hidden overlay has empty text
/// * `readout` - the overlay text node
/// * `players` - controllers to describe
#[allow(clippy::needless_pass_by_value)]
pub fn update_debug_overlay(
    time: Res<Time>,
    mut refresh: ResMut<OverlayRefresh>,
    shown: Res<OverlayVisibility>,
    mut readout: Query<&mut Text, With<ControllerReadout>>,
    players: Query<(&PlayerController, &Transform)>,
) {
    if !refresh.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok(mut text) = readout.get_single_mut() else { return };

    let body = if shown.0 {
        players
            .iter()
            .map(|(controller, tf)| {
                let p = tf.translation;
                format!("{}\nposition: {:.2} {:.2} {:.2}", describe(&controller.state), p.x, p.y, p.z)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    } else {
        String::new()
    };
    text.sections[0].value = body;
}
