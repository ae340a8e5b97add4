use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use wayfarer::debug::draw_ground_probe;
use wayfarer::player::{PlayerControllerPlugin, PlayerControllerSet};
use wayfarer::settings::loader as settings_loader;
use wayfarer::ui::{setup_debug_overlay, spawn_debug_overlay, toggle_debug_overlay, update_debug_overlay};

mod app;

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::settings_watcher_or_stub(settings_loader::SETTINGS_DIR);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Wayfarer".into(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.add_plugins(PlayerControllerPlugin);

    app.add_systems(Startup, (app::setup, setup_debug_overlay, spawn_debug_overlay));
    app.add_systems(PreUpdate, settings_loader::check_settings_changes);
    app.add_systems(Update, app::request_object_focus.before(PlayerControllerSet));
    app.add_systems(
        Update,
        (
            app::log_menu_toggles,
            app::log_interactions,
            app::log_animation_cues,
            draw_ground_probe,
            toggle_debug_overlay,
            update_debug_overlay,
        )
            .after(PlayerControllerSet),
    );

    app.run();
}
