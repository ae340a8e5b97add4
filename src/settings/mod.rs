//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `hotload::setup_ron_watcher`).
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::player::ground::CollisionLayers;

/// Character motion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default = "MovementSettings::default_speed")]
    pub speed: f32, // Horizontal speed in world units per second.
    #[serde(default = "MovementSettings::default_jump_height")]
    pub jump_height: f32, // Desired jump apex height.
    #[serde(default = "MovementSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration, negative is down.
    #[serde(default = "MovementSettings::default_rotation_speed")]
    pub rotation_speed: f32, // Facing blend rate per second.
    #[serde(default = "MovementSettings::default_ground_check_radius")]
    pub ground_check_radius: f32, // Radius of the sphere probed at the foot anchor.
    #[serde(default)]
    pub ground_layers: CollisionLayers, // Collider layers that count as ground.
}

impl MovementSettings {
    fn default_speed() -> f32 { 2.0 }
    fn default_jump_height() -> f32 { 1.0 }
    fn default_gravity() -> f32 { -100.0 }
    fn default_rotation_speed() -> f32 { 4.0 }
    fn default_ground_check_radius() -> f32 { 0.4 }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: Self::default_speed(),
            jump_height: Self::default_jump_height(),
            gravity: Self::default_gravity(),
            rotation_speed: Self::default_rotation_speed(),
            ground_check_radius: Self::default_ground_check_radius(),
            ground_layers: CollisionLayers::default(),
        }
    }
}

/// Camera rig placement and mouse look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse sensitivity multiplier for the free rig
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default)]
    pub invert_y: bool,
    #[serde(default = "CameraSettings::default_orbit_distance")]
    pub orbit_distance: f32, // Distance of the free rig from the player
    #[serde(default = "CameraSettings::default_lock_distance")]
    pub lock_distance: f32, // Distance of the lock-on rig behind the player
    #[serde(default = "CameraSettings::default_eye_height")]
    pub eye_height: f32, // Point above the player origin both rigs look at
    #[serde(default = "CameraSettings::default_max_pitch")]
    pub max_pitch_deg: f32,
}

impl CameraSettings {
    fn default_sensitivity() -> f32 { 1.0 }
    fn default_orbit_distance() -> f32 { 6.0 }
    fn default_lock_distance() -> f32 { 4.0 }
    fn default_eye_height() -> f32 { 1.5 }
    fn default_max_pitch() -> f32 { 70.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: Self::default_sensitivity(),
            invert_x: false,
            invert_y: false,
            orbit_distance: Self::default_orbit_distance(),
            lock_distance: Self::default_lock_distance(),
            eye_height: Self::default_eye_height(),
            max_pitch_deg: Self::default_max_pitch(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("interact", "E"),
            ("menu", "Escape"),
            ("lock", "MouseRight"),
            ("focus_object", "F"),
            ("toggle_debug", "F1"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { keybinds: Self::default_keybinds() }
    }
}

/// Developer aids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    #[serde(default = "DebugSettings::default_draw_ground_probe")]
    pub draw_ground_probe: bool, // Draw the ground probe sphere as a gizmo
    #[serde(default)]
    pub show_overlay: bool, // Start with the state overlay visible
}

impl DebugSettings {
    fn default_draw_ground_probe() -> bool { true }
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { draw_ground_probe: Self::default_draw_ground_probe(), show_overlay: false }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

/// Named keys accepted in `controls.keybinds`, besides single letters and digits.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("SPACE", KeyCode::Space),
    ("ESC", KeyCode::Escape),
    ("ESCAPE", KeyCode::Escape),
    ("TAB", KeyCode::Tab),
    ("ENTER", KeyCode::Enter),
    ("RETURN", KeyCode::Enter),
    ("BACKSPACE", KeyCode::Backspace),
    ("LSHIFT", KeyCode::ShiftLeft),
    ("SHIFT", KeyCode::ShiftLeft),
    ("RSHIFT", KeyCode::ShiftRight),
    ("LCTRL", KeyCode::ControlLeft),
    ("CTRL", KeyCode::ControlLeft),
    ("RCTRL", KeyCode::ControlRight),
    ("LALT", KeyCode::AltLeft),
    ("ALT", KeyCode::AltLeft),
    ("RALT", KeyCode::AltRight),
    ("UP", KeyCode::ArrowUp),
    ("DOWN", KeyCode::ArrowDown),
    ("LEFT", KeyCode::ArrowLeft),
    ("RIGHT", KeyCode::ArrowRight),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
];

const LETTER_KEYS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE, KeyCode::KeyF,
    KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL,
    KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO, KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR,
    KeyCode::KeyS, KeyCode::KeyT, KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX,
    KeyCode::KeyY, KeyCode::KeyZ,
];

const DIGIT_KEYS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Look up the binding string for an action.
    #[must_use]
    pub fn keybind(&self, action: &str) -> Option<&str> {
        self.controls.keybinds.get(action).map(String::as_str)
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTER_KEYS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGIT_KEYS[(c as u8 - b'0') as usize]);
            }
        }
        NAMED_KEYS.iter().find(|(n, _)| *n == s).map(|(_, k)| *k)
    }
}

pub mod loader;
