//! Input sampling and channel gating.
//!
//! Every controller action reads through an [`InputChannel`]. A disabled
//! channel reads neutral: zero movement, no trigger, zero analog. Opening
//! the menu disables every channel but the menu one, which is how gameplay
//! input is locked out without removing any bindings.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::settings::Settings;

/// Input read fresh every frame; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// x = right, y = forward; length at most 1.
    pub movement: Vec2,
    pub jump: bool,
    pub interact: bool,
    pub menu: bool,
    /// Lock-on analog, 0 when released.
    pub lock: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    Movement,
    Jump,
    Lock,
    Interact,
    Menu,
}

impl InputChannel {
    pub const ALL: [InputChannel; 5] = [
        InputChannel::Movement,
        InputChannel::Jump,
        InputChannel::Lock,
        InputChannel::Interact,
        InputChannel::Menu,
    ];

    /// Everything the menu locks out.
    pub const GAMEPLAY: [InputChannel; 4] =
        [InputChannel::Movement, InputChannel::Jump, InputChannel::Lock, InputChannel::Interact];
}

/// Which channels currently deliver input. Starts with everything disabled;
/// controller setup enables them.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputChannels {
    enabled: HashSet<InputChannel>,
}

impl InputChannels {
    #[must_use]
    pub fn all_enabled() -> Self {
        Self { enabled: InputChannel::ALL.into_iter().collect() }
    }

    #[must_use]
    pub fn is_enabled(&self, channel: InputChannel) -> bool {
        self.enabled.contains(&channel)
    }

    pub fn set(&mut self, channels: &[InputChannel], enabled: bool) {
        for &channel in channels {
            if enabled {
                self.enabled.insert(channel);
            } else {
                self.enabled.remove(&channel);
            }
        }
    }

    /// Bulk toggle of the gameplay channels around the menu.
    pub fn set_gameplay(&mut self, enabled: bool) {
        self.set(&InputChannel::GAMEPLAY, enabled);
    }
}

/// A physical input an action can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl Binding {
    /// Parse a binding name: `MouseLeft` / `MouseRight` / `MouseMiddle`, or any
    /// key accepted by [`Settings::keycode_from_str`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Binding> {
        match name.trim().to_ascii_uppercase().as_str() {
            "MOUSELEFT" | "LMB" => Some(Binding::Mouse(MouseButton::Left)),
            "MOUSERIGHT" | "RMB" => Some(Binding::Mouse(MouseButton::Right)),
            "MOUSEMIDDLE" | "MMB" => Some(Binding::Mouse(MouseButton::Middle)),
            _ => Settings::keycode_from_str(name).map(Binding::Key),
        }
    }

    #[must_use]
    pub fn pressed(self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match self {
            Binding::Key(k) => keys.pressed(k),
            Binding::Mouse(b) => mouse.pressed(b),
        }
    }

    #[must_use]
    pub fn just_pressed(self, keys: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> bool {
        match self {
            Binding::Key(k) => keys.just_pressed(k),
            Binding::Mouse(b) => mouse.just_pressed(b),
        }
    }
}

/// Resolved bindings for every controller action.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InputBindings {
    pub forward: Binding,
    pub back: Binding,
    pub left: Binding,
    pub right: Binding,
    pub jump: Binding,
    pub interact: Binding,
    pub menu: Binding,
    pub lock: Binding,
    pub focus_object: Binding,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl InputBindings {
    /// Resolve bindings from settings; unknown or missing names fall back
    /// to the built-in default for that action.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let resolve = |action: &str, default: Binding| {
            match settings.keybind(action) {
                Some(name) => Binding::parse(name).unwrap_or_else(|| {
                    warn!("unknown binding '{name}' for '{action}', using {default:?}");
                    default
                }),
                None => default,
            }
        };
        Self {
            forward: resolve("forward", Binding::Key(KeyCode::KeyW)),
            back: resolve("back", Binding::Key(KeyCode::KeyS)),
            left: resolve("left", Binding::Key(KeyCode::KeyA)),
            right: resolve("right", Binding::Key(KeyCode::KeyD)),
            jump: resolve("jump", Binding::Key(KeyCode::Space)),
            interact: resolve("interact", Binding::Key(KeyCode::KeyE)),
            menu: resolve("menu", Binding::Key(KeyCode::Escape)),
            lock: resolve("lock", Binding::Mouse(MouseButton::Right)),
            focus_object: resolve("focus_object", Binding::Key(KeyCode::KeyF)),
        }
    }

    /// Read this frame's input through the enabled channels.
    ///
    /// # Arguments
    /// * `channels` - channel gate; disabled channels read neutral
    /// * `keys` - keyboard state
    /// * `mouse` - mouse button state
    #[must_use]
    pub fn sample(
        &self,
        channels: &InputChannels,
        keys: &ButtonInput<KeyCode>,
        mouse: &ButtonInput<MouseButton>,
    ) -> InputSnapshot {
        let held = |b: Binding| b.pressed(keys, mouse);
        let axis = |pos: Binding, neg: Binding| f32::from(u8::from(held(pos))) - f32::from(u8::from(held(neg)));
        let on = |c: InputChannel| channels.is_enabled(c);

        let movement = if on(InputChannel::Movement) {
            Vec2::new(axis(self.right, self.left), axis(self.forward, self.back)).clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };

        InputSnapshot {
            movement,
            jump: on(InputChannel::Jump) && self.jump.just_pressed(keys, mouse),
            interact: on(InputChannel::Interact) && self.interact.just_pressed(keys, mouse),
            menu: on(InputChannel::Menu) && self.menu.just_pressed(keys, mouse),
            lock: if on(InputChannel::Lock) && held(self.lock) { 1.0 } else { 0.0 },
        }
    }
}

/// Re-resolve bindings whenever the settings resource changes.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_input_bindings(settings: Res<Settings>, mut bindings: ResMut<InputBindings>) {
    if settings.is_changed() {
        bindings.set_if_neq(InputBindings::from_settings(&settings));
    }
}
