//! Movement / camera state machine.
//!
//! `ControllerState::advance` runs one frame of the controller: it takes the
//! sampled input and grounded flag, updates the movement state, camera mode
//! and vertical velocity, and returns the displacements to apply plus an
//! ordered list of side effects for the Bevy glue to carry out. Nothing in
//! here touches the ECS, which keeps the whole frame step testable and
//! benchmarkable without an `App`.

use bevy::math::{Vec2, Vec3};
use bevy::window::CursorGrabMode;

use crate::player::input::InputSnapshot;
use crate::player::motion::{self, CameraBasis};
use crate::settings::MovementSettings;

/// Locomotion state of the character. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    #[default]
    Idle,
    Move,
    /// Reserved: no transition enters it yet.
    Crouch,
    Jump,
    OnMenu,
    /// Reserved for scripted sequences driven from outside the controller.
    OnCutscene,
}

/// Which camera rig the player is looking through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraMode {
    #[default]
    Free,
    LockOn,
    Cutscene,
    /// Only reachable through [`ControllerState::override_camera`].
    OnObject,
}

/// The three player camera rigs, in priority-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigSlot {
    Free,
    LockOn,
    Object,
}

impl RigSlot {
    pub const ALL: [RigSlot; 3] = [RigSlot::Free, RigSlot::LockOn, RigSlot::Object];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            RigSlot::Free => 0,
            RigSlot::LockOn => 1,
            RigSlot::Object => 2,
        }
    }
}

/// Priority for each rig, indexed by [`RigSlot::index`].
pub type CameraPriorities = [i32; 3];

/// Map a camera mode to the priority of every rig.
///
/// The winning rig gets 1 and the others 0. `Cutscene` has no entry: the
/// rigs keep whatever priorities they had, so the rig that was live when the
/// cutscene started stays on top.
#[must_use]
pub const fn camera_priorities(mode: CameraMode) -> Option<CameraPriorities> {
    match mode {
        CameraMode::Free => Some([1, 0, 0]),
        CameraMode::LockOn => Some([0, 1, 0]),
        CameraMode::OnObject => Some([0, 0, 1]),
        CameraMode::Cutscene => None,
    }
}

/// Vertical velocity and ground contact, mutated once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub vertical_velocity: f32,
    pub grounded: bool,
}

/// Cursor lock mode and visibility requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub grab: CursorGrabMode,
    pub visible: bool,
}

impl CursorState {
    /// Gameplay cursor: locked to the window and hidden.
    pub const GAMEPLAY: CursorState = CursorState { grab: CursorGrabMode::Locked, visible: false };
    /// Menu cursor: confined to the window and shown.
    pub const MENU: CursorState = CursorState { grab: CursorGrabMode::Confined, visible: true };

    #[must_use]
    pub const fn for_menu(open: bool) -> Self {
        if open { Self::MENU } else { Self::GAMEPLAY }
    }
}

/// Animation hooks raised by state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    StartMoving,
    StopMoving,
    Jumped,
}

/// Requests accepted by [`ControllerState::override_camera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOverride {
    /// Flip between `OnObject` and `Free` (object inspection / assembly).
    ToggleObjectFocus,
    /// Force a specific mode.
    Set(CameraMode),
}

/// Something the host has to do as a result of a frame step, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideEffect {
    Cue(Cue),
    CameraSwitched { mode: CameraMode, priorities: Option<CameraPriorities> },
    /// Notify menu listeners. `opening` is true when the menu is about to open.
    AnnounceMenu { opening: bool },
    /// Enable/disable the gameplay input channels and apply `cursor`.
    MenuSwitched { open: bool, cursor: CursorState },
    AnnounceInteract,
}

/// Per-frame environment of the step: elapsed time and camera orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub dt: f32,
    pub basis: CameraBasis,
}

/// Result of one [`ControllerState::advance`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutput {
    /// First move applied to the body.
    pub horizontal: Vec3,
    /// Second move applied to the body.
    pub vertical: Vec3,
    /// Heading (degrees) to turn toward, only set while moving.
    pub facing_target: Option<f32>,
    pub effects: Vec<SideEffect>,
}

/// Next locomotion state for a movement vector, plus the animation cue to raise.
///
/// A nonzero vector always moves (even out of `OnMenu`); a zero vector idles
/// unless the menu is open.
#[must_use]
pub fn next_locomotion(state: MovementState, movement: Vec2) -> (MovementState, Option<Cue>) {
    if movement != Vec2::ZERO {
        if state != MovementState::Move {
            return (MovementState::Move, Some(Cue::StartMoving));
        }
    } else if state != MovementState::OnMenu && state != MovementState::Idle {
        return (MovementState::Idle, Some(Cue::StopMoving));
    }
    (state, None)
}

/// Camera mode selected by the lock analog, or `None` to stay.
///
/// `OnObject` is never entered nor left here.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn next_camera_mode(mode: CameraMode, lock: f32) -> Option<CameraMode> {
    if lock != 0.0 {
        if mode != CameraMode::LockOn && mode != CameraMode::OnObject {
            return Some(CameraMode::LockOn);
        }
    } else if mode != CameraMode::Free && mode != CameraMode::OnObject {
        return Some(CameraMode::Free);
    }
    None
}

/// State after a menu trigger edge.
#[must_use]
pub fn toggle_menu(state: MovementState) -> MovementState {
    if state == MovementState::OnMenu { MovementState::Idle } else { MovementState::OnMenu }
}

/// Everything the controller remembers between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub movement: MovementState,
    pub camera: CameraMode,
    pub motion: MotionState,
}

impl ControllerState {
    /// Run one frame.
    ///
    /// The order is fixed: ground snap, locomotion, horizontal move, jump,
    /// gravity and vertical move, facing, lock-on, menu, interact. The snap
    /// must happen before gravity is accumulated or a resting character
    /// slowly builds up downward speed.
    ///
    /// # Arguments
    /// * `input` - input sampled this frame (disabled channels read neutral)
    /// * `grounded` - result of the ground probe this frame
    /// * `frame` - time delta and camera basis
    /// * `tuning` - movement settings (speed, jump height, gravity)
    pub fn advance(
        &mut self,
        input: &InputSnapshot,
        grounded: bool,
        frame: &FrameContext,
        tuning: &MovementSettings,
    ) -> FrameOutput {
        let mut out = FrameOutput::default();

        self.motion.grounded = grounded;
        self.motion.vertical_velocity = motion::ground_snap(self.motion.vertical_velocity, grounded);

        let (movement, cue) = next_locomotion(self.movement, input.movement);
        self.movement = movement;
        if let Some(cue) = cue {
            out.effects.push(SideEffect::Cue(cue));
        }

        out.horizontal = motion::horizontal_displacement(input.movement, &frame.basis, tuning.speed, frame.dt);

        if input.jump && grounded {
            self.motion.vertical_velocity += motion::jump_impulse(tuning.jump_height, tuning.gravity);
            self.movement = MovementState::Jump;
            out.effects.push(SideEffect::Cue(Cue::Jumped));
        }

        self.motion.vertical_velocity =
            motion::apply_gravity(self.motion.vertical_velocity, tuning.gravity, frame.dt);
        out.vertical = motion::vertical_displacement(self.motion.vertical_velocity, frame.dt);

        if self.movement == MovementState::Move {
            out.facing_target = Some(motion::heading_target(input.movement, self.camera, frame.basis.yaw_degrees));
        }

        if let Some(mode) = next_camera_mode(self.camera, input.lock) {
            self.camera = mode;
            out.effects.push(SideEffect::CameraSwitched { mode, priorities: camera_priorities(mode) });
        }

        if input.menu {
            out.effects.push(SideEffect::AnnounceMenu { opening: self.movement != MovementState::OnMenu });
            self.movement = toggle_menu(self.movement);
            let open = self.movement == MovementState::OnMenu;
            out.effects.push(SideEffect::MenuSwitched { open, cursor: CursorState::for_menu(open) });
        }

        if input.interact {
            out.effects.push(SideEffect::AnnounceInteract);
        }

        out
    }

    /// Apply an external camera-mode request.
    ///
    /// # Returns
    /// The new mode if it changed, `None` otherwise.
    pub fn override_camera(&mut self, request: ModeOverride) -> Option<CameraMode> {
        let target = match request {
            ModeOverride::ToggleObjectFocus if self.camera == CameraMode::OnObject => CameraMode::Free,
            ModeOverride::ToggleObjectFocus => CameraMode::OnObject,
            ModeOverride::Set(mode) => mode,
        };
        if target == self.camera {
            return None;
        }
        self.camera = target;
        Some(target)
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.movement == MovementState::OnMenu
    }
}
