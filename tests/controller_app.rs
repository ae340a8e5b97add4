use std::time::Duration;

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use wayfarer::player::camera::sync_rig_priorities;
use wayfarer::player::state::ControllerState;
use wayfarer::player::{
    AnimationCue, CameraMode, CameraModeOverride, CameraRig, CharacterBody, ControllerLinks, Cue, FootAnchor,
    GroundCollider, InputChannel, InputChannels, InteractTriggered, MenuToggled, ModeOverride, MovementState,
    PlayerController, PlayerControllerPlugin, RigSlot,
};

fn app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .add_event::<MouseMotion>()
        .add_event::<AppExit>()
        .add_plugins(PlayerControllerPlugin);
    app
}

fn spawn_floor(app: &mut App) {
    app.world_mut().spawn((
        GroundCollider::new(Vec3::new(10.0, 0.5, 10.0)),
        Transform::from_xyz(0.0, -0.5, 0.0),
        GlobalTransform::from_xyz(0.0, -0.5, 0.0),
    ));
}

fn spawn_rigs(app: &mut App) {
    for slot in RigSlot::ALL {
        app.world_mut().spawn((CameraRig::new(slot), Camera::default(), Transform::default(), GlobalTransform::default()));
    }
}

/// Player standing on the floor (capsule bottom at y = 0).
fn spawn_player(app: &mut App, with_anchor: bool) -> Entity {
    let world = app.world_mut();
    let player = world
        .spawn((
            PlayerController::default(),
            CharacterBody::default(),
            Transform::from_xyz(0.0, 1.0, 0.0),
            GlobalTransform::from_xyz(0.0, 1.0, 0.0),
        ))
        .id();
    if with_anchor {
        let foot = world
            .spawn((FootAnchor, Transform::from_xyz(0.0, -1.0, 0.0), GlobalTransform::from_xyz(0.0, 0.0, 0.0)))
            .id();
        world.entity_mut(player).add_child(foot);
    }
    player
}

fn scene() -> (App, Entity) {
    let mut app = app();
    app.world_mut().spawn((Window::default(), PrimaryWindow));
    spawn_floor(&mut app);
    spawn_rigs(&mut app);
    let player = spawn_player(&mut app, true);
    app.update();
    (app, player)
}

/// Release everything, then press `key` so it reads as a fresh edge.
fn tap(app: &mut App, key: KeyCode) {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release_all();
    keys.clear();
    keys.press(key);
}

fn release_keys(app: &mut App) {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release_all();
    keys.clear();
}

fn state(app: &App, player: Entity) -> MovementState {
    app.world().get::<PlayerController>(player).expect("controller").state.movement
}

fn camera_mode(app: &App, player: Entity) -> CameraMode {
    app.world().get::<PlayerController>(player).expect("controller").state.camera
}

fn cursor(app: &mut App) -> (CursorGrabMode, bool) {
    let mut q = app.world_mut().query_filtered::<&Window, With<PrimaryWindow>>();
    let window = q.single(app.world());
    (window.cursor.grab_mode, window.cursor.visible)
}

fn rig_for(app: &mut App, slot: RigSlot) -> (i32, bool) {
    let mut q = app.world_mut().query::<(&CameraRig, &Camera)>();
    q.iter(app.world())
        .find(|(rig, _)| rig.slot == slot)
        .map(|(rig, cam)| (rig.priority, cam.is_active))
        .expect("rig")
}

#[test]
fn controller_links_and_enables_input() {
    let (mut app, player) = scene();
    assert!(app.world().get::<ControllerLinks>(player).is_some());
    let channels = app.world().resource::<InputChannels>();
    assert!(InputChannel::ALL.iter().all(|&c| channels.is_enabled(c)));
    assert_eq!(cursor(&mut app), (CursorGrabMode::Locked, false));
}

#[test]
fn menu_toggle_announces_and_locks_out_gameplay() {
    let (mut app, player) = scene();
    let mut reader = app.world().resource::<Events<MenuToggled>>().get_reader();

    tap(&mut app, KeyCode::Escape);
    app.update();
    let seen: Vec<MenuToggled> = reader.read(app.world().resource::<Events<MenuToggled>>()).copied().collect();
    assert_eq!(seen, vec![MenuToggled { controller: player, opened: true }]);
    assert_eq!(state(&app, player), MovementState::OnMenu);
    assert_eq!(cursor(&mut app), (CursorGrabMode::Confined, true));
    {
        let channels = app.world().resource::<InputChannels>();
        assert!(channels.is_enabled(InputChannel::Menu));
        assert!(InputChannel::GAMEPLAY.iter().all(|&c| !channels.is_enabled(c)));
    }

    // movement keys are ignored while the menu is open
    tap(&mut app, KeyCode::KeyW);
    app.update();
    assert_eq!(state(&app, player), MovementState::OnMenu);

    tap(&mut app, KeyCode::Escape);
    app.update();
    let seen: Vec<MenuToggled> = reader.read(app.world().resource::<Events<MenuToggled>>()).copied().collect();
    assert_eq!(seen, vec![MenuToggled { controller: player, opened: false }]);
    assert_eq!(state(&app, player), MovementState::Idle);
    assert_eq!(cursor(&mut app), (CursorGrabMode::Locked, false));
    let channels = app.world().resource::<InputChannels>();
    assert!(InputChannel::ALL.iter().all(|&c| channels.is_enabled(c)));
}

#[test]
fn late_controller_does_not_lift_an_open_menu() {
    let (mut app, _first) = scene();
    tap(&mut app, KeyCode::Escape);
    app.update();
    release_keys(&mut app);

    let second = spawn_player(&mut app, true);
    app.update();

    assert!(app.world().get::<ControllerLinks>(second).is_some());
    let channels = app.world().resource::<InputChannels>();
    assert!(channels.is_enabled(InputChannel::Menu));
    assert!(InputChannel::GAMEPLAY.iter().all(|&c| !channels.is_enabled(c)));
    assert_eq!(cursor(&mut app), (CursorGrabMode::Confined, true));
}

#[test]
fn cutscene_keeps_the_previously_live_rig() {
    let mut app = App::new();
    app.add_systems(Update, sync_rig_priorities);
    let rigs = [
        app.world_mut().spawn(CameraRig { slot: RigSlot::Free, priority: 0 }).id(),
        app.world_mut().spawn(CameraRig { slot: RigSlot::LockOn, priority: 1 }).id(),
        app.world_mut().spawn(CameraRig { slot: RigSlot::Object, priority: 0 }).id(),
    ];
    let foot = app.world_mut().spawn_empty().id();
    let state = ControllerState { camera: CameraMode::Cutscene, ..ControllerState::default() };
    let player = app.world_mut().spawn((PlayerController { state }, ControllerLinks { foot, rigs })).id();

    app.update();
    let priorities = rigs.map(|e| app.world().get::<CameraRig>(e).expect("rig").priority);
    assert_eq!(priorities, [0, 1, 0]);

    app.world_mut().get_mut::<PlayerController>(player).expect("controller").state.camera = CameraMode::Free;
    app.update();
    let priorities = rigs.map(|e| app.world().get::<CameraRig>(e).expect("rig").priority);
    assert_eq!(priorities, [1, 0, 0]);
}

#[test]
fn interact_is_announced_only_outside_the_menu() {
    let (mut app, player) = scene();
    let mut reader = app.world().resource::<Events<InteractTriggered>>().get_reader();

    tap(&mut app, KeyCode::KeyE);
    app.update();
    let seen: Vec<InteractTriggered> =
        reader.read(app.world().resource::<Events<InteractTriggered>>()).copied().collect();
    assert_eq!(seen, vec![InteractTriggered { controller: player }]);

    tap(&mut app, KeyCode::Escape);
    app.update();
    tap(&mut app, KeyCode::KeyE);
    app.update();
    assert_eq!(reader.read(app.world().resource::<Events<InteractTriggered>>()).count(), 0);
}

#[test]
fn lock_on_switches_the_live_rig() {
    let (mut app, player) = scene();
    assert_eq!(rig_for(&mut app, RigSlot::Free), (1, true));

    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Right);
    app.update();
    assert_eq!(camera_mode(&app, player), CameraMode::LockOn);
    assert_eq!(rig_for(&mut app, RigSlot::LockOn), (1, true));
    assert_eq!(rig_for(&mut app, RigSlot::Free), (0, false));
    assert_eq!(rig_for(&mut app, RigSlot::Object), (0, false));

    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().release(MouseButton::Right);
    app.update();
    assert_eq!(camera_mode(&app, player), CameraMode::Free);
    assert_eq!(rig_for(&mut app, RigSlot::Free), (1, true));
}

#[test]
fn object_focus_override_holds_until_toggled_back() {
    let (mut app, player) = scene();
    let request = CameraModeOverride { controller: player, request: ModeOverride::ToggleObjectFocus };

    app.world_mut().send_event(request);
    app.update();
    assert_eq!(camera_mode(&app, player), CameraMode::OnObject);
    assert_eq!(rig_for(&mut app, RigSlot::Object), (1, true));

    // lock input does not leave object focus
    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Right);
    app.update();
    assert_eq!(camera_mode(&app, player), CameraMode::OnObject);

    app.world_mut().send_event(request);
    app.update();
    // lock is still held, so the step after the override pulls the camera into lock-on
    app.update();
    assert_eq!(camera_mode(&app, player), CameraMode::LockOn);
}

#[test]
fn grounded_jump_rises_and_cues() {
    let (mut app, player) = scene();
    let mut cues = app.world().resource::<Events<AnimationCue>>().get_reader();

    app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(16));
    tap(&mut app, KeyCode::Space);
    app.update();

    assert_eq!(state(&app, player), MovementState::Jump);
    let controller = app.world().get::<PlayerController>(player).expect("controller");
    assert!(controller.state.motion.vertical_velocity > 0.0);
    assert!(app.world().get::<Transform>(player).expect("transform").translation.y > 1.0);
    let seen: Vec<Cue> = cues.read(app.world().resource::<Events<AnimationCue>>()).map(|c| c.cue).collect();
    assert_eq!(seen, vec![Cue::Jumped]);

    release_keys(&mut app);
}

#[test]
fn resting_character_does_not_sink() {
    let (mut app, player) = scene();
    for _ in 0..30 {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(16));
        app.update();
    }
    let y = app.world().get::<Transform>(player).expect("transform").translation.y;
    assert!((y - 1.0).abs() < 1e-4, "settled at {y}");
    assert_eq!(state(&app, player), MovementState::Idle);
}

#[test]
fn missing_foot_anchor_requests_exit() {
    let mut app = app();
    spawn_rigs(&mut app);
    let player = spawn_player(&mut app, false);
    let mut exits = app.world().resource::<Events<AppExit>>().get_reader();
    app.update();

    assert!(app.world().get::<ControllerLinks>(player).is_none());
    let seen: Vec<AppExit> = exits.read(app.world().resource::<Events<AppExit>>()).cloned().collect();
    assert!(seen.iter().any(AppExit::is_error));
}

#[test]
fn removing_the_controller_disables_input() {
    let (mut app, player) = scene();
    app.world_mut().entity_mut(player).remove::<PlayerController>();
    app.update();
    let channels = app.world().resource::<InputChannels>();
    assert!(InputChannel::ALL.iter().all(|&c| !channels.is_enabled(c)));
}
