use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, info};

use super::input::{CursorWarp, InputEvent, InputState};
use super::player::PlayerController;
use crate::model::{Camera, CameraConfig, EntityId, EntityKind, World};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("world has no player entity")]
    NoPlayer,
    #[error("target entity {0:?} no longer exists")]
    TargetMissing(EntityId),
    #[error("session is shutting down")]
    ShutDown,
}

/// Camera configurations for one rendered tick, 3D scene first, then the 2D
/// overlay. The caller sequences the two passes in that order.
#[derive(Debug, Clone)]
pub struct TickFrame {
    pub scene: CameraConfig,
    pub overlay: CameraConfig,
    pub cursor_warp: Option<CursorWarp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    ShuttingDown,
}

/// Composition root of the play loop core: owns the input state, the player
/// controller, and the camera, and sequences one tick as
/// decode -> look -> integrate -> configure.
///
/// Holds only an entity handle into the world, which stays owned by the
/// caller for the whole session.
pub struct PlaySession {
    input: InputState,
    controller: PlayerController,
    camera: Camera,
    state: SessionState,
    shutdown_reason: Option<String>,
}

impl PlaySession {
    /// Bind a new session to the world's player entity.
    pub fn new(world: &World, settings: &Settings) -> Result<Self, SessionError> {
        let target = world
            .first_of_kind(EntityKind::Player)
            .ok_or(SessionError::NoPlayer)?;
        info!("play session bound to {:?}", target);
        Ok(Self {
            input: InputState::new(),
            controller: PlayerController::new(target, settings),
            camera: Camera::new(settings.fov_y_degrees),
            state: SessionState::Active,
            shutdown_reason: None,
        })
    }

    /// Run one fixed-timestep tick: drain every pending event into the input
    /// state, apply the drained look delta, integrate movement, then derive
    /// both camera configurations from the updated target.
    ///
    /// All events queued before the tick are applied before integration; none
    /// straddle into the next tick.
    pub fn tick(
        &mut self,
        events: &mut VecDeque<InputEvent>,
        world: &mut World,
        dt: f32,
        viewport: (u32, u32),
    ) -> Result<TickFrame, SessionError> {
        if self.state == SessionState::ShuttingDown {
            return Err(SessionError::ShutDown);
        }

        let mut cursor_warp = None;
        while let Some(event) = events.pop_front() {
            if let Some(warp) = self.input.process_event(&event) {
                cursor_warp = Some(warp);
            }
        }

        let (dx, dy) = self.input.consume_look();
        if dx != 0.0 || dy != 0.0 {
            self.controller.handle_mouse_move(world, dx, dy)?;
        }
        self.controller.integrate(world, &self.input, dt)?;

        let target = world
            .transform(self.controller.target())
            .ok_or(SessionError::TargetMissing(self.controller.target()))?;

        Ok(TickFrame {
            scene: self.camera.configure_3d(target, viewport),
            overlay: self.camera.configure_2d(viewport),
            cursor_warp,
        })
    }

    /// Move to the terminal state. The first reason wins; later calls are
    /// ignored.
    pub fn request_shutdown(&mut self, reason: &str) {
        if self.state == SessionState::Active {
            debug!("shutdown requested: {reason}");
            self.state = SessionState::ShuttingDown;
            self.shutdown_reason = Some(reason.to_string());
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state == SessionState::ShuttingDown
    }

    pub fn shutdown_reason(&self) -> Option<&str> {
        self.shutdown_reason.as_deref()
    }

    pub fn target(&self) -> EntityId {
        self.controller.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::MouseButtons;
    use crate::model::Transform;
    use glam::Vec3;
    use winit::keyboard::KeyCode;

    const VIEWPORT: (u32, u32) = (800, 600);

    fn setup() -> (World, PlaySession) {
        let mut world = World::new();
        world.spawn(EntityKind::Player, Transform::new(Vec3::ZERO));
        let session = PlaySession::new(&world, &Settings::default()).unwrap();
        (world, session)
    }

    #[test]
    fn test_construction_fails_without_player() {
        let world = World::new();
        let err = PlaySession::new(&world, &Settings::default()).unwrap_err();
        assert!(matches!(err, SessionError::NoPlayer));
    }

    #[test]
    fn test_all_queued_events_apply_before_integration() {
        let (mut world, mut session) = setup();
        let mut events = VecDeque::new();
        // Press and release within the same queue: the tick must see the
        // release and not move.
        events.push_back(InputEvent::KeyDown(KeyCode::KeyW));
        events.push_back(InputEvent::KeyUp(KeyCode::KeyW));
        let frame = session.tick(&mut events, &mut world, 0.5, VIEWPORT).unwrap();
        assert_eq!(frame.scene.translation, Vec3::ZERO);
        assert!(events.is_empty());
    }

    #[test]
    fn test_held_key_moves_target_across_ticks() {
        let (mut world, mut session) = setup();
        let mut events = VecDeque::new();
        events.push_back(InputEvent::KeyDown(KeyCode::KeyW));
        session.tick(&mut events, &mut world, 0.1, VIEWPORT).unwrap();
        // No further events; the latch keeps the flag held.
        let frame = session.tick(&mut events, &mut world, 0.1, VIEWPORT).unwrap();
        assert!((frame.scene.translation.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_walk_then_look_end_to_end() {
        let (mut world, mut session) = setup();
        let mut events = VecDeque::new();
        events.push_back(InputEvent::KeyDown(KeyCode::KeyW));
        let frame = session.tick(&mut events, &mut world, 0.5, VIEWPORT).unwrap();
        assert_eq!(frame.scene.translation, Vec3::new(0.0, 0.0, -2.5));

        events.push_back(InputEvent::KeyUp(KeyCode::KeyW));
        events.push_back(InputEvent::MouseAxes { x: 400.0, y: 300.0, buttons: MouseButtons::MIDDLE });
        events.push_back(InputEvent::MouseAxes { x: 410.0, y: 300.0, buttons: MouseButtons::MIDDLE });
        let frame = session.tick(&mut events, &mut world, 0.5, VIEWPORT).unwrap();
        // 10 px at sensitivity 0.1 -> one degree of yaw
        assert!((frame.scene.rotation.1 - 1.0).abs() < 1e-5);
        assert_eq!(frame.cursor_warp, Some(CursorWarp { x: 400.0, y: 300.0 }));
    }

    #[test]
    fn test_frame_carries_scene_and_overlay_configs() {
        let (mut world, mut session) = setup();
        let frame = session.tick(&mut VecDeque::new(), &mut world, 0.1, VIEWPORT).unwrap();
        assert!(frame.scene.depth_test);
        assert!(!frame.overlay.depth_test);
        assert_eq!(frame.scene.viewport, VIEWPORT);
        assert_eq!(frame.overlay.viewport, VIEWPORT);
    }

    #[test]
    fn test_tick_after_shutdown_is_an_error() {
        let (mut world, mut session) = setup();
        session.request_shutdown("test teardown");
        let err = session.tick(&mut VecDeque::new(), &mut world, 0.1, VIEWPORT).unwrap_err();
        assert!(matches!(err, SessionError::ShutDown));
    }

    #[test]
    fn test_first_shutdown_reason_wins() {
        let (_, mut session) = setup();
        session.request_shutdown("first");
        session.request_shutdown("second");
        assert!(session.is_shutting_down());
        assert_eq!(session.shutdown_reason(), Some("first"));
    }
}
