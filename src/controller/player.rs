use glam::Vec3;

use super::input::InputState;
use super::session::SessionError;
use crate::model::{EntityId, World};
use crate::settings::Settings;

/// Longest simulation step accepted per tick; anything above is treated as a
/// hitch and clamped so the target cannot teleport.
const MAX_STEP_SECONDS: f32 = 0.1;

/// Steers one target entity. Holds a handle into the world, never a
/// reference; a handle that stops resolving ends the session.
pub struct PlayerController {
    target: EntityId,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub pitch_limit_degrees: f32,
}

impl PlayerController {
    pub fn new(target: EntityId, settings: &Settings) -> Self {
        Self {
            target,
            move_speed: settings.move_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            pitch_limit_degrees: settings.pitch_limit_degrees,
        }
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    /// Advance the target by one tick of held movement.
    ///
    /// Forward/backward and strafe axes are independent and sum when held
    /// together; the combined vector is not re-normalized, so diagonal
    /// movement covers more ground than axis-aligned movement.
    pub fn integrate(&self, world: &mut World, input: &InputState, dt: f32) -> Result<(), SessionError> {
        // A broken timer is a skipped tick, not a teleport.
        if !dt.is_finite() || dt <= 0.0 {
            return Ok(());
        }
        let dt = dt.min(MAX_STEP_SECONDS);

        let transform = world
            .transform_mut(self.target)
            .ok_or(SessionError::TargetMissing(self.target))?;

        let yaw = transform.y_rot.to_radians();
        let forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
        let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let step = self.move_speed * dt;

        let mut displacement = Vec3::ZERO;
        if input.forward {
            displacement += forward * step;
        }
        if input.backward {
            displacement -= forward * step;
        }
        if input.strafe_left {
            displacement -= right * step;
        }
        if input.strafe_right {
            displacement += right * step;
        }

        transform.position += displacement;
        Ok(())
    }

    /// Turn the target by a mouse-drag delta: yaw from horizontal motion,
    /// pitch from vertical, pitch clamped so the view cannot flip over.
    pub fn handle_mouse_move(&self, world: &mut World, dx: f32, dy: f32) -> Result<(), SessionError> {
        let transform = world
            .transform_mut(self.target)
            .ok_or(SessionError::TargetMissing(self.target))?;

        transform.y_rot += dx * self.mouse_sensitivity;
        transform.x_rot = (transform.x_rot + dy * self.mouse_sensitivity)
            .clamp(-self.pitch_limit_degrees, self.pitch_limit_degrees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use crate::model::{EntityKind, Transform};
    use winit::keyboard::KeyCode;

    fn setup() -> (World, PlayerController) {
        let mut world = World::new();
        let target = world.spawn(EntityKind::Player, Transform::new(Vec3::ZERO));
        let controller = PlayerController::new(target, &Settings::default());
        (world, controller)
    }

    fn pos(world: &World, controller: &PlayerController) -> Vec3 {
        world.transform(controller.target()).unwrap().position
    }

    #[test]
    fn test_no_input_leaves_target_unchanged() {
        let (mut world, controller) = setup();
        controller.integrate(&mut world, &InputState::new(), 0.25).unwrap();
        let transform = *world.transform(controller.target()).unwrap();
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.y_rot, 0.0);
        assert_eq!(transform.x_rot, 0.0);
    }

    #[test]
    fn test_forward_moves_along_negative_z_at_zero_yaw() {
        let (mut world, controller) = setup();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyW));
        controller.integrate(&mut world, &input, 0.5).unwrap();
        // speed 5 for half a second
        assert_eq!(pos(&world, &controller), Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn test_opposite_axes_cancel_exactly() {
        let (mut world, controller) = setup();
        let mut input = InputState::new();
        input.forward = true;
        input.backward = true;
        controller.integrate(&mut world, &input, 0.5).unwrap();
        assert_eq!(pos(&world, &controller), Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_movement_is_not_normalized() {
        let (mut world, controller) = setup();
        let mut input = InputState::new();
        input.forward = true;
        input.strafe_right = true;
        controller.integrate(&mut world, &input, 0.5).unwrap();
        let p = pos(&world, &controller);
        assert_eq!(p, Vec3::new(2.5, 0.0, -2.5));
        let expected = 2.5 * std::f32::consts::SQRT_2;
        assert!((p.length() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_movement_follows_heading() {
        let (mut world, controller) = setup();
        world.transform_mut(controller.target()).unwrap().y_rot = 90.0;
        let mut input = InputState::new();
        input.forward = true;
        controller.integrate(&mut world, &input, 1.0).unwrap();
        let p = pos(&world, &controller);
        assert!((p.x - 5.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_or_negative_dt_is_a_no_op() {
        let (mut world, controller) = setup();
        let mut input = InputState::new();
        input.forward = true;
        controller.integrate(&mut world, &input, f32::NAN).unwrap();
        controller.integrate(&mut world, &input, f32::INFINITY).unwrap();
        controller.integrate(&mut world, &input, -1.0).unwrap();
        assert_eq!(pos(&world, &controller), Vec3::ZERO);
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let (mut world, controller) = setup();
        let mut input = InputState::new();
        input.forward = true;
        controller.integrate(&mut world, &input, 100.0).unwrap();
        // clamped to 0.1s at speed 5
        assert_eq!(pos(&world, &controller), Vec3::new(0.0, 0.0, -0.5));
    }

    #[test]
    fn test_mouse_move_accumulates_yaw_and_pitch() {
        let (mut world, controller) = setup();
        controller.handle_mouse_move(&mut world, 10.0, 0.0).unwrap();
        let transform = *world.transform(controller.target()).unwrap();
        // 10 px at 0.1 degrees per px
        assert!((transform.y_rot - 1.0).abs() < 1e-6);

        controller.handle_mouse_move(&mut world, 0.0, -20.0).unwrap();
        let transform = *world.transform(controller.target()).unwrap();
        assert!((transform.x_rot - (-2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let (mut world, controller) = setup();
        controller.handle_mouse_move(&mut world, 0.0, 10_000.0).unwrap();
        assert_eq!(world.transform(controller.target()).unwrap().x_rot, 89.0);
        controller.handle_mouse_move(&mut world, 0.0, -100_000.0).unwrap();
        assert_eq!(world.transform(controller.target()).unwrap().x_rot, -89.0);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let mut world = World::new();
        let mut other = World::new();
        let target = other.spawn(EntityKind::Player, Transform::new(Vec3::ZERO));
        let controller = PlayerController::new(target, &Settings::default());
        let err = controller.integrate(&mut world, &InputState::new(), 0.1).unwrap_err();
        assert!(matches!(err, SessionError::TargetMissing(_)));
    }
}
