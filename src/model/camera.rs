use glam::{Mat4, Vec3};

use super::world::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Pixel-space orthographic projection for overlay drawing.
    Orthographic2D,
    /// Perspective projection for the world scene.
    Perspective3D,
}

/// Everything the render backend needs for one pass, derived freshly each
/// tick from the tracked transform and the current viewport. Never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub projection: Projection,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub viewport: (u32, u32),
    /// Pitch and yaw in degrees.
    pub rotation: (f32, f32),
    pub translation: Vec3,
    pub depth_test: bool,
}

impl CameraConfig {
    pub fn projection_matrix(&self) -> Mat4 {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        match self.projection {
            Projection::Perspective3D => {
                Mat4::perspective_rh(self.fov_y_degrees.to_radians(), w / h, self.z_near, self.z_far)
            }
            // Top-left origin, y growing downward like window coordinates.
            Projection::Orthographic2D => {
                Mat4::orthographic_rh(0.0, w, h, 0.0, self.z_near, self.z_far)
            }
        }
    }

    /// View transform of the first-person rig: rotate the world by the
    /// target's pitch and yaw, then translate it opposite to the target.
    /// Rotation composes before translation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.0.to_radians())
            * Mat4::from_rotation_y(self.rotation.1.to_radians())
            * Mat4::from_translation(-self.translation)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Lens constants for the scene camera. Holds no reference to the entity it
/// tracks; the current transform is passed in per call, so there is nothing
/// here that can go stale.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(fov_y_degrees: f32) -> Self {
        Self { fov_y_degrees, z_near: 1.0, z_far: 2000.0 }
    }

    /// Perspective configuration rigidly attached to `target`.
    pub fn configure_3d(&self, target: &Transform, viewport: (u32, u32)) -> CameraConfig {
        CameraConfig {
            projection: Projection::Perspective3D,
            fov_y_degrees: self.fov_y_degrees,
            z_near: self.z_near,
            z_far: self.z_far,
            viewport,
            rotation: (target.x_rot, target.y_rot),
            translation: target.position,
            depth_test: true,
        }
    }

    /// Orthographic configuration spanning the viewport in pixel space,
    /// depth testing off. Overlay drawing happens in this space.
    pub fn configure_2d(&self, viewport: (u32, u32)) -> CameraConfig {
        CameraConfig {
            projection: Projection::Orthographic2D,
            fov_y_degrees: 0.0,
            z_near: 0.0,
            z_far: 1.0,
            viewport,
            rotation: (0.0, 0.0),
            translation: Vec3::ZERO,
            depth_test: false,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(35.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn target_at(pos: Vec3, x_rot: f32, y_rot: f32) -> Transform {
        Transform { position: pos, x_rot, y_rot }
    }

    #[test]
    fn test_configure_3d_is_pure() {
        let camera = Camera::default();
        let target = target_at(Vec3::new(3.5, 1.25, -9.0), 12.5, 271.0);
        let a = camera.configure_3d(&target, (1280, 720));
        let b = camera.configure_3d(&target, (1280, 720));
        assert_eq!(a, b);
        assert_eq!(a.view_proj().to_cols_array(), b.view_proj().to_cols_array());
    }

    #[test]
    fn test_3d_lens_constants() {
        let config = Camera::default().configure_3d(&target_at(Vec3::ZERO, 0.0, 0.0), (800, 600));
        assert_eq!(config.fov_y_degrees, 35.0);
        assert_eq!(config.z_near, 1.0);
        assert_eq!(config.z_far, 2000.0);
        assert!(config.depth_test);
    }

    #[test]
    fn test_view_rotates_before_translating() {
        // The target's own position must map to the view-space origin. With
        // a nonzero rotation that only holds when rotation composes before
        // the translation (translate-then-rotate would sling it sideways).
        let target = target_at(Vec3::new(3.0, 1.5, 10.0), 20.0, 135.0);
        let config = Camera::default().configure_3d(&target, (800, 600));
        let eye = config.view_matrix() * Vec4::new(3.0, 1.5, 10.0, 1.0);
        assert!(eye.truncate().length() < 1e-4);

        // A point one unit along the forward heading of a 90 degree yaw
        // lands straight ahead on the view axis.
        let turned = Camera::default().configure_3d(&target_at(Vec3::ZERO, 0.0, 90.0), (800, 600));
        let ahead = turned.view_matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(ahead.x.abs() < 1e-4);
        assert!((ahead.z - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_2d_spans_viewport_in_pixels() {
        let config = Camera::default().configure_2d((640, 480));
        let vp = config.view_proj();
        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = vp * Vec4::new(640.0, 480.0, 0.0, 1.0);
        assert!((top_left.x - (-1.0)).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - (-1.0)).abs() < 1e-6);
        assert!(!config.depth_test);
    }

    #[test]
    fn test_2d_view_is_identity() {
        let config = Camera::default().configure_2d((640, 480));
        assert_eq!(config.view_matrix(), Mat4::IDENTITY);
    }
}
