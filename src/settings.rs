use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Tunable game parameters, loaded from a RON file next to the binary.
///
/// Every field has a default so a partial file is fine; a missing or
/// malformed file falls back to the full defaults with a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Simulation ticks per second.
    pub tick_hz: u32,
    /// Walk speed in world units per second.
    pub move_speed: f32,
    /// Look rotation in degrees per pixel of mouse drag.
    pub mouse_sensitivity: f32,
    /// Pitch is clamped to +/- this many degrees.
    pub pitch_limit_degrees: f32,
    /// Vertical field of view of the 3D camera.
    pub fov_y_degrees: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "Overland".to_string(),
            window_width: 1280,
            window_height: 720,
            tick_hz: 60,
            move_speed: 5.0,
            mouse_sensitivity: 0.1,
            pitch_limit_degrees: 89.0,
            fov_y_degrees: 35.0,
        }
    }
}

impl Settings {
    /// Load settings from a RON file at `path`.
    ///
    /// Falls back to [`Settings::default`] if the file is missing or
    /// malformed, logging a warning in either case.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Malformed settings file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read settings file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip_through_ron() {
        let mut original = Settings::default();
        original.move_speed = 7.5;
        original.tick_hz = 30;
        let ron_str = ron::to_string(&original).expect("serialize");
        let restored: Settings = ron::from_str(&ron_str).expect("deserialize");
        assert_eq!(restored.move_speed, 7.5);
        assert_eq!(restored.tick_hz, 30);
        assert_eq!(restored.window_title, original.window_title);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let partial: Settings = ron::from_str("(move_speed: 2.0)").expect("deserialize");
        assert_eq!(partial.move_speed, 2.0);
        assert_eq!(partial.tick_hz, Settings::default().tick_hz);
        assert_eq!(partial.fov_y_degrees, Settings::default().fov_y_degrees);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("overland_settings_malformed");
        let path = dir.join("overland.ron");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid ron {{{").unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.move_speed, Settings::default().move_speed);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::path::PathBuf::from("/tmp/overland_nonexistent_12345/overland.ron");
        let loaded = Settings::load(&path);
        assert_eq!(loaded.tick_hz, Settings::default().tick_hz);
    }
}
