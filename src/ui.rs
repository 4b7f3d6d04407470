use egui::Context;
use glam::Vec3;

use crate::model::CameraConfig;

/// Snapshot of what the HUD shows this frame.
pub struct HudState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fps: f32,
    pub paused: bool,
}

/// Draw the overlay into `ctx`. The 2D camera configuration supplies the
/// pixel-space rect the overlay is laid out in.
pub fn draw_hud(ctx: &Context, overlay: &CameraConfig, hud: &HudState) {
    let (width, height) = (overlay.viewport.0 as f32, overlay.viewport.1 as f32);

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", hud.fps)).small());
            ui.label(
                egui::RichText::new(format!(
                    "Pos: x: {:.1} y: {:.1} z: {:.1}",
                    hud.position.x, hud.position.y, hud.position.z
                ))
                .small(),
            );
            ui.label(
                egui::RichText::new(format!("Yaw: {:.1} Pitch: {:.1}", hud.yaw, hud.pitch)).small(),
            );
        });

    egui::Window::new("Controls")
        .default_pos([width - 190.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("WS - Walk").small());
            ui.label(egui::RichText::new("AD - Strafe").small());
            ui.label(egui::RichText::new("Middle drag - Look").small());
            ui.label(egui::RichText::new("Space - Pause").small());
            ui.label(egui::RichText::new("F12 - Screenshot").small());
            ui.label(egui::RichText::new("Esc - Quit").small());
        });

    if hud.paused {
        egui::Area::new(egui::Id::new("paused"))
            .fixed_pos([width / 2.0 - 30.0, height / 2.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("PAUSED").heading());
            });
    }
}
