use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use tracing::{error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

// Import from the library crate
use overland::{logging, screenshot, ui};

use overland::controller::{InputEvent, MouseButtons, PlaySession, TickFrame};
use overland::frame_loop::TickClock;
use overland::model::{EntityKind, Transform, World};
use overland::settings::Settings;
use overland::ui::HudState;
use overland::view::{GpuContext, Renderer};

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,
    renderer: Renderer,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    world: World,
    session: PlaySession,
    pending_events: VecDeque<InputEvent>,
    clock: TickClock,
    last_frame: Option<TickFrame>,
    paused: bool,
    screenshot_pending: bool,

    // Raw mouse sampling
    mouse_buttons: MouseButtons,
    cursor_pos: (f32, f32),

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>, settings: Settings) -> Self {
        let size = window.inner_size();

        // Initialize wgpu
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).unwrap();
        let gpu = GpuContext::new(&instance, surface, size.width.max(1), size.height.max(1)).await;

        // A player at eye height and a few props to walk around
        let mut world = World::new();
        world.spawn(EntityKind::Player, Transform::new(Vec3::new(0.0, 1.7, 0.0)));
        for (x, z) in [(-8.0, -12.0), (6.0, -18.0), (14.0, -6.0), (-15.0, -25.0), (3.0, -30.0)] {
            world.spawn(EntityKind::Prop, Transform::new(Vec3::new(x, 0.0, z)));
        }

        let session = PlaySession::new(&world, &settings).expect("world has a player");
        let renderer = Renderer::new(&gpu.device, gpu.format, &world, gpu.config.width, gpu.config.height);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let clock = TickClock::new(settings.tick_hz);

        Self {
            surface: gpu.surface,
            device: gpu.device,
            queue: gpu.queue,
            config: gpu.config,
            size,
            window,
            renderer,
            egui_state,
            egui_ctx,
            world,
            session,
            pending_events: VecDeque::new(),
            clock,
            last_frame: None,
            paused: false,
            screenshot_pending: false,
            mouse_buttons: MouseButtons::NONE,
            cursor_pos: (0.0, 0.0),
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Translate raw window events into the typed event queue the session
    /// drains each tick. Escape, Space and F12 stay application-level.
    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, repeat, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed if !repeat => {
                            match code {
                                KeyCode::Escape => self.session.request_shutdown("player request"),
                                KeyCode::Space => self.toggle_pause(),
                                KeyCode::F12 => self.screenshot_pending = true,
                                _ => self.pending_events.push_back(InputEvent::KeyDown(*code)),
                            }
                        }
                        ElementState::Released => {
                            self.pending_events.push_back(InputEvent::KeyUp(*code));
                        }
                        _ => {}
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let bit = match button {
                    MouseButton::Left => MouseButtons::LEFT,
                    MouseButton::Middle => MouseButtons::MIDDLE,
                    MouseButton::Right => MouseButtons::RIGHT,
                    _ => MouseButtons::NONE,
                };
                match state {
                    ElementState::Pressed => self.mouse_buttons.insert(bit),
                    ElementState::Released => self.mouse_buttons.remove(bit),
                }
                // A sample at the button edge, so a drag gesture starts and
                // ends even when the cursor has not moved since.
                self.pending_events.push_back(InputEvent::MouseAxes {
                    x: self.cursor_pos.0,
                    y: self.cursor_pos.1,
                    buttons: self.mouse_buttons,
                });
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = (position.x as f32, position.y as f32);
                self.pending_events.push_back(InputEvent::MouseAxes {
                    x: self.cursor_pos.0,
                    y: self.cursor_pos.1,
                    buttons: self.mouse_buttons,
                });
                true
            }
            _ => false,
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            // Time banked while paused must not burst into a flurry of ticks
            self.clock.discard();
        }
        info!("{}", if self.paused { "paused" } else { "unpaused" });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, new_size.width, new_size.height);
        }
    }

    fn redraw(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = std::time::Instant::now();
        let frame_dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        // Update FPS
        self.frame_count += 1;
        self.fps_timer += frame_dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        if !self.paused {
            // Viewport is re-queried every tick; a resize may land between ticks
            let viewport = (self.config.width, self.config.height);
            for _ in 0..self.clock.advance(frame_dt) {
                match self.session.tick(
                    &mut self.pending_events,
                    &mut self.world,
                    self.clock.tick_seconds(),
                    viewport,
                ) {
                    Ok(frame) => {
                        if let Some(warp) = frame.cursor_warp {
                            let _ = self.window.set_cursor_position(
                                winit::dpi::PhysicalPosition::new(warp.x as f64, warp.y as f64),
                            );
                        }
                        self.last_frame = Some(frame);
                    }
                    Err(e) => {
                        error!("tick failed: {e}");
                        self.session.request_shutdown(&e.to_string());
                        break;
                    }
                }
            }
        }

        self.render()
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(frame) = self.last_frame.clone() else {
            return Ok(());
        };

        let hud = HudState {
            position: frame.scene.translation,
            yaw: frame.scene.rotation.1,
            pitch: frame.scene.rotation.0,
            fps: self.fps,
            paused: self.paused,
        };

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_hud(ctx, &frame.overlay, &hud);
        });
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let pixels_per_point = self.window.scale_factor() as f32;
        let primitives = self.egui_ctx.tessellate(output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };

        let surface_tex = self.renderer.draw(
            &self.device,
            &self.queue,
            &self.surface,
            &frame.scene,
            &primitives,
            &output.textures_delta,
            &screen_descriptor,
        )?;

        if self.screenshot_pending {
            self.screenshot_pending = false;
            let image = screenshot::read_frame(&self.device, &self.queue, &surface_tex.texture);
            if let Err(e) = screenshot::save(Path::new("screenshots"), "overland", image) {
                warn!("could not save screenshot: {e}");
            }
        }

        surface_tex.present();
        Ok(())
    }
}

fn main() {
    logging::init();

    let settings = Settings::load(Path::new("overland.ron"));

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title(&settings.window_title)
        .with_inner_size(winit::dpi::LogicalSize::new(settings.window_width, settings.window_height));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone(), settings));

    event_loop.run(move |event, elwt| {
        // Shutdown is checked once per loop iteration; a running tick is
        // never interrupted.
        if app.session.is_shutting_down() && !elwt.exiting() {
            info!("shutting down: {}", app.session.shutdown_reason().unwrap_or("no reason given"));
            elwt.exit();
            return;
        }

        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => {
                            app.session.request_shutdown("window closed");
                            elwt.exit();
                        }
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            match app.redraw() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => error!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    }).unwrap();

    info!("thank you for playing");
}
