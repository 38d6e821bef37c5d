//! Window creation and event handling.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Each redraw loads
//! at most one planet texture, applies keyboard and pointer input, advances
//! the fixed-step simulation (camera damping and planet spin) and draws.

use std::sync::Arc;
use std::time::Instant;

use topo_config::Config;
use topo_input::{ControlAction, InputState, KeyBindings};
use topo_planet::{
    LoadProgress, Parameter, ParameterController, PlanetAssets, RebuildOutcome, TextureSource,
};
use topo_render::{
    Camera, OrbitCamera, RenderContext, SurfaceError, init_render_context_blocking,
    unsupported_context_message,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::game_loop::GameLoop;
use crate::hud::{HudState, format_title};
use crate::scene::SceneRenderer;

/// The camera may not come closer to the planet center than this many radii.
const MIN_DISTANCE_RADII: f32 = 1.1;

/// Fraction of the star shell's inner radius the camera may back out to.
const MAX_DISTANCE_STAR_FRACTION: f32 = 0.9;

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Map a key action to the parameter it steps, and in which direction.
pub fn parameter_step(action: ControlAction) -> Option<(Parameter, i32)> {
    match action {
        ControlAction::RotationSpeedUp => Some((Parameter::RotationSpeed, 1)),
        ControlAction::RotationSpeedDown => Some((Parameter::RotationSpeed, -1)),
        ControlAction::DisplacementUp => Some((Parameter::DisplacementMultiplier, 1)),
        ControlAction::DisplacementDown => Some((Parameter::DisplacementMultiplier, -1)),
        ControlAction::BumpUp => Some((Parameter::BumpScale, 1)),
        ControlAction::BumpDown => Some((Parameter::BumpScale, -1)),
        ControlAction::Reset | ControlAction::Quit => None,
    }
}

pub struct AppState {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    scene: Option<SceneRenderer>,
    pub camera: Camera,
    pub orbit: OrbitCamera,
    pub input: InputState,
    pub bindings: KeyBindings,
    pub assets: PlanetAssets,
    pub controller: ParameterController,
    game_loop: GameLoop,
    hud: HudState,
    /// Set when a texture failed to load; the planet stays hidden.
    asset_failure: Option<String>,
    /// First fatal error; reported by [`run_with_config`] after the loop ends.
    fatal: Option<AppError>,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera = Camera::perspective(
            config.render.fov_y_deg,
            aspect,
            config.render.z_near,
            config.render.z_far,
        );
        let orbit = Self::orbit_for(&config, aspect);
        let assets = PlanetAssets::new(TextureSource::from_config(&config.textures));
        let controller = ParameterController::new(&config.planet);

        Self {
            camera,
            orbit,
            input: InputState::new(),
            bindings: KeyBindings::default(),
            assets,
            controller,
            game_loop: GameLoop::new(),
            hud: HudState::default(),
            window: None,
            gpu: None,
            scene: None,
            asset_failure: None,
            fatal: None,
            config,
        }
    }

    fn orbit_for(config: &Config, aspect: f32) -> OrbitCamera {
        let radius = config.planet.radius;
        let distance = config.planet.camera_distance.resolve(radius, aspect);
        OrbitCamera::new(distance, &config.input).with_distance_limits(
            radius * MIN_DISTANCE_RADII,
            config.starfield.min_radius * MAX_DISTANCE_STAR_FRACTION,
        )
    }

    /// Take the fatal error that ended the event loop, if any.
    pub fn take_fatal(&mut self) -> Option<AppError> {
        self.fatal.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    /// Load the next texture, and build the planet once all three are in.
    fn poll_assets(&mut self) {
        if self.assets.is_ready() || self.asset_failure.is_some() {
            return;
        }
        match self.assets.poll() {
            Ok(LoadProgress::Loaded(kind)) => {
                debug!(texture = %kind, "texture loaded");
                if self.assets.is_ready() {
                    let outcome = self.controller.on_assets_ready(&self.assets);
                    self.apply_outcome(outcome);
                }
            }
            Ok(LoadProgress::Complete) => {}
            Err(e) => {
                error!("{e}");
                self.asset_failure = Some(e.to_string());
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Result<RebuildOutcome, topo_planet::PlanetError>) {
        match outcome {
            Ok(RebuildOutcome::Rebuilt(report)) => {
                debug!(?report, "planet rebuilt");
            }
            Ok(RebuildOutcome::Deferred) => debug!("rebuild deferred until textures load"),
            Ok(RebuildOutcome::Unchanged) => {}
            Err(e) => {
                error!("planet rebuild failed: {e}");
                self.asset_failure = Some(e.to_string());
            }
        }
    }

    fn handle_actions(&mut self, event_loop: &ActiveEventLoop) {
        for action in self.bindings.resolve(&self.input.keyboard) {
            match action {
                ControlAction::Quit => {
                    info!("Quit requested");
                    event_loop.exit();
                }
                ControlAction::Reset => {
                    let outcome = self.controller.reset(&self.assets);
                    self.apply_outcome(outcome);
                }
                other => {
                    if let Some((parameter, steps)) = parameter_step(other) {
                        let outcome = self.controller.nudge(parameter, steps, &self.assets);
                        self.apply_outcome(outcome);
                    }
                }
            }
        }
    }

    fn apply_pointer_input(&mut self) {
        let drag = self.input.orbit_drag();
        if drag != glam::Vec2::ZERO {
            self.orbit.rotate(drag.x, drag.y);
        }
        let lines = self.input.zoom_lines();
        if lines != 0.0 {
            self.orbit.zoom(lines);
        }
        self.orbit.pinch(self.input.pinch_ratio());
    }

    fn status(&self) -> Option<String> {
        if let Some(failure) = &self.asset_failure {
            return Some(format!("error: {failure}"));
        }
        self.assets
            .next_missing()
            .map(|kind| format!("loading {kind} map"))
    }

    fn refresh_title(&mut self, now: Instant) {
        if !self.config.debug.show_hud || !self.hud.title_due(now) {
            return;
        }
        if let Some(window) = &self.window {
            let title = format_title(
                &self.config.window.title,
                &self.hud,
                &self.controller.summary(),
                self.status().as_deref(),
            );
            window.set_title(&title);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(scene) = &mut self.scene {
                scene.resize(gpu, width, height);
            }
        }
        info!("Window resized to {width}x{height}");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_assets();
        self.handle_actions(event_loop);
        self.apply_pointer_input();

        let orbit = &mut self.orbit;
        let controller = &mut self.controller;
        self.game_loop.tick(
            |dt, _sim_time| {
                orbit.update();
                controller.advance_rotation(dt as f32);
            },
            |_alpha| {},
        );
        self.orbit.apply_to(&mut self.camera);

        if let Err(e) = self.draw_frame() {
            self.fail(event_loop, e);
            return;
        }

        self.input.clear_transients();
        let now = Instant::now();
        self.hud.on_frame(now);
        self.refresh_title(now);

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Upload any rebuilt planet and draw. Does nothing before the GPU is up.
    fn draw_frame(&mut self) -> Result<(), AppError> {
        let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene) else {
            return Ok(());
        };
        scene.sync_planet(gpu, &mut self.controller, &self.assets)?;
        match scene.render(gpu, &self.camera, &self.controller) {
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                Ok(())
            }
            other => other.map_err(AppError::from),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => {
                let (width, height) = gpu.size();
                self.camera.set_aspect_ratio(width as f32, height as f32);
                self.orbit = Self::orbit_for(&self.config, gpu.aspect_ratio());
                self.scene = Some(SceneRenderer::new(&gpu, &self.config));
                info!("Renderer ready at {width}x{height}");
                self.gpu = Some(gpu);
            }
            Err(e) => {
                eprintln!("{}", unsupported_context_message(&e));
                self.fail(event_loop, e.into());
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.input.handle_window_event(&event) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it closes.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)?;
    match app.take_fatal() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topo_config::CameraDistance;
    use topo_input::RawKeyEvent;
    use winit::event::ElementState;
    use winit::keyboard::{KeyCode, PhysicalKey};

    fn procedural_config() -> Config {
        let mut config = Config::default();
        config.textures.procedural = true;
        config.textures.procedural_width = 16;
        config.planet.resolution = 8;
        config
    }

    fn press(app: &mut AppState, code: KeyCode) {
        app.input.keyboard.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    #[test]
    fn test_app_state_starts_without_window() {
        let app = AppState::with_config(procedural_config());
        assert!(app.window.is_none());
        assert!(app.gpu.is_none());
        assert!(app.controller.build().is_none());
    }

    #[test]
    fn test_camera_starts_at_configured_distance() {
        let mut config = procedural_config();
        config.planet.camera_distance = CameraDistance::Fixed(30.0);
        let app = AppState::with_config(config);
        assert!((app.orbit.distance - 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_stays_inside_star_shell() {
        let mut config = procedural_config();
        config.planet.camera_distance = CameraDistance::Fixed(1000.0);
        let app = AppState::with_config(config);
        assert!(app.orbit.distance < app.config.starfield.min_radius);
    }

    #[test]
    fn test_assets_load_one_per_poll_then_build() {
        let mut app = AppState::with_config(procedural_config());
        app.poll_assets();
        assert!(!app.assets.is_ready());
        assert!(app.status().is_some_and(|s| s.starts_with("loading")));
        app.poll_assets();
        app.poll_assets();
        assert!(app.assets.is_ready());
        assert!(app.controller.build().is_some());
        assert_eq!(app.status(), None);
    }

    #[test]
    fn test_parameter_steps_cover_every_parameter_key() {
        let mut stepped = Vec::new();
        for action in ControlAction::ALL {
            if let Some((parameter, steps)) = parameter_step(action) {
                assert_eq!(steps.abs(), 1);
                stepped.push(parameter);
            }
        }
        assert_eq!(stepped.len(), 6);
        assert!(parameter_step(ControlAction::Reset).is_none());
    }

    #[test]
    fn test_key_nudges_parameter_before_textures_load() {
        let mut app = AppState::with_config(procedural_config());
        let before = app.controller.params().bump_scale;
        press(&mut app, KeyCode::KeyE);
        let actions = app.bindings.resolve(&app.input.keyboard);
        assert_eq!(actions, vec![ControlAction::BumpUp]);
        if let Some((parameter, steps)) = parameter_step(actions[0]) {
            let outcome = app.controller.nudge(parameter, steps, &app.assets);
            assert!(matches!(outcome, Ok(RebuildOutcome::Deferred)));
        }
        assert!(app.controller.params().bump_scale > before);
    }

    #[test]
    fn test_pointer_drag_orbits_camera() {
        let mut config = procedural_config();
        config.input.damping_factor = 0.0;
        let mut app = AppState::with_config(config);
        let yaw = app.orbit.yaw;
        app.input.touch.on_touch(1, winit::event::TouchPhase::Started, 0.0, 0.0);
        app.input.touch.on_touch(1, winit::event::TouchPhase::Moved, 40.0, 0.0);
        app.apply_pointer_input();
        assert!((app.orbit.yaw - yaw).abs() > 1e-4);
    }
}
