//! Window creation and event handling via winit.
//!
//! [`ExplorerApp`] implements [`ApplicationHandler`]: it owns the window, the
//! GPU context, scene renderer and egui overlay, input state and the
//! [`Session`], and runs one fixed-timestep frame per redraw.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use solar_config::{CliArgs, Config};
use solar_input::{KeyBindings, KeyboardState, MouseState};
use glam::Vec2;
use solar_render::{
    FrameEncoder, RenderContext, SceneRenderer, StarfieldGenerator, SurfaceError, Viewport,
    init_render_context_blocking, label_anchors,
};
use solar_sim::Catalog;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::hud::HudState;
use crate::overlay::UiOverlay;
use crate::session::{AppRequest, Session};

/// Window attributes from the `window` config section.
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

fn starfield_from_config(config: &Config) -> StarfieldGenerator {
    StarfieldGenerator::new(
        config.scene.star_seed,
        config.scene.star_count,
        config.scene.star_radius,
        config.scene.star_depth,
    )
}

pub struct ExplorerApp {
    /// Effective config: the file contents with CLI overrides applied.
    config: Config,
    /// Config as last read from disk, used to detect edits on reload.
    disk_config: Config,
    cli: CliArgs,
    config_dir: PathBuf,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    scene: Option<SceneRenderer>,
    ui: Option<UiOverlay>,
    viewport: Viewport,
    game_loop: GameLoop,
    keyboard: KeyboardState,
    mouse: MouseState,
    bindings: KeyBindings,
    session: Session,
    hud: HudState,
    start_time: Instant,
}

impl ExplorerApp {
    /// `disk_config` is the file as loaded; `cli` overrides are layered on
    /// top now and again after every reload.
    pub fn new(disk_config: Config, cli: CliArgs, config_dir: PathBuf, catalog: Catalog) -> Self {
        let mut config = disk_config.clone();
        config.apply_cli_overrides(&cli);
        let bindings = KeyBindings::from_config(&config.input);
        for (key, first, second) in bindings.conflicts() {
            warn!("Key {key:?} is bound to both {first} and {second}");
        }
        Self {
            session: Session::new(catalog, &config),
            hud: HudState::new(config.debug.show_fps),
            viewport: Viewport::new(config.window.width, config.window.height, 1.0),
            config,
            disk_config,
            cli,
            config_dir,
            window: None,
            gpu: None,
            scene: None,
            ui: None,
            game_loop: GameLoop::new(),
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            bindings,
            start_time: Instant::now(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if !self.viewport.resize(width, height) {
            return;
        }
        let (w, h) = (self.viewport.width(), self.viewport.height());
        self.session.set_aspect_ratio(w as f32, h as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
            if let Some(scene) = &mut self.scene {
                scene.resize(&gpu.device, w, h);
            }
        }
        info!("Window resized to {}x{}", w, h);
    }

    fn reload_config(&mut self) {
        let mut reloaded = match self.disk_config.reload(&self.config_dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("Config unchanged");
                return;
            }
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };
        self.disk_config = reloaded.clone();
        reloaded.apply_cli_overrides(&self.cli);

        self.bindings = KeyBindings::from_config(&reloaded.input);
        self.hud.show_fps = reloaded.debug.show_fps;
        self.session.reconfigure(&reloaded);
        if reloaded.scene != self.config.scene
            && let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene)
        {
            scene.set_starfield(gpu, &starfield_from_config(&reloaded));
        }
        self.config = reloaded;
    }

    /// Scene pass, then the egui pass with labels and the info panel.
    fn render(&mut self) -> Result<(), SurfaceError> {
        let (Some(window), Some(gpu), Some(scene)) = (&self.window, &self.gpu, &mut self.scene)
        else {
            return Ok(());
        };
        let input = self.session.frame_input(self.start_time.elapsed().as_secs_f64());
        let mut frame = FrameEncoder::acquire(gpu)?;
        scene.render(gpu, &input, &mut frame);
        if let Some(ui) = &mut self.ui {
            let size = Vec2::new(self.viewport.width() as f32, self.viewport.height() as f32);
            let labels = label_anchors(&input, size);
            let panel = self.session.info_panel();
            ui.paint(window, gpu, &mut frame, &labels, panel.as_ref());
        }
        frame.submit(&gpu.queue);
        Ok(())
    }

    /// Input, fixed updates and rendering for one redraw.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        for action in self.bindings.triggered(&self.keyboard) {
            match self.session.handle_action(action) {
                Some(AppRequest::ToggleFps) => self.hud.toggle_fps(),
                Some(AppRequest::ReloadConfig) => self.reload_config(),
                None => {}
            }
        }
        self.session.pointer(
            self.mouse.drag_delta(),
            self.mouse.scroll(),
            self.mouse.click(),
            self.viewport.size(),
        );
        self.keyboard.clear_transients();
        self.mouse.clear_transients();

        let session = &mut self.session;
        self.game_loop.tick(|dt| session.fixed_update(dt), |_alpha| {});

        match self.render() {
            Ok(()) => self.hud.frame(),
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, reconfiguring");
                let (w, h) = (self.viewport.width(), self.viewport.height());
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(w, h);
                }
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
        }

        if let Some(window) = &self.window {
            window.set_title(&self.hud.title(&self.config.window.title, &self.session.status_line()));
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for ExplorerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.viewport = Viewport::new(size.width, size.height, window.scale_factor());
        self.session.set_aspect_ratio(
            self.viewport.width() as f32,
            self.viewport.height() as f32,
        );
        info!(
            "Window created: {}x{} (scale: {:.2})",
            self.viewport.width(),
            self.viewport.height(),
            self.viewport.scale_factor()
        );

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => {
                self.scene = Some(SceneRenderer::new(&gpu, &starfield_from_config(&self.config)));
                self.ui = Some(UiOverlay::new(&window, &gpu));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
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
        let ui_consumed = match (&mut self.ui, &self.window) {
            (Some(ui), Some(window)) => ui.on_window_event(window, &event),
            _ => false,
        };
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.viewport.set_scale_factor(scale_factor);
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.keyboard.reset(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            // Presses and wheel over the info panel stay with egui. Releases
            // always reach the scene so a drag never sticks.
            WindowEvent::MouseInput { state, button, .. } if !(ui_consumed && state.is_pressed()) => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_consumed => self.mouse.on_scroll(delta),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }
}

/// Create the event loop and run until the window closes.
#[instrument(skip_all)]
pub fn run(
    disk_config: Config,
    cli: CliArgs,
    config_dir: PathBuf,
    catalog: Catalog,
) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = ExplorerApp::new(disk_config, cli, config_dir, catalog);
    event_loop.run_app(&mut app)
}
