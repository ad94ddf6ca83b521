//! Everything the application drives between input and rendering, kept free
//! of window and GPU handles.
//!
//! A [`Session`] owns the view sequence, the body instances and explorer
//! state once the simulation starts, and the orbit camera. The window layer
//! feeds it bound actions, pointer input and fixed ticks, then asks it for a
//! [`FrameInput`].

use glam::{DVec2, DVec3, Vec2, Vec3};
use solar_config::Config;
use solar_input::{InputAction, Intent};
use solar_render::{Camera, FrameInput};
use solar_sim::info::{status_line, tour_headline};
use solar_sim::picking::{cursor_to_ndc, pick};
use solar_sim::{
    BodyPose, Catalog, DisplaySettings, ExplorerCommand, ExplorerEvent, ExplorerState, InfoPanel,
    Orrery, Ray, ViewMode, ViewSequencer,
};
use tracing::{debug, info};

use crate::orbit_camera::OrbitCamera;

/// Intents that only the window layer can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRequest {
    ToggleFps,
    ReloadConfig,
}

/// Live state of the simulation view.
struct Simulation {
    orrery: Orrery,
    explorer: ExplorerState,
    poses: Vec<BodyPose>,
}

pub struct Session {
    catalog: Catalog,
    sequencer: ViewSequencer,
    initial_settings: DisplaySettings,
    phase_seed: Option<u64>,
    simulation: Option<Simulation>,
    orbit: OrbitCamera,
    camera: Camera,
}

impl Session {
    pub fn new(catalog: Catalog, config: &Config) -> Self {
        let mut session = Self {
            catalog,
            sequencer: ViewSequencer::new(config.scene.loading_seconds, config.scene.skip_intro),
            initial_settings: DisplaySettings::from(&config.display),
            phase_seed: config.scene.phase_seed,
            simulation: None,
            orbit: OrbitCamera::from_config(&config.camera),
            camera: Camera::default(),
        };
        if session.sequencer.mode() == ViewMode::Simulation {
            session.enter_simulation();
        }
        session.orbit.apply(&mut session.camera);
        session
    }

    pub fn mode(&self) -> ViewMode {
        self.sequencer.mode()
    }

    pub fn explorer(&self) -> Option<&ExplorerState> {
        self.simulation.as_ref().map(|sim| &sim.explorer)
    }

    /// Catalog-ordered poses; empty before the simulation starts.
    pub fn poses(&self) -> &[BodyPose] {
        self.simulation
            .as_ref()
            .map_or(&[][..], |sim| sim.poses.as_slice())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> DisplaySettings {
        self.explorer()
            .map_or(self.initial_settings, ExplorerState::settings)
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.camera.set_aspect_ratio(width, height);
    }

    pub fn status_line(&self) -> String {
        status_line(
            self.mode(),
            self.explorer(),
            self.sequencer.loading_progress(),
        )
    }

    /// Info panel contents for the selected body.
    pub fn info_panel(&self) -> Option<InfoPanel> {
        let explorer = self.explorer()?;
        let id = explorer.selection()?;
        Some(InfoPanel::for_body(self.catalog.get(id)))
    }

    fn enter_simulation(&mut self) {
        let seed = self.phase_seed.unwrap_or_else(rand::random::<u64>);
        let orrery = Orrery::with_seed(&self.catalog, seed);
        let poses = orrery.poses(&self.catalog);
        info!(
            "Simulation started with {} bodies (phase seed {seed})",
            self.catalog.len()
        );
        self.simulation = Some(Simulation {
            orrery,
            explorer: ExplorerState::new(self.catalog.clone(), self.initial_settings),
            poses,
        });
    }

    fn on_transition(&mut self, transition: Option<ViewMode>) {
        if transition == Some(ViewMode::Simulation) {
            self.enter_simulation();
        }
    }

    /// Act on one bound key action.
    pub fn handle_action(&mut self, action: InputAction) -> Option<AppRequest> {
        match Intent::resolve(action, self.settings()) {
            Intent::Proceed => {
                let transition = self.sequencer.proceed();
                self.on_transition(transition);
            }
            Intent::Explorer(command) => self.apply(command),
            Intent::ResetCamera => {
                self.orbit.reset();
                self.orbit.apply(&mut self.camera);
                info!("Camera reset");
            }
            Intent::ToggleFps => return Some(AppRequest::ToggleFps),
            Intent::ReloadConfig => return Some(AppRequest::ReloadConfig),
        }
        None
    }

    /// Run an explorer command. Ignored until the simulation view.
    pub fn apply(&mut self, command: ExplorerCommand) {
        let Some(sim) = self.simulation.as_mut() else {
            debug!("Ignoring {command:?} outside the simulation");
            return;
        };
        for event in sim.explorer.apply(command) {
            log_event(&sim.explorer, event);
        }
    }

    /// Per-frame pointer input: drag orbits, wheel zooms, click picks.
    pub fn pointer(&mut self, drag: Vec2, scroll: f32, click: Option<Vec2>, viewport: DVec2) {
        if self.mode() != ViewMode::Simulation {
            return;
        }
        if drag != Vec2::ZERO {
            self.orbit.drag(drag);
        }
        if scroll != 0.0 {
            self.orbit.zoom(scroll);
        }
        self.orbit.apply(&mut self.camera);
        if let Some(cursor) = click {
            self.click(cursor.as_dvec2(), viewport);
        }
    }

    /// Select the nearest body under `cursor`. Empty space changes nothing.
    pub fn click(&mut self, cursor: DVec2, viewport: DVec2) {
        let Some(sim) = &self.simulation else {
            return;
        };
        let inverse = self.camera.view_projection_matrix().as_dmat4().inverse();
        let Some(ray) = Ray::from_ndc(cursor_to_ndc(cursor, viewport), inverse) else {
            return;
        };
        let positions: Vec<DVec3> = sim.poses.iter().map(|pose| pose.position).collect();
        match pick(&ray, &self.catalog, &positions) {
            Some(id) => self.apply(ExplorerCommand::Select(Some(id))),
            None => debug!("Click at {cursor} hit empty space"),
        }
    }

    /// One fixed simulation step of `dt` seconds.
    pub fn fixed_update(&mut self, dt: f64) {
        let transition = self.sequencer.tick(dt);
        self.on_transition(transition);

        let settings = self.settings();
        let mut focus = Vec3::ZERO;
        if let Some(sim) = &mut self.simulation {
            sim.orrery.clock_mut().set_running(settings.auto_rotate);
            sim.orrery.tick();
            sim.poses = sim.orrery.poses(&self.catalog);
            if let Some(id) = sim.explorer.selection() {
                focus = sim.poses[id.index()].position.as_vec3();
            }
        }
        self.orbit.update(dt as f32, settings.auto_rotate, focus);
        self.orbit.apply(&mut self.camera);
    }

    /// Apply a reloaded config. Display settings are only pushed when the
    /// `display` section itself changed, so runtime toggles survive reloads
    /// of unrelated sections.
    pub fn reconfigure(&mut self, config: &Config) {
        self.orbit.configure(&config.camera);
        self.orbit.apply(&mut self.camera);
        self.phase_seed = config.scene.phase_seed;
        let display = DisplaySettings::from(&config.display);
        if display != self.initial_settings {
            self.initial_settings = display;
            self.apply(ExplorerCommand::UpdateSettings(display));
        }
    }

    /// Snapshot for the renderer. `time` is wall-clock seconds.
    pub fn frame_input(&self, time: f64) -> FrameInput<'_> {
        let explorer = self.explorer();
        FrameInput {
            mode: self.mode(),
            camera: &self.camera,
            catalog: &self.catalog,
            poses: self.poses(),
            settings: self.settings(),
            selection: explorer.and_then(ExplorerState::selection),
            tour_progress: explorer.and_then(ExplorerState::tour_progress),
            loading_progress: self.sequencer.loading_progress(),
            time,
        }
    }
}

fn log_event(explorer: &ExplorerState, event: ExplorerEvent) {
    let catalog = explorer.catalog();
    match event {
        ExplorerEvent::SelectionChanged(Some(id)) => {
            let body = catalog.get(id);
            info!("Selected {}", body.name);
            debug!("\n{}", InfoPanel::for_body(body));
        }
        ExplorerEvent::SelectionChanged(None) => info!("Selection cleared"),
        ExplorerEvent::TourStarted => info!("Tour started"),
        ExplorerEvent::TourStopped => info!("Tour stopped"),
        ExplorerEvent::TourMoved(index) => {
            if let Some(id) = catalog.id_at(index) {
                info!("{} ({}/{})", tour_headline(catalog.get(id)), index + 1, catalog.len());
            }
        }
        ExplorerEvent::SettingsChanged(settings) => {
            info!("Display settings changed: {settings:?}");
        }
    }
}
