//! Simulation core of Solar Explorer: the body catalog, orbital motion, and
//! the selection/tour/settings state the user drives.
//!
//! Nothing here touches the GPU or the window. The renderer consumes
//! [`Orrery::poses`] and [`ExplorerState`] each frame; input handling produces
//! [`ExplorerCommand`]s.

pub mod catalog;
pub mod explorer;
pub mod info;
pub mod motion;
pub mod picking;
pub mod selection;
pub mod settings;
pub mod tour;
pub mod view;

pub use catalog::{BodyCategory, BodyDetails, BodyId, Catalog, CatalogError, CelestialBody};
pub use explorer::{ExplorerCommand, ExplorerEvent, ExplorerState};
pub use info::InfoPanel;
pub use motion::{BodyPose, FIXED_DT, OrbitalPhase, Orrery, SimClock, advance, orbital_position};
pub use picking::Ray;
pub use selection::Selection;
pub use settings::{AMBIENT_STEP, DisplaySettings, SettingToggle, SettingsStore};
pub use tour::TourState;
pub use view::{ViewMode, ViewSequencer};
