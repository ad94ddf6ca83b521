//! Solar Explorer application: window, event handling and the frame loop.

pub mod game_loop;
pub mod hud;
pub mod orbit_camera;
pub mod overlay;
pub mod platform;
pub mod session;
pub mod window;
