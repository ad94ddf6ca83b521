//! Input handling for Solar Explorer: frame-coherent keyboard and mouse state,
//! configurable key bindings, and translation of bound actions into explorer
//! commands.

pub mod bindings;
pub mod intent;
pub mod keyboard;
pub mod mouse;

pub use bindings::{InputAction, KeyBindings, key_from_name};
pub use intent::Intent;
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
