//! Frame-coherent keyboard state.
//!
//! Physical key codes are used so bindings stay put across keyboard layouts.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, constructible in tests.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

/// Keys held right now and keys pressed since the last
/// [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Repeats and unidentified keys are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(code) {
                    self.just_pressed.insert(code);
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    #[must_use]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Drop everything, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }

    /// Call at the end of each frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(code: KeyCode, state: ElementState, repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    #[test]
    fn test_press_sets_held_and_just_pressed() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyT, ElementState::Pressed, false));
        assert!(kb.is_held(KeyCode::KeyT));
        assert!(kb.just_pressed(KeyCode::KeyT));
    }

    #[test]
    fn test_just_pressed_lasts_one_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::ArrowRight, ElementState::Pressed, false));
        kb.clear_transients();
        assert!(!kb.just_pressed(KeyCode::ArrowRight));
        assert!(kb.is_held(KeyCode::ArrowRight));
    }

    #[test]
    fn test_repeat_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::ArrowRight, ElementState::Pressed, false));
        kb.clear_transients();
        kb.process_raw(raw(KeyCode::ArrowRight, ElementState::Pressed, true));
        assert!(!kb.just_pressed(KeyCode::ArrowRight));
    }

    #[test]
    fn test_release_clears_held() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyO, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyO, ElementState::Released, false));
        assert!(!kb.is_held(KeyCode::KeyO));
        // The press still counts for this frame.
        assert!(kb.just_pressed(KeyCode::KeyO));
    }

    #[test]
    fn test_reset_forgets_held_keys() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyL, ElementState::Pressed, false));
        kb.reset();
        assert!(!kb.is_held(KeyCode::KeyL));
        kb.process_raw(raw(KeyCode::KeyL, ElementState::Pressed, false));
        assert!(kb.just_pressed(KeyCode::KeyL));
    }
}
