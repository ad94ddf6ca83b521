//! Frame-coherent mouse state with click/drag disambiguation.
//!
//! The left button both selects (click) and orbits the camera (drag). A press
//! that travels less than [`CLICK_SLOP`] pixels before release is a click.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Maximum cursor travel, in physical pixels, for a press to count as a click.
pub const CLICK_SLOP: f32 = 4.0;

/// Pixels per wheel line for touchpad pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    left_held: bool,
    travel: f32,
    drag: Vec2,
    scroll: f32,
    click: Option<Vec2>,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event handlers ──────────────────────────────────────────────

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if self.left_held {
            let delta = new_pos - self.position;
            self.drag += delta;
            self.travel += delta.length();
        }
        self.position = new_pos;
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.left_held = true;
                self.travel = 0.0;
            }
            ElementState::Released => {
                if self.left_held && self.travel <= CLICK_SLOP {
                    self.click = Some(self.position);
                }
                self.left_held = false;
            }
        }
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Cursor left the window: abandon any drag in progress.
    pub fn on_cursor_left(&mut self) {
        self.left_held = false;
    }

    /// Clears drag, scroll and click. Call at the end of each frame.
    pub fn clear_transients(&mut self) {
        self.drag = Vec2::ZERO;
        self.scroll = 0.0;
        self.click = None;
    }

    // ── Queries ─────────────────────────────────────────────────────

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Cursor movement this frame while the left button was held.
    #[must_use]
    pub fn drag_delta(&self) -> Vec2 {
        self.drag
    }

    /// Wheel lines this frame (positive = away from the user).
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Cursor position of a click completed this frame.
    #[must_use]
    pub fn click(&self) -> Option<Vec2> {
        self.click
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_short_press_is_click() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 50.0);
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_cursor_moved(102.0, 51.0);
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(mouse.click(), Some(Vec2::new(102.0, 51.0)));
    }

    #[test]
    fn test_long_drag_is_not_click() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 50.0);
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_cursor_moved(140.0, 50.0);
        assert_eq!(mouse.drag_delta(), Vec2::new(40.0, 0.0));
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(mouse.click(), None);
    }

    #[test]
    fn test_back_and_forth_drag_is_not_click() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_cursor_moved(30.0, 0.0);
        mouse.on_cursor_moved(0.0, 0.0);
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(mouse.click(), None);
    }

    #[test]
    fn test_hover_does_not_drag() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(10.0, 10.0);
        mouse.on_cursor_moved(90.0, 10.0);
        assert_eq!(mouse.drag_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        mouse.on_button(MouseButton::Right, ElementState::Released);
        assert_eq!(mouse.click(), None);
    }

    #[test]
    fn test_scroll_accumulates_and_clears() {
        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        mouse.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert!((mouse.scroll() - 3.0).abs() < 1e-6);
        mouse.clear_transients();
        assert_eq!(mouse.scroll(), 0.0);
    }

    #[test]
    fn test_click_cleared_next_frame() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert!(mouse.click().is_some());
        mouse.clear_transients();
        assert!(mouse.click().is_none());
    }
}
