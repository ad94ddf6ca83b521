//! Window viewport tracking.
//!
//! Zero-size windows (minimized, or Wayland before the first configure) are
//! clamped to 1×1 so the GPU surface and the projection stay valid.

use glam::DVec2;

/// Physical size of the drawable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor,
        }
    }

    /// Apply a resize. Returns `true` if the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size in physical pixels, for cursor-to-NDC conversion.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_clamped() {
        let mut viewport = Viewport::new(0, 0, 1.0);
        assert_eq!((viewport.width(), viewport.height()), (1, 1));
        assert!(viewport.resize(1920, 1080));
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_size_is_not_a_change() {
        let mut viewport = Viewport::new(800, 600, 2.0);
        assert!(!viewport.resize(800, 600));
        assert!(viewport.resize(800, 0));
        assert_eq!(viewport.height(), 1);
    }

    #[test]
    fn test_scale_factor_tracked() {
        let mut viewport = Viewport::new(2880, 1800, 2.0);
        viewport.set_scale_factor(1.5);
        assert_eq!(viewport.scale_factor(), 1.5);
        assert_eq!(viewport.size(), DVec2::new(2880.0, 1800.0));
    }
}
