//! Background stars scattered through a spherical shell around the system.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::line::ColorVertex;

/// One background star.
#[derive(Clone, Debug, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    /// In `[0, 1]`; most stars are dim.
    pub brightness: f32,
    pub color: [f32; 3],
}

/// Deterministic star placement from a seed.
#[derive(Clone, Debug)]
pub struct StarfieldGenerator {
    seed: u64,
    count: u32,
    radius: f32,
    depth: f32,
}

impl StarfieldGenerator {
    /// Stars lie between `radius` and `radius + depth` from the origin.
    pub fn new(seed: u64, count: u32, radius: f32, depth: f32) -> Self {
        Self {
            seed,
            count,
            radius: radius.max(0.0),
            depth: depth.max(0.0),
        }
    }

    pub fn generate(&self) -> Vec<StarPoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.count)
            .map(|_| {
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let cos_phi = 1.0 - 2.0 * rng.random::<f32>();
                let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
                let direction = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
                let distance = self.radius + rng.random::<f32>() * self.depth;

                let brightness = rng.random::<f32>().powf(3.0);
                let warmth = rng.random::<f32>();
                StarPoint {
                    position: direction * distance,
                    brightness,
                    color: star_tint(warmth),
                }
            })
            .collect()
    }

    /// Point-list vertices, dim stars fading into the background.
    pub fn vertices(&self) -> Vec<ColorVertex> {
        self.generate()
            .iter()
            .map(|star| {
                let alpha = 0.35 + 0.65 * star.brightness;
                let [r, g, b] = star.color;
                ColorVertex::new(star.position, [r, g, b, alpha])
            })
            .collect()
    }
}

/// Blue-white for `warmth` 0 through white to pale yellow for 1.
fn star_tint(warmth: f32) -> [f32; 3] {
    let cool = [0.75, 0.85, 1.0];
    let warm = [1.0, 0.92, 0.75];
    let t = warmth.clamp(0.0, 1.0);
    [
        cool[0] + (warm[0] - cool[0]) * t,
        cool[1] + (warm[1] - cool[1]) * t,
        cool[2] + (warm[2] - cool[2]) * t,
    ]
}
