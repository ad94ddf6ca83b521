//! Circular orbital motion and self-rotation.
//!
//! Positions are evaluated from the total elapsed simulation time through
//! `cos`/`sin`, never by accumulating per-frame angle deltas. Elapsed time is
//! itself derived from an integer tick count so it never drifts.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::{BodyId, Catalog};

/// Simulation tick length (60 Hz).
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Self-rotation added per tick, in radians.
pub const SPIN_PER_TICK: f64 = 0.01;

/// Random angular offset chosen once per body instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPhase(pub f64);

impl OrbitalPhase {
    /// Uniform angle in `[0, 2π)`.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.random_range(0.0..TAU))
    }
}

/// Planar position `(d·cos(s·t+φ), 0, d·sin(s·t+φ))`.
///
/// A body at distance 0 stays at the origin whatever its speed or phase.
pub fn orbital_position(distance: f64, speed: f64, phase: OrbitalPhase, elapsed: f64) -> DVec3 {
    if distance == 0.0 {
        return DVec3::ZERO;
    }
    let angle = speed * elapsed + phase.0;
    DVec3::new(distance * angle.cos(), 0.0, distance * angle.sin())
}

/// Positions of every catalog body at `elapsed` seconds, in catalog order.
///
/// `phases` must hold one entry per body.
pub fn advance(catalog: &Catalog, phases: &[OrbitalPhase], elapsed: f64) -> Vec<DVec3> {
    debug_assert_eq!(catalog.len(), phases.len());
    catalog
        .bodies()
        .iter()
        .zip(phases)
        .map(|(body, &phase)| orbital_position(body.distance, body.speed, phase, elapsed))
        .collect()
}

/// Fixed-step simulation clock that can be paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    ticks: u64,
    running: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            ticks: 0,
            running: true,
        }
    }
}

impl SimClock {
    /// Advance one tick if running.
    pub fn tick(&mut self) {
        if self.running {
            self.ticks += 1;
        }
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed simulation seconds.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * FIXED_DT
    }

    /// Accumulated self-rotation angle in radians.
    pub fn spin_angle(&self) -> f64 {
        self.ticks as f64 * SPIN_PER_TICK
    }
}

/// Per-frame state of one body handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: DVec3,
    /// Rotation about the body's vertical axis, in radians.
    pub spin: f64,
}

/// The live set of body instances: one phase per body plus the shared clock.
///
/// Creating a new orrery draws fresh phases, so re-entering the simulation
/// view rearranges the planets.
#[derive(Debug, Clone)]
pub struct Orrery {
    phases: Vec<OrbitalPhase>,
    clock: SimClock,
}

impl Orrery {
    /// Instantiate every body with a random phase drawn from `rng`.
    pub fn new(catalog: &Catalog, rng: &mut impl Rng) -> Self {
        let phases = catalog.ids().map(|_| OrbitalPhase::random(rng)).collect();
        Self {
            phases,
            clock: SimClock::default(),
        }
    }

    /// Reproducible layout from a fixed seed.
    pub fn with_seed(catalog: &Catalog, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(catalog, &mut rng)
    }

    pub fn phase(&self, id: BodyId) -> OrbitalPhase {
        self.phases[id.index()]
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// Advance the clock by one fixed tick.
    pub fn tick(&mut self) {
        self.clock.tick();
    }

    /// Body positions at the current clock time.
    pub fn positions(&self, catalog: &Catalog) -> Vec<DVec3> {
        advance(catalog, &self.phases, self.clock.elapsed())
    }

    /// Positions plus spin for every body. The star does not spin.
    pub fn poses(&self, catalog: &Catalog) -> Vec<BodyPose> {
        let spin = self.clock.spin_angle();
        self.positions(catalog)
            .into_iter()
            .zip(catalog.bodies())
            .map(|(position, body)| BodyPose {
                position,
                spin: if body.is_star() { 0.0 } else { spin },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_of(p: DVec3) -> f64 {
        p.z.atan2(p.x).rem_euclid(TAU)
    }

    #[test]
    fn test_position_formula() {
        let p = orbital_position(5.0, 2.0, OrbitalPhase(0.0), 0.0);
        assert!((p - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-12);

        let t = std::f64::consts::FRAC_PI_4;
        let p = orbital_position(5.0, 2.0, OrbitalPhase(0.0), t);
        assert!((p - DVec3::new(0.0, 0.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_phase_offsets_angle() {
        let p = orbital_position(8.0, 1.0, OrbitalPhase(std::f64::consts::PI), 0.0);
        assert!((p.x + 8.0).abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_star_stays_at_origin() {
        for t in [0.0, 1.0, 100.0, 12345.6] {
            assert_eq!(orbital_position(0.0, 3.0, OrbitalPhase(1.2), t), DVec3::ZERO);
        }
    }

    #[test]
    fn test_orbit_radius_constant_in_plane() {
        for i in 0..50 {
            let t = i as f64 * 0.37;
            let p = orbital_position(11.0, 0.3, OrbitalPhase(0.5), t);
            assert!((p.length() - 11.0).abs() < 1e-9, "at t={t}, r={}", p.length());
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn test_distinct_angular_positions_over_time() {
        let phase = OrbitalPhase(0.3);
        let speed = 0.47;
        let a = angle_of(orbital_position(5.0, speed, phase, 1.0));
        let b = angle_of(orbital_position(5.0, speed, phase, 2.5));
        assert!((a - b).abs() > 1e-6);

        // A whole revolution lands back on the same angle.
        let period = TAU / speed;
        let c = orbital_position(5.0, speed, phase, 1.0 + period);
        assert!((orbital_position(5.0, speed, phase, 1.0) - c).length() < 1e-9);
    }

    #[test]
    fn test_clock_elapsed_from_ticks() {
        let mut clock = SimClock::default();
        for _ in 0..600 {
            clock.tick();
        }
        assert_eq!(clock.ticks(), 600);
        assert!((clock.elapsed() - 10.0).abs() < 1e-12);
        assert!((clock.spin_angle() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_paused_clock_holds() {
        let mut clock = SimClock::default();
        clock.tick();
        clock.set_running(false);
        for _ in 0..10 {
            clock.tick();
        }
        assert_eq!(clock.ticks(), 1);
        clock.set_running(true);
        clock.tick();
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_random_phase_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let phase = OrbitalPhase::random(&mut rng);
            assert!((0.0..TAU).contains(&phase.0));
        }
    }

    #[test]
    fn test_seeded_orrery_reproducible() {
        let catalog = Catalog::builtin().unwrap();
        let a = Orrery::with_seed(&catalog, 42);
        let b = Orrery::with_seed(&catalog, 42);
        assert_eq!(a.positions(&catalog), b.positions(&catalog));

        let c = Orrery::with_seed(&catalog, 43);
        assert_ne!(a.positions(&catalog), c.positions(&catalog));
    }

    #[test]
    fn test_advance_matches_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let mut orrery = Orrery::with_seed(&catalog, 7);
        orrery.tick();
        let positions = orrery.positions(&catalog);
        assert_eq!(positions.len(), catalog.len());
        for (p, body) in positions.iter().zip(catalog.bodies()) {
            assert!((p.length() - body.distance).abs() < 1e-9);
        }
    }

    #[test]
    fn test_star_does_not_spin() {
        let catalog = Catalog::builtin().unwrap();
        let mut orrery = Orrery::with_seed(&catalog, 7);
        for _ in 0..30 {
            orrery.tick();
        }
        let poses = orrery.poses(&catalog);
        assert_eq!(poses[catalog.star().index()].spin, 0.0);
        assert!((poses[1].spin - 0.3).abs() < 1e-12);
    }
}
