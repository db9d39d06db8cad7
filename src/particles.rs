use crate::layout::{VIEW_HEIGHT, VIEW_WIDTH};
use glam::DVec2;
use std::f64::consts::PI;

pub const PARTICLE_COUNT: usize = 100;

const SPAWN_DEPTH: f64 = 200.0;
const RESPAWN_DEPTH: f64 = 100.0;
const RECYCLE_ABOVE_Y: f64 = -100.0;
const DRIFT_RANGE: f64 = 4.0;
const RISE_MIN: f64 = 3.0;
const RISE_RANGE: f64 = 5.0;
const SIZE_MIN: f64 = 10.0;
const SIZE_RANGE: f64 = 30.0;
const HUE_MIN: f64 = 320.0;
const HUE_RANGE: f64 = 60.0;
const SPIN_RANGE: f64 = 0.1;

/// A single rising petal. Positions are in stage coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    pub size: f64,
    pub hue: f64,
    pub rotation: f64,
    pub spin: f64,
    color: String,
}

impl Particle {
    fn spawn(rng: &mut fastrand::Rng, view: DVec2) -> Self {
        let hue = HUE_MIN + rng.f64() * HUE_RANGE;
        Self {
            pos: DVec2::new(rng.f64() * view.x, view.y + rng.f64() * SPAWN_DEPTH),
            vel: DVec2::new(
                (rng.f64() - 0.5) * DRIFT_RANGE,
                -RISE_MIN - rng.f64() * RISE_RANGE,
            ),
            size: SIZE_MIN + rng.f64() * SIZE_RANGE,
            hue,
            rotation: rng.f64() * PI,
            spin: (rng.f64() - 0.5) * SPIN_RANGE,
            color: format!("hsl({:.1}, 90%, 70%)", hue),
        }
    }

    /// CSS fill for this petal, fixed at spawn.
    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Fixed pool of petals. Built once when the celebration starts and recycled
/// in place; the pool never grows or shrinks.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    view: DVec2,
}

impl ParticleField {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self::with_view(rng, DVec2::new(VIEW_WIDTH, VIEW_HEIGHT))
    }

    pub fn with_view(rng: &mut fastrand::Rng, view: DVec2) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle::spawn(rng, view))
            .collect();
        Self { particles, view }
    }

    pub fn update(&mut self, rng: &mut fastrand::Rng) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.rotation += p.spin;

            if p.pos.y < RECYCLE_ABOVE_Y {
                p.pos.y = self.view.y + RESPAWN_DEPTH;
                p.pos.x = rng.f64() * self.view.x;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_full_pool_within_ranges() {
        let mut rng = fastrand::Rng::with_seed(7);
        let field = ParticleField::new(&mut rng);
        assert_eq!(field.len(), PARTICLE_COUNT);

        for p in field.iter() {
            assert!((0.0..VIEW_WIDTH).contains(&p.pos.x));
            assert!((VIEW_HEIGHT..VIEW_HEIGHT + 200.0).contains(&p.pos.y));
            assert!((-2.0..2.0).contains(&p.vel.x));
            assert!(p.vel.y <= -3.0 && p.vel.y > -8.0);
            assert!((10.0..40.0).contains(&p.size));
            assert!((320.0..380.0).contains(&p.hue));
            assert!((0.0..PI).contains(&p.rotation));
            assert!((-0.05..0.05).contains(&p.spin));
        }
    }

    #[test]
    fn pool_size_and_depth_hold_over_many_frames() {
        let mut rng = fastrand::Rng::with_seed(42);
        let mut field = ParticleField::new(&mut rng);

        for _ in 0..5_000 {
            field.update(&mut rng);
            assert_eq!(field.len(), PARTICLE_COUNT);
            assert!(field.iter().all(|p| p.pos.y <= VIEW_HEIGHT + 300.0));
        }
    }

    #[test]
    fn recycling_keeps_velocity_size_and_hue() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut field = ParticleField::with_view(&mut rng, DVec2::new(100.0, 50.0));
        let before: Vec<(DVec2, f64, f64)> =
            field.iter().map(|p| (p.vel, p.size, p.hue)).collect();

        // Worst case: 250 units of travel at 3 units per frame.
        for _ in 0..100 {
            field.update(&mut rng);
        }

        let after: Vec<(DVec2, f64, f64)> =
            field.iter().map(|p| (p.vel, p.size, p.hue)).collect();
        assert_eq!(before, after);
        assert!(field.iter().all(|p| p.pos.y >= RECYCLE_ABOVE_Y));
    }

    #[test]
    fn particle_rises_and_spins_each_frame() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut field = ParticleField::new(&mut rng);
        let first = field.iter().next().cloned().expect("pool is not empty");

        field.update(&mut rng);
        let moved = field.iter().next().expect("pool is not empty");
        assert_eq!(moved.pos, first.pos + first.vel);
        assert_eq!(moved.rotation, first.rotation + first.spin);
    }

    #[test]
    fn color_is_hsl_and_survives_recycling() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut field = ParticleField::with_view(&mut rng, DVec2::new(100.0, 50.0));
        let before: Vec<String> = field.iter().map(|p| p.color().to_string()).collect();

        let first = field.iter().next().expect("pool is not empty");
        assert_eq!(before[0], format!("hsl({:.1}, 90%, 70%)", first.hue));

        for _ in 0..100 {
            field.update(&mut rng);
        }
        let after: Vec<&str> = field.iter().map(|p| p.color()).collect();
        assert_eq!(before, after);
    }
}
