//! The scripted timeline: intro, walk-in, kneel, proposal, celebration.
//!
//! Everything here runs on a virtual clock of one tick per rendered frame, so
//! the whole script can be stepped without a browser.

use crate::layout::VIEW_WIDTH;
use crate::particles::ParticleField;
use glam::DVec2;

pub const GROUND_Y: f64 = 900.0;
pub const BOY_START_X: f64 = 2200.0;
pub const GIRL_X: f64 = 600.0;
pub const BOY_SPEED: f64 = 4.0;

const INTRO_FRAMES: u64 = 60;
const KNEEL_FRAMES: u64 = 60;
const KNEEL_DISTANCE: f64 = 300.0;
const BOB_FREQUENCY: f64 = 0.4;
const BOB_AMPLITUDE: f64 = 5.0;
/// Fraction of the view kept ahead of the walker while following him in.
const FOLLOW_LEAD: f64 = 0.7;
const CAMERA_FOLLOW: f64 = 0.05;
const CAMERA_PAN: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scene {
    Intro,
    Enter,
    Kneel,
    Reaction,
    Celebration,
}

impl Scene {
    pub fn name(self) -> &'static str {
        match self {
            Scene::Intro => "intro",
            Scene::Enter => "enter",
            Scene::Kneel => "kneel",
            Scene::Reaction => "reaction",
            Scene::Celebration => "celebration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walker {
    pub pos: DVec2,
    pub speed: f64,
    pub bob: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneChange {
    pub from: Scene,
    pub to: Scene,
    pub frame: u64,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    pub frame: u64,
    pub scene: Scene,
    pub camera: DVec2,
    pub boy: Walker,
    pub girl: DVec2,
    pub kneel_start: Option<u64>,
    pub particles: Option<ParticleField>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            frame: 0,
            scene: Scene::Intro,
            camera: DVec2::ZERO,
            boy: Walker {
                pos: DVec2::new(BOY_START_X, GROUND_Y),
                speed: BOY_SPEED,
                bob: 0.0,
            },
            girl: DVec2::new(GIRL_X, GROUND_Y),
            kneel_start: None,
            particles: None,
        }
    }

    pub fn midpoint_x(&self) -> f64 {
        (self.boy.pos.x + self.girl.x) * 0.5
    }

    /// Advances the script by one frame and reports a scene change, if any.
    pub fn tick(&mut self, rng: &mut fastrand::Rng) -> Option<SceneChange> {
        self.frame += 1;

        let next = match self.scene {
            Scene::Intro => self.intro(),
            Scene::Enter => self.enter(),
            Scene::Kneel => self.kneel(),
            Scene::Reaction => Scene::Reaction,
            Scene::Celebration => self.celebrate(rng),
        };

        self.transition(next)
    }

    /// The "yes" answer. Only the proposal scene can be accepted; the pool of
    /// petals is created here.
    pub fn accept(&mut self, rng: &mut fastrand::Rng) -> Option<SceneChange> {
        if self.scene != Scene::Reaction {
            return None;
        }

        self.particles = Some(ParticleField::new(rng));
        self.transition(Scene::Celebration)
    }

    fn intro(&mut self) -> Scene {
        if self.frame >= INTRO_FRAMES {
            Scene::Enter
        } else {
            Scene::Intro
        }
    }

    fn enter(&mut self) -> Scene {
        self.boy.pos.x -= self.boy.speed;
        self.boy.bob = (self.frame as f64 * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;
        self.ease_camera(self.boy.pos.x - VIEW_WIDTH * FOLLOW_LEAD, CAMERA_FOLLOW);

        if self.boy.pos.x - self.girl.x <= KNEEL_DISTANCE {
            self.boy.bob = 0.0;
            Scene::Kneel
        } else {
            Scene::Enter
        }
    }

    fn kneel(&mut self) -> Scene {
        self.ease_camera(self.midpoint_x() - VIEW_WIDTH * 0.5, CAMERA_PAN);

        let start = *self.kneel_start.get_or_insert(self.frame);
        if self.frame - start >= KNEEL_FRAMES {
            Scene::Reaction
        } else {
            Scene::Kneel
        }
    }

    fn celebrate(&mut self, rng: &mut fastrand::Rng) -> Scene {
        if let Some(particles) = &mut self.particles {
            particles.update(rng);
        }
        self.ease_camera(self.midpoint_x() - VIEW_WIDTH * 0.5, CAMERA_FOLLOW);
        Scene::Celebration
    }

    // Targets are clamped to the left edge of the world before smoothing.
    fn ease_camera(&mut self, target_x: f64, rate: f64) {
        let target = target_x.max(0.0);
        self.camera.x += (target - self.camera.x) * rate;
    }

    fn transition(&mut self, next: Scene) -> Option<SceneChange> {
        if next == self.scene {
            return None;
        }
        debug_assert!(next > self.scene, "scenes only move forward");

        let change = SceneChange {
            from: self.scene,
            to: next,
            frame: self.frame,
        };
        self.scene = next;
        if next == Scene::Kneel {
            self.kneel_start.get_or_insert(self.frame);
        }
        Some(change)
    }
}
