use crate::assets::{AssetKey, AssetTable};
use crate::layout::{Rect, VIEW_HEIGHT};
use crate::scene::{GROUND_Y, Scene, Simulation};
use glam::DVec2;

pub const BACKGROUND_COLOR: &str = "#fcf8e3";

const PARALLAX: f64 = 0.2;
const SHOP_X: f64 = 300.0;
const SHOP_SCALE: f64 = 0.8;
const ACTOR_SCALE: f64 = 0.65;
const HUG_SCALE: f64 = 0.8;
const WALK_FRAME_TICKS: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Normal,
    /// Light sprite backgrounds drop out against the scene.
    Multiply,
}

pub trait SpriteImage {
    /// `None` while the image is missing or still decoding.
    fn natural_size(&self) -> Option<DVec2>;
}

/// Everything the renderer needs from a drawing backend.
pub trait Surface {
    type Image: SpriteImage;

    fn clear(&mut self, color: &str);
    fn draw_image(&mut self, image: &Self::Image, dest: Rect, blend: Blend);
    /// Petal centered on `at` in screen space, see [`petal_curves`].
    fn fill_petal(&mut self, at: DVec2, rotation: f64, size: f64, color: &str);
}

/// Which sprites stand in for the two actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cast {
    Hug,
    Pair {
        girl: AssetKey,
        boy: AssetKey,
        walking: bool,
    },
}

pub fn walk_frame(frame: u64) -> AssetKey {
    if (frame / WALK_FRAME_TICKS) % 2 == 0 {
        AssetKey::BoyWalk1
    } else {
        AssetKey::BoyWalk2
    }
}

pub fn cast_for(scene: Scene, frame: u64, hug_ready: bool) -> Cast {
    match scene {
        Scene::Celebration if hug_ready => Cast::Hug,
        Scene::Intro | Scene::Enter => Cast::Pair {
            girl: AssetKey::GirlStand,
            boy: walk_frame(frame),
            walking: true,
        },
        Scene::Kneel => Cast::Pair {
            girl: AssetKey::GirlStand,
            boy: AssetKey::BoyKneel,
            walking: false,
        },
        Scene::Reaction | Scene::Celebration => Cast::Pair {
            girl: AssetKey::GirlSurprise,
            boy: AssetKey::BoyKneel,
            walking: false,
        },
    }
}

/// Destination of a sprite anchored at its bottom-center on `at`.
pub fn sprite_rect(size: DVec2, at: DVec2, scale: f64, camera: DVec2) -> Rect {
    let w = size.x * scale;
    let h = size.y * scale;
    Rect::new(at.x - camera.x - w * 0.5, at.y - camera.y - h, w, h)
}

/// Two mirrored cubic Béziers from the origin down to `(0, size)` and back.
/// Each entry is `[control1, control2, end]`.
pub fn petal_curves(size: f64) -> [[DVec2; 3]; 2] {
    let s = size;
    [
        [
            DVec2::new(-s / 2.0, -s / 2.0),
            DVec2::new(-s, s / 3.0),
            DVec2::new(0.0, s),
        ],
        [
            DVec2::new(s, s / 3.0),
            DVec2::new(s / 2.0, -s / 2.0),
            DVec2::ZERO,
        ],
    ]
}

fn draw_sprite<S: Surface>(
    surface: &mut S,
    assets: &AssetTable<S::Image>,
    key: AssetKey,
    at: DVec2,
    scale: f64,
    camera: DVec2,
) {
    let Some((image, size)) = assets.loaded(key) else {
        return;
    };
    surface.draw_image(image, sprite_rect(size, at, scale, camera), Blend::Multiply);
}

pub fn draw_frame<S: Surface>(surface: &mut S, sim: &Simulation, assets: &AssetTable<S::Image>) {
    surface.clear(BACKGROUND_COLOR);

    if let Some((background, size)) = assets.loaded(AssetKey::Background) {
        let scale = VIEW_HEIGHT / size.y;
        let dest = Rect::new(-sim.camera.x * PARALLAX, 0.0, size.x * scale, VIEW_HEIGHT);
        surface.draw_image(background, dest, Blend::Normal);
    }

    let camera = sim.camera;
    draw_sprite(
        surface,
        assets,
        AssetKey::Shop,
        DVec2::new(SHOP_X, GROUND_Y),
        SHOP_SCALE,
        camera,
    );

    let hug_ready = assets.loaded(AssetKey::Hug).is_some();
    match cast_for(sim.scene, sim.frame, hug_ready) {
        Cast::Hug => {
            let at = DVec2::new(sim.midpoint_x(), GROUND_Y);
            draw_sprite(surface, assets, AssetKey::Hug, at, HUG_SCALE, camera);
        }
        Cast::Pair { girl, boy, walking } => {
            draw_sprite(surface, assets, girl, sim.girl, ACTOR_SCALE, camera);
            let bob = if walking { sim.boy.bob } else { 0.0 };
            let at = sim.boy.pos + DVec2::new(0.0, bob);
            draw_sprite(surface, assets, boy, at, ACTOR_SCALE, camera);
        }
    }

    if sim.scene != Scene::Celebration {
        return;
    }
    if let Some(particles) = &sim.particles {
        for p in particles.iter() {
            surface.fill_petal(p.pos - camera, p.rotation, p.size, p.color());
        }
    }
}
