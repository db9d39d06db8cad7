use crate::render::SpriteImage;
use glam::DVec2;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background,
    Shop,
    GirlStand,
    GirlSurprise,
    BoyWalk1,
    BoyWalk2,
    BoyKneel,
    Hug,
}

impl AssetKey {
    pub const ALL: [AssetKey; 8] = [
        AssetKey::Background,
        AssetKey::Shop,
        AssetKey::GirlStand,
        AssetKey::GirlSurprise,
        AssetKey::BoyWalk1,
        AssetKey::BoyWalk2,
        AssetKey::BoyKneel,
        AssetKey::Hug,
    ];

    pub fn path(self) -> &'static str {
        match self {
            AssetKey::Background => "/background.jpg",
            AssetKey::Shop => "/shop.jpg",
            AssetKey::GirlStand => "/girl_stand.png",
            AssetKey::GirlSurprise => "/girl_surprise.png",
            AssetKey::BoyWalk1 => "/boy_walk1.jpg",
            AssetKey::BoyWalk2 => "/boy_walk2.jpg",
            AssetKey::BoyKneel => "/boy_kneel.png",
            AssetKey::Hug => "/hug.jpg",
        }
    }
}

/// Image handles by logical name. Filled once at startup.
#[derive(Clone, Debug)]
pub struct AssetTable<I> {
    images: HashMap<AssetKey, I>,
}

impl<I> Default for AssetTable<I> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
        }
    }
}

impl<I> AssetTable<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AssetKey, image: I) {
        self.images.insert(key, image);
    }

    pub fn get(&self, key: AssetKey) -> Option<&I> {
        self.images.get(&key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<I: SpriteImage> AssetTable<I> {
    /// The image and its natural size, only if it decoded to something
    /// drawable.
    pub fn loaded(&self, key: AssetKey) -> Option<(&I, DVec2)> {
        let image = self.get(key)?;
        let size = image.natural_size()?;
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        Some((image, size))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Counts resolved loads. Failures count the same as successes so a broken
/// asset can never stall startup.
#[derive(Clone, Copy, Debug)]
pub struct Readiness {
    total: usize,
    loaded: usize,
    failed: usize,
    fired: bool,
}

impl Readiness {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            loaded: 0,
            failed: 0,
            fired: false,
        }
    }

    /// Returns true exactly once, on the record that resolves the last asset.
    pub fn record(&mut self, outcome: LoadOutcome) -> bool {
        match outcome {
            LoadOutcome::Loaded => self.loaded += 1,
            LoadOutcome::Failed => self.failed += 1,
        }

        if self.fired || self.resolved() < self.total {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn resolved(&self) -> usize {
        self.loaded + self.failed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn is_ready(&self) -> bool {
        self.fired
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartReason {
    AssetsReady,
    SafetyTimeout,
}

impl StartReason {
    pub fn name(self) -> &'static str {
        match self {
            StartReason::AssetsReady => "assets_ready",
            StartReason::SafetyTimeout => "forced_start",
        }
    }
}

/// First caller wins; every later call is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct StartGuard {
    started_by: Option<StartReason>,
}

impl StartGuard {
    pub fn try_start(&mut self, reason: StartReason) -> bool {
        if self.started_by.is_some() {
            return false;
        }
        self.started_by = Some(reason);
        true
    }

    pub fn started_by(&self) -> Option<StartReason> {
        self.started_by
    }
}

impl SpriteImage for HtmlImageElement {
    fn natural_size(&self) -> Option<DVec2> {
        if !self.complete() || self.natural_width() == 0 {
            return None;
        }
        Some(DVec2::new(
            self.natural_width() as f64,
            self.natural_height() as f64,
        ))
    }
}

/// Requests every asset. `on_resolved` runs exactly once per key, from the
/// image's load or error event.
pub fn load_assets(
    on_resolved: impl Fn(AssetKey, LoadOutcome) + 'static,
) -> Result<AssetTable<HtmlImageElement>, JsValue> {
    let on_resolved = Rc::new(on_resolved);
    let mut table = AssetTable::new();

    for key in AssetKey::ALL {
        let image = HtmlImageElement::new()?;

        let notify = Rc::clone(&on_resolved);
        let onload = Closure::once_into_js(move || notify(key, LoadOutcome::Loaded));
        image.set_onload(Some(onload.unchecked_ref()));

        let notify = Rc::clone(&on_resolved);
        let onerror = Closure::once_into_js(move || notify(key, LoadOutcome::Failed));
        image.set_onerror(Some(onerror.unchecked_ref()));

        image.set_src(key.path());
        table.insert(key, image);
    }

    Ok(table)
}
