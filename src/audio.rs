use crate::console;
use js_sys::Promise;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Event, HtmlAudioElement};

pub const MUSIC_PATH: &str = "/music.mp3";
const MUSIC_VOLUME: f64 = 0.5;
const UNLOCK_EVENTS: [&str; 2] = ["click", "keydown"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Pending,
    Playing,
    /// Autoplay was refused; the next click or key press retries.
    AwaitingGesture,
}

impl Playback {
    /// Whether a `play()` call should be issued now.
    pub fn request(&mut self) -> bool {
        if *self == Playback::Pending {
            return false;
        }
        *self = Playback::Pending;
        true
    }

    pub fn resolve(&mut self) {
        *self = Playback::Playing;
    }

    pub fn reject(&mut self) {
        *self = Playback::AwaitingGesture;
    }
}

struct UnlockInner {
    document: Document,
    callback: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    armed: Cell<bool>,
}

impl UnlockInner {
    fn remove_listeners(&self) {
        if !self.armed.replace(false) {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        for event in UNLOCK_EVENTS {
            let _ = self
                .document
                .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
    }
}

/// Listens for the first click or key press on a document. Both listeners
/// come off before `on_unlock` runs, so it runs once per arming.
pub struct GestureUnlock {
    inner: Rc<UnlockInner>,
}

impl GestureUnlock {
    pub fn arm(
        document: &Document,
        mut on_unlock: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let inner = Rc::new(UnlockInner {
            document: document.clone(),
            callback: RefCell::new(None),
            armed: Cell::new(false),
        });

        let weak: Weak<UnlockInner> = Rc::downgrade(&inner);
        let callback = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(inner) = weak.upgrade() {
                inner.remove_listeners();
            }
            on_unlock();
        }) as Box<dyn FnMut(Event)>);

        for event in UNLOCK_EVENTS {
            document.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        }
        inner.armed.set(true);
        *inner.callback.borrow_mut() = Some(callback);

        Ok(Self { inner })
    }

    pub fn is_armed(&self) -> bool {
        self.inner.armed.get()
    }

    pub fn disarm(&self) {
        self.inner.remove_listeners();
    }
}

impl Drop for GestureUnlock {
    fn drop(&mut self) {
        self.disarm();
    }
}

struct MusicInner {
    element: HtmlAudioElement,
    document: Document,
    playback: Cell<Playback>,
    unlock: RefCell<Option<GestureUnlock>>,
}

/// The single looping background track.
#[derive(Clone)]
pub struct BackgroundMusic {
    inner: Rc<MusicInner>,
}

impl BackgroundMusic {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(MUSIC_PATH)?;
        element.set_loop(true);
        element.set_volume(MUSIC_VOLUME);

        Ok(Self {
            inner: Rc::new(MusicInner {
                element,
                document: document.clone(),
                playback: Cell::new(Playback::Stopped),
                unlock: RefCell::new(None),
            }),
        })
    }

    pub fn playback(&self) -> Playback {
        self.inner.playback.get()
    }

    pub fn play(&self) {
        let mut playback = self.inner.playback.get();
        let should_play = playback.request();
        self.inner.playback.set(playback);
        if !should_play {
            return;
        }

        // A synchronous throw takes the same async path so a running unlock
        // listener is never replaced from inside itself.
        let promise = self
            .inner
            .element
            .play()
            .unwrap_or_else(|err| Promise::reject(&err));

        let music = self.clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    let mut playback = music.inner.playback.get();
                    playback.resolve();
                    music.inner.playback.set(playback);
                    music.disarm_unlock();
                }
                Err(err) => music.rejected(&err),
            }
        });
    }

    /// Restarts the track if something paused it.
    pub fn ensure_playing(&self) {
        if self.inner.element.paused() {
            self.play();
        }
    }

    fn rejected(&self, err: &JsValue) {
        let mut playback = self.inner.playback.get();
        playback.reject();
        self.inner.playback.set(playback);

        console::warn(&format!(
            "autoplay blocked, waiting for a click or key press ({})",
            console::describe(err)
        ));
        self.arm_unlock();
    }

    fn arm_unlock(&self) {
        let music = self.clone();
        match GestureUnlock::arm(&self.inner.document, move || music.play()) {
            Ok(unlock) => {
                self.inner.unlock.replace(Some(unlock));
            }
            Err(err) => console::warn(&format!(
                "could not listen for a gesture: {}",
                console::describe(&err)
            )),
        }
    }

    fn disarm_unlock(&self) {
        self.inner.unlock.borrow_mut().take();
    }
}
