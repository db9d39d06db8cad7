pub mod assets;
pub mod audio;
pub mod canvas;
pub mod config;
mod console;
pub mod evasive;
pub mod layout;
pub mod messages;
pub mod particles;
pub mod render;
pub mod scene;
pub mod ui;

use assets::{AssetKey, AssetTable, LoadOutcome, Readiness, StartGuard, StartReason, load_assets};
use audio::BackgroundMusic;
use canvas::CanvasSurface;
use config::Config;
use evasive::{ButtonMove, EvasiveButton};
use glam::DVec2;
use layout::{Letterbox, Rect, letterbox};
use messages::{MessageSequencer, SequenceStep};
use scene::{Scene, SceneChange, Simulation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use ui::{VISIBLE_CLASS, set_hidden};
use web_sys::{
    Document, Event, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, Window,
};

const STAGE_ID: &str = "stage";
const LOADING_ID: &str = "loading";
const PROPOSAL_ID: &str = "proposal-ui";
const CELEBRATION_ID: &str = "celebration-ui";
const YES_ID: &str = "btn-yes";
const NO_ID: &str = "btn-no";
const QUOTE_SELECTOR: &str = ".quote";
const PROPOSAL_DELAY_MS: i32 = 1000;

struct AppState {
    document: Document,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    loading: Option<HtmlElement>,
    proposal_ui: HtmlElement,
    celebration_ui: HtmlElement,
    quote: HtmlElement,
    no_button: HtmlElement,
    sim: Simulation,
    rng: fastrand::Rng,
    assets: AssetTable<HtmlImageElement>,
    readiness: Readiness,
    start: StartGuard,
    evasive: EvasiveButton,
    sequencer: Option<MessageSequencer>,
    music: Option<BackgroundMusic>,
    frame_css: Option<Letterbox>,
    last_event: String,
}

fn window() -> Window {
    web_sys::window().expect("missing window")
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected element type", id)))
}

fn set_status(document: &Document, status: &str) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-scene-status", status);
    }
}

fn set_scene_attr(document: &Document, scene: Scene) {
    if let Some(el) = document.document_element() {
        let _ = el.set_attribute("data-scene", scene.name());
    }
}

fn record_event(state: &mut AppState, event: impl Into<String>) {
    let event = event.into();
    if state.last_event != event {
        console::info(&format!("[{}] {}", state.sim.frame, event));
    }
    state.last_event = event;
}

fn viewport_size(window: &Window) -> DVec2 {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    DVec2::new(width, height)
}

fn set_frame_css_vars(document: &Document, frame: &Letterbox) {
    let Some(el) = document.document_element() else {
        return;
    };
    let Ok(html_el) = el.dyn_into::<HtmlElement>() else {
        return;
    };

    let style = html_el.style();
    let _ = style.set_property("--frame-x", &format!("{}px", frame.offset_x));
    let _ = style.set_property("--frame-y", &format!("{}px", frame.offset_y));
    let _ = style.set_property("--frame-w", &format!("{}px", frame.css_width));
    let _ = style.set_property("--frame-h", &format!("{}px", frame.css_height));
}

fn apply_letterbox(state: &mut AppState) -> Result<(), JsValue> {
    let size = viewport_size(&window());
    let frame = letterbox(size.x, size.y);
    if state.frame_css == Some(frame) {
        return Ok(());
    }

    let style = state.canvas.style();
    style.set_property("width", &format!("{}px", frame.css_width))?;
    style.set_property("height", &format!("{}px", frame.css_height))?;
    set_frame_css_vars(&state.document, &frame);
    state.frame_css = Some(frame);
    Ok(())
}

fn start_loop(state: &Rc<RefCell<AppState>>, reason: StartReason) {
    {
        let mut st = state.borrow_mut();
        if !st.start.try_start(reason) {
            return;
        }

        if reason == StartReason::SafetyTimeout {
            console::warn(&format!(
                "forcing start with {}/{} assets resolved",
                st.readiness.resolved(),
                AssetKey::ALL.len()
            ));
        }
        if let Some(loading) = &st.loading {
            set_hidden(loading, true);
        }
        set_status(&st.document, "running");
        record_event(&mut st, reason.name());
    }

    run_frames(Rc::clone(state));
}

// Each frame requests the next one only after it has finished drawing.
fn run_frames(state: Rc<RefCell<AppState>>) {
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&holder);

    *holder.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        frame(&state);
        if let Some(cb) = next.borrow().as_ref() {
            let _ = window().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = holder.borrow().as_ref() {
        let _ = window().request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();

    let change = {
        let AppState { sim, rng, .. } = &mut *st;
        sim.tick(rng)
    };
    if let Some(change) = change {
        on_scene_change(state, &mut st, change);
    }

    step_messages(&mut st, js_sys::Date::now());

    let AppState {
        surface,
        sim,
        assets,
        ..
    } = &mut *st;
    render::draw_frame(surface, sim, assets);
}

fn on_scene_change(state: &Rc<RefCell<AppState>>, st: &mut AppState, change: SceneChange) {
    set_scene_attr(&st.document, change.to);
    record_event(st, format!("scene_{}", change.to.name()));

    if change.to == Scene::Reaction {
        schedule_proposal(state, &st.proposal_ui);
    }
}

fn schedule_proposal(state: &Rc<RefCell<AppState>>, panel: &HtmlElement) {
    let state = Rc::clone(state);
    let shown = ui::reveal_after(panel, PROPOSAL_DELAY_MS, move || {
        record_event(&mut state.borrow_mut(), "proposal_shown");
    });

    if let Err(err) = shown {
        console::error(&format!(
            "could not schedule the proposal panel: {}",
            console::describe(&err)
        ));
    }
}

fn step_messages(st: &mut AppState, now: f64) {
    let AppState {
        sequencer, quote, ..
    } = st;
    let Some(sequencer) = sequencer else {
        return;
    };

    if let Some(step) = sequencer.poll(now) {
        match step {
            SequenceStep::FadeOut => {
                let _ = quote.class_list().remove_1(VISIBLE_CLASS);
            }
            SequenceStep::Show(message) => {
                quote.set_text_content(Some(message.text));
                let _ = quote.style().set_property("color", message.color);
                let _ = quote.class_list().add_1(VISIBLE_CLASS);
            }
        }
    }
}

fn on_accept(state: &Rc<RefCell<AppState>>) {
    let mut st = state.borrow_mut();

    let change = {
        let AppState { sim, rng, .. } = &mut *st;
        sim.accept(rng)
    };
    let Some(change) = change else {
        console::warn(&format!("accept ignored during {}", st.sim.scene.name()));
        return;
    };
    on_scene_change(state, &mut st, change);

    set_hidden(&st.proposal_ui, true);
    set_hidden(&st.celebration_ui, false);

    let music_state = match &st.music {
        Some(music) => {
            music.ensure_playing();
            format!("{:?}", music.playback())
        }
        None => "muted".to_string(),
    };

    st.quote.set_text_content(Some(""));
    st.sequencer = Some(MessageSequencer::greeting(js_sys::Date::now()));
    record_event(&mut st, format!("accept (music: {})", music_state));
}

fn on_pointer_move(st: &mut AppState, event: &MouseEvent) {
    let armed = !ui::is_hidden(&st.proposal_ui);
    let rect = st.no_button.get_bounding_client_rect();
    let button = Rect::new(rect.left(), rect.top(), rect.width(), rect.height());
    let pointer = DVec2::new(event.client_x() as f64, event.client_y() as f64);
    let viewport = viewport_size(&window());

    let placed = match st.evasive.on_pointer_move(armed, pointer, button, viewport) {
        ButtonMove::Stay => return,
        ButtonMove::Pin(at) => {
            record_event(st, "no_button_pinned");
            ui::pin_fixed(&st.no_button, at)
        }
        ButtonMove::MoveTo(at) => ui::move_fixed(&st.no_button, at),
    };

    if let Err(err) = placed {
        console::warn(&format!("could not move button: {}", console::describe(&err)));
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        let message = format!("fatal: {}", console::describe(&err));

        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            set_status(&doc, "error");
        }

        console::error(&message);
    }
}

fn start_impl() -> Result<(), JsValue> {
    let win = window();
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let config = Config::from_query(&win.location().search().unwrap_or_default());

    let canvas: HtmlCanvasElement = element(&document, STAGE_ID)?;
    let surface = CanvasSurface::new(&canvas)?;
    let proposal_ui: HtmlElement = element(&document, PROPOSAL_ID)?;
    let celebration_ui: HtmlElement = element(&document, CELEBRATION_ID)?;
    let yes_button: HtmlElement = element(&document, YES_ID)?;
    let no_button: HtmlElement = element(&document, NO_ID)?;
    let quote = document
        .query_selector(QUOTE_SELECTOR)?
        .ok_or_else(|| JsValue::from_str("Missing quote element"))?
        .dyn_into::<HtmlElement>()?;
    let loading = document
        .get_element_by_id(LOADING_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());

    let music = if config.muted {
        None
    } else {
        Some(BackgroundMusic::new(&document)?)
    };

    let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;

    let state = Rc::new(RefCell::new(AppState {
        document: document.clone(),
        canvas,
        surface,
        loading,
        proposal_ui,
        celebration_ui,
        quote,
        no_button,
        sim: Simulation::new(),
        rng: fastrand::Rng::with_seed(seed),
        assets: AssetTable::new(),
        readiness: Readiness::new(AssetKey::ALL.len()),
        start: StartGuard::default(),
        evasive: EvasiveButton::default(),
        sequencer: None,
        music: music.clone(),
        frame_css: None,
        last_event: "init".to_string(),
    }));

    {
        let mut st = state.borrow_mut();
        apply_letterbox(&mut st)?;
        set_status(&document, "loading");
        set_scene_attr(&document, st.sim.scene);
    }

    let state_resize = Rc::clone(&state);
    let on_resize = Closure::wrap(Box::new(move |_event: Event| {
        let mut st = state_resize.borrow_mut();
        if let Err(err) = apply_letterbox(&mut st) {
            console::warn(&format!("resize failed: {}", console::describe(&err)));
        }
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let state_pointer = Rc::clone(&state);
    let on_mousemove = Closure::wrap(Box::new(move |event: MouseEvent| {
        on_pointer_move(&mut state_pointer.borrow_mut(), &event);
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref())?;
    on_mousemove.forget();

    let state_accept = Rc::clone(&state);
    let on_yes = Closure::wrap(Box::new(move |_event: Event| {
        on_accept(&state_accept);
    }) as Box<dyn FnMut(_)>);
    yes_button.add_event_listener_with_callback("click", on_yes.as_ref().unchecked_ref())?;
    on_yes.forget();

    if let Some(music) = &music {
        music.play();
    }

    // Loader and timer race; the start guard lets only the first through.
    let state_safety = Rc::clone(&state);
    let safety = Closure::once_into_js(move || {
        start_loop(&state_safety, StartReason::SafetyTimeout);
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        safety.unchecked_ref(),
        config.safety_ms as i32,
    )?;

    let state_assets = Rc::clone(&state);
    let table = load_assets(move |key, outcome| {
        let ready = {
            let mut st = state_assets.borrow_mut();
            if outcome == LoadOutcome::Failed {
                console::error(&format!("failed to load {}", key.path()));
            }
            st.readiness.record(outcome)
        };
        if ready {
            start_loop(&state_assets, StartReason::AssetsReady);
        }
    })?;
    state.borrow_mut().assets = table;

    Ok(())
}
