#![cfg(target_arch = "wasm32")]

use glam::DVec2;
use proposal_scene::audio::GestureUnlock;
use proposal_scene::ui;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .expect("no window")
        .document()
        .expect("no document")
}

fn attach(tag: &str) -> HtmlElement {
    let document = document();
    let el = document
        .create_element(tag)
        .expect("create element")
        .dyn_into::<HtmlElement>()
        .expect("html element");
    document
        .body()
        .expect("no body")
        .append_child(&el)
        .expect("append");
    el
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("set timeout");
    });
    JsFuture::from(promise).await.expect("timer");
}

fn dispatch(document: &Document, name: &str) {
    let event = Event::new(name).expect("event");
    document.dispatch_event(&event).expect("dispatch");
}

#[wasm_bindgen_test]
fn first_gesture_unlocks_once() {
    let document = document();
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let unlock = GestureUnlock::arm(&document, move || seen.set(seen.get() + 1)).expect("arm");
    assert!(unlock.is_armed());

    dispatch(&document, "click");
    dispatch(&document, "keydown");
    dispatch(&document, "click");

    assert_eq!(count.get(), 1);
    assert!(!unlock.is_armed());
}

#[wasm_bindgen_test]
fn key_press_also_unlocks() {
    let document = document();
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let _unlock = GestureUnlock::arm(&document, move || seen.set(seen.get() + 1)).expect("arm");

    dispatch(&document, "keydown");
    dispatch(&document, "click");
    assert_eq!(count.get(), 1);
}

#[wasm_bindgen_test]
fn disarmed_or_dropped_unlock_ignores_gestures() {
    let document = document();
    let count = Rc::new(Cell::new(0));

    let seen = Rc::clone(&count);
    let unlock = GestureUnlock::arm(&document, move || seen.set(seen.get() + 1)).expect("arm");
    unlock.disarm();
    dispatch(&document, "click");

    let seen = Rc::clone(&count);
    drop(GestureUnlock::arm(&document, move || seen.set(seen.get() + 1)).expect("arm"));
    dispatch(&document, "keydown");

    assert_eq!(count.get(), 0);
}

#[wasm_bindgen_test]
async fn panel_stays_hidden_until_the_delay_passes() {
    let panel = attach("div");
    ui::set_hidden(&panel, true);

    let shown = Rc::new(Cell::new(false));
    let flag = Rc::clone(&shown);
    ui::reveal_after(&panel, 200, move || flag.set(true)).expect("schedule");

    assert!(ui::is_hidden(&panel));
    sleep(50).await;
    assert!(ui::is_hidden(&panel));
    assert!(!shown.get());

    sleep(300).await;
    assert!(!ui::is_hidden(&panel));
    assert!(shown.get());
    panel.remove();
}

#[wasm_bindgen_test]
fn pinned_button_lands_where_it_was_placed() {
    let button = attach("button");
    button.set_text_content(Some("No"));
    let style = button.style();
    style.set_property("margin", "0 16px").expect("margin");
    style.set_property("transition", "left 0.15s, top 0.15s").expect("transition");

    ui::pin_fixed(&button, DVec2::new(120.0, 80.0)).expect("pin");
    let rect = button.get_bounding_client_rect();
    assert_eq!((rect.left(), rect.top()), (120.0, 80.0));

    // Feeding the measured rect back must not drift.
    for _ in 0..5 {
        let rect = button.get_bounding_client_rect();
        ui::move_fixed(&button, DVec2::new(rect.left(), rect.top())).expect("move");
    }
    let rect = button.get_bounding_client_rect();
    assert_eq!((rect.left(), rect.top()), (120.0, 80.0));

    ui::move_fixed(&button, DVec2::new(200.0, 90.0)).expect("move");
    let rect = button.get_bounding_client_rect();
    assert_eq!((rect.left(), rect.top()), (200.0, 90.0));
    button.remove();
}
