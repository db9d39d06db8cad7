//! Small DOM helpers for the overlay panels and the evasive button.

use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

pub const HIDDEN_CLASS: &str = "hidden";
pub const VISIBLE_CLASS: &str = "visible";

pub fn set_hidden(el: &Element, hidden: bool) {
    let classes = el.class_list();
    let _ = if hidden {
        classes.add_1(HIDDEN_CLASS)
    } else {
        classes.remove_1(HIDDEN_CLASS)
    };
}

pub fn is_hidden(el: &Element) -> bool {
    el.class_list().contains(HIDDEN_CLASS)
}

/// Unhides `el` after `delay_ms`, then runs `on_shown`.
pub fn reveal_after(
    el: &Element,
    delay_ms: i32,
    on_shown: impl FnOnce() + 'static,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let el = el.clone();
    let reveal = Closure::once_into_js(move || {
        set_hidden(&el, false);
        on_shown();
    });

    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        reveal.unchecked_ref(),
        delay_ms,
    )?;
    Ok(())
}

/// Takes `el` out of the flow at viewport position `at`. Margins are zeroed
/// so `left`/`top` match what `get_bounding_client_rect` reports.
pub fn pin_fixed(el: &HtmlElement, at: DVec2) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("position", "fixed")?;
    style.set_property("margin", "0")?;
    style.set_property("transition", "none")?;
    move_fixed(el, at)
}

pub fn move_fixed(el: &HtmlElement, at: DVec2) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("left", &format!("{}px", at.x))?;
    style.set_property("top", &format!("{}px", at.y))?;
    Ok(())
}
