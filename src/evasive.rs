//! The "no" button that runs away from the pointer.

use crate::layout::Rect;
use glam::DVec2;

pub const TRIGGER_RADIUS: f64 = 300.0;
pub const PUSH_SPEED: f64 = 150.0;
pub const EDGE_MARGIN: f64 = 50.0;

const EDGE_NUDGE: f64 = 10.0;
const TRAP_RADIUS: f64 = 50.0;
const TRAP_BAND: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repel {
    /// Pointer is outside the trigger radius.
    Idle,
    /// New top-left corner of the button, in viewport coordinates.
    Moved(DVec2),
}

/// Pushes `button` away from `pointer`, harder the closer the pointer is, and
/// keeps the result inside the viewport margin.
pub fn repel(pointer: DVec2, button: Rect, viewport: DVec2) -> Repel {
    let away = button.center() - pointer;
    let distance = away.length();
    if distance >= TRIGGER_RADIUS {
        return Repel::Idle;
    }

    let dir = away.try_normalize().unwrap_or(DVec2::X);
    let force = (TRIGGER_RADIUS - distance) / TRIGGER_RADIUS;
    let pushed = button.origin() + dir * force * PUSH_SPEED;

    let (left_min, left_max) = axis_bounds(button.w, viewport.x);
    let mut left = clamp_axis(pushed.x, button.w, viewport.x);
    let mut top = clamp_axis(pushed.y, button.h, viewport.y);

    // Pinned against a side with the pointer on top of it: jump to the middle
    // so there is always somewhere left to run.
    if distance < TRAP_RADIUS && (left <= left_min + TRAP_BAND || left >= left_max - TRAP_BAND) {
        let centered = (viewport - button.size()) * 0.5;
        left = clamp_axis(centered.x, button.w, viewport.x);
        top = clamp_axis(centered.y, button.h, viewport.y);
    }

    Repel::Moved(DVec2::new(left, top))
}

fn axis_bounds(size: f64, extent: f64) -> (f64, f64) {
    let min = EDGE_MARGIN;
    let max = (extent - size - EDGE_MARGIN).max(min);
    (min, max)
}

fn clamp_origin(button: Rect, viewport: DVec2) -> DVec2 {
    DVec2::new(
        clamp_axis(button.x, button.w, viewport.x),
        clamp_axis(button.y, button.h, viewport.y),
    )
}

fn clamp_axis(value: f64, size: f64, extent: f64) -> f64 {
    let (min, max) = axis_bounds(size, extent);
    if value < min {
        (min + EDGE_NUDGE).min(max)
    } else if value > max {
        (max - EDGE_NUDGE).max(min)
    } else {
        value
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ButtonMove {
    Stay,
    /// Switch to fixed positioning at this top-left. Same as the current
    /// position unless that lies outside the viewport margin.
    Pin(DVec2),
    MoveTo(DVec2),
}

/// Per-button state for the pointer-move handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvasiveButton {
    pinned: bool,
}

impl EvasiveButton {
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// `armed` is false while the proposal panel is hidden.
    pub fn on_pointer_move(
        &mut self,
        armed: bool,
        pointer: DVec2,
        button: Rect,
        viewport: DVec2,
    ) -> ButtonMove {
        if !armed {
            return ButtonMove::Stay;
        }

        match repel(pointer, button, viewport) {
            Repel::Idle => ButtonMove::Stay,
            Repel::Moved(_) if !self.pinned => {
                self.pinned = true;
                ButtonMove::Pin(clamp_origin(button, viewport))
            }
            Repel::Moved(to) => ButtonMove::MoveTo(to),
        }
    }
}
