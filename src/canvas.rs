use crate::layout::{Rect, VIEW_HEIGHT, VIEW_WIDTH};
use crate::render::{Blend, Surface, petal_curves};
use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// [`Surface`] over a 2D canvas context sized to the logical stage.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(VIEW_WIDTH as u32);
        canvas.set_height(VIEW_HEIGHT as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D canvas unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { context })
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }
}

fn composite_name(blend: Blend) -> &'static str {
    match blend {
        Blend::Normal => "source-over",
        Blend::Multiply => "multiply",
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, dest: Rect, blend: Blend) {
        let ctx = &self.context;
        let _ = ctx.set_global_composite_operation(composite_name(blend));
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image, dest.x, dest.y, dest.w, dest.h,
        );
        let _ = ctx.set_global_composite_operation(composite_name(Blend::Normal));
    }

    fn fill_petal(&mut self, at: DVec2, rotation: f64, size: f64, color: &str) {
        let ctx = &self.context;
        ctx.save();
        let _ = ctx.translate(at.x, at.y);
        let _ = ctx.rotate(rotation);
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        for [c1, c2, end] in petal_curves(size) {
            ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
        }
        ctx.fill();
        ctx.restore();
    }
}
