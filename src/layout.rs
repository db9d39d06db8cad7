use glam::DVec2;

/// Logical stage size. The canvas backing store never changes; only its CSS
/// presentation is rescaled.
pub const VIEW_WIDTH: f64 = 1920.0;
pub const VIEW_HEIGHT: f64 = 1080.0;

const SNAP: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.w, self.h)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// Presentation of the fixed-size stage inside the browser window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    pub css_width: u32,
    pub css_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

pub fn letterbox(window_width: f64, window_height: f64) -> Letterbox {
    let window_width = window_width.max(1.0);
    let window_height = window_height.max(1.0);
    let scale = (window_width / VIEW_WIDTH).min(window_height / VIEW_HEIGHT);

    // Snap before flooring so an exact fit does not lose a pixel to rounding.
    let css_width = (VIEW_WIDTH * scale + SNAP).floor().max(1.0);
    let css_height = (VIEW_HEIGHT * scale + SNAP).floor().max(1.0);

    Letterbox {
        scale,
        css_width: css_width as u32,
        css_height: css_height as u32,
        offset_x: ((window_width - css_width) * 0.5).floor().max(0.0) as u32,
        offset_y: ((window_height - css_height) * 0.5).floor().max(0.0) as u32,
    }
}
