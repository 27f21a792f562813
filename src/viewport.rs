use egui::{Pos2, Vec2};

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_SENSITIVITY: f32 = 0.002;
/// Fraction of the viewport a fitted image occupies.
pub const FIT_MARGIN: f32 = 0.95;
/// Wheel delta the zoom buttons emulate.
pub const BUTTON_ZOOM_DELTA: f32 = 150.0;
/// Panning is only offered once the image is zoomed past this.
pub const PAN_ENABLE_SCALE: f32 = 1.05;
/// Image-space slack absorbed before flooring to a pixel index.
const PIXEL_SNAP: f64 = 1e-3;

/// Affine image-to-screen map: `screen = image * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn image_to_screen(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub fn screen_to_image(&self, p: Pos2) -> Pos2 {
        ((p.to_vec2() - self.offset) / self.scale).to_pos2()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// Zoom/pan state machine for one canvas.
///
/// Besides the transform itself the only state is whether a pan is in
/// progress and where the pointer was at the last pan step.
#[derive(Clone, Debug)]
pub struct Viewport {
    state: ViewportState,
    viewport_size: Vec2,
    image_size: Option<[u32; 2]>,
    last_pan_pos: Option<Pos2>,
}

impl Viewport {
    pub fn new(viewport_size: Vec2) -> Self {
        Self {
            state: ViewportState::default(),
            viewport_size,
            image_size: None,
            last_pan_pos: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.state.offset
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    /// Returns true when the size actually changed.
    pub fn set_viewport_size(&mut self, size: Vec2) -> bool {
        if self.viewport_size == size {
            return false;
        }
        self.viewport_size = size;
        true
    }

    pub fn image_size(&self) -> Option<[u32; 2]> {
        self.image_size
    }

    /// Publishes new image dimensions. Losing the image resets the transform;
    /// callers fit to screen themselves when a new image arrives.
    pub fn set_image_size(&mut self, size: Option<[u32; 2]>) {
        self.image_size = size;
        if size.is_none() {
            self.state = ViewportState::default();
            self.end_pan();
        }
    }

    fn center(&self) -> Pos2 {
        (self.viewport_size / 2.0).to_pos2()
    }

    /// Multiplicative zoom about `anchor` (the viewport center when absent).
    /// Positive `delta_y` zooms out, negative zooms in.
    pub fn zoom(&mut self, delta_y: f32, anchor: Option<Pos2>) {
        let prev = self.state;
        let scale = (prev.scale - delta_y * ZOOM_SENSITIVITY * prev.scale).clamp(MIN_ZOOM, MAX_ZOOM);
        let anchor = anchor.unwrap_or_else(|| self.center()).to_vec2();
        let content = (anchor - prev.offset) / prev.scale;
        self.state = ViewportState {
            scale,
            offset: anchor - content * scale,
        };
    }

    pub fn zoom_in(&mut self) {
        self.zoom(-BUTTON_ZOOM_DELTA, None);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(BUTTON_ZOOM_DELTA, None);
    }

    pub fn can_pan(&self) -> bool {
        self.state.scale > PAN_ENABLE_SCALE
    }

    /// Ignored while no image is shown.
    pub fn start_pan(&mut self, screen: Pos2) {
        if self.image_size.is_none() {
            return;
        }
        self.last_pan_pos = Some(screen);
    }

    /// Moves the image by the screen-space delta since the previous call.
    /// Returns false when no pan is in progress.
    pub fn pan(&mut self, screen: Pos2) -> bool {
        let Some(last) = self.last_pan_pos else {
            return false;
        };
        self.state.offset += screen - last;
        self.last_pan_pos = Some(screen);
        true
    }

    pub fn end_pan(&mut self) {
        self.last_pan_pos = None;
    }

    pub fn is_panning(&self) -> bool {
        self.last_pan_pos.is_some()
    }

    /// 1:1 scale with the image centered.
    pub fn reset_zoom_pan(&mut self) {
        self.state = match self.image_size {
            Some([w, h]) if w > 0 && h > 0 => ViewportState {
                scale: 1.0,
                offset: (self.viewport_size - Vec2::new(w as f32, h as f32)) / 2.0,
            },
            _ => ViewportState::default(),
        };
    }

    /// Largest scale that shows the whole image with a small margin, centered.
    pub fn fit_to_screen(&mut self) {
        let Some([w, h]) = self.image_size else {
            return;
        };
        if w == 0 || h == 0 {
            return;
        }
        let image = Vec2::new(w as f32, h as f32);
        let fit = (self.viewport_size.x / image.x).min(self.viewport_size.y / image.y);
        let scale = (fit * FIT_MARGIN).clamp(MIN_ZOOM, MAX_ZOOM);
        self.state = ViewportState {
            scale,
            offset: (self.viewport_size - image * scale) / 2.0,
        };
    }

    /// Maps a canvas-local screen point to the image pixel under it, clamped
    /// into the image. `None` when no image is loaded.
    pub fn screen_to_image_point(&self, screen: Pos2) -> Option<PixelPoint> {
        let [w, h] = self.image_size?;
        if w == 0 || h == 0 {
            return None;
        }
        let scale = f64::from(self.state.scale);
        let to_pixel = |screen: f32, offset: f32, len: u32| {
            let v = (f64::from(screen) - f64::from(offset)) / scale;
            // f32 rounding in the forward map can land a whole pixel just below it
            let v = (v + PIXEL_SNAP).floor() as i64;
            v.clamp(0, i64::from(len) - 1) as u32
        };
        Some(PixelPoint {
            x: to_pixel(screen.x, self.state.offset.x, w),
            y: to_pixel(screen.y, self.state.offset.y, h),
        })
    }

    pub fn image_to_screen_point(&self, image: Pos2) -> Pos2 {
        self.state.image_to_screen(image)
    }
}
