use image::{ImageBuffer, Rgba, RgbaImage};

/// Inclusive-exclusive pixel rectangle used for dirty tracking and undo patches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Rectangle spanning two inclusive corners.
    pub fn from_corners(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn union(self, other: Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The base/color raster pair of one active image.
///
/// `base` is the decoded outline and never changes after construction; it is
/// the reference for fill boundaries. `color` starts fully transparent, always
/// has the same dimensions, and accumulates the user's fills and erasures.
#[derive(Clone)]
pub struct CanvasLayers {
    base: RgbaImage,
    color: RgbaImage,
}

impl CanvasLayers {
    pub fn from_image(base: RgbaImage) -> Self {
        let (width, height) = base.dimensions();
        Self {
            base,
            color: ImageBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.base.width()
    }

    pub fn height(&self) -> u32 {
        self.base.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn color(&self) -> &RgbaImage {
        &self.color
    }

    pub fn color_mut(&mut self) -> &mut RgbaImage {
        &mut self.color
    }

    /// Read-only base alongside the writable color layer, for fills.
    pub fn split_mut(&mut self) -> (&RgbaImage, &mut RgbaImage) {
        (&self.base, &mut self.color)
    }

    pub fn clear_color(&mut self) {
        for pixel in self.color.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}
