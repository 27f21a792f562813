use crate::layers::CanvasLayers;
use crate::viewport::ViewportState;
use image::{ImageBuffer, RgbaImage};
use rayon::prelude::*;

/// Above this scale pixels are drawn as crisp blocks instead of interpolated.
pub const PIXELATED_SCALE_THRESHOLD: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    Smooth,
    Pixelated,
}

impl Sampling {
    pub fn for_scale(scale: f32) -> Self {
        if scale > PIXELATED_SCALE_THRESHOLD {
            Sampling::Pixelated
        } else {
            Sampling::Smooth
        }
    }
}

/// Straight-alpha source-over.
pub fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = f32::from(src[3]) / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = f32::from(src[c]) * sa;
        let d = f32::from(dst[c]) * da * (1.0 - sa);
        out[c] = ((s + d) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    out
}

/// Base with the color layer drawn over it, at image resolution. This is
/// what download and print receive.
pub fn flatten(layers: &CanvasLayers) -> RgbaImage {
    let mut out = layers.base().clone();
    for (dst, src) in out.pixels_mut().zip(layers.color().pixels()) {
        dst.0 = blend_over(dst.0, src.0);
    }
    out
}

fn texel(image: &RgbaImage, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return [0, 0, 0, 0];
    }
    image.get_pixel(x as u32, y as u32).0
}

fn sample_nearest(image: &RgbaImage, u: f32, v: f32) -> [u8; 4] {
    texel(image, u.floor() as i64, v.floor() as i64)
}

/// Bilinear sample on premultiplied values so transparent neighbours do not
/// darken edges.
fn sample_bilinear(image: &RgbaImage, u: f32, v: f32) -> [u8; 4] {
    let fx = u - 0.5;
    let fy = v - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (texel(image, x0, y0), (1.0 - tx) * (1.0 - ty)),
        (texel(image, x0 + 1, y0), tx * (1.0 - ty)),
        (texel(image, x0, y0 + 1), (1.0 - tx) * ty),
        (texel(image, x0 + 1, y0 + 1), tx * ty),
    ];

    let mut acc = [0.0f32; 4];
    for (px, weight) in taps {
        let a = f32::from(px[3]) / 255.0 * weight;
        acc[0] += f32::from(px[0]) * a;
        acc[1] += f32::from(px[1]) * a;
        acc[2] += f32::from(px[2]) * a;
        acc[3] += a;
    }
    if acc[3] <= f32::EPSILON {
        return [0, 0, 0, 0];
    }
    [
        (acc[0] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[1] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[2] / acc[3]).round().clamp(0.0, 255.0) as u8,
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Owns the derived display buffer. Nothing writes to it except
/// [`Compositor::recomposite`].
pub struct Compositor {
    display: RgbaImage,
    sampling: Sampling,
    generation: u64,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            display: ImageBuffer::new(0, 0),
            sampling: Sampling::Smooth,
            generation: 0,
        }
    }

    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Bumped on every redraw so consumers know when to re-upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        for pixel in self.display.pixels_mut() {
            pixel.0 = [0, 0, 0, 0];
        }
        self.generation += 1;
    }

    /// Redraws the screen-sized display: clear, apply the viewport transform,
    /// draw the base layer and then the color layer over it.
    pub fn recomposite(&mut self, layers: &CanvasLayers, viewport: &ViewportState, size: [u32; 2]) {
        let [width, height] = size;
        if self.display.dimensions() != (width, height) {
            self.display = ImageBuffer::new(width, height);
        }
        self.sampling = Sampling::for_scale(viewport.scale);
        self.generation += 1;
        if width == 0 || height == 0 {
            return;
        }

        let sampling = self.sampling;
        let sample = move |image: &RgbaImage, u: f32, v: f32| match sampling {
            Sampling::Pixelated => sample_nearest(image, u, v),
            Sampling::Smooth => sample_bilinear(image, u, v),
        };
        let (img_w, img_h) = (layers.width() as f32, layers.height() as f32);
        let stride = width as usize * 4;

        self.display
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(row, line)| {
                let sy = row as f32 + 0.5;
                for (col, out) in line.chunks_exact_mut(4).enumerate() {
                    let image_pos =
                        viewport.screen_to_image(egui::Pos2::new(col as f32 + 0.5, sy));
                    let (u, v) = (image_pos.x, image_pos.y);
                    let mut px = [0u8; 4];
                    if u >= 0.0 && v >= 0.0 && u < img_w && v < img_h {
                        px = blend_over(px, sample(layers.base(), u, v));
                        px = blend_over(px, sample(layers.color(), u, v));
                    }
                    out.copy_from_slice(&px);
                }
            });
    }
}
