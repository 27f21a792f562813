use crate::layers::PixelRect;
use image::{Rgba, RgbaImage};

pub const DEFAULT_RADIUS: f32 = 10.0;

/// Clipped bounding box of the disc, or `None` when it misses the layer.
pub fn disc_bounds(
    width: u32,
    height: u32,
    center_x: u32,
    center_y: u32,
    radius: f32,
) -> Option<PixelRect> {
    if radius < 0.0 || width == 0 || height == 0 {
        return None;
    }
    let reach = radius.floor() as i64;
    let min_x = (i64::from(center_x) - reach).max(0);
    let min_y = (i64::from(center_y) - reach).max(0);
    let max_x = (i64::from(center_x) + reach).min(i64::from(width) - 1);
    let max_y = (i64::from(center_y) + reach).min(i64::from(height) - 1);
    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some(PixelRect::from_corners(
        min_x as u32,
        min_y as u32,
        max_x as u32,
        max_y as u32,
    ))
}

/// Makes every color-layer pixel within `radius` of the center fully
/// transparent. The base layer is never involved.
pub fn erase_circle(color_layer: &mut RgbaImage, center_x: u32, center_y: u32, radius: f32) {
    let Some(bounds) = disc_bounds(
        color_layer.width(),
        color_layer.height(),
        center_x,
        center_y,
        radius,
    ) else {
        return;
    };

    let r_sq = radius * radius;
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            let dx = x as f32 - center_x as f32;
            let dy = y as f32 - center_y as f32;
            if dx * dx + dy * dy <= r_sq {
                color_layer.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }
}
