use crate::color::colors_similar;
use crate::layers::PixelRect;
use image::{Rgba, RgbaImage};
use std::collections::VecDeque;

pub const DEFAULT_TOLERANCE: u32 = 10;

/// A start pixel already this close to the fill color is left alone.
const ALREADY_FILLED_TOLERANCE: u32 = 5;

/// Whether the color layer at the start point already carries `fill_color`,
/// in which case a fill from there paints nothing.
pub fn already_filled(color_layer: &RgbaImage, x: u32, y: u32, fill_color: Rgba<u8>) -> bool {
    color_layer
        .get_pixel_checked(x, y)
        .is_some_and(|p| colors_similar(&p.0, &fill_color.0, ALREADY_FILLED_TOLERANCE))
}

/// Paints the 4-connected region around the start point whose *base* colors
/// match the base color under the start point. Returns whether anything was
/// painted.
pub fn flood_fill(
    color_layer: &mut RgbaImage,
    base_layer: &RgbaImage,
    start_x: u32,
    start_y: u32,
    fill_color: Rgba<u8>,
    tolerance: u32,
) -> bool {
    flood_fill_region(color_layer, base_layer, start_x, start_y, fill_color, tolerance).is_some()
}

/// Same as [`flood_fill`], returning the bounding rectangle of painted pixels.
///
/// Boundary decisions read only `base_layer`; whatever is already on
/// `color_layer` inside the region gets overwritten.
pub fn flood_fill_region(
    color_layer: &mut RgbaImage,
    base_layer: &RgbaImage,
    start_x: u32,
    start_y: u32,
    fill_color: Rgba<u8>,
    tolerance: u32,
) -> Option<PixelRect> {
    let (width, height) = color_layer.dimensions();
    if base_layer.dimensions() != (width, height) || start_x >= width || start_y >= height {
        return None;
    }

    let w = width as usize;
    let total = w * height as usize;
    let base: &[[u8; 4]] = bytemuck::cast_slice(base_layer.as_raw().as_slice());
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut **color_layer);

    let start = start_y as usize * w + start_x as usize;
    let target = base[start];

    if colors_similar(&pixels[start], &fill_color.0, ALREADY_FILLED_TOLERANCE) {
        log::debug!("Start pixel ({start_x}, {start_y}) already has the fill color");
        return None;
    }

    let mut visited = vec![false; total];
    let fillable = |idx: usize, visited: &[bool]| {
        !visited[idx] && colors_similar(&base[idx], &target, tolerance)
    };

    if !fillable(start, &visited) {
        log::debug!("Start pixel ({start_x}, {start_y}) is not fillable");
        return None;
    }

    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    let mut painted = 0usize;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (start_x, start_y, start_x, start_y);

    while let Some(idx) = queue.pop_front() {
        pixels[idx] = fill_color.0;
        painted += 1;

        let x = (idx % w) as u32;
        let y = (idx / w) as u32;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);

        let neighbours = [
            (x + 1 < width).then(|| idx + 1),
            (x > 0).then(|| idx - 1),
            (y + 1 < height).then(|| idx + w),
            (y > 0).then(|| idx - w),
        ];
        for next in neighbours.into_iter().flatten() {
            if fillable(next, &visited) {
                visited[next] = true;
                queue.push_back(next);
            }
        }

        if queue.len() > total {
            log::warn!("Flood fill queue exceeded {total} entries, stopping early");
            break;
        }
    }

    log::debug!("Filled {painted} pixels from ({start_x}, {start_y})");
    (painted > 0).then(|| PixelRect::from_corners(min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn blank(width: u32, height: u32) -> (RgbaImage, RgbaImage) {
        (
            ImageBuffer::from_pixel(width, height, WHITE),
            ImageBuffer::new(width, height),
        )
    }

    /// White 100x100 page with a one pixel black ring of radius 40 around (50, 50).
    fn ring_page() -> RgbaImage {
        let mut base = ImageBuffer::from_pixel(100, 100, WHITE);
        for step in 0..4000 {
            let angle = step as f64 / 4000.0 * std::f64::consts::TAU;
            let x = (50.0 + 40.0 * angle.cos()).round() as u32;
            let y = (50.0 + 40.0 * angle.sin()).round() as u32;
            base.put_pixel(x, y, BLACK);
        }
        base
    }

    /// Pixels reachable from (x, y) through white base pixels, without diagonals.
    fn white_component(base: &RgbaImage, x: u32, y: u32) -> Vec<(u32, u32)> {
        let mut seen = vec![false; (base.width() * base.height()) as usize];
        let mut stack = vec![(x, y)];
        let mut out = Vec::new();
        while let Some((cx, cy)) = stack.pop() {
            let i = (cy * base.width() + cx) as usize;
            if seen[i] || *base.get_pixel(cx, cy) != WHITE {
                continue;
            }
            seen[i] = true;
            out.push((cx, cy));
            if cx > 0 {
                stack.push((cx - 1, cy));
            }
            if cy > 0 {
                stack.push((cx, cy - 1));
            }
            if cx + 1 < base.width() {
                stack.push((cx + 1, cy));
            }
            if cy + 1 < base.height() {
                stack.push((cx, cy + 1));
            }
        }
        out
    }

    #[test]
    fn already_filled_checks_the_color_layer_only() {
        let mut color: RgbaImage = ImageBuffer::new(4, 4);
        color.put_pixel(1, 1, Rgba([252, 2, 0, 255]));
        assert!(already_filled(&color, 1, 1, Rgba([255, 0, 0, 255])));
        assert!(!already_filled(&color, 0, 0, Rgba([255, 0, 0, 255])));
        assert!(!already_filled(&color, 9, 0, Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn exact_match_region_fills_everything_with_zero_tolerance() {
        let (base, mut color) = blank(12, 9);
        assert!(flood_fill(&mut color, &base, 3, 4, RED, 0));
        assert!(color.pixels().all(|p| *p == RED));
    }

    #[test]
    fn second_fill_with_same_color_is_noop() {
        let (base, mut color) = blank(10, 10);
        assert!(flood_fill(&mut color, &base, 5, 5, RED, DEFAULT_TOLERANCE));
        let snapshot = color.clone();
        assert!(!flood_fill(&mut color, &base, 5, 5, RED, DEFAULT_TOLERANCE));
        assert_eq!(color, snapshot);
    }

    #[test]
    fn refill_with_another_color_overwrites() {
        let (base, mut color) = blank(6, 6);
        assert!(flood_fill(&mut color, &base, 0, 0, RED, DEFAULT_TOLERANCE));
        assert!(flood_fill(&mut color, &base, 5, 5, BLUE, DEFAULT_TOLERANCE));
        assert!(color.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn fill_stops_at_single_pixel_wall() {
        let (mut base, mut color) = blank(9, 5);
        for y in 0..5 {
            base.put_pixel(4, y, BLACK);
        }
        let rect = flood_fill_region(&mut color, &base, 1, 2, RED, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(rect, PixelRect::from_corners(0, 0, 3, 4));
        for (x, _, p) in color.enumerate_pixels() {
            if x < 4 {
                assert_eq!(*p, RED);
            } else {
                assert_eq!(p[3], 0, "pixel at column {x} leaked");
            }
        }
    }

    #[test]
    fn diagonal_gaps_do_not_leak() {
        // A staircase wall only touching at corners still blocks 4-connected fill.
        let (mut base, mut color) = blank(4, 4);
        for i in 0..4 {
            base.put_pixel(i, 3 - i, BLACK);
        }
        assert!(flood_fill(&mut color, &base, 0, 0, RED, DEFAULT_TOLERANCE));
        assert_eq!(*color.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
        assert_eq!(*color.get_pixel(0, 2), RED);
    }

    #[test]
    fn shaded_neighbour_region_is_a_boundary() {
        let (mut base, mut color) = blank(6, 1);
        for x in 3..6 {
            base.put_pixel(x, 0, Rgba([200, 200, 200, 255]));
        }
        assert!(flood_fill(&mut color, &base, 0, 0, RED, 10));
        assert_eq!(color.get_pixel(2, 0), &RED);
        assert_eq!(color.get_pixel(3, 0)[3], 0);

        // A generous tolerance lets it through.
        let mut color = ImageBuffer::new(6, 1);
        assert!(flood_fill(&mut color, &base, 0, 0, RED, 60));
        assert!(color.pixels().all(|p| *p == RED));
    }

    #[test]
    fn start_outside_the_buffer_fills_nothing() {
        let (base, mut color) = blank(4, 4);
        assert!(!flood_fill(&mut color, &base, 4, 0, RED, DEFAULT_TOLERANCE));
        assert!(!flood_fill(&mut color, &base, 0, 9, RED, DEFAULT_TOLERANCE));
        assert!(color.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn start_on_outline_recolors_only_the_stroke() {
        let (mut base, mut color) = blank(7, 3);
        for y in 0..3 {
            base.put_pixel(3, y, BLACK);
        }
        assert!(flood_fill(&mut color, &base, 3, 1, RED, DEFAULT_TOLERANCE));
        for (x, _, p) in color.enumerate_pixels() {
            assert_eq!(*p == RED, x == 3);
        }
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let base = ImageBuffer::from_pixel(5, 5, WHITE);
        let mut color = ImageBuffer::new(4, 5);
        assert!(!flood_fill(&mut color, &base, 1, 1, RED, DEFAULT_TOLERANCE));
    }

    #[test]
    fn ring_interior_fills_and_exterior_stays_clear() {
        let base = ring_page();
        let mut color = ImageBuffer::new(100, 100);
        let fill = crate::color::hex_to_rgba("#FF0000", 255).unwrap();
        assert_eq!(fill, RED);

        assert!(flood_fill(&mut color, &base, 50, 50, fill, 10));

        let interior = white_component(&base, 50, 50);
        assert!(!interior.is_empty());
        let mut inside = vec![false; 100 * 100];
        for &(x, y) in &interior {
            inside[(y * 100 + x) as usize] = true;
            let dx = x as f64 - 50.0;
            let dy = y as f64 - 50.0;
            assert!((dx * dx + dy * dy).sqrt() < 41.0);
        }
        for (x, y, p) in color.enumerate_pixels() {
            if inside[(y * 100 + x) as usize] {
                assert_eq!(*p, RED);
            } else {
                assert_eq!(p[3], 0, "({x}, {y}) outside the disc was painted");
            }
        }
        assert_eq!(color.get_pixel(0, 0)[3], 0);
        assert_eq!(color.get_pixel(99, 99)[3], 0);

        assert!(!flood_fill(&mut color, &base, 50, 50, fill, 10));
    }

    #[test]
    fn transparent_base_fills_transparent_area_only() {
        let mut base: RgbaImage = ImageBuffer::new(5, 1);
        base.put_pixel(2, 0, BLACK);
        let mut color = ImageBuffer::new(5, 1);
        assert!(flood_fill(&mut color, &base, 0, 0, RED, DEFAULT_TOLERANCE));
        assert_eq!(color.get_pixel(1, 0), &RED);
        assert_eq!(color.get_pixel(2, 0)[3], 0);
        assert_eq!(color.get_pixel(3, 0)[3], 0);
    }
}
