use image::Rgba;

/// Alpha below this counts as transparent when comparing colors.
pub const TRANSPARENT_ALPHA_CUTOFF: u8 = 10;

pub const PRESET_COLORS: [&str; 18] = [
    "#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3", "#FFFFFF",
    "#CCCCCC", "#888888", "#444444", "#000000", "#FFC0CB", "#A52A2A", "#ADD8E6", "#90EE90",
    "#F5DEB3", "#FFA500",
];

/// Parses `#rgb` or `#rrggbb` (leading `#` optional, any case) into an
/// RGBA value carrying the given alpha. Anything else yields `None`.
pub fn hex_to_rgba(hex: &str, alpha: u8) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

pub fn rgba_to_hex(color: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Tolerance comparison over channel slices of length 3 (RGB) or 4 (RGBA).
///
/// The summed RGB distance must stay within `tolerance * 3`. Alpha is
/// asymmetric: a transparent `c1` only matches transparent candidates, and an
/// opaque `c1` never matches a transparent `c2`.
pub fn colors_similar(c1: &[u8], c2: &[u8], tolerance: u32) -> bool {
    if c1.len() < 3 || c2.len() < 3 {
        return false;
    }

    let diff: u32 = c1[..3]
        .iter()
        .zip(&c2[..3])
        .map(|(a, b)| u32::from(a.abs_diff(*b)))
        .sum();

    match (c1.get(3), c2.get(3)) {
        (Some(&a1), Some(&a2)) => {
            if a1 < TRANSPARENT_ALPHA_CUTOFF {
                return a2 < TRANSPARENT_ALPHA_CUTOFF;
            }
            if a2 < TRANSPARENT_ALPHA_CUTOFF {
                return false;
            }
        }
        (None, Some(&a2)) if a2 < TRANSPARENT_ALPHA_CUTOFF => return false,
        _ => {}
    }

    diff <= tolerance.saturating_mul(3)
}

pub fn rgba_similar(c1: Rgba<u8>, c2: Rgba<u8>, tolerance: u32) -> bool {
    colors_similar(&c1.0, &c2.0, tolerance)
}
