//! Feature palette and hex color conversion

use image::Rgb;

use crate::error::ColorError;

pub const SAND_TAN: &str = "#DAC3A7";
pub const TREE_GREEN: &str = "#10924D";
pub const MOUNTAIN_BROWN: &str = "#503E2B";
pub const OCEAN_BLUE: &str = "#0051ff";

/// Convert a `#RRGGBB` (or bare `RRGGBB`) string into a packed `0xRRGGBB` integer.
pub fn hex_to_int(hex: &str) -> Result<u32, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(ColorError::Length(hex.to_string()));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::Digit(hex.to_string()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| ColorError::Digit(hex.to_string()))
}

/// Palette constant as a packed integer. Only for the compile-time palette above.
pub fn palette(hex: &'static str) -> u32 {
    hex_to_int(hex).unwrap_or(0)
}

/// Split a packed `0xRRGGBB` color into an image pixel
pub fn to_rgb(color: u32) -> Rgb<u8> {
    Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
}

/// Blend `color` over `base` with the given opacity (0.0-1.0)
pub fn blend(base: Rgb<u8>, color: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, c: u8| (b as f32 + (c as f32 - b as f32) * a).round() as u8;
    Rgb([mix(base[0], color[0]), mix(base[1], color[1]), mix(base[2], color[2])])
}
