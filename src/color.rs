//! Named-color lookup for annotation styles.
//!
//! Drawing functions take `Rgb<u8>` values; this module maps the color names
//! commonly used in teaching material ("red", "cyan", ...) and `#rrggbb` hex
//! strings onto them.

use crate::core::VisionError;
use image::Rgb;

/// Looks up a named color.
///
/// Covers the CSS basic color set plus a few synonyms ("grey", "orange").
/// Names are matched case-insensitively.
pub fn named_color(name: &str) -> Option<Rgb<u8>> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" | "green" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "darkgreen" => [0, 128, 0],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "navy" => [0, 0, 128],
        "orange" => [255, 165, 0],
        "pink" => [255, 192, 203],
        "brown" => [165, 42, 42],
        _ => return None,
    };
    Some(Rgb(rgb))
}

/// Parses a color specification.
///
/// Accepts a color name understood by [`named_color`] or a `#rrggbb` hex
/// string.
pub fn parse_color(spec: &str) -> Result<Rgb<u8>, VisionError> {
    if let Some(hex) = spec.strip_prefix('#') {
        // length is in bytes, so non-ASCII digits must be rejected before
        // slicing at fixed offsets
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(VisionError::invalid_input(format!(
                "hex color must have 6 digits: '{spec}'"
            )));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| VisionError::invalid_input(format!("bad hex color: '{spec}'")))
        };
        return Ok(Rgb([parse(0..2)?, parse(2..4)?, parse(4..6)?]));
    }

    named_color(spec)
        .ok_or_else(|| VisionError::invalid_input(format!("unknown color name: '{spec}'")))
}
