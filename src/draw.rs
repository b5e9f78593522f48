//! Annotation drawing: boxes, labelled boxes, text and point markers.
//!
//! Drawing mutates the target image in place, matching the convention of the
//! underlying `imageproc` primitives. Text rendering needs a font; load one
//! with [`load_font`] or fall back to [`system_font`].

use crate::core::constants::{DEFAULT_BOX_THICKNESS, DEFAULT_FONT_SCALE};
use crate::core::{OpKind, VisionError, VisionResult};
use crate::geometry::{BoundingBox, Point};

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info};

/// Which corner a [`BoxSpec::CornerSize`] anchor point refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxCorner {
    /// The anchor is the top-left corner (smallest x and y).
    TopLeft,
    /// The anchor is the top-right corner.
    TopRight,
    /// The anchor is the bottom-left corner.
    BottomLeft,
}

/// The many ways a box can be specified.
///
/// Coordinates follow image convention: y grows downward, so the top-left
/// corner is `(xmin, ymin)`. Every variant resolves to the same pair of
/// opposite corners via [`BoxSpec::resolve`].
#[derive(Debug, Clone, Copy)]
pub enum BoxSpec {
    /// Axis-aligned extent given as coordinate ranges.
    Bbox {
        xmin: f32,
        xmax: f32,
        ymin: f32,
        ymax: f32,
    },
    /// Two opposite corners, in any order.
    Corners { a: Point, b: Point },
    /// Centre point plus width and height.
    CentreSize {
        centre: Point,
        width: f32,
        height: f32,
    },
    /// One corner plus width and height.
    CornerSize {
        corner: BoxCorner,
        point: Point,
        width: f32,
        height: f32,
    },
}

impl BoxSpec {
    /// Resolves the specification to `(top_left, bottom_right)` corners.
    pub fn resolve(&self) -> (Point, Point) {
        let (a, b) = match *self {
            BoxSpec::Bbox {
                xmin,
                xmax,
                ymin,
                ymax,
            } => (Point::new(xmin, ymin), Point::new(xmax, ymax)),
            BoxSpec::Corners { a, b } => (a, b),
            BoxSpec::CentreSize {
                centre,
                width,
                height,
            } => (
                Point::new(centre.x - width / 2.0, centre.y - height / 2.0),
                Point::new(centre.x + width / 2.0, centre.y + height / 2.0),
            ),
            BoxSpec::CornerSize {
                corner,
                point,
                width,
                height,
            } => match corner {
                BoxCorner::TopLeft => (point, Point::new(point.x + width, point.y + height)),
                BoxCorner::TopRight => (point, Point::new(point.x - width, point.y + height)),
                BoxCorner::BottomLeft => (point, Point::new(point.x + width, point.y - height)),
            },
        };

        (
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    /// Builds a spec from the axis-aligned extent of a bounding box.
    ///
    /// Returns `None` for an empty bounding box.
    pub fn from_bounding_box(bbox: &BoundingBox) -> Option<Self> {
        let (tl, br) = bbox.extent()?;
        Some(BoxSpec::Corners { a: tl, b: br })
    }
}

/// Styling for box drawing.
#[derive(Debug, Clone, Copy)]
pub struct BoxStyle {
    /// Outline color.
    pub color: Rgb<u8>,
    /// Fill color; when set, the box is drawn filled and the outline
    /// thickness is ignored.
    pub fill: Option<Rgb<u8>>,
    /// Outline thickness in pixels, grown outward from the box edge.
    pub thickness: i32,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            fill: None,
            thickness: DEFAULT_BOX_THICKNESS,
        }
    }
}

/// Styling for text rendering.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Text color.
    pub color: Rgb<u8>,
    /// Font scale in pixels.
    pub scale: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 0, 0]),
            scale: DEFAULT_FONT_SCALE,
        }
    }
}

/// Loads a font from a file.
///
/// # Errors
///
/// Returns `VisionError::Io` if the file cannot be read, or a draw
/// processing error if the data is not a parseable font.
pub fn load_font(path: &Path) -> VisionResult<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|e| VisionError::processing(OpKind::Draw, "parse font file", e))
}

/// Attempts to load a system font from common locations.
///
/// Returns `None` when no candidate is found, in which case callers should
/// skip text rendering.
pub fn system_font() -> Option<FontVec> {
    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in &font_paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = FontVec::try_from_vec(data)
        {
            info!("loaded system font: {}", path);
            return Some(font);
        }
    }

    debug!("no system font found");
    None
}

/// Measures the rendered width of text at a given scale.
pub fn measure_text(text: &str, font: &FontVec, scale: f32) -> f32 {
    use ab_glyph::{Font, ScaleFont};

    let scaled_font = font.as_scaled(scale);
    text.chars()
        .map(|ch| scaled_font.h_advance(scaled_font.scaled_glyph(ch).id))
        .sum()
}

/// Draws a box into the image.
///
/// Returns the resolved `(top_left, bottom_right)` corners so callers can
/// attach further annotations to them.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` for a degenerate (zero-area) box or
/// a non-positive outline thickness.
pub fn draw_box(
    img: &mut RgbImage,
    spec: &BoxSpec,
    style: &BoxStyle,
) -> VisionResult<(Point, Point)> {
    let (tl, br) = spec.resolve();
    let width = (br.x - tl.x).round() as i64;
    let height = (br.y - tl.y).round() as i64;

    if width < 1 || height < 1 {
        return Err(VisionError::invalid_input(format!(
            "box resolves to a degenerate {width}x{height} rectangle"
        )));
    }

    let left = tl.x.round() as i32;
    let top = tl.y.round() as i32;
    let rect = Rect::at(left, top).of_size(width as u32, height as u32);

    if let Some(fill) = style.fill {
        draw_filled_rect_mut(img, rect, fill);
        return Ok((tl, br));
    }

    if style.thickness < 1 {
        return Err(VisionError::invalid_input(format!(
            "box thickness must be at least 1, got {}",
            style.thickness
        )));
    }

    for t in 0..style.thickness {
        let thick_rect = Rect::at(left - t, top - t)
            .of_size(width as u32 + 2 * t as u32, height as u32 + 2 * t as u32);
        draw_hollow_rect_mut(img, thick_rect, style.color);
    }

    Ok((tl, br))
}

/// Draws text into the image.
///
/// `pos` is the bottom-left corner of the text box in image coordinates.
pub fn draw_text(img: &mut RgbImage, pos: Point, text: &str, style: &TextStyle, font: &FontVec) {
    let x = pos.x.round() as i32;
    let y = (pos.y - style.scale).round() as i32;
    draw_text_mut(img, style.color, x, y, style.scale, font, text);
}

/// Draws a box with a filled label tab above its top-left corner.
///
/// The tab is filled with the box color and sized to the measured text plus
/// a margin of half the text height. Returns the box corners.
///
/// # Errors
///
/// Propagates any [`draw_box`] error.
pub fn draw_labelbox(
    img: &mut RgbImage,
    text: &str,
    spec: &BoxSpec,
    style: &BoxStyle,
    text_style: &TextStyle,
    font: &FontVec,
) -> VisionResult<(Point, Point)> {
    let (tl, br) = draw_box(img, spec, style)?;

    let text_w = measure_text(text, font, text_style.scale);
    let text_h = text_style.scale;
    let margin = (text_h / 2.0).round();
    let inset = (text_h / 4.0).round();

    let tab = BoxSpec::CornerSize {
        corner: BoxCorner::BottomLeft,
        point: tl,
        width: text_w + margin,
        height: text_h + margin,
    };
    let tab_style = BoxStyle {
        fill: Some(style.color),
        ..*style
    };
    draw_box(img, &tab, &tab_style)?;

    draw_text(
        img,
        Point::new(tl.x + inset, tl.y - inset),
        text,
        text_style,
        font,
    );

    Ok((tl, br))
}

/// Draws a marker glyph at each position.
///
/// An optional label is appended after the marker; any `{}` in it is
/// replaced by the point index, so `"p{}"` labels points `p0`, `p1`, ...
/// Each position is the bottom-left corner of the rendered marker.
pub fn draw_marker(
    img: &mut RgbImage,
    positions: &[Point],
    marker: char,
    label: Option<&str>,
    style: &TextStyle,
    font: &FontVec,
) {
    for (i, pos) in positions.iter().enumerate() {
        let s = match label {
            Some(label) => format!("{marker} {}", label.replace("{}", &i.to_string())),
            None => marker.to_string(),
        };
        draw_text(img, *pos, &s, style, font);
    }
}
