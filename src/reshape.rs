//! Canvas reshaping: trim, crop, pad, concatenate and tile.
//!
//! All functions return new images; the source image is never modified.
//! Coordinates follow image convention: `u` (x) grows to the right and
//! `v` (y) grows downward, with the origin at the top-left pixel.

use crate::core::{VisionError, VisionResult};
use image::{Rgb, RgbImage, imageops};

/// Checks that an image size has non-zero dimensions.
fn check_size(size: &[u32; 2]) -> VisionResult<()> {
    if size[0] == 0 || size[1] == 0 {
        return Err(VisionError::invalid_input("image size must be non-zero"));
    }
    Ok(())
}

/// Removes margins from the edges of an image.
///
/// `left`, `right`, `top` and `bottom` give the number of pixel rows or
/// columns to remove from each edge.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if the margins consume the whole
/// image in either direction.
pub fn trim(
    img: &RgbImage,
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
) -> VisionResult<RgbImage> {
    let (width, height) = img.dimensions();

    // margin sums can overflow u32, so the comparison uses checked_add
    let fits = match (left.checked_add(right), top.checked_add(bottom)) {
        (Some(horizontal), Some(vertical)) => horizontal < width && vertical < height,
        _ => false,
    };
    if !fits {
        return Err(VisionError::invalid_input(format!(
            "trim margins ({left}, {right}, {top}, {bottom}) leave no pixels in a {width}x{height} image"
        )));
    }

    let new_width = width - left - right;
    let new_height = height - top - bottom;
    Ok(imageops::crop_imm(img, left, top, new_width, new_height).to_image())
}

/// Extracts a rectangular region of interest.
///
/// The region is given as `(u1, v1, u2, v2)` where `(u1, v1)` is the
/// top-left corner and `(u2, v2)` the exclusive bottom-right corner.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if the corners are not ordered or
/// the region extends past the image.
pub fn roi(img: &RgbImage, region: (u32, u32, u32, u32)) -> VisionResult<RgbImage> {
    let (u1, v1, u2, v2) = region;
    let (width, height) = img.dimensions();

    if u1 >= u2 || v1 >= v2 {
        return Err(VisionError::invalid_input(format!(
            "roi corners must be ordered: ({u1}, {v1}) to ({u2}, {v2})"
        )));
    }
    if u2 > width || v2 > height {
        return Err(VisionError::invalid_input(format!(
            "roi ({u1}, {v1}, {u2}, {v2}) exceeds image bounds {width}x{height}"
        )));
    }

    Ok(imageops::crop_imm(img, u1, v1, u2 - u1, v2 - v1).to_image())
}

/// Grows the canvas by padding each edge with a fill color.
pub fn pad(
    img: &RgbImage,
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
    value: Rgb<u8>,
) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut padded = RgbImage::from_pixel(width + left + right, height + top + bottom, value);
    imageops::overlay(&mut padded, img, left as i64, top as i64);
    padded
}

/// Concatenates images horizontally.
///
/// Images shorter than the tallest input are padded at the bottom with
/// `pad_value`. Returns the combined image together with the x offset of
/// each component image within it.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` for an empty input slice.
pub fn hcat(images: &[RgbImage], pad_value: Rgb<u8>) -> VisionResult<(RgbImage, Vec<u32>)> {
    if images.is_empty() {
        return Err(VisionError::invalid_input("hcat requires at least one image"));
    }

    let height = images.iter().map(|im| im.height()).max().unwrap_or(0);
    let total_width: u32 = images.iter().map(|im| im.width()).sum();
    check_size(&[total_width, height])?;

    let mut combo = RgbImage::from_pixel(total_width, height, pad_value);
    let mut offsets = Vec::with_capacity(images.len());
    let mut u = 0u32;
    for img in images {
        offsets.push(u);
        imageops::overlay(&mut combo, img, u as i64, 0);
        u += img.width();
    }

    Ok((combo, offsets))
}

/// Concatenates images vertically.
///
/// Images narrower than the widest input are padded at the right with
/// `pad_value`. Returns the combined image together with the y offset of
/// each component image within it.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` for an empty input slice.
pub fn vcat(images: &[RgbImage], pad_value: Rgb<u8>) -> VisionResult<(RgbImage, Vec<u32>)> {
    if images.is_empty() {
        return Err(VisionError::invalid_input("vcat requires at least one image"));
    }

    let width = images.iter().map(|im| im.width()).max().unwrap_or(0);
    let total_height: u32 = images.iter().map(|im| im.height()).sum();
    check_size(&[width, total_height])?;

    let mut combo = RgbImage::from_pixel(width, total_height, pad_value);
    let mut offsets = Vec::with_capacity(images.len());
    let mut v = 0u32;
    for img in images {
        offsets.push(v);
        imageops::overlay(&mut combo, img, 0, v as i64);
        v += img.height();
    }

    Ok((combo, offsets))
}

/// Lays out same-sized tiles on a grid.
///
/// Tiles are placed row-major into `columns` columns with a `sep`-pixel
/// gutter between tiles and around the border. The canvas always spans the
/// full `columns` width; a final partial row is filled with `bg`.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if `tiles` is empty, `columns` is
/// zero, or the tiles do not all share the same dimensions.
pub fn tile(tiles: &[RgbImage], columns: u32, sep: u32, bg: Rgb<u8>) -> VisionResult<RgbImage> {
    let Some(first) = tiles.first() else {
        return Err(VisionError::invalid_input("tile requires at least one image"));
    };
    if columns == 0 {
        return Err(VisionError::invalid_input("tile requires at least one column"));
    }

    let (tile_w, tile_h) = first.dimensions();
    check_size(&[tile_w, tile_h])?;
    for t in &tiles[1..] {
        if t.dimensions() != (tile_w, tile_h) {
            return Err(VisionError::dimension_mismatch(
                "tile",
                &format!("{tile_w}x{tile_h}"),
                &format!("{}x{}", t.width(), t.height()),
            ));
        }
    }

    let rows = (tiles.len() as u32).div_ceil(columns);
    let grid_dim = |count: u32, side: u32| {
        count
            .checked_mul(side)
            .and_then(|body| count.checked_add(1)?.checked_mul(sep)?.checked_add(body))
    };
    let (Some(canvas_w), Some(canvas_h)) = (grid_dim(columns, tile_w), grid_dim(rows, tile_h))
    else {
        return Err(VisionError::invalid_input(format!(
            "tile canvas for {columns} columns of {tile_w}x{tile_h} tiles with sep {sep} overflows"
        )));
    };
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, bg);

    for (i, t) in tiles.iter().enumerate() {
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        let u = sep + col * (tile_w + sep);
        let v = sep + row * (tile_h + sep);
        imageops::overlay(&mut canvas, t, u as i64, v as i64);
    }

    Ok(canvas)
}

/// Resizes an image to exactly `target_w` x `target_h` by scaling then
/// cropping.
///
/// The image is scaled by the larger of the two axis ratios so it covers
/// the target, then the overflowing axis is cropped. `bias` in `[0, 1]`
/// controls which part survives the crop: 0.5 crops symmetrically, values
/// below 0.5 keep more of the top/left, values above keep more of the
/// bottom/right.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if `bias` is outside `[0, 1]` or a
/// dimension is zero.
pub fn samesize(
    img: &RgbImage,
    target_w: u32,
    target_h: u32,
    bias: f32,
) -> VisionResult<RgbImage> {
    if !(0.0..=1.0).contains(&bias) {
        return Err(VisionError::invalid_input(format!(
            "bias must be in [0, 1], got {bias}"
        )));
    }
    check_size(&[target_w, target_h])?;

    let (width, height) = img.dimensions();
    check_size(&[width, height])?;

    let sc = (target_w as f32 / width as f32).max(target_h as f32 / height as f32);
    let scaled_w = ((width as f32 * sc).round() as u32).max(target_w);
    let scaled_h = ((height as f32 * sc).round() as u32).max(target_h);
    let mut out = imageops::resize(img, scaled_w, scaled_h, imageops::FilterType::CatmullRom);

    if scaled_h > target_h {
        let d = scaled_h - target_h;
        let d1 = (d as f32 * bias).floor() as u32;
        out = imageops::crop_imm(&out, 0, d1, out.width(), target_h).to_image();
    }
    if scaled_w > target_w {
        let d = scaled_w - target_w;
        let d1 = (d as f32 * bias).floor() as u32;
        out = imageops::crop_imm(&out, d1, 0, target_w, out.height()).to_image();
    }

    Ok(out)
}

/// Specifies how a fixed-size crop window is positioned within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    /// Crop from the center of the image.
    Center,
    /// Crop from the top-left corner.
    TopLeft,
    /// Crop from the top-right corner.
    TopRight,
    /// Crop from the bottom-left corner.
    BottomLeft,
    /// Crop from the bottom-right corner.
    BottomRight,
    /// Crop with a caller-supplied top-left position.
    Custom { x: u32, y: u32 },
}

/// A reusable fixed-size crop.
///
/// Holds a crop window size and a [`CropMode`] that positions the window,
/// and applies them to one image or a batch.
#[derive(Debug)]
pub struct Crop {
    crop_size: [u32; 2],
    crop_mode: CropMode,
}

impl Crop {
    /// Creates a crop with the given `[width, height]` window and mode.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidInput` if either dimension is zero.
    pub fn new(crop_size: [u32; 2], crop_mode: CropMode) -> VisionResult<Self> {
        check_size(&crop_size)?;
        Ok(Self {
            crop_size,
            crop_mode,
        })
    }

    /// The crop window size as `[width, height]`.
    pub fn crop_size(&self) -> [u32; 2] {
        self.crop_size
    }

    /// The crop positioning mode.
    pub fn crop_mode(&self) -> CropMode {
        self.crop_mode
    }

    /// Whether the window fits an image of the given dimensions.
    pub fn can_crop(&self, img_width: u32, img_height: u32) -> bool {
        let [crop_width, crop_height] = self.crop_size;
        crop_width <= img_width && crop_height <= img_height
    }

    /// Crops an image according to the configured window and mode.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidInput` if the window does not fit the
    /// image at the configured position.
    pub fn process(&self, img: &RgbImage) -> VisionResult<RgbImage> {
        let (img_width, img_height) = img.dimensions();
        let [crop_width, crop_height] = self.crop_size;

        if !self.can_crop(img_width, img_height) {
            return Err(VisionError::invalid_input(format!(
                "crop window {crop_width}x{crop_height} exceeds image {img_width}x{img_height}"
            )));
        }

        if (crop_width, crop_height) == (img_width, img_height) {
            return Ok(img.clone());
        }

        let (x, y) = self.position(img_width, img_height)?;
        roi(img, (x, y, x + crop_width, y + crop_height))
    }

    /// Crops a batch of images.
    pub fn process_batch(&self, images: &[RgbImage]) -> VisionResult<Vec<RgbImage>> {
        images.iter().map(|img| self.process(img)).collect()
    }

    fn position(&self, img_width: u32, img_height: u32) -> VisionResult<(u32, u32)> {
        let [crop_width, crop_height] = self.crop_size;

        let pos = match self.crop_mode {
            CropMode::Center => (
                (img_width - crop_width) / 2,
                (img_height - crop_height) / 2,
            ),
            CropMode::TopLeft => (0, 0),
            CropMode::TopRight => (img_width - crop_width, 0),
            CropMode::BottomLeft => (0, img_height - crop_height),
            CropMode::BottomRight => (img_width - crop_width, img_height - crop_height),
            CropMode::Custom { x, y } => {
                let fits = x.checked_add(crop_width).is_some_and(|u| u <= img_width)
                    && y.checked_add(crop_height).is_some_and(|v| v <= img_height);
                if !fits {
                    return Err(VisionError::invalid_input(format!(
                        "crop at ({x}, {y}) exceeds image {img_width}x{img_height}"
                    )));
                }
                (x, y)
            }
        };

        Ok(pos)
    }
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            crop_size: [224, 224],
            crop_mode: CropMode::Center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_trim() {
        let img = gradient(6, 5);
        let trimmed = trim(&img, 1, 2, 1, 1).unwrap();
        assert_eq!(trimmed.dimensions(), (3, 3));
        // top-left of the result was (1, 1) in the source
        assert_eq!(trimmed.get_pixel(0, 0), &Rgb([1, 1, 0]));
    }

    #[test]
    fn test_trim_consumes_image() {
        let img = gradient(4, 4);
        assert!(trim(&img, 2, 2, 0, 0).is_err());
        assert!(trim(&img, 0, 0, 3, 1).is_err());
    }

    #[test]
    fn test_trim_huge_margins() {
        let img = gradient(4, 4);
        assert!(trim(&img, u32::MAX, 1, 0, 0).is_err());
        assert!(trim(&img, 0, 0, u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_roi() {
        let img = gradient(10, 10);
        let region = roi(&img, (2, 3, 6, 8)).unwrap();
        assert_eq!(region.dimensions(), (4, 5));
        assert_eq!(region.get_pixel(0, 0), &Rgb([2, 3, 0]));

        assert!(roi(&img, (6, 3, 2, 8)).is_err()); // unordered
        assert!(roi(&img, (2, 3, 12, 8)).is_err()); // out of bounds
    }

    #[test]
    fn test_pad() {
        let img = solid(2, 2, [255, 0, 0]);
        let padded = pad(&img, 1, 2, 3, 0, Rgb([0, 0, 255]));
        assert_eq!(padded.dimensions(), (5, 5));
        assert_eq!(padded.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(padded.get_pixel(1, 3), &Rgb([255, 0, 0]));
        assert_eq!(padded.get_pixel(4, 4), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_hcat_offsets_and_padding() {
        let a = solid(2, 2, [255, 0, 0]);
        let b = solid(1, 3, [0, 255, 0]);
        let (combo, offsets) = hcat(&[a, b], Rgb([9, 9, 9])).unwrap();

        assert_eq!(combo.dimensions(), (3, 3));
        assert_eq!(offsets, vec![0, 2]);
        assert_eq!(combo.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(combo.get_pixel(2, 2), &Rgb([0, 255, 0]));
        // below the shorter first image: pad fill
        assert_eq!(combo.get_pixel(0, 2), &Rgb([9, 9, 9]));
    }

    #[test]
    fn test_hcat_empty() {
        assert!(hcat(&[], Rgb([0, 0, 0])).is_err());
    }

    #[test]
    fn test_vcat_offsets_and_padding() {
        let a = solid(2, 1, [255, 0, 0]);
        let b = solid(3, 2, [0, 255, 0]);
        let (combo, offsets) = vcat(&[a, b], Rgb([9, 9, 9])).unwrap();

        assert_eq!(combo.dimensions(), (3, 3));
        assert_eq!(offsets, vec![0, 1]);
        assert_eq!(combo.get_pixel(0, 0), &Rgb([255, 0, 0]));
        // right of the narrower first image: pad fill
        assert_eq!(combo.get_pixel(2, 0), &Rgb([9, 9, 9]));
        assert_eq!(combo.get_pixel(2, 1), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_tile_layout() {
        let tiles = vec![
            solid(2, 2, [1, 0, 0]),
            solid(2, 2, [2, 0, 0]),
            solid(2, 2, [3, 0, 0]),
        ];
        let canvas = tile(&tiles, 2, 1, Rgb([0, 0, 0])).unwrap();

        // 2 columns, 2 rows: 2*2 + 3*1 = 7 on both axes
        assert_eq!(canvas.dimensions(), (7, 7));
        assert_eq!(canvas.get_pixel(1, 1), &Rgb([1, 0, 0]));
        assert_eq!(canvas.get_pixel(4, 1), &Rgb([2, 0, 0]));
        assert_eq!(canvas.get_pixel(1, 4), &Rgb([3, 0, 0]));
        // gutter and empty cell keep the background
        assert_eq!(canvas.get_pixel(3, 3), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(4, 4), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_tile_rejects_mixed_sizes() {
        let tiles = vec![solid(2, 2, [0, 0, 0]), solid(3, 2, [0, 0, 0])];
        assert!(tile(&tiles, 2, 1, Rgb([0, 0, 0])).is_err());
        assert!(tile(&[], 2, 1, Rgb([0, 0, 0])).is_err());
        assert!(tile(&[solid(2, 2, [0, 0, 0])], 0, 1, Rgb([0, 0, 0])).is_err());
    }

    #[test]
    fn test_tile_huge_separation() {
        let tiles = vec![solid(2, 2, [0, 0, 0])];
        assert!(tile(&tiles, 2, u32::MAX, Rgb([0, 0, 0])).is_err());
        assert!(tile(&tiles, u32::MAX, 1, Rgb([0, 0, 0])).is_err());
    }

    #[test]
    fn test_samesize_exact_scale() {
        let img = gradient(4, 4);
        let out = samesize(&img, 2, 2, 0.5).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
    }

    #[test]
    fn test_samesize_crops_wide_axis() {
        let img = gradient(4, 2);
        let out = samesize(&img, 2, 2, 0.5).unwrap();
        assert_eq!(out.dimensions(), (2, 2));

        // bias 0 keeps the left edge, bias 1 the right edge
        let left = samesize(&img, 2, 2, 0.0).unwrap();
        let right = samesize(&img, 2, 2, 1.0).unwrap();
        assert_eq!(left.get_pixel(0, 0), img.get_pixel(0, 0));
        assert_eq!(right.get_pixel(1, 0), img.get_pixel(3, 0));
    }

    #[test]
    fn test_samesize_bad_bias() {
        let img = gradient(4, 4);
        assert!(samesize(&img, 2, 2, -0.1).is_err());
        assert!(samesize(&img, 2, 2, 1.5).is_err());
    }

    #[test]
    fn test_crop_modes() {
        let img = gradient(6, 6);

        let center = Crop::new([2, 2], CropMode::Center).unwrap();
        assert_eq!(center.process(&img).unwrap().get_pixel(0, 0), &Rgb([2, 2, 0]));

        let br = Crop::new([2, 2], CropMode::BottomRight).unwrap();
        assert_eq!(br.process(&img).unwrap().get_pixel(0, 0), &Rgb([4, 4, 0]));

        let custom = Crop::new([2, 2], CropMode::Custom { x: 1, y: 3 }).unwrap();
        assert_eq!(custom.process(&img).unwrap().get_pixel(0, 0), &Rgb([1, 3, 0]));
    }

    #[test]
    fn test_crop_errors() {
        assert!(Crop::new([0, 2], CropMode::Center).is_err());

        let img = gradient(4, 4);
        let too_big = Crop::new([6, 6], CropMode::Center).unwrap();
        assert!(too_big.process(&img).is_err());

        let oob = Crop::new([2, 2], CropMode::Custom { x: 3, y: 3 }).unwrap();
        assert!(oob.process(&img).is_err());

        let huge = Crop::new([2, 2], CropMode::Custom { x: u32::MAX, y: 0 }).unwrap();
        assert!(huge.process(&img).is_err());
    }

    #[test]
    fn test_crop_batch() {
        let crop = Crop::new([2, 2], CropMode::TopLeft).unwrap();
        let images = vec![gradient(4, 4), gradient(5, 5)];
        let out = crop.process_batch(&images).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|im| im.dimensions() == (2, 2)));
    }

    #[test]
    fn test_crop_same_size_is_identity() {
        let img = gradient(4, 4);
        let crop = Crop::new([4, 4], CropMode::Center).unwrap();
        assert_eq!(crop.process(&img).unwrap(), img);
    }
}
