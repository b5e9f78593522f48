//! Loading, saving and converting images.

use crate::core::{VisionError, VisionResult};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Converts a DynamicImage to a GrayImage.
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path and converts it to an RgbImage.
///
/// # Errors
///
/// Returns `VisionError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> VisionResult<RgbImage> {
    let img = image::open(path).map_err(VisionError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Saves an image to a file path; the format is derived from the extension.
///
/// # Errors
///
/// Returns `VisionError::ImageLoad` if the image cannot be encoded or
/// written.
pub fn save_image(img: &RgbImage, path: &Path) -> VisionResult<()> {
    img.save(path).map_err(VisionError::from)
}

/// Creates an RgbImage from raw RGB pixel data.
///
/// Returns `None` if the data length does not match `width * height * 3`.
pub fn create_rgb_image(width: u32, height: u32, data: Vec<u8>) -> Option<RgbImage> {
    if data.len() != (width * height * 3) as usize {
        return None;
    }

    ImageBuffer::from_raw(width, height, data)
}

/// Loads a batch of images from file paths.
///
/// Uses parallel loading when the batch exceeds the default parallel
/// threshold.
///
/// # Errors
///
/// Returns the first `VisionError` encountered while loading.
pub fn load_images_batch<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> VisionResult<Vec<RgbImage>> {
    load_images_batch_with_threshold(paths, None)
}

/// Loads a batch of images with a custom parallel threshold.
///
/// Batches larger than the threshold (default
/// [`DEFAULT_PARALLEL_THRESHOLD`](crate::core::constants::DEFAULT_PARALLEL_THRESHOLD))
/// are loaded with rayon.
pub fn load_images_batch_with_threshold<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
    parallel_threshold: Option<usize>,
) -> VisionResult<Vec<RgbImage>> {
    use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;

    let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

    if paths.len() > threshold {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}
