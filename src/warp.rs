//! Geometric warps: scaling, rotation, affine maps and lens undistortion.
//!
//! Warps use inverse mapping with bilinear sampling: each output pixel is
//! traced back through the inverse transform and interpolated from its four
//! source neighbours. Pixels that map outside the source are set to the
//! background fill. Rows of the output are processed in parallel.

use crate::core::{VisionError, VisionResult};
use crate::geometry::Point;
use image::{Rgb, RgbImage, imageops};
use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Interpolation kernels for resizing.
///
/// `Area` has no direct counterpart in the `image` crate and is approximated
/// with a Gaussian kernel, which is likewise moire-free when decimating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest-neighbour sampling.
    Nearest,
    /// Bilinear interpolation.
    Linear,
    /// Bicubic (Catmull-Rom) interpolation.
    #[default]
    Cubic,
    /// Pixel-area averaging, preferred for decimation.
    Area,
    /// Lanczos interpolation over an 8x8 neighbourhood.
    Lanczos,
}

/// Checks that a source image has pixels to sample from.
fn check_source(img: &RgbImage) -> VisionResult<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(VisionError::invalid_input("source image must be non-empty"));
    }
    Ok(())
}

impl Interpolation {
    fn filter(self) -> imageops::FilterType {
        match self {
            Interpolation::Nearest => imageops::FilterType::Nearest,
            Interpolation::Linear => imageops::FilterType::Triangle,
            Interpolation::Cubic => imageops::FilterType::CatmullRom,
            Interpolation::Area => imageops::FilterType::Gaussian,
            Interpolation::Lanczos => imageops::FilterType::Lanczos3,
        }
    }
}

/// Options for [`scale`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleOptions {
    /// Explicit output size `(width, height)`. When set, it overrides the
    /// size derived from the scale factor.
    pub size: Option<(u32, u32)>,
    /// Standard deviation of a Gaussian pre-smoothing kernel, applied only
    /// when shrinking.
    pub sigma: Option<f32>,
    /// Interpolation kernel; bicubic when `None`.
    pub interpolation: Option<Interpolation>,
}

/// Scales an image uniformly in both directions.
///
/// A factor above 1 enlarges, below 1 shrinks. When shrinking with
/// `options.sigma` set, the image is Gaussian-smoothed first to suppress
/// aliasing.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if the factor is not a positive
/// finite number or an explicit output size has a zero dimension.
pub fn scale(img: &RgbImage, factor: f32, options: &ScaleOptions) -> VisionResult<RgbImage> {
    check_source(img)?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(VisionError::invalid_input(format!(
            "scale factor must be positive and finite, got {factor}"
        )));
    }

    let (width, height) = img.dimensions();
    let (out_w, out_h) = match options.size {
        Some((w, h)) => {
            if w == 0 || h == 0 {
                return Err(VisionError::invalid_input("output size must be non-zero"));
            }
            (w, h)
        }
        None => (
            ((width as f32 * factor).round() as u32).max(1),
            ((height as f32 * factor).round() as u32).max(1),
        ),
    };

    let filter = options.interpolation.unwrap_or_default().filter();

    let smoothed;
    let src = match options.sigma {
        Some(sigma) if factor < 1.0 && sigma > 0.0 => {
            smoothed = imageproc::filter::gaussian_blur_f32(img, sigma);
            &smoothed
        }
        _ => img,
    };

    Ok(imageops::resize(src, out_w, out_h, filter))
}

/// Computes the 2D rotation matrix about an arbitrary centre.
///
/// The returned matrix maps source to destination coordinates in
/// homogeneous form. A positive `angle` (radians) rotates counter-clockwise
/// as seen on screen; `scale` applies an additional isotropic scale.
pub fn rotation_matrix(centre: Point, angle: f32, scale: f32) -> Matrix3<f32> {
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    Matrix3::new(
        alpha,
        beta,
        (1.0 - alpha) * centre.x - beta * centre.y,
        -beta,
        alpha,
        beta * centre.x + (1.0 - alpha) * centre.y,
        0.0,
        0.0,
        1.0,
    )
}

/// Options for [`warp_affine`].
#[derive(Debug, Clone, Copy)]
pub struct WarpOptions {
    /// When true, the matrix already maps destination to source coordinates
    /// and is used for sampling directly instead of being inverted.
    pub inverse: bool,
    /// Output size `(width, height)`; the source size when `None`.
    pub size: Option<(u32, u32)>,
    /// Fill color for pixels that map outside the source image.
    pub bg: Rgb<u8>,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            inverse: false,
            size: None,
            bg: Rgb([0, 0, 0]),
        }
    }
}

/// Applies an affine transform to an image.
///
/// `m` is an affine map in homogeneous form (last row `0 0 1`) mapping
/// source to destination coordinates, unless `options.inverse` is set.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if the matrix is singular or the
/// output size has a zero dimension.
pub fn warp_affine(
    img: &RgbImage,
    m: &Matrix3<f32>,
    options: &WarpOptions,
) -> VisionResult<RgbImage> {
    check_source(img)?;

    let sampling = if options.inverse {
        *m
    } else {
        m.try_inverse().ok_or_else(|| {
            VisionError::invalid_input("affine matrix is singular and cannot be inverted")
        })?
    };

    let (out_w, out_h) = options.size.unwrap_or(img.dimensions());
    if out_w == 0 || out_h == 0 {
        return Err(VisionError::invalid_input("output size must be non-zero"));
    }

    let (src_w, src_h) = img.dimensions();
    let mut dst = RgbImage::from_pixel(out_w, out_h, options.bg);
    let buffer: &mut [u8] = dst.as_mut();

    buffer
        .par_chunks_mut((out_w * 3) as usize)
        .enumerate()
        .for_each(|(dst_y, row)| {
            for dst_x in 0..out_w {
                let src_point = sampling * Vector3::new(dst_x as f32, dst_y as f32, 1.0);
                let src_x = src_point.x;
                let src_y = src_point.y;

                if src_x >= 0.0
                    && src_y >= 0.0
                    && src_x <= (src_w - 1) as f32
                    && src_y <= (src_h - 1) as f32
                {
                    let pixel = bilinear_interpolate(img, src_x, src_y);
                    let index = (dst_x * 3) as usize;
                    row[index..index + 3].copy_from_slice(&pixel.0);
                }
            }
        });

    Ok(dst)
}

/// Rotates an image about a centre point.
///
/// The angle is in radians, counter-clockwise positive. The output canvas
/// keeps the source size, so corners swung outside it are lost and the
/// uncovered corners are filled with black. `centre` defaults to the image
/// centre.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if the angle is not finite.
pub fn rotate(img: &RgbImage, angle: f32, centre: Option<Point>) -> VisionResult<RgbImage> {
    if !angle.is_finite() {
        return Err(VisionError::invalid_input("rotation angle must be finite"));
    }

    let (width, height) = img.dimensions();
    let centre = centre.unwrap_or_else(|| Point::new(width as f32 / 2.0, height as f32 / 2.0));
    debug!(angle, centre.x, centre.y, "rotating image");

    let m = rotation_matrix(centre, angle, 1.0);
    warp_affine(img, &m, &WarpOptions::default())
}

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length along x, in pixels.
    pub fx: f32,
    /// Focal length along y, in pixels.
    pub fy: f32,
    /// Principal point x, in pixels.
    pub cx: f32,
    /// Principal point y, in pixels.
    pub cy: f32,
}

/// Plumb-bob lens distortion coefficients.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Distortion {
    /// Second-order radial coefficient.
    pub k1: f32,
    /// Fourth-order radial coefficient.
    pub k2: f32,
    /// First tangential coefficient.
    pub p1: f32,
    /// Second tangential coefficient.
    pub p2: f32,
    /// Sixth-order radial coefficient.
    pub k3: f32,
}

/// Removes lens distortion from an image.
///
/// Each undistorted output pixel is projected into normalized camera
/// coordinates, pushed through the plumb-bob model, reprojected with the
/// same intrinsics and sampled bilinearly from the source.
///
/// # Errors
///
/// Returns `VisionError::InvalidInput` if either focal length is zero.
pub fn undistort(
    img: &RgbImage,
    intrinsics: &CameraIntrinsics,
    distortion: &Distortion,
) -> VisionResult<RgbImage> {
    check_source(img)?;
    if intrinsics.fx == 0.0 || intrinsics.fy == 0.0 {
        return Err(VisionError::invalid_input("focal lengths must be non-zero"));
    }

    let (width, height) = img.dimensions();
    let mut dst = RgbImage::new(width, height);
    let buffer: &mut [u8] = dst.as_mut();

    let CameraIntrinsics { fx, fy, cx, cy } = *intrinsics;
    let Distortion { k1, k2, p1, p2, k3 } = *distortion;

    buffer
        .par_chunks_mut((width * 3) as usize)
        .enumerate()
        .for_each(|(v, row)| {
            let y = (v as f32 - cy) / fy;
            for u in 0..width {
                let x = (u as f32 - cx) / fx;

                let r2 = x * x + y * y;
                let radial = 1.0 + r2 * (k1 + r2 * (k2 + r2 * k3));
                let xd = x * radial + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
                let yd = y * radial + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;

                let src_x = fx * xd + cx;
                let src_y = fy * yd + cy;

                if src_x >= 0.0
                    && src_y >= 0.0
                    && src_x <= (width - 1) as f32
                    && src_y <= (height - 1) as f32
                {
                    let pixel = bilinear_interpolate(img, src_x, src_y);
                    let index = (u * 3) as usize;
                    row[index..index + 3].copy_from_slice(&pixel.0);
                }
            }
        });

    Ok(dst)
}

/// Bilinear interpolation at a fractional coordinate.
fn bilinear_interpolate(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let x1 = x.floor() as u32;
    let y1 = y.floor() as u32;
    let x2 = (x1 + 1).min(image.width() - 1);
    let y2 = (y1 + 1).min(image.height() - 1);

    let dx = x - x1 as f32;
    let dy = y - y1 as f32;

    let p11 = image.get_pixel(x1, y1);
    let p12 = image.get_pixel(x1, y2);
    let p21 = image.get_pixel(x2, y1);
    let p22 = image.get_pixel(x2, y2);

    let mut result = [0u8; 3];
    for (i, channel) in result.iter_mut().enumerate() {
        let val = (1.0 - dx) * (1.0 - dy) * p11.0[i] as f32
            + dx * (1.0 - dy) * p21.0[i] as f32
            + (1.0 - dx) * dy * p12.0[i] as f32
            + dx * dy * p22.0[i] as f32;
        *channel = val.round().clamp(0.0, 255.0) as u8;
    }

    Rgb(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_scale_dimensions() {
        let img = gradient(8, 4);
        assert_eq!(
            scale(&img, 0.5, &ScaleOptions::default()).unwrap().dimensions(),
            (4, 2)
        );
        assert_eq!(
            scale(&img, 2.0, &ScaleOptions::default()).unwrap().dimensions(),
            (16, 8)
        );
    }

    #[test]
    fn test_scale_explicit_size() {
        let img = gradient(8, 4);
        let options = ScaleOptions {
            size: Some((3, 5)),
            ..Default::default()
        };
        assert_eq!(scale(&img, 1.0, &options).unwrap().dimensions(), (3, 5));
    }

    #[test]
    fn test_scale_with_smoothing() {
        let img = gradient(8, 8);
        let options = ScaleOptions {
            sigma: Some(1.0),
            interpolation: Some(Interpolation::Linear),
            ..Default::default()
        };
        assert_eq!(scale(&img, 0.5, &options).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_scale_bad_factor() {
        let img = gradient(4, 4);
        assert!(scale(&img, 0.0, &ScaleOptions::default()).is_err());
        assert!(scale(&img, -1.0, &ScaleOptions::default()).is_err());
        assert!(scale(&img, f32::NAN, &ScaleOptions::default()).is_err());
    }

    #[test]
    fn test_rotation_matrix_zero_angle_is_identity() {
        let m = rotation_matrix(Point::new(3.0, 2.0), 0.0, 1.0);
        assert_eq!(m, Matrix3::identity());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut img = RgbImage::new(4, 4);
        img.put_pixel(1, 1, Rgb([255, 0, 0]));

        // about the centre (2, 2), (1, 1) maps to (1, 3)
        let out = rotate(&img, FRAC_PI_2, None).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(1, 3), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(1, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_warp_affine_identity() {
        let img = gradient(5, 5);
        let out = warp_affine(&img, &Matrix3::identity(), &WarpOptions::default()).unwrap();
        assert_eq!(out.get_pixel(2, 3), img.get_pixel(2, 3));
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(0, 0));
        // the last row and column are inside the sampling domain and survive
        assert_eq!(out.get_pixel(4, 4), img.get_pixel(4, 4));
        assert_eq!(out.get_pixel(4, 0), img.get_pixel(4, 0));
        assert_eq!(out.get_pixel(0, 4), img.get_pixel(0, 4));
    }

    #[test]
    fn test_warp_affine_rejects_empty_source() {
        let img = RgbImage::new(0, 0);
        let options = WarpOptions {
            size: Some((4, 4)),
            ..Default::default()
        };
        assert!(warp_affine(&img, &Matrix3::identity(), &options).is_err());
    }

    #[test]
    fn test_warp_affine_translation() {
        let mut img = RgbImage::new(4, 4);
        img.put_pixel(1, 1, Rgb([0, 255, 0]));

        let m = Matrix3::new(1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let out = warp_affine(&img, &m, &WarpOptions::default()).unwrap();
        assert_eq!(out.get_pixel(2, 1), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_warp_affine_inverse_flag() {
        let mut img = RgbImage::new(4, 4);
        img.put_pixel(2, 1, Rgb([0, 255, 0]));

        // as an inverse map, m is applied to destination coordinates directly:
        // dst (1, 1) samples src (2, 1)
        let m = Matrix3::new(1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let options = WarpOptions {
            inverse: true,
            ..Default::default()
        };
        let out = warp_affine(&img, &m, &options).unwrap();
        assert_eq!(out.get_pixel(1, 1), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_warp_affine_singular_matrix() {
        let img = gradient(4, 4);
        let m = Matrix3::new(1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert!(warp_affine(&img, &m, &WarpOptions::default()).is_err());
    }

    #[test]
    fn test_warp_affine_bg_fill() {
        let img = gradient(4, 4);
        let m = Matrix3::new(1.0, 0.0, 100.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let options = WarpOptions {
            bg: Rgb([7, 8, 9]),
            ..Default::default()
        };
        let out = warp_affine(&img, &m, &options).unwrap();
        assert_eq!(out.get_pixel(0, 0), &Rgb([7, 8, 9]));
    }

    #[test]
    fn test_undistort_zero_coefficients_is_identity() {
        let img = gradient(6, 6);
        let intrinsics = CameraIntrinsics {
            fx: 10.0,
            fy: 10.0,
            cx: 3.0,
            cy: 3.0,
        };
        let out = undistort(&img, &intrinsics, &Distortion::default()).unwrap();
        assert_eq!(out.get_pixel(2, 2), img.get_pixel(2, 2));
        assert_eq!(out.get_pixel(4, 1), img.get_pixel(4, 1));
        assert_eq!(out.get_pixel(5, 5), img.get_pixel(5, 5));
    }

    #[test]
    fn test_undistort_rejects_empty_source() {
        let img = RgbImage::new(0, 0);
        let intrinsics = CameraIntrinsics {
            fx: 10.0,
            fy: 10.0,
            cx: 0.0,
            cy: 0.0,
        };
        assert!(undistort(&img, &intrinsics, &Distortion::default()).is_err());
    }

    #[test]
    fn test_scale_rejects_empty_source() {
        let img = RgbImage::new(0, 0);
        assert!(scale(&img, 2.0, &ScaleOptions::default()).is_err());
    }

    #[test]
    fn test_undistort_rejects_zero_focal() {
        let img = gradient(4, 4);
        let intrinsics = CameraIntrinsics {
            fx: 0.0,
            fy: 10.0,
            cx: 2.0,
            cy: 2.0,
        };
        assert!(undistort(&img, &intrinsics, &Distortion::default()).is_err());
    }

    #[test]
    fn test_bilinear_interpolate_centre() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 0]));

        let pixel = bilinear_interpolate(&img, 0.5, 0.5);
        assert_eq!(pixel, Rgb([128, 128, 64]));
    }
}
