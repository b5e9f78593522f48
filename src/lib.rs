//! # mvkit
//!
//! Image reshaping, geometric warps and annotation drawing for machine
//! vision, built on the `image` and `imageproc` crates.
//!
//! ## Features
//!
//! - Canvas reshaping: trim, crop, pad, horizontal/vertical concatenation,
//!   grid tiling and cover-resize
//! - Geometric warps: uniform scaling, rotation about an arbitrary centre,
//!   general affine maps and plumb-bob lens undistortion
//! - Annotation drawing: boxes, labelled boxes, text and point markers
//!
//! ## Modules
//!
//! * [`core`] - Error handling and shared constants
//! * [`geometry`] - Points and bounding boxes
//! * [`reshape`] - Canvas reshaping operations
//! * [`warp`] - Geometric warps
//! * [`draw`] - Annotation drawing
//! * [`color`] - Named-color lookup
//! * [`utils`] - Image IO and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mvkit::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), mvkit::core::VisionError> {
//! let img = load_image(Path::new("lab.png"))?;
//!
//! // scale to half size, then rotate 30 degrees about the centre
//! let small = mvkit::warp::scale(&img, 0.5, &Default::default())?;
//! let rotated = mvkit::warp::rotate(&small, 30f32.to_radians(), None)?;
//!
//! // annotate a detection
//! let mut annotated = rotated.clone();
//! let spec = BoxSpec::CentreSize {
//!     centre: Point::new(120.0, 80.0),
//!     width: 40.0,
//!     height: 30.0,
//! };
//! mvkit::draw::draw_box(&mut annotated, &spec, &BoxStyle::default())?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod core;
pub mod draw;
pub mod geometry;
pub mod reshape;
pub mod utils;
pub mod warp;

/// Prelude module for convenient imports.
///
/// Brings the essentials into scope with a single use statement:
///
/// ```rust
/// use mvkit::prelude::*;
/// ```
pub mod prelude {
    // Error handling (essential)
    pub use crate::core::{VisionError, VisionResult};

    // Geometry
    pub use crate::geometry::{BoundingBox, Point};

    // Drawing essentials
    pub use crate::draw::{BoxSpec, BoxStyle, TextStyle};

    // Warp essentials
    pub use crate::warp::{Interpolation, ScaleOptions, WarpOptions};

    // Image IO (minimal)
    pub use crate::utils::{load_image, load_images_batch, save_image};
}
