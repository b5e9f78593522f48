//! Constants used throughout the crate.

/// The default threshold for parallel processing.
///
/// Batches with more items than this are processed with rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// The default font scale, in pixels, for annotation text.
pub const DEFAULT_FONT_SCALE: f32 = 16.0;

/// The default line thickness, in pixels, for annotation boxes.
pub const DEFAULT_BOX_THICKNESS: i32 = 1;

/// The default number of columns for tiled image grids.
pub const DEFAULT_TILE_COLUMNS: u32 = 4;

/// The default gutter, in pixels, between tiles in a grid.
pub const DEFAULT_TILE_SEP: u32 = 2;
