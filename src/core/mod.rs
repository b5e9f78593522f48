//! Core error handling and shared constants.

pub mod constants;
pub mod errors;

pub use errors::{OpKind, VisionError, VisionResult};
