//! Error types for image operations.
//!
//! Every fallible operation in the crate returns [`VisionError`]. Errors carry
//! the kind of operation that failed plus enough context to diagnose bad
//! arguments without a debugger.

use thiserror::Error;

/// The kind of operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Canvas reshaping (crop, pad, tile, concatenate).
    Reshape,
    /// Geometric warping (scale, rotate, affine, undistort).
    Warp,
    /// Annotation drawing.
    Draw,
    /// Generic processing.
    Generic,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Reshape => write!(f, "reshape"),
            OpKind::Warp => write!(f, "warp"),
            OpKind::Draw => write!(f, "draw"),
            OpKind::Generic => write!(f, "processing"),
        }
    }
}

/// Errors produced by mvkit operations.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The image could not be loaded or encoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// An operation failed with an underlying cause.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The kind of operation that failed.
        kind: OpKind,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller supplied arguments the operation cannot work with.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Creates a `VisionError` for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `VisionError` wrapping an underlying failure.
    pub fn processing(
        kind: OpKind,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a `VisionError` for a dimension mismatch.
    pub fn dimension_mismatch(operation: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            message: format!("{operation}: expected {expected}, got {actual}"),
        }
    }
}

impl From<image::ImageError> for VisionError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// Convenient result alias for mvkit operations.
pub type VisionResult<T> = Result<T, VisionError>;
