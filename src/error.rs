use std::path::PathBuf;

use thiserror::Error;

/// Library error type for collage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more configured photo directories are invalid or unreadable.
    #[error("invalid photo directory: {0}")]
    BadDir(String),

    /// The scan completed but found no images.
    #[error("no images found in configured directories")]
    EmptyScan,

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    /// A file could not be decoded into pixels.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The collage engine rejected the build.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Failure reasons surfaced by the collage engine itself.
///
/// The engine returns these to its caller without logging or retrying;
/// presentation and retry policy belong to the caller.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Zero images were supplied.
    #[error("no images supplied for collage")]
    EmptyInput,

    /// A build parameter (target width or nominal row height) is not positive.
    #[error("{name} must be positive (got {value})")]
    InvalidParameter { name: &'static str, value: u32 },

    /// An input image has a zero-sized side.
    #[error("image {source_id} has invalid dimensions {width}x{height}")]
    InvalidDimension {
        source_id: String,
        width: u32,
        height: u32,
    },

    /// A row's scale computation degenerated. Unreachable with validated
    /// inputs; kept as a guard.
    #[error("row {row} has degenerate natural width {natural_width}")]
    Geometry { row: usize, natural_width: f64 },

    /// An image could not be scaled or placed onto the canvas. The whole
    /// build fails; a partial collage is never returned.
    #[error("failed to composite {source_id}: {reason}")]
    Composition { source_id: String, reason: String },
}
