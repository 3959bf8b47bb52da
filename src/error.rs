use thiserror::Error;

/// Top-level error type for scan operations.
///
/// A missing document boundary and a degenerate (collinear) candidate are
/// not errors: both route the capture through the center-crop fallback.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Camera faults --
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device available")]
    NoDevice,

    #[error("frame acquisition failed: {0}")]
    Frame(String),

    // -- Raster and file I/O --
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScanError>;
