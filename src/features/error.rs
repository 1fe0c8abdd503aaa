use std::path::PathBuf;
use thiserror::Error;

/// Problems with the location source. All of them are recovered per image by leaving the
/// GPS tag group out.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location table {path} could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Location table {0} has no row with a valid latitude and longitude")]
    NoValidRows(PathBuf),

    #[error("Invalid {field} value '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("Invalid elevation value '{0}'")]
    InvalidElevation(String),
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Invalid image dimensions for {path}: {reason}")]
    InvalidDimensions { path: PathBuf, reason: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("I/O error during resampling: {0}")]
    Io(#[from] std::io::Error),
}
