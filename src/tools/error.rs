use crate::features::error::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the external collaborators. Each one only costs the image it happened on.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Exiftool failed to execute or process the file: {0}")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("Exiftool did not update {path}: {output}")]
    NotUpdated { path: PathBuf, output: String },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Image(#[from] ImageError),
}
