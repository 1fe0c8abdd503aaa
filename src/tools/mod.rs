//! Seams to the programs and libraries that touch pixels and files.
pub mod error;
pub mod exiftool_backend;
pub mod resampler;

use crate::features::aspect_fit::{ImageDimensions, ResizePlan};
use crate::features::error::ImageError;
use crate::features::metadata_plan::MetadataPlan;
use error::ToolError;
use std::path::{Path, PathBuf};

pub use exiftool_backend::ExifToolBackend;
pub use resampler::ImageCrateResampler;

/// Reads the displayed size of an image.
pub trait ImageProber {
    fn probe(&mut self, path: &Path) -> Result<ImageDimensions, ToolError>;
}

/// Produces the exact target canvas from a source image.
///
/// Called from a thread pool, hence `Sync`.
pub trait ImageResampler: Sync {
    fn resample(&self, source: &Path, output: &Path, plan: &ResizePlan) -> Result<(), ImageError>;

    fn render_thumbnail(&self, image: &Path, thumbnail: &Path) -> Result<(), ImageError>;
}

/// Side effects applied to a written file after its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcess {
    /// JPEG to embed as `ThumbnailImage`.
    pub thumbnail: Option<PathBuf>,
    /// Value for `FileModifyDate`, `YYYY:MM:DD HH:MM:SS+HH:MM`.
    pub file_modify_date: Option<String>,
}

impl PostProcess {
    pub fn is_empty(&self) -> bool {
        self.thumbnail.is_none() && self.file_modify_date.is_none()
    }
}

pub trait TagWriter {
    /// Replaces all metadata of `path` with `plan` in a single write.
    fn write(&mut self, path: &Path, plan: &MetadataPlan) -> Result<(), ToolError>;

    fn finalize(&mut self, path: &Path, post: &PostProcess) -> Result<(), ToolError>;
}
