use super::error::ToolError;
use super::{ImageProber, PostProcess, TagWriter};
use crate::features::aspect_fit::ImageDimensions;
use crate::features::error::ImageError;
use crate::features::metadata_plan::MetadataPlan;
use exiftool::ExifTool;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static RE_UPDATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) image files? updated").expect("static updated pattern"));

/// Probes and tags images through one stay-open exiftool process.
pub struct ExifToolBackend {
    exiftool: ExifTool,
}

impl ExifToolBackend {
    /// Starts exiftool, from `exiftool_path` if given, otherwise from the `PATH`.
    pub fn new(exiftool_path: Option<&Path>) -> Result<Self, ToolError> {
        let exiftool = match exiftool_path {
            Some(path) => ExifTool::with_executable(path)?,
            None => ExifTool::new()?,
        };
        Ok(Self { exiftool })
    }

    fn execute(&mut self, path: &Path, args: &[String]) -> Result<(), ToolError> {
        let file = path
            .to_str()
            .ok_or_else(|| ToolError::NonUtf8Path(path.to_path_buf()))?;
        let mut cmd: Vec<&str> = args.iter().map(String::as_str).collect();
        cmd.push("-overwrite_original");
        cmd.push(file);
        debug!("exiftool {}", cmd.join(" "));

        let output = self.exiftool.execute_raw(cmd.as_slice())?;
        check_updated(path, &String::from_utf8_lossy(&output))
    }
}

/// Accepts exiftool's summary only if at least one file was updated.
fn check_updated(path: &Path, output: &str) -> Result<(), ToolError> {
    let updated = RE_UPDATED
        .captures(output)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(0);
    if updated > 0 {
        Ok(())
    } else {
        Err(ToolError::NotUpdated {
            path: path.to_path_buf(),
            output: output.trim().to_string(),
        })
    }
}

fn get_required_u32(exif: &Value, key: &str, path: &Path) -> Result<u32, ImageError> {
    exif.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ImageError::InvalidDimensions {
            path: path.to_path_buf(),
            reason: format!("missing or invalid {key}"),
        })
}

/// Reads the displayed dimensions from numeric (`-n`) exiftool output.
///
/// Orientations 5 to 8 rotate by 90°, so width and height are swapped for them.
pub fn dimensions_from_exif(exif: &Value, path: &Path) -> Result<ImageDimensions, ImageError> {
    let mime_type = exif
        .get("MIMEType")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !mime_type.starts_with("image/") {
        return Err(ImageError::InvalidDimensions {
            path: path.to_path_buf(),
            reason: format!("not an image (MIME type '{mime_type}')"),
        });
    }

    let width = get_required_u32(exif, "ImageWidth", path)?;
    let height = get_required_u32(exif, "ImageHeight", path)?;
    let rotated = exif
        .get("Orientation")
        .and_then(Value::as_u64)
        .is_some_and(|o| (5..=8).contains(&o));

    Ok(if rotated {
        ImageDimensions {
            width: height,
            height: width,
        }
    } else {
        ImageDimensions { width, height }
    })
}

impl ImageProber for ExifToolBackend {
    fn probe(&mut self, path: &Path) -> Result<ImageDimensions, ToolError> {
        let numeric_exif = self.exiftool.json(path, &["-n"])?;
        Ok(dimensions_from_exif(&numeric_exif, path)?)
    }
}

impl TagWriter for ExifToolBackend {
    fn write(&mut self, path: &Path, plan: &MetadataPlan) -> Result<(), ToolError> {
        let mut args = vec!["-all=".to_string()];
        args.extend(plan.to_exiftool_args());
        self.execute(path, &args)
    }

    fn finalize(&mut self, path: &Path, post: &PostProcess) -> Result<(), ToolError> {
        if post.is_empty() {
            return Ok(());
        }
        self.execute(path, &post_process_args(post)?)
    }
}

fn post_process_args(post: &PostProcess) -> Result<Vec<String>, ToolError> {
    let mut args = Vec::new();
    if let Some(thumbnail) = &post.thumbnail {
        let thumbnail = thumbnail
            .to_str()
            .ok_or_else(|| ToolError::NonUtf8Path(PathBuf::from(thumbnail)))?;
        args.push(format!("-ThumbnailImage<={thumbnail}"));
    }
    if let Some(date) = &post.file_modify_date {
        args.push(format!("-FileModifyDate={date}"));
    }
    Ok(args)
}
