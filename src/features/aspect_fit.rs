use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_AUTO_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// The fit requested by the user. `Auto` is decided per image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Auto,
    Scale,
    Crop,
}

/// The fit actually applied to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedFit {
    /// Resize to fit inside the canvas, then pad to its exact size.
    Scale,
    /// Resize to cover the canvas, then center-crop to its exact size.
    Crop,
}

/// A target canvas, written `WIDTHxHEIGHT` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for CanvasSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("'{s}' is not WIDTHxHEIGHT"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("'{v}' is not a positive pixel count"))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizePlan {
    pub target_width: u32,
    pub target_height: u32,
    pub mode: ResolvedFit,
}

/// Decides the canvas and fit for an image.
///
/// Portrait images (`height > width`) get `portrait`; landscape and square images get
/// `landscape`. `Auto` scales when the image's aspect ratio is within `auto_threshold`
/// of the canvas ratio and crops otherwise. A zero height resolves to `Crop` without
/// computing a ratio.
pub fn plan_resize(
    dims: ImageDimensions,
    requested: FitMode,
    landscape: CanvasSize,
    portrait: CanvasSize,
    auto_threshold: f64,
) -> ResizePlan {
    let canvas = if dims.height > dims.width {
        portrait
    } else {
        landscape
    };

    let mode = match requested {
        FitMode::Scale => ResolvedFit::Scale,
        FitMode::Crop => ResolvedFit::Crop,
        FitMode::Auto if dims.height == 0 => ResolvedFit::Crop,
        FitMode::Auto => {
            let current = f64::from(dims.width) / f64::from(dims.height);
            if (current - canvas.aspect_ratio()).abs() < auto_threshold {
                ResolvedFit::Scale
            } else {
                ResolvedFit::Crop
            }
        }
    };

    ResizePlan {
        target_width: canvas.width,
        target_height: canvas.height,
        mode,
    }
}
