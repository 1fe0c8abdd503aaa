use crate::ForgeError;
use crate::features::aspect_fit::{CanvasSize, DEFAULT_AUTO_THRESHOLD, FitMode};
use crate::features::gps::GeoCoordinate;
use crate::features::location::LocationSource;
use crate::time::error::TimeError;
use crate::time::resolve_civil_time;
use crate::time::structs::CivilTime;
use bon::Builder;
use std::path::PathBuf;

pub const DEFAULT_LANDSCAPE: CanvasSize = CanvasSize::new(2592, 1936);
pub const DEFAULT_PORTRAIT: CanvasSize = CanvasSize::new(1936, 2592);
pub const DEFAULT_CIVIL_DATETIME: &str = "2020:07:22 10:15:30";
pub const DEFAULT_UTC_OFFSET: &str = "+06:30";
pub const DEFAULT_SUBSEC: &str = "0";
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;
pub const DEFAULT_FIXED_ORIGIN: GeoCoordinate = GeoCoordinate::new(16.8409, 96.1735, 20.0);
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Run-wide settings, shared read-only by every image of a batch.
///
/// ```rust
/// use exif_forge::SynthesisConfig;
///
/// let config = SynthesisConfig::builder()
///     .civil_datetime("2021:03:14 15:09:26")
///     .utc_offset("Europe/Amsterdam")
///     .radius_meters(25.0)
///     .seed(42)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct SynthesisConfig {
    #[builder(default = DEFAULT_LANDSCAPE)]
    pub landscape: CanvasSize,
    #[builder(default = DEFAULT_PORTRAIT)]
    pub portrait: CanvasSize,
    #[builder(default = DEFAULT_AUTO_THRESHOLD)]
    pub auto_threshold: f64,
    #[builder(default)]
    pub fit_mode: FitMode,

    /// Wall-clock capture time, `YYYY:MM:DD HH:MM:SS`.
    #[builder(into, default = DEFAULT_CIVIL_DATETIME.to_string())]
    pub civil_datetime: String,
    /// `+HH:MM`, `Z` or an IANA zone name.
    #[builder(into, default = DEFAULT_UTC_OFFSET.to_string())]
    pub utc_offset: String,
    /// Milliseconds, 0-999.
    #[builder(into, default = DEFAULT_SUBSEC.to_string())]
    pub subsec: String,

    #[builder(default = DEFAULT_RADIUS_METERS)]
    pub radius_meters: f64,
    #[builder(default = DEFAULT_FIXED_ORIGIN)]
    pub fixed_origin: GeoCoordinate,
    /// CSV of candidate origins. Ignored when `force_fixed_origin` is set.
    #[builder(into)]
    pub location_table: Option<PathBuf>,
    #[builder(default)]
    pub force_fixed_origin: bool,

    #[builder(into, default = PathBuf::from("out"))]
    pub output_dir: PathBuf,
    #[builder(default = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,
    #[builder(default = true)]
    pub embed_thumbnail: bool,
    #[builder(default = true)]
    pub sync_file_date: bool,

    /// Base seed for reproducible runs. Without it every image draws from OS entropy.
    pub seed: Option<u64>,
    /// Resampling threads, all cores if unset.
    pub jobs: Option<usize>,
    #[builder(default)]
    pub dry_run: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SynthesisConfig {
    /// Checks the numeric settings. Time settings are checked by [`Self::civil_time`].
    pub fn validate(&self) -> Result<(), ForgeError> {
        if !self.radius_meters.is_finite() || self.radius_meters < 0.0 {
            return Err(ForgeError::Config(format!(
                "radius must be a non-negative number of meters, got {}",
                self.radius_meters
            )));
        }
        if !self.auto_threshold.is_finite() || self.auto_threshold < 0.0 {
            return Err(ForgeError::Config(format!(
                "auto threshold must be non-negative, got {}",
                self.auto_threshold
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ForgeError::Config(format!(
                "JPEG quality must be within 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.jobs == Some(0) {
            return Err(ForgeError::Config("jobs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn civil_time(&self) -> Result<CivilTime, TimeError> {
        resolve_civil_time(&self.civil_datetime, &self.utc_offset, &self.subsec)
    }

    pub fn location_source(&self) -> LocationSource {
        match &self.location_table {
            Some(path) if !self.force_fixed_origin => LocationSource::from_table(path),
            _ => LocationSource::Fixed(self.fixed_origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SynthesisConfig::default();
        assert_eq!(config.landscape, CanvasSize::new(2592, 1936));
        assert_eq!(config.portrait, CanvasSize::new(1936, 2592));
        assert_eq!(config.auto_threshold, 0.05);
        assert_eq!(config.fit_mode, FitMode::Auto);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.embed_thumbnail && config.sync_file_date);
        assert!(config.validate().is_ok());

        let civil = config.civil_time().unwrap();
        assert_eq!(civil.exif_datetime(), "2020:07:22 10:15:30");
        assert_eq!(civil.offset_label(), "+06:30");
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        for config in [
            SynthesisConfig::builder().radius_meters(-1.0).build(),
            SynthesisConfig::builder().radius_meters(f64::NAN).build(),
            SynthesisConfig::builder().auto_threshold(-0.1).build(),
            SynthesisConfig::builder().jpeg_quality(0).build(),
            SynthesisConfig::builder().jobs(0).build(),
        ] {
            assert!(matches!(config.validate(), Err(ForgeError::Config(_))), "{config:?}");
        }
    }

    #[test]
    fn test_location_source_selection() {
        let origin = GeoCoordinate::new(1.0, 2.0, 3.0);
        let fixed = SynthesisConfig::builder().fixed_origin(origin).build();
        assert_eq!(fixed.location_source(), LocationSource::Fixed(origin));

        let forced = SynthesisConfig::builder()
            .fixed_origin(origin)
            .location_table("/definitely/not/here.csv")
            .force_fixed_origin(true)
            .build();
        assert_eq!(forced.location_source(), LocationSource::Fixed(origin));

        let missing = SynthesisConfig::builder()
            .location_table("/definitely/not/here.csv")
            .build();
        assert!(matches!(missing.location_source(), LocationSource::Unavailable(_)));
    }
}
