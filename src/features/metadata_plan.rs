use super::aspect_fit::ResizePlan;
use super::gps::GeoCoordinate;
use crate::time::structs::{CivilTime, UtcStamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const CAMERA_MAKE: &str = "Apple";
pub const CAMERA_MODEL: &str = "iPhone 4";
pub const CAMERA_SOFTWARE: &str = "6.1.3";

/// Every tag of the GPS group. A plan carries all of them or none.
pub const GPS_TAGS: [&str; 8] = [
    "GPSLatitude",
    "GPSLatitudeRef",
    "GPSLongitude",
    "GPSLongitudeRef",
    "GPSAltitude",
    "GPSAltitudeRef",
    "GPSDateStamp",
    "GPSTimeStamp",
];

enum FixedValue {
    Text(&'static str),
    Integer(i64),
    Real(f64),
}

/// Exposure and optics of the rear camera, identical for every image.
const EXPOSURE_TAGS: [(&str, FixedValue); 18] = [
    ("ExposureTime", FixedValue::Text("1/120")),
    ("FNumber", FixedValue::Real(2.8)),
    ("ApertureValue", FixedValue::Real(2.8)),
    ("ExposureProgram", FixedValue::Integer(2)),
    ("ISO", FixedValue::Integer(80)),
    ("ExifVersion", FixedValue::Text("0221")),
    ("MeteringMode", FixedValue::Integer(5)),
    ("Flash", FixedValue::Integer(24)),
    ("FocalLength", FixedValue::Real(3.85)),
    ("FocalLengthIn35mmFormat", FixedValue::Integer(35)),
    ("ColorSpace", FixedValue::Integer(1)),
    ("SensingMethod", FixedValue::Integer(2)),
    ("ExposureMode", FixedValue::Integer(0)),
    ("WhiteBalance", FixedValue::Integer(0)),
    ("SceneCaptureType", FixedValue::Integer(0)),
    ("Orientation", FixedValue::Integer(1)),
    ("XResolution", FixedValue::Integer(72)),
    ("YResolution", FixedValue::Integer(72)),
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl TagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&FixedValue> for TagValue {
    fn from(value: &FixedValue) -> Self {
        match value {
            FixedValue::Text(s) => Self::Text((*s).to_string()),
            FixedValue::Integer(i) => Self::Integer(*i),
            FixedValue::Real(r) => Self::Real(*r),
        }
    }
}

/// Tag name to value mapping handed to the tag writer as one unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MetadataPlan {
    tags: BTreeMap<String, TagValue>,
}

impl MetadataPlan {
    fn insert(&mut self, tag: &str, value: TagValue) {
        self.tags.insert(tag.to_string(), value);
    }

    fn text(&mut self, tag: &str, value: impl Into<String>) {
        self.insert(tag, TagValue::Text(value.into()));
    }

    pub fn get(&self, tag: &str) -> Option<&TagValue> {
        self.tags.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn has_gps(&self) -> bool {
        GPS_TAGS.iter().all(|tag| self.contains(tag))
    }

    /// Arguments for exiftool, one `-Tag=value` per entry. Numbers are written with `#=`
    /// so exiftool stores them verbatim instead of reading them as print values.
    pub fn to_exiftool_args(&self) -> Vec<String> {
        self.iter()
            .map(|(tag, value)| match value {
                TagValue::Text(s) => format!("-{tag}={s}"),
                number => format!("-{tag}#={number}"),
            })
            .collect()
    }
}

/// Composes the tags for one image.
///
/// The GPS group is added only when `fuzzed` is present, and then completely.
pub fn build_metadata_plan(
    resize: &ResizePlan,
    fuzzed: Option<&GeoCoordinate>,
    utc: &UtcStamp,
    civil: &CivilTime,
) -> MetadataPlan {
    let mut plan = MetadataPlan::default();

    plan.text("Make", CAMERA_MAKE);
    plan.text("Model", CAMERA_MODEL);
    plan.text("Software", CAMERA_SOFTWARE);

    plan.insert("ExifImageWidth", TagValue::Integer(resize.target_width.into()));
    plan.insert("ExifImageHeight", TagValue::Integer(resize.target_height.into()));

    let datetime = civil.exif_datetime();
    for tag in ["DateTimeOriginal", "CreateDate", "ModifyDate"] {
        plan.text(tag, datetime.clone());
    }
    let offset = civil.offset_label();
    for tag in ["OffsetTime", "OffsetTimeOriginal", "OffsetTimeDigitized"] {
        plan.text(tag, offset.clone());
    }
    let subsec = civil.subsec_label();
    for tag in ["SubSecTime", "SubSecTimeOriginal", "SubSecTimeDigitized"] {
        plan.text(tag, subsec.clone());
    }

    for (tag, value) in &EXPOSURE_TAGS {
        plan.insert(tag, value.into());
    }

    if let Some(coordinate) = fuzzed {
        plan.insert("GPSLatitude", TagValue::Real(coordinate.latitude.abs()));
        plan.text("GPSLatitudeRef", coordinate.latitude_ref());
        plan.insert("GPSLongitude", TagValue::Real(coordinate.longitude.abs()));
        plan.text("GPSLongitudeRef", coordinate.longitude_ref());
        plan.insert("GPSAltitude", TagValue::Real(coordinate.altitude_meters.abs()));
        plan.insert(
            "GPSAltitudeRef",
            TagValue::Integer(coordinate.altitude_ref().into()),
        );
        plan.text("GPSDateStamp", utc.gps_date_stamp());
        plan.text("GPSTimeStamp", utc.gps_time_stamp());
    }

    plan
}
