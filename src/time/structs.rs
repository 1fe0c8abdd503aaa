use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exif date-time layout shared by `DateTimeOriginal`, `CreateDate` and `ModifyDate`.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
pub const GPS_DATE_FORMAT: &str = "%Y:%m:%d";
pub const GPS_TIME_FORMAT: &str = "%H:%M:%S";

/// The wall-clock capture time shared by every image of a run.
///
/// `datetime_local` is understood to be *at* `offset` from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    pub datetime_local: NaiveDateTime,
    pub offset: FixedOffset,
    /// Milliseconds, 0 to 999.
    pub subsec_millis: u16,
}

impl CivilTime {
    /// `2020:07:22 10:15:30`
    pub fn exif_datetime(&self) -> String {
        self.datetime_local.format(EXIF_DATETIME_FORMAT).to_string()
    }

    /// `+06:30`, the layout of the `OffsetTime*` tags. Seconds are not representable.
    pub fn offset_label(&self) -> String {
        let total = self.offset.local_minus_utc();
        let sign = if total < 0 { '-' } else { '+' };
        let minutes = total.unsigned_abs() / 60;
        format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
    }

    /// Zero-padded to three digits so `7` reads back as 0.007 s.
    pub fn subsec_label(&self) -> String {
        format!("{:03}", self.subsec_millis)
    }

    /// Local time with its offset appended, as used for `FileModifyDate`.
    pub fn exif_datetime_with_offset(&self) -> String {
        format!("{}{}", self.exif_datetime(), self.offset_label())
    }
}

/// The UTC instant behind a [`CivilTime`], used for the satellite time tags.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UtcStamp {
    pub datetime_utc: DateTime<Utc>,
}

impl UtcStamp {
    /// `GPSDateStamp` value, `YYYY:MM:DD`.
    pub fn gps_date_stamp(&self) -> String {
        self.datetime_utc.format(GPS_DATE_FORMAT).to_string()
    }

    /// `GPSTimeStamp` value, `HH:MM:SS`.
    pub fn gps_time_stamp(&self) -> String {
        self.datetime_utc.format(GPS_TIME_FORMAT).to_string()
    }
}
