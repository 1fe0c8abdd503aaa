//! Conversion of the run-wide civil capture time to UTC.

use super::error::TimeError;
use super::parsing::{parse_civil_datetime, parse_offset, parse_subsec};
use super::structs::{CivilTime, UtcStamp};
use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Parses and validates the three time options of a run into a [`CivilTime`].
pub fn resolve_civil_time(
    datetime: &str,
    offset: &str,
    subsec: &str,
) -> Result<CivilTime, TimeError> {
    let datetime_local = parse_civil_datetime(datetime)?;
    let offset = parse_offset(offset, &datetime_local)?;
    let subsec_millis = parse_subsec(subsec)?;
    Ok(CivilTime {
        datetime_local,
        offset,
        subsec_millis,
    })
}

/// Converts a wall-clock time observed at `offset` to UTC: `UTC = local - offset`.
///
/// A positive offset moves the instant back, a negative one forward, and date
/// boundaries roll over in both directions.
pub fn to_utc(datetime_local: &NaiveDateTime, offset: &FixedOffset) -> Result<UtcStamp, TimeError> {
    offset
        .from_local_datetime(datetime_local)
        .single()
        .map(|dt| UtcStamp {
            datetime_utc: dt.with_timezone(&Utc),
        })
        .ok_or_else(|| TimeError::OutOfRange(datetime_local.to_string()))
}

/// Shorthand for [`to_utc`] on a resolved [`CivilTime`].
pub fn civil_to_utc(civil: &CivilTime) -> Result<UtcStamp, TimeError> {
    to_utc(&civil.datetime_local, &civil.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamps(datetime: &str, offset: &str) -> (String, String) {
        let civil = resolve_civil_time(datetime, offset, "0").unwrap();
        let utc = civil_to_utc(&civil).unwrap();
        (utc.gps_date_stamp(), utc.gps_time_stamp())
    }

    #[test]
    fn test_positive_offset_is_subtracted() {
        assert_eq!(
            stamps("2020:07:22 10:15:30", "+06:30"),
            ("2020:07:22".to_string(), "03:45:30".to_string())
        );
    }

    #[test]
    fn test_negative_offset_is_added() {
        assert_eq!(
            stamps("2020:07:22 10:15:30", "-05:00"),
            ("2020:07:22".to_string(), "15:15:30".to_string())
        );
    }

    #[test]
    fn test_rolls_back_to_previous_day() {
        let (date, time) = stamps("2020:01:01 02:00:00", "+05:00");
        assert_eq!(date, "2019:12:31", "year boundary must roll back");
        assert_eq!(time, "21:00:00");
    }

    #[test]
    fn test_rolls_forward_to_next_day() {
        let (date, time) = stamps("2020:02:28 22:30:00", "-03:00");
        assert_eq!(date, "2020:02:29", "leap day follows Feb 28 in 2020");
        assert_eq!(time, "01:30:00");
    }

    #[test]
    fn test_zero_offset_is_identity() {
        assert_eq!(
            stamps("2021:12:31 23:59:59", "Z"),
            ("2021:12:31".to_string(), "23:59:59".to_string())
        );
    }

    #[test]
    fn test_resolve_civil_time_fields() {
        let civil = resolve_civil_time("2020:07:22 10:15:30", "+06:30", "7").unwrap();
        assert_eq!(civil.exif_datetime(), "2020:07:22 10:15:30");
        assert_eq!(civil.offset_label(), "+06:30");
        assert_eq!(civil.subsec_label(), "007");
        assert_eq!(civil.exif_datetime_with_offset(), "2020:07:22 10:15:30+06:30");
    }

    #[test]
    fn test_resolve_civil_time_reports_first_bad_field() {
        assert!(matches!(
            resolve_civil_time("2020:07:22 25:00:00", "+06:30", "0"),
            Err(TimeError::InvalidDateTime(_))
        ));
        assert!(matches!(
            resolve_civil_time("2020:07:22 10:15:30", "+0630x", "0"),
            Err(TimeError::InvalidOffset(_))
        ));
        assert!(matches!(
            resolve_civil_time("2020:07:22 10:15:30", "+06:30", "1234"),
            Err(TimeError::InvalidSubsec(_))
        ));
    }
}
