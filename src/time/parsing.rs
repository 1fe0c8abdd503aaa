//! Parsing of the user-supplied civil time, UTC offset and sub-second strings into chrono types.

use super::error::TimeError;
use chrono::{FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

const MAX_OFFSET_HOURS: i32 = 14;

static RE_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{1,2}):?(\d{2})$").expect("static offset pattern"));

/// Parses a naive civil date-time in Exif layout (`YYYY:MM:DD HH:MM:SS`), also accepting
/// the dashed and ISO `T` variants.
pub fn parse_civil_datetime(s: &str) -> Result<NaiveDateTime, TimeError> {
    let formats = ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    let trimmed = s.trim();

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| TimeError::InvalidDateTime(s.to_string()))
}

/// Parses an offset string like "+06:30", "-0500" or "Z" into seconds east of UTC.
///
/// The minutes carry the sign of the hours, so "-05:30" is -19800.
pub fn parse_offset_seconds(offset_str: &str) -> Option<i32> {
    if offset_str == "Z" {
        return Some(0);
    }
    let caps = RE_OFFSET.captures(offset_str)?;
    let sign = if &caps[1] == "-" { -1 } else { 1 };
    let hours = caps[2].parse::<i32>().ok()?;
    let minutes = caps[3].parse::<i32>().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Resolves an offset that is either a literal (`+06:30`, `Z`) or an IANA zone name.
///
/// Zone names are evaluated at `datetime_local`, so DST is honored. For a local time that
/// occurs twice the earlier offset wins; a local time skipped by a DST gap is rejected, and
/// so is a local mean time offset with a seconds part.
pub fn parse_offset(
    offset_str: &str,
    datetime_local: &NaiveDateTime,
) -> Result<FixedOffset, TimeError> {
    let trimmed = offset_str.trim();
    if let Some(secs) = parse_offset_seconds(trimmed) {
        return FixedOffset::east_opt(secs)
            .ok_or_else(|| TimeError::InvalidOffset(offset_str.to_string()));
    }

    let tz = Tz::from_str(trimmed).map_err(|_| TimeError::InvalidOffset(offset_str.to_string()))?;
    match tz.from_local_datetime(datetime_local) {
        LocalResult::Single(zoned) | LocalResult::Ambiguous(zoned, _) => {
            let offset = zoned.offset().fix();
            if offset.local_minus_utc() % 60 != 0 {
                return Err(TimeError::SubMinuteOffset {
                    time: datetime_local.to_string(),
                    zone: tz.name().to_string(),
                });
            }
            Ok(offset)
        }
        LocalResult::None => Err(TimeError::NonexistentLocalTime {
            time: datetime_local.to_string(),
            zone: tz.name().to_string(),
        }),
    }
}

/// Parses the sub-second field: one to three digits, read as milliseconds.
pub fn parse_subsec(s: &str) -> Result<u16, TimeError> {
    let trimmed = s.trim();
    let well_formed =
        !trimmed.is_empty() && trimmed.len() <= 3 && trimmed.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(TimeError::InvalidSubsec(s.to_string()));
    }
    trimmed
        .parse::<u16>()
        .map_err(|_| TimeError::InvalidSubsec(s.to_string()))
}
