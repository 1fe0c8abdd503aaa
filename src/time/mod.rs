//! Module for turning the configured civil capture time into Exif and satellite time fields.
pub mod error;
mod logic;
mod parsing;
pub mod structs;
pub use logic::{civil_to_utc, resolve_civil_time, to_utc};
pub use parsing::{parse_civil_datetime, parse_offset, parse_offset_seconds, parse_subsec};
