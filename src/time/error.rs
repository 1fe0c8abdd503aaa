use thiserror::Error;

/// Rejections of the run-wide capture time. Every variant is fatal for the whole batch,
/// since all images share one civil time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Invalid civil date-time '{0}', expected YYYY:MM:DD HH:MM:SS")]
    InvalidDateTime(String),

    #[error("Invalid UTC offset '{0}', expected +HH:MM, Z or an IANA zone name")]
    InvalidOffset(String),

    #[error("Local time {time} does not exist in time zone {zone}")]
    NonexistentLocalTime { time: String, zone: String },

    #[error("Time zone {zone} has a UTC offset with seconds at {time}, which Exif cannot record")]
    SubMinuteOffset { time: String, zone: String },

    #[error("Invalid sub-second value '{0}', expected 0-999")]
    InvalidSubsec(String),

    #[error("UTC conversion of {0} is out of range")]
    OutOfRange(String),
}
