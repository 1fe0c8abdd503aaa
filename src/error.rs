use thiserror::Error;

/// The primary error type for the exif_forge crate.
///
/// Only run-level failures surface here; per-image problems end up in the
/// [`BatchReport`](crate::structs::BatchReport) instead.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("External tool failed: {0}")]
    Tool(#[from] crate::tools::error::ToolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Shared configuration ---
    #[error("Capture time rejected: {0}")]
    Time(#[from] crate::time::error::TimeError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // --- Plumbing ---
    #[error("Could not serialize the batch report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker pool could not be started: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
