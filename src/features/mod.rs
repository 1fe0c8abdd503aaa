//! The synthesis core: canvas fitting, coordinate fuzzing, location tables and tag plans.
pub mod aspect_fit;
pub mod error;
pub mod gps;
pub mod location;
pub mod metadata_plan;
