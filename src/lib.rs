//! # Exif Forge
//!
//! Give a batch of photos one consistent, plausible provenance.
//!
//! Every image is resampled to the exact pixel canvas of a single camera model and
//! tagged with that camera's make, model and exposure settings, one shared capture
//! time, and a capture location jittered around a chosen origin.
//!
//! ## Key Features
//!
//! - **Aspect Fit**: Picks the portrait or landscape canvas and decides between padding and cropping.
//! - **Location Fuzzing**: Perturbs a fixed origin, or a row sampled from a CSV table, within a radius in meters.
//! - **Time Conversion**: Resolves a wall-clock time and UTC offset (or IANA zone) to the UTC instant for the GPS time tags.
//! - **Metadata Plans**: Composes the complete tag set per image, GPS group included only as a whole.
//! - **Batch Processing**: Probes and tags through exiftool, resamples with the `image` crate in parallel, and reports on every image.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use exif_forge::{ProvenanceSynthesizer, SynthesisConfig};
//!
//! fn main() -> color_eyre::Result<()> {
//!     let config = SynthesisConfig::builder()
//!         .civil_datetime("2020:07:22 10:15:30")
//!         .utc_offset("Asia/Yangon")
//!         .location_table("places.csv")
//!         .build();
//!
//!     let mut synthesizer = ProvenanceSynthesizer::builder().config(config).build()?;
//!     let inputs = exif_forge::utils::collect_inputs(&["photos".into()], false)?;
//!     let report = synthesizer.synthesize_batch(&inputs)?;
//!
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod features;
pub mod structs;
pub mod synthesizer;
pub mod time;
pub mod tools;
pub mod utils;

pub use config::SynthesisConfig;
pub use error::ForgeError;
pub use structs::{BatchReport, ImageOutcome, ImageReport, SkipReason};
pub use synthesizer::ProvenanceSynthesizer;
