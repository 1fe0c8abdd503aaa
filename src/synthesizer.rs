use crate::ForgeError;
use crate::config::SynthesisConfig;
use crate::features::aspect_fit::{ImageDimensions, ResizePlan, plan_resize};
use crate::features::error::ImageError;
use crate::features::gps::fuzz_coordinate;
use crate::features::location::LocationSource;
use crate::features::metadata_plan::{MetadataPlan, build_metadata_plan};
use crate::structs::{BatchReport, ImageOutcome, ImageReport, SkipReason};
use crate::time::civil_to_utc;
use crate::time::structs::{CivilTime, UtcStamp};
use crate::tools::error::ToolError;
use crate::tools::{
    ExifToolBackend, ImageCrateResampler, ImageProber, ImageResampler, PostProcess, TagWriter,
};
use crate::utils::unique_output_path;
use bon::bon;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Independent random streams per image, so that adding a location table does not
/// shift the fuzz offsets of a seeded run.
#[derive(Debug, Clone, Copy)]
enum RngStream {
    Location = 0,
    Fuzz = 1,
}

/// An image that was probed and planned, waiting for its pixels.
#[derive(Debug)]
struct StagedImage {
    index: usize,
    output: PathBuf,
    resize: ResizePlan,
    plan: MetadataPlan,
}

/// Drives a batch: probe, plan, resample, tag.
///
/// The shared configuration is resolved once at construction. A bad capture time
/// aborts there, before any file is touched; everything that goes wrong with a
/// single image afterwards only skips that image.
pub struct ProvenanceSynthesizer<T, R> {
    config: SynthesisConfig,
    civil: CivilTime,
    utc: UtcStamp,
    location: LocationSource,
    tools: T,
    resampler: R,
}

#[bon]
impl ProvenanceSynthesizer<ExifToolBackend, ImageCrateResampler> {
    /// Builds a synthesizer backed by exiftool and the `image` crate.
    ///
    /// # Builder Arguments
    ///
    /// * `config: SynthesisConfig` - (Default: [`SynthesisConfig::default`]) Run-wide settings.
    /// * `exiftool_path: Option<PathBuf>` - A specific `exiftool` executable. If `None`, `exiftool` is searched for in the system's PATH.
    ///
    /// # Errors
    ///
    /// * The configuration is invalid or its capture time does not resolve.
    /// * The `exiftool` executable cannot be found or fails to start.
    ///
    /// ```rust,no_run
    /// # use exif_forge::{ProvenanceSynthesizer, SynthesisConfig, ForgeError};
    /// # fn main() -> Result<(), ForgeError> {
    /// let mut synthesizer = ProvenanceSynthesizer::builder()
    ///     .config(SynthesisConfig::builder().seed(7).build())
    ///     .build()?;
    /// let report = synthesizer.synthesize_batch(&["photo.png".into()])?;
    /// println!("{} written", report.written_count());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        #[builder(default)] config: SynthesisConfig,
        exiftool_path: Option<PathBuf>,
    ) -> Result<Self, ForgeError> {
        let tools = ExifToolBackend::new(exiftool_path.as_deref())?;
        let resampler = ImageCrateResampler::with_quality(config.jpeg_quality);
        Self::with_tools(config, tools, resampler)
    }
}

impl<T, R> ProvenanceSynthesizer<T, R>
where
    T: ImageProber + TagWriter,
    R: ImageResampler,
{
    pub fn with_tools(config: SynthesisConfig, tools: T, resampler: R) -> Result<Self, ForgeError> {
        config.validate()?;
        let civil = config.civil_time()?;
        let utc = civil_to_utc(&civil)?;
        info!(
            "Capture time {} {} is {} {} UTC",
            civil.exif_datetime(),
            civil.offset_label(),
            utc.gps_date_stamp(),
            utc.gps_time_stamp()
        );
        let location = config.location_source();

        Ok(Self {
            config,
            civil,
            utc,
            location,
            tools,
            resampler,
        })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn civil_time(&self) -> &CivilTime {
        &self.civil
    }

    pub fn utc(&self) -> &UtcStamp {
        &self.utc
    }

    pub fn location(&self) -> &LocationSource {
        &self.location
    }

    fn image_rng(&self, index: usize, stream: RngStream) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ (((index as u64) << 1) | stream as u64)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Decides canvas and tags for the `index`-th image of a batch. Touches no files.
    pub fn plan_image(&self, index: usize, source: &Path, dims: ImageDimensions) -> (ResizePlan, MetadataPlan) {
        let config = &self.config;
        let resize = plan_resize(
            dims,
            config.fit_mode,
            config.landscape,
            config.portrait,
            config.auto_threshold,
        );

        let fuzzed = match self.location.resolve(&mut self.image_rng(index, RngStream::Location)) {
            Ok(origin) => Some(fuzz_coordinate(
                &origin,
                config.radius_meters,
                &mut self.image_rng(index, RngStream::Fuzz),
            )),
            Err(e) => {
                debug!("{}: no location ({e}), GPS tags omitted", source.display());
                None
            }
        };

        let plan = build_metadata_plan(&resize, fuzzed.as_ref(), &self.utc, &self.civil);
        debug!(
            "{}: {}x{} -> {}x{} ({:?}), {} tags",
            source.display(),
            dims.width,
            dims.height,
            resize.target_width,
            resize.target_height,
            resize.mode,
            plan.len()
        );
        (resize, plan)
    }

    /// Processes `inputs` and reports on each of them, in input order.
    ///
    /// Probing and tagging run one image at a time through the tools; resampling is
    /// spread over a thread pool of `config.jobs` threads.
    ///
    /// # Errors
    ///
    /// Only run-level failures: the output directory cannot be created or the thread
    /// pool cannot be started. Per-image failures are reported as skipped.
    pub fn synthesize_batch(&mut self, inputs: &[PathBuf]) -> Result<BatchReport, ForgeError> {
        info!("Synthesizing provenance for {} images", inputs.len());
        let mut outcomes: Vec<Option<ImageOutcome>> = vec![None; inputs.len()];

        let staged = self.probe_and_plan(inputs, &mut outcomes);

        if self.config.dry_run {
            for image in staged {
                outcomes[image.index] = Some(ImageOutcome::Planned {
                    output: image.output,
                    resize: image.resize,
                    plan: image.plan,
                });
            }
        } else if !staged.is_empty() {
            fs::create_dir_all(&self.config.output_dir)?;
            for (image, resampled) in self.resample_all(inputs, staged)? {
                let source = &inputs[image.index];
                let outcome = match resampled.map_err(ToolError::from) {
                    Ok(thumbnail) => self.tag_image(source, image, thumbnail),
                    Err(e) => {
                        error!("{}: resampling failed: {e}", source.display());
                        remove_partial(&image.output);
                        ImageOutcome::Skipped {
                            reason: SkipReason::from(&e),
                        }
                    }
                };
                outcomes[image.index] = Some(outcome);
            }
        }

        let report = BatchReport {
            images: inputs
                .iter()
                .zip(outcomes)
                .map(|(source, outcome)| ImageReport {
                    source: source.clone(),
                    outcome: outcome.unwrap_or_else(|| ImageOutcome::Skipped {
                        reason: SkipReason::ExternalTool("image was not processed".to_string()),
                    }),
                })
                .collect(),
        };
        info!(
            "Batch finished: {} written, {} planned, {} skipped",
            report.written_count(),
            report.planned_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    fn probe_and_plan(
        &mut self,
        inputs: &[PathBuf],
        outcomes: &mut [Option<ImageOutcome>],
    ) -> Vec<StagedImage> {
        let mut taken = HashSet::new();
        let mut staged = Vec::with_capacity(inputs.len());
        for (index, source) in inputs.iter().enumerate() {
            let dims = match self.tools.probe(source) {
                Ok(dims) => dims,
                Err(e) => {
                    warn!("{}: skipped: {e}", source.display());
                    outcomes[index] = Some(ImageOutcome::Skipped {
                        reason: SkipReason::from(&e),
                    });
                    continue;
                }
            };
            let (resize, plan) = self.plan_image(index, source, dims);
            let output = unique_output_path(&self.config.output_dir, source, &mut taken);
            staged.push(StagedImage {
                index,
                output,
                resize,
                plan,
            });
        }
        staged
    }

    /// Writes every output canvas (and its thumbnail) in parallel. Results keep the
    /// order of `staged`.
    fn resample_all(
        &self,
        inputs: &[PathBuf],
        staged: Vec<StagedImage>,
    ) -> Result<Vec<(StagedImage, Result<Option<PathBuf>, ImageError>)>, ForgeError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.unwrap_or(0))
            .build()?;
        let resampler = &self.resampler;
        let embed_thumbnail = self.config.embed_thumbnail;

        Ok(pool.install(|| {
            staged
                .into_par_iter()
                .map(|image| {
                    let result = resample_one(resampler, &inputs[image.index], &image, embed_thumbnail);
                    (image, result)
                })
                .collect()
        }))
    }

    fn tag_image(&mut self, source: &Path, image: StagedImage, thumbnail: Option<PathBuf>) -> ImageOutcome {
        if let Err(e) = self.tools.write(&image.output, &image.plan) {
            error!("{}: writing tags failed: {e}", source.display());
            remove_partial(&image.output);
            if let Some(thumbnail) = &thumbnail {
                remove_partial(thumbnail);
            }
            return ImageOutcome::Skipped {
                reason: SkipReason::from(&e),
            };
        }

        let post = PostProcess {
            thumbnail: thumbnail.clone(),
            file_modify_date: self
                .config
                .sync_file_date
                .then(|| self.civil.exif_datetime_with_offset()),
        };
        if let Err(e) = self.tools.finalize(&image.output, &post) {
            warn!("{}: post-processing failed, keeping the tagged file: {e}", image.output.display());
        }
        if let Some(thumbnail) = &thumbnail {
            remove_partial(thumbnail);
        }

        info!("{} -> {}", source.display(), image.output.display());
        ImageOutcome::Written {
            output: image.output,
            resize: image.resize,
            plan: image.plan,
        }
    }
}

fn resample_one<R: ImageResampler>(
    resampler: &R,
    source: &Path,
    image: &StagedImage,
    embed_thumbnail: bool,
) -> Result<Option<PathBuf>, ImageError> {
    resampler.resample(source, &image.output, &image.resize)?;
    if !embed_thumbnail {
        return Ok(None);
    }
    let thumbnail = image.output.with_extension("thumb.jpg");
    match resampler.render_thumbnail(&image.output, &thumbnail) {
        Ok(()) => Ok(Some(thumbnail)),
        Err(e) => {
            warn!("{}: no thumbnail: {e}", image.output.display());
            Ok(None)
        }
    }
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {e}", path.display()),
    }
}
