use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use exif_forge::config::{
    DEFAULT_CIVIL_DATETIME, DEFAULT_FIXED_ORIGIN, DEFAULT_JPEG_QUALITY, DEFAULT_LANDSCAPE,
    DEFAULT_PORTRAIT, DEFAULT_RADIUS_METERS, DEFAULT_SUBSEC, DEFAULT_UTC_OFFSET,
};
use exif_forge::features::aspect_fit::{CanvasSize, DEFAULT_AUTO_THRESHOLD, FitMode};
use exif_forge::features::gps::GeoCoordinate;
use exif_forge::utils::collect_inputs;
use exif_forge::{ProvenanceSynthesizer, SynthesisConfig};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Resample a batch of photos to one camera's canvas and give them a consistent
/// capture time, location and camera description.
#[derive(Parser, Debug)]
#[command(name = "exif_forge", version, about)]
struct Cli {
    /// Image files or directories (searched recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Increase verbosity (-v=DEBUG, -vv=TRACE); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for the written JPEGs
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Wall-clock capture time, YYYY:MM:DD HH:MM:SS
    #[arg(long, default_value = DEFAULT_CIVIL_DATETIME)]
    datetime: String,

    /// UTC offset of the capture time: +HH:MM, +HHMM, Z or an IANA zone such as Asia/Yangon
    #[arg(long, default_value = DEFAULT_UTC_OFFSET, allow_hyphen_values = true)]
    offset: String,

    /// Sub-second part of the capture time in milliseconds
    #[arg(long, default_value = DEFAULT_SUBSEC)]
    subsec: String,

    /// CSV of candidate origins: latitude,longitude,elevation[,...] with a header row
    #[arg(short, long)]
    locations: Option<PathBuf>,

    /// Always use the fixed origin, even when a location table is given
    #[arg(long, visible_alias = "mr-peterman")]
    fixed_origin: bool,

    /// The fixed origin as LAT,LON,ELEVATION
    #[arg(long, value_parser = parse_origin, allow_hyphen_values = true,
          default_value_t = OriginArg(DEFAULT_FIXED_ORIGIN))]
    origin: OriginArg,

    /// Maximum displacement from the origin per axis, in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
    radius: f64,

    #[arg(long, value_enum, default_value_t = FitMode::Auto)]
    fit: FitMode,

    /// Scale instead of crop when the aspect ratios differ by at most this much
    #[arg(long, default_value_t = DEFAULT_AUTO_THRESHOLD)]
    threshold: f64,

    #[arg(long, default_value_t = DEFAULT_LANDSCAPE)]
    landscape: CanvasSize,

    #[arg(long, default_value_t = DEFAULT_PORTRAIT)]
    portrait: CanvasSize,

    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Do not embed a thumbnail
    #[arg(long)]
    no_thumbnail: bool,

    /// Leave the file modification date alone
    #[arg(long)]
    keep_file_date: bool,

    /// Base seed for reproducible locations
    #[arg(long)]
    seed: Option<u64>,

    /// Resampling threads (default: CPU count)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Include hidden files and directories when walking inputs
    #[arg(long)]
    hidden: bool,

    /// Print the plans as JSON without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Also write the batch report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Path to a specific exiftool executable
    #[arg(long)]
    exiftool: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct OriginArg(GeoCoordinate);

impl std::fmt::Display for OriginArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.0.latitude, self.0.longitude, self.0.altitude_meters)
    }
}

fn parse_origin(s: &str) -> Result<OriginArg, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid origin '{s}': {e}"))?;
    match parts.as_slice() {
        [latitude, longitude] => Ok(OriginArg(GeoCoordinate::new(*latitude, *longitude, 0.0))),
        [latitude, longitude, elevation] => {
            Ok(OriginArg(GeoCoordinate::new(*latitude, *longitude, *elevation)))
        }
        _ => Err(format!("expected LAT,LON[,ELEVATION], got '{s}'")),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SynthesisConfig::builder()
        .landscape(cli.landscape)
        .portrait(cli.portrait)
        .auto_threshold(cli.threshold)
        .fit_mode(cli.fit)
        .civil_datetime(cli.datetime)
        .utc_offset(cli.offset)
        .subsec(cli.subsec)
        .radius_meters(cli.radius)
        .fixed_origin(cli.origin.0)
        .maybe_location_table(cli.locations)
        .force_fixed_origin(cli.fixed_origin)
        .output_dir(cli.output_dir)
        .jpeg_quality(cli.quality)
        .embed_thumbnail(!cli.no_thumbnail)
        .sync_file_date(!cli.keep_file_date)
        .maybe_seed(cli.seed)
        .maybe_jobs(cli.jobs)
        .dry_run(cli.dry_run)
        .build();

    let inputs = collect_inputs(&cli.inputs, cli.hidden).wrap_err("Could not list the inputs")?;
    if inputs.is_empty() {
        return Err(eyre!("No images found in {:?}", cli.inputs));
    }
    info!("Found {} input files", inputs.len());

    let mut synthesizer = ProvenanceSynthesizer::builder()
        .config(config)
        .maybe_exiftool_path(cli.exiftool)
        .build()?;
    let report = synthesizer.synthesize_batch(&inputs)?;

    let json = report.to_json_pretty()?;
    if cli.dry_run {
        println!("{json}");
    }
    if let Some(path) = &cli.report {
        fs::write(path, &json).wrap_err_with(|| format!("Could not write {}", path.display()))?;
    }

    if report.written_count() + report.planned_count() == 0 {
        return Err(eyre!("None of the {} inputs could be processed", inputs.len()));
    }
    Ok(())
}
