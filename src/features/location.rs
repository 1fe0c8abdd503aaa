use super::error::LocationError;
use super::gps::GeoCoordinate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rand::Rng;
use rand::seq::IndexedRandom;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

static RE_SIGNED_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("static decimal pattern")
});

/// Candidate origins read from a CSV file with `latitude, longitude, elevation, ...` rows.
///
/// Never empty: a table without a single usable row fails to load.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTable {
    source: PathBuf,
    rows: Vec<GeoCoordinate>,
}

impl LocationTable {
    pub fn load(path: &Path) -> Result<Self, LocationError> {
        let file = File::open(path).map_err(|e| LocationError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_reader(file, path)
    }

    /// Reads a table, skipping the header row, blank rows and rows whose latitude or
    /// longitude is not a signed decimal. Extra columns are ignored.
    pub fn from_reader(reader: impl Read, source: &Path) -> Result<Self, LocationError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("{}: unreadable row skipped: {e}", source.display());
                    continue;
                }
            };
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map_or(0, csv::Position::line);
            match parse_row(&record) {
                Ok(coordinate) => rows.push(coordinate),
                Err(e) => warn!("{}:{line}: row skipped: {e}", source.display()),
            }
        }

        if rows.is_empty() {
            return Err(LocationError::NoValidRows(source.to_path_buf()));
        }
        Ok(Self {
            source: source.to_path_buf(),
            rows,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn rows(&self) -> &[GeoCoordinate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Picks a row uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&GeoCoordinate> {
        self.rows.choose(rng)
    }
}

fn parse_coordinate(raw: Option<&str>, field: &'static str) -> Result<f64, LocationError> {
    let raw = raw.unwrap_or_default();
    if !RE_SIGNED_DECIMAL.is_match(raw) {
        return Err(LocationError::InvalidCoordinate {
            field,
            value: raw.to_string(),
        });
    }
    raw.parse::<f64>()
        .map_err(|_| LocationError::InvalidCoordinate {
            field,
            value: raw.to_string(),
        })
}

/// Parses an elevation in meters.
pub fn parse_elevation(raw: &str) -> Result<f64, LocationError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LocationError::InvalidElevation(raw.to_string()))
}

/// Turns one CSV record into a coordinate. A missing or non-numeric elevation is
/// replaced by 0 m rather than rejecting the row.
pub fn parse_row(record: &StringRecord) -> Result<GeoCoordinate, LocationError> {
    let latitude = parse_coordinate(record.get(0), "latitude")?;
    let longitude = parse_coordinate(record.get(1), "longitude")?;
    let altitude_meters = parse_elevation(record.get(2).unwrap_or_default()).unwrap_or_else(|e| {
        warn!("{e}, using 0 m");
        0.0
    });
    Ok(GeoCoordinate::new(latitude, longitude, altitude_meters))
}

/// Where the origin of each image's coordinate comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// One constant origin for every image.
    Fixed(GeoCoordinate),
    /// A random row per image.
    Table(LocationTable),
    /// The table could not be used; every image goes without GPS tags.
    Unavailable(LocationError),
}

impl LocationSource {
    /// Loads a table, keeping the failure instead of returning it so the batch can still
    /// run without locations.
    pub fn from_table(path: &Path) -> Self {
        match LocationTable::load(path) {
            Ok(table) => {
                info!("Loaded {} locations from {}", table.len(), path.display());
                Self::Table(table)
            }
            Err(e) => {
                warn!("{e}; images will be written without GPS tags");
                Self::Unavailable(e)
            }
        }
    }

    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeoCoordinate, LocationError> {
        match self {
            Self::Fixed(origin) => Ok(*origin),
            Self::Table(table) => table
                .choose(rng)
                .copied()
                .ok_or_else(|| LocationError::NoValidRows(table.source().to_path_buf())),
            Self::Unavailable(e) => Err(e.clone()),
        }
    }
}
