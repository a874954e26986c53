//! Per-series CSV storage
//!
//! Every series lives in `<root>/<name>.csv` with the header
//! `Date,Race Number,Rate`. The file is rewritten in full on every save.

use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{StorageError, StorageResult};
use crate::series::{Observation, RatingSeries};

/// Column headers of a series file, in order.
pub const HEADER: [&str; 3] = ["Date", "Race Number", "Rate"];

const EXTENSION: &str = "csv";

/// Row shape accepted on load. Integer columns go through `f64` so files
/// holding integral floats such as `3.0` still load.
#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(rename = "Date")]
    date: chrono::NaiveDate,
    #[serde(rename = "Race Number")]
    race_number: f64,
    #[serde(rename = "Rate")]
    rate: f64,
}

impl StoredRow {
    fn into_observation(self, line: usize) -> StorageResult<Observation> {
        Ok(Observation::new(
            self.date,
            coerce_integer(self.race_number, "Race Number", line)?,
            coerce_integer(self.rate, "Rate", line)?,
        ))
    }
}

fn coerce_integer(value: f64, column: &str, line: usize) -> StorageResult<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(StorageError::Malformed(format!(
            "line {}: column '{}' holds non-integer value {}",
            line, column, value
        )))
    }
}

/// Maps series names to CSV files under one root directory.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    root: PathBuf,
}

impl SeriesStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Resolve the file backing `name`.
    ///
    /// The name is used verbatim as the file stem; only names that would
    /// escape the root or cannot form a file name are refused.
    pub fn location(&self, name: &str) -> StorageResult<PathBuf> {
        let escapes_root = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if escapes_root {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", name, EXTENSION)))
    }

    /// Write a header-only file at `location` unless one already exists.
    pub fn ensure_exists(&self, location: &Path) -> StorageResult<()> {
        if location.exists() {
            return Ok(());
        }
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("Creating empty series file: {}", location.display());
        self.save(&RatingSeries::new(), location)
    }

    /// Read the whole series at `location`. An absent file is an empty series.
    pub fn load(&self, location: &Path) -> StorageResult<RatingSeries> {
        if !location.exists() {
            debug!("No series file at {}, using empty series", location.display());
            return Ok(RatingSeries::new());
        }

        let mut reader = ReaderBuilder::new().from_path(location)?;
        let mut observations = Vec::new();
        for (index, row) in reader.deserialize::<StoredRow>().enumerate() {
            // header is line 1
            observations.push(row?.into_observation(index + 2)?);
        }

        debug!(
            "Loaded {} observations from {}",
            observations.len(),
            location.display()
        );
        Ok(RatingSeries::from_observations(observations))
    }

    /// Overwrite `location` with the full series, header included.
    pub fn save(&self, series: &RatingSeries, location: &Path) -> StorageResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(location)?;
        writer.write_record(HEADER)?;
        for observation in series {
            writer.serialize(observation)?;
        }
        writer.flush()?;

        debug!(
            "Saved {} observations to {}",
            series.len(),
            location.display()
        );
        Ok(())
    }

    /// Resolve, create if needed and load the series called `name`.
    pub fn open(&self, name: &str) -> StorageResult<(PathBuf, RatingSeries)> {
        let location = self.location(name)?;
        self.ensure_exists(&location)?;
        let series = self.load(&location)?;
        Ok((location, series))
    }

    /// Names of all stored series, sorted.
    pub fn list(&self) -> StorageResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_series = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION);
            if !is_series {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
