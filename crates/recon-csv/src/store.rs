// Dweve Recon - Data Reconciliation Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! On-disk recon store.
//!
//! Layout:
//!
//! ```text
//! <outputs_dir>/<recon>/<YYYY-MM-DD-HH-MM-SS>[_N].csv   one summary per run
//! <metadata_file>                                       registry of recons
//! <pipelines_dir>/<recon>.json                          saved pipelines
//! ```

use crate::error::{CsvError, Result};
use crate::to_csv::{summary_from_reader, summary_to_writer};
use chrono::{Local, NaiveDateTime};
use recon_core::{Pipeline, ReconSummary, SUMMARY_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// File stem format of a summary file.
pub const RUN_FILE_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Header of the metadata registry.
pub const METADATA_COLUMNS: [&str; 4] =
    ["recon_name", "recon_description", "recon_value", "date_created"];

/// Store locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one sub-directory of summaries per recon (default: `outputs`).
    pub outputs_dir: PathBuf,
    /// Metadata registry CSV (default: `recon_metadata.csv`).
    pub metadata_file: PathBuf,
    /// Directory of saved pipelines (default: `pipelines`).
    pub pipelines_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from("outputs"),
            metadata_file: PathBuf::from("recon_metadata.csv"),
            pipelines_dir: PathBuf::from("pipelines"),
        }
    }
}

impl StoreConfig {
    /// All three locations under one root directory.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            outputs_dir: root.join(defaults.outputs_dir),
            metadata_file: root.join(defaults.metadata_file),
            pipelines_dir: root.join(defaults.pipelines_dir),
        }
    }
}

/// One row of the metadata registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconMetadata {
    pub recon_name: String,
    pub recon_description: String,
    /// Hours saved per quarter by automating this recon.
    pub recon_value: f64,
    pub date_created: String,
}

/// Filesystem-backed storage for recon summaries, metadata and pipelines.
#[derive(Debug, Clone, Default)]
pub struct ReconStore {
    config: StoreConfig,
}

impl ReconStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn recon_dir(&self, name: &str) -> Result<PathBuf> {
        validate_recon_name(name)?;
        Ok(self.config.outputs_dir.join(name))
    }

    /// Names of every recon with an outputs directory, sorted.
    ///
    /// A missing outputs directory means no recons.
    pub fn recon_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.config.outputs_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %self.config.outputs_dir.display(), "outputs directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create the outputs directory of a new recon.
    ///
    /// # Errors
    ///
    /// [`CsvError::ReconExists`] if a recon of that name already exists.
    pub fn create_recon(&self, name: &str) -> Result<PathBuf> {
        let dir = self.recon_dir(name)?;
        if dir.exists() {
            return Err(CsvError::ReconExists(name.to_string()));
        }
        fs::create_dir_all(&dir)?;
        info!(recon = name, dir = %dir.display(), "created recon");
        Ok(dir)
    }

    /// Persist a run summary as `<outputs>/<name>/<run time>.csv`.
    ///
    /// The file is named after the summary's date (now, for an empty summary).
    /// Existing summaries are never overwritten: a second run within the same
    /// second is written as `<run time>_1.csv`, then `_2`, and so on.
    pub fn save_summary(&self, name: &str, summary: &ReconSummary) -> Result<PathBuf> {
        let dir = self.recon_dir(name)?;
        fs::create_dir_all(&dir)?;

        let run_at = summary.date().unwrap_or_else(|| Local::now().naive_local());
        let (path, file) = create_run_file(&dir, &run_at.format(RUN_FILE_FORMAT).to_string())?;
        summary_to_writer(summary, BufWriter::new(file))?;

        info!(recon = name, path = %path.display(), rows = summary.len(), "saved recon summary");
        Ok(path)
    }

    /// Most recently created summary file of a recon, if any.
    ///
    /// Files are ranked by creation time, or modification time where the
    /// filesystem does not record creation. Ties go to the later file name.
    pub fn latest_summary_path(&self, name: &str) -> Result<Option<PathBuf>> {
        let dir = self.recon_dir(name)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let metadata = fs::metadata(&path)?;
            let stamp = metadata.created().or_else(|_| metadata.modified())?;
            let newer = match &latest {
                None => true,
                Some((best, best_path)) => (stamp, &path) > (*best, best_path),
            };
            if newer {
                latest = Some((stamp, path));
            }
        }

        debug!(recon = name, latest = ?latest.as_ref().map(|(_, p)| p), "resolved latest summary");
        Ok(latest.map(|(_, path)| path))
    }

    pub fn load_summary(&self, path: &Path) -> Result<ReconSummary> {
        let file = fs::File::open(path)?;
        summary_from_reader(file)
    }

    /// Latest summary of one recon.
    ///
    /// # Errors
    ///
    /// [`CsvError::NoSummaries`] if the recon has never been run.
    pub fn latest_summary(&self, name: &str) -> Result<ReconSummary> {
        match self.latest_summary_path(name)? {
            Some(path) => self.load_summary(&path),
            None => Err(CsvError::NoSummaries {
                name: name.to_string(),
                dir: self.recon_dir(name)?,
            }),
        }
    }

    /// Latest summary of every recon; `None` for recons that were never run.
    pub fn latest_summaries(&self) -> Result<BTreeMap<String, Option<ReconSummary>>> {
        let mut summaries = BTreeMap::new();
        for name in self.recon_names()? {
            let summary = match self.latest_summary_path(&name)? {
                Some(path) => Some(self.load_summary(&path)?),
                None => None,
            };
            summaries.insert(name, summary);
        }
        Ok(summaries)
    }

    /// Registered recons. A missing registry means none are registered.
    pub fn load_metadata(&self) -> Result<Vec<ReconMetadata>> {
        if !self.config.metadata_file.exists() {
            warn!(
                file = %self.config.metadata_file.display(),
                "metadata file does not exist, no recons registered"
            );
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.config.metadata_file)?;
        let mut records = Vec::new();
        for record in reader.deserialize::<ReconMetadata>() {
            records.push(record?);
        }
        Ok(records)
    }

    /// Add a recon to the registry. Registering an existing name is a no-op.
    ///
    /// Returns whether a row was added.
    pub fn register_recon(&self, name: &str, description: &str, value: f64) -> Result<bool> {
        validate_recon_name(name)?;
        if !value.is_finite() {
            return Err(CsvError::TypeMismatch {
                column: METADATA_COLUMNS[2].to_string(),
                expected: "finite number".to_string(),
                value: value.to_string(),
            });
        }

        let mut records = self.load_metadata()?;
        if records.iter().any(|r| r.recon_name == name) {
            debug!(recon = name, "recon already registered");
            return Ok(false);
        }

        records.push(ReconMetadata {
            recon_name: name.to_string(),
            recon_description: description.to_string(),
            recon_value: value,
            date_created: Local::now()
                .naive_local()
                .format(SUMMARY_DATE_FORMAT)
                .to_string(),
        });
        self.write_metadata(&records)?;
        info!(recon = name, value, "registered recon");
        Ok(true)
    }

    fn write_metadata(&self, records: &[ReconMetadata]) -> Result<()> {
        if let Some(parent) = self.config.metadata_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.config.metadata_file)?;
        if records.is_empty() {
            writer.write_record(METADATA_COLUMNS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Sum of every registered recon value.
    pub fn hours_saved(&self) -> Result<f64> {
        Ok(self.load_metadata()?.iter().map(|r| r.recon_value).sum())
    }

    fn pipeline_path(&self, name: &str) -> Result<PathBuf> {
        validate_recon_name(name)?;
        Ok(self.config.pipelines_dir.join(format!("{}.json", name)))
    }

    pub fn save_pipeline(&self, name: &str, pipeline: &Pipeline) -> Result<PathBuf> {
        let path = self.pipeline_path(name)?;
        fs::create_dir_all(&self.config.pipelines_dir)?;
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), pipeline)?;
        info!(recon = name, path = %path.display(), steps = pipeline.steps.len(), "saved pipeline");
        Ok(path)
    }

    /// # Errors
    ///
    /// [`CsvError::PipelineNotFound`] if no pipeline is saved under `name`.
    pub fn load_pipeline(&self, name: &str) -> Result<Pipeline> {
        let path = self.pipeline_path(name)?;
        if !path.exists() {
            return Err(CsvError::PipelineNotFound(name.to_string()));
        }
        let file = fs::File::open(&path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Delete every saved summary and recreate an empty outputs directory.
    pub fn reset(&self) -> Result<()> {
        let dir = &self.config.outputs_dir;
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;
        warn!(dir = %dir.display(), "reset outputs directory");
        Ok(())
    }
}

/// Run time encoded in a summary file name.
///
/// ```
/// use recon_csv::run_date_from_path;
///
/// let date = run_date_from_path("outputs/rent/2024-03-01-09-30-05.csv").unwrap();
/// assert_eq!(date.to_string(), "2024-03-01 09:30:05");
/// ```
pub fn run_date_from_path(path: impl AsRef<Path>) -> Result<NaiveDateTime> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stamp = match stem.rsplit_once('_') {
        Some((stamp, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => stamp,
        _ => stem,
    };
    NaiveDateTime::parse_from_str(stamp, RUN_FILE_FORMAT).map_err(|_| CsvError::InvalidTimestamp {
        value: stem.to_string(),
        format: RUN_FILE_FORMAT.to_string(),
    })
}

/// Create `<stamp>.csv` in `dir`, or the first free `<stamp>_N.csv`.
fn create_run_file(dir: &Path, stamp: &str) -> Result<(PathBuf, fs::File)> {
    let mut attempt = 0usize;
    loop {
        let file_name = if attempt == 0 {
            format!("{}.csv", stamp)
        } else {
            format!("{}_{}.csv", stamp, attempt)
        };
        let path = dir.join(file_name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

fn validate_recon_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(CsvError::InvalidReconName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_recon_name() {
        assert!(validate_recon_name("Residential").is_ok());
        assert!(validate_recon_name("Car Sales 2024").is_ok());
        for bad in ["", "  ", ".", "..", "a/b", "a\\b"] {
            assert!(validate_recon_name(bad).is_err(), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_run_date_rejects_other_names() {
        let err = run_date_from_path("outputs/rent/latest.csv").unwrap_err();
        assert!(matches!(err, CsvError::InvalidTimestamp { ref value, .. } if value == "latest"));
    }

    #[test]
    fn test_run_date_accepts_same_second_suffix() {
        let first = run_date_from_path("outputs/rent/2024-01-01-00-00-00.csv").unwrap();
        let second = run_date_from_path("outputs/rent/2024-01-01-00-00-00_1.csv").unwrap();
        assert_eq!(first, second);
        assert!(run_date_from_path("outputs/rent/2024-01-01-00-00-00_x.csv").is_err());
    }

    #[test]
    fn test_rooted_config() {
        let config = StoreConfig::rooted_at("/data");
        assert_eq!(config.outputs_dir, PathBuf::from("/data/outputs"));
        assert_eq!(config.metadata_file, PathBuf::from("/data/recon_metadata.csv"));
        assert_eq!(config.pipelines_dir, PathBuf::from("/data/pipelines"));
    }
}
