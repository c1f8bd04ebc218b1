use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{QcError, Result};
use crate::models::series::{is_missing, normalize_value, DailySeries};
use crate::models::triplet::{StationTriplet, Variable};
use crate::utils::constants::{
    MISSING_SENTINEL, SNAPSHOT_DATE_FORMAT, SUFFIX_FINALIZED, SUFFIX_IN_PROGRESS,
};
use crate::utils::filename::build_filename;

/// Read a snapshot file (`FECHA,<STATION>` header, compact numeric dates)
/// into a series, normalizing sentinel spellings. Rows with an unparseable
/// date are dropped with a warning; unparseable values become missing.
pub fn read_series(path: &Path) -> Result<DailySeries> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut series = DailySeries::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            return Err(QcError::InvalidFormat(format!(
                "snapshot {} needs at least two columns",
                path.display()
            )));
        }
        let date = match NaiveDate::parse_from_str(&record[0], SNAPSHOT_DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                warn!(path = %path.display(), row = &record[0], "invalid date, row dropped");
                continue;
            }
        };
        let value = record[1].parse::<f64>().unwrap_or(MISSING_SENTINEL);
        series.set(date, normalize_value(value));
    }
    Ok(series)
}

/// Write a series in the snapshot format. The missing sentinel is written
/// verbatim, never as an empty cell.
pub fn write_series(series: &DailySeries, path: &Path, station: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["FECHA", &station.to_uppercase()])?;
    for (date, value) in series.iter() {
        let formatted = if is_missing(value) {
            "-99".to_string()
        } else {
            value.to_string()
        };
        writer.write_record([date.format(SNAPSHOT_DATE_FORMAT).to_string(), formatted])?;
    }
    writer.flush()?;
    Ok(())
}

/// Durable snapshot sink the review loop hands state to: an in-progress
/// snapshot of the whole triplet after each correction, and a finalized
/// snapshot of the reviewed series at acceptance.
pub trait SnapshotSink {
    fn save_in_progress(&mut self, triplet: &StationTriplet) -> Result<()>;
    fn save_finalized(&mut self, series: &DailySeries, variable: Variable) -> Result<()>;
}

/// CSV-backed snapshot store. In-progress files carry the `tmp` suffix and
/// finalized files the `QC` suffix, each named with the real period the
/// variable was originally resolved from. Variables with no registered
/// period fall back to the session period, which covers series a
/// correction materializes mid-session.
#[derive(Debug)]
pub struct CsvSnapshotStore {
    output_dir: PathBuf,
    station: String,
    default_period: String,
    periods: HashMap<Variable, String>,
}

impl CsvSnapshotStore {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        station: impl Into<String>,
        default_period: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            station: station.into().to_uppercase(),
            default_period: default_period.into(),
            periods: HashMap::new(),
        }
    }

    /// Record the period a variable's source file carried, so snapshots are
    /// written back under the same name.
    pub fn with_period(mut self, variable: Variable, period: impl Into<String>) -> Self {
        self.periods.insert(variable, period.into());
        self
    }

    pub fn set_period(&mut self, variable: Variable, period: impl Into<String>) {
        self.periods.insert(variable, period.into());
    }

    fn snapshot_path(&self, variable: Variable, suffix: &str) -> PathBuf {
        let period = self
            .periods
            .get(&variable)
            .map(String::as_str)
            .unwrap_or(&self.default_period);
        self.output_dir
            .join(build_filename(variable.as_str(), period, &self.station, suffix))
    }
}

impl SnapshotSink for CsvSnapshotStore {
    fn save_in_progress(&mut self, triplet: &StationTriplet) -> Result<()> {
        for variable in Variable::THERMAL {
            let Some(series) = triplet.get(variable) else {
                continue;
            };
            let path = self.snapshot_path(variable, SUFFIX_IN_PROGRESS);
            write_series(series, &path, &self.station)?;
            debug!(path = %path.display(), "in-progress snapshot written");
        }
        Ok(())
    }

    fn save_finalized(&mut self, series: &DailySeries, variable: Variable) -> Result<()> {
        let path = self.snapshot_path(variable, SUFFIX_FINALIZED);
        write_series(series, &path, &self.station)?;
        debug!(path = %path.display(), "finalized snapshot written");

        // The finalized file supersedes the variable's in-progress snapshot
        let tmp_path = self.snapshot_path(variable, SUFFIX_IN_PROGRESS);
        if tmp_path.exists() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %e, "could not remove superseded snapshot");
            }
        }
        Ok(())
    }
}
