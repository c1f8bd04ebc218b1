use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::io::snapshot::read_series;
use crate::models::series::DailySeries;
use crate::models::triplet::{StationTriplet, Variable};
use crate::utils::constants::{SUFFIX_FINALIZED, SUFFIX_IN_PROGRESS, SUFFIX_ORIGINAL};
use crate::utils::filename::{build_filename, parse_filename};

/// Where a resolved series came from, in decreasing order of authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A finalized `QC` snapshot in the output directory.
    Finalized,
    /// An in-progress `tmp` snapshot from an interrupted session.
    InProgress,
    /// The untouched `org` input file.
    Original,
    NotFound,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provenance::Finalized => "finalized",
            Provenance::InProgress => "in-progress",
            Provenance::Original => "original",
            Provenance::NotFound => "not found",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSeries {
    pub series: Option<DailySeries>,
    pub provenance: Provenance,
    pub path: Option<PathBuf>,
    pub period: Option<String>,
}

impl ResolvedSeries {
    fn not_found() -> Self {
        Self {
            series: None,
            provenance: Provenance::NotFound,
            path: None,
            period: None,
        }
    }
}

/// Resolves the most advanced available state of a station's series.
pub trait SeriesResolver {
    fn resolve(&self, variable: Variable, period: &str, station: &str) -> Result<ResolvedSeries>;
}

/// Filesystem resolver over the `org` input directory and the snapshot
/// output directory.
///
/// Thermal variables are looked up in priority order: finalized `QC`
/// snapshot (any period), in-progress `tmp` snapshot (any period), exact
/// `org` file for the requested period, then any `org` file for the
/// station as a flexible fallback. Precipitation is reference-only and
/// loads solely from `org` files.
#[derive(Debug, Clone)]
pub struct CsvSeriesResolver {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl CsvSeriesResolver {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Legacy files name the mean series `ts`; accept both spellings.
    fn name_matches(parsed: &str, variable: Variable) -> bool {
        parsed.eq_ignore_ascii_case(variable.as_str())
            || (variable == Variable::Tmean && parsed.eq_ignore_ascii_case("ts"))
    }

    /// First file in `dir` matching variable, station, and suffix, in
    /// lexicographic order so repeated runs pick the same file.
    fn scan_dir(
        dir: &Path,
        variable: Variable,
        station: &str,
        suffix: &str,
    ) -> Option<PathBuf> {
        let entries = fs::read_dir(dir).ok()?;
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                parse_filename(p).is_some_and(|f| {
                    Self::name_matches(&f.variable, variable)
                        && f.station.eq_ignore_ascii_case(station)
                        && f.suffix
                            .as_deref()
                            .map_or(false, |s| s.eq_ignore_ascii_case(suffix))
                })
            })
            .collect();
        matches.sort();
        matches.into_iter().next()
    }

    fn exact_original(&self, variable: Variable, period: &str, station: &str) -> Option<PathBuf> {
        let names = if variable == Variable::Tmean {
            vec![variable.as_str(), "ts"]
        } else {
            vec![variable.as_str()]
        };
        names
            .into_iter()
            .map(|name| {
                self.input_dir
                    .join(build_filename(name, period, station, SUFFIX_ORIGINAL))
            })
            .find(|p| p.exists())
    }

    fn load(path: PathBuf, provenance: Provenance) -> Result<ResolvedSeries> {
        let series = read_series(&path)?;
        let period = parse_filename(&path).map(|f| f.period);
        debug!(path = %path.display(), %provenance, "series resolved");
        Ok(ResolvedSeries {
            series: Some(series),
            provenance,
            path: Some(path),
            period,
        })
    }

    /// Resolve all four variables and assemble them into a triplet,
    /// alongside the per-variable provenance metadata.
    pub fn load_triplet(
        &self,
        period: &str,
        station: &str,
    ) -> Result<(StationTriplet, HashMap<Variable, ResolvedSeries>)> {
        let mut triplet = StationTriplet::new(station);
        let mut sources = HashMap::new();

        for variable in [Variable::Tmin, Variable::Tmean, Variable::Tmax, Variable::Pr] {
            let mut resolved = self.resolve(variable, period, station)?;
            if let Some(series) = resolved.series.take() {
                triplet.set(variable, series);
            }
            sources.insert(variable, resolved);
        }
        Ok((triplet, sources))
    }
}

impl SeriesResolver for CsvSeriesResolver {
    fn resolve(&self, variable: Variable, period: &str, station: &str) -> Result<ResolvedSeries> {
        if variable.is_thermal() {
            if let Some(path) =
                Self::scan_dir(&self.output_dir, variable, station, SUFFIX_FINALIZED)
            {
                return Self::load(path, Provenance::Finalized);
            }
            if let Some(path) =
                Self::scan_dir(&self.output_dir, variable, station, SUFFIX_IN_PROGRESS)
            {
                info!(%variable, station, "resuming from in-progress snapshot");
                return Self::load(path, Provenance::InProgress);
            }
        }

        if let Some(path) = self.exact_original(variable, period, station) {
            return Self::load(path, Provenance::Original);
        }
        if let Some(path) = Self::scan_dir(&self.input_dir, variable, station, SUFFIX_ORIGINAL) {
            info!(
                %variable,
                station,
                requested_period = period,
                path = %path.display(),
                "period fallback: using closest original file"
            );
            return Self::load(path, Provenance::Original);
        }

        debug!(%variable, station, "no source file found");
        Ok(ResolvedSeries::not_found())
    }
}
