use std::path::Path;

use crate::utils::constants::{SUFFIX_FINALIZED, SUFFIX_IN_PROGRESS, SUFFIX_ORIGINAL};

/// Parsed components of a series file name: `{var}_{period}_{STATION}_{suffix}.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFileName {
    pub variable: String,
    pub period: String,
    pub station: String,
    pub suffix: Option<String>,
}

/// Build a series file name: `{var}_{period}_{STATION}_{suffix}.csv`.
///
/// The finalized suffix is upper-cased (`QC`) for compatibility with
/// previously-produced files; station codes are always upper-cased.
pub fn build_filename(variable: &str, period: &str, station: &str, suffix: &str) -> String {
    let suffix = if suffix.eq_ignore_ascii_case("qc") {
        SUFFIX_FINALIZED.to_string()
    } else {
        suffix.to_lowercase()
    };
    format!(
        "{}_{}_{}_{}.csv",
        variable.to_lowercase(),
        period,
        station.to_uppercase(),
        suffix
    )
}

/// Parse a series file name into components.
///
/// Accepts names with or without a provenance suffix; returns `None` when the
/// name does not have at least `var_period_station` parts.
pub fn parse_filename(path: &Path) -> Option<SeriesFileName> {
    let stem = path.file_name()?.to_str()?.strip_suffix(".csv")?;
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 3 {
        return None;
    }

    let (suffix, station_end) = match parts.last() {
        Some(last) if is_known_suffix(last) => (Some(last.to_lowercase()), parts.len() - 1),
        _ => (None, parts.len()),
    };
    if station_end < 3 {
        return None;
    }

    Some(SeriesFileName {
        variable: parts[0].to_lowercase(),
        // Periods may themselves contain underscores (e.g. 1990_2000)
        period: parts[1..station_end - 1].join("_"),
        station: parts[station_end - 1].to_uppercase(),
        suffix,
    })
}

fn is_known_suffix(s: &str) -> bool {
    s.eq_ignore_ascii_case(SUFFIX_ORIGINAL)
        || s.eq_ignore_ascii_case(SUFFIX_IN_PROGRESS)
        || s.eq_ignore_ascii_case(SUFFIX_FINALIZED)
}
