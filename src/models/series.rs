use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::utils::constants::{MISSING_SENTINEL, SENTINEL_SPELLINGS};

/// Normalize a raw value to the canonical missing marker.
///
/// The historical archives use several decimal spellings of the sentinel
/// (-99, -99.0, -99.9); NaN and infinite values are also folded into it.
pub fn normalize_value(raw: f64) -> f64 {
    if !raw.is_finite() {
        return MISSING_SENTINEL;
    }
    for spelling in SENTINEL_SPELLINGS {
        if raw == spelling {
            return MISSING_SENTINEL;
        }
    }
    raw
}

/// True if a value is the canonical missing marker.
pub fn is_missing(value: f64) -> bool {
    value == MISSING_SENTINEL
}

/// A named daily time series: date-ordered values with an explicit missing
/// marker. The sentinel is distinct from an absent date row, and dates need
/// not be contiguous.
///
/// Detectors only read a series; all mutation during review goes through the
/// correction engine, which clones and returns owned copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Value at a date, if a row exists (may be the missing sentinel).
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Value at a date, treating an absent row as missing.
    pub fn value_or_missing(&self, date: NaiveDate) -> f64 {
        self.get(date).unwrap_or(MISSING_SENTINEL)
    }

    /// True if the date has a non-missing observation.
    pub fn is_valid_at(&self, date: NaiveDate) -> bool {
        matches!(self.get(date), Some(v) if !is_missing(v))
    }

    /// Insert or overwrite the value at a date. Creates the row if absent;
    /// date ordering is maintained by the map.
    pub fn set(&mut self, date: NaiveDate, value: f64) {
        self.values.insert(date, normalize_value(value));
    }

    /// Ensure a row exists for the date, creating a missing-valued one if not.
    pub fn ensure_row(&mut self, date: NaiveDate) {
        self.values.entry(date).or_insert(MISSING_SENTINEL);
    }

    /// Ordered (date, value) iteration.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values.iter().map(|(d, v)| (*d, *v))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.values.keys().copied()
    }

    /// All non-missing values in date order, e.g. as a bounds sample.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values
            .values()
            .copied()
            .filter(|v| !is_missing(*v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows within `window` days of `center`, inclusive, in date order.
    pub fn window(&self, center: NaiveDate, window: i64) -> Vec<(NaiveDate, f64)> {
        let lo = center - chrono::Duration::days(window);
        let hi = center + chrono::Duration::days(window);
        self.values
            .range(lo..=hi)
            .map(|(d, v)| (*d, *v))
            .collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for DailySeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, f64)>>(iter: T) -> Self {
        let mut series = Self::new();
        for (date, value) in iter {
            series.set(date, value);
        }
        series
    }
}
