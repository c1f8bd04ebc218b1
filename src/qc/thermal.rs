use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::inconsistency::{InconsistencyKind, ThermalInconsistency};
use crate::models::series::{is_missing, DailySeries};
use crate::utils::constants::MISSING_SENTINEL;

/// Detect dates where the triplet violates tmin < tmean < tmax or shows a
/// suspicious equality between two of the three.
///
/// The three series are outer-joined by date; a date where no series has a
/// valid value is skipped, and a date with fewer than two valid values is
/// never flagged. Output is ascending by date, which fixes the downstream
/// review order.
pub fn detect_inconsistencies(
    tmin: Option<&DailySeries>,
    tmean: Option<&DailySeries>,
    tmax: Option<&DailySeries>,
) -> Vec<ThermalInconsistency> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for series in [tmin, tmean, tmax].into_iter().flatten() {
        dates.extend(series.dates());
    }

    let mut inconsistencies = Vec::new();
    for date in dates {
        let tmin_val = value_at(tmin, date);
        let tmean_val = value_at(tmean, date);
        let tmax_val = value_at(tmax, date);

        if let Some(kind) = classify_date(tmin_val, tmean_val, tmax_val) {
            inconsistencies.push(ThermalInconsistency {
                date,
                tmin: tmin_val,
                tmean: tmean_val,
                tmax: tmax_val,
                kind,
            });
        }
    }
    inconsistencies
}

fn value_at(series: Option<&DailySeries>, date: NaiveDate) -> f64 {
    series.map_or(MISSING_SENTINEL, |s| s.value_or_missing(date))
}

/// Classify one date of the triplet. Precedence is fixed, first match wins:
/// the three equality checks come before the three order checks, so a date
/// that is simultaneously `tmax < tmin` and `tmin == tmax` classifies as
/// `TminEqualsTmax`. This ordering is a design decision, not incidental.
pub fn classify_date(tmin: f64, tmean: f64, tmax: f64) -> Option<InconsistencyKind> {
    let tmin_ok = !is_missing(tmin);
    let tmean_ok = !is_missing(tmean);
    let tmax_ok = !is_missing(tmax);

    if tmin_ok && tmax_ok && tmin == tmax {
        Some(InconsistencyKind::TminEqualsTmax)
    } else if tmean_ok && tmax_ok && tmean == tmax {
        Some(InconsistencyKind::TmeanEqualsTmax)
    } else if tmean_ok && tmin_ok && tmean == tmin {
        Some(InconsistencyKind::TmeanEqualsTmin)
    } else if tmin_ok && tmax_ok && tmax < tmin {
        Some(InconsistencyKind::TmaxBelowTmin)
    } else if tmean_ok && tmax_ok && tmean > tmax {
        Some(InconsistencyKind::TmeanAboveTmax)
    } else if tmean_ok && tmin_ok && tmean < tmin {
        Some(InconsistencyKind::TmeanBelowTmin)
    } else {
        None
    }
}
