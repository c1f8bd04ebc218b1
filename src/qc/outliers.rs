use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::AuditLog;
use crate::models::series::{is_missing, DailySeries};
use crate::models::triplet::Variable;
use crate::qc::bounds::Bounds;

/// One statistical outlier candidate. Transient: produced here, consumed by
/// the correction engine within the same review pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Scan a series against percentile bounds, in ascending date order.
///
/// Degenerate bounds suppress detection entirely. Missing-valued entries are
/// never candidates, and dates with a prior "keep" decision in the audit log
/// are skipped so validated values are not re-flagged across sessions.
pub fn detect_outliers(
    series: &DailySeries,
    bounds: &Bounds,
    audit: &AuditLog,
    station: &str,
    variable: Variable,
) -> Vec<OutlierRecord> {
    if bounds.is_degenerate() {
        info!(
            station,
            variable = %variable,
            "degenerate bounds, skipping outlier detection"
        );
        return Vec::new();
    }

    let mut outliers = Vec::new();
    for (date, value) in series.iter() {
        if is_missing(value) {
            continue;
        }
        if audit.is_kept(station, date, variable) {
            debug!(station, %date, variable = %variable, "previously validated, not re-flagged");
            continue;
        }
        if value < bounds.lim_inf || value > bounds.lim_sup {
            outliers.push(OutlierRecord { date, value });
        }
    }
    outliers
}
