use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::audit::{AuditEntry, AuditLog, EntryKind, TripletValues};
use crate::error::Result;
use crate::models::action::{CorrectionAction, ManualEdit, StatDecision};
use crate::models::series::{is_missing, DailySeries};
use crate::models::triplet::{StationTriplet, Variable};
use crate::utils::constants::MISSING_SENTINEL;

/// Applies reviewer decisions to series and journals every application.
///
/// The engine always works on owned, independent copies of the series it
/// mutates and returns the updated copies explicitly; callers decide what to
/// do with their previous state. Reapplying "keep" (or any no-op action) is
/// idempotent and still journaled, so the audit trail is complete even for
/// decisions that change nothing.
#[derive(Debug, Default)]
pub struct CorrectionEngine;

impl CorrectionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply a thermal correction at `date` and return the updated triplet.
    ///
    /// Before mutating, a row is guaranteed to exist for the date in each
    /// thermal series (created missing-valued if needed, including for a
    /// wholly absent series), so swap and reorder never fail on partially
    /// populated triplets. Unrecognized actions are deliberate no-ops.
    pub fn apply_thermal_correction(
        &self,
        action: CorrectionAction,
        date: NaiveDate,
        triplet: &StationTriplet,
        audit: &mut AuditLog,
        note: &str,
    ) -> Result<StationTriplet> {
        let mut updated = triplet.clone();

        let before = TripletValues {
            tmin: updated.tmin.as_ref().and_then(|s| s.get(date)),
            tmean: updated.tmean.as_ref().and_then(|s| s.get(date)),
            tmax: updated.tmax.as_ref().and_then(|s| s.get(date)),
        };

        // Keep and unknown actions must leave the triplet byte-for-byte
        // identical, so rows are only created for actions that may mutate.
        let mutating = !matches!(
            action,
            CorrectionAction::Keep | CorrectionAction::Unknown
        );
        if mutating {
            for series in [&mut updated.tmin, &mut updated.tmean, &mut updated.tmax] {
                series.get_or_insert_with(DailySeries::new).ensure_row(date);
            }
        }

        let cur_tmin = value(&updated, Variable::Tmin, date);
        let cur_tmean = value(&updated, Variable::Tmean, date);
        let cur_tmax = value(&updated, Variable::Tmax, date);

        match action {
            CorrectionAction::Keep | CorrectionAction::Unknown => {}
            CorrectionAction::Swap => {
                if !is_missing(cur_tmin) && !is_missing(cur_tmax) {
                    set(&mut updated, Variable::Tmin, date, cur_tmax);
                    set(&mut updated, Variable::Tmax, date, cur_tmin);
                } else {
                    debug!(%date, "swap skipped, one bound missing");
                }
            }
            CorrectionAction::BlankTmean => {
                set(&mut updated, Variable::Tmean, date, MISSING_SENTINEL);
            }
            CorrectionAction::BlankTmax => {
                set(&mut updated, Variable::Tmax, date, MISSING_SENTINEL);
            }
            CorrectionAction::BlankTmin => {
                set(&mut updated, Variable::Tmin, date, MISSING_SENTINEL);
            }
            CorrectionAction::BlankPair => {
                set(&mut updated, Variable::Tmean, date, MISSING_SENTINEL);
                if !is_missing(cur_tmean) && !is_missing(cur_tmax) && cur_tmean > cur_tmax {
                    set(&mut updated, Variable::Tmax, date, MISSING_SENTINEL);
                } else if !is_missing(cur_tmean) && !is_missing(cur_tmin) && cur_tmean < cur_tmin {
                    set(&mut updated, Variable::Tmin, date, MISSING_SENTINEL);
                }
            }
            CorrectionAction::ManualEdit(edit) => {
                self.apply_manual_edit(&mut updated, date, edit);
            }
            CorrectionAction::BlankAll => {
                for variable in Variable::THERMAL {
                    set(&mut updated, variable, date, MISSING_SENTINEL);
                }
            }
            CorrectionAction::Reorder => {
                self.apply_reorder(&mut updated, date, cur_tmin, cur_tmean, cur_tmax);
            }
        }

        let after = TripletValues {
            tmin: updated.tmin.as_ref().and_then(|s| s.get(date)),
            tmean: updated.tmean.as_ref().and_then(|s| s.get(date)),
            tmax: updated.tmax.as_ref().and_then(|s| s.get(date)),
        };

        let kind = if matches!(action, CorrectionAction::Swap) {
            EntryKind::Swap
        } else {
            EntryKind::Single
        };
        audit.append(
            kind,
            AuditEntry {
                timestamp: Utc::now(),
                station: updated.station.clone(),
                date,
                action: action.code().to_string(),
                variable: None,
                note: note.to_string(),
                values_before: before,
                values_after: after,
            },
        )?;

        Ok(updated)
    }

    fn apply_manual_edit(&self, triplet: &mut StationTriplet, date: NaiveDate, edit: ManualEdit) {
        if let Some(v) = edit.tmin {
            set(triplet, Variable::Tmin, date, v);
        }
        if let Some(v) = edit.tmean {
            set(triplet, Variable::Tmean, date, v);
        }
        if let Some(v) = edit.tmax {
            set(triplet, Variable::Tmax, date, v);
        }
    }

    /// Sort the valid values at the date back into tmin <= tmean <= tmax.
    /// Values are reassigned to the variables that held valid values, in
    /// ascending order; a missing variable stays missing. Fewer than two
    /// valid values leave everything unchanged.
    fn apply_reorder(
        &self,
        triplet: &mut StationTriplet,
        date: NaiveDate,
        tmin: f64,
        tmean: f64,
        tmax: f64,
    ) {
        let mut holders = Vec::new();
        let mut values = Vec::new();
        for (variable, value) in [
            (Variable::Tmin, tmin),
            (Variable::Tmean, tmean),
            (Variable::Tmax, tmax),
        ] {
            if !is_missing(value) {
                holders.push(variable);
                values.push(value);
            }
        }
        if values.len() < 2 {
            return;
        }
        values.sort_by(f64::total_cmp);
        for (variable, value) in holders.into_iter().zip(values) {
            set(triplet, variable, date, value);
        }
    }

    /// Apply one statistical decision and return the updated owned series.
    pub fn apply_statistical_decision(
        &self,
        series: &DailySeries,
        date: NaiveDate,
        decision: StatDecision,
        station: &str,
        variable: Variable,
        audit: &mut AuditLog,
        note: &str,
    ) -> Result<DailySeries> {
        let mut updated = series.clone();
        let before = updated.get(date);

        match decision {
            StatDecision::Keep => {}
            StatDecision::Substitute => updated.set(date, MISSING_SENTINEL),
            StatDecision::NewValue(v) => updated.set(date, v),
        }

        audit.append(
            EntryKind::Single,
            AuditEntry {
                timestamp: Utc::now(),
                station: station.to_string(),
                date,
                action: decision.code().to_string(),
                variable: Some(variable),
                note: note.to_string(),
                values_before: single_field(variable, before),
                values_after: single_field(variable, updated.get(date)),
            },
        )?;

        Ok(updated)
    }
}

fn value(triplet: &StationTriplet, variable: Variable, date: NaiveDate) -> f64 {
    triplet
        .get(variable)
        .map_or(MISSING_SENTINEL, |s| s.value_or_missing(date))
}

fn set(triplet: &mut StationTriplet, variable: Variable, date: NaiveDate, value: f64) {
    match variable {
        Variable::Tmin => triplet.tmin.as_mut(),
        Variable::Tmean => triplet.tmean.as_mut(),
        Variable::Tmax => triplet.tmax.as_mut(),
        Variable::Pr => triplet.pr.as_mut(),
    }
    .expect("thermal rows ensured before mutation")
    .set(date, value);
}

fn single_field(variable: Variable, value: Option<f64>) -> TripletValues {
    let mut values = TripletValues::default();
    match variable {
        Variable::Tmin => values.tmin = value,
        Variable::Tmean => values.tmean = value,
        Variable::Tmax => values.tmax = value,
        Variable::Pr => {}
    }
    values
}
