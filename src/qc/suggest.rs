use crate::models::action::{CorrectionAction, StatDecision};
use crate::models::series::is_missing;
use crate::qc::bounds::Bounds;
use crate::utils::constants::EXTREME_OUTLIER_IQR;

/// Suggest a thermal action for the values at an inconsistent date, with a
/// short justification string for the prompt. Returns `None` when no rule
/// applies and the reviewer must decide unaided.
pub fn suggest_thermal_action(
    tmin: f64,
    tmean: f64,
    tmax: f64,
) -> Option<(CorrectionAction, &'static str)> {
    let tmean_ok = !is_missing(tmean);

    // Duplicated mean values are the most common defect in the archives
    if tmean_ok && (tmean == tmin || tmean == tmax) {
        return Some((
            CorrectionAction::BlankTmean,
            "blank tmean (duplicated or inconsistent value)",
        ));
    }

    if !is_missing(tmin) && !is_missing(tmax) && tmax < tmin {
        return Some((CorrectionAction::Swap, "swap tmin and tmax (inversion)"));
    }

    if tmean_ok && ((!is_missing(tmax) && tmean > tmax) || (!is_missing(tmin) && tmean < tmin)) {
        return Some((CorrectionAction::BlankTmean, "blank tmean (out of range)"));
    }

    None
}

/// Suggest a statistical decision from how far the value sits outside the
/// percentile band: beyond 3 IQR suggest blanking, beyond the flagging
/// threshold suggest a manual replacement, otherwise suggest keeping.
pub fn suggest_outlier_decision(value: f64, bounds: &Bounds) -> (StatDecision, &'static str) {
    if value < bounds.p_low - EXTREME_OUTLIER_IQR * bounds.iqr
        || value > bounds.p_high + EXTREME_OUTLIER_IQR * bounds.iqr
    {
        return (
            StatDecision::Substitute,
            "extreme outlier, suggest replacing with the missing marker",
        );
    }
    if value < bounds.lim_inf || value > bounds.lim_sup {
        return (
            StatDecision::NewValue(value),
            "moderately out of range, suggest entering a corrected value",
        );
    }
    (
        StatDecision::Keep,
        "slightly out of range, suggest keeping (manual inspection recommended)",
    )
}
