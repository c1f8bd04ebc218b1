use crate::utils::constants::DEGENERATE_BOUNDS_SPAN;

/// Percentile/IQR bounds derived from one value sample.
///
/// Ephemeral: recomputed on demand, never persisted. All fields are NaN when
/// the input sample was empty, and callers must treat that as "no bounds
/// available" rather than as zero-width bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub p_low: f64,
    pub p_high: f64,
    pub iqr: f64,
    pub lim_inf: f64,
    pub lim_sup: f64,
}

impl Bounds {
    /// True when the bounds cannot support meaningful outlier detection:
    /// undefined (empty sample) or so narrow that a near-constant sample
    /// would flood-flag ordinary values.
    pub fn is_degenerate(&self) -> bool {
        !self.lim_inf.is_finite()
            || !self.lim_sup.is_finite()
            || self.lim_sup - self.lim_inf <= DEGENERATE_BOUNDS_SPAN
    }
}

/// Compute percentile bounds from a sample that already excludes missing
/// values. `lower_p`/`upper_p` are fractions in [0, 1] with lower < upper,
/// `k` is the IQR multiplier; both are validated upstream by `QcParams`.
pub fn compute_bounds(sample: &[f64], lower_p: f64, upper_p: f64, k: f64) -> Bounds {
    if sample.is_empty() {
        return Bounds {
            p_low: f64::NAN,
            p_high: f64::NAN,
            iqr: f64::NAN,
            lim_inf: f64::NAN,
            lim_sup: f64::NAN,
        };
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let p_low = linear_quantile(&sorted, lower_p);
    let p_high = linear_quantile(&sorted, upper_p);
    let iqr = p_high - p_low;

    Bounds {
        p_low,
        p_high,
        iqr,
        lim_inf: p_low - k * iqr,
        lim_sup: p_high + k * iqr,
    }
}

/// Quantile with linear interpolation between order statistics, matching the
/// standard "linear" percentile method so results stay bit-compatible with
/// previously published bounds.
fn linear_quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (n - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = rank - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}
