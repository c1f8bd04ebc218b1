use serde::{Deserialize, Serialize};

/// Replacement values for a manual edit; `None` leaves the field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEdit {
    pub tmin: Option<f64>,
    pub tmean: Option<f64>,
    pub tmax: Option<f64>,
}

/// A reviewer decision on a thermal inconsistency.
///
/// The single-letter vocabulary shown to the reviewer is a presentation
/// concern; `from_code` maps it onto this closed enum so the correction
/// engine can match exhaustively. Unrecognized input maps to `Unknown`,
/// which the engine treats as a no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CorrectionAction {
    /// (m) keep all values unchanged
    Keep,
    /// (i) exchange tmin and tmax
    Swap,
    /// (t) blank tmean
    BlankTmean,
    /// (u) blank tmax
    BlankTmax,
    /// (l) blank tmin
    BlankTmin,
    /// (x) blank tmean plus whichever bound it violates
    BlankPair,
    /// (e) externally supplied replacement values
    ManualEdit(ManualEdit),
    /// (s) blank all three
    BlankAll,
    /// (r) sort valid values back into tmin <= tmean <= tmax
    Reorder,
    Unknown,
}

impl CorrectionAction {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "m" => CorrectionAction::Keep,
            "i" => CorrectionAction::Swap,
            "t" => CorrectionAction::BlankTmean,
            "u" => CorrectionAction::BlankTmax,
            "l" => CorrectionAction::BlankTmin,
            "x" => CorrectionAction::BlankPair,
            "e" => CorrectionAction::ManualEdit(ManualEdit::default()),
            "s" => CorrectionAction::BlankAll,
            "r" => CorrectionAction::Reorder,
            _ => CorrectionAction::Unknown,
        }
    }

    /// The letter code recorded in the audit journal.
    pub fn code(&self) -> &'static str {
        match self {
            CorrectionAction::Keep => "m",
            CorrectionAction::Swap => "i",
            CorrectionAction::BlankTmean => "t",
            CorrectionAction::BlankTmax => "u",
            CorrectionAction::BlankTmin => "l",
            CorrectionAction::BlankPair => "x",
            CorrectionAction::ManualEdit(_) => "e",
            CorrectionAction::BlankAll => "s",
            CorrectionAction::Reorder => "r",
            CorrectionAction::Unknown => "?",
        }
    }
}

/// A reviewer decision on a single statistical outlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatDecision {
    /// (s) substitute the value with the missing sentinel
    Substitute,
    /// (m) keep the observed value
    Keep,
    /// (n) replace with a reviewer-supplied value
    NewValue(f64),
}

impl StatDecision {
    pub fn code(&self) -> &'static str {
        match self {
            StatDecision::Substitute => "s",
            StatDecision::Keep => "m",
            StatDecision::NewValue(_) => "n",
        }
    }
}
