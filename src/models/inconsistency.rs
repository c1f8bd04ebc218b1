use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::triplet::Variable;

/// Classification of a physically inconsistent date in the thermal triplet.
///
/// The discriminants are listed in detection precedence order: suspicious
/// equalities are checked before order violations, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InconsistencyKind {
    TminEqualsTmax,
    TmeanEqualsTmax,
    TmeanEqualsTmin,
    TmaxBelowTmin,
    TmeanAboveTmax,
    TmeanBelowTmin,
    Undefined,
}

impl InconsistencyKind {
    /// Which variables the classification implicates, for render highlighting.
    pub fn implicated(&self) -> &'static [Variable] {
        match self {
            InconsistencyKind::TminEqualsTmax | InconsistencyKind::TmaxBelowTmin => {
                &[Variable::Tmin, Variable::Tmax]
            }
            InconsistencyKind::TmeanEqualsTmax | InconsistencyKind::TmeanAboveTmax => {
                &[Variable::Tmean, Variable::Tmax]
            }
            InconsistencyKind::TmeanEqualsTmin | InconsistencyKind::TmeanBelowTmin => {
                &[Variable::Tmean, Variable::Tmin]
            }
            InconsistencyKind::Undefined => &Variable::THERMAL,
        }
    }
}

impl fmt::Display for InconsistencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InconsistencyKind::TminEqualsTmax => "tmin==tmax",
            InconsistencyKind::TmeanEqualsTmax => "tmean==tmax",
            InconsistencyKind::TmeanEqualsTmin => "tmean==tmin",
            InconsistencyKind::TmaxBelowTmin => "tmax<tmin",
            InconsistencyKind::TmeanAboveTmax => "tmean>tmax",
            InconsistencyKind::TmeanBelowTmin => "tmean<tmin",
            InconsistencyKind::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// One inconsistent date, produced fresh on each detection pass.
///
/// The values are a snapshot at detection time (missing values appear as the
/// sentinel); a later pass over corrected data supersedes the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalInconsistency {
    pub date: NaiveDate,
    pub tmin: f64,
    pub tmean: f64,
    pub tmax: f64,
    pub kind: InconsistencyKind,
}
