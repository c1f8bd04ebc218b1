use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::series::DailySeries;

/// The four per-station daily variables handled in one review session.
///
/// Precipitation is reference-only: it is rendered for context but never
/// checked or corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    Tmin,
    Tmean,
    Tmax,
    Pr,
}

impl Variable {
    pub const THERMAL: [Variable; 3] = [Variable::Tmin, Variable::Tmean, Variable::Tmax];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Tmin => "tmin",
            Variable::Tmean => "tmean",
            Variable::Tmax => "tmax",
            Variable::Pr => "pr",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        // "ts" is the legacy name for the daily mean series
        match name.trim().to_lowercase().as_str() {
            "tmin" => Some(Variable::Tmin),
            "tmean" | "ts" => Some(Variable::Tmean),
            "tmax" => Some(Variable::Tmax),
            "pr" => Some(Variable::Pr),
            _ => None,
        }
    }

    pub fn is_thermal(&self) -> bool {
        !matches!(self, Variable::Pr)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The thermal triplet for one station, plus reference precipitation.
///
/// Any series may be absent; absence is distinct from an empty series.
/// Constructed once per review session, mutated only through the correction
/// engine, persisted or discarded at session end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTriplet {
    pub station: String,
    pub tmin: Option<DailySeries>,
    pub tmean: Option<DailySeries>,
    pub tmax: Option<DailySeries>,
    pub pr: Option<DailySeries>,
}

impl StationTriplet {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn get(&self, variable: Variable) -> Option<&DailySeries> {
        match variable {
            Variable::Tmin => self.tmin.as_ref(),
            Variable::Tmean => self.tmean.as_ref(),
            Variable::Tmax => self.tmax.as_ref(),
            Variable::Pr => self.pr.as_ref(),
        }
    }

    pub fn set(&mut self, variable: Variable, series: DailySeries) {
        match variable {
            Variable::Tmin => self.tmin = Some(series),
            Variable::Tmean => self.tmean = Some(series),
            Variable::Tmax => self.tmax = Some(series),
            Variable::Pr => self.pr = Some(series),
        }
    }

    pub fn has_thermal_data(&self) -> bool {
        Variable::THERMAL
            .iter()
            .any(|v| self.get(*v).is_some_and(|s| !s.is_empty()))
    }
}
