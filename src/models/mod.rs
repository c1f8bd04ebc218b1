pub mod action;
pub mod inconsistency;
pub mod params;
pub mod series;
pub mod triplet;

pub use action::{CorrectionAction, ManualEdit, StatDecision};
pub use inconsistency::{InconsistencyKind, ThermalInconsistency};
pub use params::QcParams;
pub use series::{is_missing, normalize_value, DailySeries};
pub use triplet::{StationTriplet, Variable};
