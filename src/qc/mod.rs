pub mod bounds;
pub mod correction;
pub mod outliers;
pub mod review;
pub mod suggest;
pub mod thermal;

pub use bounds::{compute_bounds, Bounds};
pub use correction::CorrectionEngine;
pub use outliers::{detect_outliers, OutlierRecord};
pub use review::{ReviewLoop, ReviewOutcome, ReviewerPrompt};
pub use suggest::{suggest_outlier_decision, suggest_thermal_action};
pub use thermal::{classify_date, detect_inconsistencies};
