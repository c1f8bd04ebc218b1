use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CONTEXT_WINDOW_DAYS, DEFAULT_IQR_MULTIPLIER, DEFAULT_LOWER_PERCENTILE,
    DEFAULT_UPPER_PERCENTILE,
};

/// Statistical QC parameters for one review session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_percentile_order"))]
pub struct QcParams {
    #[validate(range(min = 0.0, max = 1.0))]
    pub lower_percentile: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub upper_percentile: f64,

    #[validate(range(min = 0.0))]
    pub iqr_multiplier: f64,

    #[validate(range(min = 1))]
    pub window_days: i64,
}

impl Default for QcParams {
    fn default() -> Self {
        Self {
            lower_percentile: DEFAULT_LOWER_PERCENTILE,
            upper_percentile: DEFAULT_UPPER_PERCENTILE,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            window_days: DEFAULT_CONTEXT_WINDOW_DAYS,
        }
    }
}

impl QcParams {
    pub fn new(
        lower_percentile: f64,
        upper_percentile: f64,
        iqr_multiplier: f64,
        window_days: i64,
    ) -> Result<Self> {
        let params = Self {
            lower_percentile,
            upper_percentile,
            iqr_multiplier,
            window_days,
        };
        params.validate()?;
        Ok(params)
    }
}

fn validate_percentile_order(params: &QcParams) -> std::result::Result<(), ValidationError> {
    if params.lower_percentile >= params.upper_percentile {
        return Err(ValidationError::new("percentile_order"));
    }
    Ok(())
}
