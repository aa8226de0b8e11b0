//! Two-decimal rounding shared by every table and summary.
//!
//! Values are rounded half away from zero on their shortest decimal form,
//! so `12.345` becomes `12.35` and `-1.005` becomes `-1.01` even though
//! neither is exactly representable as an `f64`.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::errors::AppError;

pub const DISPLAY_SCALE: i64 = 2;

/// Exact decimal form of a finite `f64`, using its shortest round-trip text.
pub fn to_decimal(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// Rounds a decimal to two places and pins the scale, so `50` renders `50.00`.
pub fn round_decimal(value: &BigDecimal) -> BigDecimal {
    value.round(DISPLAY_SCALE).with_scale(DISPLAY_SCALE)
}

pub fn decimal_to_f64(value: &BigDecimal) -> f64 {
    // Display of a finite BigDecimal always parses back.
    value.to_string().parse::<f64>().unwrap_or(0.0)
}

/// Rounds `value` to two decimals; `label` names the offending entry on error.
pub fn round_2dp(label: &str, value: f64) -> Result<f64, AppError> {
    let decimal = to_decimal(value).ok_or_else(|| AppError::NonFiniteValue {
        label: label.to_string(),
    })?;
    Ok(decimal_to_f64(&round_decimal(&decimal)))
}

pub fn display_2dp(value: &BigDecimal) -> String {
    round_decimal(value).to_string()
}
