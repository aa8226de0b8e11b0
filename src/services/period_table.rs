use crate::errors::AppError;
use crate::models::{
    AnnualizedMetricRow, LabeledSeries, ShortPeriodVolatilityRow, VolatilityBucket, VolatilityCell,
};
use crate::services::rounding::round_2dp;

/// Rows for the annualized return / volatility tables.
///
/// Labels look like `"3 years"`; the leading integer becomes `num_years`.
/// A label without one is a backend contract violation and fails the whole
/// table rather than producing a row that would sort unpredictably.
pub fn annualized_rows(series: Option<&LabeledSeries>) -> Result<Vec<AnnualizedMetricRow>, AppError> {
    let Some(series) = series else {
        return Ok(Vec::new());
    };

    let mut rows = series
        .iter()
        .map(|(label, value)| {
            Ok(AnnualizedMetricRow {
                num_years: leading_count(label)?,
                value: round_2dp(label, value)?,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    // stable: duplicate counts keep backend order
    rows.sort_by_key(|row| row.num_years);
    Ok(rows)
}

/// The five-row short-horizon volatility table.
///
/// Buckets the backend did not send keep the `-` placeholder; labels that
/// are not one of the five buckets are skipped.
pub fn short_horizon_rows(
    series: Option<&LabeledSeries>,
) -> Result<[ShortPeriodVolatilityRow; 5], AppError> {
    let mut rows = VolatilityBucket::ALL.map(|bucket| ShortPeriodVolatilityRow {
        bucket,
        value: VolatilityCell::Missing,
    });

    for (label, value) in series.into_iter().flat_map(|s| s.iter()) {
        match VolatilityBucket::from_label(label) {
            Some(bucket) => {
                if let Some(row) = rows.iter_mut().find(|row| row.bucket == bucket) {
                    row.value = VolatilityCell::Value(round_2dp(label, value)?);
                }
            }
            None => tracing::debug!("Ignoring unrecognized volatility bucket {:?}", label),
        }
    }

    Ok(rows)
}

fn leading_count(label: &str) -> Result<u32, AppError> {
    label
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| AppError::malformed(label))
}
