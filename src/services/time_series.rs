use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{AnnualReturnPoint, HistoricalPoint, LabeledSeries};

/// Turns a `year -> percent` mapping into chart points, keeping the
/// mapping's order. An absent mapping (fetch still pending) yields no points.
pub fn normalize(series: Option<&LabeledSeries>) -> Vec<AnnualReturnPoint> {
    series
        .map(|s| {
            s.iter()
                .map(|(period, value)| AnnualReturnPoint {
                    period: period.to_string(),
                    value,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Re-sorts points by their parsed period (year or ISO date), oldest first.
/// Points that share a period keep their relative order.
pub fn chronological(points: Vec<AnnualReturnPoint>) -> Result<Vec<AnnualReturnPoint>, AppError> {
    let mut keyed = points
        .into_iter()
        .map(|p| period_key(&p.period).map(|key| (key, p)))
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, p)| p).collect())
}

/// Historical percentage-change series keyed by date, sorted ascending.
pub fn historical_series(series: Option<&LabeledSeries>) -> Result<Vec<HistoricalPoint>, AppError> {
    let Some(series) = series else {
        return Ok(Vec::new());
    };

    let mut out = series
        .iter()
        .map(|(label, value)| {
            parse_date(label)
                .map(|date| HistoricalPoint { date, value })
                .ok_or_else(|| AppError::malformed(label))
        })
        .collect::<Result<Vec<_>, _>>()?;

    out.sort_by_key(|p| p.date);
    Ok(out)
}

fn period_key(label: &str) -> Result<NaiveDate, AppError> {
    parse_date(label)
        .or_else(|| {
            label
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
        .ok_or_else(|| AppError::malformed(label))
}

// Accepts "YYYY-MM-DD", a "YYYY-MM-DDTHH:MM:SS" timestamp, or a bare "YYYY-MM" month.
fn parse_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    let day_part = label.split('T').next().unwrap_or(label);

    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{day_part}-01"), "%Y-%m-%d").ok())
}
