use bigdecimal::BigDecimal;

use crate::models::{
    AllocationSlice, CapitalAllocation, CombinedHolding, Holding, LabeledSeries, RebalanceRow,
};
use crate::services::rounding::{decimal_to_f64, display_2dp, round_decimal, to_decimal};

/// Capital placed in `holdings` and what is left of `capital_amount`.
///
/// Sums run in decimal arithmetic so that `10 x 5.005` places exactly
/// `50.05`. An over-allocated portfolio yields a negative `available`.
pub fn summarize<'a, H, I>(holdings: I, capital_amount: f64) -> CapitalAllocation
where
    H: Holding + ?Sized + 'a,
    I: IntoIterator<Item = &'a H>,
{
    let placed = holdings
        .into_iter()
        .filter_map(|h| {
            let price = to_decimal(h.current_stock_price());
            if price.is_none() {
                tracing::warn!("Skipping holding with non-finite price");
            }
            price.map(|p| p * BigDecimal::from(h.qty()))
        })
        .fold(BigDecimal::from(0), |acc, value| acc + value);

    let capital = to_decimal(capital_amount).unwrap_or_else(|| BigDecimal::from(0));
    let available = &capital - &placed;

    CapitalAllocation {
        capital_amount,
        placed: decimal_to_f64(&round_decimal(&placed)),
        available: decimal_to_f64(&round_decimal(&available)),
        placed_display: display_2dp(&placed),
        available_display: display_2dp(&available),
    }
}

/// Donut-chart slices for a sector / industry / country / symbol mapping.
///
/// `share_pct` is each value's share of the total, rounded half up to a
/// whole percent. A zero total gives every slice a zero share.
pub fn allocation_slices(series: Option<&LabeledSeries>) -> Vec<AllocationSlice> {
    let Some(series) = series else {
        return Vec::new();
    };

    let total: f64 = series.iter().map(|(_, v)| v).sum();

    series
        .iter()
        .map(|(label, value)| {
            let share_pct = if total > 0.0 {
                (value / total * 100.0 + 0.5).floor().max(0.0) as u32
            } else {
                0
            };
            AllocationSlice {
                label: label.to_string(),
                value,
                share_pct,
            }
        })
        .collect()
}

/// Pairs server-computed target quantities with what the portfolio holds now.
///
/// Rows follow the order of `targets`. A symbol the portfolio does not hold
/// has no current quantity and no diff.
pub fn rebalance_plan(
    targets: &[(String, u32)],
    combined: &[CombinedHolding],
) -> Vec<RebalanceRow> {
    targets
        .iter()
        .map(|(symbol, target)| {
            let current = combined
                .iter()
                .find(|h| &h.stock_symbol == symbol)
                .map(|h| h.qty);

            RebalanceRow {
                stock_symbol: symbol.clone(),
                current,
                target: *target,
                diff: current.map(|c| i64::from(*target) - i64::from(c)),
            }
        })
        .collect()
}
