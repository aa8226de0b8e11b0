use serde::Serialize;

use crate::models::{
    AllocationSlice, AnnualizedMetricRow, CapitalAllocation, HistoricalPoint, PortfolioHolding,
    ShortPeriodVolatilityRow,
};
use crate::services::year_window::YearWindow;

/// The return and volatility tables every analytics screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsTables {
    pub annual_returns: YearWindow,
    pub annualized_returns: Vec<AnnualizedMetricRow>,
    pub annualized_volatility: Vec<AnnualizedMetricRow>,
    pub short_horizon_volatility: [ShortPeriodVolatilityRow; 5],
}

#[derive(Debug, Clone, Serialize)]
pub struct StockAnalyticsView {
    pub stock_symbol: String,
    pub stock_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub exchange: Option<String>,
    pub description: Option<String>,
    pub current_stock_price: Option<f64>,
    pub tables: AnalyticsTables,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalyticsView {
    pub portfolio_id: Option<String>,
    pub portfolio_name: String,
    pub portfolio_strategy: Option<String>,
    pub capital: CapitalAllocation,
    pub holdings: Vec<PortfolioHolding>,
    pub symbol_allocation: Vec<AllocationSlice>,
    pub sector_allocation: Vec<AllocationSlice>,
    pub industry_allocation: Vec<AllocationSlice>,
    pub country_allocation: Vec<AllocationSlice>,
    pub tables: AnalyticsTables,
}

/// Everything one portfolio screen has received so far. Each part fills in
/// as its own fetch resolves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioScreen {
    pub analytics: Option<PortfolioAnalyticsView>,
    pub monthly_history: Option<Vec<HistoricalPoint>>,
    pub daily_history: Option<Vec<HistoricalPoint>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioComparison {
    pub left: PortfolioScreen,
    pub right: PortfolioScreen,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StockComparison {
    pub left: Option<StockAnalyticsView>,
    pub right: Option<StockAnalyticsView>,
}
