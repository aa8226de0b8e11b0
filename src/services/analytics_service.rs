use crate::errors::AppError;
use crate::models::{
    AnalyticsTables, LabeledSeries, Portfolio, PortfolioAnalyticsView, StockAnalytics,
    StockAnalyticsView,
};
use crate::services::allocation::{allocation_slices, summarize};
use crate::services::period_table::{annualized_rows, short_horizon_rows};
use crate::services::time_series::normalize;
use crate::services::year_window::YearWindow;

/// Builds the shared return/volatility tables from the four backend maps.
pub fn build_tables(
    annual_return: Option<&LabeledSeries>,
    annualized_return: Option<&LabeledSeries>,
    volatility_months: Option<&LabeledSeries>,
    volatility_days: Option<&LabeledSeries>,
) -> Result<AnalyticsTables, AppError> {
    Ok(AnalyticsTables {
        annual_returns: YearWindow::new(normalize(annual_return)),
        annualized_returns: annualized_rows(annualized_return)?,
        annualized_volatility: annualized_rows(volatility_months)?,
        short_horizon_volatility: short_horizon_rows(volatility_days)?,
    })
}

pub fn stock_view(stock: &StockAnalytics) -> Result<StockAnalyticsView, AppError> {
    let tables = build_tables(
        stock.annual_return.as_ref(),
        stock.annualized_return.as_ref(),
        stock.annualized_volatility_months.as_ref(),
        stock.annualized_volatility_days.as_ref(),
    )?;

    Ok(StockAnalyticsView {
        stock_symbol: stock.stock_symbol.clone(),
        stock_name: stock.stock_name.clone(),
        sector: stock.sector.clone(),
        industry: stock.industry.clone(),
        country: stock.country.clone(),
        exchange: stock.exchange.clone(),
        description: stock.stock_description.clone(),
        current_stock_price: stock.current_stock_price,
        tables,
    })
}

pub fn portfolio_view(portfolio: &Portfolio) -> Result<PortfolioAnalyticsView, AppError> {
    let tables = build_tables(
        portfolio.annual_return.as_ref(),
        portfolio.annualized_return.as_ref(),
        portfolio.annualized_volatility_months.as_ref(),
        portfolio.annualized_volatility_days.as_ref(),
    )?;

    Ok(PortfolioAnalyticsView {
        portfolio_id: portfolio.portfolio_id.clone(),
        portfolio_name: portfolio.portfolio_name.clone(),
        portfolio_strategy: portfolio.portfolio_strategy.clone(),
        capital: summarize(&portfolio.stock_list, portfolio.capital_amount),
        holdings: portfolio.stock_list.clone(),
        symbol_allocation: allocation_slices(portfolio.percent_allocated.as_ref()),
        sector_allocation: allocation_slices(portfolio.sector_allocated.as_ref()),
        industry_allocation: allocation_slices(portfolio.industry_allocated.as_ref()),
        country_allocation: allocation_slices(portfolio.country_allocated.as_ref()),
        tables,
    })
}
