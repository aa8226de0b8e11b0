use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CreatePortfolio, HistoryInterval, LabeledSeries, Portfolio, PortfolioSummary, StockAnalytics,
    StockListing, UpdatePortfolio,
};
use crate::state::SessionContext;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// The portfolio analytics backend.
///
/// Maps come back with their keys in the order the backend wrote them.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    async fn fetch_stock(&self, symbol: &str) -> Result<StockAnalytics, BackendError>;

    async fn list_stocks(&self) -> Result<Vec<StockListing>, BackendError>;

    async fn fetch_portfolio(&self, portfolio_id: &str) -> Result<Portfolio, BackendError>;

    /// Portfolios owned by the session's user. Having none is not an error.
    async fn list_portfolios(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PortfolioSummary>, BackendError>;

    /// Cumulative percentage change keyed by date.
    async fn fetch_history(
        &self,
        portfolio_id: &str,
        interval: HistoryInterval,
    ) -> Result<LabeledSeries, BackendError>;

    /// Server-computed target quantity per symbol.
    async fn fetch_rebalance_targets(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<(String, u32)>, BackendError>;

    async fn create_portfolio(&self, request: &CreatePortfolio) -> Result<String, BackendError>;

    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        request: &UpdatePortfolio,
    ) -> Result<String, BackendError>;

    async fn delete_portfolio(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<String, BackendError>;
}

/// Converts the backend's `symbol -> quantity` object into target pairs.
pub fn rebalance_targets(series: &LabeledSeries) -> Result<Vec<(String, u32)>, BackendError> {
    series
        .iter()
        .map(|(symbol, qty)| {
            if qty.fract() != 0.0 || qty < 0.0 || qty > f64::from(u32::MAX) {
                return Err(BackendError::Parse(format!(
                    "invalid target quantity {qty} for {symbol}"
                )));
            }
            Ok((symbol.to_string(), qty as u32))
        })
        .collect()
}
