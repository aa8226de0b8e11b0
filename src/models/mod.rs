mod analytics;
mod portfolio;
mod series;
mod stock;
mod views;

pub use analytics::*;
pub use portfolio::{
    CombinedHolding, CreatePortfolio, DeletedLot, Holding, PendingStock, Portfolio,
    PortfolioHolding, PortfolioSummary, StockOrder, UpdatePortfolio,
};
pub use series::LabeledSeries;
pub use stock::{StockAnalytics, StockListing};
pub use views::{
    AnalyticsTables, PortfolioAnalyticsView, PortfolioComparison, PortfolioScreen,
    StockAnalyticsView, StockComparison,
};
