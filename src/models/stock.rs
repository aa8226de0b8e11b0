use serde::{Deserialize, Serialize};

use crate::models::LabeledSeries;

// A listed stock together with the analytics the backend computed for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalytics {
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub stock_description: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub current_stock_price: Option<f64>,
    #[serde(default)]
    pub latest_trading_day: Option<String>,
    #[serde(default)]
    pub annual_return: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_return: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_volatility_months: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_volatility_days: Option<LabeledSeries>,
}

// Entry of the stock catalogue used when picking stocks for a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockListing {
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub current_stock_price: Option<f64>,
}

impl StockListing {
    /// Case-insensitive match on symbol or name, as the stock picker filters.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.stock_symbol.to_lowercase().contains(&query)
            || self
                .stock_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
    }
}
