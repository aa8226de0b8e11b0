use serde::{Deserialize, Deserializer, Serialize};

use crate::models::LabeledSeries;

/// Anything holding a quantity of a stock priced at its current price.
pub trait Holding {
    fn qty(&self) -> u32;
    fn current_stock_price(&self) -> f64;
}

// Represents a logical grouping of investments with its backend-computed analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub portfolio_id: Option<String>,
    pub portfolio_name: String,
    #[serde(default)]
    pub portfolio_strategy: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub capital_amount: f64,
    #[serde(default)]
    pub stock_list: Vec<PortfolioHolding>,
    #[serde(default)]
    pub combined_stock_list: Vec<CombinedHolding>,
    #[serde(default)]
    pub percent_allocated: Option<LabeledSeries>,
    #[serde(default)]
    pub sector_allocated: Option<LabeledSeries>,
    #[serde(default)]
    pub industry_allocated: Option<LabeledSeries>,
    #[serde(default)]
    pub country_allocated: Option<LabeledSeries>,
    #[serde(default)]
    pub annual_return: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_return: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_volatility_months: Option<LabeledSeries>,
    #[serde(default)]
    pub annualized_volatility_days: Option<LabeledSeries>,
}

// One purchase lot inside a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    pub qty: u32,
    pub current_stock_price: f64,
    // Opaque to the client; echoed back when a lot is deleted.
    #[serde(default)]
    pub purchased_date_time: Option<serde_json::Value>,
}

impl Holding for PortfolioHolding {
    fn qty(&self) -> u32 {
        self.qty
    }

    fn current_stock_price(&self) -> f64 {
        self.current_stock_price
    }
}

// All lots of one symbol merged by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedHolding {
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    pub qty: u32,
    #[serde(default, deserialize_with = "number_or_string")]
    pub avg_stock_price: Option<f64>,
}

// The backend formats the average price as a "0.00" string.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// Row of the "my portfolios" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    pub portfolio_name: String,
    #[serde(default)]
    pub portfolio_strategy: Option<String>,
    #[serde(default)]
    pub capital_amount: Option<f64>,
}

/// A stock the user is about to buy into a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingStock {
    pub stock_symbol: String,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    pub qty: u32,
    pub current_stock_price: f64,
}

impl Holding for PendingStock {
    fn qty(&self) -> u32 {
        self.qty
    }

    fn current_stock_price(&self) -> f64 {
        self.current_stock_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOrder {
    pub stock_symbol: String,
    pub qty: u32,
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedLot {
    pub stock_symbol: String,
    pub qty: u32,
    pub current_stock_price: String,
    pub purchased_date_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolio {
    pub portfolio_name: String,
    pub portfolio_strategy: Option<String>,
    pub capital_amount: String,
    pub user_email: String,
    pub stocks: Vec<StockOrder>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolio {
    pub portfolio_name: String,
    pub portfolio_strategy: Option<String>,
    pub capital_amount: String,
    pub added_stocks: Vec<StockOrder>,
    pub deleted_stocks: Vec<DeletedLot>,
}
