use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{
    CapitalAllocation, CreatePortfolio, DeletedLot, Holding, PendingStock, Portfolio,
    PortfolioHolding, RebalanceRow, StockAnalytics, StockOrder, UpdatePortfolio,
};
use crate::services::allocation::summarize;
use crate::services::rounding::{display_2dp, to_decimal};
use crate::state::SessionContext;

/// A portfolio being created or edited, before it is sent to the backend.
///
/// Holds three lists: lots already in the portfolio, stocks to buy, and
/// lots marked for removal. Capital placed counts the first two.
#[derive(Debug, Clone, Default)]
pub struct PortfolioDraft {
    pub portfolio_name: String,
    pub portfolio_strategy: Option<String>,
    pub capital_amount: f64,
    existing: Vec<PortfolioHolding>,
    to_add: Vec<PendingStock>,
    to_delete: Vec<PortfolioHolding>,
}

impl PortfolioDraft {
    pub fn new(portfolio_name: impl Into<String>, capital_amount: f64) -> Self {
        Self {
            portfolio_name: portfolio_name.into(),
            capital_amount,
            ..Self::default()
        }
    }

    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            portfolio_name: portfolio.portfolio_name.clone(),
            portfolio_strategy: portfolio.portfolio_strategy.clone(),
            capital_amount: portfolio.capital_amount,
            existing: portfolio.stock_list.clone(),
            ..Self::default()
        }
    }

    pub fn existing(&self) -> &[PortfolioHolding] {
        &self.existing
    }

    pub fn pending(&self) -> &[PendingStock] {
        &self.to_add
    }

    pub fn deleted(&self) -> &[PortfolioHolding] {
        &self.to_delete
    }

    pub fn add_stock(&mut self, stock: PendingStock) {
        self.to_add.push(stock);
    }

    /// Drops every pending purchase of `symbol`.
    pub fn remove_pending(&mut self, symbol: &str) {
        self.to_add.retain(|s| s.stock_symbol != symbol);
    }

    /// Marks the existing lot at `index` for removal.
    pub fn delete_lot(&mut self, index: usize) -> Option<&PortfolioHolding> {
        if index >= self.existing.len() {
            return None;
        }
        let lot = self.existing.remove(index);
        self.to_delete.push(lot);
        self.to_delete.last()
    }

    pub fn allocation(&self) -> CapitalAllocation {
        let holdings: Vec<&dyn Holding> = self
            .existing
            .iter()
            .map(|h| h as &dyn Holding)
            .chain(self.to_add.iter().map(|s| s as &dyn Holding))
            .collect();
        summarize(holdings.iter().copied(), self.capital_amount)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.portfolio_name.trim().is_empty() {
            return Err(AppError::Validation("Portfolio name is required".to_string()));
        }
        if !(self.capital_amount.is_finite() && self.capital_amount > 0.0) {
            return Err(AppError::Validation(
                "Capital amount must be a positive number".to_string(),
            ));
        }
        if self.allocation().is_over_allocated() {
            return Err(AppError::Validation(
                "Capital amount must be greater than amount placed".to_string(),
            ));
        }
        Ok(())
    }

    /// Replaces holdings with the server's target quantities.
    ///
    /// Starts from the portfolio as loaded: earlier removals are restored
    /// and earlier purchases dropped. For every row needing an order, all
    /// lots of that symbol are marked for removal and one purchase of the
    /// target quantity is added at the quoted price. Rows without a usable
    /// quote are skipped.
    pub fn apply_rebalance(&mut self, plan: &[RebalanceRow], quotes: &HashMap<String, StockAnalytics>) {
        self.existing.append(&mut self.to_delete);
        self.to_add.clear();

        for row in plan.iter().filter(|r| r.needs_order()) {
            let Some(quote) = quotes.get(&row.stock_symbol) else {
                tracing::warn!("No quote for {}, skipping rebalance order", row.stock_symbol);
                continue;
            };
            let Some(price) = quote.current_stock_price else {
                tracing::warn!("Quote for {} has no price, skipping", row.stock_symbol);
                continue;
            };

            let (removed, kept): (Vec<_>, Vec<_>) = self
                .existing
                .drain(..)
                .partition(|lot| lot.stock_symbol == row.stock_symbol);
            self.existing = kept;
            self.to_delete.extend(removed);

            self.to_add.push(PendingStock {
                stock_symbol: row.stock_symbol.clone(),
                stock_name: quote.stock_name.clone(),
                exchange: quote.exchange.clone(),
                qty: row.target,
                current_stock_price: price,
            });
        }
    }

    pub fn create_request(&self, session: &SessionContext) -> Result<CreatePortfolio, AppError> {
        self.validate()?;
        Ok(CreatePortfolio {
            portfolio_name: self.portfolio_name.clone(),
            portfolio_strategy: self.portfolio_strategy.clone(),
            capital_amount: self.capital_display()?,
            user_email: session.user_email.clone(),
            stocks: self.orders(),
        })
    }

    pub fn update_request(&self) -> Result<UpdatePortfolio, AppError> {
        self.validate()?;
        Ok(UpdatePortfolio {
            portfolio_name: self.portfolio_name.clone(),
            portfolio_strategy: self.portfolio_strategy.clone(),
            capital_amount: self.capital_display()?,
            added_stocks: self.orders(),
            deleted_stocks: self
                .to_delete
                .iter()
                .map(|lot| DeletedLot {
                    stock_symbol: lot.stock_symbol.clone(),
                    qty: lot.qty,
                    current_stock_price: lot.current_stock_price.to_string(),
                    purchased_date_time: lot.purchased_date_time.clone(),
                })
                .collect(),
        })
    }

    fn orders(&self) -> Vec<StockOrder> {
        self.to_add
            .iter()
            .map(|s| StockOrder {
                stock_symbol: s.stock_symbol.clone(),
                qty: s.qty,
                exchange: s.exchange.clone(),
            })
            .collect()
    }

    fn capital_display(&self) -> Result<String, AppError> {
        to_decimal(self.capital_amount)
            .map(|d| display_2dp(&d))
            .ok_or_else(|| AppError::Validation("Capital amount is not a number".to_string()))
    }
}
