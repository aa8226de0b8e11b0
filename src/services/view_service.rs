use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::errors::AppError;
use crate::external::backend::{AnalyticsBackend, BackendError};
use crate::models::{
    HistoryInterval, Portfolio, PortfolioComparison, PortfolioOption, PortfolioScreen,
    RebalanceRow, StockAnalytics, StockAnalyticsView, StockComparison, StockListing,
};
use crate::services::allocation::rebalance_plan;
use crate::services::analytics_service::{portfolio_view, stock_view};
use crate::services::notification_service::{Notification, Notifier};
use crate::services::portfolio_service::PortfolioDraft;
use crate::services::time_series::historical_series;
use crate::state::{RequestTicket, SessionContext, ViewSession};

/// Fetches backend data for the screens and folds it into their sessions.
///
/// Fetch failures are reported through the notifier and leave the screen as
/// it was; they never surface as `Err`. An `Err` means the backend sent data
/// that breaks its own contract, such as an unparseable period label.
#[derive(Clone)]
pub struct ViewService {
    backend: Arc<dyn AnalyticsBackend>,
    notifier: Arc<dyn Notifier>,
}

impl ViewService {
    pub fn new(backend: Arc<dyn AnalyticsBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    // ==========================================================================
    // Stocks
    // ==========================================================================

    pub async fn load_stock(
        &self,
        view: &ViewSession<Option<StockAnalyticsView>>,
        symbol: &str,
    ) -> Result<(), AppError> {
        let ticket = view.reload();
        self.load_stock_into(view, ticket, symbol, whole_stock).await
    }

    pub async fn load_stock_comparison(
        &self,
        view: &ViewSession<StockComparison>,
        left: &str,
        right: &str,
    ) -> Result<(), AppError> {
        let ticket = view.reload();
        let (l, r) = tokio::join!(
            self.load_stock_into(view, ticket, left, left_stock),
            self.load_stock_into(view, ticket, right, right_stock),
        );
        l.and(r)
    }

    async fn load_stock_into<S: Default + Clone>(
        &self,
        view: &ViewSession<S>,
        ticket: RequestTicket,
        symbol: &str,
        slot: fn(&mut S) -> &mut Option<StockAnalyticsView>,
    ) -> Result<(), AppError> {
        let fetched = self.backend.fetch_stock(symbol).await;
        let Some(stock) = self.accept(view, ticket, fetched, "Failed to fetch stock analytics data")
        else {
            return Ok(());
        };

        let built = stock_view(&stock)?;
        view.apply(ticket, |s| *slot(s) = Some(built));
        Ok(())
    }

    pub async fn list_stocks(&self) -> Vec<StockListing> {
        match self.backend.list_stocks().await {
            Ok(stocks) => stocks,
            Err(err) => {
                tracing::warn!("Listing stocks failed: {}", err);
                self.notifier.notify(Notification::error("Error fetching stocks"));
                Vec::new()
            }
        }
    }

    // ==========================================================================
    // Portfolios
    // ==========================================================================

    /// Loads the portfolio and both history series concurrently. Each part
    /// lands in the screen as soon as its own request finishes.
    pub async fn load_portfolio(
        &self,
        view: &ViewSession<PortfolioScreen>,
        portfolio_id: &str,
    ) -> Result<(), AppError> {
        let ticket = view.reload();
        self.load_portfolio_into(view, ticket, portfolio_id, whole_screen).await
    }

    pub async fn load_portfolio_comparison(
        &self,
        view: &ViewSession<PortfolioComparison>,
        left_id: &str,
        right_id: &str,
    ) -> Result<(), AppError> {
        let ticket = view.reload();
        let (l, r) = tokio::join!(
            self.load_portfolio_into(view, ticket, left_id, left_screen),
            self.load_portfolio_into(view, ticket, right_id, right_screen),
        );
        l.and(r)
    }

    async fn load_portfolio_into<S: Default + Clone>(
        &self,
        view: &ViewSession<S>,
        ticket: RequestTicket,
        portfolio_id: &str,
        screen: fn(&mut S) -> &mut PortfolioScreen,
    ) -> Result<(), AppError> {
        let analytics = async {
            let fetched = self.backend.fetch_portfolio(portfolio_id).await;
            let Some(portfolio) = self.accept(view, ticket, fetched, "Failed to fetch portfolio")
            else {
                return Ok(());
            };
            let built = portfolio_view(&portfolio)?;
            view.apply(ticket, |s| screen(s).analytics = Some(built));
            Ok::<(), AppError>(())
        };

        let (a, m, d) = tokio::join!(
            analytics,
            self.load_history(view, ticket, portfolio_id, HistoryInterval::Monthly, screen),
            self.load_history(view, ticket, portfolio_id, HistoryInterval::Daily, screen),
        );
        a.and(m).and(d)
    }

    async fn load_history<S: Default + Clone>(
        &self,
        view: &ViewSession<S>,
        ticket: RequestTicket,
        portfolio_id: &str,
        interval: HistoryInterval,
        screen: fn(&mut S) -> &mut PortfolioScreen,
    ) -> Result<(), AppError> {
        let failure = format!("Failed to fetch historical price - {}", interval.as_path());
        let fetched = self.backend.fetch_history(portfolio_id, interval).await;
        let Some(series) = self.accept(view, ticket, fetched, &failure) else {
            return Ok(());
        };

        let points = historical_series(Some(&series))?;
        view.apply(ticket, |s| {
            let screen = screen(s);
            match interval {
                HistoryInterval::Monthly => screen.monthly_history = Some(points),
                HistoryInterval::Daily => screen.daily_history = Some(points),
            }
        });
        Ok(())
    }

    /// Choices for the portfolio picker. No portfolios yields an empty list
    /// and an informational notification.
    pub async fn portfolio_options(&self, session: &SessionContext) -> Vec<PortfolioOption> {
        match self.backend.list_portfolios(session).await {
            Ok(portfolios) if portfolios.is_empty() => {
                self.notifier.notify(Notification::info("No portfolios found"));
                Vec::new()
            }
            Ok(portfolios) => portfolios
                .into_iter()
                .map(|p| PortfolioOption {
                    label: p.portfolio_name,
                    value: p.portfolio_id,
                })
                .collect(),
            Err(err) => {
                tracing::warn!("Listing portfolios for {} failed: {}", session.user_email, err);
                self.notifier.notify(Notification::error("Failed to fetch portfolios"));
                Vec::new()
            }
        }
    }

    // ==========================================================================
    // Editing
    // ==========================================================================

    pub async fn rebalance_plan(&self, portfolio: &Portfolio) -> Option<Vec<RebalanceRow>> {
        let portfolio_id = portfolio.portfolio_id.as_deref()?;
        match self.backend.fetch_rebalance_targets(portfolio_id).await {
            Ok(targets) => Some(rebalance_plan(&targets, &portfolio.combined_stock_list)),
            Err(err) => {
                tracing::warn!("Rebalance targets for {} failed: {}", portfolio_id, err);
                self.notifier.notify(Notification::error("Error fetching rebalance stocks"));
                None
            }
        }
    }

    /// Quotes every symbol that needs an order, then rewrites the draft.
    pub async fn apply_rebalance(&self, draft: &mut PortfolioDraft, plan: &[RebalanceRow]) {
        let symbols: Vec<&str> = plan
            .iter()
            .filter(|r| r.needs_order())
            .map(|r| r.stock_symbol.as_str())
            .collect();

        let quotes = join_all(symbols.iter().map(|s| self.backend.fetch_stock(s))).await;

        let quotes: HashMap<String, StockAnalytics> = symbols
            .iter()
            .zip(quotes)
            .filter_map(|(symbol, quote)| match quote {
                Ok(stock) => Some((symbol.to_string(), stock)),
                Err(err) => {
                    tracing::warn!("Quote for {} failed: {}", symbol, err);
                    self.notifier.notify(Notification::error("Error fetching stock"));
                    None
                }
            })
            .collect();

        draft.apply_rebalance(plan, &quotes);
    }

    pub async fn create_portfolio(
        &self,
        session: &SessionContext,
        draft: &PortfolioDraft,
    ) -> Result<bool, AppError> {
        let request = draft.create_request(session)?;
        let outcome = self.backend.create_portfolio(&request).await;
        Ok(self.report(outcome, "Portfolio created successfully", "Error creating portfolio"))
    }

    pub async fn update_portfolio(
        &self,
        portfolio_id: &str,
        draft: &PortfolioDraft,
    ) -> Result<bool, AppError> {
        let request = draft.update_request()?;
        let outcome = self.backend.update_portfolio(portfolio_id, &request).await;
        Ok(self.report(outcome, "Portfolio updated successfully", "Error updating portfolio"))
    }

    pub async fn delete_portfolio(&self, session: &SessionContext, portfolio_id: &str) -> bool {
        match self.backend.delete_portfolio(session, portfolio_id).await {
            Ok(message) => {
                self.notifier.notify(Notification::success(message));
                true
            }
            Err(err) => {
                tracing::warn!("Deleting portfolio {} failed: {}", portfolio_id, err);
                self.notifier.notify(Notification::error("Failed to delete portfolio"));
                false
            }
        }
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    /// Unwraps a fetch result for a screen. Failures notify the user unless
    /// the screen has since moved on.
    fn accept<S: Default + Clone, T>(
        &self,
        view: &ViewSession<S>,
        ticket: RequestTicket,
        fetched: Result<T, BackendError>,
        failure: &str,
    ) -> Option<T> {
        match fetched {
            Ok(_) if !view.is_current(ticket) => {
                tracing::debug!("Dropping late response for generation {}", ticket.generation());
                None
            }
            Ok(value) => Some(value),
            Err(err) if !view.is_current(ticket) => {
                tracing::debug!("Ignoring failure for stale generation {}: {}", ticket.generation(), err);
                None
            }
            Err(err) => {
                tracing::warn!("{}: {}", failure, err);
                self.notifier.notify(Notification::error(failure));
                None
            }
        }
    }

    fn report(&self, outcome: Result<String, BackendError>, success: &str, failure: &str) -> bool {
        match outcome {
            Ok(_) => {
                self.notifier.notify(Notification::success(success));
                true
            }
            Err(err) => {
                tracing::warn!("{}: {}", failure, err);
                self.notifier.notify(Notification::error(failure));
                false
            }
        }
    }
}

fn whole_stock(view: &mut Option<StockAnalyticsView>) -> &mut Option<StockAnalyticsView> {
    view
}

fn left_stock(comparison: &mut StockComparison) -> &mut Option<StockAnalyticsView> {
    &mut comparison.left
}

fn right_stock(comparison: &mut StockComparison) -> &mut Option<StockAnalyticsView> {
    &mut comparison.right
}

fn whole_screen(screen: &mut PortfolioScreen) -> &mut PortfolioScreen {
    screen
}

fn left_screen(comparison: &mut PortfolioComparison) -> &mut PortfolioScreen {
    &mut comparison.left
}

fn right_screen(comparison: &mut PortfolioComparison) -> &mut PortfolioScreen {
    &mut comparison.right
}
