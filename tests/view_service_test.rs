/// View service integration tests
///
/// Drives the public API against an in-memory backend: concurrent screen
/// loads, failure notifications, late-response handling, rebalancing and
/// portfolio submission.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use rustfolio_view::errors::AppError;
use rustfolio_view::external::backend::{AnalyticsBackend, BackendError};
use rustfolio_view::models::{
    CreatePortfolio, HistoryInterval, LabeledSeries, Portfolio, PortfolioComparison,
    PortfolioScreen, PortfolioSummary, StockAnalytics, StockAnalyticsView, StockComparison,
    StockListing, UpdatePortfolio, VolatilityCell,
};
use rustfolio_view::services::notification_service::{NotificationLevel, NotificationQueue};
use rustfolio_view::services::portfolio_service::PortfolioDraft;
use rustfolio_view::services::view_service::ViewService;
use rustfolio_view::state::{SessionContext, ViewSession};

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeBackend {
    stocks: HashMap<String, StockAnalytics>,
    portfolios: HashMap<String, Portfolio>,
    monthly: HashMap<String, LabeledSeries>,
    daily: HashMap<String, LabeledSeries>,
    summaries: Vec<PortfolioSummary>,
    targets: Vec<(String, u32)>,
    // Portfolio fetches for this id wait until `release` is notified.
    slow_id: Option<String>,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

fn missing(what: &str) -> BackendError {
    BackendError::NotFound(what.to_string())
}

#[async_trait]
impl AnalyticsBackend for FakeBackend {
    async fn fetch_stock(&self, symbol: &str) -> Result<StockAnalytics, BackendError> {
        self.stocks.get(symbol).cloned().ok_or_else(|| missing(symbol))
    }

    async fn list_stocks(&self) -> Result<Vec<StockListing>, BackendError> {
        Err(BackendError::Network("connection refused".to_string()))
    }

    async fn fetch_portfolio(&self, portfolio_id: &str) -> Result<Portfolio, BackendError> {
        if self.slow_id.as_deref() == Some(portfolio_id) {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.portfolios.get(portfolio_id).cloned().ok_or_else(|| missing(portfolio_id))
    }

    async fn list_portfolios(
        &self,
        _session: &SessionContext,
    ) -> Result<Vec<PortfolioSummary>, BackendError> {
        Ok(self.summaries.clone())
    }

    async fn fetch_history(
        &self,
        portfolio_id: &str,
        interval: HistoryInterval,
    ) -> Result<LabeledSeries, BackendError> {
        let histories = match interval {
            HistoryInterval::Monthly => &self.monthly,
            HistoryInterval::Daily => &self.daily,
        };
        histories.get(portfolio_id).cloned().ok_or_else(|| missing(portfolio_id))
    }

    async fn fetch_rebalance_targets(
        &self,
        _portfolio_id: &str,
    ) -> Result<Vec<(String, u32)>, BackendError> {
        Ok(self.targets.clone())
    }

    async fn create_portfolio(&self, request: &CreatePortfolio) -> Result<String, BackendError> {
        Ok(format!("Portfolio {} created", request.portfolio_name))
    }

    async fn update_portfolio(
        &self,
        _portfolio_id: &str,
        _request: &UpdatePortfolio,
    ) -> Result<String, BackendError> {
        Err(BackendError::Status { status: 500, body: "boom".to_string() })
    }

    async fn delete_portfolio(
        &self,
        _session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<String, BackendError> {
        Ok(format!("Portfolio {portfolio_id} deleted"))
    }
}

fn portfolio(id: &str, name: &str) -> Portfolio {
    serde_json::from_value(serde_json::json!({
        "portfolioId": id,
        "portfolioName": name,
        "capitalAmount": 100,
        "stockList": [
            {"stockSymbol": "KO", "qty": 4, "currentStockPrice": 10.005}
        ],
        "combinedStockList": [
            {"stockSymbol": "KO", "qty": 4, "avgStockPrice": "10.00"}
        ],
        "percentAllocated": {"KO": 1.0},
        "annualReturn": {"2021": 1.0, "2022": 2.0, "2023": 3.0},
        "annualizedReturn": {"10 years": 8.0, "1 year": 12.345},
        "annualizedVolatilityDays": {"1 week": 1.0, "3 months": 2.5}
    }))
    .unwrap()
}

fn stock(symbol: &str, price: f64) -> StockAnalytics {
    serde_json::from_value(serde_json::json!({
        "stockSymbol": symbol,
        "stockName": format!("{symbol} Inc"),
        "currentStockPrice": price,
        "annualReturn": {"2019": 1.5, "2020": -3.25, "2021": 4.0, "2022": 0.5,
                         "2023": 7.125, "2024": 2.0, "2025": 1.0},
        "annualizedVolatilityDays": {"1 month": 7.891}
    }))
    .unwrap()
}

fn series(pairs: &[(&str, f64)]) -> LabeledSeries {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

fn service(backend: FakeBackend) -> (ViewService, Arc<NotificationQueue>) {
    let queue = Arc::new(NotificationQueue::new());
    (ViewService::new(Arc::new(backend), queue.clone()), queue)
}

// ---------------------------------------------------------------------------
// Stocks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_stock_screen_builds_tables() {
    let mut backend = FakeBackend::default();
    backend.stocks.insert("AAPL".to_string(), stock("AAPL", 190.0));
    let (service, queue) = service(backend);

    let view = ViewSession::<Option<StockAnalyticsView>>::new();
    service.load_stock(&view, "AAPL").await.unwrap();

    let loaded = view.snapshot().expect("stock view applied");
    let window = &loaded.tables.annual_returns;
    assert_eq!(window.selected(), 5);
    assert_eq!(window.visible().first().map(|p| p.period.as_str()), Some("2021"));
    assert_eq!(
        loaded.tables.short_horizon_volatility[2].value,
        VolatilityCell::Value(7.89)
    );
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_missing_stock_notifies_and_keeps_screen_empty() {
    let (service, queue) = service(FakeBackend::default());

    let view = ViewSession::<Option<StockAnalyticsView>>::new();
    service.load_stock(&view, "NOPE").await.unwrap();

    assert!(view.snapshot().is_none());
    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].message, "Failed to fetch stock analytics data");
}

#[tokio::test]
async fn test_stock_comparison_fills_each_side_independently() {
    let mut backend = FakeBackend::default();
    backend.stocks.insert("AAPL".to_string(), stock("AAPL", 190.0));
    let (service, queue) = service(backend);

    let view = ViewSession::<StockComparison>::new();
    service.load_stock_comparison(&view, "AAPL", "NOPE").await.unwrap();

    let comparison = view.snapshot();
    assert_eq!(comparison.left.map(|s| s.stock_symbol), Some("AAPL".to_string()));
    assert!(comparison.right.is_none());
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_list_stocks_failure_is_empty() {
    let (service, queue) = service(FakeBackend::default());

    assert!(service.list_stocks().await.is_empty());
    assert_eq!(queue.drain()[0].message, "Error fetching stocks");
}

// ---------------------------------------------------------------------------
// Portfolios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_portfolio_screen_loads_all_parts() {
    let mut backend = FakeBackend::default();
    backend.portfolios.insert("p1".to_string(), portfolio("p1", "Growth"));
    backend.monthly.insert(
        "p1".to_string(),
        series(&[("2024-02-01", 2.0), ("2024-01-01", 1.0)]),
    );
    backend.daily.insert("p1".to_string(), series(&[("2024-02-01", 2.0)]));
    let (service, queue) = service(backend);

    let view = ViewSession::<PortfolioScreen>::new();
    service.load_portfolio(&view, "p1").await.unwrap();

    let screen = view.snapshot();
    let analytics = screen.analytics.expect("portfolio applied");
    assert_eq!(analytics.portfolio_name, "Growth");
    assert_eq!(analytics.capital.placed_display, "40.02");
    assert_eq!(analytics.capital.available_display, "59.98");
    assert_eq!(analytics.symbol_allocation[0].share_pct, 100);

    // short series: one option, everything visible
    assert_eq!(analytics.tables.annual_returns.options().len(), 1);
    assert_eq!(analytics.tables.annual_returns.visible().len(), 3);

    let annualized = &analytics.tables.annualized_returns;
    assert_eq!((annualized[0].num_years, annualized[0].value), (1, 12.35));
    assert_eq!(annualized[1].num_years, 10);

    let monthly = screen.monthly_history.expect("monthly applied");
    assert!(monthly[0].date < monthly[1].date);
    assert_eq!(screen.daily_history.map(|d| d.len()), Some(1));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_history_failure_leaves_other_parts() {
    let mut backend = FakeBackend::default();
    backend.portfolios.insert("p1".to_string(), portfolio("p1", "Growth"));
    backend.daily.insert("p1".to_string(), series(&[("2024-02-01", 2.0)]));
    let (service, queue) = service(backend);

    let view = ViewSession::<PortfolioScreen>::new();
    service.load_portfolio(&view, "p1").await.unwrap();

    let screen = view.snapshot();
    assert!(screen.analytics.is_some());
    assert!(screen.daily_history.is_some());
    assert!(screen.monthly_history.is_none());

    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Failed to fetch historical price - monthly");
}

#[tokio::test]
async fn test_portfolio_comparison_loads_both_sides() {
    let mut backend = FakeBackend::default();
    backend.portfolios.insert("a".to_string(), portfolio("a", "Left"));
    backend.portfolios.insert("b".to_string(), portfolio("b", "Right"));
    for id in ["a", "b"] {
        backend.monthly.insert(id.to_string(), series(&[("2024-01-01", 1.0)]));
        backend.daily.insert(id.to_string(), series(&[("2024-01-02", 1.0)]));
    }
    let (service, queue) = service(backend);

    let view = ViewSession::<PortfolioComparison>::new();
    service.load_portfolio_comparison(&view, "a", "b").await.unwrap();

    let comparison = view.snapshot();
    let name = |screen: &PortfolioScreen| screen.analytics.as_ref().map(|a| a.portfolio_name.clone());
    assert_eq!(name(&comparison.left).as_deref(), Some("Left"));
    assert_eq!(name(&comparison.right).as_deref(), Some("Right"));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_malformed_label_is_an_error() {
    let mut bad = portfolio("p1", "Broken");
    bad.annualized_return = Some(series(&[("ytd", 1.0)]));

    let mut backend = FakeBackend::default();
    backend.portfolios.insert("p1".to_string(), bad);
    let (service, _queue) = service(backend);

    let view = ViewSession::<PortfolioScreen>::new();
    let result = service.load_portfolio(&view, "p1").await;

    assert!(matches!(result, Err(AppError::MalformedLabel { .. })));
    assert!(view.snapshot().analytics.is_none());
}

// ---------------------------------------------------------------------------
// Late responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_late_response_from_replaced_load_is_discarded() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let mut backend = FakeBackend::default();
    backend.portfolios.insert("slow".to_string(), portfolio("slow", "Stale"));
    backend.portfolios.insert("fast".to_string(), portfolio("fast", "Fresh"));
    backend.monthly.insert("slow".to_string(), series(&[("2023-01-01", 1.0)]));
    backend.monthly.insert(
        "fast".to_string(),
        series(&[("2024-01-01", 1.0), ("2024-02-01", 2.0)]),
    );
    for id in ["slow", "fast"] {
        backend.daily.insert(id.to_string(), series(&[("2024-01-01", 1.0)]));
    }
    backend.slow_id = Some("slow".to_string());
    backend.started = started.clone();
    backend.release = release.clone();
    let (service, queue) = service(backend);

    let view = ViewSession::<PortfolioScreen>::new();

    let slow = {
        let service = service.clone();
        let view = view.clone();
        tokio::spawn(async move { service.load_portfolio(&view, "slow").await })
    };
    started.notified().await;

    service.load_portfolio(&view, "fast").await.unwrap();
    release.notify_one();
    slow.await.unwrap().unwrap();

    let screen = view.snapshot();
    assert_eq!(screen.analytics.map(|a| a.portfolio_name).as_deref(), Some("Fresh"));
    assert_eq!(screen.monthly_history.map(|m| m.len()), Some(2));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_closed_screen_ignores_responses() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let mut backend = FakeBackend::default();
    backend.portfolios.insert("slow".to_string(), portfolio("slow", "Gone"));
    backend.monthly.insert("slow".to_string(), series(&[("2024-01-01", 1.0)]));
    backend.daily.insert("slow".to_string(), series(&[("2024-01-01", 1.0)]));
    backend.slow_id = Some("slow".to_string());
    backend.started = started.clone();
    backend.release = release.clone();
    let (service, queue) = service(backend);

    let view = ViewSession::<PortfolioScreen>::new();
    let load = {
        let service = service.clone();
        let view = view.clone();
        tokio::spawn(async move { service.load_portfolio(&view, "slow").await })
    };
    started.notified().await;

    view.close();
    release.notify_one();
    load.await.unwrap().unwrap();

    assert!(view.snapshot().analytics.is_none());
    assert!(queue.is_empty());
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_portfolio_options_list_names() {
    let mut backend = FakeBackend::default();
    backend.summaries = serde_json::from_str(
        r#"[{"portfolioId": "p1", "portfolioName": "Growth"},
            {"portfolioId": "p2", "portfolioName": "Income", "capitalAmount": 500}]"#,
    )
    .unwrap();
    let (service, _queue) = service(backend);

    let options = service
        .portfolio_options(&SessionContext::new("me@example.com"))
        .await;
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Growth", "Income"]);
    assert_eq!(options[1].value, "p2");
}

#[tokio::test]
async fn test_no_portfolios_is_informational() {
    let (service, queue) = service(FakeBackend::default());

    let options = service
        .portfolio_options(&SessionContext::new("me@example.com"))
        .await;
    assert!(options.is_empty());
    let notes = queue.drain();
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert_eq!(notes[0].message, "No portfolios found");
}

#[tokio::test]
async fn test_rebalance_replaces_lots_with_targets() {
    let mut backend = FakeBackend::default();
    backend.stocks.insert("KO".to_string(), stock("KO", 12.0));
    backend.targets = vec![("KO".to_string(), 6), ("MSFT".to_string(), 2)];
    let (service, queue) = service(backend);

    let loaded = portfolio("p1", "Growth");
    let plan = service.rebalance_plan(&loaded).await.expect("targets fetched");
    assert_eq!(plan[0].diff, Some(2));
    assert_eq!(plan[1].current, None);

    let mut draft = PortfolioDraft::from_portfolio(&loaded);
    service.apply_rebalance(&mut draft, &plan).await;

    assert!(draft.existing().is_empty());
    assert_eq!(draft.deleted().len(), 1);
    assert_eq!(draft.pending().len(), 1);
    assert_eq!(draft.pending()[0].qty, 6);
    assert_eq!(draft.pending()[0].current_stock_price, 12.0);
    assert_eq!(draft.allocation().placed_display, "72.00");

    // MSFT had no quote
    assert_eq!(queue.drain()[0].message, "Error fetching stock");
}

#[tokio::test]
async fn test_create_portfolio_submits_and_notifies() {
    let (service, queue) = service(FakeBackend::default());
    let draft = PortfolioDraft::new("Starter", 250.0);

    let sent = service
        .create_portfolio(&SessionContext::new("me@example.com"), &draft)
        .await
        .unwrap();

    assert!(sent);
    let notes = queue.drain();
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].message, "Portfolio created successfully");
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let (service, queue) = service(FakeBackend::default());
    let draft = PortfolioDraft::new("  ", 250.0);

    let result = service
        .create_portfolio(&SessionContext::new("me@example.com"), &draft)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_update_failure_notifies() {
    let (service, queue) = service(FakeBackend::default());
    let draft = PortfolioDraft::from_portfolio(&portfolio("p1", "Growth"));

    let sent = service.update_portfolio("p1", &draft).await.unwrap();

    assert!(!sent);
    assert_eq!(queue.drain()[0].message, "Error updating portfolio");
}

#[tokio::test]
async fn test_delete_reports_backend_message() {
    let (service, queue) = service(FakeBackend::default());

    assert!(service.delete_portfolio(&SessionContext::new("me@example.com"), "p1").await);
    assert_eq!(queue.drain()[0].message, "Portfolio p1 deleted");
}
