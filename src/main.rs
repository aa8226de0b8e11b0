use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;

use rustfolio_view::config::ClientConfig;
use rustfolio_view::external::http_backend::HttpBackend;
use rustfolio_view::logging::{init_logging, LoggingConfig};
use rustfolio_view::models::{
    PortfolioComparison, PortfolioScreen, StockAnalyticsView, StockComparison,
};
use rustfolio_view::services::notification_service::LogNotifier;
use rustfolio_view::services::view_service::ViewService;
use rustfolio_view::state::ViewSession;

const USAGE: &str = "usage: rustfolio-view <command>

commands:
  stock <SYMBOL>           stock analytics tables
  stock <SYMBOL> <SYMBOL>  two stocks side by side
  portfolio <ID>           portfolio analytics, allocation and history
  compare <ID> <ID>        two portfolios side by side
  portfolios               portfolios of USER_EMAIL";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let logging = LoggingConfig::from_env().map_err(anyhow::Error::msg)?;
    init_logging(&logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::info!("Using backend {}", config.backend_url);

    let backend = HttpBackend::new(&config).context("failed to build HTTP client")?;
    let service = ViewService::new(Arc::new(backend), Arc::new(LogNotifier));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["stock", symbol] => {
            let view = ViewSession::<Option<StockAnalyticsView>>::new();
            service.load_stock(&view, symbol).await?;
            print_json(&view.snapshot())?;
        }
        ["stock", left, right] => {
            let view = ViewSession::<StockComparison>::new();
            service.load_stock_comparison(&view, left, right).await?;
            print_json(&view.snapshot())?;
        }
        ["portfolio", id] => {
            let view = ViewSession::<PortfolioScreen>::new();
            service.load_portfolio(&view, id).await?;
            print_json(&view.snapshot())?;
        }
        ["compare", left, right] => {
            let view = ViewSession::<PortfolioComparison>::new();
            service.load_portfolio_comparison(&view, left, right).await?;
            print_json(&view.snapshot())?;
        }
        ["portfolios"] => {
            let Some(session) = config.session() else {
                bail!("USER_EMAIL must be set to list portfolios");
            };
            let options = service.portfolio_options(&session).await;
            print_json(&options)?;
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
