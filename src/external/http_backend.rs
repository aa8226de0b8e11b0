use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::external::backend::{rebalance_targets, AnalyticsBackend, BackendError};
use crate::models::{
    CreatePortfolio, HistoryInterval, LabeledSeries, Portfolio, PortfolioSummary, StockAnalytics,
    StockListing, UpdatePortfolio,
};
use crate::state::SessionContext;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
        })
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Network(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let resp = check_status(resp, &url).await?;

        resp.json::<T>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn read_text(resp: Response, url: &Url) -> Result<String, BackendError> {
        let resp = check_status(resp, url).await?;
        resp.text()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

async fn check_status(resp: Response, url: &Url) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(url.path().to_string()));
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::warn!("{} returned {}: {}", url, status, body);
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn fetch_stock(&self, symbol: &str) -> Result<StockAnalytics, BackendError> {
        self.get_json(&["findStockByStockSymbol", symbol]).await
    }

    async fn list_stocks(&self) -> Result<Vec<StockListing>, BackendError> {
        self.get_json(&["findAllStocks"]).await
    }

    async fn fetch_portfolio(&self, portfolio_id: &str) -> Result<Portfolio, BackendError> {
        self.get_json(&["getPortfolio", portfolio_id]).await
    }

    async fn list_portfolios(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PortfolioSummary>, BackendError> {
        // The backend answers 404 when the user has no portfolios yet.
        match self
            .get_json(&["getPortfolios", session.user_email.as_str()])
            .await
        {
            Err(BackendError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    async fn fetch_history(
        &self,
        portfolio_id: &str,
        interval: HistoryInterval,
    ) -> Result<LabeledSeries, BackendError> {
        self.get_json(&[
            "api",
            "v1",
            "portfolios",
            portfolio_id,
            "historicalPricePercentageChange",
            interval.as_path(),
        ])
        .await
    }

    async fn fetch_rebalance_targets(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<(String, u32)>, BackendError> {
        let series: LabeledSeries = self
            .get_json(&["api", "v1", "portfolios", portfolio_id, "rebalancedPortfolio"])
            .await?;
        rebalance_targets(&series)
    }

    async fn create_portfolio(&self, request: &CreatePortfolio) -> Result<String, BackendError> {
        let url = self.endpoint(&["createPortfolios"])?;
        tracing::info!("Creating portfolio {:?}", request.portfolio_name);

        let resp = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::read_text(resp, &url).await
    }

    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        request: &UpdatePortfolio,
    ) -> Result<String, BackendError> {
        let url = self.endpoint(&[portfolio_id, "edit"])?;
        tracing::info!("Updating portfolio {}", portfolio_id);

        let resp = self
            .client
            .put(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::read_text(resp, &url).await
    }

    async fn delete_portfolio(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<String, BackendError> {
        let url = self.endpoint(&["delete", portfolio_id, session.user_email.as_str()])?;
        tracing::info!("Deleting portfolio {}", portfolio_id);

        let resp = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Self::read_text(resp, &url).await
    }
}
