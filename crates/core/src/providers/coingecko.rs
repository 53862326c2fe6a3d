use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::{COINS_PER_PAGE, REQUEST_TIMEOUT};
use crate::errors::CoreError;
use crate::models::coin::{Coin, MarketChart};

use super::traits::MarketDataProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API provider for cryptocurrency market data.
///
/// - **Free tier**: no API key, but aggressively rate limited — the refresh
///   coordinator is expected to pre-empt most 429s.
/// - **Endpoints**: `/coins/markets` (paginated grid feed) and
///   `/coins/{id}/market_chart` (per-coin history for detail views).
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different base URL (test servers, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Map a non-success HTTP status to the error taxonomy. 429 gets its
    /// own variant so callers can tell "slow down" from "broken".
    fn status_error(&self, status: StatusCode, url: &str) -> CoreError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            CoreError::RateLimited {
                provider: self.name().to_string(),
            }
        } else {
            // Strip the query string; the path is enough to identify the call.
            let path = url.split('?').next().unwrap_or(url);
            CoreError::Api {
                provider: self.name().to_string(),
                message: format!("HTTP {status} from {path}"),
            }
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn fetch_markets(&self, page: u32) -> Result<Vec<Coin>, CoreError> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page={}&sparkline=false",
            self.base_url, COINS_PER_PAGE, page
        );

        let started = Instant::now();
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.status_error(status, &url));
        }

        let coins: Vec<Coin> = resp.json().await.map_err(|e| CoreError::Api {
            provider: self.name().to_string(),
            message: format!("Failed to parse markets page {page}: {e}"),
        })?;

        debug!(
            page,
            coins = coins.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched markets page"
        );

        Ok(coins)
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, CoreError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}",
            self.base_url, coin_id, days
        );

        let started = Instant::now();
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.status_error(status, &url));
        }

        let chart: MarketChart = resp.json().await.map_err(|e| CoreError::Api {
            provider: self.name().to_string(),
            message: format!("Failed to parse market chart for {coin_id}: {e}"),
        })?;

        debug!(
            coin_id,
            days,
            points = chart.prices.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched market chart"
        );

        Ok(chart)
    }
}
