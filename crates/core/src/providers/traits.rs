use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::{Coin, MarketChart};

/// Trait abstraction for the upstream market-data feed.
///
/// The tracker only ever talks to the feed through this trait, so tests can
/// substitute a mock and a future upstream swap touches one implementation.
/// Implementations translate one page request into one HTTP call; they do
/// not retry and do not cache. Failures surface as `CoreError` carrying the
/// upstream message — turning that into state is the caller's job.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch one page of market snapshots, ordered by market cap descending.
    /// Pages are 1-based.
    async fn fetch_markets(&self, page: u32) -> Result<Vec<Coin>, CoreError>;

    /// Fetch the historical price series for one coin over the last `days`
    /// days. Consumed by detail views only.
    async fn fetch_market_chart(&self, coin_id: &str, days: u32)
        -> Result<MarketChart, CoreError>;
}
