pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use futures_util::future::join_all;

use config::{COINS_PER_PAGE, DISPLAY_INCREMENT, MAX_PAGE, MAX_SUGGESTIONS, STORAGE_KEY};
use errors::CoreError;
use models::{
    alert::{AlertDirection, PriceAlert},
    coin::{Coin, MarketChart},
    filters::{BasicFilter, RangeFilterKind, SortKey},
    holding::{HoldingStats, PortfolioTotals},
    state::{AppState, FetchStatus, UserData},
};
use providers::traits::MarketDataProvider;
use services::{
    portfolio_service::PortfolioService,
    query_service::{QueryService, Suggestion},
    refresh_service::{RefreshCoordinator, RefreshGate},
};
use storage::{adapter::StoreAdapter, kv::KeyValueStore};

/// Main entry point for the crypto tracker core library.
///
/// Owns the single state tree and everything needed to operate on it: the
/// market-data provider, the refresh coordinator and the persistence
/// adapter. All writes go through the action methods below; all reads are
/// pure derivations recomputed on demand.
#[must_use]
pub struct CryptoTracker {
    state: AppState,
    provider: Box<dyn MarketDataProvider>,
    query_service: QueryService,
    portfolio_service: PortfolioService,
    refresh: RefreshCoordinator,
    storage: StoreAdapter,
}

impl std::fmt::Debug for CryptoTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoTracker")
            .field("provider", &self.provider.name())
            .field("coins", &self.state.coins.len())
            .field("status", &self.state.status)
            .field("portfolio", &self.state.portfolio.len())
            .field("favorites", &self.state.favorites.len())
            .finish()
    }
}

impl CryptoTracker {
    /// Build a tracker, seeding the user-data fields (dark mode, range
    /// filters, favorites, portfolio, alerts) from the store. Loaded coins
    /// and pagination always start empty regardless of persisted data.
    pub fn new(provider: Box<dyn MarketDataProvider>, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_coordinator(provider, store, RefreshCoordinator::new())
    }

    /// Build with an explicit refresh coordinator (alternate cooldowns).
    pub fn with_coordinator(
        provider: Box<dyn MarketDataProvider>,
        store: Box<dyn KeyValueStore>,
        refresh: RefreshCoordinator,
    ) -> Self {
        let storage = StoreAdapter::new(store);
        let user: UserData = storage.load(STORAGE_KEY, UserData::default());
        Self {
            state: AppState::from_user_data(user),
            provider,
            query_service: QueryService::new(),
            portfolio_service: PortfolioService::new(),
            refresh,
            storage,
        }
    }

    /// Read-only view of the full state tree.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ── Search, filters & sorting ───────────────────────────────────

    /// Replace the search text verbatim — no trimming, no validation.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    /// Replace the display window size.
    pub fn set_display_count(&mut self, count: usize) {
        self.state.display_count = count;
    }

    /// Grow the display window by the fixed "load more" step.
    pub fn show_more(&mut self) {
        self.state.display_count += DISPLAY_INCREMENT;
    }

    pub fn set_filter(&mut self, filter: BasicFilter) {
        self.state.filter = filter;
    }

    /// Set the basic filter from a UI key; unrecognized keys degrade to
    /// pass-through.
    pub fn set_filter_key(&mut self, key: &str) {
        self.state.filter = BasicFilter::from_key(key);
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.state.sort_by = sort_by;
    }

    /// Set the sort order from a UI key; unrecognized keys leave the input
    /// order untouched.
    pub fn set_sort_key(&mut self, key: &str) {
        self.state.sort_by = SortKey::from_key(key);
    }

    /// Set one range-filter bound.
    pub fn set_range_filter(&mut self, kind: RangeFilterKind, value: f64) {
        self.state.range_filters.set(kind, value);
        self.persist();
    }

    /// Reset the basic filter, range bounds and favorites-only flag.
    /// The search text survives.
    pub fn clear_filters(&mut self) {
        self.state.filter = BasicFilter::All;
        self.state.range_filters = Default::default();
        self.state.show_favorites_only = false;
    }

    // ── Favorites & dark mode ───────────────────────────────────────

    pub fn toggle_dark_mode(&mut self) {
        self.state.dark_mode = !self.state.dark_mode;
        self.persist();
    }

    pub fn toggle_show_favorites(&mut self) {
        self.state.show_favorites_only = !self.state.show_favorites_only;
    }

    /// Toggle a coin in/out of the favorites set.
    pub fn toggle_favorite(&mut self, coin_id: &str) {
        match self.state.favorites.iter().position(|id| id == coin_id) {
            Some(idx) => {
                self.state.favorites.remove(idx);
            }
            None => self.state.favorites.push(coin_id.to_string()),
        }
        self.persist();
    }

    #[must_use]
    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.state.favorites.iter().any(|id| id == coin_id)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Add a position, merging into an existing holding for the same coin
    /// by amount-weighted average purchase price. Non-positive or
    /// non-finite amount/price makes this a no-op — never a partial write.
    pub fn add_to_portfolio(&mut self, coin_id: &str, symbol: &str, amount: f64, price: f64) {
        self.portfolio_service.add(
            &mut self.state.portfolio,
            coin_id,
            symbol,
            amount,
            price,
            Utc::now(),
        );
        self.persist();
    }

    pub fn remove_from_portfolio(&mut self, coin_id: &str) {
        self.portfolio_service
            .remove(&mut self.state.portfolio, coin_id);
        self.persist();
    }

    /// Overwrite the amount of an existing holding; unknown coins are a
    /// no-op.
    pub fn update_portfolio_amount(&mut self, coin_id: &str, amount: f64) {
        self.portfolio_service
            .update_amount(&mut self.state.portfolio, coin_id, amount);
        self.persist();
    }

    // ── Price alerts ────────────────────────────────────────────────

    /// Create an alert. The id is derived from the creation timestamp,
    /// bumped until unique. Non-positive or non-finite target price makes
    /// this a no-op. No component evaluates alerts against live prices;
    /// they are stored bookkeeping only.
    pub fn add_price_alert(&mut self, coin_id: &str, target_price: f64, direction: AlertDirection) {
        if !target_price.is_finite() || target_price <= 0.0 {
            return;
        }
        let now = Utc::now();
        let id = self.next_alert_id(now.timestamp_millis());
        self.state.notifications.push(PriceAlert {
            id,
            coin_id: coin_id.to_string(),
            target_price,
            direction,
            enabled: true,
            created: now,
        });
        self.persist();
    }

    pub fn remove_price_alert(&mut self, alert_id: &str) {
        self.state.notifications.retain(|a| a.id != alert_id);
        self.persist();
    }

    /// Flip an alert's enabled flag; unknown ids are a no-op.
    pub fn toggle_price_alert(&mut self, alert_id: &str) {
        if let Some(alert) = self
            .state
            .notifications
            .iter_mut()
            .find(|a| a.id == alert_id)
        {
            alert.enabled = !alert.enabled;
        }
        self.persist();
    }

    fn next_alert_id(&self, creation_ms: i64) -> String {
        let mut candidate = creation_ms;
        while self
            .state
            .notifications
            .iter()
            .any(|a| a.id == candidate.to_string())
        {
            candidate += 1;
        }
        candidate.to_string()
    }

    // ── Fetching & pagination ───────────────────────────────────────

    /// Stamp `last_updated` with the current time.
    pub fn set_last_updated(&mut self) {
        self.state.last_updated = Some(Utc::now());
    }

    /// Rewind to page 1 and drop all loaded coins. Used before a
    /// non-append refresh.
    pub fn reset_pagination(&mut self) {
        self.state.current_page = 1;
        self.state.has_more_pages = true;
        self.state.coins.clear();
        self.state.total_coins_loaded = 0;
    }

    /// Phase 1 of a fetch: mark the in-flight state. An append fetch only
    /// raises `loading_more`; a replace fetch transitions to `Loading`.
    pub fn begin_fetch(&mut self, append: bool) {
        if append {
            self.state.loading_more = true;
        } else {
            self.state.status = FetchStatus::Loading;
        }
    }

    /// Phase 2a: apply one completed page. Append concatenates at the
    /// tail; replace swaps the loaded set wholesale. Completions may be
    /// applied in any order — each one stands alone, keyed only by its own
    /// `page`/`append` arguments, and identical concurrent requests are
    /// NOT de-duplicated.
    pub fn apply_fetch_success(&mut self, page: u32, append: bool, data: Vec<Coin>) {
        let full_page = data.len() >= COINS_PER_PAGE;
        if append {
            self.state.coins.extend(data);
            self.state.loading_more = false;
        } else {
            self.state.coins = data;
            self.state.status = FetchStatus::Succeeded;
        }
        self.state.current_page = page;
        self.state.total_coins_loaded = self.state.coins.len();
        self.state.has_more_pages = full_page;
        self.state.last_updated = Some(Utc::now());
        self.state.error = None;
    }

    /// Phase 2b: apply one failed fetch. Append failures only clear the
    /// `loading_more` flag; replace failures transition to `Failed`. The
    /// message is recorded either way.
    pub fn apply_fetch_failure(&mut self, append: bool, message: &str) {
        if append {
            self.state.loading_more = false;
        } else {
            self.state.status = FetchStatus::Failed;
        }
        self.state.error = Some(message.to_string());
    }

    /// Fetch one page from the provider and fold the outcome into state.
    /// The error is recorded in state as well as returned, so callers may
    /// ignore the result.
    pub async fn fetch_coins(&mut self, page: u32, append: bool) -> Result<(), CoreError> {
        self.begin_fetch(append);
        match self.provider.fetch_markets(page).await {
            Ok(data) => {
                self.apply_fetch_success(page, append, data);
                Ok(())
            }
            Err(e) => {
                self.apply_fetch_failure(append, &e.to_string());
                Err(e)
            }
        }
    }

    /// Append the next page, if there is one and no append is already in
    /// flight. Returns whether a fetch was issued.
    pub async fn fetch_next_page(&mut self) -> Result<bool, CoreError> {
        if !self.state.has_more_pages || self.state.loading_more {
            return Ok(false);
        }
        let page = self.state.current_page + 1;
        self.fetch_coins(page, true).await?;
        Ok(true)
    }

    /// Gated non-append reload: refused inside the cooldown window with the
    /// remaining wait, otherwise resets pagination and re-fetches page 1.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        match self.refresh.try_refresh() {
            RefreshGate::CoolingDown(remaining) => Err(CoreError::CooldownActive {
                remaining_secs: remaining.as_secs_f64().ceil() as u64,
            }),
            RefreshGate::Allowed => {
                self.reset_pagination();
                self.fetch_coins(1, false).await
            }
        }
    }

    /// Bulk-load up to `pages` further pages concurrently to grow the
    /// local coin universe for better search coverage. Page requests are
    /// capped at page 50; completions are applied in whatever order the
    /// I/O resolves, which can interleave pages out of numeric order —
    /// accepted, not corrected. Returns the number of pages that loaded.
    pub async fn turbo_load(&mut self, pages: u32) -> Result<usize, CoreError> {
        if !self.state.has_more_pages || self.state.loading_more {
            return Ok(0);
        }
        if let RefreshGate::CoolingDown(remaining) = self.refresh.try_turbo() {
            return Err(CoreError::CooldownActive {
                remaining_secs: remaining.as_secs_f64().ceil() as u64,
            });
        }

        let start = self.state.current_page;
        let requested: Vec<u32> = (1..=pages)
            .map(|i| start + i)
            .filter(|&p| p <= MAX_PAGE)
            .collect();
        if requested.is_empty() {
            return Ok(0);
        }

        self.state.loading_more = true;
        let futures = requested.iter().map(|&p| self.provider.fetch_markets(p));
        let results = join_all(futures).await;

        let mut loaded = 0;
        for (&page, result) in requested.iter().zip(results) {
            match result {
                Ok(data) => {
                    self.apply_fetch_success(page, true, data);
                    loaded += 1;
                }
                Err(e) => self.apply_fetch_failure(true, &e.to_string()),
            }
        }

        self.refresh
            .complete_turbo(self.state.total_coins_loaded);
        Ok(loaded)
    }

    /// Historical price series for one coin, for detail views. Pure
    /// passthrough — the result is not folded into state.
    pub async fn fetch_coin_history(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, CoreError> {
        self.provider.fetch_market_chart(coin_id, days).await
    }

    // ── Refresh gate inspection ─────────────────────────────────────

    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh.can_refresh()
    }

    #[must_use]
    pub fn can_turbo(&self) -> bool {
        self.refresh.can_turbo()
    }

    /// Seconds until the next non-append refresh is allowed.
    #[must_use]
    pub fn refresh_remaining_secs(&self) -> u64 {
        self.refresh.refresh_remaining().as_secs_f64().ceil() as u64
    }

    // ── Derived views ───────────────────────────────────────────────

    /// The filtered and sorted coin sequence, in full.
    #[must_use]
    pub fn filtered_coins(&self) -> Vec<&Coin> {
        self.query_service.filtered_coins(&self.state)
    }

    /// The first `display_count` coins of the filtered+sorted sequence.
    #[must_use]
    pub fn visible_coins(&self) -> Vec<&Coin> {
        self.query_service.visible_coins(&self.state)
    }

    /// Search-box suggestions over the loaded coin set.
    #[must_use]
    pub fn search_suggestions(&self, query: &str) -> Vec<Suggestion> {
        self.query_service
            .suggestions(&self.state.coins, query, MAX_SUGGESTIONS)
    }

    /// Look up a loaded coin by id.
    #[must_use]
    pub fn coin(&self, coin_id: &str) -> Option<&Coin> {
        self.state.coins.iter().find(|c| c.id == coin_id)
    }

    /// Valuation of one holding; `None` when there is no such holding or
    /// its coin is not currently loaded.
    #[must_use]
    pub fn holding_stats(&self, coin_id: &str) -> Option<HoldingStats> {
        let holding = self.state.portfolio.iter().find(|h| h.coin_id == coin_id)?;
        self.portfolio_service
            .holding_stats(holding, self.coin(coin_id))
    }

    /// Total market value of the portfolio against loaded prices.
    #[must_use]
    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_service
            .portfolio_value(&self.state.portfolio, &self.state.coins)
    }

    /// Total unrealized profit/loss against loaded prices.
    #[must_use]
    pub fn portfolio_pnl(&self) -> f64 {
        self.portfolio_service
            .portfolio_pnl(&self.state.portfolio, &self.state.coins)
    }

    /// Aggregate portfolio totals for the header summary.
    #[must_use]
    pub fn portfolio_totals(&self) -> PortfolioTotals {
        self.portfolio_service
            .totals(&self.state.portfolio, &self.state.coins)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Write-through of the persisted user-data subset. Best-effort: a
    /// failed save is logged by the adapter and never blocks the mutation
    /// that triggered it.
    fn persist(&mut self) {
        let data = self.state.user_data();
        self.storage.save(STORAGE_KEY, &data);
    }
}
