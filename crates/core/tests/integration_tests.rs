// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full dashboard flows through the CryptoTracker
// facade: fetch → filter → portfolio → alerts → restart
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::alert::AlertDirection;
use crypto_tracker_core::models::coin::{Coin, MarketChart};
use crypto_tracker_core::models::filters::{BasicFilter, SortKey};
use crypto_tracker_core::models::state::FetchStatus;
use crypto_tracker_core::providers::traits::MarketDataProvider;
use crypto_tracker_core::services::refresh_service::RefreshCoordinator;
use crypto_tracker_core::storage::kv::{FileStore, MemoryStore};
use crypto_tracker_core::CryptoTracker;

fn market_coin(id: &str, name: &str, symbol: &str, price: f64, market_cap: f64) -> Coin {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "symbol": symbol,
        "name": name,
        "current_price": price,
        "market_cap": market_cap,
        "total_volume": 1_000_000.0,
        "price_change_percentage_24h": 1.5,
    }))
    .unwrap()
}

/// A small but realistic top-of-market page.
fn market_page() -> Vec<Coin> {
    vec![
        market_coin("bitcoin", "Bitcoin", "btc", 67_000.0, 1.3e12),
        market_coin("ethereum", "Ethereum", "eth", 3_500.0, 4.2e11),
        market_coin("tether", "Tether", "usdt", 1.0, 1.1e11),
        market_coin("solana", "Solana", "sol", 150.0, 7.0e10),
        market_coin("dogecoin", "Dogecoin", "doge", 0.12, 1.7e10),
    ]
}

struct FixtureProvider {
    pages: HashMap<u32, Vec<Coin>>,
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "Fixture"
    }

    async fn fetch_markets(&self, page: u32) -> Result<Vec<Coin>, CoreError> {
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        _days: u32,
    ) -> Result<MarketChart, CoreError> {
        if coin_id == "bitcoin" {
            Ok(MarketChart {
                prices: vec![(1.0, 66_000.0), (2.0, 67_000.0)],
                ..MarketChart::default()
            })
        } else {
            Err(CoreError::Api {
                provider: "Fixture".into(),
                message: format!("no history for {coin_id}"),
            })
        }
    }
}

fn fixture_tracker() -> CryptoTracker {
    let provider = FixtureProvider {
        pages: HashMap::from([(1, market_page())]),
    };
    CryptoTracker::new(Box::new(provider), Box::new(MemoryStore::new()))
}

#[tokio::test]
async fn fetch_then_query_then_display() {
    let mut tracker = fixture_tracker();
    tracker.fetch_coins(1, false).await.unwrap();
    assert_eq!(tracker.state().status, FetchStatus::Succeeded);
    // 5 < page size → the universe is exhausted.
    assert!(!tracker.state().has_more_pages);

    // Default sort is market cap descending.
    let ids: Vec<&str> = tracker.filtered_coins().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids[0], "bitcoin");
    assert_eq!(ids[4], "dogecoin");

    // Search narrows, case-insensitively.
    tracker.set_search("SOL");
    let ids: Vec<&str> = tracker.filtered_coins().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["solana"]);

    // Clearing filters keeps the search.
    tracker.set_filter(BasicFilter::LowPrice);
    tracker.clear_filters();
    assert_eq!(tracker.state().search, "SOL");

    tracker.set_search("");
    tracker.set_sort_by(SortKey::NameAsc);
    let names: Vec<&str> = tracker
        .filtered_coins()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Bitcoin", "Dogecoin", "Ethereum", "Solana", "Tether"]
    );
}

#[tokio::test]
async fn portfolio_lifecycle_with_live_valuation() {
    let mut tracker = fixture_tracker();
    tracker.fetch_coins(1, false).await.unwrap();

    tracker.add_to_portfolio("bitcoin", "btc", 0.5, 60_000.0);
    tracker.add_to_portfolio("ethereum", "eth", 10.0, 3_000.0);
    // A coin the feed no longer carries: priced at zero, not an error.
    tracker.add_to_portfolio("delisted", "dlx", 1_000.0, 0.5);

    // bitcoin: 0.5 × 67 000 = 33 500; ethereum: 10 × 3 500 = 35 000
    let totals = tracker.portfolio_totals();
    assert_eq!(totals.total_value, 68_500.0);
    // pnl: (33 500 − 30 000) + (35 000 − 30 000) = 8 500
    assert_eq!(totals.total_pnl, 8_500.0);
    assert!((totals.total_pnl_percentage - 8_500.0 / 60_000.0 * 100.0).abs() < 1e-9);

    let stats = tracker.holding_stats("bitcoin").unwrap();
    assert_eq!(stats.current_price, 67_000.0);
    assert_eq!(stats.pnl, 3_500.0);
    assert!(tracker.holding_stats("delisted").is_none());

    // Merging keeps one row per coin.
    tracker.add_to_portfolio("bitcoin", "btc", 0.5, 70_000.0);
    assert_eq!(tracker.state().portfolio.len(), 3);
    assert_eq!(tracker.state().portfolio[0].amount, 1.0);
    assert_eq!(tracker.state().portfolio[0].purchase_price, 65_000.0);
}

#[tokio::test]
async fn favorites_drive_the_visible_grid() {
    let mut tracker = fixture_tracker();
    tracker.fetch_coins(1, false).await.unwrap();

    tracker.toggle_favorite("solana");
    tracker.toggle_favorite("dogecoin");
    tracker.toggle_show_favorites();

    let ids: Vec<&str> = tracker.visible_coins().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["solana", "dogecoin"]);

    tracker.toggle_favorite("solana");
    let ids: Vec<&str> = tracker.visible_coins().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["dogecoin"]);
}

#[tokio::test]
async fn suggestions_come_from_the_loaded_universe() {
    let mut tracker = fixture_tracker();
    tracker.fetch_coins(1, false).await.unwrap();

    let suggestions = tracker.search_suggestions("et");
    // "Tether" (contains) and "Ethereum" (symbol prefix "eth") — the
    // symbol-prefix match ranks first.
    assert_eq!(suggestions[0].id, "ethereum");
    assert!(suggestions.iter().any(|s| s.id == "tether"));
}

#[tokio::test]
async fn alerts_are_bookkeeping_only() {
    let mut tracker = fixture_tracker();
    tracker.fetch_coins(1, false).await.unwrap();

    tracker.add_price_alert("bitcoin", 70_000.0, AlertDirection::Above);
    let alert_id = tracker.state().notifications[0].id.clone();

    // Prices move (a refreshed page), alerts do nothing by themselves.
    tracker.apply_fetch_success(1, false, market_page());
    assert!(tracker.state().notifications[0].enabled);
    assert_eq!(tracker.state().notifications.len(), 1);

    tracker.toggle_price_alert(&alert_id);
    assert!(!tracker.state().notifications[0].enabled);
}

#[tokio::test]
async fn restart_restores_user_data_but_not_market_data() {
    let dir = tempfile::tempdir().unwrap();

    {
        let provider = FixtureProvider {
            pages: HashMap::from([(1, market_page())]),
        };
        let store = FileStore::new(dir.path()).unwrap();
        let mut tracker = CryptoTracker::new(Box::new(provider), Box::new(store));
        tracker.fetch_coins(1, false).await.unwrap();
        tracker.toggle_dark_mode();
        tracker.toggle_favorite("bitcoin");
        tracker.add_to_portfolio("bitcoin", "btc", 0.25, 64_000.0);
        tracker.add_price_alert("ethereum", 4_000.0, AlertDirection::Above);
    }

    let provider = FixtureProvider {
        pages: HashMap::from([(1, market_page())]),
    };
    let store = FileStore::new(dir.path()).unwrap();
    let tracker = CryptoTracker::new(Box::new(provider), Box::new(store));

    let state = tracker.state();
    assert!(state.dark_mode);
    assert_eq!(state.favorites, vec!["bitcoin".to_string()]);
    assert_eq!(state.portfolio.len(), 1);
    assert_eq!(state.notifications.len(), 1);

    // Market data never survives a restart.
    assert!(state.coins.is_empty());
    assert_eq!(state.status, FetchStatus::Idle);
    assert_eq!(state.current_page, 1);
    assert!(state.last_updated.is_none());
}

#[tokio::test]
async fn refresh_gate_holds_across_the_whole_flow() {
    let provider = FixtureProvider {
        pages: HashMap::from([(1, market_page())]),
    };
    let coordinator = RefreshCoordinator::with_config(
        Duration::from_secs(120),
        Duration::from_secs(120),
        500,
    );
    let mut tracker = CryptoTracker::with_coordinator(
        Box::new(provider),
        Box::new(MemoryStore::new()),
        coordinator,
    );

    tracker.refresh().await.unwrap();
    assert_eq!(tracker.state().coins.len(), 5);
    assert!(!tracker.can_refresh());
    assert!(tracker.refresh_remaining_secs() > 0);

    let err = tracker.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::CooldownActive { .. }));
    // The refused attempt left everything in place.
    assert_eq!(tracker.state().coins.len(), 5);
    assert_eq!(tracker.state().status, FetchStatus::Succeeded);
}

#[tokio::test]
async fn detail_history_flows_past_the_state() {
    let tracker = fixture_tracker();
    let chart = tracker.fetch_coin_history("bitcoin", 30).await.unwrap();
    assert_eq!(chart.latest_price(), Some(67_000.0));

    let err = tracker.fetch_coin_history("unknown", 30).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));
    assert!(tracker.state().error.is_none());
}
