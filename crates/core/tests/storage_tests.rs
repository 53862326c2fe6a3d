// ═══════════════════════════════════════════════════════════════════
// Storage Tests — KeyValueStore impls, StoreAdapter, write-through
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use async_trait::async_trait;
use crypto_tracker_core::config::STORAGE_KEY;
use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::models::coin::{Coin, MarketChart};
use crypto_tracker_core::models::state::UserData;
use crypto_tracker_core::providers::traits::MarketDataProvider;
use crypto_tracker_core::storage::adapter::StoreAdapter;
use crypto_tracker_core::storage::kv::{FileStore, KeyValueStore, MemoryStore};
use crypto_tracker_core::CryptoTracker;

struct NullProvider;

#[async_trait]
impl MarketDataProvider for NullProvider {
    fn name(&self) -> &str {
        "NullProvider"
    }

    async fn fetch_markets(&self, _page: u32) -> Result<Vec<Coin>, CoreError> {
        Ok(Vec::new())
    }

    async fn fetch_market_chart(
        &self,
        _coin_id: &str,
        _days: u32,
    ) -> Result<MarketChart, CoreError> {
        Ok(MarketChart::default())
    }
}

fn tracker_over(dir: &std::path::Path) -> CryptoTracker {
    let store = FileStore::new(dir).unwrap();
    CryptoTracker::new(Box::new(NullProvider), Box::new(store))
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nothing").is_none());
    }

    #[test]
    fn remove_deletes_and_tolerates_missing() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
        store.remove("k").unwrap();
    }

    #[test]
    fn set_overwrites() {
        let mut store = MemoryStore::new();
        store.set("k", "old").unwrap();
        store.set("k", "new").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("new"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn roundtrip_within_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set("state", "{\"x\":1}").unwrap();
        assert_eq!(store.get("state").as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn separate_handles_share_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FileStore::new(dir.path()).unwrap();
        writer.set("state", "shared").unwrap();

        let reader = FileStore::new(dir.path()).unwrap();
        assert_eq!(reader.get("state").as_deref(), Some("shared"));
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.remove("never-written").unwrap();
    }

    #[test]
    fn creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let mut store = FileStore::new(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }
}

// ═══════════════════════════════════════════════════════════════════
// StoreAdapter
// ═══════════════════════════════════════════════════════════════════

mod adapter {
    use super::*;

    #[test]
    fn save_then_load_is_deep_equal() {
        let mut adapter = StoreAdapter::new(Box::new(MemoryStore::new()));
        let mut data = UserData::default();
        data.dark_mode = true;
        data.favorites = vec!["bitcoin".into(), "solana".into()];

        adapter.save("blob", &data);
        let loaded: UserData = adapter.load("blob", UserData::default());
        assert_eq!(loaded, data);
    }

    #[test]
    fn load_missing_key_returns_default() {
        let adapter = StoreAdapter::new(Box::new(MemoryStore::new()));
        let loaded: UserData = adapter.load("absent", UserData::default());
        assert_eq!(loaded, UserData::default());
    }

    #[test]
    fn load_corrupted_blob_returns_default() {
        let mut raw = MemoryStore::new();
        raw.set("blob", "{not json at all").unwrap();
        let adapter = StoreAdapter::new(Box::new(raw));
        let loaded: UserData = adapter.load("blob", UserData::default());
        assert_eq!(loaded, UserData::default());
    }

    #[test]
    fn load_wrong_shape_returns_default() {
        let mut raw = MemoryStore::new();
        raw.set("blob", "[1, 2, 3]").unwrap();
        let adapter = StoreAdapter::new(Box::new(raw));
        let loaded: UserData = adapter.load("blob", UserData::default());
        assert_eq!(loaded, UserData::default());
    }

    #[test]
    fn load_arbitrary_json_values() {
        let mut adapter = StoreAdapter::new(Box::new(MemoryStore::new()));
        let value = HashMap::from([("count".to_string(), 3u32)]);
        adapter.save("misc", &value);
        let loaded: HashMap<String, u32> = adapter.load("misc", HashMap::new());
        assert_eq!(loaded.get("count"), Some(&3));
    }

    #[test]
    fn remove_drops_the_blob() {
        let mut adapter = StoreAdapter::new(Box::new(MemoryStore::new()));
        adapter.save("blob", &UserData::default());
        adapter.remove("blob");
        let mut fallback = UserData::default();
        fallback.dark_mode = true;
        let loaded: UserData = adapter.load("blob", fallback.clone());
        assert_eq!(loaded, fallback);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Write-through persistence via the facade
// ═══════════════════════════════════════════════════════════════════

mod write_through {
    use super::*;

    #[test]
    fn user_data_mutations_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut tracker = tracker_over(dir.path());
            tracker.toggle_dark_mode();
            tracker.toggle_favorite("bitcoin");
            tracker.add_to_portfolio("bitcoin", "btc", 0.5, 60_000.0);
        }

        let tracker = tracker_over(dir.path());
        let state = tracker.state();
        assert!(state.dark_mode);
        assert!(tracker.is_favorite("bitcoin"));
        assert_eq!(state.portfolio.len(), 1);
        assert_eq!(state.portfolio[0].purchase_price, 60_000.0);
    }

    #[test]
    fn session_fields_are_never_persisted() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut tracker = tracker_over(dir.path());
            tracker.set_search("bitcoin");
            tracker.set_filter_key("highPrice");
            tracker.set_sort_key("price_desc");
            tracker.set_display_count(500);
            // One persisting action so a blob exists at all.
            tracker.toggle_dark_mode();
        }

        let tracker = tracker_over(dir.path());
        let state = tracker.state();
        assert!(state.dark_mode);
        assert_eq!(state.search, "");
        assert_eq!(state.display_count, 52);
    }

    #[test]
    fn non_persisting_actions_write_no_blob() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut tracker = tracker_over(dir.path());
            tracker.set_search("bitcoin");
            tracker.toggle_show_favorites();
            tracker.clear_filters();
        }

        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.get(STORAGE_KEY).is_none());
    }

    #[test]
    fn range_filter_changes_persist() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut tracker = tracker_over(dir.path());
            tracker.set_range_filter(
                crypto_tracker_core::models::filters::RangeFilterKind::Price,
                250.0,
            );
        }

        let tracker = tracker_over(dir.path());
        assert_eq!(tracker.state().range_filters.price, 250.0);
    }

    #[test]
    fn corrupted_blob_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).unwrap();
        store.set(STORAGE_KEY, "###corrupted###").unwrap();

        let tracker = tracker_over(dir.path());
        let state = tracker.state();
        assert!(!state.dark_mode);
        assert!(state.portfolio.is_empty());
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn alert_mutations_persist() {
        use crypto_tracker_core::models::alert::AlertDirection;

        let dir = tempfile::tempdir().unwrap();
        {
            let mut tracker = tracker_over(dir.path());
            tracker.add_price_alert("bitcoin", 70_000.0, AlertDirection::Above);
        }

        let tracker = tracker_over(dir.path());
        assert_eq!(tracker.state().notifications.len(), 1);
        assert_eq!(tracker.state().notifications[0].coin_id, "bitcoin");
    }
}
