use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::INITIAL_DISPLAY_COUNT;

use super::alert::PriceAlert;
use super::coin::Coin;
use super::filters::{BasicFilter, RangeFilters, SortKey};
use super::holding::Holding;

/// Lifecycle of the one asynchronous operation (the coin fetch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The subset of state that survives across sessions.
///
/// Serialized as one JSON blob under a fixed key; field names match the
/// blob the browser app wrote, so existing exports load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserData {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
    #[serde(rename = "rangeFilters", default)]
    pub range_filters: RangeFilters,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub portfolio: Vec<Holding>,
    #[serde(default)]
    pub notifications: Vec<PriceAlert>,
}

/// The single state tree. All reads are pure derivations over these fields;
/// all writes go through the tracker's action methods.
///
/// Loaded coins and pagination cursors always start empty regardless of
/// persisted data — they are (re)populated only by fetches.
#[derive(Debug, Clone)]
pub struct AppState {
    pub coins: Vec<Coin>,
    pub status: FetchStatus,
    pub error: Option<String>,

    // Session-only query criteria.
    pub search: String,
    pub display_count: usize,
    pub filter: BasicFilter,
    pub sort_by: SortKey,
    pub show_favorites_only: bool,

    // User data, seeded from persistence.
    pub dark_mode: bool,
    pub range_filters: RangeFilters,
    pub favorites: Vec<String>,
    pub portfolio: Vec<Holding>,
    pub notifications: Vec<PriceAlert>,

    pub last_updated: Option<DateTime<Utc>>,

    // Pagination cursors.
    pub current_page: u32,
    pub has_more_pages: bool,
    pub loading_more: bool,
    pub total_coins_loaded: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_user_data(UserData::default())
    }
}

impl AppState {
    /// Build the initial state: user-data fields from the persisted
    /// snapshot, everything else from hard-coded defaults.
    #[must_use]
    pub fn from_user_data(user: UserData) -> Self {
        Self {
            coins: Vec::new(),
            status: FetchStatus::Idle,
            error: None,
            search: String::new(),
            display_count: INITIAL_DISPLAY_COUNT,
            filter: BasicFilter::All,
            sort_by: SortKey::MarketCapDesc,
            show_favorites_only: false,
            dark_mode: user.dark_mode,
            range_filters: user.range_filters,
            favorites: user.favorites,
            portfolio: user.portfolio,
            notifications: user.notifications,
            last_updated: None,
            current_page: 1,
            has_more_pages: true,
            loading_more: false,
            total_coins_loaded: 0,
        }
    }

    /// Snapshot the persisted subset for a write-through save.
    #[must_use]
    pub fn user_data(&self) -> UserData {
        UserData {
            dark_mode: self.dark_mode,
            range_filters: self.range_filters.clone(),
            favorites: self.favorites.clone(),
            portfolio: self.portfolio.clone(),
            notifications: self.notifications.clone(),
        }
    }
}
