//! Tunable constants shared by the fetch, refresh and display layers.
//!
//! The refresh and turbo cooldowns deliberately gate on wall-clock time,
//! not on request completion — the point is to keep the free upstream API
//! from being hammered, not to serialize requests.

use std::time::Duration;

/// Coins requested per `/coins/markets` page. The pagination heuristic
/// compares returned page length against this: a short page means no
/// next page.
pub const COINS_PER_PAGE: usize = 100;

/// Highest page the turbo loader will request (100 coins/page × 50 pages
/// covers the upstream universe that matters for local search).
pub const MAX_PAGE: u32 = 50;

/// Minimum wall-clock gap between two non-append refreshes.
pub const REFRESH_COOLDOWN: Duration = Duration::from_millis(120_000);

/// Cooldown applied to the bulk multi-page loader once enough coins are
/// loaded locally.
pub const TURBO_COOLDOWN: Duration = Duration::from_millis(120_000);

/// Total-loaded-coins threshold past which the turbo cooldown arms.
pub const TURBO_THRESHOLD: usize = 500;

/// Number of coins shown initially.
pub const INITIAL_DISPLAY_COUNT: usize = 52;

/// How many more coins each "load more" reveals.
pub const DISPLAY_INCREMENT: usize = 20;

/// Cap on search suggestion results.
pub const MAX_SUGGESTIONS: usize = 6;

/// HTTP request timeout for the upstream API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Key under which the persisted user-data blob is stored.
pub const STORAGE_KEY: &str = "cryptoTrackerState";
