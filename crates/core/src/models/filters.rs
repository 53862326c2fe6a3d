use serde::{Deserialize, Serialize};

use super::coin::Coin;

/// A named coarse predicate chosen from a fixed menu.
///
/// Thresholds are the dashboard's fixed table; they are part of the UI
/// contract, not tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasicFilter {
    #[default]
    All,
    /// current price > $50k
    HighPrice,
    /// current price < $2
    LowPrice,
    /// 24h volume > $500M
    HighVolume,
    /// 24h volume < $10M
    LowVolume,
    /// 24h change > +5%
    HighPriceChange,
    /// 24h change < -5%
    LowPriceChange,
    /// market cap > $50B
    HighMarketCap,
    /// market cap < $5B
    LowMarketCap,
    /// circulating supply > 100M
    HighCirculatingSupply,
    /// circulating supply < 10M
    LowCirculatingSupply,
}

impl BasicFilter {
    /// Parse a filter key as used by the UI layer. Unrecognized keys degrade
    /// to `All` (pass-through) rather than failing.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "highPrice" => BasicFilter::HighPrice,
            "lowPrice" => BasicFilter::LowPrice,
            "highVolume" => BasicFilter::HighVolume,
            "lowVolume" => BasicFilter::LowVolume,
            "highPriceChange" => BasicFilter::HighPriceChange,
            "lowPriceChange" => BasicFilter::LowPriceChange,
            "highMarketCap" => BasicFilter::HighMarketCap,
            "lowMarketCap" => BasicFilter::LowMarketCap,
            "highCirculatingSupply" => BasicFilter::HighCirculatingSupply,
            "lowCirculatingSupply" => BasicFilter::LowCirculatingSupply,
            _ => BasicFilter::All,
        }
    }

    /// Does `coin` pass this filter?
    #[must_use]
    pub fn matches(&self, coin: &Coin) -> bool {
        match self {
            BasicFilter::All => true,
            BasicFilter::HighPrice => coin.current_price > 50_000.0,
            BasicFilter::LowPrice => coin.current_price < 2.0,
            BasicFilter::HighVolume => coin.volume_or_zero() > 500_000_000.0,
            BasicFilter::LowVolume => coin.volume_or_zero() < 10_000_000.0,
            BasicFilter::HighPriceChange => coin.change_24h_or_zero() > 5.0,
            BasicFilter::LowPriceChange => coin.change_24h_or_zero() < -5.0,
            BasicFilter::HighMarketCap => coin.market_cap_or_zero() > 50_000_000_000.0,
            BasicFilter::LowMarketCap => coin.market_cap_or_zero() < 5_000_000_000.0,
            BasicFilter::HighCirculatingSupply => coin.supply_or_zero() > 100_000_000.0,
            BasicFilter::LowCirculatingSupply => coin.supply_or_zero() < 10_000_000.0,
        }
    }
}

/// Sort order for the coin grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    PriceDesc,
    PriceAsc,
    ChangeDesc,
    ChangeAsc,
    /// Case-insensitive alphabetical by name.
    NameAsc,
    /// Fallback for unrecognized keys: input order preserved.
    Unsorted,
}

impl SortKey {
    /// Parse a sort key as used by the UI layer. Unrecognized keys degrade
    /// to `Unsorted` (input order preserved).
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "market_cap_desc" => SortKey::MarketCapDesc,
            "market_cap_asc" => SortKey::MarketCapAsc,
            "price_desc" => SortKey::PriceDesc,
            "price_asc" => SortKey::PriceAsc,
            "change_desc" => SortKey::ChangeDesc,
            "change_asc" => SortKey::ChangeAsc,
            "name_asc" => SortKey::NameAsc,
            _ => SortKey::Unsorted,
        }
    }
}

/// Which range filter bound an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilterKind {
    Price,
    MarketCap,
    Volume,
    PriceChange,
}

/// User-adjustable inclusive upper bounds on numeric coin fields.
///
/// A coin passes iff all four of its fields are at or below the bound; the
/// 24h price change is compared by absolute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilters {
    pub price: f64,
    #[serde(rename = "marketCap")]
    pub market_cap: f64,
    pub volume: f64,
    #[serde(rename = "priceChange")]
    pub price_change: f64,
}

impl Default for RangeFilters {
    fn default() -> Self {
        Self {
            price: 10_000_000.0,
            market_cap: 2_000_000_000_000.0,
            volume: 500_000_000_000.0,
            price_change: 100.0,
        }
    }
}

impl RangeFilters {
    /// Overwrite one bound.
    pub fn set(&mut self, kind: RangeFilterKind, value: f64) {
        match kind {
            RangeFilterKind::Price => self.price = value,
            RangeFilterKind::MarketCap => self.market_cap = value,
            RangeFilterKind::Volume => self.volume = value,
            RangeFilterKind::PriceChange => self.price_change = value,
        }
    }

    /// Does `coin` fall inside every bound?
    #[must_use]
    pub fn matches(&self, coin: &Coin) -> bool {
        coin.current_price <= self.price
            && coin.market_cap_or_zero() <= self.market_cap
            && coin.volume_or_zero() <= self.volume
            && coin.change_24h_or_zero().abs() <= self.price_change
    }
}
