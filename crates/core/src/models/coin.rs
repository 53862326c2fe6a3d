use serde::{Deserialize, Serialize};

/// One cryptocurrency's market snapshot as returned by the upstream
/// `/coins/markets` feed.
///
/// Coins are immutable: a refresh replaces the loaded set wholesale, it
/// never patches individual fields. `id` is the stable key; everything else
/// is display data. The upstream feed returns `null` for several numeric
/// fields on thinly traded coins, hence the `Option`s — the accessor
/// methods below collapse those to 0 for filtering and sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,

    // Extended fields used only by detail views.
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub roi: Option<Roi>,
}

/// Return-on-investment block attached to a few coins (e.g. ETH).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roi {
    pub times: f64,
    pub currency: String,
    pub percentage: f64,
}

impl Coin {
    /// Market cap with missing values treated as 0.
    #[must_use]
    pub fn market_cap_or_zero(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    /// 24h volume with missing values treated as 0.
    #[must_use]
    pub fn volume_or_zero(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }

    /// 24h price change percentage with missing values treated as 0.
    #[must_use]
    pub fn change_24h_or_zero(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// Circulating supply with missing values treated as 0.
    #[must_use]
    pub fn supply_or_zero(&self) -> f64 {
        self.circulating_supply.unwrap_or(0.0)
    }
}

/// Per-coin history payload from the `/coins/{id}/market_chart` endpoint.
/// Each series is a list of `[timestamp_ms, value]` pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
    #[serde(default)]
    pub market_caps: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_volumes: Vec<(f64, f64)>,
}

impl MarketChart {
    /// Latest price in the series, if any.
    #[must_use]
    pub fn latest_price(&self) -> Option<f64> {
        self.prices.last().map(|&(_, price)| price)
    }
}
