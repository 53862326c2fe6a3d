use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A portfolio position in one coin.
///
/// **Invariant**: at most one `Holding` per `coin_id`. Adding to an existing
/// position merges into it by recomputing the amount-weighted average
/// purchase price — it never creates a second row. `amount` and
/// `purchase_price` are always positive; validation happens at the action
/// boundary before a holding is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(rename = "coinId")]
    pub coin_id: String,
    pub symbol: String,
    pub amount: f64,
    #[serde(rename = "purchasePrice")]
    pub purchase_price: f64,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: DateTime<Utc>,
}

impl Holding {
    pub fn new(
        coin_id: impl Into<String>,
        symbol: impl Into<String>,
        amount: f64,
        purchase_price: f64,
        purchase_date: DateTime<Utc>,
    ) -> Self {
        Self {
            coin_id: coin_id.into(),
            symbol: symbol.into(),
            amount,
            purchase_price,
            purchase_date,
        }
    }
}

/// Valuation of a single holding against its currently loaded coin.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingStats {
    /// Market value right now: `current_price * amount`.
    pub current_value: f64,
    /// What was paid: `purchase_price * amount`.
    pub invested_value: f64,
    /// `current_value - invested_value`.
    pub pnl: f64,
    /// PnL as a percentage of the invested value (0 when nothing invested).
    pub pnl_percentage: f64,
    pub current_price: f64,
}

/// Aggregate valuation across the whole portfolio.
///
/// Holdings whose coin is not currently loaded contribute zero — the
/// valuation only knows about prices in the loaded coin set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub total_pnl: f64,
    /// `total_pnl / (total_value - total_pnl) * 100`, guarded to 0 when the
    /// invested denominator is 0 so no NaN reaches display code.
    pub total_pnl_percentage: f64,
}
