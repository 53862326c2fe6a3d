use chrono::{DateTime, Utc};

use crate::models::coin::Coin;
use crate::models::holding::{Holding, HoldingStats, PortfolioTotals};

/// Manages portfolio holdings and computes their valuation against the
/// currently loaded coin set.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Merge-or-insert a position.
    ///
    /// If a holding for `coin_id` exists, its amount grows and the purchase
    /// price becomes the amount-weighted average of old and new — never a
    /// second row. Otherwise a new holding is appended. Non-positive or
    /// non-finite amount/price is rejected; returns whether anything changed.
    pub fn add(
        &self,
        portfolio: &mut Vec<Holding>,
        coin_id: &str,
        symbol: &str,
        amount: f64,
        purchase_price: f64,
        now: DateTime<Utc>,
    ) -> bool {
        if !is_positive(amount) || !is_positive(purchase_price) {
            return false;
        }

        if let Some(existing) = portfolio.iter_mut().find(|h| h.coin_id == coin_id) {
            let total_value = existing.amount * existing.purchase_price + amount * purchase_price;
            let total_amount = existing.amount + amount;
            existing.amount = total_amount;
            existing.purchase_price = total_value / total_amount;
        } else {
            portfolio.push(Holding::new(coin_id, symbol, amount, purchase_price, now));
        }
        true
    }

    /// Remove the holding for `coin_id`, if present. Returns whether one
    /// was removed.
    pub fn remove(&self, portfolio: &mut Vec<Holding>, coin_id: &str) -> bool {
        let before = portfolio.len();
        portfolio.retain(|h| h.coin_id != coin_id);
        portfolio.len() != before
    }

    /// Overwrite the amount of an existing holding. Updating a holding
    /// that does not exist is a no-op.
    pub fn update_amount(&self, portfolio: &mut [Holding], coin_id: &str, amount: f64) -> bool {
        match portfolio.iter_mut().find(|h| h.coin_id == coin_id) {
            Some(holding) => {
                holding.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Valuation of one holding against its loaded coin. `None` when the
    /// coin is not in the loaded set — the caller decides whether that
    /// means "skip" (aggregates) or "show placeholder" (detail rows).
    #[must_use]
    pub fn holding_stats(&self, holding: &Holding, coin: Option<&Coin>) -> Option<HoldingStats> {
        let coin = coin?;
        let current_value = coin.current_price * holding.amount;
        let invested_value = holding.purchase_price * holding.amount;
        let pnl = current_value - invested_value;
        let pnl_percentage = if invested_value > 0.0 {
            pnl / invested_value * 100.0
        } else {
            0.0
        };
        Some(HoldingStats {
            current_value,
            invested_value,
            pnl,
            pnl_percentage,
            current_price: coin.current_price,
        })
    }

    /// Total market value of the portfolio. Holdings without a loaded coin
    /// contribute zero.
    #[must_use]
    pub fn portfolio_value(&self, portfolio: &[Holding], coins: &[Coin]) -> f64 {
        portfolio
            .iter()
            .filter_map(|h| {
                coins
                    .iter()
                    .find(|c| c.id == h.coin_id)
                    .map(|c| c.current_price * h.amount)
            })
            .sum()
    }

    /// Total unrealized profit/loss. Holdings without a loaded coin
    /// contribute zero.
    #[must_use]
    pub fn portfolio_pnl(&self, portfolio: &[Holding], coins: &[Coin]) -> f64 {
        portfolio
            .iter()
            .filter_map(|h| {
                coins.iter().find(|c| c.id == h.coin_id).map(|c| {
                    let current_value = c.current_price * h.amount;
                    let purchase_value = h.purchase_price * h.amount;
                    current_value - purchase_value
                })
            })
            .sum()
    }

    /// Aggregate totals for the header summary. The percentage denominator
    /// is the invested value (`total_value - total_pnl`); when that is 0
    /// the percentage is 0, never NaN.
    #[must_use]
    pub fn totals(&self, portfolio: &[Holding], coins: &[Coin]) -> PortfolioTotals {
        let total_value = self.portfolio_value(portfolio, coins);
        let total_pnl = self.portfolio_pnl(portfolio, coins);
        let invested = total_value - total_pnl;
        let total_pnl_percentage = if invested != 0.0 {
            total_pnl / invested * 100.0
        } else {
            0.0
        };
        PortfolioTotals {
            total_value,
            total_pnl,
            total_pnl_percentage,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
