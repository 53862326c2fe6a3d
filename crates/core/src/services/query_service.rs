use std::cmp::Ordering;

use crate::models::coin::Coin;
use crate::models::filters::SortKey;
use crate::models::state::AppState;

/// Derives the visible coin set from the state tree: search, basic and
/// range filters, favorites, sorting, and the display window.
///
/// Pure business logic — no I/O, no mutation. Results are recomputed on
/// demand, never stored back into the state.
pub struct QueryService;

/// One search suggestion row for the search box dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub price: f64,
}

impl QueryService {
    pub fn new() -> Self {
        Self
    }

    /// The filtered and sorted coin sequence, in full.
    #[must_use]
    pub fn filtered_coins<'a>(&self, state: &'a AppState) -> Vec<&'a Coin> {
        let mut coins: Vec<&Coin> = state
            .coins
            .iter()
            .filter(|coin| self.matches(state, coin))
            .collect();
        self.sort_coins(&mut coins, state.sort_by);
        coins
    }

    /// The first `display_count` coins of the filtered+sorted sequence —
    /// what the grid actually renders.
    #[must_use]
    pub fn visible_coins<'a>(&self, state: &'a AppState) -> Vec<&'a Coin> {
        let mut coins = self.filtered_coins(state);
        coins.truncate(state.display_count);
        coins
    }

    /// Full filter predicate: search AND favorites AND basic AND range.
    #[must_use]
    pub fn matches(&self, state: &AppState, coin: &Coin) -> bool {
        self.matches_search(coin, &state.search)
            && self.matches_favorites(state, coin)
            && state.filter.matches(coin)
            && state.range_filters.matches(coin)
    }

    /// Search terms shorter than 2 characters match everything. Otherwise a
    /// coin matches when its name or symbol contains the term, or when any
    /// whitespace-split token of either starts with it.
    #[must_use]
    pub fn matches_search(&self, coin: &Coin, search: &str) -> bool {
        if search.len() < 2 {
            return true;
        }
        let term = search.to_lowercase();
        fuzzy_match(&coin.name, &term) || fuzzy_match(&coin.symbol, &term)
    }

    fn matches_favorites(&self, state: &AppState, coin: &Coin) -> bool {
        if state.show_favorites_only {
            state.favorites.iter().any(|id| *id == coin.id)
        } else {
            true
        }
    }

    /// Stable sort by the given key; `Unsorted` preserves input order.
    pub fn sort_coins(&self, coins: &mut [&Coin], key: SortKey) {
        match key {
            SortKey::MarketCapDesc => {
                coins.sort_by(|a, b| cmp_f64(b.market_cap_or_zero(), a.market_cap_or_zero()));
            }
            SortKey::MarketCapAsc => {
                coins.sort_by(|a, b| cmp_f64(a.market_cap_or_zero(), b.market_cap_or_zero()));
            }
            SortKey::PriceDesc => {
                coins.sort_by(|a, b| cmp_f64(b.current_price, a.current_price));
            }
            SortKey::PriceAsc => {
                coins.sort_by(|a, b| cmp_f64(a.current_price, b.current_price));
            }
            SortKey::ChangeDesc => {
                coins.sort_by(|a, b| cmp_f64(b.change_24h_or_zero(), a.change_24h_or_zero()));
            }
            SortKey::ChangeAsc => {
                coins.sort_by(|a, b| cmp_f64(a.change_24h_or_zero(), b.change_24h_or_zero()));
            }
            SortKey::NameAsc => {
                coins.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            }
            SortKey::Unsorted => {}
        }
    }

    /// Suggestions for the search box: coins whose name or symbol contains
    /// the query, symbol-prefix matches first, then by market cap, capped
    /// at `limit`. Queries shorter than 2 characters yield nothing.
    #[must_use]
    pub fn suggestions(&self, coins: &[Coin], query: &str, limit: usize) -> Vec<Suggestion> {
        if query.len() < 2 {
            return Vec::new();
        }
        let term = query.to_lowercase();

        let mut matched: Vec<&Coin> = coins
            .iter()
            .filter(|coin| {
                coin.name.to_lowercase().contains(&term)
                    || coin.symbol.to_lowercase().contains(&term)
            })
            .collect();

        matched.sort_by(|a, b| {
            let a_prefix = a.symbol.to_lowercase().starts_with(&term);
            let b_prefix = b.symbol.to_lowercase().starts_with(&term);
            match (a_prefix, b_prefix) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => cmp_f64(b.market_cap_or_zero(), a.market_cap_or_zero()),
            }
        });

        matched
            .into_iter()
            .take(limit)
            .map(|coin| Suggestion {
                id: coin.id.clone(),
                name: coin.name.clone(),
                symbol: coin.symbol.to_uppercase(),
                image: coin.image.clone(),
                price: coin.current_price,
            })
            .collect()
    }
}

impl Default for QueryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Contains-match, or any whitespace-split token starting with the term.
/// `term` must already be lowercase.
fn fuzzy_match(text: &str, term: &str) -> bool {
    let lower = text.to_lowercase();
    if lower.contains(term) {
        return true;
    }
    lower.split_whitespace().any(|word| word.starts_with(term))
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
