use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the target price triggers the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl std::fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertDirection::Above => write!(f, "above"),
            AlertDirection::Below => write!(f, "below"),
        }
    }
}

/// A stored price alert.
///
/// Alerts are pure bookkeeping: they are created, toggled and removed by
/// the user, but nothing in this core evaluates them against live prices.
/// `id` is derived from the creation timestamp (milliseconds), bumped until
/// unique within the stored set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub id: String,
    #[serde(rename = "coinId")]
    pub coin_id: String,
    #[serde(rename = "targetPrice")]
    pub target_price: f64,
    #[serde(rename = "type")]
    pub direction: AlertDirection,
    pub enabled: bool,
    pub created: DateTime<Utc>,
}
