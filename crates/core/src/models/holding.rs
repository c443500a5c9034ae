use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked stock position.
///
/// Field names on the wire follow the dashboard service's JSON contract
/// (camelCase, with a few legacy names such as `stockName` and
/// `stockExchangeCode`). Numeric fields the service may omit deserialize
/// to 0; `last_updated` deserializes to `None`.
///
/// The derived fields (`investment`, `present_value`, `gain_loss`,
/// `portfolio_percentage`) are recomputed from their source fields at every
/// snapshot commit — values received from the service are never kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Opaque unique identifier, assigned by the service.
    pub id: String,

    /// Display name (e.g., "Apple Inc.").
    #[serde(rename = "stockName")]
    pub name: String,

    /// Ticker symbol (e.g., "AAPL").
    pub symbol: String,

    /// Price per unit at purchase.
    pub purchase_price: f64,

    /// Number of units held.
    pub quantity: f64,

    /// Exchange code (e.g., "NSE", "BSE").
    #[serde(rename = "stockExchangeCode")]
    pub exchange: String,

    /// Sector tag used for grouping (e.g., "Technology").
    pub sector: String,

    /// Latest market price per unit.
    #[serde(rename = "currentMarketPrice")]
    pub current_price: f64,

    /// Price-to-earnings ratio. 0 when the service has no figure.
    #[serde(default)]
    pub pe_ratio: f64,

    /// Latest reported earnings figure. 0 when the service has no figure.
    #[serde(default)]
    pub latest_earnings: f64,

    /// Date the position was opened.
    pub purchase_date: NaiveDate,

    /// When market data for this holding was last refreshed, if known.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    // ── Derived fields (recomputed per snapshot) ────────────────────
    /// `purchase_price × quantity`.
    #[serde(default)]
    pub investment: f64,

    /// `current_price × quantity`.
    #[serde(default)]
    pub present_value: f64,

    /// `present_value − investment`.
    #[serde(default)]
    pub gain_loss: f64,

    /// This holding's investment as a share of the snapshot total, in percent.
    #[serde(default)]
    pub portfolio_percentage: f64,
}

/// Payload for creating a new holding.
///
/// Market data (current price, P/E, earnings) is filled in by the service;
/// the client only supplies the position itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingCreateRequest {
    #[serde(rename = "stockName")]
    pub name: String,
    pub symbol: String,
    pub purchase_price: f64,
    pub quantity: f64,
    #[serde(rename = "stockExchangeCode")]
    pub exchange: String,
    pub sector: String,
    pub purchase_date: NaiveDate,
}

/// Partial update of an existing holding. Only the fields that are set are
/// serialized, so a PUT body carries exactly the changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingUpdateRequest {
    #[serde(rename = "stockName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(rename = "stockExchangeCode", skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl HoldingUpdateRequest {
    /// `true` when no field is set — such a request is rejected before it
    /// reaches the gateway.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.symbol.is_none()
            && self.purchase_price.is_none()
            && self.quantity.is_none()
            && self.exchange.is_none()
            && self.sector.is_none()
    }
}

/// One entry of a bulk market-price update, keyed by holding name as the
/// service's price endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    #[serde(rename = "stockName")]
    pub name: String,

    #[serde(rename = "currentMarketPrice")]
    pub current_price: f64,
}
