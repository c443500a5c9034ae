use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The atomically committed, point-in-time view of the whole portfolio:
/// the full ordered holdings list plus portfolio-level totals.
///
/// A snapshot is created fresh on every successful refresh and replaces the
/// previous one wholesale — holdings are never mutated in place. After
/// commit the totals satisfy `total_gain_loss == total_present_value −
/// total_investment` and `Σ holding.investment == total_investment` exactly,
/// because the engine recomputes them from the holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub total_investment: f64,

    #[serde(default)]
    pub total_present_value: f64,

    #[serde(default)]
    pub total_gain_loss: f64,

    /// All holdings, in the service's order. Wire name: `stocks`.
    #[serde(rename = "stocks", default)]
    pub holdings: Vec<Holding>,
}

/// Portfolio-level totals derived from a holdings list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_investment: f64,
    pub total_present_value: f64,
    pub total_gain_loss: f64,

    /// `total_gain_loss / total_investment × 100`; 0 when nothing is invested.
    pub gain_loss_percentage: f64,
}
