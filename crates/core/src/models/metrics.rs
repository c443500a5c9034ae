use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Derived portfolio analytics, computed by the remote data service.
///
/// The engine treats this as an opaque value: it is fetched, committed
/// alongside the snapshot, and handed to the presentation layer unchanged.
/// Performer selection and concentration classification are the service's
/// business logic, never recomputed locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    #[serde(default)]
    pub total_return: f64,

    #[serde(default)]
    pub total_return_percentage: f64,

    #[serde(default)]
    pub day_gain: f64,

    #[serde(default)]
    pub day_gain_percentage: f64,

    /// Best holding by percentage gain. `None` when the portfolio is empty.
    #[serde(default)]
    pub best_performer: Option<BestPerformer>,

    /// Worst holding by percentage loss. `None` when the portfolio is empty.
    #[serde(default)]
    pub worst_performer: Option<WorstPerformer>,

    #[serde(default)]
    pub diversification: Diversification,

    /// Wire name: `averagePE` (not the camelCase `averagePe`).
    #[serde(rename = "averagePE", default)]
    pub average_pe: f64,

    #[serde(default)]
    pub total_dividend_yield: f64,
}

/// The best performing holding and its gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPerformer {
    #[serde(rename = "stock")]
    pub holding: Holding,
    pub gain_percentage: f64,
}

/// The worst performing holding and its loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorstPerformer {
    #[serde(rename = "stock")]
    pub holding: Holding,
    pub loss_percentage: f64,
}

/// How unevenly investment is spread across sectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diversification {
    #[serde(default)]
    pub sector_count: usize,

    /// Weight of the heaviest sector, in percent of total investment.
    #[serde(default)]
    pub largest_sector_weight: f64,

    #[serde(default)]
    pub concentration: Concentration,
}

/// Three-level concentration classification, supplied by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Concentration {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Concentration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concentration::Low => write!(f, "Low"),
            Concentration::Medium => write!(f, "Medium"),
            Concentration::High => write!(f, "High"),
        }
    }
}
