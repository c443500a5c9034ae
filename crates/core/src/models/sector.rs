use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Aggregate view of one sector within a snapshot.
///
/// For a given snapshot the sector summaries partition the holdings list:
/// every holding appears in exactly one summary's `holdings` list, and the
/// union of all lists reconstructs the snapshot's holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    /// Sector name — unique per snapshot.
    pub sector: String,

    #[serde(default)]
    pub total_investment: f64,

    #[serde(default)]
    pub total_present_value: f64,

    #[serde(default)]
    pub total_gain_loss: f64,

    /// `total_gain_loss / total_investment × 100`; 0 when nothing is invested.
    #[serde(default)]
    pub gain_loss_percentage: f64,

    /// Constituent holdings, in their snapshot order. Wire name: `stocks`.
    #[serde(rename = "stocks", default)]
    pub holdings: Vec<Holding>,

    /// Wire name: `stockCount`.
    #[serde(rename = "stockCount", default)]
    pub holding_count: usize,
}
