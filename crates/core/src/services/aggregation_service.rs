use std::collections::HashMap;

use crate::models::holding::Holding;
use crate::models::portfolio::PortfolioTotals;
use crate::models::sector::SectorSummary;

/// Derives portfolio-level and sector-level aggregates from a holdings list.
///
/// Pure business logic — no I/O, no shared state. Easy to test.
///
/// Used in two places: the derived-field pass at every snapshot commit, and
/// as a fallback when the data service supplies no precomputed sector
/// breakdown. The arithmetic matches the service's exactly, so the
/// presentation layer cannot tell the two paths apart.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// The canonical percentage formula, applied everywhere gain/loss is
    /// expressed relative to invested capital: 0 when nothing is invested
    /// (never a division by zero, never NaN).
    fn gain_loss_percentage(gain_loss: f64, investment: f64) -> f64 {
        if investment > 0.0 {
            gain_loss / investment * 100.0
        } else {
            0.0
        }
    }

    /// Recompute every derived holding field from its source fields.
    ///
    /// Runs at each snapshot commit: `investment`, `present_value`, and
    /// `gain_loss` per holding, then `portfolio_percentage` against the
    /// recomputed total. Values the service sent for these fields are
    /// discarded, keeping each snapshot internally consistent.
    pub fn recompute_derived(&self, holdings: &mut [Holding]) {
        for holding in holdings.iter_mut() {
            holding.investment = holding.purchase_price * holding.quantity;
            holding.present_value = holding.current_price * holding.quantity;
            holding.gain_loss = holding.present_value - holding.investment;
        }

        let total_investment: f64 = holdings.iter().map(|h| h.investment).sum();
        for holding in holdings.iter_mut() {
            holding.portfolio_percentage = if total_investment > 0.0 {
                holding.investment / total_investment * 100.0
            } else {
                0.0
            };
        }
    }

    /// Sum investment, present value, and gain/loss across all holdings.
    ///
    /// `total_gain_loss` is computed as `total_present_value −
    /// total_investment` so the identity between the three holds exactly.
    #[must_use]
    pub fn compute_portfolio_totals(&self, holdings: &[Holding]) -> PortfolioTotals {
        let total_investment: f64 = holdings.iter().map(|h| h.investment).sum();
        let total_present_value: f64 = holdings.iter().map(|h| h.present_value).sum();
        let total_gain_loss = total_present_value - total_investment;

        PortfolioTotals {
            total_investment,
            total_present_value,
            total_gain_loss,
            gain_loss_percentage: Self::gain_loss_percentage(total_gain_loss, total_investment),
        }
    }

    /// Group holdings by sector and accumulate per-sector totals.
    ///
    /// Sectors appear in first-seen order from the input sequence; holdings
    /// keep their relative order within each sector. Together the summaries
    /// partition the input — every holding lands in exactly one summary.
    #[must_use]
    pub fn compute_sector_summaries(&self, holdings: &[Holding]) -> Vec<SectorSummary> {
        let mut summaries: Vec<SectorSummary> = Vec::new();
        let mut index_by_sector: HashMap<String, usize> = HashMap::new();

        for holding in holdings {
            let idx = *index_by_sector
                .entry(holding.sector.clone())
                .or_insert_with(|| {
                    summaries.push(SectorSummary {
                        sector: holding.sector.clone(),
                        total_investment: 0.0,
                        total_present_value: 0.0,
                        total_gain_loss: 0.0,
                        gain_loss_percentage: 0.0,
                        holdings: Vec::new(),
                        holding_count: 0,
                    });
                    summaries.len() - 1
                });

            let summary = &mut summaries[idx];
            summary.total_investment += holding.investment;
            summary.total_present_value += holding.present_value;
            summary.total_gain_loss += holding.gain_loss;
            summary.holdings.push(holding.clone());
            summary.holding_count += 1;
        }

        for summary in &mut summaries {
            summary.gain_loss_percentage =
                Self::gain_loss_percentage(summary.total_gain_loss, summary.total_investment);
        }

        summaries
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
