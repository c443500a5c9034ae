use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingCreateRequest, HoldingUpdateRequest, PriceUpdate};
use crate::models::metrics::PortfolioMetrics;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::search::{HealthStatus, SymbolMatch};
use crate::models::sector::SectorSummary;

/// Trait abstraction over the remote dashboard data service.
///
/// The synchronization engine depends only on this interface: request and
/// response shapes, not transport. The REST implementation lives in
/// `gateway::rest`; tests substitute their own, and an alternative
/// transport can be plugged in without touching the engine.
#[async_trait]
pub trait PortfolioGateway: Send + Sync {
    /// Fetch the full holdings list with portfolio totals.
    async fn fetch_portfolio(&self) -> Result<PortfolioSnapshot, CoreError>;

    /// Fetch the precomputed per-sector breakdown.
    async fn fetch_sector_summary(&self) -> Result<Vec<SectorSummary>, CoreError>;

    /// Fetch derived analytics (returns, performers, diversification).
    async fn fetch_metrics(&self) -> Result<PortfolioMetrics, CoreError>;

    /// Create a new holding. Returns the holding as stored by the service.
    async fn create_holding(&self, request: &HoldingCreateRequest) -> Result<Holding, CoreError>;

    /// Apply a partial update to an existing holding.
    async fn update_holding(
        &self,
        id: &str,
        request: &HoldingUpdateRequest,
    ) -> Result<Holding, CoreError>;

    /// Delete a holding.
    async fn delete_holding(&self, id: &str) -> Result<(), CoreError>;

    /// Push current market prices for a batch of holdings.
    async fn update_prices(&self, updates: &[PriceUpdate]) -> Result<(), CoreError>;

    /// Search tradable symbols by name prefix.
    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError>;

    /// Probe service availability.
    async fn health(&self) -> Result<HealthStatus, CoreError>;
}
