pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;

use std::sync::Arc;

use tracing::warn;

use errors::CoreError;
use gateway::rest::RestGateway;
use gateway::traits::PortfolioGateway;
use models::holding::{Holding, HoldingCreateRequest, HoldingUpdateRequest, PriceUpdate};
use models::metrics::PortfolioMetrics;
use models::portfolio::PortfolioSnapshot;
use models::search::{HealthStatus, SymbolMatch};
use models::sector::SectorSummary;
use models::settings::Settings;
use services::sync_service::SyncService;

/// Shortest query the symbol search accepts; anything shorter returns no
/// matches without a network round trip.
const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Main entry point for the Portfolio Tracker core library.
///
/// Wraps the synchronization engine behind the contract the presentation
/// layer consumes: the committed holdings / sector-summary / metrics view,
/// a loading flag, the last error message, and the mutation operations.
/// Construction starts the initial load and background polling; dropping
/// the tracker (or calling [`shutdown`](Self::shutdown)) stops them.
#[must_use]
pub struct PortfolioTracker {
    gateway: Arc<dyn PortfolioGateway>,
    sync: SyncService,
}

impl PortfolioTracker {
    /// Connect to the dashboard data service described by `settings` and
    /// start the engine.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(settings: &Settings) -> Result<Self, CoreError> {
        let gateway: Arc<dyn PortfolioGateway> = Arc::new(RestGateway::new(settings)?);
        Ok(Self::with_gateway(gateway, settings))
    }

    /// Start the engine on any gateway implementation. This is the seam
    /// tests and alternative transports plug into.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_gateway(gateway: Arc<dyn PortfolioGateway>, settings: &Settings) -> Self {
        let sync = SyncService::spawn(Arc::clone(&gateway), settings);
        Self { gateway, sync }
    }

    // ── Refresh & Mutations ─────────────────────────────────────────

    /// Re-fetch everything from the service and commit atomically.
    /// On failure the previous state stays visible and the error is both
    /// recorded (see [`last_error`](Self::last_error)) and returned.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.sync.refresh().await
    }

    /// Create a holding, then resynchronize the local view.
    ///
    /// The returned holding is the service's stored copy; it appears in
    /// the local state only once the follow-up refresh has committed.
    pub async fn add_holding(&self, request: &HoldingCreateRequest) -> Result<Holding, CoreError> {
        self.sync.add_holding(request).await
    }

    /// Apply a partial update to a holding, then resynchronize.
    pub async fn update_holding(
        &self,
        id: &str,
        request: &HoldingUpdateRequest,
    ) -> Result<Holding, CoreError> {
        self.sync.update_holding(id, request).await
    }

    /// Delete a holding, then resynchronize.
    pub async fn remove_holding(&self, id: &str) -> Result<(), CoreError> {
        self.sync.remove_holding(id).await
    }

    /// Push current market prices for a batch of holdings, then
    /// resynchronize.
    pub async fn update_prices(&self, updates: &[PriceUpdate]) -> Result<(), CoreError> {
        self.sync.update_prices(updates).await
    }

    // ── Read Accessors ──────────────────────────────────────────────

    /// The most recently committed snapshot, if any refresh has succeeded.
    pub async fn snapshot(&self) -> Option<PortfolioSnapshot> {
        self.sync.snapshot().await
    }

    /// Holdings of the committed snapshot (empty before the first commit).
    pub async fn holdings(&self) -> Vec<Holding> {
        self.sync.holdings().await
    }

    /// Sector summaries committed with the snapshot.
    pub async fn sector_summaries(&self) -> Vec<SectorSummary> {
        self.sync.sector_summaries().await
    }

    /// Holdings belonging to one sector, filtered from the committed
    /// snapshot (exact match on the sector tag).
    pub async fn holdings_in_sector(&self, sector: &str) -> Vec<Holding> {
        self.sync
            .holdings()
            .await
            .into_iter()
            .filter(|h| h.sector == sector)
            .collect()
    }

    /// Metrics committed with the snapshot.
    pub async fn metrics(&self) -> Option<PortfolioMetrics> {
        self.sync.metrics().await
    }

    /// True until the initial load settles, and during every refresh.
    pub async fn is_loading(&self) -> bool {
        self.sync.is_loading().await
    }

    /// Message of the most recent failure; cleared by the next successful
    /// refresh. Stale data stays on display while this is set.
    pub async fn last_error(&self) -> Option<String> {
        self.sync.last_error().await
    }

    // ── Search & Health ─────────────────────────────────────────────

    /// Search tradable symbols by name prefix (autocomplete).
    ///
    /// Queries shorter than two characters and gateway failures both yield
    /// an empty list — search is a convenience, never a fatal path.
    pub async fn search_symbols(&self, query: &str) -> Vec<SymbolMatch> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Vec::new();
        }
        match self.gateway.search_symbols(query).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("symbol search failed: {e}");
                Vec::new()
            }
        }
    }

    /// Probe the data service's health endpoint.
    pub async fn check_connection(&self) -> Result<HealthStatus, CoreError> {
        self.gateway.health().await
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Stop background polling. Dropping the tracker does this too.
    pub fn shutdown(&mut self) {
        self.sync.shutdown();
    }
}
