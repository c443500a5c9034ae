use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::gateway::traits::PortfolioGateway;
use crate::models::holding::{Holding, HoldingCreateRequest, HoldingUpdateRequest, PriceUpdate};
use crate::models::metrics::PortfolioMetrics;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::sector::SectorSummary;
use crate::models::settings::Settings;
use crate::services::aggregation_service::AggregationService;

/// Everything the presentation layer reads. The snapshot / sector-summary /
/// metrics triple is only ever replaced wholesale, inside one write-lock
/// section — never partially written.
#[derive(Debug, Default)]
struct SharedState {
    snapshot: Option<PortfolioSnapshot>,
    sector_summaries: Vec<SectorSummary>,
    metrics: Option<PortfolioMetrics>,
    loading: bool,
    error: Option<String>,
}

/// The synchronization core.
///
/// Owns the canonical in-memory view of portfolio state and keeps it fresh:
/// every refresh fetches holdings-with-totals, sector breakdown, and
/// metrics concurrently and commits them together or not at all. A failed
/// refresh leaves the previously committed state visible (stale data over
/// blank data) and records a human-readable error.
///
/// Mutations go to the gateway first; the local view only changes through
/// the full refresh that follows. There is no optimistic patching, and
/// overlapping refreshes are not serialized — whichever settles last wins
/// at the commit boundary.
pub struct SyncService {
    inner: Arc<SyncCore>,
    poll_handle: Option<JoinHandle<()>>,
}

struct SyncCore {
    gateway: Arc<dyn PortfolioGateway>,
    aggregation: AggregationService,
    state: RwLock<SharedState>,
}

impl SyncService {
    /// Create the engine and start its background work: one immediate
    /// refresh (the initial load), then periodic refreshes at the
    /// configured interval. A non-positive interval disables polling after
    /// the initial load. `loading` reads true until the initial load
    /// settles.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(gateway: Arc<dyn PortfolioGateway>, settings: &Settings) -> Self {
        let inner = Arc::new(SyncCore {
            gateway,
            aggregation: AggregationService::new(),
            state: RwLock::new(SharedState {
                loading: true,
                ..SharedState::default()
            }),
        });

        let poll_interval_ms = settings.poll_interval_ms;
        let core = Arc::clone(&inner);
        let handle = tokio::spawn(async move {
            if let Err(e) = core.refresh().await {
                warn!("initial portfolio load failed: {e}");
            }

            if poll_interval_ms <= 0 {
                debug!("background polling disabled");
                return;
            }

            let period = Duration::from_millis(poll_interval_ms as u64);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval's first tick completes immediately; the initial
            // load already ran, so consume it.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = core.refresh().await {
                    warn!("polling refresh failed: {e}");
                }
            }
        });

        info!(poll_interval_ms, "portfolio sync engine started");

        Self {
            inner,
            poll_handle: Some(handle),
        }
    }

    /// Stop background polling and release the timer. Idempotent; dropping
    /// the service does this too, so the task never outlives its owner.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.poll_handle.take() {
            handle.abort();
            debug!("portfolio sync engine stopped");
        }
    }

    // ── Refresh & Mutations ─────────────────────────────────────────

    /// Re-fetch all portfolio resources and commit them atomically.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.inner.refresh().await
    }

    /// Create a holding, then resynchronize.
    pub async fn add_holding(&self, request: &HoldingCreateRequest) -> Result<Holding, CoreError> {
        self.inner.add_holding(request).await
    }

    /// Apply a partial update to a holding, then resynchronize.
    pub async fn update_holding(
        &self,
        id: &str,
        request: &HoldingUpdateRequest,
    ) -> Result<Holding, CoreError> {
        self.inner.update_holding(id, request).await
    }

    /// Delete a holding, then resynchronize.
    pub async fn remove_holding(&self, id: &str) -> Result<(), CoreError> {
        self.inner.remove_holding(id).await
    }

    /// Push a batch of market prices, then resynchronize.
    pub async fn update_prices(&self, updates: &[PriceUpdate]) -> Result<(), CoreError> {
        self.inner.update_prices(updates).await
    }

    // ── Read Accessors ──────────────────────────────────────────────

    /// The most recently committed snapshot, if any refresh has succeeded.
    pub async fn snapshot(&self) -> Option<PortfolioSnapshot> {
        self.inner.state.read().await.snapshot.clone()
    }

    /// Holdings of the committed snapshot (empty before the first commit).
    pub async fn holdings(&self) -> Vec<Holding> {
        self.inner
            .state
            .read()
            .await
            .snapshot
            .as_ref()
            .map(|s| s.holdings.clone())
            .unwrap_or_default()
    }

    /// Sector summaries committed with the snapshot.
    pub async fn sector_summaries(&self) -> Vec<SectorSummary> {
        self.inner.state.read().await.sector_summaries.clone()
    }

    /// Metrics committed with the snapshot.
    pub async fn metrics(&self) -> Option<PortfolioMetrics> {
        self.inner.state.read().await.metrics.clone()
    }

    /// True from construction until the initial load settles, and for the
    /// duration of every subsequent refresh.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    /// Message of the most recent failure; cleared by the next successful
    /// refresh.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.read().await.error.clone()
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl SyncCore {
    /// Fetch holdings, sector breakdown, and metrics concurrently and
    /// commit them as one atomic replacement.
    ///
    /// All three fetches must succeed. On any failure the previously
    /// committed triple stays untouched, the error is recorded, and the
    /// caller gets it back. `loading` reports the whole round trip.
    async fn refresh(&self) -> Result<(), CoreError> {
        debug!("refreshing portfolio state");
        self.state.write().await.loading = true;

        let fetched = self.fetch_all().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match fetched {
            Ok((snapshot, sector_summaries, metrics)) => {
                debug!(
                    holdings = snapshot.holdings.len(),
                    sectors = sector_summaries.len(),
                    "committing refreshed portfolio state"
                );
                state.snapshot = Some(snapshot);
                state.sector_summaries = sector_summaries;
                state.metrics = Some(metrics);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("refresh failed, keeping previous state: {e}");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The three resource fetches, issued together and awaited together so
    /// a commit only ever sees a complete result set.
    async fn fetch_all(
        &self,
    ) -> Result<(PortfolioSnapshot, Vec<SectorSummary>, PortfolioMetrics), CoreError> {
        let (snapshot, sector_summaries, metrics) = tokio::join!(
            self.gateway.fetch_portfolio(),
            self.gateway.fetch_sector_summary(),
            self.gateway.fetch_metrics(),
        );

        let mut snapshot = snapshot?;
        let sector_summaries = sector_summaries?;
        let metrics = metrics?;

        // Derived holding fields and totals are recomputed from source
        // fields, so the committed snapshot is internally consistent even
        // when the service omits or rounds them.
        self.aggregation.recompute_derived(&mut snapshot.holdings);
        let totals = self.aggregation.compute_portfolio_totals(&snapshot.holdings);
        snapshot.total_investment = totals.total_investment;
        snapshot.total_present_value = totals.total_present_value;
        snapshot.total_gain_loss = totals.total_gain_loss;

        // Prefer the service's sector breakdown; aggregate locally only
        // when it sent none for a non-empty portfolio.
        let sector_summaries = if sector_summaries.is_empty() && !snapshot.holdings.is_empty() {
            debug!("no precomputed sector summary, falling back to local aggregation");
            self.aggregation.compute_sector_summaries(&snapshot.holdings)
        } else {
            sector_summaries
        };

        Ok((snapshot, sector_summaries, metrics))
    }

    async fn add_holding(&self, request: &HoldingCreateRequest) -> Result<Holding, CoreError> {
        Self::validate_create(request)?;

        let created = match self.gateway.create_holding(request).await {
            Ok(holding) => holding,
            Err(e) => return Err(self.record_failure(e).await),
        };
        info!(symbol = %created.symbol, "holding created");

        self.refresh().await?;
        Ok(created)
    }

    async fn update_holding(
        &self,
        id: &str,
        request: &HoldingUpdateRequest,
    ) -> Result<Holding, CoreError> {
        Self::validate_update(request)?;

        let updated = match self.gateway.update_holding(id, request).await {
            Ok(holding) => holding,
            Err(e) => return Err(self.record_failure(e).await),
        };
        info!(id, "holding updated");

        self.refresh().await?;
        Ok(updated)
    }

    async fn remove_holding(&self, id: &str) -> Result<(), CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Validation("holding id must not be empty".into()));
        }

        if let Err(e) = self.gateway.delete_holding(id).await {
            return Err(self.record_failure(e).await);
        }
        info!(id, "holding removed");

        self.refresh().await
    }

    async fn update_prices(&self, updates: &[PriceUpdate]) -> Result<(), CoreError> {
        Self::validate_prices(updates)?;

        if let Err(e) = self.gateway.update_prices(updates).await {
            return Err(self.record_failure(e).await);
        }
        info!(count = updates.len(), "market prices pushed");

        self.refresh().await
    }

    /// Record a gateway failure in the shared error state and hand the
    /// typed error back for propagation to the caller.
    async fn record_failure(&self, error: CoreError) -> CoreError {
        self.state.write().await.error = Some(error.to_string());
        error
    }

    // ── Validation ──────────────────────────────────────────────────
    // Malformed input is rejected here, before any gateway call, and never
    // touches the shared error state.

    fn validate_create(request: &HoldingCreateRequest) -> Result<(), CoreError> {
        Self::validate_non_empty("holding name", &request.name)?;
        Self::validate_non_empty("ticker symbol", &request.symbol)?;
        Self::validate_non_empty("exchange code", &request.exchange)?;
        Self::validate_non_empty("sector", &request.sector)?;
        Self::validate_positive("purchase price", request.purchase_price)?;
        Self::validate_positive("quantity", request.quantity)?;
        Ok(())
    }

    fn validate_update(request: &HoldingUpdateRequest) -> Result<(), CoreError> {
        if request.is_empty() {
            return Err(CoreError::Validation(
                "update request contains no fields".into(),
            ));
        }
        if let Some(name) = &request.name {
            Self::validate_non_empty("holding name", name)?;
        }
        if let Some(symbol) = &request.symbol {
            Self::validate_non_empty("ticker symbol", symbol)?;
        }
        if let Some(exchange) = &request.exchange {
            Self::validate_non_empty("exchange code", exchange)?;
        }
        if let Some(sector) = &request.sector {
            Self::validate_non_empty("sector", sector)?;
        }
        if let Some(price) = request.purchase_price {
            Self::validate_positive("purchase price", price)?;
        }
        if let Some(quantity) = request.quantity {
            Self::validate_positive("quantity", quantity)?;
        }
        Ok(())
    }

    fn validate_prices(updates: &[PriceUpdate]) -> Result<(), CoreError> {
        if updates.is_empty() {
            return Err(CoreError::Validation("no price updates supplied".into()));
        }
        for update in updates {
            Self::validate_non_empty("holding name", &update.name)?;
            Self::validate_positive("market price", update.current_price)?;
        }
        Ok(())
    }

    fn validate_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("{field} must not be empty")));
        }
        Ok(())
    }

    fn validate_positive(field: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoreError::Validation(format!(
                "{field} must be a positive number, got {value}"
            )));
        }
        Ok(())
    }
}
