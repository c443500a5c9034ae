use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::PortfolioGateway;
use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingCreateRequest, HoldingUpdateRequest, PriceUpdate};
use crate::models::metrics::PortfolioMetrics;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::search::{HealthStatus, SymbolMatch};
use crate::models::sector::SectorSummary;
use crate::models::settings::Settings;

/// REST implementation of [`PortfolioGateway`].
///
/// The service wraps every payload in a response envelope:
/// `{ "success": bool, "data": ..., "message": ..., "error": ... }`.
/// `success == true` carries the payload in `data`; anything else is an
/// API-level failure whose `error` (or `message`) becomes the error text.
/// The health endpoint is the one exception — its body is returned bare.
pub struct RestGateway {
    client: Client,
    base_url: String,
}

// ── Response envelope ───────────────────────────────────────────────

#[derive(Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
    error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn failure_message(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "request failed".to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceUpdateBody<'a> {
    price_updates: &'a [PriceUpdate],
}

impl RestGateway {
    /// Build a gateway from settings.
    /// Fails on an empty or unparseable base URL.
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let base_url = settings.api_base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CoreError::Config("api_base_url must not be empty".into()));
        }
        reqwest::Url::parse(&base_url)
            .map_err(|e| CoreError::Config(format!("invalid api_base_url '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and unwrap the envelope into its payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T, CoreError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // The service reports failures inside the envelope when it can;
            // fall back to the bare HTTP status otherwise.
            let message = match response.json::<ApiEnvelope<serde_json::Value>>().await {
                Ok(envelope) => envelope.failure_message(),
                Err(_) => format!("HTTP {status}"),
            };
            return Err(CoreError::Api {
                operation: operation.to_string(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> =
            response.json().await.map_err(|e| CoreError::Api {
                operation: operation.to_string(),
                message: format!("failed to parse response: {e}"),
            })?;

        if !envelope.success {
            return Err(CoreError::Api {
                operation: operation.to_string(),
                message: envelope.failure_message(),
            });
        }
        envelope.data.ok_or_else(|| CoreError::Api {
            operation: operation.to_string(),
            message: "response contained no data".to_string(),
        })
    }

    /// Like [`execute`](Self::execute), for endpoints whose success
    /// envelope carries no payload (delete, bulk price update).
    async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<(), CoreError> {
        let response = request.send().await?;
        let status = response.status();

        let envelope = match response.json::<ApiEnvelope<serde_json::Value>>().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(CoreError::Api {
                    operation: operation.to_string(),
                    message: format!("HTTP {status}"),
                });
            }
            Err(e) => {
                return Err(CoreError::Api {
                    operation: operation.to_string(),
                    message: format!("failed to parse response: {e}"),
                });
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(CoreError::Api {
                operation: operation.to_string(),
                message: envelope.failure_message(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PortfolioGateway for RestGateway {
    async fn fetch_portfolio(&self) -> Result<PortfolioSnapshot, CoreError> {
        self.execute(self.client.get(self.url("/portfolio")), "fetch portfolio")
            .await
    }

    async fn fetch_sector_summary(&self) -> Result<Vec<SectorSummary>, CoreError> {
        self.execute(
            self.client.get(self.url("/portfolio/sectors")),
            "fetch sector summary",
        )
        .await
    }

    async fn fetch_metrics(&self) -> Result<PortfolioMetrics, CoreError> {
        self.execute(
            self.client.get(self.url("/portfolio/metrics")),
            "fetch metrics",
        )
        .await
    }

    async fn create_holding(&self, request: &HoldingCreateRequest) -> Result<Holding, CoreError> {
        self.execute(
            self.client.post(self.url("/stocks")).json(request),
            "create holding",
        )
        .await
    }

    async fn update_holding(
        &self,
        id: &str,
        request: &HoldingUpdateRequest,
    ) -> Result<Holding, CoreError> {
        self.execute(
            self.client
                .put(self.url(&format!("/stocks/{id}")))
                .json(request),
            "update holding",
        )
        .await
    }

    async fn delete_holding(&self, id: &str) -> Result<(), CoreError> {
        self.execute_unit(
            self.client.delete(self.url(&format!("/stocks/{id}"))),
            "delete holding",
        )
        .await
    }

    async fn update_prices(&self, updates: &[PriceUpdate]) -> Result<(), CoreError> {
        self.execute_unit(
            self.client
                .put(self.url("/portfolio/prices"))
                .json(&PriceUpdateBody {
                    price_updates: updates,
                }),
            "update prices",
        )
        .await
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError> {
        self.execute(
            self.client
                .get(self.url("/stocks/search"))
                .query(&[("q", query)]),
            "search symbols",
        )
        .await
    }

    async fn health(&self) -> Result<HealthStatus, CoreError> {
        // Not enveloped: the health body is the status object itself.
        let status: HealthStatus = self
            .client
            .get(self.url("/health"))
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                operation: "health check".to_string(),
                message: format!("failed to parse response: {e}"),
            })?;
        Ok(status)
    }
}
