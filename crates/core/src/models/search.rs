use serde::{Deserialize, Serialize};

/// A match returned by the symbol search endpoint (autocomplete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub name: String,
    pub symbol: String,
    pub exchange: String,
    pub sector: String,
}

/// Result of probing the data service's health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,

    #[serde(default)]
    pub message: String,

    /// Backing-store status as reported by the service (e.g., "connected").
    #[serde(default)]
    pub database: String,
}
