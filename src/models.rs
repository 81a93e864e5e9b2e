// Domain and wire models for download tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored (timestamp, count) observation for a plugin.
/// At most one sample exists per plugin per UTC calendar day; a later
/// same-day observation replaces it. Counts are not assumed monotonic;
/// the catalogue may report dips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub plugin_id: String,
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// Body of a successful POST /update/{plugin_id} response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub plugin_id: String,
    pub count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Badge payload in the shields.io endpoint schema.
/// See: https://shields.io/endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgePayload {
    pub schema_version: u32,
    pub label: String,
    pub message: String,
    pub color: String,
}
