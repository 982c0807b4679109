use serde::{Deserialize, Serialize};
use crate::models::domain::{EventRecord, GeoPoint, RankedCandidate};

/// Response for the nearby events endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEventsResponse {
    pub events: Vec<RankedCandidate<EventRecord>>,
    pub origin: GeoPoint,
    pub radius_km: f64,
    pub total_results: usize,
    pub total_candidates: usize,
}

/// Response for the upcoming events endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEventsResponse {
    pub events: Vec<EventRecord>,
    pub total_results: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
