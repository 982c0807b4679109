use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to list events near the visitor
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NearbyEventsRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat", default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng", alias = "lon", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "radiusKm", alias = "radius_km", default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query string for the upcoming events listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpcomingEventsQuery {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
