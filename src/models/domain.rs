use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from optional parts, requiring both to be finite.
    ///
    /// Range is not checked here; candidates only need finite coordinates
    /// to take part in distance computation.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Self::new(lat, lon)),
            _ => None,
        }
    }

    /// Finite and within [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in kilometers
    #[inline]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        crate::core::distance::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        GeoPoint::new(point.y(), point.x())
    }
}

/// Anything that can be ranked by proximity.
///
/// Only the coordinates are read; the rest of the record passes through
/// untouched.
pub trait Candidate {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    fn geo_point(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude(), self.longitude())
    }
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn latitude(&self) -> Option<f64> {
        (**self).latitude()
    }

    fn longitude(&self) -> Option<f64> {
        (**self).longitude()
    }
}

impl Candidate for GeoPoint {
    fn latitude(&self) -> Option<f64> {
        Some(self.latitude)
    }

    fn longitude(&self) -> Option<f64> {
        Some(self.longitude)
    }
}

/// A candidate paired with its distance from the query origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate<C> {
    #[serde(flatten)]
    pub candidate: C,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Event document from the `events` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "ownerName", default)]
    pub owner_name: Option<String>,
    #[serde(rename = "locationName", default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(rename = "startDate", default, deserialize_with = "lenient_date")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate", default, deserialize_with = "lenient_date")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<String>,
    #[serde(rename = "priceType", default)]
    pub price_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lng: Option<f64>,
    #[serde(rename = "isVisible", default = "default_true", deserialize_with = "visibility_flag")]
    pub is_visible: bool,
}

impl EventRecord {
    /// Display name of the venue, falling back to the city
    pub fn place(&self) -> Option<&str> {
        self.location_name
            .as_deref()
            .or(self.city.as_deref())
            .filter(|s| !s.is_empty())
    }
}

impl Candidate for EventRecord {
    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lng
    }
}

fn default_true() -> bool { true }

/// Only JSON numbers count as coordinates
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Hidden only for `false` or `"false"`
fn visibility_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(!matches!(value, Value::Bool(false)) && value.as_str() != Some("false"))
}

/// RFC 3339 timestamps, `YYYY-MM-DD` dates or epoch milliseconds
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_date_value(&value))
}

pub(crate) fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
