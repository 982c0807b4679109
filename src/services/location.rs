use crate::models::GeoPoint;
use std::future::Future;
use thiserror::Error;

/// Errors from a position source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the visitor's current position
///
/// Asked once per "find nearby" request; the answer becomes the ranking
/// origin.
pub trait PositionProvider {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send;
}

/// Position the browser reported alongside the request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportedPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ReportedPosition {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self { latitude, longitude }
    }
}

impl PositionProvider for ReportedPosition {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send {
        let reported = *self;
        async move {
            match (reported.latitude, reported.longitude) {
                (None, _) | (_, None) => Err(LocationError::Unavailable(
                    "no position was shared with the request".to_string(),
                )),
                (Some(lat), Some(lon)) => {
                    let point = GeoPoint::new(lat, lon);
                    if point.is_valid() {
                        Ok(point)
                    } else {
                        Err(LocationError::Unavailable(format!(
                            "reported position ({}, {}) is not a valid coordinate",
                            lat, lon
                        )))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_position() {
        let position = ReportedPosition::new(Some(39.9334), Some(32.8597));
        let point = tokio_test::block_on(position.current_position()).unwrap();

        assert_eq!(point, GeoPoint::new(39.9334, 32.8597));
    }

    #[test]
    fn test_missing_coordinate_is_unavailable() {
        let position = ReportedPosition::new(Some(39.9334), None);
        let result = tokio_test::block_on(position.current_position());

        assert!(matches!(result, Err(LocationError::Unavailable(_))));
    }

    #[test]
    fn test_out_of_range_is_unavailable() {
        let position = ReportedPosition::new(Some(120.0), Some(32.0));
        let result = tokio_test::block_on(position.current_position());

        assert!(matches!(result, Err(LocationError::Unavailable(_))));
    }
}
