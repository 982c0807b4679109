use crate::models::{Candidate, GeoPoint, RankedCandidate};
use thiserror::Error;

/// Caller input errors for proximity ranking
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NearbyError {
    #[error("invalid origin ({latitude}, {longitude}): coordinates must be finite and in range")]
    InvalidOrigin { latitude: f64, longitude: f64 },

    #[error("invalid radius {0} km: must be greater than zero")]
    InvalidRadius(f64),
}

/// Rank candidates by distance from `origin`
///
/// Candidates without finite coordinates are skipped. The rest are kept when
/// `distance <= max_radius_km`, sorted nearest first (equal distances keep
/// their input order) and truncated to `limit`.
///
/// # Errors
/// * `InvalidOrigin` - origin is not finite or out of range
/// * `InvalidRadius` - `max_radius_km` is zero, negative or NaN
pub fn rank_nearby<I, C>(
    origin: GeoPoint,
    candidates: I,
    max_radius_km: f64,
    limit: usize,
) -> Result<Vec<RankedCandidate<C>>, NearbyError>
where
    I: IntoIterator<Item = C>,
    C: Candidate,
{
    if !origin.is_valid() {
        return Err(NearbyError::InvalidOrigin {
            latitude: origin.latitude,
            longitude: origin.longitude,
        });
    }
    if max_radius_km.is_nan() || max_radius_km <= 0.0 {
        return Err(NearbyError::InvalidRadius(max_radius_km));
    }
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<RankedCandidate<C>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let point = candidate.geo_point()?;
            let distance_km = origin.distance_km(&point);
            (distance_km <= max_radius_km).then_some(RankedCandidate { candidate, distance_km })
        })
        .collect();

    // sort_by is stable; distances are finite here
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);

    tracing::trace!(
        "Ranked {} candidates within {} km of ({}, {})",
        ranked.len(),
        max_radius_km,
        origin.latitude,
        origin.longitude
    );

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Spot {
        name: &'static str,
        lat: Option<f64>,
        lon: Option<f64>,
    }

    impl Candidate for Spot {
        fn latitude(&self) -> Option<f64> {
            self.lat
        }

        fn longitude(&self) -> Option<f64> {
            self.lon
        }
    }

    fn spot(name: &'static str, lat: f64, lon: f64) -> Spot {
        Spot { name, lat: Some(lat), lon: Some(lon) }
    }

    const ISTANBUL: GeoPoint = GeoPoint { latitude: 41.0082, longitude: 28.9784 };

    #[test]
    fn test_identical_point_has_zero_distance() {
        let origin = GeoPoint::new(39.0, 35.0);
        let result = rank_nearby(origin, vec![spot("here", 39.0, 35.0)], 0.001, 10).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_km, 0.0);
    }

    #[test]
    fn test_istanbul_to_ankara_radius() {
        let ankara = || vec![spot("ankara", 39.9334, 32.8597)];

        let near = rank_nearby(ISTANBUL, ankara(), 50.0, 5).unwrap();
        assert!(near.is_empty());

        let wide = rank_nearby(ISTANBUL, ankara(), 400.0, 5).unwrap();
        assert_eq!(wide.len(), 1);
        assert!((wide[0].distance_km - 349.0).abs() < 2.0, "got {}", wide[0].distance_km);
    }

    #[test]
    fn test_empty_candidates() {
        let result = rank_nearby(ISTANBUL, Vec::<Spot>::new(), 100.0, 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_limit() {
        let result = rank_nearby(ISTANBUL, vec![spot("a", 41.0, 29.0)], 100.0, 0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let origin = GeoPoint::new(41.0, 29.0);
        let candidates = vec![
            spot("first", 41.0, 29.5),
            spot("near", 41.0, 29.25),
            spot("second", 41.0, 29.5),
        ];
        let result = rank_nearby(origin, candidates, 100.0, 10).unwrap();
        let names: Vec<_> = result.iter().map(|r| r.candidate.name).collect();

        assert_eq!(names, vec!["near", "first", "second"]);
    }

    #[test]
    fn test_mirrored_points_keep_input_order() {
        // Same offset east and west of the origin's meridian
        let origin = GeoPoint::new(41.0, 29.0);
        let candidates = vec![spot("east", 41.0, 29.5), spot("west", 41.0, 28.5)];
        let result = rank_nearby(origin, candidates, 100.0, 10).unwrap();

        assert_eq!(result[0].distance_km, result[1].distance_km);
        assert_eq!(result[0].candidate.name, "east");
        assert_eq!(result[1].candidate.name, "west");
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = rank_nearby(ISTANBUL, vec![spot("a", 41.0, 29.0)], -5.0, 5).unwrap_err();
        assert_eq!(err, NearbyError::InvalidRadius(-5.0));
    }

    #[test]
    fn test_zero_and_nan_radius_rejected() {
        assert!(matches!(
            rank_nearby(ISTANBUL, Vec::<Spot>::new(), 0.0, 5),
            Err(NearbyError::InvalidRadius(_))
        ));
        assert!(matches!(
            rank_nearby(ISTANBUL, Vec::<Spot>::new(), f64::NAN, 5),
            Err(NearbyError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_invalid_origin_rejected() {
        for origin in [
            GeoPoint::new(f64::NAN, 0.0),
            GeoPoint::new(0.0, f64::INFINITY),
            GeoPoint::new(90.5, 0.0),
            GeoPoint::new(0.0, -181.0),
        ] {
            assert!(matches!(
                rank_nearby(origin, Vec::<Spot>::new(), 10.0, 5),
                Err(NearbyError::InvalidOrigin { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_coordinates_excluded() {
        let candidates = vec![
            Spot { name: "nan", lat: Some(f64::NAN), lon: Some(29.0) },
            Spot { name: "no-lon", lat: Some(41.0), lon: None },
            spot("ok", 41.0, 29.0),
        ];
        let result = rank_nearby(ISTANBUL, candidates, f64::INFINITY, 100).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].candidate.name, "ok");
    }

    #[test]
    fn test_boundary_distance_included() {
        let target = spot("edge", 39.9334, 32.8597);
        let exact = ISTANBUL.distance_km(&GeoPoint::new(39.9334, 32.8597));

        let result = rank_nearby(ISTANBUL, vec![target], exact, 1).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_borrowed_candidates_are_not_consumed() {
        let owned = vec![spot("a", 41.0, 29.0), spot("b", 41.1, 29.1)];
        let result = rank_nearby(ISTANBUL, &owned, 50.0, 5).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(owned.len(), 2);
        assert_eq!(result[0].candidate.name, "a");
    }
}
