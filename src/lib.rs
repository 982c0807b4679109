//! Nearby events - proximity ranking and event listings for the events site
//!
//! The heart of the crate is [`rank_nearby`]: haversine distance from an
//! origin, radius cutoff, stable nearest-first ordering and a result limit.
//! Around it sit the relevance filters, a Firestore reader and a small
//! HTTP service.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{haversine_distance, rank_nearby, NearbyError, NearbyFinder, NearbyQuery};
pub use models::{Candidate, EventRecord, GeoPoint, RankedCandidate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let origin = GeoPoint::new(39.0, 35.0);
        let ranked = rank_nearby(origin, [GeoPoint::new(39.0, 35.0)], 1.0, 1).unwrap();
        assert_eq!(ranked[0].distance_km, 0.0);
    }
}
