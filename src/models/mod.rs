// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Candidate, EventRecord, GeoPoint, RankedCandidate};
pub use requests::{NearbyEventsRequest, UpcomingEventsQuery};
pub use responses::{ErrorResponse, HealthResponse, NearbyEventsResponse, UpcomingEventsResponse};
