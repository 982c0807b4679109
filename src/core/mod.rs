// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod nearby;
pub mod ranking;

pub use distance::{haversine_distance, EARTH_RADIUS_KM};
pub use filters::{is_record_visible, is_relevant, is_upcoming, site_offset, today_at};
pub use nearby::{NearbyDefaults, NearbyFinder, NearbyQuery, NearbyResult};
pub use ranking::{rank_nearby, NearbyError};
