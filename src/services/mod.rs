// Service exports
pub mod cache;
pub mod firestore;
pub mod location;

pub use cache::{CacheStats, EventCache};
pub use firestore::{FirestoreClient, FirestoreCollections, FirestoreError};
pub use location::{LocationError, PositionProvider, ReportedPosition};
