use crate::core::{
    filters::{is_relevant, site_offset},
    ranking::{rank_nearby, NearbyError},
};
use crate::models::{EventRecord, GeoPoint, RankedCandidate};
use chrono::{FixedOffset, NaiveDate};

/// Defaults applied when a request leaves radius or limit out
#[derive(Debug, Clone, Copy)]
pub struct NearbyDefaults {
    pub radius_km: f64,
    pub limit: usize,
    pub max_limit: usize,
    pub upcoming_only: bool,
    pub utc_offset: FixedOffset,
}

impl Default for NearbyDefaults {
    fn default() -> Self {
        Self {
            radius_km: 50.0,
            limit: 5,
            max_limit: 50,
            upcoming_only: true,
            utc_offset: site_offset(3),
        }
    }
}

/// Per-request overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct NearbyQuery {
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Result of a nearby search
#[derive(Debug)]
pub struct NearbyResult {
    pub events: Vec<RankedCandidate<EventRecord>>,
    pub radius_km: f64,
    pub total_candidates: usize,
    pub relevant_candidates: usize,
}

/// Finds events near a position
///
/// # Pipeline Stages
/// 1. Relevance filtering (visible, not in the past)
/// 2. Haversine radius cutoff
/// 3. Nearest-first ranking and limit
#[derive(Debug, Clone)]
pub struct NearbyFinder {
    defaults: NearbyDefaults,
}

impl NearbyFinder {
    pub fn new(defaults: NearbyDefaults) -> Self {
        Self { defaults }
    }

    pub fn with_default_settings() -> Self {
        Self {
            defaults: NearbyDefaults::default(),
        }
    }

    pub fn defaults(&self) -> &NearbyDefaults {
        &self.defaults
    }

    /// Clamp a requested limit to the configured maximum
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.defaults.limit)
            .min(self.defaults.max_limit)
    }

    /// Find relevant events around `origin`
    ///
    /// # Arguments
    /// * `origin` - The visitor's position
    /// * `events` - The full events collection
    /// * `query` - Optional radius/limit overrides
    /// * `today` - Current day in the site's time zone
    pub fn find_nearby(
        &self,
        origin: GeoPoint,
        events: &[EventRecord],
        query: NearbyQuery,
        today: NaiveDate,
    ) -> Result<NearbyResult, NearbyError> {
        let total_candidates = events.len();
        let radius_km = query.radius_km.unwrap_or(self.defaults.radius_km);
        let limit = self.effective_limit(query.limit);

        let relevant: Vec<&EventRecord> = events
            .iter()
            .filter(|event| {
                is_relevant(event, today, self.defaults.utc_offset, self.defaults.upcoming_only)
            })
            .collect();
        let relevant_candidates = relevant.len();

        // Rank borrowed records; only the survivors are cloned
        let ranked: Vec<RankedCandidate<EventRecord>> = rank_nearby(origin, relevant, radius_km, limit)?
            .into_iter()
            .map(|ranked| RankedCandidate {
                candidate: ranked.candidate.clone(),
                distance_km: ranked.distance_km,
            })
            .collect();

        tracing::debug!(
            "Nearby search: {} of {} events relevant, {} within {} km",
            relevant_candidates,
            total_candidates,
            ranked.len(),
            radius_km
        );

        Ok(NearbyResult {
            events: ranked,
            radius_km,
            total_candidates,
            relevant_candidates,
        })
    }

    /// Relevant events ordered by start date, soonest first
    pub fn upcoming(
        &self,
        events: &[EventRecord],
        limit: Option<usize>,
        today: NaiveDate,
    ) -> Vec<EventRecord> {
        let limit = self.effective_limit(limit);

        let mut upcoming: Vec<&EventRecord> = events
            .iter()
            .filter(|event| {
                is_relevant(event, today, self.defaults.utc_offset, self.defaults.upcoming_only)
            })
            .collect();

        // Undated events (only possible when upcoming_only is off) go last
        upcoming.sort_by_key(|event| (event.start_date.is_none(), event.start_date));
        upcoming.truncate(limit);
        upcoming.into_iter().cloned().collect()
    }
}

impl Default for NearbyFinder {
    fn default() -> Self {
        Self::with_default_settings()
    }
}
