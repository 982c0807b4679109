use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{today_at, NearbyError, NearbyFinder, NearbyQuery};
use crate::models::{
    ErrorResponse, EventRecord, HealthResponse, NearbyEventsRequest, NearbyEventsResponse,
    UpcomingEventsQuery, UpcomingEventsResponse,
};
use crate::services::{EventCache, FirestoreClient, FirestoreError, PositionProvider, ReportedPosition};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub firestore: Arc<FirestoreClient>,
    pub cache: EventCache,
    pub finder: NearbyFinder,
}

/// Configure all event routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/events/nearby", web::post().to(nearby_events))
        .route("/events/upcoming", web::get().to(upcoming_events));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Events collection, served from cache when fresh
async fn load_events(state: &AppState) -> Result<Arc<Vec<EventRecord>>, Arc<FirestoreError>> {
    let key = &state.firestore.collections().events;

    state
        .cache
        .get_or_try_load(key, state.firestore.list_events())
        .await
}

fn nearby_error_response(err: NearbyError) -> HttpResponse {
    let code = match err {
        NearbyError::InvalidOrigin { .. } => "invalid_origin",
        NearbyError::InvalidRadius(_) => "invalid_radius",
    };
    HttpResponse::BadRequest().json(ErrorResponse::new(code, err.to_string(), 400))
}

/// Nearby events endpoint
///
/// POST /api/v1/events/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 39.93,
///   "longitude": 32.85,
///   "radiusKm": 50,
///   "limit": 5
/// }
/// ```
async fn nearby_events(
    state: web::Data<AppState>,
    req: web::Json<NearbyEventsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_failed",
            errors.to_string(),
            400,
        ));
    }

    let provider = ReportedPosition::new(req.latitude, req.longitude);
    let origin = match provider.current_position().await {
        Ok(point) => point,
        Err(e) => {
            tracing::info!("Nearby request without usable position: {}", e);
            return HttpResponse::UnprocessableEntity().json(ErrorResponse::new(
                "location_unavailable",
                e.to_string(),
                422,
            ));
        }
    };

    let events = match load_events(&state).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Failed to load events: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse::new(
                "events_unavailable",
                e.to_string(),
                502,
            ));
        }
    };

    let query = NearbyQuery {
        radius_km: req.radius_km,
        limit: req.limit.map(usize::from),
    };
    let today = today_at(state.finder.defaults().utc_offset);

    let result = match state
        .finder
        .find_nearby(origin, &events, query, today)
    {
        Ok(result) => result,
        Err(e) => return nearby_error_response(e),
    };

    tracing::info!(
        "Returning {} nearby events for ({:.3}, {:.3}) from {} candidates",
        result.events.len(),
        origin.latitude,
        origin.longitude,
        result.total_candidates
    );

    HttpResponse::Ok().json(NearbyEventsResponse {
        total_results: result.events.len(),
        events: result.events,
        origin,
        radius_km: result.radius_km,
        total_candidates: result.total_candidates,
    })
}

/// Upcoming events endpoint
///
/// GET /api/v1/events/upcoming?limit=10
async fn upcoming_events(
    state: web::Data<AppState>,
    query: web::Query<UpcomingEventsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_failed",
            errors.to_string(),
            400,
        ));
    }

    let events = match load_events(&state).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Failed to load events: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse::new(
                "events_unavailable",
                e.to_string(),
                502,
            ));
        }
    };

    let today = today_at(state.finder.defaults().utc_offset);
    let upcoming = state
        .finder
        .upcoming(&events, query.limit.map(usize::from), today);

    HttpResponse::Ok().json(UpcomingEventsResponse {
        total_results: upcoming.len(),
        events: upcoming,
    })
}
