// Route exports
pub mod events;
pub mod form_questions;
pub mod matches;
pub mod participants;
pub mod venues;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthenticatedMatcher, JwtVerifier};
use crate::error::{ApiError, ApiResult};
use crate::models::{Event, HealthResponse};
use crate::services::{MatchGenerator, MatchStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub generator: MatchGenerator,
    pub auth: JwtVerifier,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(events::configure)
            .configure(participants::configure)
            .configure(venues::configure)
            .configure(form_questions::configure)
            .configure(matches::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = state.store.health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Load an event the requesting matcher created: 404 when unknown, 403 when someone else's
pub(crate) async fn owned_event(
    state: &AppState,
    event_id: Uuid,
    matcher: AuthenticatedMatcher,
) -> ApiResult<Event> {
    let event = state.store.get_event(event_id).await?;
    if event.creator_id != matcher.id() {
        tracing::warn!("Matcher {} denied access to event {}", matcher.id(), event_id);
        return Err(ApiError::Forbidden("You don't have access to this event".to_string()));
    }
    Ok(event)
}

/// Turn a missing or foreign child record into a 404 for the event it was looked up under
pub(crate) fn scoped<T>(
    result: Result<T, StoreError>,
    event_id: Uuid,
    owner: impl Fn(&T) -> Uuid,
    what: &str,
) -> ApiResult<T> {
    match result {
        Ok(item) if owner(&item) == event_id => Ok(item),
        Ok(_) | Err(StoreError::NotFound(_)) => Err(ApiError::NotFound(format!("{} not found", what))),
        Err(e) => Err(e.into()),
    }
}
