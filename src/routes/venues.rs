use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedMatcher;
use crate::error::ApiResult;
use crate::models::{CreateVenueRequest, MessageResponse, UpdateVenueRequest, Venue, VenueRemoval};
use crate::routes::{owned_event, scoped, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events/{event_id}/venues")
            .route(web::get().to(list_venues))
            .route(web::post().to(create_venue)),
    )
    .service(
        web::resource("/events/{event_id}/venues/{venue_id}")
            .route(web::get().to(get_venue))
            .route(web::put().to(update_venue))
            .route(web::delete().to(delete_venue)),
    );
}

async fn list_venues(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    let venues = state.store.list_venues(event_id).await?;
    Ok(HttpResponse::Ok().json(venues))
}

async fn create_venue(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
    req: web::Json<CreateVenueRequest>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    req.validate()?;
    owned_event(&state, event_id, matcher).await?;

    let venue = state.store.create_venue(event_id, &req).await?;
    tracing::info!("Created venue {} ({} slots) for event {}", venue.id, venue.total_capacity, event_id);

    Ok(HttpResponse::Created().json(venue))
}

async fn event_venue(
    state: &AppState,
    matcher: AuthenticatedMatcher,
    event_id: Uuid,
    venue_id: Uuid,
) -> ApiResult<Venue> {
    owned_event(state, event_id, matcher).await?;
    scoped(state.store.get_venue(venue_id).await, event_id, |v: &Venue| v.event_id, "Venue")
}

async fn get_venue(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, venue_id) = path.into_inner();
    let venue = event_venue(&state, matcher, event_id, venue_id).await?;
    Ok(HttpResponse::Ok().json(venue))
}

/// Capacity changes keep slots already in use
async fn update_venue(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateVenueRequest>,
) -> ApiResult<HttpResponse> {
    let (event_id, venue_id) = path.into_inner();
    req.validate()?;
    event_venue(&state, matcher, event_id, venue_id).await?;

    let venue = state.store.update_venue(venue_id, &req).await?;
    Ok(HttpResponse::Ok().json(venue))
}

async fn delete_venue(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, venue_id) = path.into_inner();
    event_venue(&state, matcher, event_id, venue_id).await?;

    let message = match state.store.delete_venue(venue_id).await? {
        VenueRemoval::Deleted => "Venue deleted",
        VenueRemoval::Deactivated => "Venue has assigned matches and was deactivated",
    };
    tracing::info!("Venue {}: {}", venue_id, message);

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: message.to_string(),
    }))
}
