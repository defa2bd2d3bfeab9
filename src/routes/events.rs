use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedMatcher;
use crate::error::ApiResult;
use crate::models::{CreateEventRequest, PublicEventResponse, UpdateEventRequest};
use crate::routes::{owned_event, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events")
            .route(web::get().to(list_events))
            .route(web::post().to(create_event)),
    )
    .service(web::resource("/events/{event_id}/public").route(web::get().to(get_public_event)))
    .service(
        web::resource("/events/{event_id}")
            .route(web::get().to(get_event))
            .route(web::put().to(update_event))
            .route(web::delete().to(delete_event)),
    );
}

/// Events created by the requesting matcher, newest first, with roster counts
async fn list_events(state: web::Data<AppState>, matcher: AuthenticatedMatcher) -> ApiResult<HttpResponse> {
    let events = state.store.list_events(matcher.id()).await?;
    Ok(HttpResponse::Ok().json(events))
}

async fn create_event(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    req: web::Json<CreateEventRequest>,
) -> ApiResult<HttpResponse> {
    req.validate()?;

    let event = state.store.create_event(matcher.id(), &req).await?;
    tracing::info!("Matcher {} created event {}", matcher.id(), event.id);

    Ok(HttpResponse::Created().json(event))
}

async fn get_event(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event = owned_event(&state, path.into_inner(), matcher).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// Event details for the public registration page
async fn get_public_event(state: web::Data<AppState>, path: web::Path<Uuid>) -> ApiResult<HttpResponse> {
    let event = state.store.get_event(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PublicEventResponse::from(event)))
}

async fn update_event(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
    req: web::Json<UpdateEventRequest>,
) -> ApiResult<HttpResponse> {
    req.validate()?;
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    let event = state.store.update_event(event_id, &req).await?;
    tracing::info!("Updated event {} (status {:?})", event_id, event.status);

    Ok(HttpResponse::Ok().json(event))
}

async fn delete_event(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    state.store.delete_event(event_id).await?;
    tracing::info!("Deleted event {}", event_id);

    Ok(HttpResponse::NoContent().finish())
}
