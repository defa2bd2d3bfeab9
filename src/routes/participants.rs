use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedMatcher;
use crate::error::{ApiError, ApiResult};
use crate::models::{Participant, RegisterParticipantRequest, UpdateParticipantRequest};
use crate::routes::{owned_event, scoped, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events/{event_id}/participants/register")
            .route(web::post().to(register_participant)),
    )
    .service(web::resource("/events/{event_id}/participants").route(web::get().to(list_participants)))
    .service(
        web::resource("/events/{event_id}/participants/{participant_id}")
            .route(web::get().to(get_participant))
            .route(web::put().to(update_participant))
            .route(web::delete().to(delete_participant)),
    );
}

/// Public registration
///
/// POST /api/v1/events/{event_id}/participants/register
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "age": 30,
///   "gender": "female",
///   "interested_in": "everyone",
///   "form_answers": { "music": "jazz" }
/// }
/// ```
async fn register_participant(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<RegisterParticipantRequest>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    req.validate()?;

    let event = state.store.get_event(event_id).await?;
    if !event.status.accepts_registrations() {
        tracing::info!("Registration refused for event {} in status {:?}", event_id, event.status);
        return Err(ApiError::BadRequest("Event is not open for registration".to_string()));
    }

    if state.store.participant_email_exists(event_id, &req.email).await? {
        return Err(ApiError::Conflict("Email already registered for this event".to_string()));
    }

    let new = req.into_inner().into_new_participant(event_id).map_err(ApiError::BadRequest)?;
    let participant = state.store.create_participant(&new).await?;

    tracing::info!("Registered participant {} for event {}", participant.id, event_id);

    Ok(HttpResponse::Created().json(participant))
}

async fn list_participants(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    let participants = state.store.list_participants(event_id).await?;
    Ok(HttpResponse::Ok().json(participants))
}

async fn event_participant(
    state: &AppState,
    matcher: AuthenticatedMatcher,
    event_id: Uuid,
    participant_id: Uuid,
) -> ApiResult<Participant> {
    owned_event(state, event_id, matcher).await?;
    scoped(
        state.store.get_participant(participant_id).await,
        event_id,
        |p: &Participant| p.event_id,
        "Participant",
    )
}

async fn get_participant(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, participant_id) = path.into_inner();
    let participant = event_participant(&state, matcher, event_id, participant_id).await?;
    Ok(HttpResponse::Ok().json(participant))
}

async fn update_participant(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateParticipantRequest>,
) -> ApiResult<HttpResponse> {
    let (event_id, participant_id) = path.into_inner();
    req.validate()?;
    event_participant(&state, matcher, event_id, participant_id).await?;

    let update = req.into_inner().normalized().map_err(ApiError::BadRequest)?;
    let participant = state.store.update_participant(participant_id, &update).await?;

    Ok(HttpResponse::Ok().json(participant))
}

async fn delete_participant(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, participant_id) = path.into_inner();
    event_participant(&state, matcher, event_id, participant_id).await?;

    state.store.delete_participant(participant_id).await?;
    tracing::info!("Deleted participant {} from event {}", participant_id, event_id);

    Ok(HttpResponse::NoContent().finish())
}
