use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedMatcher;
use crate::core::capacity::admits_age;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateMatchRequest, Match, NewMatch, Participant, UpdateMatchRequest, Venue, VenueChange,
};
use crate::routes::{owned_event, scoped, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events/{event_id}/matches/generate").route(web::post().to(generate_matches)),
    )
    .service(
        web::resource("/events/{event_id}/matches")
            .route(web::get().to(list_matches))
            .route(web::post().to(create_match)),
    )
    .service(
        web::resource("/events/{event_id}/matches/{match_id}")
            .route(web::get().to(get_match))
            .route(web::put().to(update_match))
            .route(web::delete().to(delete_match)),
    );
}

/// Generate matches endpoint
///
/// POST /api/v1/events/{event_id}/matches/generate
///
/// Pairs every registered, unmatched participant it can and returns the
/// counts. Too small a pool is not an error: zero matches come back with
/// an explanatory message.
async fn generate_matches(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    tracing::info!("Matcher {} generating matches for event {}", matcher.id(), event_id);

    let result = state.generator.generate_matches(event_id, matcher.id()).await?;

    Ok(HttpResponse::Ok().json(result))
}

async fn list_matches(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    let matches = state.store.list_matches(event_id).await?;
    tracing::debug!("Event {} has {} matches", event_id, matches.len());

    Ok(HttpResponse::Ok().json(matches))
}

async fn event_participant(state: &AppState, event_id: Uuid, participant_id: Uuid) -> ApiResult<Participant> {
    scoped(
        state.store.get_participant(participant_id).await,
        event_id,
        |p: &Participant| p.event_id,
        "Participant",
    )
}

/// Check a venue can seat both participants of a pair
async fn seatable_venue(state: &AppState, event_id: Uuid, venue_id: Uuid, pair: [&Participant; 2]) -> ApiResult<Venue> {
    let venue = scoped(state.store.get_venue(venue_id).await, event_id, |v: &Venue| v.event_id, "Venue")?;

    if !venue.is_active {
        return Err(ApiError::BadRequest(format!("Venue {} is inactive", venue.name)));
    }
    if let Some(p) = pair.iter().find(|p| !admits_age(&venue, p.age)) {
        return Err(ApiError::BadRequest(format!(
            "{} is below the minimum age of {} for {}",
            p.name, venue.min_age, venue.name
        )));
    }
    if venue.available_slots <= 0 {
        return Err(ApiError::Conflict(format!("Venue {} has no available slots", venue.name)));
    }
    Ok(venue)
}

/// Create match endpoint
///
/// POST /api/v1/events/{event_id}/matches
///
/// Request body:
/// ```json
/// {
///   "participant1_id": "uuid",
///   "participant2_id": "uuid",
///   "compatibility_score": 80,
///   "venue_id": "uuid",
///   "notes": "string"
/// }
/// ```
///
/// Without `compatibility_score` the pair is scored like a generated one.
async fn create_match(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
    req: web::Json<CreateMatchRequest>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    req.validate()?;
    owned_event(&state, event_id, matcher).await?;

    if req.participant1_id == req.participant2_id {
        return Err(ApiError::BadRequest("Cannot match a participant with themselves".to_string()));
    }

    let p1 = event_participant(&state, event_id, req.participant1_id).await?;
    let p2 = event_participant(&state, event_id, req.participant2_id).await?;

    if let Some(venue_id) = req.venue_id {
        seatable_venue(&state, event_id, venue_id, [&p1, &p2]).await?;
    }

    let score = req
        .compatibility_score
        .unwrap_or_else(|| i32::from(state.generator.engine().score(&p1, &p2)));

    let new = NewMatch::new(event_id, p1.id, p2.id, score, matcher.id())
        .with_venue(req.venue_id)
        .with_notes(req.notes.clone());
    let created = state.store.create_match(&new).await?;

    tracing::info!(
        "Matcher {} paired {} and {} in event {} (score {})",
        matcher.id(),
        created.participant1_id,
        created.participant2_id,
        event_id,
        created.compatibility_score
    );

    Ok(HttpResponse::Created().json(created))
}

async fn event_match(
    state: &AppState,
    matcher: AuthenticatedMatcher,
    event_id: Uuid,
    match_id: Uuid,
) -> ApiResult<Match> {
    owned_event(state, event_id, matcher).await?;
    scoped(state.store.get_match(match_id).await, event_id, |m: &Match| m.event_id, "Match")
}

async fn get_match(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, match_id) = path.into_inner();
    let m = event_match(&state, matcher, event_id, match_id).await?;
    Ok(HttpResponse::Ok().json(m))
}

/// Update match endpoint
///
/// `venue_id` absent keeps the venue, `null` releases it, a new id moves
/// the match and its reservation together.
async fn update_match(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateMatchRequest>,
) -> ApiResult<HttpResponse> {
    let (event_id, match_id) = path.into_inner();
    req.validate()?;
    let current = event_match(&state, matcher, event_id, match_id).await?;

    let changes = req.changes();
    if let VenueChange::Assign(venue_id) = changes.venue {
        if current.venue_id != Some(venue_id) {
            let p1 = event_participant(&state, event_id, current.participant1_id).await?;
            let p2 = event_participant(&state, event_id, current.participant2_id).await?;
            seatable_venue(&state, event_id, venue_id, [&p1, &p2]).await?;
        }
    }

    let updated = state.store.update_match(match_id, &changes).await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_match(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, match_id) = path.into_inner();
    event_match(&state, matcher, event_id, match_id).await?;

    state.store.delete_match(match_id).await?;
    tracing::info!("Deleted match {} from event {}", match_id, event_id);

    Ok(HttpResponse::NoContent().finish())
}
