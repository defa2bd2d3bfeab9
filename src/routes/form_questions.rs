use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedMatcher;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateQuestionRequest, FormQuestion, ReorderQuestionsRequest, UpdateQuestionRequest};
use crate::routes::{owned_event, scoped, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed segments first so they never parse as a question id
    cfg.service(
        web::resource("/events/{event_id}/form-questions/public").route(web::get().to(list_public_questions)),
    )
    .service(
        web::resource("/events/{event_id}/form-questions/reorder").route(web::put().to(reorder_questions)),
    )
    .service(
        web::resource("/events/{event_id}/form-questions")
            .route(web::get().to(list_questions))
            .route(web::post().to(create_question)),
    )
    .service(
        web::resource("/events/{event_id}/form-questions/{question_id}")
            .route(web::get().to(get_question))
            .route(web::put().to(update_question))
            .route(web::delete().to(delete_question)),
    );
}

/// Active questions for the registration form
async fn list_public_questions(state: web::Data<AppState>, path: web::Path<Uuid>) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    state.store.get_event(event_id).await?;

    let questions = state.store.list_questions(event_id, true).await?;
    Ok(HttpResponse::Ok().json(questions))
}

async fn list_questions(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    let questions = state.store.list_questions(event_id, false).await?;
    Ok(HttpResponse::Ok().json(questions))
}

async fn create_question(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
    req: web::Json<CreateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    req.validate()?;
    req.check().map_err(ApiError::BadRequest)?;
    owned_event(&state, event_id, matcher).await?;

    let question = state.store.create_question(event_id, &req).await?;
    tracing::info!("Added question '{}' to event {}", question.question_key, event_id);

    Ok(HttpResponse::Created().json(question))
}

async fn event_question(
    state: &AppState,
    matcher: AuthenticatedMatcher,
    event_id: Uuid,
    question_id: Uuid,
) -> ApiResult<FormQuestion> {
    owned_event(state, event_id, matcher).await?;
    scoped(
        state.store.get_question(question_id).await,
        event_id,
        |q: &FormQuestion| q.event_id,
        "Form question",
    )
}

async fn get_question(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, question_id) = path.into_inner();
    let question = event_question(&state, matcher, event_id, question_id).await?;
    Ok(HttpResponse::Ok().json(question))
}

async fn update_question(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let (event_id, question_id) = path.into_inner();
    req.validate()?;
    let current = event_question(&state, matcher, event_id, question_id).await?;
    req.check(current.question_type, current.options.as_deref())
        .map_err(ApiError::BadRequest)?;

    let question = state.store.update_question(question_id, &req).await?;
    Ok(HttpResponse::Ok().json(question))
}

async fn delete_question(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (event_id, question_id) = path.into_inner();
    event_question(&state, matcher, event_id, question_id).await?;

    state.store.delete_question(question_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Set `display_order` for several questions at once; ids from other events are ignored
async fn reorder_questions(
    state: web::Data<AppState>,
    matcher: AuthenticatedMatcher,
    path: web::Path<Uuid>,
    req: web::Json<ReorderQuestionsRequest>,
) -> ApiResult<HttpResponse> {
    let event_id = path.into_inner();
    owned_event(&state, event_id, matcher).await?;

    state.store.reorder_questions(event_id, &req.questions).await?;
    let questions = state.store.list_questions(event_id, false).await?;

    Ok(HttpResponse::Ok().json(questions))
}
