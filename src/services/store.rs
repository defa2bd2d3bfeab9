use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::core::CapacityError;
use crate::models::{
    CreateEventRequest, CreateQuestionRequest, CreateVenueRequest, Event, EventSummary, FormQuestion,
    Match, MatchChanges, NewMatch, NewParticipant, Participant, QuestionOrder, UpdateEventRequest,
    UpdateParticipantRequest, UpdateQuestionRequest, UpdateVenueRequest, Venue, VenueRemoval,
};

/// Errors that can occur when reading or writing event data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A uniqueness or exclusivity rule lost a race or was broken outright
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StoreError::SqlxError(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator for events, rosters, venues and matches
///
/// Implementations guarantee:
/// - `list_participants` returns registration order, identically on every call
/// - match inserts store the smaller participant id first and reject a pair
///   that already exists in the event, or a participant already in a match
/// - venue slot changes happen atomically with the match write that causes them
#[async_trait]
pub trait MatchStore: Send + Sync {
    // Events
    async fn create_event(&self, creator_id: Uuid, req: &CreateEventRequest) -> StoreResult<Event>;
    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event>;
    async fn list_events(&self, creator_id: Uuid) -> StoreResult<Vec<EventSummary>>;
    async fn update_event(&self, event_id: Uuid, req: &UpdateEventRequest) -> StoreResult<Event>;
    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()>;

    // Participants
    async fn create_participant(&self, new: &NewParticipant) -> StoreResult<Participant>;
    async fn get_participant(&self, participant_id: Uuid) -> StoreResult<Participant>;
    async fn list_participants(&self, event_id: Uuid) -> StoreResult<Vec<Participant>>;
    async fn participant_email_exists(&self, event_id: Uuid, email: &str) -> StoreResult<bool>;
    async fn update_participant(
        &self,
        participant_id: Uuid,
        req: &UpdateParticipantRequest,
    ) -> StoreResult<Participant>;
    /// Deletes the participant and every match naming them, releasing venue slots
    async fn delete_participant(&self, participant_id: Uuid) -> StoreResult<()>;

    // Form questions
    async fn create_question(&self, event_id: Uuid, req: &CreateQuestionRequest) -> StoreResult<FormQuestion>;
    async fn get_question(&self, question_id: Uuid) -> StoreResult<FormQuestion>;
    async fn list_questions(&self, event_id: Uuid, active_only: bool) -> StoreResult<Vec<FormQuestion>>;
    async fn update_question(&self, question_id: Uuid, req: &UpdateQuestionRequest) -> StoreResult<FormQuestion>;
    async fn delete_question(&self, question_id: Uuid) -> StoreResult<()>;
    async fn reorder_questions(&self, event_id: Uuid, order: &[QuestionOrder]) -> StoreResult<()>;

    // Venues
    async fn create_venue(&self, event_id: Uuid, req: &CreateVenueRequest) -> StoreResult<Venue>;
    async fn get_venue(&self, venue_id: Uuid) -> StoreResult<Venue>;
    async fn list_venues(&self, event_id: Uuid) -> StoreResult<Vec<Venue>>;
    async fn update_venue(&self, venue_id: Uuid, req: &UpdateVenueRequest) -> StoreResult<Venue>;
    async fn delete_venue(&self, venue_id: Uuid) -> StoreResult<VenueRemoval>;
    /// Atomically move the free-slot counter, refusing to go below zero
    async fn update_venue_slots(&self, venue_id: Uuid, delta: i32) -> StoreResult<Venue>;

    // Matches
    async fn get_match(&self, match_id: Uuid) -> StoreResult<Match>;
    async fn list_matches(&self, event_id: Uuid) -> StoreResult<Vec<Match>>;
    /// Insert one match, reserving its venue slot and marking both participants matched
    async fn create_match(&self, new: &NewMatch) -> StoreResult<Match>;
    /// Insert a generation batch for one event, all or nothing
    async fn create_matches(&self, event_id: Uuid, batch: &[NewMatch]) -> StoreResult<Vec<Match>>;
    /// Apply `changes`; a venue swap releases the old slot and reserves the new one together
    async fn update_match(&self, match_id: Uuid, changes: &MatchChanges) -> StoreResult<Match>;
    async fn delete_match(&self, match_id: Uuid) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<bool>;
}
