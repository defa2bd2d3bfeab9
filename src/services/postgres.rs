use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use std::time::Duration;
use uuid::Uuid;

use crate::core::capacity::{self, CapacityError, SlotTransition};
use crate::models::{
    CreateEventRequest, CreateQuestionRequest, CreateVenueRequest, Event, EventSummary, FormQuestion,
    Match, MatchChanges, NewMatch, NewParticipant, Participant, QuestionOrder, UpdateEventRequest,
    UpdateParticipantRequest, UpdateQuestionRequest, UpdateVenueRequest, Venue, VenueRemoval,
};
use crate::services::store::{MatchStore, StoreError, StoreResult};

const MATCH_COLUMNS: &str = r#"
    id, event_id, participant1_id, participant2_id, compatibility_score, status,
    venue_id, venue_assigned_at, matched_by, notes, created_at, updated_at
"#;

/// PostgreSQL-backed event store
///
/// Match writes run in a transaction together with the venue slot changes
/// they cause. Generation batches additionally hold a transaction-scoped
/// advisory lock on the event, so two batches for one event never interleave.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> StoreResult<Self> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Advisory lock key for an event
fn event_lock_key(event_id: Uuid) -> i64 {
    let bytes = event_id.as_bytes();
    let mut key = [0u8; 8];
    key.copy_from_slice(&bytes[..8]);
    i64::from_be_bytes(key)
}

fn map_unique(err: sqlx::Error, message: &str) -> StoreError {
    let err = StoreError::from(err);
    if err.is_unique_violation() {
        StoreError::Conflict(message.to_string())
    } else {
        err
    }
}

/// Take one slot from `venue_id`, or explain why not
async fn reserve_slot(conn: &mut PgConnection, event_id: Uuid, venue_id: Uuid) -> StoreResult<()> {
    let reserved = sqlx::query(
        r#"
        UPDATE venues
        SET available_slots = available_slots - 1
        WHERE id = $1 AND event_id = $2 AND is_active AND available_slots > 0
        "#,
    )
    .bind(venue_id)
    .bind(event_id)
    .execute(&mut *conn)
    .await?;

    if reserved.rows_affected() == 1 {
        return Ok(());
    }

    let venue: Option<Venue> = sqlx::query_as("SELECT * FROM venues WHERE id = $1 AND event_id = $2")
        .bind(venue_id)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await?;

    match venue {
        None => Err(StoreError::NotFound("Venue")),
        Some(v) if !v.is_active => Err(CapacityError::Inactive(venue_id).into()),
        Some(_) => Err(CapacityError::Exhausted(venue_id).into()),
    }
}

async fn release_slot(conn: &mut PgConnection, venue_id: Uuid) -> StoreResult<()> {
    sqlx::query(
        r#"
        UPDATE venues
        SET available_slots = LEAST(available_slots + 1, total_capacity)
        WHERE id = $1
        "#,
    )
    .bind(venue_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Refuse the write if either participant is missing from the event or already in a match
async fn ensure_insertable(conn: &mut PgConnection, new: &NewMatch) -> StoreResult<()> {
    let found: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM participants WHERE event_id = $1 AND id IN ($2, $3)",
    )
    .bind(new.event_id)
    .bind(new.participant1_id)
    .bind(new.participant2_id)
    .fetch_one(&mut *conn)
    .await?;
    if found != 2 {
        return Err(StoreError::NotFound("Participant"));
    }

    let busy: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM matches
            WHERE event_id = $1
              AND (participant1_id IN ($2, $3) OR participant2_id IN ($2, $3))
        )
        "#,
    )
    .bind(new.event_id)
    .bind(new.participant1_id)
    .bind(new.participant2_id)
    .fetch_one(&mut *conn)
    .await?;
    if busy {
        return Err(StoreError::Conflict(
            "A participant in this pair is already matched".to_string(),
        ));
    }
    Ok(())
}

async fn insert_match(conn: &mut PgConnection, new: &NewMatch, with_venue: bool) -> StoreResult<Match> {
    let query = format!(
        r#"
        INSERT INTO matches (
            id, event_id, participant1_id, participant2_id, compatibility_score,
            venue_id, venue_assigned_at, matched_by, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $7 THEN NOW() END, $8, $9)
        RETURNING {}
        "#,
        MATCH_COLUMNS
    );

    let m: Match = sqlx::query_as(&query)
        .bind(Uuid::new_v4())
        .bind(new.event_id)
        .bind(new.participant1_id)
        .bind(new.participant2_id)
        .bind(new.compatibility_score)
        .bind(new.venue_id)
        .bind(with_venue)
        .bind(new.matched_by)
        .bind(&new.notes)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "These participants are already matched"))?;

    sqlx::query("UPDATE participants SET status = 'matched' WHERE id IN ($1, $2)")
        .bind(m.participant1_id)
        .bind(m.participant2_id)
        .execute(&mut *conn)
        .await?;

    Ok(m)
}

/// Follow-up for deleted matches: give back their slots and free their pairs
async fn remove_matches(conn: &mut PgConnection, removed: &[Match]) -> StoreResult<()> {
    for m in removed {
        if let Some(venue_id) = m.venue_id {
            release_slot(conn, venue_id).await?;
        }
        sqlx::query(
            "UPDATE participants SET status = 'registered' WHERE id IN ($1, $2) AND status = 'matched'",
        )
        .bind(m.participant1_id)
        .bind(m.participant2_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl MatchStore for PostgresClient {
    async fn create_event(&self, creator_id: Uuid, req: &CreateEventRequest) -> StoreResult<Event> {
        let event = sqlx::query_as(
            r#"
            INSERT INTO events (id, name, description, creator_id, event_date, status, settings)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.description)
        .bind(creator_id)
        .bind(req.event_date)
        .bind(req.status.unwrap_or_default())
        .bind(&req.settings)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        sqlx::query_as("SELECT * FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Event"))
    }

    async fn list_events(&self, creator_id: Uuid) -> StoreResult<Vec<EventSummary>> {
        let query = r#"
            SELECT
                e.id, e.name, e.event_date, e.status, e.created_at,
                (SELECT COUNT(*) FROM participants p WHERE p.event_id = e.id) AS participant_count,
                (SELECT COUNT(*) FROM matches m WHERE m.event_id = e.id) AS match_count
            FROM events e
            WHERE e.creator_id = $1
            ORDER BY e.created_at DESC
        "#;

        let events = sqlx::query_as(query).bind(creator_id).fetch_all(&self.pool).await?;
        Ok(events)
    }

    async fn update_event(&self, event_id: Uuid, req: &UpdateEventRequest) -> StoreResult<Event> {
        sqlx::query_as(
            r#"
            UPDATE events SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                status = COALESCE($5, status),
                settings = COALESCE($6, settings),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.event_date)
        .bind(req.status)
        .bind(&req.settings)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Event"))
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Event"));
        }
        Ok(())
    }

    async fn create_participant(&self, new: &NewParticipant) -> StoreResult<Participant> {
        sqlx::query_as(
            r#"
            INSERT INTO participants (id, event_id, name, email, phone_number, age, form_answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.event_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(new.age)
        .bind(Json(&new.form_answers))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "Email already registered for this event"))
    }

    async fn get_participant(&self, participant_id: Uuid) -> StoreResult<Participant> {
        sqlx::query_as("SELECT * FROM participants WHERE id = $1")
            .bind(participant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Participant"))
    }

    async fn list_participants(&self, event_id: Uuid) -> StoreResult<Vec<Participant>> {
        let participants: Vec<Participant> = sqlx::query_as(
            "SELECT * FROM participants WHERE event_id = $1 ORDER BY created_at, id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Event {} has {} participants", event_id, participants.len());

        Ok(participants)
    }

    async fn participant_email_exists(&self, event_id: Uuid, email: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM participants WHERE event_id = $1 AND LOWER(email) = LOWER($2))",
        )
        .bind(event_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn update_participant(
        &self,
        participant_id: Uuid,
        req: &UpdateParticipantRequest,
    ) -> StoreResult<Participant> {
        sqlx::query_as(
            r#"
            UPDATE participants SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone_number = COALESCE($4, phone_number),
                age = COALESCE($5, age),
                form_answers = COALESCE($6, form_answers),
                status = COALESCE($7, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(participant_id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(req.age)
        .bind(req.form_answers.as_ref().map(Json))
        .bind(req.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, "Email already registered for this event"))?
        .ok_or(StoreError::NotFound("Participant"))
    }

    async fn delete_participant(&self, participant_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed: Vec<Match> = sqlx::query_as(&format!(
            "DELETE FROM matches WHERE participant1_id = $1 OR participant2_id = $1 RETURNING {}",
            MATCH_COLUMNS
        ))
        .bind(participant_id)
        .fetch_all(&mut *tx)
        .await?;
        remove_matches(&mut tx, &removed).await?;

        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(participant_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Participant"));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_question(&self, event_id: Uuid, req: &CreateQuestionRequest) -> StoreResult<FormQuestion> {
        sqlx::query_as(
            r#"
            INSERT INTO form_questions (
                id, event_id, question_key, question_text, question_type, options,
                is_required, is_active, display_order
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                COALESCE($9, (SELECT COALESCE(MAX(display_order), 0) + 1 FROM form_questions WHERE event_id = $2))
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(&req.question_key)
        .bind(&req.question_text)
        .bind(req.question_type)
        .bind(&req.options)
        .bind(req.is_required)
        .bind(req.is_active)
        .bind(req.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, &format!("Question key '{}' already exists", req.question_key)))
    }

    async fn get_question(&self, question_id: Uuid) -> StoreResult<FormQuestion> {
        sqlx::query_as("SELECT * FROM form_questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Form question"))
    }

    async fn list_questions(&self, event_id: Uuid, active_only: bool) -> StoreResult<Vec<FormQuestion>> {
        let questions = sqlx::query_as(
            r#"
            SELECT * FROM form_questions
            WHERE event_id = $1 AND (is_active OR NOT $2)
            ORDER BY display_order, created_at
            "#,
        )
        .bind(event_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn update_question(&self, question_id: Uuid, req: &UpdateQuestionRequest) -> StoreResult<FormQuestion> {
        sqlx::query_as(
            r#"
            UPDATE form_questions SET
                question_text = COALESCE($2, question_text),
                question_type = COALESCE($3, question_type),
                options = COALESCE($4, options),
                is_required = COALESCE($5, is_required),
                is_active = COALESCE($6, is_active),
                display_order = COALESCE($7, display_order)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(question_id)
        .bind(&req.question_text)
        .bind(req.question_type)
        .bind(&req.options)
        .bind(req.is_required)
        .bind(req.is_active)
        .bind(req.display_order)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Form question"))
    }

    async fn delete_question(&self, question_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM form_questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Form question"));
        }
        Ok(())
    }

    async fn reorder_questions(&self, event_id: Uuid, order: &[QuestionOrder]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for entry in order {
            sqlx::query("UPDATE form_questions SET display_order = $3 WHERE id = $1 AND event_id = $2")
                .bind(entry.id)
                .bind(event_id)
                .bind(entry.display_order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_venue(&self, event_id: Uuid, req: &CreateVenueRequest) -> StoreResult<Venue> {
        let venue = sqlx::query_as(
            r#"
            INSERT INTO venues (id, event_id, name, address, total_capacity, available_slots, min_age)
            VALUES ($1, $2, $3, $4, $5, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(&req.name)
        .bind(&req.address)
        .bind(req.total_capacity)
        .bind(req.min_age)
        .fetch_one(&self.pool)
        .await?;
        Ok(venue)
    }

    async fn get_venue(&self, venue_id: Uuid) -> StoreResult<Venue> {
        sqlx::query_as("SELECT * FROM venues WHERE id = $1")
            .bind(venue_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Venue"))
    }

    async fn list_venues(&self, event_id: Uuid) -> StoreResult<Vec<Venue>> {
        let venues = sqlx::query_as("SELECT * FROM venues WHERE event_id = $1 ORDER BY name")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(venues)
    }

    async fn update_venue(&self, venue_id: Uuid, req: &UpdateVenueRequest) -> StoreResult<Venue> {
        let mut tx = self.pool.begin().await?;

        let current: Venue = sqlx::query_as("SELECT * FROM venues WHERE id = $1 FOR UPDATE")
            .bind(venue_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("Venue"))?;

        let (total, available) = match req.total_capacity {
            Some(new_capacity) => (
                new_capacity,
                capacity::resized_available(current.total_capacity, current.available_slots, new_capacity),
            ),
            None => (current.total_capacity, current.available_slots),
        };

        let venue = sqlx::query_as(
            r#"
            UPDATE venues SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                total_capacity = $4,
                available_slots = $5,
                min_age = COALESCE($6, min_age),
                is_active = COALESCE($7, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(venue_id)
        .bind(&req.name)
        .bind(&req.address)
        .bind(total)
        .bind(available)
        .bind(req.min_age)
        .bind(req.is_active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(venue)
    }

    async fn delete_venue(&self, venue_id: Uuid) -> StoreResult<VenueRemoval> {
        let mut tx = self.pool.begin().await?;

        let referenced: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM matches WHERE venue_id = $1)")
                .bind(venue_id)
                .fetch_one(&mut *tx)
                .await?;

        let (query, removal) = if referenced {
            ("UPDATE venues SET is_active = FALSE WHERE id = $1", VenueRemoval::Deactivated)
        } else {
            ("DELETE FROM venues WHERE id = $1", VenueRemoval::Deleted)
        };

        let result = sqlx::query(query).bind(venue_id).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Venue"));
        }

        tx.commit().await?;
        Ok(removal)
    }

    async fn update_venue_slots(&self, venue_id: Uuid, delta: i32) -> StoreResult<Venue> {
        let updated: Option<Venue> = sqlx::query_as(
            r#"
            UPDATE venues
            SET available_slots = LEAST(available_slots + $2, total_capacity)
            WHERE id = $1 AND available_slots + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(venue_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(venue) => Ok(venue),
            None => {
                // Distinguish a missing venue from one without room
                self.get_venue(venue_id).await?;
                Err(CapacityError::Exhausted(venue_id).into())
            }
        }
    }

    async fn get_match(&self, match_id: Uuid) -> StoreResult<Match> {
        sqlx::query_as(&format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS))
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Match"))
    }

    async fn list_matches(&self, event_id: Uuid) -> StoreResult<Vec<Match>> {
        let matches = sqlx::query_as(&format!(
            "SELECT {} FROM matches WHERE event_id = $1 ORDER BY created_at, id",
            MATCH_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    async fn create_match(&self, new: &NewMatch) -> StoreResult<Match> {
        let new = new.canonical().map_err(StoreError::InvalidInput)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(event_lock_key(new.event_id))
            .execute(&mut *tx)
            .await?;

        ensure_insertable(&mut tx, &new).await?;
        if let Some(venue_id) = new.venue_id {
            reserve_slot(&mut tx, new.event_id, venue_id).await?;
        }
        let m = insert_match(&mut tx, &new, new.venue_id.is_some()).await?;

        tx.commit().await?;
        Ok(m)
    }

    async fn create_matches(&self, event_id: Uuid, batch: &[NewMatch]) -> StoreResult<Vec<Match>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(event_lock_key(event_id))
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(batch.len());
        for new in batch {
            let new = new.canonical().map_err(StoreError::InvalidInput)?;
            if new.event_id != event_id {
                return Err(StoreError::InvalidInput("Batch spans several events".to_string()));
            }
            if new.venue_id.is_some() {
                return Err(StoreError::InvalidInput("Generated matches never carry a venue".to_string()));
            }
            // Earlier rows of this batch are visible here, so a repeated participant is caught too
            ensure_insertable(&mut tx, &new).await?;
            created.push(insert_match(&mut tx, &new, false).await?);
        }

        tx.commit().await?;

        tracing::debug!("Stored {} generated matches for event {}", created.len(), event_id);

        Ok(created)
    }

    async fn update_match(&self, match_id: Uuid, changes: &MatchChanges) -> StoreResult<Match> {
        let mut tx = self.pool.begin().await?;

        let current: Match = sqlx::query_as(&format!(
            "SELECT {} FROM matches WHERE id = $1 FOR UPDATE",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("Match"))?;

        let (venue_id, venue_touched) = match capacity::plan_transition(current.venue_id, changes.venue) {
            SlotTransition::Unchanged => (current.venue_id, false),
            SlotTransition::Release(old) => {
                release_slot(&mut tx, old).await?;
                (None, true)
            }
            SlotTransition::Reserve(new) => {
                reserve_slot(&mut tx, current.event_id, new).await?;
                (Some(new), true)
            }
            SlotTransition::Swap { from, to } => {
                reserve_slot(&mut tx, current.event_id, to).await?;
                release_slot(&mut tx, from).await?;
                (Some(to), true)
            }
        };

        let m = sqlx::query_as(&format!(
            r#"
            UPDATE matches SET
                status = COALESCE($2, status),
                venue_id = $3,
                venue_assigned_at = CASE
                    WHEN NOT $4 THEN venue_assigned_at
                    WHEN $3 IS NULL THEN NULL
                    ELSE NOW()
                END,
                notes = COALESCE($5, notes),
                compatibility_score = COALESCE($6, compatibility_score),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .bind(changes.status)
        .bind(venue_id)
        .bind(venue_touched)
        .bind(&changes.notes)
        .bind(changes.compatibility_score)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(m)
    }

    async fn delete_match(&self, match_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed: Match = sqlx::query_as(&format!(
            "DELETE FROM matches WHERE id = $1 RETURNING {}",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("Match"))?;
        remove_matches(&mut tx, std::slice::from_ref(&removed)).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> StoreResult<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lock_key_is_stable() {
        let id = Uuid::parse_str("00000000-0000-0001-ffff-ffffffffffff").unwrap();
        assert_eq!(event_lock_key(id), 1);
        assert_eq!(event_lock_key(id), event_lock_key(id));
    }

    #[test]
    fn test_map_unique_passes_other_errors_through() {
        let err = map_unique(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, StoreError::SqlxError(sqlx::Error::RowNotFound)));
    }
}
