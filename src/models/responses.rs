use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{Event, EventStatus};

/// Result of one generation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub matches_created: usize,
    pub participants_matched: usize,
    pub participants_unmatched: usize,
    pub message: String,
}

impl GenerationResult {
    /// Zero-match outcome when the pool is too small to pair
    pub fn insufficient(participants_unmatched: usize, message: impl Into<String>) -> Self {
        Self {
            matches_created: 0,
            participants_matched: 0,
            participants_unmatched,
            message: message.into(),
        }
    }
}

/// Event row with roster counts, for the organizer's dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub participant_count: i64,
    pub match_count: i64,
}

/// Event fields visible to unauthenticated registrants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicEventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub status: EventStatus,
}

impl From<Event> for PublicEventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            event_date: event.event_date,
            status: event.status,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Reply to a venue deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
