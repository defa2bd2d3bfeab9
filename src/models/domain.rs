use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle of a matching event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Setup,
    RegistrationOpen,
    MatchingInProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn accepts_registrations(self) -> bool {
        matches!(self, EventStatus::RegistrationOpen)
    }

    /// Finished and cancelled events keep their match roster frozen
    pub fn allows_generation(self) -> bool {
        !matches!(self, EventStatus::Completed | EventStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Matched,
    Withdrawn,
    Waitlisted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Approved,
    Notified,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Email,
    Phone,
    Date,
    Number,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
}

impl QuestionType {
    /// Question types answered by picking from `options`
    pub fn has_choices(self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::MultiSelect | QuestionType::Radio | QuestionType::Checkbox
        )
    }
}

/// Keys every registration form carries; never compared when scoring
pub const STANDARD_KEYS: [&str; 7] = [
    "gender",
    "interested_in",
    "name",
    "email",
    "phone",
    "date_of_birth",
    "bio",
];

pub fn is_standard_key(key: &str) -> bool {
    STANDARD_KEYS.contains(&key)
}

/// Organizer-defined registration answers, keyed by question key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormAnswers(BTreeMap<String, Value>);

impl FormAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Non-empty string answer for `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn gender(&self) -> Option<&str> {
        self.text("gender")
    }

    pub fn interested_in(&self) -> Option<&str> {
        self.text("interested_in")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormAnswers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Matching event owned by the matcher who created it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub event_date: NaiveDate,
    pub status: EventStatus,
    pub settings: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Person registered for a single event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    #[sqlx(json)]
    pub form_answers: FormAnswers,
    pub status: ParticipantStatus,
    pub created_at: DateTime<Utc>,
}

/// Participant data accepted at registration, answers already normalized
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    pub form_answers: FormAnswers,
}

/// Physical location with a limited number of match slots
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub total_capacity: i32,
    pub available_slots: i32,
    pub min_age: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Outcome of deleting a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueRemoval {
    /// No match referenced the venue, so the row is gone
    Deleted,
    /// Matches still reference the venue; it was switched off instead
    Deactivated,
}

/// Stored pairing of two participants. `participant1_id < participant2_id` always.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant1_id: Uuid,
    pub participant2_id: Uuid,
    pub compatibility_score: i32,
    pub status: MatchStatus,
    pub venue_id: Option<Uuid>,
    pub venue_assigned_at: Option<DateTime<Utc>>,
    pub matched_by: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn involves(&self, participant_id: Uuid) -> bool {
        self.participant1_id == participant_id || self.participant2_id == participant_id
    }

    pub fn participants(&self) -> [Uuid; 2] {
        [self.participant1_id, self.participant2_id]
    }

    pub fn partner_of(&self, participant_id: Uuid) -> Option<Uuid> {
        if self.participant1_id == participant_id {
            Some(self.participant2_id)
        } else if self.participant2_id == participant_id {
            Some(self.participant1_id)
        } else {
            None
        }
    }
}

/// Order two participant ids so the smaller one comes first
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Match about to be inserted
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub event_id: Uuid,
    pub participant1_id: Uuid,
    pub participant2_id: Uuid,
    pub compatibility_score: i32,
    pub venue_id: Option<Uuid>,
    pub matched_by: Uuid,
    pub notes: Option<String>,
}

impl NewMatch {
    pub fn new(event_id: Uuid, a: Uuid, b: Uuid, compatibility_score: i32, matched_by: Uuid) -> Self {
        let (participant1_id, participant2_id) = canonical_pair(a, b);
        Self {
            event_id,
            participant1_id,
            participant2_id,
            compatibility_score,
            venue_id: None,
            matched_by,
            notes: None,
        }
    }

    pub fn with_venue(mut self, venue_id: Option<Uuid>) -> Self {
        self.venue_id = venue_id;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Copy with canonical participant order, rejecting self-pairs
    pub fn canonical(&self) -> Result<NewMatch, String> {
        if self.participant1_id == self.participant2_id {
            return Err("Cannot match a participant with themselves".to_string());
        }
        let (participant1_id, participant2_id) = canonical_pair(self.participant1_id, self.participant2_id);
        Ok(NewMatch {
            participant1_id,
            participant2_id,
            ..self.clone()
        })
    }
}

/// How an update treats the match's venue reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VenueChange {
    #[default]
    Keep,
    Clear,
    Assign(Uuid),
}

/// Partial update of a match
#[derive(Debug, Clone, Default)]
pub struct MatchChanges {
    pub status: Option<MatchStatus>,
    pub venue: VenueChange,
    pub notes: Option<String>,
    pub compatibility_score: Option<i32>,
}

/// Registration question configured by the organizer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FormQuestion {
    pub id: Uuid,
    pub event_id: Uuid,
    pub question_key: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub is_required: bool,
    pub is_active: bool,
    pub is_standard: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Scoring constants for the shared-answer overlap metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub base_score: u8,
    pub overlap_weight: u8,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: 50,
            overlap_weight: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_orders_ids() {
        let a = Uuid::from_u128(2);
        let b = Uuid::from_u128(1);
        assert_eq!(canonical_pair(a, b), (b, a));
        assert_eq!(canonical_pair(b, a), (b, a));
    }

    #[test]
    fn test_new_match_rejects_self_pair() {
        let id = Uuid::new_v4();
        let m = NewMatch::new(Uuid::new_v4(), id, id, 50, Uuid::new_v4());
        assert!(m.canonical().is_err());
    }

    #[test]
    fn test_form_answers_text_skips_blank_and_non_strings() {
        let answers: FormAnswers = [
            ("gender", Value::from("female")),
            ("interested_in", Value::from("  ")),
            ("music", Value::from(vec!["rock"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(answers.gender(), Some("female"));
        assert_eq!(answers.interested_in(), None);
        assert_eq!(answers.text("music"), None);
    }

    #[test]
    fn test_status_gates() {
        assert!(EventStatus::RegistrationOpen.accepts_registrations());
        assert!(!EventStatus::Setup.accepts_registrations());
        assert!(EventStatus::MatchingInProgress.allows_generation());
        assert!(!EventStatus::Cancelled.allows_generation());
    }
}
