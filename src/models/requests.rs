use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::core::compatibility::{normalize_gender, normalize_preference};
use crate::models::domain::{
    is_standard_key, EventStatus, FormAnswers, MatchChanges, MatchStatus, NewParticipant,
    ParticipantStatus, QuestionType, VenueChange,
};

/// Genders accepted at registration, after normalization
pub const GENDERS: [&str; 4] = ["male", "female", "non_binary", "other"];

/// Preferences accepted at registration, after normalization
pub const PREFERENCES: [&str; 3] = ["male", "female", "everyone"];

/// Distinguishes an absent field from an explicit `null`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub status: Option<EventStatus>,
    pub settings: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub settings: Option<Value>,
}

/// Public registration payload
///
/// `gender` and `interested_in` may arrive top-level or inside `form_answers`;
/// top-level values win.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterParticipantRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(range(min = 18, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub interested_in: Option<String>,
    #[serde(default)]
    pub form_answers: FormAnswers,
}

impl RegisterParticipantRequest {
    /// Merge identity fields into the answers and normalize them
    pub fn into_new_participant(self, event_id: Uuid) -> Result<NewParticipant, String> {
        let mut answers = self.form_answers;
        if let Some(gender) = self.gender {
            answers.insert("gender", gender);
        }
        if let Some(interested_in) = self.interested_in {
            answers.insert("interested_in", interested_in);
        }

        if answers.gender().is_none() {
            return Err("gender is required".to_string());
        }
        if answers.interested_in().is_none() {
            return Err("interested_in is required".to_string());
        }
        let answers = normalize_identity_answers(answers)?;

        Ok(NewParticipant {
            event_id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone,
            age: self.age,
            form_answers: answers,
        })
    }
}

/// Normalize and validate `gender` / `interested_in` when present
pub fn normalize_identity_answers(mut answers: FormAnswers) -> Result<FormAnswers, String> {
    if let Some(raw) = answers.gender() {
        let gender = normalize_gender(raw);
        if !GENDERS.contains(&gender.as_str()) {
            return Err(format!("gender must be one of: {}", GENDERS.join(", ")));
        }
        answers.insert("gender", gender);
    }
    if let Some(raw) = answers.interested_in() {
        let preference = normalize_preference(raw);
        if !PREFERENCES.contains(&preference.as_str()) {
            return Err(format!("interested_in must be one of: {}", PREFERENCES.join(", ")));
        }
        answers.insert("interested_in", preference);
    }
    Ok(answers)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateParticipantRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 18, max = 120))]
    pub age: Option<i32>,
    pub form_answers: Option<FormAnswers>,
    pub status: Option<ParticipantStatus>,
}

impl UpdateParticipantRequest {
    pub fn normalized(mut self) -> Result<Self, String> {
        if let Some(answers) = self.form_answers.take() {
            self.form_answers = Some(normalize_identity_answers(answers)?);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub address: Option<String>,
    #[validate(range(min = 1))]
    pub total_capacity: i32,
    #[validate(range(min = 0, max = 120))]
    pub min_age: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = 1))]
    pub total_capacity: Option<i32>,
    #[validate(range(min = 0, max = 120))]
    pub min_age: Option<i32>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 64))]
    pub question_key: String,
    #[validate(length(min = 1, max = 500))]
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub display_order: Option<i32>,
}

impl CreateQuestionRequest {
    pub fn check(&self) -> Result<(), String> {
        if is_standard_key(&self.question_key) {
            return Err(format!("'{}' is a standard question key", self.question_key));
        }
        check_options(self.question_type, self.options.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 500))]
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub options: Option<Vec<String>>,
    pub is_required: Option<bool>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl UpdateQuestionRequest {
    /// Validate against the stored question type when the update leaves it unchanged
    pub fn check(&self, current: QuestionType, current_options: Option<&[String]>) -> Result<(), String> {
        let question_type = self.question_type.unwrap_or(current);
        let options = self.options.as_deref().or(current_options);
        check_options(question_type, options)
    }
}

fn check_options(question_type: QuestionType, options: Option<&[String]>) -> Result<(), String> {
    if question_type.has_choices() && options.map_or(0, <[String]>::len) < 2 {
        return Err("Choice questions need at least 2 options".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOrder {
    pub id: Uuid,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderQuestionsRequest {
    pub questions: Vec<QuestionOrder>,
}

/// Manual match creation. Without a score the service computes one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMatchRequest {
    pub participant1_id: Uuid,
    pub participant2_id: Uuid,
    #[validate(range(min = 0, max = 100))]
    pub compatibility_score: Option<i32>,
    pub venue_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMatchRequest {
    pub status: Option<MatchStatus>,
    /// Absent keeps the venue, `null` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub venue_id: Option<Option<Uuid>>,
    pub notes: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub compatibility_score: Option<i32>,
}

impl UpdateMatchRequest {
    pub fn changes(&self) -> MatchChanges {
        let venue = match self.venue_id {
            None => VenueChange::Keep,
            Some(None) => VenueChange::Clear,
            Some(Some(id)) => VenueChange::Assign(id),
        };
        MatchChanges {
            status: self.status,
            venue,
            notes: self.notes.clone(),
            compatibility_score: self.compatibility_score,
        }
    }
}
