use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::capacity::{self, SlotTransition};
use crate::models::{
    CreateEventRequest, CreateQuestionRequest, CreateVenueRequest, Event, EventSummary, FormQuestion,
    Match, MatchChanges, MatchStatus, NewMatch, NewParticipant, Participant, ParticipantStatus,
    QuestionOrder, UpdateEventRequest, UpdateParticipantRequest, UpdateQuestionRequest,
    UpdateVenueRequest, Venue, VenueRemoval,
};
use crate::services::store::{MatchStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<Event>,
    participants: Vec<Participant>,
    questions: Vec<FormQuestion>,
    venues: Vec<Venue>,
    matches: Vec<Match>,
}

impl MemoryState {
    fn event(&self, id: Uuid) -> StoreResult<&Event> {
        self.events.iter().find(|e| e.id == id).ok_or(StoreError::NotFound("Event"))
    }

    fn participant_mut(&mut self, id: Uuid) -> StoreResult<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound("Participant"))
    }

    fn venue_mut(&mut self, id: Uuid) -> StoreResult<&mut Venue> {
        self.venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound("Venue"))
    }

    fn question_mut(&mut self, id: Uuid) -> StoreResult<&mut FormQuestion> {
        self.questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(StoreError::NotFound("Form question"))
    }

    /// Exclusivity and pair-uniqueness checks shared by single and batch inserts
    fn check_insertable(&self, new: &NewMatch) -> StoreResult<()> {
        for id in [new.participant1_id, new.participant2_id] {
            let participant = self
                .participants
                .iter()
                .find(|p| p.id == id)
                .ok_or(StoreError::NotFound("Participant"))?;
            if participant.event_id != new.event_id {
                return Err(StoreError::InvalidInput(format!(
                    "Participant {} does not belong to event {}",
                    id, new.event_id
                )));
            }
        }

        let pair_exists = self.matches.iter().any(|m| {
            m.event_id == new.event_id
                && m.participant1_id == new.participant1_id
                && m.participant2_id == new.participant2_id
        });
        if pair_exists {
            return Err(StoreError::Conflict("These participants are already matched".to_string()));
        }

        let busy = self.matches.iter().any(|m| {
            m.event_id == new.event_id && (m.involves(new.participant1_id) || m.involves(new.participant2_id))
        });
        if busy {
            return Err(StoreError::Conflict(
                "A participant in this pair is already matched".to_string(),
            ));
        }
        Ok(())
    }

    fn insert_match(&mut self, new: &NewMatch, venue_assigned_at: Option<chrono::DateTime<Utc>>) -> Match {
        let m = Match {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            participant1_id: new.participant1_id,
            participant2_id: new.participant2_id,
            compatibility_score: new.compatibility_score,
            status: MatchStatus::Pending,
            venue_id: new.venue_id,
            venue_assigned_at,
            matched_by: new.matched_by,
            notes: new.notes.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.matches.push(m.clone());
        for id in m.participants() {
            if let Ok(p) = self.participant_mut(id) {
                p.status = ParticipantStatus::Matched;
            }
        }
        m
    }

    /// Drop a match from the roster, giving back its slot and freeing its pair
    fn remove_match(&mut self, index: usize) -> Match {
        let m = self.matches.remove(index);
        if let Some(venue_id) = m.venue_id {
            if let Ok(venue) = self.venue_mut(venue_id) {
                capacity::release(venue);
            }
        }
        for id in m.participants() {
            if let Ok(p) = self.participant_mut(id) {
                if p.status == ParticipantStatus::Matched {
                    p.status = ParticipantStatus::Registered;
                }
            }
        }
        m
    }
}

/// In-process store behind a single lock
///
/// Every operation runs under the lock, so slot changes and match writes are
/// atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn create_event(&self, creator_id: Uuid, req: &CreateEventRequest) -> StoreResult<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            description: req.description.clone(),
            creator_id,
            event_date: req.event_date,
            status: req.status.unwrap_or_default(),
            settings: req.settings.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.state.lock().await.events.push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        self.state.lock().await.event(event_id).cloned()
    }

    async fn list_events(&self, creator_id: Uuid) -> StoreResult<Vec<EventSummary>> {
        let state = self.state.lock().await;
        let mut summaries: Vec<EventSummary> = state
            .events
            .iter()
            .filter(|e| e.creator_id == creator_id)
            .map(|e| EventSummary {
                id: e.id,
                name: e.name.clone(),
                event_date: e.event_date,
                status: e.status,
                created_at: e.created_at,
                participant_count: state.participants.iter().filter(|p| p.event_id == e.id).count() as i64,
                match_count: state.matches.iter().filter(|m| m.event_id == e.id).count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn update_event(&self, event_id: Uuid, req: &UpdateEventRequest) -> StoreResult<Event> {
        let mut state = self.state.lock().await;
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(StoreError::NotFound("Event"))?;

        if let Some(name) = &req.name {
            event.name = name.clone();
        }
        if let Some(description) = &req.description {
            event.description = Some(description.clone());
        }
        if let Some(date) = req.event_date {
            event.event_date = date;
        }
        if let Some(status) = req.status {
            event.status = status;
        }
        if let Some(settings) = &req.settings {
            event.settings = Some(settings.clone());
        }
        event.updated_at = Some(Utc::now());
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.event(event_id)?;
        state.events.retain(|e| e.id != event_id);
        state.participants.retain(|p| p.event_id != event_id);
        state.questions.retain(|q| q.event_id != event_id);
        state.venues.retain(|v| v.event_id != event_id);
        state.matches.retain(|m| m.event_id != event_id);
        Ok(())
    }

    async fn create_participant(&self, new: &NewParticipant) -> StoreResult<Participant> {
        let mut state = self.state.lock().await;
        state.event(new.event_id)?;
        let duplicate = state
            .participants
            .iter()
            .any(|p| p.event_id == new.event_id && p.email.eq_ignore_ascii_case(&new.email));
        if duplicate {
            return Err(StoreError::Conflict("Email already registered for this event".to_string()));
        }

        let participant = Participant {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            name: new.name.clone(),
            email: new.email.clone(),
            phone_number: new.phone_number.clone(),
            age: new.age,
            form_answers: new.form_answers.clone(),
            status: ParticipantStatus::Registered,
            created_at: Utc::now(),
        };
        state.participants.push(participant.clone());
        Ok(participant)
    }

    async fn get_participant(&self, participant_id: Uuid) -> StoreResult<Participant> {
        self.state.lock().await.participant_mut(participant_id).map(|p| p.clone())
    }

    async fn list_participants(&self, event_id: Uuid) -> StoreResult<Vec<Participant>> {
        let state = self.state.lock().await;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn participant_email_exists(&self, event_id: Uuid, email: &str) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .participants
            .iter()
            .any(|p| p.event_id == event_id && p.email.eq_ignore_ascii_case(email)))
    }

    async fn update_participant(
        &self,
        participant_id: Uuid,
        req: &UpdateParticipantRequest,
    ) -> StoreResult<Participant> {
        let mut state = self.state.lock().await;
        let event_id = state.participant_mut(participant_id)?.event_id;

        if let Some(email) = &req.email {
            let taken = state.participants.iter().any(|p| {
                p.event_id == event_id && p.id != participant_id && p.email.eq_ignore_ascii_case(email)
            });
            if taken {
                return Err(StoreError::Conflict("Email already registered for this event".to_string()));
            }
        }

        let participant = state.participant_mut(participant_id)?;
        if let Some(name) = &req.name {
            participant.name = name.clone();
        }
        if let Some(email) = &req.email {
            participant.email = email.clone();
        }
        if let Some(phone) = &req.phone {
            participant.phone_number = Some(phone.clone());
        }
        if let Some(age) = req.age {
            participant.age = Some(age);
        }
        if let Some(answers) = &req.form_answers {
            participant.form_answers = answers.clone();
        }
        if let Some(status) = req.status {
            participant.status = status;
        }
        Ok(participant.clone())
    }

    async fn delete_participant(&self, participant_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.participant_mut(participant_id)?;

        while let Some(index) = state.matches.iter().position(|m| m.involves(participant_id)) {
            state.remove_match(index);
        }
        state.participants.retain(|p| p.id != participant_id);
        Ok(())
    }

    async fn create_question(&self, event_id: Uuid, req: &CreateQuestionRequest) -> StoreResult<FormQuestion> {
        let mut state = self.state.lock().await;
        state.event(event_id)?;

        let existing = state.questions.iter().filter(|q| q.event_id == event_id);
        let mut next_order = 1;
        for q in existing {
            if q.question_key == req.question_key {
                return Err(StoreError::Conflict(format!(
                    "Question key '{}' already exists",
                    req.question_key
                )));
            }
            next_order = next_order.max(q.display_order + 1);
        }

        let question = FormQuestion {
            id: Uuid::new_v4(),
            event_id,
            question_key: req.question_key.clone(),
            question_text: req.question_text.clone(),
            question_type: req.question_type,
            options: req.options.clone(),
            is_required: req.is_required,
            is_active: req.is_active,
            is_standard: false,
            display_order: req.display_order.unwrap_or(next_order),
            created_at: Utc::now(),
        };
        state.questions.push(question.clone());
        Ok(question)
    }

    async fn get_question(&self, question_id: Uuid) -> StoreResult<FormQuestion> {
        self.state.lock().await.question_mut(question_id).map(|q| q.clone())
    }

    async fn list_questions(&self, event_id: Uuid, active_only: bool) -> StoreResult<Vec<FormQuestion>> {
        let state = self.state.lock().await;
        let mut questions: Vec<FormQuestion> = state
            .questions
            .iter()
            .filter(|q| q.event_id == event_id && (!active_only || q.is_active))
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.display_order);
        Ok(questions)
    }

    async fn update_question(&self, question_id: Uuid, req: &UpdateQuestionRequest) -> StoreResult<FormQuestion> {
        let mut state = self.state.lock().await;
        let question = state.question_mut(question_id)?;

        if let Some(text) = &req.question_text {
            question.question_text = text.clone();
        }
        if let Some(question_type) = req.question_type {
            question.question_type = question_type;
        }
        if let Some(options) = &req.options {
            question.options = Some(options.clone());
        }
        if let Some(required) = req.is_required {
            question.is_required = required;
        }
        if let Some(active) = req.is_active {
            question.is_active = active;
        }
        if let Some(order) = req.display_order {
            question.display_order = order;
        }
        Ok(question.clone())
    }

    async fn delete_question(&self, question_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.question_mut(question_id)?;
        state.questions.retain(|q| q.id != question_id);
        Ok(())
    }

    async fn reorder_questions(&self, event_id: Uuid, order: &[QuestionOrder]) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        for entry in order {
            if let Some(q) = state
                .questions
                .iter_mut()
                .find(|q| q.id == entry.id && q.event_id == event_id)
            {
                q.display_order = entry.display_order;
            }
        }
        Ok(())
    }

    async fn create_venue(&self, event_id: Uuid, req: &CreateVenueRequest) -> StoreResult<Venue> {
        let mut state = self.state.lock().await;
        state.event(event_id)?;
        let venue = Venue {
            id: Uuid::new_v4(),
            event_id,
            name: req.name.clone(),
            address: req.address.clone(),
            total_capacity: req.total_capacity,
            available_slots: req.total_capacity,
            min_age: req.min_age,
            is_active: true,
            created_at: Utc::now(),
        };
        state.venues.push(venue.clone());
        Ok(venue)
    }

    async fn get_venue(&self, venue_id: Uuid) -> StoreResult<Venue> {
        self.state.lock().await.venue_mut(venue_id).map(|v| v.clone())
    }

    async fn list_venues(&self, event_id: Uuid) -> StoreResult<Vec<Venue>> {
        let state = self.state.lock().await;
        let mut venues: Vec<Venue> = state.venues.iter().filter(|v| v.event_id == event_id).cloned().collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(venues)
    }

    async fn update_venue(&self, venue_id: Uuid, req: &UpdateVenueRequest) -> StoreResult<Venue> {
        let mut state = self.state.lock().await;
        let venue = state.venue_mut(venue_id)?;

        if let Some(name) = &req.name {
            venue.name = name.clone();
        }
        if let Some(address) = &req.address {
            venue.address = Some(address.clone());
        }
        if let Some(new_capacity) = req.total_capacity {
            venue.available_slots =
                capacity::resized_available(venue.total_capacity, venue.available_slots, new_capacity);
            venue.total_capacity = new_capacity;
        }
        if let Some(min_age) = req.min_age {
            venue.min_age = min_age;
        }
        if let Some(active) = req.is_active {
            venue.is_active = active;
        }
        Ok(venue.clone())
    }

    async fn delete_venue(&self, venue_id: Uuid) -> StoreResult<VenueRemoval> {
        let mut state = self.state.lock().await;
        let referenced = state.matches.iter().any(|m| m.venue_id == Some(venue_id));
        let venue = state.venue_mut(venue_id)?;
        if referenced {
            venue.is_active = false;
            return Ok(VenueRemoval::Deactivated);
        }
        state.venues.retain(|v| v.id != venue_id);
        Ok(VenueRemoval::Deleted)
    }

    async fn update_venue_slots(&self, venue_id: Uuid, delta: i32) -> StoreResult<Venue> {
        let mut state = self.state.lock().await;
        let venue = state.venue_mut(venue_id)?;
        capacity::apply_delta(venue, delta)?;
        Ok(venue.clone())
    }

    async fn get_match(&self, match_id: Uuid) -> StoreResult<Match> {
        let state = self.state.lock().await;
        state
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or(StoreError::NotFound("Match"))
    }

    async fn list_matches(&self, event_id: Uuid) -> StoreResult<Vec<Match>> {
        let state = self.state.lock().await;
        Ok(state.matches.iter().filter(|m| m.event_id == event_id).cloned().collect())
    }

    async fn create_match(&self, new: &NewMatch) -> StoreResult<Match> {
        let new = new.canonical().map_err(StoreError::InvalidInput)?;
        let mut state = self.state.lock().await;
        state.check_insertable(&new)?;

        let assigned_at = match new.venue_id {
            Some(venue_id) => {
                let venue = state.venue_mut(venue_id)?;
                if venue.event_id != new.event_id {
                    return Err(StoreError::NotFound("Venue"));
                }
                capacity::reserve(venue)?;
                Some(Utc::now())
            }
            None => None,
        };

        Ok(state.insert_match(&new, assigned_at))
    }

    async fn create_matches(&self, event_id: Uuid, batch: &[NewMatch]) -> StoreResult<Vec<Match>> {
        let batch = batch
            .iter()
            .map(|m| m.canonical().map_err(StoreError::InvalidInput))
            .collect::<StoreResult<Vec<NewMatch>>>()?;

        let mut state = self.state.lock().await;

        // Validate the whole batch before writing anything
        let mut in_batch = HashSet::new();
        for new in &batch {
            if new.event_id != event_id {
                return Err(StoreError::InvalidInput("Batch spans several events".to_string()));
            }
            if new.venue_id.is_some() {
                return Err(StoreError::InvalidInput("Generated matches never carry a venue".to_string()));
            }
            state.check_insertable(new)?;
            if !in_batch.insert(new.participant1_id) || !in_batch.insert(new.participant2_id) {
                return Err(StoreError::Conflict("Participant appears twice in one batch".to_string()));
            }
        }

        Ok(batch.iter().map(|new| state.insert_match(new, None)).collect())
    }

    async fn update_match(&self, match_id: Uuid, changes: &MatchChanges) -> StoreResult<Match> {
        let mut state = self.state.lock().await;
        let index = state
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(StoreError::NotFound("Match"))?;
        let current = state.matches[index].clone();

        let (venue_id, assigned_at) = match capacity::plan_transition(current.venue_id, changes.venue) {
            SlotTransition::Unchanged => (current.venue_id, current.venue_assigned_at),
            SlotTransition::Release(old) => {
                capacity::release(state.venue_mut(old)?);
                (None, None)
            }
            SlotTransition::Reserve(new) => {
                let venue = state.venue_mut(new)?;
                if venue.event_id != current.event_id {
                    return Err(StoreError::NotFound("Venue"));
                }
                capacity::reserve(venue)?;
                (Some(new), Some(Utc::now()))
            }
            SlotTransition::Swap { from, to } => {
                // Reserve first so a full target leaves the old seat untouched
                let target = state.venue_mut(to)?;
                if target.event_id != current.event_id {
                    return Err(StoreError::NotFound("Venue"));
                }
                capacity::reserve(target)?;
                if let Ok(old) = state.venue_mut(from) {
                    capacity::release(old);
                }
                (Some(to), Some(Utc::now()))
            }
        };

        let m = &mut state.matches[index];
        m.venue_id = venue_id;
        m.venue_assigned_at = assigned_at;
        if let Some(status) = changes.status {
            m.status = status;
        }
        if let Some(notes) = &changes.notes {
            m.notes = Some(notes.clone());
        }
        if let Some(score) = changes.compatibility_score {
            m.compatibility_score = score;
        }
        m.updated_at = Some(Utc::now());
        Ok(m.clone())
    }

    async fn delete_match(&self, match_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let index = state
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(StoreError::NotFound("Match"))?;
        state.remove_match(index);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormAnswers, VenueChange};
    use chrono::NaiveDate;

    async fn seeded() -> (MemoryStore, Event, Vec<Participant>) {
        let store = MemoryStore::new();
        let event = store
            .create_event(
                Uuid::new_v4(),
                &CreateEventRequest {
                    name: "Spring mixer".to_string(),
                    description: None,
                    event_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                    status: None,
                    settings: None,
                },
            )
            .await
            .unwrap();

        let mut participants = Vec::new();
        for i in 0..4 {
            let p = store
                .create_participant(&NewParticipant {
                    event_id: event.id,
                    name: format!("P{}", i),
                    email: format!("p{}@example.com", i),
                    phone_number: None,
                    age: Some(25),
                    form_answers: FormAnswers::new(),
                })
                .await
                .unwrap();
            participants.push(p);
        }
        (store, event, participants)
    }

    async fn venue(store: &MemoryStore, event_id: Uuid, capacity: i32) -> Venue {
        store
            .create_venue(
                event_id,
                &CreateVenueRequest {
                    name: "Bar".to_string(),
                    address: None,
                    total_capacity: capacity,
                    min_age: 18,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_match_canonicalizes_and_marks_matched() {
        let (store, event, ps) = seeded().await;
        let (hi, lo) = if ps[0].id > ps[1].id { (ps[0].id, ps[1].id) } else { (ps[1].id, ps[0].id) };

        let mut new = NewMatch::new(event.id, hi, lo, 60, event.creator_id);
        // bypass the constructor's ordering
        new.participant1_id = hi;
        new.participant2_id = lo;
        let m = store.create_match(&new).await.unwrap();

        assert!(m.participant1_id < m.participant2_id);
        let p = store.get_participant(hi).await.unwrap();
        assert_eq!(p.status, ParticipantStatus::Matched);
    }

    #[tokio::test]
    async fn test_duplicate_pair_is_conflict() {
        let (store, event, ps) = seeded().await;
        store
            .create_match(&NewMatch::new(event.id, ps[0].id, ps[1].id, 50, event.creator_id))
            .await
            .unwrap();

        let again = store
            .create_match(&NewMatch::new(event.id, ps[1].id, ps[0].id, 50, event.creator_id))
            .await;
        assert!(matches!(again, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_email_change_to_taken_address_is_conflict() {
        let (store, _, ps) = seeded().await;
        let taken = UpdateParticipantRequest {
            email: Some("P0@EXAMPLE.COM".to_string()),
            ..Default::default()
        };

        let result = store.update_participant(ps[1].id, &taken).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.get_participant(ps[1].id).await.unwrap().email, "p1@example.com");

        // Re-casing your own address is fine
        let own = UpdateParticipantRequest {
            email: Some("P1@Example.com".to_string()),
            ..Default::default()
        };
        let updated = store.update_participant(ps[1].id, &own).await.unwrap();
        assert_eq!(updated.email, "P1@Example.com");
    }

    #[tokio::test]
    async fn test_venue_swap_to_full_venue_keeps_old_reservation() {
        let (store, event, ps) = seeded().await;
        let a = venue(&store, event.id, 1).await;
        let b = venue(&store, event.id, 1).await;

        let m1 = store
            .create_match(&NewMatch::new(event.id, ps[0].id, ps[1].id, 50, event.creator_id).with_venue(Some(a.id)))
            .await
            .unwrap();
        store
            .create_match(&NewMatch::new(event.id, ps[2].id, ps[3].id, 50, event.creator_id).with_venue(Some(b.id)))
            .await
            .unwrap();

        let swap = MatchChanges {
            venue: VenueChange::Assign(b.id),
            ..Default::default()
        };
        let result = store.update_match(m1.id, &swap).await;

        assert!(matches!(result, Err(StoreError::Capacity(_))));
        assert_eq!(store.get_venue(a.id).await.unwrap().available_slots, 0);
        assert_eq!(store.get_venue(b.id).await.unwrap().available_slots, 0);
        assert_eq!(store.get_match(m1.id).await.unwrap().venue_id, Some(a.id));
    }

    #[tokio::test]
    async fn test_delete_participant_cascades_and_releases() {
        let (store, event, ps) = seeded().await;
        let v = venue(&store, event.id, 2).await;
        store
            .create_match(&NewMatch::new(event.id, ps[0].id, ps[1].id, 50, event.creator_id).with_venue(Some(v.id)))
            .await
            .unwrap();

        store.delete_participant(ps[0].id).await.unwrap();

        assert!(store.list_matches(event.id).await.unwrap().is_empty());
        assert_eq!(store.get_venue(v.id).await.unwrap().available_slots, 2);
        let partner = store.get_participant(ps[1].id).await.unwrap();
        assert_eq!(partner.status, ParticipantStatus::Registered);
    }

    #[tokio::test]
    async fn test_delete_referenced_venue_deactivates() {
        let (store, event, ps) = seeded().await;
        let v = venue(&store, event.id, 2).await;
        let unused = venue(&store, event.id, 2).await;
        store
            .create_match(&NewMatch::new(event.id, ps[0].id, ps[1].id, 50, event.creator_id).with_venue(Some(v.id)))
            .await
            .unwrap();

        assert_eq!(store.delete_venue(v.id).await.unwrap(), VenueRemoval::Deactivated);
        assert!(!store.get_venue(v.id).await.unwrap().is_active);
        assert_eq!(store.delete_venue(unused.id).await.unwrap(), VenueRemoval::Deleted);
        assert!(store.get_venue(unused.id).await.is_err());
    }
}
