use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::{eligible_pool, PairingEngine};
use crate::models::{EventStatus, GenerationResult, NewMatch};
use crate::services::store::{MatchStore, StoreError};

/// Errors that stop a generation pass before anything is written
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Event {0} not found")]
    EventNotFound(Uuid),

    #[error("Only the event creator may generate matches")]
    Forbidden,

    #[error("Matches cannot be generated for an event in status {0:?}")]
    EventClosed(EventStatus),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs greedy pairing over an event roster and persists the result
///
/// Passes for the same event are serialized from the read of existing
/// matches to the write of new ones. All pairs of a pass are written in
/// one batch, so a failed or cancelled pass leaves no partial roster.
#[derive(Clone)]
pub struct MatchGenerator {
    store: Arc<dyn MatchStore>,
    engine: PairingEngine,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl MatchGenerator {
    pub fn new(store: Arc<dyn MatchStore>, engine: PairingEngine) -> Self {
        Self {
            store,
            engine,
            locks: Arc::new(DashMap::new()),
        }
    }

    pub fn engine(&self) -> &PairingEngine {
        &self.engine
    }

    fn event_lock(&self, event_id: Uuid) -> Arc<Mutex<()>> {
        self.locks.entry(event_id).or_default().clone()
    }

    /// Drop the event's lock entry unless another pass holds or waits on it.
    /// `lock` is the caller's clone, so an idle entry has exactly two owners.
    fn prune_lock(&self, event_id: Uuid, lock: Arc<Mutex<()>>) {
        self.locks
            .remove_if(&event_id, |_, held| Arc::ptr_eq(held, &lock) && Arc::strong_count(held) == 2);
    }

    pub async fn generate_matches(
        &self,
        event_id: Uuid,
        requesting_matcher_id: Uuid,
    ) -> Result<GenerationResult, GenerationError> {
        let event = self.store.get_event(event_id).await.map_err(|e| match e {
            StoreError::NotFound(_) => GenerationError::EventNotFound(event_id),
            other => other.into(),
        })?;

        if event.creator_id != requesting_matcher_id {
            return Err(GenerationError::Forbidden);
        }
        if !event.status.allows_generation() {
            return Err(GenerationError::EventClosed(event.status));
        }

        let lock = self.event_lock(event_id);
        let result = {
            let _guard = lock.lock().await;
            self.pair_and_store(event_id, requesting_matcher_id).await
        };
        self.prune_lock(event_id, lock);
        result
    }

    /// Read the roster, pair the eligible pool and write the batch. Runs under the event lock.
    async fn pair_and_store(
        &self,
        event_id: Uuid,
        requesting_matcher_id: Uuid,
    ) -> Result<GenerationResult, GenerationError> {
        let participants = self.store.list_participants(event_id).await?;
        let existing = self.store.list_matches(event_id).await?;
        let pool = eligible_pool(&participants, &existing);

        if participants.len() < 2 {
            tracing::info!("Event {} has {} participants, nothing to pair", event_id, participants.len());
            return Ok(GenerationResult::insufficient(
                pool.len(),
                "Insufficient participants: at least 2 are needed to generate matches",
            ));
        }
        if pool.len() < 2 {
            tracing::info!("Event {} has {} unmatched participants, nothing to pair", event_id, pool.len());
            return Ok(GenerationResult::insufficient(
                pool.len(),
                "Insufficient unmatched participants: at least 2 are needed to generate matches",
            ));
        }

        let outcome = self.engine.pair(&pool);
        tracing::debug!(
            "Event {}: {} pairs proposed from a pool of {}",
            event_id,
            outcome.pairs.len(),
            outcome.pool_size
        );

        let batch: Vec<NewMatch> = outcome
            .pairs
            .iter()
            .map(|pair| {
                NewMatch::new(
                    event_id,
                    pair.first,
                    pair.second,
                    i32::from(pair.score),
                    requesting_matcher_id,
                )
            })
            .collect();

        let created = if batch.is_empty() {
            Vec::new()
        } else {
            self.store.create_matches(event_id, &batch).await?
        };

        tracing::info!(
            "Generated {} matches for event {} ({} participants left unmatched)",
            created.len(),
            event_id,
            outcome.participants_unmatched()
        );

        Ok(GenerationResult {
            matches_created: created.len(),
            participants_matched: outcome.participants_matched(),
            participants_unmatched: outcome.participants_unmatched(),
            message: format!("Generated {} matches", created.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateEventRequest, FormAnswers, NewParticipant, ParticipantStatus, UpdateEventRequest,
        UpdateParticipantRequest,
    };
    use crate::services::MemoryStore;
    use chrono::NaiveDate;
    use std::time::Duration;

    async fn event_with(store: &MemoryStore, creator: Uuid, count: usize) -> Uuid {
        let event = store
            .create_event(
                creator,
                &CreateEventRequest {
                    name: "Autumn social".to_string(),
                    description: None,
                    event_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
                    status: Some(EventStatus::RegistrationOpen),
                    settings: None,
                },
            )
            .await
            .unwrap();

        for i in 0..count {
            let answers: FormAnswers = [("gender", "non_binary"), ("interested_in", "everyone")]
                .into_iter()
                .collect();
            store
                .create_participant(&NewParticipant {
                    event_id: event.id,
                    name: format!("Guest {}", i),
                    email: format!("guest{}@example.com", i),
                    phone_number: None,
                    age: Some(28),
                    form_answers: answers,
                })
                .await
                .unwrap();
        }
        event.id
    }

    #[tokio::test]
    async fn test_generation_requires_creator() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let event_id = event_with(&store, creator, 2).await;
        let generator = MatchGenerator::new(store, PairingEngine::default());

        let result = generator.generate_matches(event_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(GenerationError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unknown_event() {
        let store = Arc::new(MemoryStore::new());
        let generator = MatchGenerator::new(store, PairingEngine::default());

        let result = generator.generate_matches(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(GenerationError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn test_closed_event_is_refused() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let event_id = event_with(&store, creator, 2).await;
        store
            .update_event(
                event_id,
                &UpdateEventRequest {
                    status: Some(EventStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let generator = MatchGenerator::new(store, PairingEngine::default());

        let result = generator.generate_matches(event_id, creator).await;
        assert!(matches!(result, Err(GenerationError::EventClosed(EventStatus::Completed))));
    }

    #[tokio::test]
    async fn test_second_pass_finds_nothing_new() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let event_id = event_with(&store, creator, 5).await;
        let generator = MatchGenerator::new(store.clone(), PairingEngine::default());

        let first = generator.generate_matches(event_id, creator).await.unwrap();
        assert_eq!(first.matches_created, 2);
        assert_eq!(first.participants_unmatched, 1);

        let second = generator.generate_matches(event_id, creator).await.unwrap();
        assert_eq!(second.matches_created, 0);
        assert_eq!(second.participants_unmatched, 1);

        let matched = store
            .list_participants(event_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.status == ParticipantStatus::Matched)
            .count();
        assert_eq!(matched, 4);
    }

    #[tokio::test]
    async fn test_clones_share_the_event_lock() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let event_id = event_with(&store, creator, 2).await;
        let generator = MatchGenerator::new(store.clone(), PairingEngine::default());

        let held = generator.clone().event_lock(event_id);
        let guard = held.lock().await;
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            generator.generate_matches(event_id, creator),
        )
        .await;
        assert!(blocked.is_err());
        assert!(store.list_matches(event_id).await.unwrap().is_empty());

        drop(guard);
        drop(held);
        let result = generator.generate_matches(event_id, creator).await.unwrap();
        assert_eq!(result.matches_created, 1);
        assert!(generator.locks.is_empty());
    }

    #[tokio::test]
    async fn test_small_roster_counts_only_eligible() {
        let store = Arc::new(MemoryStore::new());
        let creator = Uuid::new_v4();
        let event_id = event_with(&store, creator, 1).await;
        let only = store.list_participants(event_id).await.unwrap().remove(0);
        store
            .update_participant(
                only.id,
                &UpdateParticipantRequest {
                    status: Some(ParticipantStatus::Withdrawn),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let generator = MatchGenerator::new(store, PairingEngine::default());

        let result = generator.generate_matches(event_id, creator).await.unwrap();
        assert_eq!(result.matches_created, 0);
        assert_eq!(result.participants_unmatched, 0);
        assert!(result.message.starts_with("Insufficient participants"));
    }
}
