use std::collections::HashSet;
use uuid::Uuid;

use crate::core::{compatibility::is_compatible, scoring::compatibility_score};
use crate::models::{Match, Participant, ParticipantStatus, ScoringRules};

/// Pair chosen by the engine; `first` precedes `second` in pool order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedPair {
    pub first: Uuid,
    pub second: Uuid,
    pub score: u8,
}

/// Result of one pairing pass over an eligible pool
#[derive(Debug, Clone, Default)]
pub struct PairingOutcome {
    pub pairs: Vec<ProposedPair>,
    pub pool_size: usize,
}

impl PairingOutcome {
    pub fn participants_matched(&self) -> usize {
        self.pairs.len() * 2
    }

    pub fn participants_unmatched(&self) -> usize {
        self.pool_size - self.participants_matched()
    }
}

/// Participants that may enter a generation pass
///
/// Keeps roster order. Anyone already named in an existing match, whatever
/// its status, is left out, as is anyone not in `registered` status.
pub fn eligible_pool<'a>(participants: &'a [Participant], existing: &[Match]) -> Vec<&'a Participant> {
    let already_matched: HashSet<Uuid> = existing.iter().flat_map(Match::participants).collect();

    participants
        .iter()
        .filter(|p| p.status == ParticipantStatus::Registered)
        .filter(|p| !already_matched.contains(&p.id))
        .collect()
}

/// Greedy pairing engine
///
/// # Algorithm
/// Walk the pool in order. Each participant not yet taken scans every later
/// untaken participant, keeps the highest-scoring compatible one (the first
/// wins a tie) and both are taken. One pass, no backtracking.
#[derive(Debug, Clone)]
pub struct PairingEngine {
    rules: ScoringRules,
}

impl PairingEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score a pair with this engine's rules
    pub fn score(&self, p1: &Participant, p2: &Participant) -> u8 {
        compatibility_score(&p1.form_answers, &p2.form_answers, &self.rules)
    }

    /// Partition `pool` into compatible pairs
    pub fn pair(&self, pool: &[&Participant]) -> PairingOutcome {
        let mut taken = vec![false; pool.len()];
        let mut pairs = Vec::with_capacity(pool.len() / 2);

        for i in 0..pool.len() {
            if taken[i] {
                continue;
            }

            let mut best: Option<(usize, u8)> = None;
            for j in (i + 1)..pool.len() {
                if taken[j] || !is_compatible(pool[i], pool[j]) {
                    continue;
                }
                let score = self.score(pool[i], pool[j]);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((j, score));
                }
            }

            if let Some((j, score)) = best {
                taken[i] = true;
                taken[j] = true;
                pairs.push(ProposedPair {
                    first: pool[i].id,
                    second: pool[j].id,
                    score,
                });
            }
        }

        PairingOutcome {
            pairs,
            pool_size: pool.len(),
        }
    }
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormAnswers, MatchStatus};
    use chrono::Utc;
    use serde_json::{json, Value};

    fn create_participant(n: u128, gender: &str, interested_in: &str, extra: Value) -> Participant {
        let mut answers: FormAnswers = serde_json::from_value(extra).unwrap();
        answers.insert("gender", gender);
        answers.insert("interested_in", interested_in);
        Participant {
            id: Uuid::from_u128(n),
            event_id: Uuid::nil(),
            name: format!("Participant {}", n),
            email: format!("p{}@example.com", n),
            phone_number: None,
            age: Some(30),
            form_answers: answers,
            status: ParticipantStatus::Registered,
            created_at: Utc::now(),
        }
    }

    fn create_match(a: u128, b: u128) -> Match {
        Match {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            participant1_id: Uuid::from_u128(a),
            participant2_id: Uuid::from_u128(b),
            compatibility_score: 50,
            status: MatchStatus::Confirmed,
            venue_id: None,
            venue_assigned_at: None,
            matched_by: Uuid::nil(),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_prefers_highest_score() {
        let engine = PairingEngine::with_default_rules();
        let participants = vec![
            create_participant(1, "male", "female", json!({ "music": "rock" })),
            create_participant(2, "female", "male", json!({ "music": "jazz" })),
            create_participant(3, "female", "male", json!({ "music": "rock" })),
        ];
        let pool: Vec<&Participant> = participants.iter().collect();

        let outcome = engine.pair(&pool);

        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].second, Uuid::from_u128(3));
        assert_eq!(outcome.pairs[0].score, 100);
        assert_eq!(outcome.participants_unmatched(), 1);
    }

    #[test]
    fn test_tie_keeps_earliest_candidate() {
        let engine = PairingEngine::with_default_rules();
        let participants = vec![
            create_participant(1, "male", "female", json!({})),
            create_participant(2, "female", "male", json!({})),
            create_participant(3, "female", "male", json!({})),
        ];
        let pool: Vec<&Participant> = participants.iter().collect();

        let outcome = engine.pair(&pool);

        assert_eq!(outcome.pairs[0].first, Uuid::from_u128(1));
        assert_eq!(outcome.pairs[0].second, Uuid::from_u128(2));
    }

    #[test]
    fn test_greedy_is_not_globally_optimal() {
        // 1 takes 2 on score; 1-3 and 2-4 would have paired everyone
        let engine = PairingEngine::with_default_rules();
        let participants = vec![
            create_participant(1, "male", "female", json!({ "x": "a" })),
            create_participant(2, "female", "everyone", json!({ "x": "a" })),
            create_participant(3, "female", "male", json!({ "x": "b" })),
            create_participant(4, "female", "female", json!({})),
        ];
        let pool: Vec<&Participant> = participants.iter().collect();

        let outcome = engine.pair(&pool);

        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.participants_matched(), 2);
        assert_eq!(outcome.participants_unmatched(), 2);
    }

    #[test]
    fn test_no_participant_paired_twice() {
        let engine = PairingEngine::with_default_rules();
        let participants: Vec<Participant> = (0..9)
            .map(|i| create_participant(i, "non_binary", "everyone", json!({ "k": (i % 3) as u64 })))
            .collect();
        let pool: Vec<&Participant> = participants.iter().collect();

        let outcome = engine.pair(&pool);

        let mut seen = HashSet::new();
        for pair in &outcome.pairs {
            assert!(seen.insert(pair.first));
            assert!(seen.insert(pair.second));
        }
        assert_eq!(outcome.pairs.len(), 4);
    }

    #[test]
    fn test_eligible_pool_excludes_matched_and_non_registered() {
        let mut participants = vec![
            create_participant(1, "male", "female", json!({})),
            create_participant(2, "female", "male", json!({})),
            create_participant(3, "female", "male", json!({})),
            create_participant(4, "male", "female", json!({})),
        ];
        participants[3].status = ParticipantStatus::Withdrawn;
        let existing = vec![create_match(1, 9)];

        let pool = eligible_pool(&participants, &existing);

        let ids: Vec<Uuid> = pool.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(3)]);
    }
}
