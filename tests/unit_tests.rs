// Unit tests for Matchday

use chrono::Utc;
use matchday::core::{
    answers_compatible, capacity, compatibility_score, eligible_pool, is_compatible, PairingEngine,
};
use matchday::models::{
    FormAnswers, Match, MatchStatus, Participant, ParticipantStatus, ScoringRules, Venue,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use uuid::Uuid;

fn answers(value: Value) -> FormAnswers {
    serde_json::from_value(value).unwrap()
}

fn participant(n: u128, value: Value) -> Participant {
    Participant {
        id: Uuid::from_u128(n),
        event_id: Uuid::nil(),
        name: format!("Participant {}", n),
        email: format!("p{}@example.com", n),
        phone_number: None,
        age: Some(30),
        form_answers: answers(value),
        status: ParticipantStatus::Registered,
        created_at: Utc::now(),
    }
}

#[test]
fn test_score_example_one_of_two_keys() {
    let a = answers(json!({ "music": "rock", "hobby": "chess" }));
    let b = answers(json!({ "music": "rock", "hobby": "reading" }));

    assert_eq!(compatibility_score(&a, &b, &ScoringRules::default()), 75);
}

#[test]
fn test_score_ignores_standard_keys() {
    let a = answers(json!({ "gender": "male", "bio": "hi", "name": "A" }));
    let b = answers(json!({ "gender": "male", "bio": "hi", "name": "A" }));

    assert_eq!(compatibility_score(&a, &b, &ScoringRules::default()), 50);
}

#[test]
fn test_score_falsy_answers_never_match() {
    let a = answers(json!({ "smoker": false, "pets": [], "note": "" }));
    let b = answers(json!({ "smoker": false, "pets": [], "note": "" }));

    assert_eq!(compatibility_score(&a, &b, &ScoringRules::default()), 50);
}

#[test]
fn test_score_list_overlap() {
    let a = answers(json!({ "sports": ["tennis", "golf"] }));
    let b = answers(json!({ "sports": ["golf"] }));
    let c = answers(json!({ "sports": ["rowing"] }));

    assert_eq!(compatibility_score(&a, &b, &ScoringRules::default()), 100);
    assert_eq!(compatibility_score(&a, &c, &ScoringRules::default()), 50);
}

#[test]
fn test_score_bounds_and_symmetry() {
    let samples = [
        json!({}),
        json!({ "a": 1 }),
        json!({ "a": 1, "b": "x" }),
        json!({ "a": 2, "b": "x", "c": [1, 2] }),
        json!({ "c": [2, 3], "d": null }),
    ];
    let rules = ScoringRules::default();

    for x in &samples {
        for y in &samples {
            let (x, y) = (answers(x.clone()), answers(y.clone()));
            let score = compatibility_score(&x, &y, &rules);
            assert!((50..=100).contains(&score));
            assert_eq!(score, compatibility_score(&y, &x, &rules));
        }
    }
}

#[test]
fn test_custom_rules_clamp() {
    let rules = ScoringRules {
        base_score: 80,
        overlap_weight: 50,
    };
    let a = answers(json!({ "k": "v" }));

    assert_eq!(compatibility_score(&a, &a, &rules), 100);
}

#[test]
fn test_compatibility_symmetry() {
    let identities = [
        json!({}),
        json!({ "gender": "male", "interested_in": "female" }),
        json!({ "gender": "female", "interested_in": "male" }),
        json!({ "gender": "female", "interested_in": "female" }),
        json!({ "gender": "non_binary", "interested_in": "everyone" }),
        json!({ "gender": "Woman", "interested_in": "Men" }),
        json!({ "gender": "male" }),
    ];

    for x in &identities {
        for y in &identities {
            let (x, y) = (answers(x.clone()), answers(y.clone()));
            assert_eq!(answers_compatible(&x, &y), answers_compatible(&y, &x));
        }
    }
}

#[test]
fn test_compatibility_permissive_without_data() {
    let known = participant(1, json!({ "gender": "male", "interested_in": "male" }));
    let unknown = participant(2, json!({ "gender": "female" }));

    assert!(is_compatible(&known, &unknown));
}

#[test]
fn test_compatibility_synonyms() {
    let a = participant(1, json!({ "gender": "Man", "interested_in": "Women" }));
    let b = participant(2, json!({ "gender": "woman", "interested_in": "men" }));
    let c = participant(3, json!({ "gender": "woman", "interested_in": "women" }));

    assert!(is_compatible(&a, &b));
    assert!(!is_compatible(&a, &c));
}

#[test]
fn test_pairing_four_compatible() {
    let engine = PairingEngine::with_default_rules();
    let participants: Vec<Participant> = (1..=4)
        .map(|n| participant(n, json!({ "gender": "non_binary", "interested_in": "everyone" })))
        .collect();

    let pool = eligible_pool(&participants, &[]);
    let outcome = engine.pair(&pool);

    assert_eq!(outcome.pairs.len(), 2);
    assert_eq!(outcome.participants_matched(), 4);
    assert_eq!(outcome.participants_unmatched(), 0);
}

#[test]
fn test_pairing_exclusivity_large_pool() {
    let engine = PairingEngine::with_default_rules();
    let genders = ["male", "female"];
    let prefs = ["female", "male", "everyone"];
    let colors = ["red", "blue"];
    let participants: Vec<Participant> = (0..40u128)
        .map(|n| {
            participant(
                n + 1,
                json!({
                    "gender": genders[(n % 2) as usize],
                    "interested_in": prefs[(n % 3) as usize],
                    "color": colors[(n % 2) as usize],
                }),
            )
        })
        .collect();

    let pool = eligible_pool(&participants, &[]);
    let outcome = engine.pair(&pool);

    let mut seen = HashSet::new();
    for pair in &outcome.pairs {
        assert!(seen.insert(pair.first));
        assert!(seen.insert(pair.second));
        let p1 = participants.iter().find(|p| p.id == pair.first).unwrap();
        let p2 = participants.iter().find(|p| p.id == pair.second).unwrap();
        assert!(is_compatible(p1, p2));
    }
    assert_eq!(outcome.participants_matched() + outcome.participants_unmatched(), 40);
}

#[test]
fn test_pool_excludes_any_existing_match() {
    let participants: Vec<Participant> = (1..=3).map(|n| participant(n, json!({}))).collect();
    let existing = Match {
        id: Uuid::new_v4(),
        event_id: Uuid::nil(),
        participant1_id: Uuid::from_u128(2),
        participant2_id: Uuid::from_u128(99),
        compatibility_score: 50,
        status: MatchStatus::Pending,
        venue_id: None,
        venue_assigned_at: None,
        matched_by: Uuid::nil(),
        notes: None,
        created_at: Utc::now(),
        updated_at: None,
    };

    let pool = eligible_pool(&participants, std::slice::from_ref(&existing));

    assert_eq!(pool.len(), 2);
    assert!(pool.iter().all(|p| p.id != Uuid::from_u128(2)));
}

#[test]
fn test_slot_conservation_sequence() {
    let mut venue = Venue {
        id: Uuid::new_v4(),
        event_id: Uuid::nil(),
        name: "Wine bar".to_string(),
        address: None,
        total_capacity: 3,
        available_slots: 3,
        min_age: 21,
        is_active: true,
        created_at: Utc::now(),
    };
    let mut seated = 0;

    for step in 0..10 {
        if step % 3 == 2 && seated > 0 {
            capacity::release(&mut venue);
            seated -= 1;
        } else if capacity::reserve(&mut venue).is_ok() {
            seated += 1;
        }
        assert_eq!(venue.available_slots, venue.total_capacity - seated);
    }
}
