//! Matchday - matching event service
//!
//! Organizers create events, collect registrations through a configurable
//! form, and pair participants with a greedy compatibility engine. Pairs can
//! be seated at venues with a limited number of slots.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{compatibility_score, is_compatible, PairingEngine};
pub use models::{FormAnswers, GenerationResult, Match, Participant, ScoringRules, Venue};
pub use services::{MatchGenerator, MatchStore, MemoryStore, PostgresClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let empty = FormAnswers::new();
        assert_eq!(compatibility_score(&empty, &empty, &ScoringRules::default()), 50);
    }
}
