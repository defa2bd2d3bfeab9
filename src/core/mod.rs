// Core algorithm exports
pub mod capacity;
pub mod compatibility;
pub mod matcher;
pub mod scoring;

pub use capacity::{plan_transition, CapacityError, SlotTransition};
pub use compatibility::{answers_compatible, is_compatible, normalize_gender, normalize_preference};
pub use matcher::{eligible_pool, PairingEngine, PairingOutcome, ProposedPair};
pub use scoring::compatibility_score;
