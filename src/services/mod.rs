// Service exports
pub mod generator;
pub mod memory;
pub mod postgres;
pub mod store;

pub use generator::{GenerationError, MatchGenerator};
pub use memory::MemoryStore;
pub use postgres::PostgresClient;
pub use store::{MatchStore, StoreError, StoreResult};
