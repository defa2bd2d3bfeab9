// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    canonical_pair, Event, EventStatus, FormAnswers, FormQuestion, Match, MatchChanges, MatchStatus,
    NewMatch, NewParticipant, Participant, ParticipantStatus, QuestionType, ScoringRules, Venue,
    VenueChange, VenueRemoval, STANDARD_KEYS,
};
pub use requests::{
    CreateEventRequest, CreateMatchRequest, CreateQuestionRequest, CreateVenueRequest, QuestionOrder,
    RegisterParticipantRequest, ReorderQuestionsRequest, UpdateEventRequest, UpdateMatchRequest,
    UpdateParticipantRequest, UpdateQuestionRequest, UpdateVenueRequest,
};
pub use responses::{
    ErrorResponse, EventSummary, GenerationResult, HealthResponse, MessageResponse, PublicEventResponse,
};
