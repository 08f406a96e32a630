// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgePreference, Answer, Candidate, Intent, MatchResult, Pair, RawProfile, ScoringWeights,
    ANY_YEAR, DEFAULT_QUESTION_WEIGHTS, OPEN_TO_ALL, QUESTION_COUNT,
};
pub use requests::RunMatchingRequest;
pub use responses::{ErrorResponse, HealthResponse, RunMatchingResponse};
