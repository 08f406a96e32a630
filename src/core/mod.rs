// Core algorithm exports
pub mod error;
pub mod fallback;
pub mod filters;
pub mod matcher;
pub mod matrix;
pub mod mutual;
pub mod normalize;
pub mod scoring;

pub use error::MatchError;
pub use fallback::FallbackPairer;
pub use filters::is_compatible;
pub use matcher::Matcher;
pub use matrix::{CompatibilityMatrix, UnmatchedPool};
pub use mutual::{MutualMatcher, MutualPair};
pub use normalize::{is_eligible, normalize_interests, normalize_profile, prepare_pool};
pub use scoring::{calculate_compatibility_score, calculate_question_score};
