// Service exports
pub mod postgres;
pub mod sessions;

pub use postgres::{PostgresClient, PostgresError};
pub use sessions::{build_sessions, session_user_ids, NewSession};
