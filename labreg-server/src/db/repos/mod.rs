//! Repository implementations over the [`Store`](crate::db::store::Store)
//! gateway.
//!
//! Each method is one parameterized statement. The store arrives as an
//! explicit constructor argument; there is no ambient lookup. Write methods
//! return the unclassified [`WriteError`](crate::db::store::WriteError)
//! directly so the caller classifies it exactly once.

use thiserror::Error;

use crate::db::store::QueryError;

pub mod history;
pub mod publications;
pub mod researchers;

pub use history::HistoryRepo;
pub use publications::PublicationRepo;
pub use researchers::ResearcherRepo;

/// Read-path error: the statement failed, or the requested entity is absent.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
