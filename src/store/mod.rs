pub mod memory;
pub mod postgrest;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Course, NewCourseRequest, Review, ReviewDraft};

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record store responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("insert returned no representation")]
    MissingReturning,
}

/// The record store the application delegates all persistence to. One
/// handle is constructed at startup and injected everywhere; implementations
/// must be safe to share behind an `Arc`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Liveness probe for the health route.
    async fn health(&self) -> Result<(), StoreError>;

    /// Courses with the approval flag set, for the public listing.
    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError>;

    /// Case-insensitive substring match against course name OR course code,
    /// capped at `limit` rows. Callers are responsible for the minimum-length
    /// policy; the store runs whatever query it is handed.
    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError>;

    /// Single course by id; `Ok(None)` means absent, which is not an error.
    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError>;

    /// All reviews for one course, newest first.
    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError>;

    /// Insert a user-submitted course. The stored row always has
    /// `is_approved` set; pending courses are created by administrators in
    /// the backend, never through this call.
    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError>;

    /// Insert one review for an existing course. The relational constraint
    /// rejects unknown course ids.
    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError>;

    /// The add-new-course submission pair: create the course, then its first
    /// review. Backends with transactions roll the course back when the
    /// review insert fails; others keep the course row and say so in the log.
    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError>;
}
