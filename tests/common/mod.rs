#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use unirev::models::{Course, NewCourseRequest, Review, ReviewDraft};
use unirev::store::{MemoryStore, RecordStore, StoreError};

pub fn approved_course(id: &str, code: &str, name: &str) -> Course {
    Course {
        id: id.to_string(),
        university_name: "Test University".to_string(),
        course_code: code.to_string(),
        course_name: name.to_string(),
        faculty: None,
        credits: Some(3),
        is_approved: true,
    }
}

pub fn review_for(course_id: &str, content: &str, created_at: &str) -> Review {
    Review {
        id: format!("review-{content}"),
        course_id: course_id.to_string(),
        content: content.to_string(),
        rating_overall: 4,
        rating_difficulty: 2,
        rating_teaching: 5,
        rating_homework: 3,
        is_anonymous: true,
        created_at: created_at.to_string(),
    }
}

pub fn valid_draft(content: &str) -> ReviewDraft {
    ReviewDraft {
        content: content.to_string(),
        ..ReviewDraft::default()
    }
}

fn offline() -> StoreError {
    StoreError::Api {
        status: 503,
        message: "record store offline".to_string(),
    }
}

/// Wraps the in-memory store and counts how often each operation runs.
pub struct CountingStore {
    pub inner: MemoryStore,
    searches: AtomicUsize,
    course_inserts: AtomicUsize,
    review_inserts: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            searches: AtomicUsize::new(0),
            course_inserts: AtomicUsize::new(0),
            review_inserts: AtomicUsize::new(0),
        }
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn course_inserts(&self) -> usize {
        self.course_inserts.load(Ordering::SeqCst)
    }

    pub fn review_inserts(&self) -> usize {
        self.review_inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.inner.health().await
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_approved_courses().await
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search_courses(query, limit).await
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        self.inner.fetch_course(id).await
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        self.inner.reviews_for_course(course_id).await
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        self.course_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_course(new).await
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        self.review_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_review(course_id, draft).await
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        self.course_inserts.fetch_add(1, Ordering::SeqCst);
        self.review_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_course_with_review(new, draft).await
    }
}

/// Every operation fails, as if the backing service were unreachable.
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    async fn health(&self) -> Result<(), StoreError> {
        Err(offline())
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        Err(offline())
    }

    async fn search_courses(&self, _query: &str, _limit: u32) -> Result<Vec<Course>, StoreError> {
        Err(offline())
    }

    async fn fetch_course(&self, _id: &str) -> Result<Option<Course>, StoreError> {
        Err(offline())
    }

    async fn reviews_for_course(&self, _course_id: &str) -> Result<Vec<Review>, StoreError> {
        Err(offline())
    }

    async fn insert_course(&self, _new: &NewCourseRequest) -> Result<Course, StoreError> {
        Err(offline())
    }

    async fn insert_review(
        &self,
        _course_id: &str,
        _draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        Err(offline())
    }

    async fn insert_course_with_review(
        &self,
        _new: &NewCourseRequest,
        _draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        Err(offline())
    }
}

/// Everything works except the review list, which always fails.
pub struct ReviewsFailStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl RecordStore for ReviewsFailStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.inner.health().await
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_approved_courses().await
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        self.inner.search_courses(query, limit).await
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        self.inner.fetch_course(id).await
    }

    async fn reviews_for_course(&self, _course_id: &str) -> Result<Vec<Review>, StoreError> {
        Err(offline())
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        self.inner.insert_course(new).await
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        self.inner.insert_review(course_id, draft).await
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        self.inner.insert_course_with_review(new, draft).await
    }
}

/// Reads delegate to the in-memory store; every write fails.
pub struct InsertFailStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl RecordStore for InsertFailStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.inner.health().await
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_approved_courses().await
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        self.inner.search_courses(query, limit).await
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        self.inner.fetch_course(id).await
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        self.inner.reviews_for_course(course_id).await
    }

    async fn insert_course(&self, _new: &NewCourseRequest) -> Result<Course, StoreError> {
        Err(offline())
    }

    async fn insert_review(
        &self,
        _course_id: &str,
        _draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        Err(offline())
    }

    async fn insert_course_with_review(
        &self,
        _new: &NewCourseRequest,
        _draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        Err(offline())
    }
}

/// Holds every search on a semaphore so a test controls when the store's
/// answer comes back.
pub struct GatedStore {
    pub inner: MemoryStore,
    gate: Arc<Semaphore>,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Self {
                inner,
                gate: gate.clone(),
            },
            gate,
        )
    }
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.inner.health().await
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.inner.list_approved_courses().await
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        let permit = self.gate.acquire().await.map_err(|_| offline())?;
        permit.forget();
        self.inner.search_courses(query, limit).await
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        self.inner.fetch_course(id).await
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        self.inner.reviews_for_course(course_id).await
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        self.inner.insert_course(new).await
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        self.inner.insert_review(course_id, draft).await
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        self.inner.insert_course_with_review(new, draft).await
    }
}
