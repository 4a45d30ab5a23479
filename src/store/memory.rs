use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Course, NewCourseRequest, Review, ReviewDraft};

use super::{RecordStore, StoreError};

#[derive(Default)]
struct Inner {
    courses: Vec<Course>,
    reviews: Vec<Review>,
}

/// In-memory record store for tests and embedded use. Matching and ordering
/// follow the SQL store: case-insensitive substring search, newest reviews
/// first, and an emulated relational constraint on review inserts.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a course in as-is, approval flag and id included. This stands in
    /// for rows administrators create directly in the backend.
    pub fn seed_course(&self, course: Course) {
        self.inner.lock().unwrap().courses.push(course);
    }

    /// Drop a review in as-is, timestamp included.
    pub fn seed_review(&self, review: Review) {
        self.inner.lock().unwrap().reviews.push(review);
    }
}

fn matches(course: &Course, needle: &str) -> bool {
    course.course_name.to_lowercase().contains(needle)
        || course.course_code.to_lowercase().contains(needle)
}

fn review_from_draft(course_id: &str, draft: &ReviewDraft) -> Review {
    Review {
        id: Uuid::new_v4().to_string(),
        course_id: course_id.to_string(),
        content: draft.content.clone(),
        rating_overall: draft.rating_overall,
        rating_difficulty: draft.rating_difficulty,
        rating_teaching: draft.rating_teaching,
        rating_homework: draft.rating_homework,
        is_anonymous: draft.is_anonymous,
        created_at: Utc::now().to_rfc3339(),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .courses
            .iter()
            .filter(|c| c.is_approved)
            .cloned()
            .collect())
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        let needle = query.to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .courses
            .iter()
            .filter(|c| matches(c, &needle))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut reviews: Vec<(usize, Review)> = inner
            .reviews
            .iter()
            .enumerate()
            .filter(|(_, r)| r.course_id == course_id)
            .map(|(i, r)| (i, r.clone()))
            .collect();
        // Newest first; insertion order breaks timestamp ties.
        reviews.sort_by(|(ia, a), (ib, b)| {
            b.created_at.cmp(&a.created_at).then(ib.cmp(ia))
        });
        Ok(reviews.into_iter().map(|(_, r)| r).collect())
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        let course = Course {
            id: Uuid::new_v4().to_string(),
            university_name: new.university_name.clone(),
            course_code: new.course_code.clone(),
            course_name: new.course_name.clone(),
            faculty: new.faculty.clone(),
            credits: new.credits,
            is_approved: true,
        };
        self.inner.lock().unwrap().courses.push(course.clone());
        Ok(course)
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.courses.iter().any(|c| c.id == course_id) {
            return Err(StoreError::Api {
                status: 409,
                message: format!("review references unknown course {}", course_id),
            });
        }
        let review = review_from_draft(course_id, draft);
        inner.reviews.push(review.clone());
        Ok(review)
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        let course = self.insert_course(new).await?;
        let review = self.insert_review(&course.id, draft).await?;
        Ok((course, review))
    }
}
