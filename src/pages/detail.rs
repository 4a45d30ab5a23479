use std::sync::Arc;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{Course, Review, ReviewDraft};
use crate::store::RecordStore;

pub const NO_REVIEWS_MESSAGE: &str = "No reviews for this course yet. Be the first to write one!";

/// Per-dimension mean ratings over every review of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub review_count: usize,
    pub rating_overall: f64,
    pub rating_difficulty: f64,
    pub rating_teaching: f64,
    pub rating_homework: f64,
}

impl RatingSummary {
    /// `None` when there is nothing to average.
    pub fn from_reviews(reviews: &[Review]) -> Option<Self> {
        if reviews.is_empty() {
            return None;
        }
        let count = reviews.len();
        let mean = |pick: fn(&Review) -> i32| {
            reviews.iter().map(|r| pick(r) as f64).sum::<f64>() / count as f64
        };
        Some(Self {
            review_count: count,
            rating_overall: mean(|r| r.rating_overall),
            rating_difficulty: mean(|r| r.rating_difficulty),
            rating_teaching: mean(|r| r.rating_teaching),
            rating_homework: mean(|r| r.rating_homework),
        })
    }
}

/// Everything the detail view renders in its normal state.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub course: Course,
    pub summary: Option<RatingSummary>,
    pub reviews: Vec<Review>,
}

/// Fetch a course together with its reviews, newest first.
///
/// The two reads are independent and issued concurrently. An absent course
/// wins over a failed review read: "not found" is a display state of its
/// own, not an error.
pub async fn fetch_detail(
    store: &dyn RecordStore,
    id: &str,
) -> Result<Option<CourseDetail>, AppError> {
    let (course, reviews) = tokio::join!(store.fetch_course(id), store.reviews_for_course(id));

    let course = match course {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let reviews = reviews?;

    Ok(Some(CourseDetail {
        summary: RatingSummary::from_reviews(&reviews),
        course,
        reviews,
    }))
}

#[derive(Debug)]
pub enum DetailState {
    Loaded(CourseDetail),
    NotFound,
    Failed { message: String },
}

/// The course detail page: course header, rating summary, review list and
/// an inline review form that refreshes the list after a submission.
pub struct DetailPage {
    store: Arc<dyn RecordStore>,
    course_id: String,
    pub state: DetailState,
    pub draft: ReviewDraft,
    submitting: bool,
    pub submit_success: bool,
    pub submit_error: Option<String>,
}

impl DetailPage {
    pub async fn load(store: Arc<dyn RecordStore>, course_id: impl Into<String>) -> Self {
        let course_id = course_id.into();
        let state = match fetch_detail(store.as_ref(), &course_id).await {
            Ok(Some(detail)) => DetailState::Loaded(detail),
            Ok(None) => DetailState::NotFound,
            Err(err) => DetailState::Failed {
                message: err.user_message(),
            },
        };
        Self {
            store,
            course_id,
            state,
            draft: ReviewDraft::default(),
            submitting: false,
            submit_success: false,
            submit_error: None,
        }
    }

    /// Shown under the course header when it has no reviews yet.
    pub fn empty_state_message(&self) -> Option<&'static str> {
        match &self.state {
            DetailState::Loaded(detail) if detail.reviews.is_empty() => Some(NO_REVIEWS_MESSAGE),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit the draft for the displayed course, then refresh the review
    /// list so the new review shows up on top. A failure leaves the draft
    /// untouched for another attempt.
    pub async fn submit_review(&mut self) {
        if self.submitting {
            return;
        }
        self.submitting = true;
        self.submit_error = None;
        self.submit_success = false;

        let outcome = self.insert_and_refresh().await;
        self.submitting = false;

        match outcome {
            Ok(reviews) => {
                self.submit_success = true;
                self.draft = ReviewDraft::default();
                if let DetailState::Loaded(detail) = &mut self.state {
                    detail.summary = RatingSummary::from_reviews(&reviews);
                    detail.reviews = reviews;
                }
            }
            Err(err) => self.submit_error = Some(err.user_message()),
        }
    }

    async fn insert_and_refresh(&self) -> Result<Vec<Review>, AppError> {
        if !matches!(self.state, DetailState::Loaded(_)) {
            return Err(AppError::NotFound);
        }
        self.draft.validate()?;
        self.store.insert_review(&self.course_id, &self.draft).await?;
        Ok(self.store.reviews_for_course(&self.course_id).await?)
    }
}
