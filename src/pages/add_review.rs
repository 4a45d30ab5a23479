use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, NewReviewRequest, Review, ReviewDraft};
use crate::search::Typeahead;
use crate::store::RecordStore;

/// Resolve the target course and insert the review. This is the shared core
/// of the submission route and the add-review form.
///
/// Exactly one target must be given: the id of an existing course, or the
/// fields of a new one. A new course is created already approved, so it is
/// browseable right away. The draft is validated before anything is written.
pub async fn submit_review(
    store: &dyn RecordStore,
    request: &NewReviewRequest,
) -> Result<Review, AppError> {
    request.draft.validate()?;

    match (&request.course_id, &request.new_course) {
        (Some(course_id), None) => Ok(store.insert_review(course_id, &request.draft).await?),
        (None, Some(new_course)) => {
            new_course.validate()?;
            let (_, review) = store
                .insert_course_with_review(new_course, &request.draft)
                .await?;
            Ok(review)
        }
        (None, None) => Err(AppError::Validation(
            "Select a course or add a new one".to_string(),
        )),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Pick either an existing course or a new one, not both".to_string(),
        )),
    }
}

/// Raw text of the new-course form. `credits` stays a string until
/// submission, like the number input it mirrors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCourseFields {
    pub university_name: String,
    pub course_code: String,
    pub course_name: String,
    pub faculty: String,
    pub credits: String,
}

impl NewCourseFields {
    fn to_request(&self) -> Result<NewCourseRequest, AppError> {
        let credits = match self.credits.trim() {
            "" => None,
            raw => Some(raw.parse::<i32>().map_err(|_| {
                AppError::Validation("Credits must be a whole number".to_string())
            })?),
        };

        let request = NewCourseRequest {
            university_name: self.university_name.trim().to_string(),
            course_code: self.course_code.trim().to_string(),
            course_name: self.course_name.trim().to_string(),
            faculty: match self.faculty.trim() {
                "" => None,
                faculty => Some(faculty.to_string()),
            },
            credits,
        };
        request.validate()?;
        Ok(request)
    }
}

/// The add-review page: search for a course or describe a new one, write
/// the review, submit. Picking a search result and opening the new-course
/// form are mutually exclusive, and a picked course always wins.
pub struct AddReviewPage {
    store: Arc<dyn RecordStore>,
    pub search: Typeahead,
    selected: Option<Course>,
    new_course_open: bool,
    pub new_course: NewCourseFields,
    pub draft: ReviewDraft,
    submitting: bool,
    pub submit_success: bool,
    pub submit_error: Option<String>,
}

impl AddReviewPage {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            search: Typeahead::new(store.clone()),
            store,
            selected: None,
            new_course_open: false,
            new_course: NewCourseFields::default(),
            draft: ReviewDraft::default(),
            submitting: false,
            submit_success: false,
            submit_error: None,
        }
    }

    /// Picking a result closes the new-course form and clears the search box.
    pub fn select_course(&mut self, course: Course) {
        self.selected = Some(course);
        self.new_course_open = false;
        self.search.reset();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn open_new_course_form(&mut self) {
        self.new_course_open = true;
    }

    pub fn cancel_new_course_form(&mut self) {
        self.new_course_open = false;
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.selected.as_ref()
    }

    pub fn new_course_form_open(&self) -> bool {
        self.new_course_open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True when a long-enough search finished with no hits and neither
    /// target is active yet: the moment the page offers "add it yourself?".
    pub fn can_offer_new_course(&self) -> bool {
        let state = self.search.state();
        self.selected.is_none()
            && !self.new_course_open
            && self.search.policy().meets_min_length(&state.query)
            && state.hits.is_empty()
    }

    /// Submit the review for the picked course, or create the described
    /// course and attach the review to it. Success wipes the whole page
    /// back to its initial state; failure keeps every field as typed.
    pub async fn submit(&mut self) {
        if self.submitting {
            return;
        }
        self.submitting = true;
        self.submit_error = None;
        self.submit_success = false;

        let outcome = self.build_and_submit().await;
        self.submitting = false;

        match outcome {
            Ok(_) => {
                self.submit_success = true;
                self.reset_form();
            }
            Err(err) => self.submit_error = Some(err.user_message()),
        }
    }

    async fn build_and_submit(&self) -> Result<Review, AppError> {
        let new_course = if self.selected.is_none() && self.new_course_open {
            Some(self.new_course.to_request()?)
        } else {
            None
        };
        let request = NewReviewRequest {
            course_id: self.selected.as_ref().map(|course| course.id.clone()),
            new_course,
            draft: self.draft.clone(),
        };
        submit_review(self.store.as_ref(), &request).await
    }

    fn reset_form(&mut self) {
        self.selected = None;
        self.new_course_open = false;
        self.new_course = NewCourseFields::default();
        self.draft = ReviewDraft::default();
        self.search.reset();
    }
}
