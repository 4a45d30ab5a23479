use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::NewCourseRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Review {
    pub id: String,
    pub course_id: String,
    pub content: String,
    pub rating_overall: i32,
    pub rating_difficulty: i32,
    pub rating_teaching: i32,
    pub rating_homework: i32,
    pub is_anonymous: bool,
    pub created_at: String,
}

/// The user-editable review fields. `Default` gives the documented form
/// defaults: empty content, every rating at 3, anonymous on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewDraft {
    pub content: String,
    pub rating_overall: i32,
    pub rating_difficulty: i32,
    pub rating_teaching: i32,
    pub rating_homework: i32,
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
}

fn default_anonymous() -> bool {
    true
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            content: String::new(),
            rating_overall: 3,
            rating_difficulty: 3,
            rating_teaching: 3,
            rating_homework: 3,
            is_anonymous: true,
        }
    }
}

impl ReviewDraft {
    /// Content must be non-empty and each rating within 1..=5. Checked
    /// before any write reaches the record store.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Review content is required".to_string(),
            ));
        }
        for (name, value) in [
            ("rating_overall", self.rating_overall),
            ("rating_difficulty", self.rating_difficulty),
            ("rating_teaching", self.rating_teaching),
            ("rating_homework", self.rating_homework),
        ] {
            if !(1..=5).contains(&value) {
                return Err(AppError::Validation(format!(
                    "{name} must be between 1 and 5"
                )));
            }
        }
        Ok(())
    }
}

/// Review submission body. Exactly one of `course_id` and `new_course`
/// selects the target course.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReviewRequest {
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub new_course: Option<NewCourseRequest>,
    #[serde(flatten)]
    pub draft: ReviewDraft,
}
