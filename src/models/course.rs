use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Course {
    pub id: String,
    pub university_name: String,
    pub course_code: String,
    pub course_name: String,
    pub faculty: Option<String>,
    pub credits: Option<i32>,
    pub is_approved: bool,
}

/// Payload for the add-course-inline flow. Courses created this way are
/// stored pre-approved; pending courses only enter the system through the
/// backend directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub university_name: String,
    pub course_code: String,
    pub course_name: String,
    pub faculty: Option<String>,
    pub credits: Option<i32>,
}

impl NewCourseRequest {
    /// University, code, and name are mandatory; faculty and credits are not.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.university_name.trim().is_empty()
            || self.course_code.trim().is_empty()
            || self.course_name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "University, course code, and course name are required".to_string(),
            ));
        }
        Ok(())
    }
}
