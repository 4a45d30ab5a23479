use crate::error::AppError;
use crate::models::Course;
use crate::store::RecordStore;

pub const EMPTY_LISTING_MESSAGE: &str =
    "No courses yet. Approved courses appear here once they are added.";

/// Approved courses for the home page. Unapproved rows never show up here.
pub async fn fetch_listing(store: &dyn RecordStore) -> Result<Vec<Course>, AppError> {
    Ok(store.list_approved_courses().await?)
}

#[derive(Debug)]
pub enum ListingState {
    Loaded { courses: Vec<Course> },
    Failed { message: String },
}

/// The course listing page: one fetch on load, then either the course grid,
/// an empty-state hint, or an error card.
#[derive(Debug)]
pub struct ListingPage {
    pub state: ListingState,
}

impl ListingPage {
    pub async fn load(store: &dyn RecordStore) -> Self {
        let state = match fetch_listing(store).await {
            Ok(courses) => ListingState::Loaded { courses },
            Err(err) => ListingState::Failed {
                message: err.user_message(),
            },
        };
        Self { state }
    }

    /// Shown in place of the grid when nothing has been approved yet.
    pub fn empty_state_message(&self) -> Option<&'static str> {
        match &self.state {
            ListingState::Loaded { courses } if courses.is_empty() => Some(EMPTY_LISTING_MESSAGE),
            _ => None,
        }
    }
}
