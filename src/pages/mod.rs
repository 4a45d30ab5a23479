pub mod add_review;
pub mod detail;
pub mod listing;

pub use add_review::{AddReviewPage, NewCourseFields, submit_review};
pub use detail::{CourseDetail, DetailPage, DetailState, RatingSummary, fetch_detail};
pub use listing::{ListingPage, ListingState, fetch_listing};
