pub mod course;
pub mod review;

pub use course::{Course, NewCourseRequest};
pub use review::{NewReviewRequest, Review, ReviewDraft};
