//! Reviews

pub mod book;
pub mod errors;
pub mod models;
pub mod samples;

pub use book::ReviewBook;
pub use errors::ReviewError;
pub use models::{MAX_RATING, MIN_RATING, NewReview, RatingDistribution, Review, ReviewUuid};
pub use samples::{SampleError, SampleReview};
