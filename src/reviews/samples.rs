//! Sample reviews
//!
//! Reviews a fresh store starts with, loaded from YAML. Dates are given as an age in days so the
//! samples always read as recent.

use std::{fs, path::Path};

use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;
use thiserror::Error;

use crate::reviews::{MAX_RATING, MIN_RATING, Review, ReviewUuid};

/// Sample loading errors
#[derive(Debug, Error)]
pub enum SampleError {
    /// IO error reading a samples file
    #[error("failed to read sample reviews file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse sample reviews YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Review to seed an empty book with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReview {
    /// Reviewed product
    pub product_id: String,

    /// Author id
    pub user_id: String,

    /// Author display name
    pub user_name: String,

    /// Stars, clamped to 1 to 5 when seeded
    pub rating: u8,

    /// Headline
    pub title: String,

    /// Body
    pub comment: String,

    /// Days before the seeding instant the review was written
    #[serde(default)]
    pub age_days: u32,

    /// "Helpful" votes
    #[serde(default)]
    pub helpful: u32,

    /// Written by a verified buyer
    #[serde(default)]
    pub verified: bool,
}

impl SampleReview {
    /// Stored review dated `age_days` before `now`.
    pub fn into_review(self, now: Timestamp) -> Review {
        let age = SignedDuration::from_hours(i64::from(self.age_days) * 24);

        Review {
            id: ReviewUuid::now_v7(),
            product_id: self.product_id,
            user_id: self.user_id,
            user_name: self.user_name,
            rating: self.rating.clamp(MIN_RATING, MAX_RATING),
            title: self.title,
            comment: self.comment,
            date: now.checked_sub(age).unwrap_or(Timestamp::MIN),
            helpful: self.helpful,
            verified: self.verified,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SampleFixture {
    reviews: Vec<SampleReview>,
}

/// Parse YAML with a top-level `reviews` list.
///
/// # Errors
///
/// Returns a [`SampleError`] if the YAML is invalid.
pub fn from_yaml_str(yaml: &str) -> Result<Vec<SampleReview>, SampleError> {
    let fixture: SampleFixture = serde_norway::from_str(yaml)?;

    Ok(fixture.reviews)
}

/// Load a YAML samples file.
///
/// # Errors
///
/// Returns a [`SampleError`] if the file cannot be read or parsed.
pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Vec<SampleReview>, SampleError> {
    let contents = fs::read_to_string(path)?;

    from_yaml_str(&contents)
}
