//! Review Book

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    clock::Clock,
    config::ValidationMode,
    pricing::round_tenths,
    reviews::{
        MAX_RATING, MIN_RATING, NewReview, RatingDistribution, Review, ReviewError, ReviewUuid,
        SampleReview,
    },
    store::{self, KeyValueStore},
};

/// Persisted product reviews, newest first.
pub struct ReviewBook {
    reviews: Vec<Review>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    mode: ValidationMode,
}

impl ReviewBook {
    /// Create an empty review book that persists under `key`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        mode: ValidationMode,
    ) -> Self {
        Self {
            reviews: Vec::new(),
            store,
            clock,
            key: key.into(),
            mode,
        }
    }

    /// Restore the reviews persisted under `key`, starting empty when missing or malformed.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        mode: ValidationMode,
    ) -> Self {
        let mut book = Self::new(store, clock, key, mode);

        book.reviews = store::load_or_default(book.store.as_ref(), &book.key);

        debug!(key = %book.key, reviews = book.reviews.len(), "loaded reviews");

        book
    }

    /// Restore the reviews persisted under `key`, or start from `samples` when nothing is stored
    /// there yet. Seeded reviews are persisted straight away, newest first.
    pub fn load_or_seed(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        mode: ValidationMode,
        samples: impl IntoIterator<Item = SampleReview>,
    ) -> Self {
        let key = key.into();

        if !matches!(store.read(&key), Ok(None)) {
            return Self::load(store, clock, key, mode);
        }

        let mut book = Self::new(store, clock, key, mode);
        let now = book.clock.now();

        book.reviews = samples
            .into_iter()
            .map(|sample| sample.into_review(now))
            .collect();

        if book.reviews.is_empty() {
            return book;
        }

        book.reviews.sort_by(|a, b| b.date.cmp(&a.date));

        if store::save(book.store.as_ref(), &book.key, &book.reviews).is_ok() {
            info!(key = %book.key, reviews = book.reviews.len(), "seeded sample reviews");
        }

        book
    }

    /// Publish a review as a verified purchase.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ReviewError::InvalidRating`] for ratings outside 1 to 5 and
    /// [`ReviewError::Store`] when the reviews cannot be persisted. Lenient books clamp the rating.
    #[tracing::instrument(
        name = "reviews.add_review",
        skip_all,
        fields(product_id = %review.product_id, rating = review.rating),
        err
    )]
    pub fn add_review(&mut self, review: NewReview) -> Result<Review, ReviewError> {
        let in_range = (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&review.rating);

        if !in_range && self.mode.is_strict() {
            return Err(ReviewError::InvalidRating(review.rating));
        }

        let rating = u8::try_from(
            review
                .rating
                .clamp(i64::from(MIN_RATING), i64::from(MAX_RATING)),
        )
        .unwrap_or(MAX_RATING);

        let NewReview {
            product_id,
            user_id,
            user_name,
            title,
            comment,
            ..
        } = review;

        let review = Review {
            id: ReviewUuid::now_v7(),
            product_id,
            user_id,
            user_name,
            rating,
            title,
            comment,
            date: self.clock.now(),
            helpful: 0,
            verified: true,
        };

        self.reviews.insert(0, review.clone());

        info!(review_id = %review.id, "added review");

        self.persist()?;

        Ok(review)
    }

    /// Reviews of `product_id`, newest first.
    pub fn reviews_for(&self, product_id: &str) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|review| review.product_id == product_id)
            .collect()
    }

    /// Mean rating of `product_id` to one decimal place, zero when unreviewed.
    pub fn average_rating(&self, product_id: &str) -> Decimal {
        let ratings: Vec<u8> = self
            .reviews_for(product_id)
            .iter()
            .map(|review| review.rating)
            .collect();

        if ratings.is_empty() {
            return Decimal::ZERO;
        }

        let sum: u32 = ratings.iter().copied().map(u32::from).sum();

        round_tenths(Decimal::from(sum) / Decimal::from(ratings.len()))
    }

    /// Star histogram of `product_id`.
    pub fn rating_distribution(&self, product_id: &str) -> RatingDistribution {
        let mut distribution = RatingDistribution::default();

        for review in self.reviews_for(product_id) {
            distribution.record(review.rating);
        }

        distribution
    }

    /// Add a "helpful" vote. Returns `false` for unknown reviews.
    ///
    /// Votes are not de-duplicated per user.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ReviewError::Store`] when the reviews cannot be persisted.
    pub fn mark_helpful(&mut self, review_id: ReviewUuid) -> Result<bool, ReviewError> {
        let Some(review) = self.reviews.iter_mut().find(|review| review.id == review_id) else {
            return Ok(false);
        };

        review.helpful = review.helpful.saturating_add(1);

        debug!(%review_id, helpful = review.helpful, "marked review helpful");

        self.persist()?;

        Ok(true)
    }

    /// Review by id.
    pub fn review(&self, review_id: ReviewUuid) -> Option<&Review> {
        self.reviews.iter().find(|review| review.id == review_id)
    }

    /// Every review, newest first.
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    fn persist(&self) -> Result<(), ReviewError> {
        match store::save(self.store.as_ref(), &self.key, &self.reviews) {
            Err(error) if self.mode.is_strict() => Err(error.into()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ReviewBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewBook")
            .field("reviews", &self.reviews.len())
            .field("key", &self.key)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
