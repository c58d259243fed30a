//! Review Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Lowest star rating.
pub const MIN_RATING: u8 = 1;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Record id
    pub id: ReviewUuid,

    /// Reviewed product
    pub product_id: String,

    /// Author id
    pub user_id: String,

    /// Author display name
    pub user_name: String,

    /// Stars, 1 to 5
    pub rating: u8,

    /// Headline
    pub title: String,

    /// Body
    pub comment: String,

    /// When the review was written
    pub date: Timestamp,

    /// "Helpful" votes
    #[serde(default)]
    pub helpful: u32,

    /// Written by a verified buyer
    #[serde(default)]
    pub verified: bool,
}

/// Review as submitted by a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReview {
    /// Reviewed product
    pub product_id: String,

    /// Author id
    pub user_id: String,

    /// Author display name
    pub user_name: String,

    /// Requested stars, validated against 1 to 5
    pub rating: i64,

    /// Headline
    pub title: String,

    /// Body
    pub comment: String,
}

/// Number of reviews per star rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingDistribution([u32; 5]);

impl RatingDistribution {
    /// Count one more review with `stars`; ratings outside 1 to 5 are ignored.
    pub fn record(&mut self, stars: u8) {
        if let Some(count) = stars
            .checked_sub(MIN_RATING)
            .and_then(|slot| self.0.get_mut(usize::from(slot)))
        {
            *count += 1;
        }
    }

    /// Reviews with exactly `stars`.
    pub fn count(&self, stars: u8) -> u32 {
        stars
            .checked_sub(MIN_RATING)
            .and_then(|slot| self.0.get(usize::from(slot)))
            .copied()
            .unwrap_or_default()
    }

    /// Reviews counted.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// `(stars, count)` pairs from five stars down to one.
    pub fn by_stars(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (MIN_RATING..=MAX_RATING)
            .rev()
            .map(|stars| (stars, self.count(stars)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_counts_each_star() {
        let mut distribution = RatingDistribution::default();

        for stars in [5, 4, 5, 1, 0, 6] {
            distribution.record(stars);
        }

        assert_eq!(distribution.count(5), 2);
        assert_eq!(distribution.count(4), 1);
        assert_eq!(distribution.count(3), 0);
        assert_eq!(distribution.count(1), 1);
        assert_eq!(distribution.count(0), 0);
        assert_eq!(distribution.total(), 4);
        assert_eq!(
            distribution.by_stars().collect::<Vec<_>>(),
            vec![(5, 2), (4, 1), (3, 0), (2, 0), (1, 1)]
        );
    }
}
