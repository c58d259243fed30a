//! Review errors.

use thiserror::Error;

use crate::store::StoreError;

/// Review book errors.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Strict mode refused a rating outside 1 to 5.
    #[error("rating {0} is outside 1 to 5")]
    InvalidRating(i64),

    /// The reviews could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}
