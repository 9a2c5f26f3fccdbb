use serde::{Deserialize, Serialize};

use shopfront_core::ValueObject;

use crate::rating::Rating;

/// One user review of an item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    rating: Rating,
    comment: String,
}

impl Review {
    pub fn new(rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl ValueObject for Review {}
