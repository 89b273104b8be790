use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AskfolioError, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A star rating left by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl Rating {
    pub fn new(rating: u8, session_id: impl Into<String>) -> Result<Self> {
        validate_rating(rating)?;
        Ok(Self {
            rating,
            timestamp: Utc::now(),
            session_id: session_id.into(),
        })
    }
}

pub fn validate_rating(rating: u8) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AskfolioError::InvalidInput(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Aggregate view over a set of ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub total: usize,
    pub average: f64,
    /// Count per star, index 0 is one star.
    pub distribution: [usize; 5],
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut distribution = [0usize; 5];
        let mut sum = 0u64;
        for r in ratings {
            if let Some(slot) = (r.rating as usize)
                .checked_sub(1)
                .and_then(|i| distribution.get_mut(i))
            {
                *slot += 1;
            }
            sum += u64::from(r.rating);
        }
        let total = ratings.len();
        let average = if total > 0 {
            sum as f64 / total as f64
        } else {
            0.0
        };
        Self {
            total,
            average,
            distribution,
        }
    }
}
