use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{DomainError, ValidationErrors};

/// Distinct reporters needed before a review is hidden.
pub const HIDE_THRESHOLD: i64 = 5;

#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub ingredient_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub ingredient_id: Uuid,
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

pub fn validate_rating(rating: i16) -> Result<(), DomainError> {
    let mut errors = ValidationErrors::new("Invalid review");
    if !(1..=5).contains(&rating) {
        errors.add("rating", "Rating must be between 1 and 5.");
    }
    errors.into_result()
}

/// Whether a review with `report_count` distinct reporters should flip to hidden now.
pub fn should_hide(report_count: i64, already_hidden: bool) -> bool {
    !already_hidden && report_count >= HIDE_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub report_count: i64,
    /// True only on the report that caused the review to become hidden.
    pub hidden_now: bool,
}

#[derive(Debug, Clone)]
pub struct ReviewStats {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub total_reviews: i64,
    pub average_rating: BigDecimal,
    /// `(rating, count)` pairs, ascending by rating, only for ratings present.
    pub rating_distribution: Vec<(i16, i64)>,
}

/// Mean of `ratings` rounded to `scale` digits, zero when there are none.
pub fn average_rating(ratings: &[i16], scale: i64) -> BigDecimal {
    if ratings.is_empty() {
        return BigDecimal::from(0);
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (BigDecimal::from(sum) / BigDecimal::from(ratings.len() as i64)).round(scale)
}

pub fn rating_distribution(ratings: &[i16]) -> Vec<(i16, i64)> {
    (1..=5)
        .filter_map(|r| {
            let count = ratings.iter().filter(|x| **x == r).count() as i64;
            (count > 0).then_some((r, count))
        })
        .collect()
}
