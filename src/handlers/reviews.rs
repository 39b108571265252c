use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::session::Identity;
use super::{current_user, SuccessResponse};
use crate::domain::review::{
    NewReview, ReportOutcome, Review, ReviewChanges, ReviewStats, HIDE_THRESHOLD,
};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub ingredient_id: Uuid,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsParams {
    pub ingredient_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub ingredient_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub is_hidden: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            username: r.username,
            ingredient_id: r.ingredient_id,
            rating: r.rating,
            comment: r.comment,
            is_hidden: r.is_hidden,
            created: r.created_at,
            updated: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingCount {
    pub rating: i16,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewStatsResponse {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub total_reviews: i64,
    /// Mean rating to one decimal, "0.0" when there are no reviews.
    pub average_rating: String,
    pub rating_distribution: Vec<RatingCount>,
}

impl From<ReviewStats> for ReviewStatsResponse {
    fn from(s: ReviewStats) -> Self {
        Self {
            ingredient_id: s.ingredient_id,
            ingredient_name: s.ingredient_name,
            total_reviews: s.total_reviews,
            average_rating: s.average_rating.with_scale(1).to_string(),
            rating_distribution: s
                .rating_distribution
                .into_iter()
                .map(|(rating, count)| RatingCount { rating, count })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub report_count: i64,
    /// True only on the report that hid the review.
    pub hidden_now: bool,
    pub is_hidden: bool,
}

impl From<ReportOutcome> for ReportResponse {
    fn from(o: ReportOutcome) -> Self {
        Self {
            report_count: o.report_count,
            hidden_now: o.hidden_now,
            is_hidden: o.report_count >= HIDE_THRESHOLD,
        }
    }
}

fn review_list(reviews: Vec<Review>) -> Vec<ReviewResponse> {
    reviews.into_iter().map(Into::into).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/reviews
///
/// One review per user and ingredient. The ingredient's rating aggregate is
/// recomputed once the review is stored.
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    params(("X-User-ID" = Uuid, Header, description = "Caller's user id")),
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Rating outside 1..=5"),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 404, description = "Unknown ingredient"),
        (status = 409, description = "Ingredient already reviewed by this user"),
    ),
    tag = "reviews"
)]
pub async fn create_review(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let body = body.into_inner();
    let review = NewReview {
        ingredient_id: body.ingredient_id,
        rating: body.rating,
        comment: body.comment,
    };

    let reviews = state.reviews.clone();
    let created = web::block(move || reviews.create(user.id, review))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ReviewResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/reviews/my",
    params(("X-User-ID" = Uuid, Header, description = "Caller's user id")),
    responses(
        (status = 200, description = "The caller's reviews, hidden ones included", body = [ReviewResponse]),
        (status = 401, description = "Missing or unknown X-User-ID"),
    ),
    tag = "reviews"
)]
pub async fn my_reviews(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;

    let reviews = state.reviews.clone();
    let result = web::block(move || reviews.mine(user.id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(review_list(result)))
}

#[utoipa::path(
    get,
    path = "/api/reviews/stats",
    params(StatsParams),
    responses(
        (status = 200, description = "Rating statistics", body = ReviewStatsResponse),
        (status = 404, description = "Unknown ingredient"),
    ),
    tag = "reviews"
)]
pub async fn review_stats(
    state: web::Data<AppState>,
    query: web::Query<StatsParams>,
) -> Result<HttpResponse, AppError> {
    let ingredient_id = query.ingredient_id;

    let reviews = state.reviews.clone();
    let stats = web::block(move || reviews.stats(ingredient_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReviewStatsResponse::from(stats)))
}

#[utoipa::path(
    get,
    path = "/api/reviews/ingredient/{ingredient_id}",
    params(("ingredient_id" = Uuid, Path, description = "Ingredient UUID")),
    responses(
        (status = 200, description = "Visible reviews, newest first", body = [ReviewResponse]),
        (status = 404, description = "Unknown ingredient"),
    ),
    tag = "reviews"
)]
pub async fn ingredient_reviews(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ingredient_id = path.into_inner();

    let reviews = state.reviews.clone();
    let result = web::block(move || reviews.for_ingredient(ingredient_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(review_list(result)))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review UUID")),
    responses(
        (status = 200, description = "Review found", body = ReviewResponse),
        (status = 404, description = "Unknown, or hidden and not the caller's"),
    ),
    tag = "reviews"
)]
pub async fn get_review(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let viewer = identity.0;

    let reviews = state.reviews.clone();
    let review = web::block(move || reviews.get(viewer, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReviewResponse::from(review)))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    request_body = UpdateReviewRequest,
    params(
        ("id" = Uuid, Path, description = "Review UUID"),
        ("X-User-ID" = Uuid, Header, description = "Caller's user id"),
    ),
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Rating outside 1..=5"),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 404, description = "Unknown review or not the author"),
    ),
    tag = "reviews"
)]
pub async fn update_review(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let id = path.into_inner();
    let body = body.into_inner();
    let changes = ReviewChanges {
        rating: body.rating,
        comment: body.comment,
    };

    let reviews = state.reviews.clone();
    let updated = web::block(move || reviews.update(user.id, id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReviewResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review UUID"),
        ("X-User-ID" = Uuid, Header, description = "Caller's user id"),
    ),
    responses(
        (status = 200, description = "Review deleted", body = SuccessResponse),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 404, description = "Unknown review or not the author"),
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let id = path.into_inner();

    let reviews = state.reviews.clone();
    web::block(move || reviews.delete(user.id, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// POST /api/reviews/{id}/report
///
/// Each user may report a review once. The review is hidden when the
/// number of distinct reporters reaches the threshold.
#[utoipa::path(
    post,
    path = "/api/reviews/{id}/report",
    params(
        ("id" = Uuid, Path, description = "Review UUID"),
        ("X-User-ID" = Uuid, Header, description = "Caller's user id"),
    ),
    responses(
        (status = 200, description = "Report recorded", body = ReportResponse),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 404, description = "Unknown review"),
        (status = 409, description = "Already reported by this user"),
    ),
    tag = "reviews"
)]
pub async fn report_review(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let id = path.into_inner();

    let reviews = state.reviews.clone();
    let outcome = web::block(move || reviews.report(user.id, id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ReportResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    #[test]
    fn stats_average_keeps_one_decimal() {
        let stats = ReviewStats {
            ingredient_id: Uuid::new_v4(),
            ingredient_name: "Thyme".to_string(),
            total_reviews: 0,
            average_rating: BigDecimal::from(0),
            rating_distribution: vec![],
        };
        assert_eq!(ReviewStatsResponse::from(stats).average_rating, "0.0");

        let stats = ReviewStats {
            ingredient_id: Uuid::new_v4(),
            ingredient_name: "Thyme".to_string(),
            total_reviews: 3,
            average_rating: BigDecimal::from_str("4.3").unwrap(),
            rating_distribution: vec![(4, 2), (5, 1)],
        };
        let body = ReviewStatsResponse::from(stats);
        assert_eq!(body.average_rating, "4.3");
        assert_eq!(body.rating_distribution.len(), 2);
    }
}
