use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ReviewRepository;
use crate::domain::review::{should_hide, NewReview, ReportOutcome, Review, ReviewChanges};
use crate::schema::{review_reports, reviews, users};

use super::models::{NewReviewReportRow, NewReviewRow, ReviewChangeset, ReviewRow};
use super::unique_violation;

pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_review((row, username): (ReviewRow, String)) -> Review {
    Review {
        id: row.id,
        user_id: row.user_id,
        username,
        ingredient_id: row.ingredient_id,
        rating: row.rating,
        comment: row.comment,
        is_hidden: row.is_hidden,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn load_one(conn: &mut PgConnection, id: Uuid) -> Result<Option<Review>, DomainError> {
    let row = reviews::table
        .inner_join(users::table)
        .filter(reviews::id.eq(id))
        .select((ReviewRow::as_select(), users::username))
        .first::<(ReviewRow, String)>(conn)
        .optional()?;
    Ok(row.map(to_review))
}

impl ReviewRepository for DieselReviewRepository {
    fn create(&self, user_id: Uuid, review: NewReview) -> Result<Review, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                id,
                user_id,
                ingredient_id: review.ingredient_id,
                rating: review.rating,
                comment: review.comment,
            })
            .execute(&mut conn)
            .map_err(|e| match unique_violation(&e) {
                Some(_) => DomainError::Conflict(
                    "You have already reviewed this ingredient".to_string(),
                ),
                None => e.into(),
            })?;

        load_one(&mut conn, id)?
            .ok_or_else(|| DomainError::Internal(format!("review {} vanished after insert", id)))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        let mut conn = self.pool.get()?;
        load_one(&mut conn, id)
    }

    fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(reviews::table.find(id))
            .set(&ReviewChangeset {
                rating: changes.rating,
                comment: changes.comment,
                updated_at: Some(Utc::now()),
            })
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound("Review".to_string()));
        }

        load_one(&mut conn, id)?.ok_or_else(|| DomainError::NotFound("Review".to_string()))
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Reports go with the review through ON DELETE CASCADE.
        diesel::delete(reviews::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn visible_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = reviews::table
            .inner_join(users::table)
            .filter(reviews::ingredient_id.eq(ingredient_id))
            .filter(reviews::is_hidden.eq(false))
            .select((ReviewRow::as_select(), users::username))
            .order(reviews::created_at.desc())
            .load::<(ReviewRow, String)>(&mut conn)?;

        Ok(rows.into_iter().map(to_review).collect())
    }

    fn for_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = reviews::table
            .inner_join(users::table)
            .filter(reviews::user_id.eq(user_id))
            .select((ReviewRow::as_select(), users::username))
            .order(reviews::created_at.desc())
            .load::<(ReviewRow, String)>(&mut conn)?;

        Ok(rows.into_iter().map(to_review).collect())
    }

    fn ratings_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<i16>, DomainError> {
        let mut conn = self.pool.get()?;

        let ratings = reviews::table
            .filter(reviews::ingredient_id.eq(ingredient_id))
            .select(reviews::rating)
            .load::<i16>(&mut conn)?;
        Ok(ratings)
    }

    fn report(&self, review_id: Uuid, reporter: Uuid) -> Result<ReportOutcome, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Serialise concurrent reports on the same review.
            let is_hidden = reviews::table
                .find(review_id)
                .select(reviews::is_hidden)
                .for_update()
                .first::<bool>(conn)
                .optional()?
                .ok_or_else(|| DomainError::NotFound("Review".to_string()))?;

            diesel::insert_into(review_reports::table)
                .values(&NewReviewReportRow {
                    review_id,
                    user_id: reporter,
                })
                .execute(conn)
                .map_err(|e| match unique_violation(&e) {
                    Some(_) => DomainError::Conflict(
                        "You have already reported this review".to_string(),
                    ),
                    None => e.into(),
                })?;

            let report_count: i64 = review_reports::table
                .filter(review_reports::review_id.eq(review_id))
                .count()
                .get_result(conn)?;

            let hidden_now = should_hide(report_count, is_hidden);
            if hidden_now {
                diesel::update(reviews::table.find(review_id))
                    .set((
                        reviews::is_hidden.eq(true),
                        reviews::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)?;
            }

            Ok(ReportOutcome {
                report_count,
                hidden_now,
            })
        })
    }
}
