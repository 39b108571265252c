use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{Catalog, ReviewRepository};
use crate::domain::review::{
    average_rating, rating_distribution, validate_rating, NewReview, ReportOutcome, Review,
    ReviewChanges, ReviewStats,
};

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    catalog: Arc<dyn Catalog>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, catalog: Arc<dyn Catalog>) -> Self {
        Self { reviews, catalog }
    }

    pub fn create(&self, user_id: Uuid, review: NewReview) -> Result<Review, DomainError> {
        validate_rating(review.rating)?;
        self.ensure_ingredient(review.ingredient_id)?;

        let created = self.reviews.create(user_id, review)?;
        self.refresh_rating(created.ingredient_id);
        Ok(created)
    }

    pub fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: ReviewChanges,
    ) -> Result<Review, DomainError> {
        if let Some(rating) = changes.rating {
            validate_rating(rating)?;
        }
        self.owned(user_id, id)?;

        let updated = self.reviews.update(id, changes)?;
        self.refresh_rating(updated.ingredient_id);
        Ok(updated)
    }

    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let review = self.owned(user_id, id)?;
        self.reviews.delete(id)?;
        self.refresh_rating(review.ingredient_id);
        Ok(())
    }

    /// Hidden reviews are only visible to their author.
    pub fn get(&self, viewer: Option<Uuid>, id: Uuid) -> Result<Review, DomainError> {
        match self.reviews.find_by_id(id)? {
            Some(r) if !r.is_hidden || viewer == Some(r.user_id) => Ok(r),
            _ => Err(DomainError::NotFound("Review".to_string())),
        }
    }

    pub fn for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<Review>, DomainError> {
        self.ensure_ingredient(ingredient_id)?;
        self.reviews.visible_for_ingredient(ingredient_id)
    }

    pub fn mine(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError> {
        self.reviews.for_user(user_id)
    }

    pub fn stats(&self, ingredient_id: Uuid) -> Result<ReviewStats, DomainError> {
        let item = self
            .catalog
            .find(ingredient_id)?
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))?;
        let ratings = self.reviews.ratings_for_ingredient(ingredient_id)?;

        Ok(ReviewStats {
            ingredient_id,
            ingredient_name: item.name,
            total_reviews: ratings.len() as i64,
            average_rating: average_rating(&ratings, 1),
            rating_distribution: rating_distribution(&ratings),
        })
    }

    pub fn report(&self, reporter: Uuid, id: Uuid) -> Result<ReportOutcome, DomainError> {
        let outcome = self.reviews.report(id, reporter)?;
        if outcome.hidden_now {
            log::info!(
                "review {} hidden after {} reports",
                id,
                outcome.report_count
            );
        }
        Ok(outcome)
    }

    fn ensure_ingredient(&self, ingredient_id: Uuid) -> Result<(), DomainError> {
        self.catalog
            .find(ingredient_id)?
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))
    }

    fn owned(&self, user_id: Uuid, id: Uuid) -> Result<Review, DomainError> {
        match self.reviews.find_by_id(id)? {
            Some(r) if r.user_id == user_id => Ok(r),
            _ => Err(DomainError::NotFound("Review".to_string())),
        }
    }

    /// Post-commit hook: recompute the ingredient's aggregate rating.
    ///
    /// The review write has already committed when this runs, so a failure
    /// is logged and left for the next write to repair.
    fn refresh_rating(&self, ingredient_id: Uuid) {
        let result = self
            .reviews
            .ratings_for_ingredient(ingredient_id)
            .and_then(|ratings| {
                let average = (!ratings.is_empty()).then(|| average_rating(&ratings, 2));
                self.catalog
                    .set_rating(ingredient_id, average, ratings.len() as i32)
            });
        if let Err(e) = result {
            log::warn!("rating refresh for ingredient {} failed: {}", ingredient_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::review::HIDE_THRESHOLD;
    use crate::infrastructure::memory::MemoryStore;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn setup() -> (Arc<MemoryStore>, ReviewService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let grains = store.add_category("Grains").unwrap();
        let rice = store.add_item(&grains, "Rice", dec("2.00")).unwrap();
        let service = ReviewService::new(store.clone(), store.clone());
        (store, service, rice.id)
    }

    fn new_review(ingredient_id: Uuid, rating: i16) -> NewReview {
        NewReview {
            ingredient_id,
            rating,
            comment: "fine".to_string(),
        }
    }

    #[test]
    fn duplicate_review_is_a_conflict() {
        let (_, service, rice) = setup();
        let user = Uuid::new_v4();
        service.create(user, new_review(rice, 4)).unwrap();
        let err = service.create(user, new_review(rice, 5)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn review_for_unknown_ingredient_is_not_found() {
        let (_, service, _) = setup();
        let err = service
            .create(Uuid::new_v4(), new_review(Uuid::new_v4(), 4))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn rating_is_recomputed_after_each_change() {
        let (store, service, rice) = setup();
        let first = service.create(Uuid::new_v4(), new_review(rice, 5)).unwrap();
        service.create(Uuid::new_v4(), new_review(rice, 2)).unwrap();

        let item = store.find(rice).unwrap().unwrap();
        assert_eq!(item.rating_count, 2);
        assert_eq!(item.rating_avg, Some(dec("3.50")));

        service.delete(first.user_id, first.id).unwrap();
        let item = store.find(rice).unwrap().unwrap();
        assert_eq!(item.rating_count, 1);
        assert_eq!(item.rating_avg, Some(dec("2")));
    }

    #[test]
    fn failed_rating_refresh_still_returns_the_stored_review() {
        let (store, service, rice) = setup();
        let user = Uuid::new_v4();
        store.fail_next_rating_write().unwrap();

        let created = service.create(user, new_review(rice, 4)).unwrap();

        assert_eq!(service.mine(user).unwrap()[0].id, created.id);
        assert_eq!(store.find(rice).unwrap().unwrap().rating_count, 0);
        assert!(matches!(
            service.create(user, new_review(rice, 5)),
            Err(DomainError::Conflict(_))
        ));

        // The next write repairs the aggregate.
        service
            .update(
                user,
                created.id,
                ReviewChanges {
                    rating: Some(5),
                    comment: None,
                },
            )
            .unwrap();
        assert_eq!(store.find(rice).unwrap().unwrap().rating_count, 1);
    }

    #[test]
    fn only_the_author_may_edit() {
        let (_, service, rice) = setup();
        let author = Uuid::new_v4();
        let review = service.create(author, new_review(rice, 3)).unwrap();

        let changes = ReviewChanges {
            rating: Some(4),
            comment: None,
        };
        assert!(matches!(
            service.update(Uuid::new_v4(), review.id, changes.clone()),
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(service.update(author, review.id, changes).unwrap().rating, 4);
    }

    #[test]
    fn reporting_twice_is_a_conflict() {
        let (_, service, rice) = setup();
        let review = service.create(Uuid::new_v4(), new_review(rice, 1)).unwrap();
        let reporter = Uuid::new_v4();
        service.report(reporter, review.id).unwrap();
        assert!(matches!(
            service.report(reporter, review.id),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn fifth_reporter_hides_review_exactly_once() {
        let (_, service, rice) = setup();
        let author = Uuid::new_v4();
        let review = service.create(author, new_review(rice, 1)).unwrap();

        let outcomes: Vec<ReportOutcome> = (0..HIDE_THRESHOLD + 2)
            .map(|_| service.report(Uuid::new_v4(), review.id).unwrap())
            .collect();

        let hidden_transitions = outcomes.iter().filter(|o| o.hidden_now).count();
        assert_eq!(hidden_transitions, 1);
        assert!(outcomes[(HIDE_THRESHOLD - 1) as usize].hidden_now);
        assert!(service.for_ingredient(rice).unwrap().is_empty());
        assert!(matches!(
            service.get(None, review.id),
            Err(DomainError::NotFound(_))
        ));
        assert!(service.get(Some(author), review.id).is_ok());
    }

    #[test]
    fn stats_cover_all_reviews() {
        let (_, service, rice) = setup();
        for rating in [5, 4, 4] {
            service.create(Uuid::new_v4(), new_review(rice, rating)).unwrap();
        }
        let stats = service.stats(rice).unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, dec("4.3"));
        assert_eq!(stats.rating_distribution, vec![(4, 2), (5, 1)]);
    }
}
