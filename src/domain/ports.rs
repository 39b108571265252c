use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::Cart;
use super::catalog::{CatalogItem, CatalogPage, Category};
use super::errors::DomainError;
use super::order::{ListResult, OrderDraft, OrderView};
use super::review::{NewReview, ReportOutcome, Review, ReviewChanges};
use super::user::{ProfileChanges, Registration, User};

/// Opaque key of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(pub Uuid);

/// Rows to skip for a 1-based `page`. Saturates instead of overflowing, so an
/// absurd page yields an empty result rather than an error.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    page.max(1)
        .saturating_sub(1)
        .saturating_mul(limit.max(0))
}

pub trait Catalog: Send + Sync + 'static {
    fn find(&self, id: Uuid) -> Result<Option<CatalogItem>, DomainError>;
    /// Entries for the ids that still exist; unknown ids are skipped.
    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<CatalogItem>, DomainError>;
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn list_available(&self, page: i64, limit: i64) -> Result<CatalogPage, DomainError>;
    fn featured(&self, limit: i64) -> Result<Vec<CatalogItem>, DomainError>;
    fn set_rating(
        &self,
        id: Uuid,
        average: Option<BigDecimal>,
        count: i32,
    ) -> Result<(), DomainError>;
}

/// Cart state keyed by session. Writes only happen through `commit` and `clear`.
pub trait SessionStore: Send + Sync + 'static {
    /// The stored cart, or an empty one when the session is unknown or expired.
    fn load(&self, session: SessionKey) -> Result<Cart, DomainError>;
    fn commit(&self, session: SessionKey, cart: &Cart) -> Result<(), DomainError>;
    fn clear(&self, session: SessionKey) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Turns the session's cart into an order and empties the cart, all or nothing.
    ///
    /// The cart is read inside the same unit of work that writes the order,
    /// so an empty cart at that point fails with `Validation`.
    fn place(
        &self,
        session: SessionKey,
        user_id: Option<Uuid>,
        draft: OrderDraft,
    ) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: Uuid, page: i64, limit: i64)
        -> Result<ListResult, DomainError>;
}

pub trait ReviewRepository: Send + Sync + 'static {
    /// `Conflict` when the user already reviewed the ingredient.
    fn create(&self, user_id: Uuid, review: NewReview) -> Result<Review, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError>;
    fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    fn visible_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<Review>, DomainError>;
    fn for_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError>;
    /// All ratings for an ingredient, hidden reviews included.
    fn ratings_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<i16>, DomainError>;
    /// Records a report and hides the review once the threshold is reached.
    /// `Conflict` when `reporter` already reported it.
    fn report(&self, review_id: Uuid, reporter: Uuid) -> Result<ReportOutcome, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    /// `Conflict` when the email or username is taken.
    fn create(&self, registration: Registration) -> Result<User, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, DomainError>;
}
