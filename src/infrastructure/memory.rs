//! In-process implementation of every port.
//!
//! All state sits behind one mutex. Order placement stages the header and
//! its lines locally and only publishes them, together with the cart
//! removal, once every line was written, so a failed line write leaves
//! the store untouched. `fail_order_line_write` injects such a failure.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::catalog::{CatalogItem, CatalogPage, Category};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ListResult, OrderDraft, OrderLineInput, OrderLineView, OrderStatus, OrderView,
};
use crate::domain::ports::{
    page_offset, Catalog, OrderRepository, ReviewRepository, SessionKey, SessionStore,
    UserRepository,
};
use crate::domain::review::{should_hide, NewReview, ReportOutcome, Review, ReviewChanges};
use crate::domain::user::{ProfileChanges, Registration, User};

#[derive(Default)]
struct MemoryState {
    categories: Vec<Category>,
    items: HashMap<Uuid, CatalogItem>,
    sessions: HashMap<SessionKey, Cart>,
    orders: Vec<OrderView>,
    users: Vec<User>,
    reviews: Vec<Review>,
    reports: Vec<(Uuid, Uuid)>,
    fail_order_line_at: Option<usize>,
    fail_rating_write: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("memory store lock poisoned".to_string()))
    }

    pub fn add_category(&self, name: &str) -> Result<Category, DomainError> {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: String::new(),
            created_at: Utc::now(),
        };
        self.lock()?.categories.push(category.clone());
        Ok(category)
    }

    pub fn add_item(
        &self,
        category: &Category,
        name: &str,
        price: BigDecimal,
    ) -> Result<CatalogItem, DomainError> {
        let now = Utc::now();
        let item = CatalogItem {
            id: Uuid::new_v4(),
            category_id: category.id,
            category_name: category.name.clone(),
            name: name.to_string(),
            slug: slugify(name),
            description: String::new(),
            price,
            unit: "pcs".to_string(),
            weight_per_unit: BigDecimal::from(1),
            available: true,
            stock: 100,
            rating_avg: None,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.items.insert(item.id, item.clone());
        Ok(item)
    }

    pub fn set_price(&self, id: Uuid, price: BigDecimal) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))?;
        item.price = price;
        item.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_available(&self, id: Uuid, available: bool) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))?;
        item.available = available;
        Ok(())
    }

    pub fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
        self.lock()?.items.remove(&id);
        Ok(())
    }

    /// Makes the order-line write at `index` (0-based) of the next placement fail.
    pub fn fail_order_line_write(&self, index: usize) -> Result<(), DomainError> {
        self.lock()?.fail_order_line_at = Some(index);
        Ok(())
    }

    /// Makes the next `set_rating` call fail.
    pub fn fail_next_rating_write(&self) -> Result<(), DomainError> {
        self.lock()?.fail_rating_write = true;
        Ok(())
    }

    pub fn order_count(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.orders.len())
    }

    pub fn order_line_count(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.orders.iter().map(|o| o.lines.len()).sum())
    }
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn page_bounds(page: i64, limit: i64) -> (usize, usize) {
    let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
    (offset, limit.max(0) as usize)
}

impl Catalog for MemoryStore {
    fn find(&self, id: Uuid) -> Result<Option<CatalogItem>, DomainError> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<CatalogItem>, DomainError> {
        let state = self.lock()?;
        Ok(ids.iter().filter_map(|id| state.items.get(id).cloned()).collect())
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories = self.lock()?.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn list_available(&self, page: i64, limit: i64) -> Result<CatalogPage, DomainError> {
        let state = self.lock()?;
        let mut items: Vec<CatalogItem> =
            state.items.values().filter(|i| i.available).cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        let total = items.len() as i64;
        let (offset, limit) = page_bounds(page, limit);
        Ok(CatalogPage {
            items: items.into_iter().skip(offset).take(limit).collect(),
            total,
        })
    }

    fn featured(&self, limit: i64) -> Result<Vec<CatalogItem>, DomainError> {
        let state = self.lock()?;
        let mut items: Vec<CatalogItem> =
            state.items.values().filter(|i| i.available).cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    fn set_rating(
        &self,
        id: Uuid,
        average: Option<BigDecimal>,
        count: i32,
    ) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        if std::mem::take(&mut state.fail_rating_write) {
            return Err(DomainError::Internal("simulated rating write failure".to_string()));
        }
        if let Some(item) = state.items.get_mut(&id) {
            item.rating_avg = average;
            item.rating_count = count;
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, session: SessionKey) -> Result<Cart, DomainError> {
        Ok(self
            .lock()?
            .sessions
            .get(&session)
            .cloned()
            .unwrap_or_default())
    }

    fn commit(&self, session: SessionKey, cart: &Cart) -> Result<(), DomainError> {
        let mut stored = cart.clone();
        stored.mark_clean();
        self.lock()?.sessions.insert(session, stored);
        Ok(())
    }

    fn clear(&self, session: SessionKey) -> Result<(), DomainError> {
        self.lock()?.sessions.remove(&session);
        Ok(())
    }
}

impl OrderRepository for MemoryStore {
    fn place(
        &self,
        session: SessionKey,
        user_id: Option<Uuid>,
        draft: OrderDraft,
    ) -> Result<OrderView, DomainError> {
        let mut state = self.lock()?;
        let fail_at = state.fail_order_line_at.take();

        let cart = state.sessions.get(&session).cloned().unwrap_or_default();
        let inputs = OrderLineInput::from_cart(&cart)?;

        let now = Utc::now();
        let mut order = OrderView {
            id: Uuid::new_v4(),
            user_id,
            details: draft,
            status: OrderStatus::Pending,
            paid: false,
            created_at: now,
            updated_at: now,
            lines: Vec::with_capacity(inputs.len()),
        };
        for (index, line) in inputs.into_iter().enumerate() {
            if fail_at == Some(index) {
                return Err(DomainError::Internal(format!(
                    "failed to write order line {}",
                    index
                )));
            }
            order.lines.push(OrderLineView {
                id: Uuid::new_v4(),
                ingredient_id: line.ingredient_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        state.orders.push(order.clone());
        state.sessions.remove(&session);
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn list_for_user(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let state = self.lock()?;
        let mine: Vec<&OrderView> = state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == Some(user_id))
            .collect();
        let total = mine.len() as i64;
        let (offset, limit) = page_bounds(page, limit);
        Ok(ListResult {
            items: mine.into_iter().skip(offset).take(limit).cloned().collect(),
            total,
        })
    }
}

impl ReviewRepository for MemoryStore {
    fn create(&self, user_id: Uuid, review: NewReview) -> Result<Review, DomainError> {
        let mut state = self.lock()?;
        if state
            .reviews
            .iter()
            .any(|r| r.user_id == user_id && r.ingredient_id == review.ingredient_id)
        {
            return Err(DomainError::Conflict(
                "You have already reviewed this ingredient".to_string(),
            ));
        }
        let username = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();
        let now = Utc::now();
        let created = Review {
            id: Uuid::new_v4(),
            user_id,
            username,
            ingredient_id: review.ingredient_id,
            rating: review.rating,
            comment: review.comment,
            is_hidden: false,
            created_at: now,
            updated_at: now,
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        Ok(self.lock()?.reviews.iter().find(|r| r.id == id).cloned())
    }

    fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, DomainError> {
        let mut state = self.lock()?;
        let review = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound("Review".to_string()))?;
        if let Some(rating) = changes.rating {
            review.rating = rating;
        }
        if let Some(comment) = changes.comment {
            review.comment = comment;
        }
        review.updated_at = Utc::now();
        Ok(review.clone())
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        state.reviews.retain(|r| r.id != id);
        state.reports.retain(|(review_id, _)| *review_id != id);
        Ok(())
    }

    fn visible_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<Review>, DomainError> {
        Ok(self
            .lock()?
            .reviews
            .iter()
            .rev()
            .filter(|r| r.ingredient_id == ingredient_id && !r.is_hidden)
            .cloned()
            .collect())
    }

    fn for_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError> {
        Ok(self
            .lock()?
            .reviews
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn ratings_for_ingredient(&self, ingredient_id: Uuid) -> Result<Vec<i16>, DomainError> {
        Ok(self
            .lock()?
            .reviews
            .iter()
            .filter(|r| r.ingredient_id == ingredient_id)
            .map(|r| r.rating)
            .collect())
    }

    fn report(&self, review_id: Uuid, reporter: Uuid) -> Result<ReportOutcome, DomainError> {
        let mut state = self.lock()?;
        if !state.reviews.iter().any(|r| r.id == review_id) {
            return Err(DomainError::NotFound("Review".to_string()));
        }
        if state.reports.contains(&(review_id, reporter)) {
            return Err(DomainError::Conflict(
                "You have already reported this review".to_string(),
            ));
        }
        state.reports.push((review_id, reporter));
        let report_count = state
            .reports
            .iter()
            .filter(|(id, _)| *id == review_id)
            .count() as i64;

        let mut hidden_now = false;
        if let Some(review) = state.reviews.iter_mut().find(|r| r.id == review_id) {
            if should_hide(report_count, review.is_hidden) {
                review.is_hidden = true;
                review.updated_at = Utc::now();
                hidden_now = true;
            }
        }
        Ok(ReportOutcome {
            report_count,
            hidden_now,
        })
    }
}

impl UserRepository for MemoryStore {
    fn create(&self, registration: Registration) -> Result<User, DomainError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email == registration.email) {
            return Err(DomainError::Conflict("Email is already registered".to_string()));
        }
        if state.users.iter().any(|u| u.username == registration.username) {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: registration.email,
            username: registration.username,
            phone: registration.phone,
            address: registration.address,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, DomainError> {
        let mut state = self.lock()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::NotFound("User".to_string()))?;
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(address) = changes.address {
            user.address = address;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
