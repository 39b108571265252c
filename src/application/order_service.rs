use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, OrderDraft, OrderView};
use crate::domain::ports::{OrderRepository, SessionKey, SessionStore};

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    sessions: Arc<dyn SessionStore>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { repo, sessions }
    }

    /// Checks the cart and the submitted details, then hands both to the
    /// repository, which writes the order and empties the cart as one unit.
    pub fn place_order(
        &self,
        session: SessionKey,
        user_id: Option<Uuid>,
        draft: OrderDraft,
    ) -> Result<OrderView, DomainError> {
        let cart = self.sessions.load(session)?;
        if cart.total_quantity() <= 0 {
            return Err(DomainError::invalid("Cart is empty"));
        }
        let draft = draft.validate()?;

        let order = self.repo.place(session, user_id, draft)?;
        log::info!(
            "order {} placed with {} line(s), total {}",
            order.id,
            order.lines.len(),
            order.total_price()
        );
        Ok(order)
    }

    /// Orders are only visible to the user who placed them.
    pub fn get_order(&self, user_id: Uuid, id: Uuid) -> Result<OrderView, DomainError> {
        match self.repo.find_by_id(id)? {
            Some(order) if order.user_id == Some(user_id) => Ok(order),
            _ => Err(DomainError::NotFound("Order".to_string())),
        }
    }

    pub fn list_orders(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.repo.list_for_user(user_id, page, limit)
    }
}
