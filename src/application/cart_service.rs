use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::catalog::CatalogItem;
use crate::domain::errors::DomainError;
use crate::domain::ports::{Catalog, SessionKey, SessionStore};

#[derive(Debug, Clone)]
pub struct CartLineDetails {
    pub ingredient_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
    /// Current catalog entry, `None` when the ingredient no longer exists.
    pub item: Option<CatalogItem>,
}

#[derive(Debug, Clone)]
pub struct CartContents {
    pub lines: Vec<CartLineDetails>,
    pub total_quantity: i64,
    pub total_price: BigDecimal,
}

pub struct CartService {
    catalog: Arc<dyn Catalog>,
    sessions: Arc<dyn SessionStore>,
}

impl CartService {
    pub fn new(catalog: Arc<dyn Catalog>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { catalog, sessions }
    }

    pub fn add(
        &self,
        session: SessionKey,
        ingredient_id: Uuid,
        quantity: i32,
        override_quantity: bool,
    ) -> Result<CartContents, DomainError> {
        let item = self
            .catalog
            .find(ingredient_id)?
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))?;
        if !item.available {
            return Err(DomainError::invalid(format!(
                "Ingredient '{}' is not available",
                item.name
            )));
        }

        let mut cart = self.sessions.load(session)?;
        cart.add(&item, quantity, override_quantity)?;
        self.commit(session, &mut cart)?;
        self.describe(&cart)
    }

    /// Removing an ingredient that is not in the cart succeeds without a write.
    pub fn remove(
        &self,
        session: SessionKey,
        ingredient_id: Uuid,
    ) -> Result<CartContents, DomainError> {
        let mut cart = self.sessions.load(session)?;
        cart.remove(ingredient_id);
        self.commit(session, &mut cart)?;
        self.describe(&cart)
    }

    pub fn contents(&self, session: SessionKey) -> Result<CartContents, DomainError> {
        let cart = self.sessions.load(session)?;
        self.describe(&cart)
    }

    pub fn clear(&self, session: SessionKey) -> Result<(), DomainError> {
        self.sessions.clear(session)
    }

    fn commit(&self, session: SessionKey, cart: &mut Cart) -> Result<(), DomainError> {
        if cart.is_dirty() {
            self.sessions.commit(session, cart)?;
            cart.mark_clean();
        }
        Ok(())
    }

    fn describe(&self, cart: &Cart) -> Result<CartContents, DomainError> {
        let catalog: HashMap<Uuid, CatalogItem> = self
            .catalog
            .find_many(&cart.item_ids())?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let lines = cart
            .view(&catalog)
            .map(|view| {
                if view.catalog_missing() {
                    log::warn!(
                        "cart line for ingredient {} has no catalog entry; keeping snapshot price {}",
                        view.item_id,
                        view.line.unit_price
                    );
                }
                CartLineDetails {
                    ingredient_id: view.item_id,
                    quantity: view.line.quantity,
                    unit_price: view.line.unit_price.clone(),
                    line_total: view.line_total(),
                    item: view.item.cloned(),
                }
            })
            .collect();

        Ok(CartContents {
            lines,
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
        })
    }
}
