use std::sync::Arc;

use uuid::Uuid;

use crate::domain::catalog::{CatalogItem, CatalogPage, Category, FEATURED_LIMIT};
use crate::domain::errors::DomainError;
use crate::domain::ports::Catalog;

pub struct CatalogService {
    catalog: Arc<dyn Catalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn categories(&self) -> Result<Vec<Category>, DomainError> {
        self.catalog.list_categories()
    }

    pub fn list(&self, page: i64, limit: i64) -> Result<CatalogPage, DomainError> {
        self.catalog.list_available(page, limit)
    }

    pub fn featured(&self) -> Result<Vec<CatalogItem>, DomainError> {
        self.catalog.featured(FEATURED_LIMIT)
    }

    /// Only available ingredients are browsable.
    pub fn get(&self, id: Uuid) -> Result<CatalogItem, DomainError> {
        self.catalog
            .find(id)?
            .filter(|item| item.available)
            .ok_or_else(|| DomainError::NotFound("Ingredient".to_string()))
    }
}
