use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A purchasable ingredient as the catalog currently describes it.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: BigDecimal,
    /// One of `g`, `kg`, `ml`, `l`, `pcs`, `pack`.
    pub unit: String,
    pub weight_per_unit: BigDecimal,
    pub available: bool,
    pub stock: i32,
    pub rating_avg: Option<BigDecimal>,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub total: i64,
}

pub const FEATURED_LIMIT: i64 = 8;
