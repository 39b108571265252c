use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{CatalogItem, CatalogPage, Category};
use crate::domain::errors::DomainError;
use crate::domain::ports::{page_offset, Catalog};
use crate::schema::{categories, ingredients};

use super::models::{CategoryRow, IngredientRow};

pub struct DieselCatalog {
    pool: DbPool,
}

impl DieselCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_item((row, category_name): (IngredientRow, String)) -> CatalogItem {
    CatalogItem {
        id: row.id,
        category_id: row.category_id,
        category_name,
        name: row.name,
        slug: row.slug,
        description: row.description,
        price: row.price,
        unit: row.unit,
        weight_per_unit: row.weight_per_unit,
        available: row.available,
        stock: row.stock,
        rating_avg: row.rating_avg,
        rating_count: row.rating_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

impl Catalog for DieselCatalog {
    fn find(&self, id: Uuid) -> Result<Option<CatalogItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = ingredients::table
            .inner_join(categories::table)
            .filter(ingredients::id.eq(id))
            .select((IngredientRow::as_select(), categories::name))
            .first::<(IngredientRow, String)>(&mut conn)
            .optional()?;

        Ok(row.map(to_item))
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<CatalogItem>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get()?;

        let rows = ingredients::table
            .inner_join(categories::table)
            .filter(ingredients::id.eq_any(ids))
            .select((IngredientRow::as_select(), categories::name))
            .load::<(IngredientRow, String)>(&mut conn)?;

        Ok(rows.into_iter().map(to_item).collect())
    }

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|c| Category {
                id: c.id,
                name: c.name,
                slug: c.slug,
                description: c.description,
                created_at: c.created_at,
            })
            .collect())
    }

    fn list_available(&self, page: i64, limit: i64) -> Result<CatalogPage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page_offset(page, limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = ingredients::table
                .filter(ingredients::available.eq(true))
                .count()
                .get_result(conn)?;

            let rows = ingredients::table
                .inner_join(categories::table)
                .filter(ingredients::available.eq(true))
                .select((IngredientRow::as_select(), categories::name))
                .order((ingredients::name.asc(), ingredients::id.asc()))
                .limit(limit)
                .offset(offset)
                .load::<(IngredientRow, String)>(conn)?;

            Ok(CatalogPage {
                items: rows.into_iter().map(to_item).collect(),
                total,
            })
        })
    }

    fn featured(&self, limit: i64) -> Result<Vec<CatalogItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = ingredients::table
            .inner_join(categories::table)
            .filter(ingredients::available.eq(true))
            .select((IngredientRow::as_select(), categories::name))
            .order(ingredients::created_at.desc())
            .limit(limit)
            .load::<(IngredientRow, String)>(&mut conn)?;

        Ok(rows.into_iter().map(to_item).collect())
    }

    fn set_rating(
        &self,
        id: Uuid,
        average: Option<BigDecimal>,
        count: i32,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(ingredients::table.find(id))
            .set((
                ingredients::rating_avg.eq(average),
                ingredients::rating_count.eq(count),
                ingredients::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}
