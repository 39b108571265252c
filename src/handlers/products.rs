use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{money, PageParams};
use crate::domain::catalog::{CatalogItem, Category};
use crate::errors::AppError;
use crate::state::AppState;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
    pub unit: String,
    pub weight_per_unit: String,
    pub available: bool,
    pub stock: i32,
    pub rating: Option<String>,
    pub reviews_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CatalogItem> for IngredientResponse {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            category_id: item.category_id,
            category_name: item.category_name,
            name: item.name,
            slug: item.slug,
            description: item.description,
            price: money(&item.price),
            unit: item.unit,
            weight_per_unit: item.weight_per_unit.to_string(),
            available: item.available,
            stock: item.stock,
            rating: item.rating_avg.as_ref().map(money),
            reviews_count: item.rating_count,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListIngredientsResponse {
    pub items: Vec<IngredientResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let result = web::block(move || catalog.categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CategoryResponse> = result.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/products/ingredients
///
/// Available ingredients in name order. Use `page` (1-based) and `limit`
/// to control pagination.
#[utoipa::path(
    get,
    path = "/api/products/ingredients",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated list of ingredients", body = ListIngredientsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_ingredients(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();

    let catalog = state.catalog.clone();
    let result = web::block(move || catalog.list(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListIngredientsResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

#[utoipa::path(
    get,
    path = "/api/products/ingredients/featured",
    responses(
        (status = 200, description = "Newest available ingredients", body = [IngredientResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn featured_ingredients(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let result = web::block(move || catalog.featured())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<IngredientResponse> = result.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/products/ingredients/{id}",
    params(
        ("id" = Uuid, Path, description = "Ingredient UUID"),
    ),
    responses(
        (status = 200, description = "Ingredient found", body = IngredientResponse),
        (status = 404, description = "Unknown or unavailable ingredient"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_ingredient(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let catalog = state.catalog.clone();
    let item = web::block(move || catalog.get(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(IngredientResponse::from(item)))
}
