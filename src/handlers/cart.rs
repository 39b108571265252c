use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::session::CartSession;
use super::{money, SuccessResponse};
use crate::application::cart_service::{CartContents, CartLineDetails};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Replace the line's quantity instead of adding to it.
    #[serde(default, rename = "override")]
    pub override_quantity: bool,
}

fn default_quantity() -> i32 {
    1
}

impl Default for AddItemRequest {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
            override_quantity: false,
        }
    }
}

impl AddItemRequest {
    /// An empty body means "add one". Anything else must be a valid request.
    fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| AppError::Validation {
            message: "Invalid cart item request".to_string(),
            fields: BTreeMap::from([("quantity".to_string(), vec![e.to_string()])]),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartIngredientSummary {
    pub name: String,
    pub slug: String,
    pub unit: String,
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub ingredient_id: Uuid,
    pub quantity: i32,
    /// Price captured when the line was first added.
    pub unit_price: String,
    pub total_price: String,
    pub ingredient: Option<CartIngredientSummary>,
    pub catalog_missing: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_quantity: i64,
    pub total_price: String,
}

impl From<CartLineDetails> for CartItemResponse {
    fn from(line: CartLineDetails) -> Self {
        Self {
            ingredient_id: line.ingredient_id,
            quantity: line.quantity,
            unit_price: money(&line.unit_price),
            total_price: money(&line.line_total),
            catalog_missing: line.item.is_none(),
            ingredient: line.item.map(|item| CartIngredientSummary {
                name: item.name,
                slug: item.slug,
                unit: item.unit,
                available: item.available,
            }),
        }
    }
}

impl From<CartContents> for CartResponse {
    fn from(contents: CartContents) -> Self {
        Self {
            items: contents.lines.into_iter().map(Into::into).collect(),
            total_quantity: contents.total_quantity,
            total_price: money(&contents.total_price),
        }
    }
}

fn cart_response(session: &CartSession, contents: CartContents) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    session.attach(&mut builder);
    builder.json(CartResponse::from(contents))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    session: CartSession,
) -> Result<HttpResponse, AppError> {
    let cart = state.cart.clone();
    let key = session.key;
    let contents = web::block(move || cart.contents(key))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(cart_response(&session, contents))
}

/// POST /api/cart/items/{ingredient_id}
///
/// Adds to (or with `override`, replaces) the quantity of a line. The unit
/// price is captured only when the line is first created.
#[utoipa::path(
    post,
    path = "/api/cart/items/{ingredient_id}",
    params(
        ("ingredient_id" = Uuid, Path, description = "Ingredient UUID"),
    ),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Malformed body, invalid quantity or unavailable ingredient"),
        (status = 404, description = "Unknown ingredient"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    session: CartSession,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let ingredient_id = path.into_inner();
    let body = AddItemRequest::from_body(&body)?;

    let cart = state.cart.clone();
    let key = session.key;
    let contents = web::block(move || {
        cart.add(key, ingredient_id, body.quantity, body.override_quantity)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(cart_response(&session, contents))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{ingredient_id}",
    params(
        ("ingredient_id" = Uuid, Path, description = "Ingredient UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    session: CartSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let ingredient_id = path.into_inner();

    let cart = state.cart.clone();
    let key = session.key;
    let contents = web::block(move || cart.remove(key, ingredient_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(cart_response(&session, contents))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = SuccessResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    session: CartSession,
) -> Result<HttpResponse, AppError> {
    let cart = state.cart.clone();
    let key = session.key;
    web::block(move || cart.clear(key))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut builder = HttpResponse::Ok();
    session.attach(&mut builder);
    Ok(builder.json(SuccessResponse { success: true }))
}
