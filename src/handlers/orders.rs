use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::session::{CartSession, Identity};
use super::{current_user, money, PageParams};
use crate::domain::order::{OrderDraft, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub phone: String,
}

impl From<CreateOrderRequest> for OrderDraft {
    fn from(r: CreateOrderRequest) -> Self {
        OrderDraft {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            address: r.address,
            postal_code: r.postal_code,
            city: r.city,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    /// Unit price copied from the cart snapshot.
    pub price: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub status: String,
    pub paid: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub total_price: String,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        let total_price = money(&order.total_price());
        let d = order.details;
        Self {
            id: order.id,
            first_name: d.first_name,
            last_name: d.last_name,
            email: d.email,
            address: d.address,
            postal_code: d.postal_code,
            city: d.city,
            phone: d.phone,
            status: order.status.to_string(),
            paid: order.paid,
            created: order.created_at,
            updated: order.updated_at,
            items: order
                .lines
                .into_iter()
                .map(|l| OrderItemResponse {
                    id: l.id,
                    ingredient_id: l.ingredient_id,
                    price: money(&l.unit_price),
                    quantity: l.quantity,
                })
                .collect(),
            total_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Turns the session's cart into an order. The order, its lines and the
/// emptied cart are committed in a single database transaction; on any
/// failure nothing is written and the cart is left as it was.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Empty cart or invalid details"),
        (status = 401, description = "Unknown X-User-ID"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    session: CartSession,
    identity: Identity,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    // Anonymous checkout is allowed; a claimed identity must still resolve.
    let user_id = match identity.0 {
        Some(_) => Some(current_user(&state, &identity).await?.id),
        None => None,
    };
    let draft = OrderDraft::from(body.into_inner());

    let orders = state.orders.clone();
    let key = session.key;
    let order = web::block(move || orders.place_order(key, user_id, draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut builder = HttpResponse::Created();
    session.attach(&mut builder);
    Ok(builder.json(OrderResponse::from(order)))
}

/// GET /api/orders/{id}
///
/// Returns one of the caller's orders together with its lines.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("X-User-ID" = Uuid, Header, description = "Caller's user id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let order_id = path.into_inner();

    let orders = state.orders.clone();
    let order = web::block(move || orders.get_order(user.id, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// Returns a paginated list of the caller's orders, newest first.
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        PageParams,
        ("X-User-ID" = Uuid, Header, description = "Caller's user id"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "Missing or unknown X-User-ID"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let (page, limit) = query.clamped();

    let orders = state.orders.clone();
    let result = web::block(move || orders.list_orders(user.id, page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}
