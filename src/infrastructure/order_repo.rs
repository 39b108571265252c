use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ListResult, OrderDraft, OrderLineInput, OrderLineView, OrderStatus, OrderView,
};
use crate::domain::ports::{page_offset, OrderRepository, SessionKey};
use crate::schema::{cart_sessions, order_lines, orders};

use super::models::{CartSessionRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(order: OrderRow, lines: Vec<OrderLineRow>) -> Result<OrderView, DomainError> {
    Ok(OrderView {
        id: order.id,
        user_id: order.user_id,
        details: OrderDraft {
            first_name: order.first_name,
            last_name: order.last_name,
            email: order.email,
            address: order.address,
            postal_code: order.postal_code,
            city: order.city,
            phone: order.phone,
        },
        status: order.status.parse::<OrderStatus>()?,
        paid: order.paid,
        created_at: order.created_at,
        updated_at: order.updated_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                ingredient_id: l.ingredient_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    })
}

impl OrderRepository for DieselOrderRepository {
    fn place(
        &self,
        session: SessionKey,
        user_id: Option<Uuid>,
        draft: OrderDraft,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Lock the session row and read the cart under that lock
            let session_row = cart_sessions::table
                .filter(cart_sessions::session_key.eq(session.0))
                .filter(cart_sessions::expires_at.gt(Utc::now()))
                .select(CartSessionRow::as_select())
                .for_update()
                .load(conn)?
                .into_iter()
                .next();
            let cart: Cart = match session_row {
                Some(row) => serde_json::from_value(row.cart)?,
                None => Cart::new(),
            };
            let lines = OrderLineInput::from_cart(&cart)?;

            // 2. Insert the order
            let order_id = Uuid::new_v4();
            let order = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id,
                    first_name: draft.first_name,
                    last_name: draft.last_name,
                    email: draft.email,
                    address: draft.address,
                    postal_code: draft.postal_code,
                    city: draft.city,
                    phone: draft.phone,
                    status: OrderStatus::Pending.as_str().to_string(),
                    paid: false,
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 3. Insert order lines with the cart's snapshot prices
            let new_lines: Vec<NewOrderLineRow> = lines
                .into_iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id,
                    ingredient_id: l.ingredient_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect();
            let line_rows = diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .returning(OrderLineRow::as_returning())
                .get_results(conn)?;

            // 4. Empty the cart in the same transaction
            diesel::delete(
                cart_sessions::table.filter(cart_sessions::session_key.eq(session.0)),
            )
            .execute(conn)?;

            to_view(order, line_rows)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderLineRow::belonging_to(&order)
            .select(OrderLineRow::as_select())
            .order(order_lines::ingredient_id.asc())
            .load(&mut conn)?;

        to_view(order, lines).map(Some)
    }

    fn list_for_user(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page_offset(page, limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table
                .filter(orders::user_id.eq(user_id))
                .count()
                .get_result(conn)?;

            let rows = orders::table
                .filter(orders::user_id.eq(user_id))
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let lines = OrderLineRow::belonging_to(&rows)
                .select(OrderLineRow::as_select())
                .order(order_lines::ingredient_id.asc())
                .load(conn)?
                .grouped_by(&rows);

            let items = rows
                .into_iter()
                .zip(lines)
                .map(|(order, lines)| to_view(order, lines))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListResult { items, total })
        })
    }
}
