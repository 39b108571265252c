use chrono::{Duration, Utc};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::{SessionKey, SessionStore};
use crate::schema::cart_sessions;

use super::models::{CartSessionRow, UpsertCartSessionRow};

/// Carts stored as JSONB rows that expire `ttl` after their last commit.
pub struct DieselSessionStore {
    pool: DbPool,
    ttl: Duration,
}

impl DieselSessionStore {
    pub fn new(pool: DbPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    /// Deletes expired sessions, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;
        let removed = diesel::delete(
            cart_sessions::table.filter(cart_sessions::expires_at.le(Utc::now())),
        )
        .execute(&mut conn)?;
        Ok(removed)
    }
}

impl SessionStore for DieselSessionStore {
    fn load(&self, session: SessionKey) -> Result<Cart, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cart_sessions::table
            .filter(cart_sessions::session_key.eq(session.0))
            .filter(cart_sessions::expires_at.gt(Utc::now()))
            .select(CartSessionRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(serde_json::from_value(row.cart)?),
            None => Ok(Cart::new()),
        }
    }

    fn commit(&self, session: SessionKey, cart: &Cart) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let now = Utc::now();
        let row = UpsertCartSessionRow {
            session_key: session.0,
            cart: serde_json::to_value(cart)?,
            expires_at: now + self.ttl,
            updated_at: now,
        };
        diesel::insert_into(cart_sessions::table)
            .values(&row)
            .on_conflict(cart_sessions::session_key)
            .do_update()
            .set((
                cart_sessions::cart.eq(&row.cart),
                cart_sessions::expires_at.eq(row.expires_at),
                cart_sessions::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    fn clear(&self, session: SessionKey) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::delete(cart_sessions::table.filter(cart_sessions::session_key.eq(session.0)))
            .execute(&mut conn)?;
        Ok(())
    }
}
