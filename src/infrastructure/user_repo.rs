use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{ProfileChanges, Registration, User};
use crate::schema::users;

use super::models::{NewUserRow, ProfileChangeset, UserRow};
use super::unique_violation;

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            username: row.username,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "users_email_key" => "Email is already registered",
        "users_username_key" => "Username is already taken",
        _ => "User already exists",
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, registration: Registration) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                email: registration.email,
                username: registration.username,
                phone: registration.phone,
                address: registration.address,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match unique_violation(&e) {
                Some(constraint) => {
                    DomainError::Conflict(conflict_message(&constraint).to_string())
                }
                None => e.into(),
            })?;

        Ok(row.into())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(User::from))
    }

    fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(users::table.find(id))
            .set(&ProfileChangeset {
                phone: changes.phone,
                address: changes.address,
                updated_at: Some(Utc::now()),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        row.map(User::from)
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    }
}
