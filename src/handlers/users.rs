use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::current_user;
use super::session::Identity;
use crate::domain::user::{ProfileChanges, Registration, User};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            phone: u.phone,
            address: u.address,
            created: u.created_at,
            updated: u.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email or username"),
        (status = 409, description = "Email or username already taken"),
    ),
    tag = "users"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let registration = Registration {
        email: body.email,
        username: body.username,
        phone: body.phone,
        address: body.address,
    };

    let users = state.users.clone();
    let user = web::block(move || users.register(registration))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    params(("X-User-ID" = Uuid, Header, description = "Caller's user id")),
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Missing or unknown X-User-ID"),
    ),
    tag = "users"
)]
pub async fn me(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    params(("X-User-ID" = Uuid, Header, description = "Caller's user id")),
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid phone"),
        (status = 401, description = "Missing or unknown X-User-ID"),
    ),
    tag = "users"
)]
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&state, &identity).await?;
    let body = body.into_inner();
    let changes = ProfileChanges {
        phone: body.phone,
        address: body.address,
    };

    let users = state.users.clone();
    let updated = web::block(move || users.update_profile(user.id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
