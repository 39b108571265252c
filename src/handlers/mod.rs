pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod session;
pub mod users;

use actix_web::web;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::user::User;
use crate::errors::AppError;
use crate::state::AppState;
use session::Identity;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl PageParams {
    pub fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

/// Money rendered as a decimal string with two fractional digits.
pub(crate) fn money(value: &BigDecimal) -> String {
    value.round(2).with_scale(2).to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Resolves the `X-User-ID` identity to a registered user, or 401.
pub(crate) async fn current_user(
    state: &web::Data<AppState>,
    identity: &Identity,
) -> Result<User, AppError> {
    let users = state.users.clone();
    let claimed: Option<Uuid> = identity.0;
    let user = web::block(move || users.authenticate(claimed))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(user)
}

/// Registers every `/api` route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/products")
                    .route("/categories", web::get().to(products::list_categories))
                    .route("/ingredients", web::get().to(products::list_ingredients))
                    .route(
                        "/ingredients/featured",
                        web::get().to(products::featured_ingredients),
                    )
                    .route("/ingredients/{id}", web::get().to(products::get_ingredient)),
            )
            .service(
                web::scope("/cart")
                    .route("", web::get().to(cart::get_cart))
                    .route("", web::delete().to(cart::clear_cart))
                    .route("/items/{ingredient_id}", web::post().to(cart::add_item))
                    .route("/items/{ingredient_id}", web::delete().to(cart::remove_item)),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(orders::create_order))
                    .route("", web::get().to(orders::list_orders))
                    .route("/{id}", web::get().to(orders::get_order)),
            )
            .service(
                web::scope("/reviews")
                    .route("", web::post().to(reviews::create_review))
                    .route("/my", web::get().to(reviews::my_reviews))
                    .route("/stats", web::get().to(reviews::review_stats))
                    .route(
                        "/ingredient/{ingredient_id}",
                        web::get().to(reviews::ingredient_reviews),
                    )
                    .route("/{id}", web::get().to(reviews::get_review))
                    .route("/{id}", web::put().to(reviews::update_review))
                    .route("/{id}", web::delete().to(reviews::delete_review))
                    .route("/{id}/report", web::post().to(reviews::report_review)),
            )
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(users::register))
                    .route("/me", web::get().to(users::me))
                    .route("/me", web::patch().to(users::update_me)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_are_clamped() {
        let params = PageParams { page: 0, limit: 500 };
        assert_eq!(params.clamped(), (1, 100));

        let params = PageParams { page: 3, limit: 0 };
        assert_eq!(params.clamped(), (3, 1));
    }

    #[test]
    fn money_always_has_two_decimals() {
        use std::str::FromStr;

        assert_eq!(money(&BigDecimal::from(20)), "20.00");
        assert_eq!(money(&BigDecimal::from_str("3.5").unwrap()), "3.50");
        assert_eq!(money(&BigDecimal::from_str("12.3456").unwrap()), "12.35");
    }
}
