use utoipa::OpenApi;

use crate::handlers::{cart, orders, products, reviews, users, SuccessResponse};

#[derive(OpenApi)]
#[openapi(
    info(title = "Ingredient shop API"),
    paths(
        products::list_categories,
        products::list_ingredients,
        products::featured_ingredients,
        products::get_ingredient,
        cart::get_cart,
        cart::add_item,
        cart::remove_item,
        cart::clear_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        reviews::create_review,
        reviews::my_reviews,
        reviews::review_stats,
        reviews::ingredient_reviews,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        reviews::report_review,
        users::register,
        users::me,
        users::update_me,
    ),
    components(schemas(
        SuccessResponse,
        products::CategoryResponse,
        products::IngredientResponse,
        products::ListIngredientsResponse,
        cart::AddItemRequest,
        cart::CartIngredientSummary,
        cart::CartItemResponse,
        cart::CartResponse,
        orders::CreateOrderRequest,
        orders::OrderItemResponse,
        orders::OrderResponse,
        orders::ListOrdersResponse,
        reviews::CreateReviewRequest,
        reviews::UpdateReviewRequest,
        reviews::ReviewResponse,
        reviews::RatingCount,
        reviews::ReviewStatsResponse,
        reviews::ReportResponse,
        users::RegisterRequest,
        users::UpdateProfileRequest,
        users::UserResponse,
    )),
    tags(
        (name = "products", description = "Catalog browsing"),
        (name = "cart", description = "Session cart"),
        (name = "orders", description = "Checkout and order history"),
        (name = "reviews", description = "Ingredient reviews and moderation"),
        (name = "users", description = "Accounts"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/cart",
            "/api/cart/items/{ingredient_id}",
            "/api/orders",
            "/api/orders/{id}",
            "/api/reviews/{id}/report",
            "/api/users/me",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
