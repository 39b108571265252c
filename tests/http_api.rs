//! HTTP tests against the full router, backed by the in-memory store.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};
use uuid::Uuid;

use ingredient_shop::domain::catalog::CatalogItem;
use ingredient_shop::infrastructure::memory::MemoryStore;
use ingredient_shop::{configure, AppState};

struct Fixture {
    store: Arc<MemoryStore>,
    oats: CatalogItem,
    honey: CatalogItem,
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal")
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let grains = store.add_category("Grains").unwrap();
    let oats = store.add_item(&grains, "Rolled Oats", dec("10.00")).unwrap();
    let honey = store.add_item(&grains, "Wild Honey", dec("5.00")).unwrap();
    Fixture { store, oats, honey }
}

/// Sends `req`, returning the status, the JSON body (`Null` when empty) and
/// any session cookie the response set.
async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value, Option<Cookie<'static>>)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "cart_session")
        .map(|c| c.into_owned());
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body, cookie)
}

fn order_details() -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "address": "12 St James's Square",
        "postal_code": "SW1Y 4JH",
        "city": "London"
    })
}

macro_rules! app {
    ($store:expr) => {
        test::init_service(App::new().configure(configure(AppState::in_memory($store.clone()))))
            .await
    };
}

#[actix_web::test]
async fn first_cart_request_sets_session_cookie() {
    let fx = fixture();
    let app = app!(fx.store);

    let (status, body, cookie) = send(&app, test::TestRequest::get().uri("/api/cart").to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(cookie.is_some());
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total_quantity"], 0);
    assert_eq!(body["total_price"], "0.00");
}

#[actix_web::test]
async fn cart_keeps_first_price_and_supports_override() {
    let fx = fixture();
    let app = app!(fx.store);
    let item_uri = format!("/api/cart/items/{}", fx.oats.id);

    let (status, body, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&item_uri)
            .set_json(json!({ "quantity": 2 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_price"], "20.00");
    let cookie = cookie.expect("session cookie");

    // A later price change does not touch the existing line.
    fx.store.set_price(fx.oats.id, dec("12.00")).unwrap();
    let (_, body, again) = send(
        &app,
        test::TestRequest::post()
            .uri(&item_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "quantity": 1 }))
            .to_request(),
    )
    .await;
    assert!(again.is_none());
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["items"][0]["unit_price"], "10.00");
    assert_eq!(body["total_price"], "30.00");

    let (_, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&item_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "quantity": 1, "override": true }))
            .to_request(),
    )
    .await;
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["total_quantity"], 1);

    let (status, body, _) = send(
        &app,
        test::TestRequest::delete()
            .uri(&item_uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}

#[actix_web::test]
async fn add_without_body_adds_one() {
    let fx = fixture();
    let app = app!(fx.store);

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.honey.id))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["items"][0]["ingredient"]["name"], "Wild Honey");
}

#[actix_web::test]
async fn bad_cart_additions_are_rejected() {
    let fx = fixture();
    let app = app!(fx.store);

    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.oats.id))
            .set_json(json!({ "quantity": 0 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Ingredient not found");

    fx.store.set_available(fx.honey.id, false).unwrap();
    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.honey.id))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn line_for_deleted_ingredient_keeps_snapshot_price() {
    let fx = fixture();
    let app = app!(fx.store);

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.honey.id))
            .set_json(json!({ "quantity": 2 }))
            .to_request(),
    )
    .await;
    fx.store.delete_item(fx.honey.id).unwrap();

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/cart")
            .cookie(cookie.expect("session cookie"))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["catalog_missing"], true);
    assert_eq!(body["items"][0]["ingredient"], Value::Null);
    assert_eq!(body["total_price"], "10.00");
}

#[actix_web::test]
async fn clear_cart_reports_success() {
    let fx = fixture();
    let app = app!(fx.store);

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.oats.id))
            .to_request(),
    )
    .await;
    let cookie = cookie.expect("session cookie");

    let (status, body, _) = send(
        &app,
        test::TestRequest::delete()
            .uri("/api/cart")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, body, _) = send(
        &app,
        test::TestRequest::get().uri("/api/cart").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(body["total_quantity"], 0);
}

#[actix_web::test]
async fn order_from_empty_cart_is_rejected() {
    let fx = fixture();
    let app = app!(fx.store);

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .set_json(order_details())
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
    assert_eq!(fx.store.order_count().unwrap(), 0);
}

#[actix_web::test]
async fn order_placement_copies_cart_and_empties_it() {
    let fx = fixture();
    let app = app!(fx.store);

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.oats.id))
            .set_json(json!({ "quantity": 2 }))
            .to_request(),
    )
    .await;
    let cookie = cookie.expect("session cookie");
    send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.honey.id))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;

    // Invalid details leave the cart alone.
    let mut bad = order_details();
    bad["email"] = json!("");
    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .cookie(cookie.clone())
            .set_json(bad)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .cookie(cookie.clone())
            .set_json(order_details())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paid"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_price"], "25.00");

    let (_, cart, _) = send(
        &app,
        test::TestRequest::get().uri("/api/cart").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(cart["items"], json!([]));
}

#[actix_web::test]
async fn failed_line_write_leaves_no_order_and_keeps_cart() {
    let fx = fixture();
    let app = app!(fx.store);

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.oats.id))
            .to_request(),
    )
    .await;
    let cookie = cookie.expect("session cookie");
    send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.honey.id))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    fx.store.fail_order_line_write(1).unwrap();

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .cookie(cookie.clone())
            .set_json(order_details())
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(fx.store.order_count().unwrap(), 0);
    assert_eq!(fx.store.order_line_count().unwrap(), 0);

    let (_, cart, _) = send(
        &app,
        test::TestRequest::get().uri("/api/cart").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(cart["total_quantity"], 2);
}

/// Registers `name` and yields the new user's id.
macro_rules! register {
    ($app:expr, $name:expr) => {{
        let (status, body, _) = send(
            &$app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(json!({
                    "email": format!("{}@example.com", $name),
                    "username": $name,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
    }};
}

#[actix_web::test]
async fn orders_are_scoped_to_their_owner() {
    let fx = fixture();
    let app = app!(fx.store);
    let owner = register!(app, "owner");
    let other = register!(app, "other");

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/items/{}", fx.oats.id))
            .to_request(),
    )
    .await;
    let (status, order, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .cookie(cookie.expect("session cookie"))
            .insert_header(("X-User-ID", owner.to_string()))
            .set_json(order_details())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_uri = format!("/api/orders/{}", order["id"].as_str().unwrap());

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/orders")
            .insert_header(("X-User-ID", owner.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["items"].as_array().unwrap().len(), 1);

    let (status, _, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&order_uri)
            .insert_header(("X-User-ID", other.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, test::TestRequest::get().uri(&order_uri).to_request()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/orders")
            .insert_header(("X-User-ID", Uuid::new_v4().to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn registration_validates_and_rejects_duplicates() {
    let fx = fixture();
    let app = app!(fx.store);
    let id = register!(app, "cook");

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({ "email": "COOK@example.com", "username": "cook2" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email is already registered");

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({ "email": "not-an-email", "username": "cook3" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (status, body, _) = send(
        &app,
        test::TestRequest::patch()
            .uri("/api/users/me")
            .insert_header(("X-User-ID", id.to_string()))
            .set_json(json!({ "address": "3 Bakers Row" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "3 Bakers Row");

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("X-User-ID", id.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "cook");

    let (status, _, _) = send(&app, test::TestRequest::get().uri("/api/users/me").to_request()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn reviews_require_identity_and_are_unique_per_ingredient() {
    let fx = fixture();
    let app = app!(fx.store);
    let author = register!(app, "author");
    let review = json!({ "ingredient_id": fx.oats.id, "rating": 4, "comment": "Creamy" });

    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .set_json(review.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(review.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "author");

    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(review)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(json!({ "ingredient_id": fx.honey.id, "rating": 6 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The rating aggregate follows the review.
    let (_, item, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/products/ingredients/{}", fx.oats.id))
            .to_request(),
    )
    .await;
    assert_eq!(item["reviews_count"], 1);
    assert_eq!(item["rating"], "4.00");
}

#[actix_web::test]
async fn five_reports_hide_a_review() {
    let fx = fixture();
    let app = app!(fx.store);
    let author = register!(app, "author");
    let (_, review, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(json!({ "ingredient_id": fx.honey.id, "rating": 1 }))
            .to_request(),
    )
    .await;
    let report_uri = format!("/api/reviews/{}/report", review["id"].as_str().unwrap());

    let mut reporters = Vec::new();
    for name in ["r1", "r2", "r3", "r4", "r5"] {
        reporters.push(register!(app, name));
    }
    let mut last = Value::Null;
    for reporter in &reporters {
        let (status, body, _) = send(
            &app,
            test::TestRequest::post()
                .uri(&report_uri)
                .insert_header(("X-User-ID", reporter.to_string()))
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }
    assert_eq!(last["report_count"], 5);
    assert_eq!(last["hidden_now"], true);

    let (status, _, _) = send(
        &app,
        test::TestRequest::post()
            .uri(&report_uri)
            .insert_header(("X-User-ID", reporters[0].to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, listed, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/reviews/ingredient/{}", fx.honey.id))
            .to_request(),
    )
    .await;
    assert_eq!(listed, json!([]));

    let review_uri = format!("/api/reviews/{}", review["id"].as_str().unwrap());
    let (status, _, _) = send(&app, test::TestRequest::get().uri(&review_uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&review_uri)
            .insert_header(("X-User-ID", author.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_hidden"], true);
}

#[actix_web::test]
async fn review_stats_report_average_and_distribution() {
    let fx = fixture();
    let app = app!(fx.store);

    for (name, rating) in [("a", 5), ("b", 4), ("c", 4)] {
        let user = register!(app, name);
        send(
            &app,
            test::TestRequest::post()
                .uri("/api/reviews")
                .insert_header(("X-User-ID", user.to_string()))
                .set_json(json!({ "ingredient_id": fx.oats.id, "rating": rating }))
                .to_request(),
        )
        .await;
    }

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/reviews/stats?ingredient_id={}", fx.oats.id))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient_name"], "Rolled Oats");
    assert_eq!(body["total_reviews"], 3);
    assert_eq!(body["average_rating"], "4.3");
    assert_eq!(
        body["rating_distribution"],
        json!([{ "rating": 4, "count": 2 }, { "rating": 5, "count": 1 }])
    );
}

#[actix_web::test]
async fn only_the_author_may_edit_or_delete_a_review() {
    let fx = fixture();
    let app = app!(fx.store);
    let author = register!(app, "author");
    let stranger = register!(app, "stranger");
    let (_, review, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/reviews")
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(json!({ "ingredient_id": fx.oats.id, "rating": 2 }))
            .to_request(),
    )
    .await;
    let review_uri = format!("/api/reviews/{}", review["id"].as_str().unwrap());

    let (status, _, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&review_uri)
            .insert_header(("X-User-ID", stranger.to_string()))
            .set_json(json!({ "rating": 5 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&review_uri)
            .insert_header(("X-User-ID", author.to_string()))
            .set_json(json!({ "rating": 5 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5);

    let (status, _, _) = send(
        &app,
        test::TestRequest::delete()
            .uri(&review_uri)
            .insert_header(("X-User-ID", author.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/reviews/my")
            .insert_header(("X-User-ID", author.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(mine, json!([]));
}

#[actix_web::test]
async fn catalog_endpoints_list_available_items() {
    let fx = fixture();
    let app = app!(fx.store);
    fx.store.set_available(fx.honey.id, false).unwrap();

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/products/ingredients?page=1&limit=500")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 100);
    assert_eq!(body["items"][0]["price"], "10.00");

    let (_, categories, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/products/categories")
            .to_request(),
    )
    .await;
    assert_eq!(categories[0]["slug"], "grains");

    let (_, featured, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/products/ingredients/featured")
            .to_request(),
    )
    .await;
    assert_eq!(featured.as_array().unwrap().len(), 1);

    let (status, _, _) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/products/ingredients/{}", fx.honey.id))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_add_body_is_rejected_and_cart_untouched() {
    let fx = fixture();
    let app = app!(fx.store);
    let item_uri = format!("/api/cart/items/{}", fx.oats.id);

    let (_, _, cookie) = send(
        &app,
        test::TestRequest::post()
            .uri(&item_uri)
            .set_json(json!({ "quantity": 2 }))
            .to_request(),
    )
    .await;
    let cookie = cookie.expect("session cookie");

    for bad in [
        json!({ "quantity": "abc" }),
        json!({ "quantity": 2.5 }),
        json!({ "quantity": 5_000_000_000i64 }),
    ] {
        let (status, body, _) = send(
            &app,
            test::TestRequest::post()
                .uri(&item_uri)
                .cookie(cookie.clone())
                .set_json(bad)
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["quantity"].is_array());
    }

    let (_, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/cart")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(body["total_quantity"], 2);
    assert_eq!(body["items"][0]["quantity"], 2);
}

#[actix_web::test]
async fn huge_page_numbers_return_empty_pages() {
    let fx = fixture();
    let app = app!(fx.store);
    let user = register!(app, "pager");

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/products/ingredients?page=9223372036854775807&limit=100")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 2);

    let (status, body, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/orders?page=9223372036854775807&limit=100")
            .insert_header(("X-User-ID", user.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}
