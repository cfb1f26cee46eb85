//! End-to-end HTTP surface tests: envelope contract, guest cookie
//! lifecycle, and the register/login/preferences flows over the
//! in-memory store.

mod support;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use backend::inbound::http::articles::get_articles;
use backend::inbound::http::categories::{
    add_custom_category, get_categories, update_category_preferences,
};
use backend::inbound::http::history::{get_article_history, save_article_history};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::test_utils::test_session_middleware;
use backend::inbound::http::users::{get_user_preferences, login, logout, register};
use backend::test_support::InMemoryStore;
use rstest::rstest;
use serde_json::{Value, json};
use support::{article, at, http_state};

fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed_category(1, "General", "general", true);
    store.seed_category(2, "Technology", "technology", true);
    store.seed_article(article(1, 80, at(8, 0), &[(1, "General")]));
    store.seed_article(article(2, 50, at(9, 0), &[(2, "Technology")]));
    store
}

fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .service(get_articles)
            .service(get_categories)
            .service(update_category_preferences)
            .service(add_custom_category)
            .service(save_article_history)
            .service(get_article_history)
            .service(register)
            .service(login)
            .service(logout)
            .service(get_user_preferences),
    )
}

fn find_cookie(res: &ServiceResponse, name: &str) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

#[rstest]
#[actix_web::test]
async fn first_contact_mints_a_guest_and_serves_the_feed() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/articles").to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let guest_cookie = find_cookie(&res, "guest_id").expect("guest cookie issued");

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(body.get("total_count").and_then(Value::as_i64), Some(2));
    assert_eq!(body.get("has_more").and_then(Value::as_bool), Some(false));
    let articles = body.get("articles").and_then(Value::as_array).expect("articles");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].get("id").and_then(Value::as_i64), Some(1));

    // A repeat visit with the cookie keeps the identity and does not
    // issue a replacement.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/articles")
            .cookie(guest_cookie)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    assert!(find_cookie(&res, "guest_id").is_none());
}

#[rstest]
#[actix_web::test]
async fn failure_envelope_carries_success_false_and_a_code() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/categories/custom")
            .set_json(json!({ "name": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert!(body.get("error").and_then(Value::as_str).is_some());
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("empty_name")
    );
}

#[rstest]
#[actix_web::test]
async fn register_upgrades_the_guest_and_establishes_a_session() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/articles").to_request(),
    )
    .await;
    let guest_cookie = find_cookie(&res, "guest_id").expect("guest cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .cookie(guest_cookie.clone())
            .set_json(json!({
                "username": "ada",
                "password": "correct horse",
                "email": "ada@example.com",
            }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let session_cookie = find_cookie(&res, "session").expect("session cookie");
    let cleared = find_cookie(&res, "guest_id").expect("guest cookie cleared");
    assert!(cleared.value().is_empty());

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("guest account upgraded")
    );

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me/preferences")
            .cookie(session_cookie)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let body: Value = test::read_body_json(res).await;
    let user = body.get("user").expect("user block");
    assert_eq!(user.get("is_guest").and_then(Value::as_bool), Some(false));
    assert_eq!(user.get("username").and_then(Value::as_str), Some("ada"));
    assert!(body.get("categories").and_then(Value::as_array).is_some());
}

#[rstest]
#[actix_web::test]
async fn login_rejects_bad_credentials_generically() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "nobody", "password": "whatever" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

#[rstest]
#[actix_web::test]
async fn logout_mints_a_fresh_guest_identity() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/v1/logout").to_request(),
    )
    .await;
    assert!(res.status().is_success());
    let guest_cookie = find_cookie(&res, "guest_id").expect("fresh guest cookie");
    assert!(!guest_cookie.value().is_empty());
}

#[rstest]
#[actix_web::test]
async fn preference_update_is_visible_in_the_category_listing() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/articles").to_request(),
    )
    .await;
    let guest_cookie = find_cookie(&res, "guest_id").expect("guest cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/categories/preferences")
            .cookie(guest_cookie.clone())
            .set_json(json!({ "category_id": 2, "is_visible": 0 }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/categories")
            .cookie(guest_cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    let categories = body
        .get("categories")
        .and_then(Value::as_array)
        .expect("categories");
    let technology = categories
        .iter()
        .find(|category| category.get("id").and_then(Value::as_i64) == Some(2))
        .expect("technology row");
    assert_eq!(
        technology.get("is_visible").and_then(Value::as_i64),
        Some(0)
    );
    // Bootstrap assigned order 2; the visibility update left it alone.
    assert_eq!(
        technology.get("display_order").and_then(Value::as_i64),
        Some(2)
    );
}

#[rstest]
#[actix_web::test]
async fn history_round_trips_through_the_api() {
    let store = seeded_store();
    let app = test::init_service(test_app(http_state(&store))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/articles").to_request(),
    )
    .await;
    let guest_cookie = find_cookie(&res, "guest_id").expect("guest cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/history")
            .cookie(guest_cookie.clone())
            .set_json(json!({ "article_id": 1 }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/history")
            .cookie(guest_cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(true));
    let history = body.get("history").and_then(Value::as_array).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].get("id").and_then(Value::as_i64), Some(1));
    assert_eq!(
        history[0].get("title").and_then(Value::as_str),
        Some("Article 1")
    );
}
