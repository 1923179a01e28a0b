mod common;

use axum_test::TestServer;
use serde_json::json;
use sqlx::SqlitePool;
use tinyurl_service::domain::entities::UrlRecord;
use tinyurl_service::infrastructure::cache::{CacheLookup, CacheService};
use tinyurl_service::routes::{HttpSettings, app_router};
use tinyurl_service::state::AppState;
use tinyurl_service::utils::fingerprint::fingerprint;

fn test_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state, &HttpSettings::default())).unwrap()
}

#[sqlx::test]
async fn test_redirect_success(pool: SqlitePool) {
    let id = common::create_test_url(&pool, "https://example.com/target").await;
    let server = test_server(common::create_test_state(pool));

    let response = server.get(&format!("/{id}")).await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(
        response.header("x-redirect-sum"),
        fingerprint("https://example.com/target").as_str()
    );
    assert!(response.headers().get("x-cache-hit").is_none());
}

#[sqlx::test]
async fn test_shorten_then_redirect(pool: SqlitePool) {
    let server = test_server(common::create_test_state(pool));

    let created = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/round/trip?q=1" }))
        .await;
    assert_eq!(created.status_code(), 201);
    let id = created.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let response = server.get(&format!("/{id}")).await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(
        response.header("location"),
        "https://example.com/round/trip?q=1"
    );
}

#[sqlx::test]
async fn test_redirect_cache_miss_then_hit(pool: SqlitePool) {
    let id = common::create_test_url(&pool, "https://example.com/cached").await;
    let cache = common::memory_cache();
    let server = test_server(common::create_test_state_with_cache(pool, cache.clone()));

    let first = server.get(&format!("/{id}")).await;
    assert_eq!(first.status_code(), 302);
    assert_eq!(first.header("x-cache-hit"), "false");

    let second = server.get(&format!("/{id}")).await;
    assert_eq!(second.status_code(), 302);
    assert_eq!(second.header("x-cache-hit"), "true");
    assert_eq!(second.header("location"), "https://example.com/cached");
    assert_eq!(
        second.header("x-redirect-sum"),
        fingerprint("https://example.com/cached").as_str()
    );
}

#[sqlx::test]
async fn test_redirect_served_from_cache_after_store_loses_row(pool: SqlitePool) {
    let id = common::create_test_url(&pool, "https://example.com/cached").await;
    let cache = common::memory_cache();
    let server = test_server(common::create_test_state_with_cache(
        pool.clone(),
        cache.clone(),
    ));

    server.get(&format!("/{id}")).await;

    sqlx::query("DELETE FROM urls WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let response = server.get(&format!("/{id}")).await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("x-cache-hit"), "true");
}

#[sqlx::test]
async fn test_redirect_degenerate_cache_entry_falls_back_to_store(pool: SqlitePool) {
    let id = common::create_test_url(&pool, "https://example.com/stored").await;
    let cache = common::memory_cache();
    cache
        .put(&UrlRecord::new(id, String::new(), "stale".to_string()))
        .await
        .unwrap();
    let server = test_server(common::create_test_state_with_cache(pool, cache.clone()));

    let response = server.get(&format!("/{id}")).await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/stored");
    assert_eq!(response.header("x-cache-hit"), "false");

    let repaired = server.get(&format!("/{id}")).await;
    assert_eq!(repaired.header("x-cache-hit"), "true");
    assert_eq!(repaired.header("location"), "https://example.com/stored");
}

#[sqlx::test]
async fn test_redirect_not_found(pool: SqlitePool) {
    let cache = common::memory_cache();
    let server = test_server(common::create_test_state_with_cache(pool, cache.clone()));

    let response = server.get("/9999").await;

    assert_eq!(response.status_code(), 404);
    assert!(matches!(cache.get(9999).await, CacheLookup::Miss));
}

#[sqlx::test]
async fn test_redirect_non_numeric_id(pool: SqlitePool) {
    let server = test_server(common::create_test_state(pool));

    let response = server.get("/abc").await;

    assert_eq!(response.status_code(), 404);
}

#[sqlx::test]
async fn test_root_without_id(pool: SqlitePool) {
    let server = test_server(common::create_test_state(pool));

    let response = server.get("/").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "not found");
}
