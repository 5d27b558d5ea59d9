mod common;

use axum::http::StatusCode;
use shorty::domain::repositories::UrlRepository;
use shorty::infrastructure::cache::ClickCache;

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app(&["AbC1234"]);
    app.shorten("https://example.com/target").await;

    let response = app.server.get("/AbC1234").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app(&[]);

    let response = app.server.get("/NOPE123").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["code"], "NOPE123");
}

#[tokio::test]
async fn test_redirect_not_found_leaves_stores_untouched() {
    let app = common::spawn_app(&[]);

    app.server.get("/NOPE123").await.assert_status_not_found();

    assert!(app.cache.get_long_url("NOPE123").await.unwrap().is_none());
    assert!(app.cache.get_clicks("NOPE123").await.unwrap().is_none());
}

#[tokio::test]
async fn test_redirect_counts_clicks_in_cache() {
    let app = common::spawn_app(&["AbC1234"]);
    app.shorten("https://example.com/a").await;

    app.visit("AbC1234", 3).await;

    assert_eq!(app.cache.get_clicks("AbC1234").await.unwrap(), Some(3));
    let durable = app.repository.find_by_code("AbC1234").await.unwrap().unwrap();
    assert_eq!(durable.clicks, 0);
}

#[tokio::test]
async fn test_redirect_flushes_every_tenth_click() {
    let app = common::spawn_app(&["AbC1234"]);
    app.shorten("https://example.com/a").await;

    app.visit("AbC1234", 9).await;
    let durable = app.repository.find_by_code("AbC1234").await.unwrap().unwrap();
    assert_eq!(durable.clicks, 0);
    assert_eq!(app.cache.get_clicks("AbC1234").await.unwrap(), Some(9));

    app.visit("AbC1234", 1).await;
    let durable = app.repository.find_by_code("AbC1234").await.unwrap().unwrap();
    assert_eq!(durable.clicks, 10);

    app.visit("AbC1234", 15).await;
    let durable = app.repository.find_by_code("AbC1234").await.unwrap().unwrap();
    assert_eq!(durable.clicks, 20);
    assert_eq!(app.cache.get_clicks("AbC1234").await.unwrap(), Some(25));
}

#[tokio::test]
async fn test_redirect_refills_evicted_url() {
    let app = common::spawn_app(&["AbC1234"]);
    app.shorten("https://example.com/a").await;

    app.cache.evict_url("AbC1234");

    let response = app.server.get("/AbC1234").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/a");

    assert_eq!(
        app.cache.get_long_url("AbC1234").await.unwrap().as_deref(),
        Some("https://example.com/a")
    );
}
