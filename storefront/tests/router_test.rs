//! Router tests driving the full axum stack with an in-memory feed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use storefront::{create_router, App, AppState, Catalog, StorefrontConfig};
use storefront_fx::{FxEngine, StaticFeedSource};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gesmes:Envelope xmlns:gesmes="http://www.gesmes.org/xml/2002-08-01" xmlns="http://www.ecb.int/vocabulary/2002-08-01/eurofxref">
    <gesmes:subject>Reference rates</gesmes:subject>
    <Cube>
        <Cube time="2024-05-17">
            <Cube currency="USD" rate="1.1"/>
            <Cube currency="JPY" rate="130.0"/>
            <Cube currency="CHF" rate="0.98"/>
        </Cube>
    </Cube>
</gesmes:Envelope>"#;

const CATALOG: &str = r#"{
    "products": [
        {
            "id": "OLJCESPC7Z",
            "name": "Vintage Typewriter",
            "description": "This typewriter looks good in your living room.",
            "picture": "/static/img/products/typewriter.jpg",
            "priceUsd": {"currencyCode": "USD", "units": 10, "nanos": 0},
            "categories": ["vintage"]
        },
        {
            "id": "66VCHSJNUP",
            "name": "Candle Holder",
            "description": "Ideal for a candlelit dinner.",
            "picture": "/static/img/products/candle-holder.jpg",
            "priceUsd": {"currencyCode": "USD", "units": 18, "nanos": 990000000},
            "categories": ["home"]
        }
    ]
}"#;

async fn app() -> App {
    let config = StorefrontConfig::default();
    let source = Arc::new(StaticFeedSource::new("test-feed", FEED));
    let fx = FxEngine::load(source, config.fx_config()).await.unwrap();
    let catalog = Catalog::from_json(CATALOG).unwrap();
    create_router(AppState::new(fx, catalog, config))
}

async fn get(app: App, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: App, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_rates_lists_allowed_currencies() {
    let (status, _, body) = get(app().await, "/rates").await;
    assert_eq!(status, StatusCode::OK);

    let rates: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rates["EUR"], 1.0);
    assert_eq!(rates["USD"], 1.1);
    assert_eq!(rates["JPY"], 130.0);
    assert!(rates.get("CHF").is_none());
}

#[tokio::test]
async fn test_convert_price() {
    let (status, _, body) = get(app().await, "/convert/JPY/10").await;
    assert_eq!(status, StatusCode::OK);

    let money: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(money["currencyCode"], "JPY");
    assert_eq!(money["units"], 1181);
    assert_eq!(money["nanos"], 0);
    assert_eq!(money["priced"], true);
}

#[tokio::test]
async fn test_convert_without_rate_is_unpriced() {
    // GBP is allowed but missing from the feed.
    let (status, _, body) = get(app().await, "/convert/GBP/10").await;
    assert_eq!(status, StatusCode::OK);

    let money: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(money["currencyCode"], "GBP");
    assert_eq!(money["units"], 0);
    assert_eq!(money["priced"], false);
}

#[tokio::test]
async fn test_convert_rejects_bad_input() {
    for uri in ["/convert/JPY/0", "/convert/JPY/abc", "/convert/CHF/10"] {
        let (status, headers, body) = get(app().await, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);

        let error: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"], "BAD_REQUEST");
        assert_eq!(
            error["cid"].as_str().unwrap(),
            headers["x-request-id"].to_str().unwrap()
        );
    }
}

#[tokio::test]
async fn test_set_currency_sets_cookie_and_redirects() {
    let request = Request::post("/setCurrency")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::REFERER, "/product/OLJCESPC7Z")
        .body(Body::from("currency_code=jpy"))
        .unwrap();
    let (status, headers, _) = send(app().await, request).await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "/product/OLJCESPC7Z");
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("shop_currency=JPY"));
    assert!(cookie.contains("Max-Age=172800"));
}

#[tokio::test]
async fn test_set_currency_ignores_unsupported_code() {
    let request = Request::post("/setCurrency")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("currency_code=CHF"))
        .unwrap();
    let (status, headers, _) = send(app().await, request).await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "/");
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_home_prices_in_cookie_currency() {
    let request = Request::get("/")
        .header(header::COOKIE, "shop_currency=JPY; shop_cart_size=3")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app().await, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Vintage Typewriter"));
    assert!(body.contains("JPY 1181.00"));
    assert!(body.contains("Cart (3)"));
}

#[tokio::test]
async fn test_home_falls_back_to_default_currency() {
    let request = Request::get("/")
        .header(header::COOKIE, "shop_currency=CHF")
        .body(Body::empty())
        .unwrap();
    let (_, _, body) = send(app().await, request).await;

    assert!(body.contains("USD 10.00"));
    assert!(body.contains("USD 18.99"));
}

#[tokio::test]
async fn test_product_page_and_json() {
    let (status, _, body) = get(app().await, "/product/66VCHSJNUP").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Candle Holder"));

    let (status, _, body) = get(app().await, "/product/66VCHSJNUP?json=1").await;
    assert_eq!(status, StatusCode::OK);
    let product: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(product["id"], "66VCHSJNUP");
    assert_eq!(product["priceUsd"]["units"], 18);
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let (status, _, body) = get(app().await, "/product/66VCHSJNUP/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Candle Holder"));

    let (status, _, _) = get(app().await, "/_healthz/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let (status, _, body) = get(app().await, "/product/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404 Not Found"));

    let (status, _, body) = get(app().await, "/product/NOPE?json=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_search() {
    let (status, _, body) = get(app().await, "/search?q=candle&json=1").await;
    assert_eq!(status, StatusCode::OK);
    let products: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["id"], "66VCHSJNUP");
}

#[tokio::test]
async fn test_logout_expires_cookies() {
    let request = Request::get("/logout")
        .header(header::COOKIE, "shop_currency=JPY; shop_cart_size=3")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app().await, request).await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "/");
    assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = app().await;

    let (status, _, body) = get(app.clone(), "/_healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (_, _, _) = get(app.clone(), "/convert/JPY/10").await;
    let (_, _, _) = get(app.clone(), "/convert/JPY/0").await;

    let (status, _, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let metrics: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics["conversions_priced"], 1);
    assert_eq!(metrics["conversions_rejected"], 1);
}
