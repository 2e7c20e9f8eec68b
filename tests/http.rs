//! Router-level tests over a lazily connected pool. Every case here is answered before
//! the first query, so no database is needed.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{authed, get, lazy_router as router, send, token};
use serde_json::json;

#[tokio::test]
async fn health_is_ok() {
    let (status, _, body) = send(router(None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn api_root_lists_absolute_collection_urls() {
    for path in ["/shop/", "/shop"] {
        let (status, _, body) = send(router(None), get(path)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wine"], "http://shop.test/shop/wine/");
        assert_eq!(body["orders"], "http://shop.test/shop/orders/");
        assert_eq!(body.as_object().unwrap().len(), 8);
    }
}

#[tokio::test]
async fn api_root_prefers_public_base_url() {
    let (_, _, body) = send(router(Some("https://wine.example/")), get("/shop/")).await;
    assert_eq!(body["products"], "https://wine.example/shop/products/");
}

#[tokio::test]
async fn orders_require_credentials() {
    let (status, headers, body) = send(router(None), get("/shop/orders/")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(header::WWW_AUTHENTICATE).unwrap().to_str().unwrap(), "Bearer");
    assert_eq!(body["error"]["code"], "not_authenticated");
    assert_eq!(body["error"]["message"], "Authentication credentials were not provided.");
}

#[tokio::test]
async fn orders_reject_bad_tokens() {
    let expired = token("5", -3600);
    for bearer in ["garbage", expired.as_str()] {
        let req = authed(Method::GET, "/shop/orders/1/", bearer, None);
        let (status, headers, body) = send(router(None), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(headers.contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(body["error"]["message"], "Invalid token.");
    }
}

#[tokio::test]
async fn token_with_non_numeric_subject_is_rejected() {
    let req = authed(Method::DELETE, "/shop/orders/1", &token("alice", 3600), None);
    let (status, _, _) = send(router(None), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthenticated_write_is_rejected_before_the_body() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/shop/orders/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, _, _) = send(router(None), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_payload_is_validated() {
    let bearer = token("5", 3600);
    let cases = [
        (Method::POST, "/shop/orders/", json!({}), "items: This field is required."),
        (
            Method::POST,
            "/shop/orders",
            json!({"items": [{"product": 1, "quantity": 0}]}),
            "items[0].quantity: Ensure this value is greater than or equal to 1.",
        ),
        (
            Method::PATCH,
            "/shop/orders/3/",
            json!({"items": "all of them"}),
            "items: Expected a list of items.",
        ),
    ];
    for (method, uri, body, message) in cases {
        let (status, _, resp) = send(router(None), authed(method, uri, &bearer, Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"]["code"], "validation_error");
        assert_eq!(resp["error"]["message"], message);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/shop/orders/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("5", 3600)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"items\": ["))
        .unwrap();
    let (status, _, body) = send(router(None), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() {
    for path in ["/shop/products/abc/", "/shop/wine/-1", "/shop/glass/0/"] {
        let (status, _, body) = send(router(None), get(path)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["error"]["message"], "Not found.");
    }
    let req = authed(Method::GET, "/shop/orders/first/", &token("5", 3600), None);
    let (status, _, _) = send(router(None), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_page_is_not_found() {
    let (status, _, body) = send(router(None), get("/shop/products/?page=abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Invalid page.");
}

#[tokio::test]
async fn catalog_is_read_only() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/shop/products/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _, _) = send(router(None), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_paths_get_json_not_found() {
    let (status, _, body) = send(router(None), get("/shop/vineyards/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}
