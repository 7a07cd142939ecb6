//! End-to-end cart flows against a running storefront.

#![allow(clippy::unwrap_used)]

use garden_records_integration_tests::{TestServer, browser};
use reqwest::{Client, StatusCode};

async fn add(server: &TestServer, client: &Client, fields: &[(&str, &str)]) -> reqwest::Response {
    client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .form(fields)
        .send()
        .await
        .unwrap()
}

async fn post_htmx(
    server: &TestServer,
    client: &Client,
    path: &str,
    fields: &[(&str, &str)],
) -> reqwest::Response {
    client
        .post(server.url(path))
        .header("HX-Request", "true")
        .form(fields)
        .send()
        .await
        .unwrap()
}

async fn get_text(server: &TestServer, client: &Client, path: &str) -> String {
    client
        .get(server.url(path))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

const ABBEY_ROAD: &[(&str, &str)] = &[
    ("id", "1"),
    ("name", "Abbey Road"),
    ("price", "139.99"),
    ("type", "Vinyl"),
];

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    let resp = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_lines() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    let first = add(&server, &client, ABBEY_ROAD).await;
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = first.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("gr_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let second = add(&server, &client, &[("id", "1"), ("price", "139.99")]).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(!second.headers().contains_key("hx-trigger"));
    let trigger = second.headers()["hx-trigger-after-swap"]
        .to_str()
        .unwrap()
        .to_string();
    let trigger: serde_json::Value = serde_json::from_str(&trigger).unwrap();
    assert_eq!(trigger["cart-pulse"]["durationMs"], 650);
    assert!(trigger.get("cart-updated").is_some());

    let badges = second.text().await.unwrap();
    assert!(badges.contains(r#"aria-label="Cart: 2 items""#));
    assert!(!badges.contains("pulse"));

    let items = get_text(&server, &client, "/cart/items").await;
    assert_eq!(items.matches(r#"class="cart-item""#).count(), 1);
    assert!(items.contains("Abbey Road"));
    assert!(items.contains("279.98 RON"));
    assert!(items.contains(">279.98</span>"));
}

#[tokio::test]
async fn test_decrementing_last_unit_empties_cart() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    add(&server, &client, &[("id", "2"), ("price", "49.99")]).await;

    let resp = post_htmx(&server, &client, "/cart/update", &[("id", "2"), ("delta", "-1")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");

    let body = resp.text().await.unwrap();
    assert!(body.contains("Your cart is empty"));
    assert!(body.contains(">0.00</span>"));
    assert!(body.contains(r#"class="mobile-cart-badge hidden""#));

    let count = get_text(&server, &client, "/cart/count").await;
    assert!(count.contains(r#"aria-label="Cart: 0 items""#));
}

#[tokio::test]
async fn test_invalid_add_is_a_silent_no_op() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    for fields in [
        &[("id", "0"), ("price", "10")][..],
        &[("id", "abc"), ("price", "10")][..],
        &[("id", "3"), ("price", "free")][..],
    ] {
        let resp = add(&server, &client, fields).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let items = get_text(&server, &client, "/cart/items").await;
    assert!(items.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    add(&server, &client, ABBEY_ROAD).await;
    add(&server, &client, &[("id", "2"), ("price", "49.99"), ("quantity", "3")]).await;

    let body = post_htmx(&server, &client, "/cart/remove", &[("id", "1")])
        .await
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Abbey Road"));
    assert!(body.contains(">149.97</span>"));

    // Unknown ids leave the cart alone.
    let body = post_htmx(&server, &client, "/cart/remove", &[("id", "99")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains(">149.97</span>"));

    let body = post_htmx(&server, &client, "/cart/clear", &[])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_non_htmx_add_redirects_to_cart_page() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    let resp = client
        .post(server.url("/cart/add"))
        .form(ABBEY_ROAD)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");

    let page = get_text(&server, &client, "/cart").await;
    assert!(page.contains("Abbey Road"));
    assert!(page.contains("139.99 RON"));
}

#[tokio::test]
async fn test_checkout_requires_items() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    let resp = client.get(server.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");

    add(&server, &client, ABBEY_ROAD).await;
    let resp = client.get(server.url("/checkout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("139.99 RON"));
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let server = TestServer::spawn().await.unwrap();
    let alice = browser().unwrap();
    let bob = browser().unwrap();

    add(&server, &alice, ABBEY_ROAD).await;

    let bobs_items = get_text(&server, &bob, "/cart/items").await;
    assert!(bobs_items.contains("Your cart is empty"));

    let alices_items = get_text(&server, &alice, "/cart/items").await;
    assert!(alices_items.contains("Abbey Road"));
}

#[tokio::test]
async fn test_catalog_pages_carry_add_to_cart_triggers() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    let home = get_text(&server, &client, "/").await;
    assert_eq!(home.matches(r#"class="product-card""#).count(), 6);

    let listing = get_text(&server, &client, "/catalog?category=Vinyl&sort=price_asc").await;
    assert!(listing.contains(r#"class="add-to-cart""#));
    assert!(listing.contains(r#"data-id="1""#));
    assert!(listing.contains(r#"data-price="139.99""#));
    assert!(!listing.contains(r#"data-type="CD""#));

    let detail = client.get(server.url("/products/1")).send().await.unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(detail.text().await.unwrap().contains("Abbey Road"));

    let missing = client.get(server.url("/products/9999")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_moves_one_unit_per_request() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    add(&server, &client, &[("id", "2"), ("price", "49.99")]).await;

    let body = post_htmx(&server, &client, "/cart/update", &[("id", "2"), ("delta", "5")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"<span class="qty">2</span>"#));
    assert!(body.contains(">99.98</span>"));
}
