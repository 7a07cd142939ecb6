//! Mutations fired together from one browser must all land.

#![allow(clippy::unwrap_used)]

use garden_records_integration_tests::{TestServer, browser};
use reqwest::StatusCode;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_from_one_browser_all_land() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    // The first add establishes the session cookie.
    let first = client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("id", "1"), ("price", "10")])
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let mut adds = JoinSet::new();
    for id in 2..=9 {
        let client = client.clone();
        let url = server.url("/cart/add");
        adds.spawn(async move {
            let id = id.to_string();
            client
                .post(url)
                .header("HX-Request", "true")
                .form(&[("id", id.as_str()), ("price", "10")])
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = adds.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let items = client
        .get(server.url("/cart/items"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(items.matches(r#"class="cart-item""#).count(), 9);
    assert!(items.contains(">90.00</span>"));
    assert!(items.contains(r#"aria-label="Cart: 9 items""#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let server = TestServer::spawn().await.unwrap();
    let client = browser().unwrap();

    client
        .post(server.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("id", "3"), ("price", "1.50")])
        .send()
        .await
        .unwrap();

    let mut updates = JoinSet::new();
    for _ in 0..6 {
        let client = client.clone();
        let url = server.url("/cart/update");
        updates.spawn(async move {
            client
                .post(url)
                .header("HX-Request", "true")
                .form(&[("id", "3"), ("delta", "1")])
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = updates.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let count = client
        .get(server.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(count.contains(r#"aria-label="Cart: 7 items""#));
}
