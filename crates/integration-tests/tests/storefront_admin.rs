//! Merch admin API tests.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use veilbound_integration_tests::TestContext;

async fn admin() -> TestContext {
    TestContext::with_env(&[("STOREFRONT_ADMIN_ENABLED", "true")]).await
}

fn hoodie() -> Value {
    json!({
        "name": "Veil Hoodie",
        "description": "Heavyweight fleece.",
        "price": "64.00",
        "image_url": "",
        "colors": "Black, Ash",
        "sizes": "M, L, XL"
    })
}

#[tokio::test]
async fn test_admin_disabled_by_default() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.get("/admin/api/merch").await.status(), 404);
}

#[tokio::test]
async fn test_list_seeded_merch() {
    let ctx = admin().await;

    let products: Vec<Value> = ctx.get("/admin/api/merch").await.json().await.unwrap();
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_create_update_delete() {
    let ctx = admin().await;

    let response = ctx.post_json("/admin/api/merch", &hoodie()).await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["sizes"], json!(["M", "L", "XL"]));

    // Newest first.
    let products: Vec<Value> = ctx.get("/admin/api/merch").await.json().await.unwrap();
    assert_eq!(products[0]["id"], id.as_str());

    // New products show on the shop page right away.
    assert!(ctx.get("/shop").await.text().await.unwrap().contains("Veil Hoodie"));

    let mut changed = hoodie();
    changed["name"] = json!("Veil Zip Hoodie");
    let response = ctx
        .client
        .put(ctx.url(&format!("/admin/api/merch/{id}")))
        .json(&changed)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "Veil Zip Hoodie");

    let response = ctx
        .client
        .delete(ctx.url(&format!("/admin/api/merch/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = ctx
        .client
        .delete(ctx.url(&format!("/admin/api/merch/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_rejects_invalid_price() {
    let ctx = admin().await;

    let mut body = hoodie();
    body["price"] = json!("-5");
    let response = ctx.post_json("/admin/api/merch", &body).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_toggle_hides_from_shop() {
    let ctx = admin().await;

    let created: Value = ctx
        .post_json("/admin/api/merch", &hoodie())
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let toggled: Value = ctx
        .post_form(&format!("/admin/api/merch/{id}/toggle"), &[])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["is_active"], false);
    assert!(!ctx.get("/shop").await.text().await.unwrap().contains("Veil Hoodie"));

    // Hidden products cannot be added to a cart.
    let response = ctx.post_form("/cart/add", &[("product_id", id)]).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_bad_id_is_rejected() {
    let ctx = admin().await;

    let response = ctx.post_form("/admin/api/merch/not-a-uuid/toggle", &[]).await;
    assert_eq!(response.status(), 400);
}
