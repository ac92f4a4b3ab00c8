//! Simulated checkout flow tests.

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use veilbound_integration_tests::{TestContext, valid_checkout_form};

#[tokio::test]
async fn test_checkout_requires_items() {
    let ctx = TestContext::new().await;

    let response = ctx.post_form("/checkout/start", &[]).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_submit_outside_form_is_conflict() {
    let ctx = TestContext::new().await;
    ctx.add("veilbound-preorder").await;

    let response = ctx.post_form("/checkout", &valid_checkout_form()).await;
    assert_eq!(response.status(), 409);
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_invalid_form_is_rerendered() {
    let ctx = TestContext::new().await;
    ctx.add("veilbound-preorder").await;
    ctx.post_form("/checkout/start", &[]).await;

    let mut form = valid_checkout_form();
    form.retain(|(key, _)| *key != "email");
    form.push(("email", "not-an-email"));

    let response = ctx.post_form("/checkout", &form).await;
    assert_eq!(response.status(), 422);
    let body = response.text().await.unwrap();
    assert!(body.contains("form-error"));
    assert!(body.contains("checkout-form"));

    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_back_returns_to_cart() {
    let ctx = TestContext::new().await;
    ctx.add("giftcard-50").await;

    let body = ctx
        .post_form("/checkout/start", &[])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("checkout-form"));

    let response = ctx.post_form("/checkout/back", &[]).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("cart-items"));
    assert!(!body.contains("checkout-form"));

    // Back twice is not a valid transition.
    let response = ctx.post_form("/checkout/back", &[]).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_successful_checkout_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.add("veilbound-preorder").await;
    ctx.add("giftcard-25").await;
    ctx.post_form("/checkout/start", &[]).await;

    let response = ctx.post_form("/checkout", &valid_checkout_form()).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["hx-trigger"], "cart-updated");
    let body = response.text().await.unwrap();
    assert!(body.contains("Order confirmed"));
    assert!(body.contains("VB-2024-"));

    assert_eq!(ctx.cart_count().await, 0);

    // The confirmation survives a reload until dismissed.
    assert!(ctx.cart_page().await.contains("Order confirmed"));

    let response = ctx.post_form("/checkout/dismiss", &[]).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Your cart is empty."));
    assert!(!body.contains("cart-panel open"));
}

#[tokio::test]
async fn test_order_numbers_are_distinct() {
    let ctx = TestContext::new().await;

    let mut numbers = Vec::new();
    for _ in 0..2 {
        ctx.add("giftcard-25").await;
        ctx.post_form("/checkout/start", &[]).await;
        let body = ctx
            .post_form("/checkout", &valid_checkout_form())
            .await
            .text()
            .await
            .unwrap();
        let start = body.find("VB-2024-").unwrap();
        numbers.push(body[start..start + 12].to_string());
        ctx.post_form("/checkout/dismiss", &[]).await;
    }

    assert_ne!(numbers[0], numbers[1]);
}

#[tokio::test]
async fn test_dismiss_without_confirmation_is_conflict() {
    let ctx = TestContext::new().await;

    let response = ctx.post_form("/checkout/dismiss", &[]).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_confirmation_waits_for_processing_delay() {
    let ctx = TestContext::with_env(&[("VEILBOUND_CHECKOUT_DELAY_MS", "300")]).await;
    ctx.add("veilbound-preorder").await;
    ctx.post_form("/checkout/start", &[]).await;

    let started = Instant::now();
    let response = ctx.post_form("/checkout", &valid_checkout_form()).await;
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Order confirmed"));
}

#[tokio::test]
async fn test_cart_change_during_processing_applies_after_confirmation() {
    let ctx = TestContext::with_env(&[("VEILBOUND_CHECKOUT_DELAY_MS", "300")]).await;
    ctx.add("giftcard-25").await;
    ctx.post_form("/checkout/start", &[]).await;

    let submit = tokio::spawn({
        let client = ctx.client.clone();
        let url = ctx.url("/checkout");
        async move {
            client
                .post(url)
                .form(&valid_checkout_form())
                .send()
                .await
                .unwrap()
                .status()
        }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Waits for the order to finish, then finds the line already gone.
    let response = ctx
        .post_form(
            "/cart/update",
            &[("line_id", "giftcard-25"), ("quantity", "4")],
        )
        .await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().get("hx-trigger").is_none());

    assert_eq!(submit.await.unwrap(), 200);
    assert_eq!(ctx.cart_count().await, 0);
    assert!(ctx.cart_page().await.contains("Order confirmed"));
}
