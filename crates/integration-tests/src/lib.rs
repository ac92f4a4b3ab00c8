//! Integration tests for the Veilbound storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p veilbound-integration-tests
//! ```
//!
//! Each test boots its own storefront on an ephemeral port with the in-memory
//! merch catalog, so no database is needed.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Shop page and cart fragments
//! - `storefront_checkout` - Simulated checkout flow
//! - `storefront_forms` - Contact and community JSON endpoints
//! - `storefront_admin` - Merch admin API

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, Response};
use veilbound_storefront::catalog::InMemoryMerchCatalog;
use veilbound_storefront::config::StorefrontConfig;
use veilbound_storefront::state::AppState;

/// A running storefront and a cookie-keeping client (one shopper session).
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront with default settings and no checkout delay.
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Start a storefront with extra environment overrides.
    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::from([
            (
                "STOREFRONT_BASE_URL".to_string(),
                "http://127.0.0.1".to_string(),
            ),
            ("VEILBOUND_CHECKOUT_DELAY_MS".to_string(), "0".to_string()),
        ]);
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }
        let config = StorefrontConfig::from_source(&|key| vars.get(key).cloned())
            .expect("test configuration should be valid");

        let state = AppState::new(config, Arc::new(InMemoryMerchCatalog::seeded()));
        let app = veilbound_storefront::app(state);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        Self {
            client: Self::new_client(),
            base_url: format!("http://{addr}"),
        }
    }

    /// A fresh client with its own cookie jar (a second shopper).
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Add a product by id (built-in id or merch UUID) with optional options.
    pub async fn add(&self, product_id: &str) -> Response {
        self.post_form("/cart/add", &[("product_id", product_id)])
            .await
    }

    /// The count badge as a number (0 when the badge is hidden).
    pub async fn cart_count(&self) -> u64 {
        let body = self.get("/cart/count").await.text().await.unwrap();
        let digits: String = body.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }

    /// The rendered cart page.
    pub async fn cart_page(&self) -> String {
        let response = self.get("/cart").await;
        assert_eq!(response.status(), 200);
        response.text().await.unwrap()
    }
}

/// Valid demo checkout fields.
#[must_use]
pub fn valid_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("email", "shardbearer@example.com"),
        ("first_name", "Ada"),
        ("last_name", "Vance"),
        ("address", "1 Veil Way"),
        ("city", "Portland"),
        ("zip_code", "97201"),
        ("card_number", "4242 4242 4242 4242"),
        ("expiry_date", "12/39"),
        ("cvv", "123"),
    ]
}
