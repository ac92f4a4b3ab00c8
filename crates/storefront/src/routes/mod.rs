//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (merch catalog reachable)
//!
//! # Shop
//! GET  /                       - Redirect to /shop
//! GET  /shop                   - Game edition, merch, gift cards
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/open              - Open cart panel (returns cart_panel fragment)
//! POST /cart/close             - Close cart panel (returns cart_panel fragment)
//!
//! # Checkout (HTMX fragments, all return cart_panel)
//! POST /checkout/start         - Cart -> form
//! POST /checkout/back          - Form -> cart
//! POST /checkout               - Submit form -> confirmed
//! POST /checkout/dismiss       - Confirmed -> cart (closes panel)
//!
//! # Forms (JSON)
//! POST /contact                - Contact message
//! POST /community/join         - Community signup
//!
//! # Admin (JSON, only when STOREFRONT_ADMIN_ENABLED)
//! GET    /admin/api/merch             - List all merch
//! POST   /admin/api/merch             - Create merch
//! PUT    /admin/api/merch/{id}        - Update merch
//! DELETE /admin/api/merch/{id}        - Delete merch
//! POST   /admin/api/merch/{id}/toggle - Show/hide on the shop page
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod shop;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::submit))
        .route("/start", post(checkout::start))
        .route("/back", post(checkout::back))
        .route("/dismiss", post(checkout::dismiss))
}

/// Create the merch admin API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::list).post(admin::create))
        .route("/{id}", put(admin::update).delete(admin::delete))
        .route("/{id}/toggle", post(admin::toggle))
}

/// Create all routes for the storefront.
pub fn routes(admin_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(|| async { Redirect::permanent("/shop") }))
        .route("/shop", get(shop::index))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/contact", post(contact::submit))
        .route("/community/join", post(contact::join));

    if admin_enabled {
        router.nest("/admin/api/merch", admin_routes())
    } else {
        router
    }
}
