//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself is stored in the session; every mutation goes through a
//! [`CartStore`] so the quantity cap and no-op rules are applied in one place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use veilbound_core::catalog::builtin_item;
use veilbound_core::{
    Cart, CartEvent, CartItemInput, CartLineItem, CartStore, CheckoutMode, MerchProductId,
    PricingPolicy, format_usd,
};

use crate::error::{AppError, Result};
use crate::models::ShopperSession;
use crate::state::AppState;

/// HTMX event fired when cart contents change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// HTMX event fired when the cart panel opens or closes.
pub const CART_VISIBILITY_EVENT: &str = "cart-visibility-changed";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub decrement: i64,
    pub increment: i64,
    pub at_max: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub is_empty: bool,
    pub is_open: bool,
    pub subtotal: String,
    pub discount: String,
    pub discount_percent: String,
    pub shipping: String,
    pub free_shipping: bool,
    pub free_shipping_threshold: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Price the cart for display.
    #[must_use]
    pub fn build(cart: &Cart, policy: &PricingPolicy, max_quantity: u32) -> Self {
        let quote = cart.quote(policy).rounded();
        let display = quote.display();

        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartItemView::build(line, max_quantity))
                .collect(),
            item_count: cart.total_items(),
            is_empty: cart.is_empty(),
            is_open: cart.is_open(),
            subtotal: display.subtotal,
            discount: display.discount,
            discount_percent: policy.discount_percent().to_string(),
            shipping: display.shipping,
            free_shipping: quote.free_shipping(),
            free_shipping_threshold: format_usd(policy.free_shipping_threshold()),
            tax: display.tax,
            total: display.total,
        }
    }
}

impl CartItemView {
    fn build(line: &CartLineItem, max_quantity: u32) -> Self {
        let quantity = line.quantity();
        Self {
            id: line.id().to_string(),
            name: line.name().to_string(),
            description: line.description().to_string(),
            image: line.image().to_string(),
            quantity,
            price: line.price().display(),
            line_price: format_usd(line.line_total()),
            decrement: i64::from(quantity) - 1,
            increment: i64::from(quantity) + 1,
            at_max: quantity >= max_quantity,
        }
    }
}

/// Which view the cart panel is showing.
#[derive(Clone)]
pub struct PanelView {
    /// `"cart"`, `"form"`, or `"confirmed"`.
    pub mode: &'static str,
    pub order_number: Option<String>,
    pub form_error: Option<String>,
}

impl PanelView {
    #[must_use]
    pub fn build(mode: &CheckoutMode) -> Self {
        Self {
            mode: mode.as_str(),
            order_number: match mode {
                CheckoutMode::Confirmed { order_number } => Some(order_number.to_string()),
                CheckoutMode::Cart | CheckoutMode::Form => None,
            },
            form_error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.form_error = Some(message.into());
        self
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// `product_id` is either a built-in product id (`veilbound-preorder`,
/// `giftcard-50`, ...) or a merch product UUID with an optional size/color.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Update cart form data. A quantity of zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub panel: PanelView,
}

/// Cart panel fragment: items, checkout form, or confirmation (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    pub panel: PanelView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Helpers
// =============================================================================

/// Wrap the shopper's cart in a store that logs every change.
pub(crate) fn open_store(state: &AppState, shopper: &mut ShopperSession) -> CartStore {
    let mut store = state.cart_store(std::mem::take(&mut shopper.cart));
    store.subscribe(|event| {
        tracing::info!(event = event.name(), detail = ?event, "Cart changed");
    });
    store
}

/// Attach the HTMX trigger matching a cart event, if anything changed.
pub(crate) fn with_cart_trigger(event: Option<&CartEvent>, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Some(event) = event {
        let trigger = if event.affects_items() {
            CART_UPDATED_EVENT
        } else {
            CART_VISIBILITY_EVENT
        };
        response
            .headers_mut()
            .insert("HX-Trigger", HeaderValue::from_static(trigger));
    }
    response
}

/// Render the cart panel for the shopper's current state.
pub(crate) fn panel(state: &AppState, shopper: &ShopperSession) -> CartPanelTemplate {
    CartPanelTemplate {
        cart: cart_view(state, &shopper.cart),
        panel: PanelView::build(shopper.flow.mode()),
    }
}

pub(crate) fn cart_view(state: &AppState, cart: &Cart) -> CartView {
    CartView::build(cart, state.pricing(), state.config().max_line_quantity)
}

/// Resolve an add-to-cart request to the item to add.
async fn resolve_item(state: &AppState, form: &AddToCartForm) -> Result<CartItemInput> {
    let product_id = form.product_id.trim();
    if let Some(item) = builtin_item(product_id) {
        return Ok(item);
    }

    let id = product_id
        .parse::<MerchProductId>()
        .map_err(|_| AppError::NotFound(format!("product {product_id}")))?;
    let product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    Ok(product.variant(form.size.as_deref(), form.color.as_deref())?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, shopper))]
pub async fn show(State(state): State<AppState>, shopper: ShopperSession) -> impl IntoResponse {
    CartShowTemplate {
        cart: cart_view(&state, &shopper.cart),
        panel: PanelView::build(shopper.flow.mode()),
    }
}

/// Add item to cart (HTMX).
///
/// Adding an item already in the cart bumps its quantity by one.
/// Returns the count badge and an HTMX trigger so other fragments refresh.
#[instrument(skip(state, shopper), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    mut shopper: ShopperSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = resolve_item(&state, &form).await?;

    let mut store = open_store(&state, &mut shopper);
    let event = store.add_item(item);
    shopper.cart = store.into_cart();
    shopper.save().await?;

    let count = shopper.cart.total_items();
    Ok(with_cart_trigger(event.as_ref(), CartCountTemplate { count }))
}

/// Set a line's quantity (HTMX).
#[instrument(skip(state, shopper))]
pub async fn update(
    State(state): State<AppState>,
    mut shopper: ShopperSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut store = open_store(&state, &mut shopper);
    let event = store.update_quantity(&form.line_id, form.quantity);
    shopper.cart = store.into_cart();
    shopper.save().await?;

    let cart = cart_view(&state, &shopper.cart);
    Ok(with_cart_trigger(event.as_ref(), CartItemsTemplate { cart }))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, shopper))]
pub async fn remove(
    State(state): State<AppState>,
    mut shopper: ShopperSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut store = open_store(&state, &mut shopper);
    let event = store.remove_item(&form.line_id);
    shopper.cart = store.into_cart();
    shopper.save().await?;

    let cart = cart_view(&state, &shopper.cart);
    Ok(with_cart_trigger(event.as_ref(), CartItemsTemplate { cart }))
}

/// Get cart count badge (HTMX).
#[instrument(skip(shopper))]
pub async fn count(shopper: ShopperSession) -> impl IntoResponse {
    CartCountTemplate {
        count: shopper.cart.total_items(),
    }
}

/// Open the cart panel (HTMX).
#[instrument(skip(state, shopper))]
pub async fn open(State(state): State<AppState>, shopper: ShopperSession) -> Result<Response> {
    set_open(&state, shopper, true).await
}

/// Close the cart panel (HTMX).
#[instrument(skip(state, shopper))]
pub async fn close(State(state): State<AppState>, shopper: ShopperSession) -> Result<Response> {
    set_open(&state, shopper, false).await
}

async fn set_open(state: &AppState, mut shopper: ShopperSession, open: bool) -> Result<Response> {
    let mut store = open_store(state, &mut shopper);
    let event = store.set_open(open);
    shopper.cart = store.into_cart();
    shopper.save().await?;

    Ok(with_cart_trigger(event.as_ref(), panel(state, &shopper)))
}
