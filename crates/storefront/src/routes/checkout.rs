//! Simulated checkout handlers.
//!
//! The checkout lives inside the cart panel and moves through
//! cart -> form -> confirmed. Nothing is charged; a valid submission waits for
//! the configured processing delay, clears the cart, and shows a demo order
//! number.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;
use veilbound_core::forms::{CheckoutForm, CheckoutFormInput};
use veilbound_core::{CheckoutFlowError, CheckoutMode};

use super::cart::{PanelView, cart_view, open_store, panel, with_cart_trigger};
use crate::error::{Result, add_breadcrumb};
use crate::models::ShopperSession;
use crate::state::AppState;

/// Switch the panel to the checkout form (HTMX).
#[instrument(skip(state, shopper))]
pub async fn start(State(state): State<AppState>, mut shopper: ShopperSession) -> Result<Response> {
    shopper.flow.open_checkout(&shopper.cart)?;
    shopper.save().await?;
    add_breadcrumb("checkout", "Opened checkout form", None);

    Ok(panel(&state, &shopper).into_response())
}

/// Return from the form to the cart view (HTMX).
#[instrument(skip(state, shopper))]
pub async fn back(State(state): State<AppState>, mut shopper: ShopperSession) -> Result<Response> {
    shopper.flow.back_to_cart()?;
    shopper.save().await?;

    Ok(panel(&state, &shopper).into_response())
}

/// Submit the checkout form (HTMX).
///
/// Invalid input re-renders the form with the first error and a 422. A valid
/// order waits out the simulated processing time, then confirms and empties
/// the cart.
#[instrument(skip(state, shopper, input))]
pub async fn submit(
    State(state): State<AppState>,
    mut shopper: ShopperSession,
    Form(input): Form<CheckoutFormInput>,
) -> Result<Response> {
    if shopper.flow.mode() != &CheckoutMode::Form {
        return Err(CheckoutFlowError::InvalidTransition {
            action: "submit an order",
            mode: shopper.flow.mode().as_str(),
        }
        .into());
    }

    let order = match CheckoutForm::parse(&input) {
        Ok(order) => order,
        Err(err) => {
            tracing::debug!(field = err.field(), error = %err, "Checkout form rejected");
            let body = super::cart::CartPanelTemplate {
                cart: cart_view(&state, &shopper.cart),
                panel: PanelView::build(shopper.flow.mode()).with_error(err.to_string()),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
        }
    };

    let delay = state.config().checkout_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let order_number = state.next_order_number();
    let totals = shopper.cart.quote(state.pricing()).rounded();
    let items = shopper.cart.total_items();

    shopper.flow.confirm(order_number.clone())?;
    let mut store = open_store(&state, &mut shopper);
    let event = store.clear();
    shopper.cart = store.into_cart();
    shopper.save().await?;

    tracing::info!(
        order_number = %order_number,
        email = %order.email,
        customer = %order.full_name(),
        card_last4 = %order.card_last4,
        items,
        total = %totals.total,
        "Demo order confirmed"
    );

    Ok(with_cart_trigger(event.as_ref(), panel(&state, &shopper)))
}

/// Dismiss the confirmation and close the cart panel (HTMX).
#[instrument(skip(state, shopper))]
pub async fn dismiss(
    State(state): State<AppState>,
    mut shopper: ShopperSession,
) -> Result<Response> {
    shopper.flow.dismiss()?;
    let mut store = open_store(&state, &mut shopper);
    let event = store.set_open(false);
    shopper.cart = store.into_cart();
    shopper.save().await?;

    Ok(with_cart_trigger(event.as_ref(), panel(&state, &shopper)))
}
