//! Session-related types.
//!
//! A shopper's cart and checkout flow live in their session; nothing about
//! a cart is written to the database.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use veilbound_core::{Cart, CheckoutFlow};

use crate::error::AppError;

/// Session keys for shopper data.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";

    /// Key for the checkout flow state.
    pub const CHECKOUT_FLOW: &str = "checkout_flow";
}

/// The cart and checkout state loaded from the session.
///
/// Extract it in a handler, mutate `cart`/`flow`, then call [`Self::save`].
/// Requests for the same session reach handlers one at a time (see
/// [`crate::middleware::session_lock`]).
#[derive(Debug)]
pub struct ShopperSession {
    session: Session,
    pub cart: Cart,
    pub flow: CheckoutFlow,
}

impl ShopperSession {
    /// Load from the session, starting empty for new shoppers.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn load(session: Session) -> Result<Self, AppError> {
        let cart = session.get::<Cart>(keys::CART).await?.unwrap_or_default();
        let flow = session
            .get::<CheckoutFlow>(keys::CHECKOUT_FLOW)
            .await?
            .unwrap_or_default();
        Ok(Self {
            session,
            cart,
            flow,
        })
    }

    /// Write the cart and checkout state back.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session.insert(keys::CART, &self.cart).await?;
        self.session.insert(keys::CHECKOUT_FLOW, &self.flow).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for ShopperSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Internal(message.to_string()))?;
        Self::load(session).await
    }
}
