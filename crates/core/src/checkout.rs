//! Checkout presentation flow.
//!
//! The cart surface shows one of three mutually exclusive modes. This is UI
//! state and lives beside the cart, not inside it: completing a checkout
//! clears the cart through [`crate::CartStore::clear`] separately.
//!
//! ```text
//!   Cart --open_checkout--> Form --confirm--> Confirmed
//!    ^                       |                   |
//!    +------back_to_cart-----+                   |
//!    +-------------------dismiss-----------------+
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;

/// Rejected transition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutFlowError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
    #[error("cannot {action} while in {mode} mode")]
    InvalidTransition {
        action: &'static str,
        mode: &'static str,
    },
}

/// Demo order reference shown on the confirmation view, e.g. `VB-2024-0042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemoOrderNumber(String);

impl DemoOrderNumber {
    /// Prefix on every demo order reference.
    pub const PREFIX: &'static str = "VB-2024-";

    /// Build a reference from a sequence value; only the last four digits are
    /// kept.
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("{}{:04}", Self::PREFIX, sequence % 10_000))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DemoOrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the cart surface is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CheckoutMode {
    #[default]
    Cart,
    Form,
    Confirmed { order_number: DemoOrderNumber },
}

impl CheckoutMode {
    /// `"cart"`, `"form"`, or `"confirmed"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Form => "form",
            Self::Confirmed { .. } => "confirmed",
        }
    }
}

/// State machine over [`CheckoutMode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    mode: CheckoutMode,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: CheckoutMode::Cart,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &CheckoutMode {
        &self.mode
    }

    /// Cart -> Form. Requires a non-empty cart.
    ///
    /// # Errors
    ///
    /// [`CheckoutFlowError::EmptyCart`] for an empty cart, or
    /// [`CheckoutFlowError::InvalidTransition`] outside the cart view.
    pub fn open_checkout(&mut self, cart: &Cart) -> Result<(), CheckoutFlowError> {
        self.expect(&CheckoutMode::Cart, "open checkout")?;
        if cart.is_empty() {
            return Err(CheckoutFlowError::EmptyCart);
        }
        self.mode = CheckoutMode::Form;
        Ok(())
    }

    /// Form -> Cart.
    ///
    /// # Errors
    ///
    /// [`CheckoutFlowError::InvalidTransition`] outside the checkout form.
    pub fn back_to_cart(&mut self) -> Result<(), CheckoutFlowError> {
        self.expect(&CheckoutMode::Form, "go back to cart")?;
        self.mode = CheckoutMode::Cart;
        Ok(())
    }

    /// Form -> Confirmed.
    ///
    /// # Errors
    ///
    /// [`CheckoutFlowError::InvalidTransition`] outside the checkout form.
    pub fn confirm(&mut self, order_number: DemoOrderNumber) -> Result<(), CheckoutFlowError> {
        self.expect(&CheckoutMode::Form, "confirm an order")?;
        self.mode = CheckoutMode::Confirmed { order_number };
        Ok(())
    }

    /// Confirmed -> Cart. The caller also closes the cart surface.
    ///
    /// # Errors
    ///
    /// [`CheckoutFlowError::InvalidTransition`] outside the confirmation view.
    pub fn dismiss(&mut self) -> Result<(), CheckoutFlowError> {
        if !matches!(self.mode, CheckoutMode::Confirmed { .. }) {
            return Err(self.invalid("dismiss a confirmation"));
        }
        self.mode = CheckoutMode::Cart;
        Ok(())
    }

    fn expect(&self, mode: &CheckoutMode, action: &'static str) -> Result<(), CheckoutFlowError> {
        if &self.mode == mode {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    const fn invalid(&self, action: &'static str) -> CheckoutFlowError {
        CheckoutFlowError::InvalidTransition {
            action,
            mode: self.mode.as_str(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::{CartItemInput, CartStore};
    use crate::types::Price;

    fn filled_cart() -> Cart {
        let mut store = CartStore::new();
        store.add_item(
            CartItemInput::new("giftcard-50", "Gift Card", Price::from_cents(5000)).unwrap(),
        );
        store.into_cart()
    }

    #[test]
    fn test_full_happy_path() {
        let mut flow = CheckoutFlow::new();
        flow.open_checkout(&filled_cart()).unwrap();
        assert_eq!(flow.mode(), &CheckoutMode::Form);

        flow.confirm(DemoOrderNumber::from_sequence(42)).unwrap();
        assert_eq!(
            flow.mode(),
            &CheckoutMode::Confirmed {
                order_number: DemoOrderNumber::from_sequence(42)
            }
        );

        flow.dismiss().unwrap();
        assert_eq!(flow.mode(), &CheckoutMode::Cart);
    }

    #[test]
    fn test_back_to_cart() {
        let mut flow = CheckoutFlow::new();
        flow.open_checkout(&filled_cart()).unwrap();
        flow.back_to_cart().unwrap();
        assert_eq!(flow.mode(), &CheckoutMode::Cart);
    }

    #[test]
    fn test_empty_cart_cannot_open_checkout() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(
            flow.open_checkout(&Cart::new()),
            Err(CheckoutFlowError::EmptyCart)
        );
        assert_eq!(flow.mode(), &CheckoutMode::Cart);
    }

    #[test]
    fn test_invalid_transitions_leave_mode_unchanged() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.confirm(DemoOrderNumber::from_sequence(1)).is_err());
        assert!(flow.back_to_cart().is_err());
        assert!(flow.dismiss().is_err());
        assert_eq!(flow.mode(), &CheckoutMode::Cart);

        flow.open_checkout(&filled_cart()).unwrap();
        let err = flow.open_checkout(&filled_cart()).unwrap_err();
        assert_eq!(err.to_string(), "cannot open checkout while in form mode");
        assert_eq!(flow.mode(), &CheckoutMode::Form);
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(DemoOrderNumber::from_sequence(7).as_str(), "VB-2024-0007");
        assert_eq!(DemoOrderNumber::from_sequence(123_456).as_str(), "VB-2024-3456");
    }
}
