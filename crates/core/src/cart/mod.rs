//! Shopping cart state.
//!
//! A [`Cart`] is the per-session state: an ordered list of line items keyed by
//! variant identity plus the presentational `is_open` flag. It is plain data
//! (serializable, cloneable) so the caller can keep it wherever a browsing
//! session lives. All mutation goes through [`CartStore`].
//!
//! # Invariants
//!
//! - Line item ids are unique; insertion order is display order.
//! - Every line item has `quantity >= 1`. Driving a quantity to zero or below
//!   removes the line instead.
//! - Name, price, image, and description are captured when the item is first
//!   added and never refreshed from the catalog.

mod store;

pub use store::{CartEvent, CartStore, SubscriptionId};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{PriceBreakdown, PricingPolicy};
use crate::types::{LineItemId, Price};

/// Errors building a [`CartItemInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    #[error("cart item id cannot be empty")]
    EmptyId,
    #[error("cart item name cannot be empty")]
    EmptyName,
}

/// An item as offered to the cart: everything but the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemInput {
    id: LineItemId,
    name: String,
    price: Price,
    image: String,
    description: String,
}

impl CartItemInput {
    /// Create an input with an empty image and description.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError`] if the id or the name is blank.
    pub fn new(
        id: impl Into<LineItemId>,
        name: impl Into<String>,
        price: Price,
    ) -> Result<Self, CartItemError> {
        let id = id.into();
        let name = name.into();
        if id.as_str().trim().is_empty() {
            return Err(CartItemError::EmptyId);
        }
        if name.trim().is_empty() {
            return Err(CartItemError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            price,
            image: String::new(),
            description: String::new(),
        })
    }

    /// Set the display image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the display description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn id(&self) -> &LineItemId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: LineItemId,
    name: String,
    price: Price,
    image: String,
    description: String,
    quantity: u32,
}

impl CartLineItem {
    fn from_input(input: CartItemInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
            price: input.price,
            image: input.image,
            description: input.description,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &LineItemId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the item was added.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Cart state for one browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
    #[serde(default)]
    is_open: bool,
}

impl Cart {
    /// An empty, closed cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
        }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart surface is presented. Has no effect on totals.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Sum of quantities across all lines; `0` for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity`; zero for an empty cart.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Derived discount/shipping/tax/total for the current subtotal.
    #[must_use]
    pub fn quote(&self, policy: &PricingPolicy) -> PriceBreakdown {
        policy.quote(self.subtotal())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }
}
