//! Veilbound Core - Cart, pricing, and catalog domain library.
//!
//! This crate provides the domain model shared by the Veilbound components:
//! - `storefront` - Demo shop, cart, and simulated checkout (HTTP)
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The cart store is an explicitly owned value; callers decide
//! where a session's [`Cart`] lives and hand it to a [`CartStore`] to mutate it.
//!
//! # Modules
//!
//! - [`cart`] - Cart state, line items, and the [`CartStore`] mutation API
//! - [`pricing`] - Configurable discount/tax/shipping policy and price quotes
//! - [`checkout`] - Checkout presentation flow and demo order numbers
//! - [`catalog`] - Merch products, variants, and the built-in shop products
//! - [`forms`] - Typed, validated form records (checkout, contact, community)
//! - [`types`] - Newtype wrappers for IDs, money, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod forms;
pub mod pricing;
pub mod types;

pub use cart::{
    Cart, CartEvent, CartItemError, CartItemInput, CartLineItem, CartStore, SubscriptionId,
};
pub use catalog::{
    GameEdition, GiftCard, MerchProduct, MerchProductError, MerchProductInput, NewMerchProduct,
    VariantError,
};
pub use checkout::{CheckoutFlow, CheckoutFlowError, CheckoutMode, DemoOrderNumber};
pub use forms::FormError;
pub use pricing::{PriceBreakdown, PricingPolicy, PricingPolicyError};
pub use types::*;
