//! Session-held models for the storefront.

pub mod session;

pub use session::{ShopperSession, keys};
