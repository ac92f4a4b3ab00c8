//! Core types for Veilbound.
//!
//! Type-safe wrappers for identifiers, money amounts, and email addresses.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{LineItemId, MerchProductId};
pub use price::{NegativePrice, Price, format_usd, round_cents};
