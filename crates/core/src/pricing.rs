//! Derived pricing: pre-order discount, shipping, and sales tax.
//!
//! Nothing here is stored. A quote is recomputed from the cart subtotal every
//! time it is rendered:
//!
//! ```text
//! discount = subtotal * discount_rate
//! shipping = 0 if subtotal > free_shipping_threshold else flat_shipping
//! tax      = (subtotal - discount) * tax_rate
//! total    = subtotal - discount + tax + shipping
//! ```
//!
//! The free-shipping test uses the pre-discount subtotal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{format_usd, round_cents};

/// Invalid pricing policy values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingPolicyError {
    #[error("{field} must be between 0 and 1 (got {value})")]
    RateOutOfRange { field: &'static str, value: Decimal },
    #[error("{field} cannot be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Store-wide pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    discount_rate: Decimal,
    tax_rate: Decimal,
    free_shipping_threshold: Decimal,
    flat_shipping: Decimal,
}

impl PricingPolicy {
    /// Flat pre-order discount (25%).
    pub const DEFAULT_DISCOUNT_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
    /// Sales tax (8%).
    pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
    /// Subtotals strictly above this ship free ($50).
    pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
    /// Shipping charged otherwise ($9.99).
    pub const DEFAULT_FLAT_SHIPPING: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

    /// Build a policy, validating every value.
    ///
    /// # Errors
    ///
    /// Returns [`PricingPolicyError`] if a rate is outside `[0, 1]` or an
    /// amount is negative.
    pub fn new(
        discount_rate: Decimal,
        tax_rate: Decimal,
        free_shipping_threshold: Decimal,
        flat_shipping: Decimal,
    ) -> Result<Self, PricingPolicyError> {
        check_rate("discount_rate", discount_rate)?;
        check_rate("tax_rate", tax_rate)?;
        check_amount("free_shipping_threshold", free_shipping_threshold)?;
        check_amount("flat_shipping", flat_shipping)?;
        Ok(Self {
            discount_rate,
            tax_rate,
            free_shipping_threshold,
            flat_shipping,
        })
    }

    #[must_use]
    pub const fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    #[must_use]
    pub const fn free_shipping_threshold(&self) -> Decimal {
        self.free_shipping_threshold
    }

    #[must_use]
    pub const fn flat_shipping(&self) -> Decimal {
        self.flat_shipping
    }

    /// Discount as a whole percentage for labels, e.g. `25`.
    #[must_use]
    pub fn discount_percent(&self) -> Decimal {
        (self.discount_rate * Decimal::ONE_HUNDRED).normalize()
    }

    /// Compute the breakdown for `subtotal`. Values are exact; round with
    /// [`PriceBreakdown::rounded`] for display.
    #[must_use]
    pub fn quote(&self, subtotal: Decimal) -> PriceBreakdown {
        let discount = subtotal * self.discount_rate;
        let shipping = if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        };
        let tax = (subtotal - discount) * self.tax_rate;
        let total = subtotal - discount + tax + shipping;

        PriceBreakdown {
            subtotal,
            discount,
            shipping,
            tax,
            total,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            discount_rate: Self::DEFAULT_DISCOUNT_RATE,
            tax_rate: Self::DEFAULT_TAX_RATE,
            free_shipping_threshold: Self::DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping: Self::DEFAULT_FLAT_SHIPPING,
        }
    }
}

fn check_rate(field: &'static str, value: Decimal) -> Result<(), PricingPolicyError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PricingPolicyError::RateOutOfRange { field, value });
    }
    Ok(())
}

fn check_amount(field: &'static str, value: Decimal) -> Result<(), PricingPolicyError> {
    if value < Decimal::ZERO {
        return Err(PricingPolicyError::NegativeAmount { field, value });
    }
    Ok(())
}

/// A priced cart summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Each component rounded to cents independently.
    ///
    /// The rounded total is the exact total rounded, not the sum of rounded
    /// parts, so it can differ from that sum by a cent.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_cents(self.subtotal),
            discount: round_cents(self.discount),
            shipping: round_cents(self.shipping),
            tax: round_cents(self.tax),
            total: round_cents(self.total),
        }
    }

    /// Whether shipping is waived.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Dollar-formatted strings for templates.
    #[must_use]
    pub fn display(&self) -> PriceBreakdownDisplay {
        PriceBreakdownDisplay {
            subtotal: format_usd(self.subtotal),
            discount: format_usd(self.discount),
            shipping: if self.free_shipping() {
                "Free".to_string()
            } else {
                format_usd(self.shipping)
            },
            tax: format_usd(self.tax),
            total: format_usd(self.total),
        }
    }
}

/// Formatted [`PriceBreakdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdownDisplay {
    pub subtotal: String,
    pub discount: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dollars(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_default_constants() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.discount_rate(), dollars(25));
        assert_eq!(policy.tax_rate(), dollars(8));
        assert_eq!(policy.free_shipping_threshold(), dollars(5000));
        assert_eq!(policy.flat_shipping(), dollars(999));
        assert_eq!(policy.discount_percent(), Decimal::from(25));
    }

    #[test]
    fn test_single_deluxe_edition_quote() {
        let quote = PricingPolicy::default().quote(dollars(5999)).rounded();
        assert_eq!(quote.subtotal, dollars(5999));
        assert_eq!(quote.discount, dollars(1500));
        assert_eq!(quote.shipping, Decimal::ZERO);
        assert_eq!(quote.tax, dollars(360));
        assert_eq!(quote.total, dollars(4859));
    }

    #[test]
    fn test_exact_components_before_rounding() {
        let quote = PricingPolicy::default().quote(dollars(5999));
        assert_eq!(quote.discount, Decimal::new(149_975, 4));
        assert_eq!(quote.tax, Decimal::new(3_599_400, 6));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.quote(dollars(5000)).shipping, dollars(999));
        assert_eq!(policy.quote(dollars(5001)).shipping, Decimal::ZERO);
    }

    #[test]
    fn test_empty_cart_still_charges_shipping() {
        let quote = PricingPolicy::default().quote(Decimal::ZERO);
        assert_eq!(quote.discount, Decimal::ZERO);
        assert_eq!(quote.tax, Decimal::ZERO);
        assert_eq!(quote.total, dollars(999));
    }

    #[test]
    fn test_small_order_with_shipping() {
        // 25.00 -> discount 6.25, tax 1.50, shipping 9.99, total 30.24
        let quote = PricingPolicy::default().quote(dollars(2500)).rounded();
        assert_eq!(quote.discount, dollars(625));
        assert_eq!(quote.tax, dollars(150));
        assert_eq!(quote.shipping, dollars(999));
        assert_eq!(quote.total, dollars(3024));
    }

    #[test]
    fn test_custom_policy() {
        let policy =
            PricingPolicy::new(Decimal::ZERO, dollars(10), dollars(10_000), dollars(500)).unwrap();
        let quote = policy.quote(dollars(10_000));
        assert_eq!(quote.discount, Decimal::ZERO);
        assert_eq!(quote.shipping, dollars(500));
        assert_eq!(quote.total, dollars(11_500));
    }

    #[test]
    fn test_policy_validation() {
        assert!(matches!(
            PricingPolicy::new(dollars(150), dollars(8), dollars(5000), dollars(999)),
            Err(PricingPolicyError::RateOutOfRange {
                field: "discount_rate",
                ..
            })
        ));
        assert!(matches!(
            PricingPolicy::new(dollars(25), dollars(8), dollars(5000), dollars(-1)),
            Err(PricingPolicyError::NegativeAmount {
                field: "flat_shipping",
                ..
            })
        ));
    }

    #[test]
    fn test_display_strings() {
        let display = PricingPolicy::default().quote(dollars(5999)).display();
        assert_eq!(display.subtotal, "$59.99");
        assert_eq!(display.discount, "$15.00");
        assert_eq!(display.shipping, "Free");
        assert_eq!(display.tax, "$3.60");
        assert_eq!(display.total, "$48.59");
    }
}
