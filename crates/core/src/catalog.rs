//! Shop catalog types.
//!
//! Two kinds of products feed the cart:
//!
//! - Built-in products that never change at runtime: the game pre-order
//!   ([`GameEdition`]) and [`GiftCard`]s.
//! - Merchandise ([`MerchProduct`]) owned by the catalog database and managed
//!   from the admin API. Merch is sold per size/color variant.
//!
//! The cart never looks products up itself; callers turn a product into a
//! [`CartItemInput`] here and hand that to the cart store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartItemError, CartItemInput};
use crate::types::{MerchProductId, NegativePrice, Price};

/// Image shared by the built-in products.
pub const DEFAULT_PRODUCT_IMAGE: &str = "/static/images/veilbound-hero.jpg";

// =============================================================================
// Merch
// =============================================================================

/// A merch product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct MerchProduct {
    pub id: MerchProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The selected size/color was not valid for the product.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("size {0:?} is not offered")]
    UnknownSize(String),
    #[error("color {0:?} is not offered")]
    UnknownColor(String),
    #[error("product has no {0} options")]
    NoOptions(&'static str),
    #[error("product is not available")]
    Inactive,
    #[error(transparent)]
    Item(#[from] CartItemError),
}

/// Joins product id, size and color in a variant id. Options may not contain
/// it, so every size/color pair gets a distinct id.
pub const VARIANT_SEPARATOR: char = '-';

impl MerchProduct {
    /// Cart identity of a variant: `"{id}-{size}-{color}"`.
    #[must_use]
    pub fn variant_id(&self, size: &str, color: &str) -> String {
        format!("{}-{size}-{color}", self.id)
    }

    /// Build the cart item for a size/color selection.
    ///
    /// Missing selections fall back to the first listed option. Selections
    /// that the product does not offer are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError`] for inactive products or unknown options.
    pub fn variant(
        &self,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<CartItemInput, VariantError> {
        if !self.is_active {
            return Err(VariantError::Inactive);
        }
        let size = pick_option(&self.sizes, size, "size", VariantError::UnknownSize)?;
        let color = pick_option(&self.colors, color, "color", VariantError::UnknownColor)?;

        Ok(CartItemInput::new(
            self.variant_id(size, color),
            format!("{} ({size}, {color})", self.name),
            self.price,
        )?
        .with_image(self.image_url.clone())
        .with_description(self.description.clone()))
    }
}

fn pick_option<'a>(
    options: &'a [String],
    selected: Option<&str>,
    kind: &'static str,
    unknown: fn(String) -> VariantError,
) -> Result<&'a str, VariantError> {
    match selected.map(str::trim).filter(|s| !s.is_empty()) {
        Some(wanted) => options
            .iter()
            .find(|option| option.as_str() == wanted)
            .map(String::as_str)
            .ok_or_else(|| unknown(wanted.to_string())),
        None => options
            .first()
            .map(String::as_str)
            .ok_or(VariantError::NoOptions(kind)),
    }
}

/// Invalid merch product fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerchProductError {
    #[error("product name is required")]
    EmptyName,
    #[error("price is not a number: {0}")]
    InvalidPrice(String),
    #[error(transparent)]
    NegativePrice(#[from] NegativePrice),
    #[error("at least one {0} is required")]
    NoOptions(&'static str),
    #[error("{kind} {value:?} must not contain '-'")]
    OptionSeparator { kind: &'static str, value: String },
}

/// Raw admin form for creating or editing merch. Colors and sizes are
/// comma-separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub sizes: String,
}

/// Validated merch fields for insert/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMerchProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl NewMerchProduct {
    /// Validate typed fields. Options are trimmed, blanks dropped, duplicates
    /// removed (first occurrence wins).
    ///
    /// # Errors
    ///
    /// Returns [`MerchProductError`] for a blank name, negative price, an
    /// empty color/size list, or an option containing [`VARIANT_SEPARATOR`].
    pub fn new(
        name: &str,
        description: &str,
        price: Decimal,
        image_url: &str,
        colors: &[String],
        sizes: &[String],
    ) -> Result<Self, MerchProductError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MerchProductError::EmptyName);
        }
        let price = Price::new(price)?;
        let colors = clean_options(colors.iter().map(String::as_str));
        if colors.is_empty() {
            return Err(MerchProductError::NoOptions("color"));
        }
        let sizes = clean_options(sizes.iter().map(String::as_str));
        if sizes.is_empty() {
            return Err(MerchProductError::NoOptions("size"));
        }
        check_separator("color", &colors)?;
        check_separator("size", &sizes)?;

        Ok(Self {
            name: name.to_owned(),
            description: description.trim().to_owned(),
            price,
            image_url: image_url.trim().to_owned(),
            colors,
            sizes,
        })
    }

    /// Validate the admin form.
    ///
    /// # Errors
    ///
    /// See [`NewMerchProduct::new`]; also fails if the price does not parse.
    pub fn parse(input: &MerchProductInput) -> Result<Self, MerchProductError> {
        let raw_price = input.price.trim().trim_start_matches('$');
        let price = raw_price
            .parse::<Decimal>()
            .map_err(|_| MerchProductError::InvalidPrice(input.price.clone()))?;
        let colors = split_csv(&input.colors);
        let sizes = split_csv(&input.sizes);
        Self::new(
            &input.name,
            &input.description,
            price,
            &input.image_url,
            &colors,
            &sizes,
        )
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_owned()).collect()
}

fn clean_options<'a>(options: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for option in options.map(str::trim).filter(|s| !s.is_empty()) {
        if !cleaned.iter().any(|existing| existing == option) {
            cleaned.push(option.to_owned());
        }
    }
    cleaned
}

fn check_separator(kind: &'static str, options: &[String]) -> Result<(), MerchProductError> {
    match options.iter().find(|o| o.contains(VARIANT_SEPARATOR)) {
        Some(value) => Err(MerchProductError::OptionSeparator {
            kind,
            value: value.clone(),
        }),
        None => Ok(()),
    }
}

/// The merch line the shop launched with; used to seed an empty catalog.
#[must_use]
pub fn default_merch() -> Vec<NewMerchProduct> {
    let shirt_sizes = ["S", "M", "L", "XL", "2XL"].map(String::from);
    let seeds: [(&str, &str, u32, &[&str]); 3] = [
        (
            "Veilbound Logo T-Shirt",
            "Premium quality cotton t-shirt featuring the iconic Veilbound logo.",
            2999,
            &["Black", "Navy", "Charcoal", "White"],
        ),
        (
            "Veil Diver Character Tee",
            "Show your love for the game with this exclusive character design t-shirt.",
            3299,
            &["Black", "Navy", "Dark Green"],
        ),
        (
            "Dyson Ring Explorer Shirt",
            "Explore the mysteries in style with this premium explorer-themed shirt.",
            3499,
            &["Black", "Slate Gray", "Deep Blue"],
        ),
    ];

    seeds
        .into_iter()
        .map(|(name, description, cents, colors)| NewMerchProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::from_cents(cents),
            image_url: DEFAULT_PRODUCT_IMAGE.to_owned(),
            colors: colors.iter().map(|c| (*c).to_owned()).collect(),
            sizes: shirt_sizes.to_vec(),
        })
        .collect()
}

// =============================================================================
// Built-in products
// =============================================================================

/// A purchasable edition of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEdition {
    pub id: &'static str,
    pub name: &'static str,
    pub price: Price,
    pub original_price: Price,
    pub image: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub platforms: &'static [&'static str],
    pub release_window: &'static str,
    pub preorder_bonus: &'static str,
}

impl GameEdition {
    /// The Digital Deluxe pre-order.
    #[must_use]
    pub fn digital_deluxe() -> Self {
        Self {
            id: "veilbound-preorder",
            name: "Veilbound - Digital Deluxe Edition",
            price: Price::from_cents(5999),
            original_price: Price::from_cents(7999),
            image: DEFAULT_PRODUCT_IMAGE,
            description: "Pre-order Veilbound and dive into a sci-fi adventure across a mysterious \
                Dyson ring. Use advanced traversal abilities to uncover lost memories and reshape \
                the past.",
            features: &[
                "Full Game Access on Release",
                "Digital Soundtrack by Award-Winning Composer",
                "Exclusive Digital Artbook (50+ Pages)",
                "In-Game Cosmetic Pack",
                "Early Access (3 Days Before Launch)",
                "Season Pass for Future DLCs",
            ],
            platforms: &["Windows", "Steam Deck", "PlayStation 5", "Xbox Series X/S"],
            release_window: "Q3 2024",
            preorder_bonus: "Quantum Traveler Skin Pack",
        }
    }

    /// `original_price - price`.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.original_price.amount() - self.price.amount()
    }

    /// # Errors
    ///
    /// Only if the built-in data is blank, which the tests rule out.
    pub fn to_cart_item(&self) -> Result<CartItemInput, CartItemError> {
        Ok(CartItemInput::new(self.id, self.name, self.price)?
            .with_image(self.image)
            .with_description(self.description))
    }
}

/// A fixed-value gift card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftCard {
    pub id: &'static str,
    pub name: &'static str,
    pub price: Price,
    pub description: &'static str,
}

impl GiftCard {
    /// Every gift card denomination on sale.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [
            Self {
                id: "giftcard-25",
                name: "Veilbound Gift Card - $25",
                price: Price::from_cents(2500),
                description: "Perfect for any Veilbound fan. Can be used for games, DLC, or \
                    merchandise.",
            },
            Self {
                id: "giftcard-50",
                name: "Veilbound Gift Card - $50",
                price: Price::from_cents(5000),
                description: "Give the gift of adventure. Redeemable for all Veilbound content.",
            },
            Self {
                id: "giftcard-100",
                name: "Veilbound Gift Card - $100",
                price: Price::from_cents(10_000),
                description: "The ultimate gift for the ultimate fan. Access to everything \
                    Veilbound.",
            },
        ]
    }

    /// # Errors
    ///
    /// Only if the built-in data is blank, which the tests rule out.
    pub fn to_cart_item(&self) -> Result<CartItemInput, CartItemError> {
        Ok(CartItemInput::new(self.id, self.name, self.price)?
            .with_image(DEFAULT_PRODUCT_IMAGE)
            .with_description(self.description))
    }
}

/// Look up a built-in product (game edition or gift card) by id.
#[must_use]
pub fn builtin_item(id: &str) -> Option<CartItemInput> {
    let edition = GameEdition::digital_deluxe();
    if edition.id == id {
        return edition.to_cart_item().ok();
    }
    GiftCard::all()
        .iter()
        .find(|card| card.id == id)
        .and_then(|card| card.to_cart_item().ok())
}
