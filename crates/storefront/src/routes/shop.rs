//! Shop page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;
use veilbound_core::{GameEdition, GiftCard, MerchProduct, format_usd};

use super::cart::{CartView, PanelView, cart_view};
use crate::models::ShopperSession;
use crate::state::AppState;

/// Game edition display data.
#[derive(Clone)]
pub struct EditionView {
    pub id: &'static str,
    pub name: &'static str,
    pub price: String,
    pub original_price: String,
    pub savings: String,
    pub image: &'static str,
    pub description: &'static str,
    pub features: Vec<&'static str>,
    pub platforms: Vec<&'static str>,
    pub release_window: &'static str,
    pub preorder_bonus: &'static str,
}

impl From<&GameEdition> for EditionView {
    fn from(edition: &GameEdition) -> Self {
        Self {
            id: edition.id,
            name: edition.name,
            price: edition.price.display(),
            original_price: edition.original_price.display(),
            savings: format_usd(edition.savings()),
            image: edition.image,
            description: edition.description,
            features: edition.features.to_vec(),
            platforms: edition.platforms.to_vec(),
            release_window: edition.release_window,
            preorder_bonus: edition.preorder_bonus,
        }
    }
}

/// Gift card display data.
#[derive(Clone)]
pub struct GiftCardView {
    pub id: &'static str,
    pub name: &'static str,
    pub price: String,
    pub description: &'static str,
}

impl From<&GiftCard> for GiftCardView {
    fn from(card: &GiftCard) -> Self {
        Self {
            id: card.id,
            name: card.name,
            price: card.price.display(),
            description: card.description,
        }
    }
}

/// Merch product display data.
#[derive(Clone)]
pub struct MerchView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl From<&MerchProduct> for MerchView {
    fn from(product: &MerchProduct) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image_url: product.image_url.clone(),
            colors: product.colors.clone(),
            sizes: product.sizes.clone(),
        }
    }
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub edition: EditionView,
    pub gift_cards: Vec<GiftCardView>,
    pub merch: Vec<MerchView>,
    pub merch_unavailable: bool,
    pub cart: CartView,
    pub panel: PanelView,
}

/// Display the shop.
///
/// A catalog outage hides the merch section; the game edition and gift cards
/// are always shown.
#[instrument(skip(state, shopper))]
pub async fn index(State(state): State<AppState>, shopper: ShopperSession) -> impl IntoResponse {
    let (merch, merch_unavailable) = match state.catalog().list_active().await {
        Ok(products) => (products.iter().map(MerchView::from).collect(), false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load merch catalog");
            (Vec::new(), true)
        }
    };

    ShopTemplate {
        edition: EditionView::from(&GameEdition::digital_deluxe()),
        gift_cards: GiftCard::all().iter().map(GiftCardView::from).collect(),
        merch,
        merch_unavailable,
        cart: cart_view(&state, &shopper.cart),
        panel: PanelView::build(shopper.flow.mode()),
    }
}
