//! The cart's mutation API and change notifications.

use core::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{Cart, CartItemInput, CartLineItem};
use crate::types::LineItemId;

/// A change applied to the cart.
///
/// Emitted only when state actually changed; no-ops (unknown ids, clearing an
/// empty cart, re-setting the same visibility) produce nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    /// A new line was appended or an existing line was incremented.
    ItemAdded { id: LineItemId, quantity: u32 },
    /// A line's quantity was replaced.
    QuantityChanged { id: LineItemId, from: u32, to: u32 },
    /// A line was removed.
    ItemRemoved { id: LineItemId },
    /// All lines were removed.
    Cleared { removed_lines: usize },
    /// The cart surface was opened or closed.
    VisibilityChanged { open: bool },
}

impl CartEvent {
    /// Short kebab-case name, suitable for client-side event triggers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ItemAdded { .. } => "item-added",
            Self::QuantityChanged { .. } => "quantity-changed",
            Self::ItemRemoved { .. } => "item-removed",
            Self::Cleared { .. } => "cart-cleared",
            Self::VisibilityChanged { .. } => "visibility-changed",
        }
    }

    /// Whether the event changes the line items (and therefore the totals).
    #[must_use]
    pub const fn affects_items(&self) -> bool {
        !matches!(self, Self::VisibilityChanged { .. })
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartEvent) + Send>;

/// Owns a [`Cart`] and is the only way to mutate it.
///
/// ```
/// use veilbound_core::{CartItemInput, CartStore, Price};
///
/// let mut store = CartStore::new();
/// let tee = CartItemInput::new("tee-M-Black", "Logo Tee (M, Black)", Price::from_cents(2999))
///     .unwrap();
/// store.add_item(tee.clone());
/// store.add_item(tee);
/// assert_eq!(store.cart().total_items(), 2);
///
/// store.update_quantity("tee-M-Black", 0);
/// assert!(store.cart().is_empty());
/// ```
pub struct CartStore {
    cart: Cart,
    max_quantity: u32,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore {
    /// Default per-line quantity ceiling.
    pub const DEFAULT_MAX_QUANTITY: u32 = 99;

    /// A store over an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::from_cart(Cart::new())
    }

    /// A store over an existing cart (e.g. one loaded from a session).
    #[must_use]
    pub const fn from_cart(cart: Cart) -> Self {
        Self {
            cart,
            max_quantity: Self::DEFAULT_MAX_QUANTITY,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Override the per-line quantity ceiling. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_quantity(mut self, max_quantity: u32) -> Self {
        self.max_quantity = max_quantity.max(1);
        self
    }

    #[must_use]
    pub const fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Give the cart back, dropping all listeners.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Register a listener called after every state change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Add one unit of `item`.
    ///
    /// An existing line with the same id is incremented (its captured name and
    /// price are kept); otherwise a new line with quantity 1 is appended. A line
    /// already at the quantity ceiling stays there and no event is emitted.
    pub fn add_item(&mut self, item: CartItemInput) -> Option<CartEvent> {
        let event = if let Some(index) = self.cart.position(item.id.as_str()) {
            let line = self.cart.items.get_mut(index)?;
            if line.quantity >= self.max_quantity {
                return None;
            }
            line.quantity += 1;
            CartEvent::ItemAdded {
                id: line.id.clone(),
                quantity: line.quantity,
            }
        } else {
            let line = CartLineItem::from_input(item);
            let event = CartEvent::ItemAdded {
                id: line.id.clone(),
                quantity: line.quantity,
            };
            self.cart.items.push(line);
            event
        };
        Some(self.emit(event))
    }

    /// Replace the quantity of line `id`.
    ///
    /// `quantity <= 0` removes the line. Quantities above the ceiling are
    /// clamped to it. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let to = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(self.max_quantity);
        let index = self.cart.position(id)?;
        let line = self.cart.items.get_mut(index)?;
        if line.quantity == to {
            return None;
        }

        let from = line.quantity;
        line.quantity = to;
        let event = CartEvent::QuantityChanged {
            id: line.id.clone(),
            from,
            to,
        };
        Some(self.emit(event))
    }

    /// Remove line `id` if present.
    pub fn remove_item(&mut self, id: &str) -> Option<CartEvent> {
        let index = self.cart.position(id)?;
        let line = self.cart.items.remove(index);
        Some(self.emit(CartEvent::ItemRemoved { id: line.id }))
    }

    /// Remove every line.
    pub fn clear(&mut self) -> Option<CartEvent> {
        if self.cart.items.is_empty() {
            return None;
        }
        let removed_lines = self.cart.items.len();
        self.cart.items.clear();
        Some(self.emit(CartEvent::Cleared { removed_lines }))
    }

    /// Show or hide the cart surface.
    pub fn set_open(&mut self, open: bool) -> Option<CartEvent> {
        if self.cart.is_open == open {
            return None;
        }
        self.cart.is_open = open;
        Some(self.emit(CartEvent::VisibilityChanged { open }))
    }

    /// See [`Cart::total_items`].
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// See [`Cart::subtotal`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    fn emit(&mut self, event: CartEvent) -> CartEvent {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        event
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Cart> for CartStore {
    fn from(cart: Cart) -> Self {
        Self::from_cart(cart)
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("max_quantity", &self.max_quantity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::types::Price;

    fn item(id: &str, name: &str, cents: u32) -> CartItemInput {
        CartItemInput::new(id, name, Price::from_cents(cents)).unwrap()
    }

    fn ids(store: &CartStore) -> Vec<&str> {
        store
            .cart()
            .items()
            .iter()
            .map(|line| line.id().as_str())
            .collect()
    }

    #[test]
    fn test_repeated_add_counts_calls_and_keeps_first_capture() {
        let mut store = CartStore::new();
        store.add_item(item("x", "First", 1000));
        store.add_item(item("x", "Renamed", 9900));
        store.add_item(item("x", "Again", 1));

        let line = store.cart().get("x").unwrap();
        assert_eq!(line.quantity(), 3);
        assert_eq!(line.name(), "First");
        assert_eq!(line.price(), Price::from_cents(1000));
    }

    #[test]
    fn test_add_preserves_insertion_order_and_totals() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));
        store.add_item(item("x", "A", 1000));
        store.add_item(item("y", "B", 500));

        assert_eq!(ids(&store), vec!["x", "y"]);
        assert_eq!(store.cart().get("x").unwrap().quantity(), 2);
        assert_eq!(store.cart().get("y").unwrap().quantity(), 1);
        assert_eq!(store.total_items(), 3);
        assert_eq!(store.subtotal(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_update_quantity_replaces_not_increments() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));
        let event = store.update_quantity("x", 5);

        assert_eq!(store.cart().get("x").unwrap().quantity(), 5);
        assert_eq!(
            event,
            Some(CartEvent::QuantityChanged {
                id: "x".into(),
                from: 1,
                to: 5
            })
        );
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));
        let before = store.cart().clone();

        assert_eq!(store.update_quantity("z", 4), None);
        assert_eq!(store.cart(), &before);
    }

    #[test]
    fn test_update_to_zero_or_negative_removes() {
        for quantity in [0, -1, i64::MIN] {
            let mut removed = CartStore::new();
            removed.add_item(item("x", "A", 1000));
            removed.add_item(item("y", "B", 500));
            removed.remove_item("x");

            let mut updated = CartStore::new();
            updated.add_item(item("x", "A", 1000));
            updated.add_item(item("y", "B", 500));
            let event = updated.update_quantity("x", quantity);

            assert_eq!(updated.cart(), removed.cart());
            assert_eq!(event, Some(CartEvent::ItemRemoved { id: "x".into() }));
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));
        store.add_item(item("y", "B", 500));

        assert!(store.remove_item("x").is_some());
        let once = store.cart().clone();
        assert!(store.remove_item("x").is_none());
        assert_eq!(store.cart(), &once);
        assert_eq!(ids(&store), vec!["y"]);
    }

    #[test]
    fn test_clear_zeroes_totals() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));
        store.update_quantity("x", 7);
        store.add_item(item("y", "B", 499));

        assert_eq!(store.clear(), Some(CartEvent::Cleared { removed_lines: 2 }));
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert_eq!(store.clear(), None);
    }

    #[test]
    fn test_quantity_ceiling() {
        let mut store = CartStore::new().with_max_quantity(3);
        assert_eq!(
            store.update_quantity("x", 10),
            None,
            "unknown id is ignored even when clamping"
        );

        store.add_item(item("x", "A", 100));
        store.update_quantity("x", 1_000_000);
        assert_eq!(store.cart().get("x").unwrap().quantity(), 3);

        assert_eq!(store.add_item(item("x", "A", 100)), None);
        assert_eq!(store.cart().get("x").unwrap().quantity(), 3);
    }

    #[test]
    fn test_max_quantity_floor_is_one() {
        let store = CartStore::new().with_max_quantity(0);
        assert_eq!(store.max_quantity(), 1);
    }

    #[test]
    fn test_visibility_does_not_touch_items() {
        let mut store = CartStore::new();
        store.add_item(item("x", "A", 1000));

        let event = store.set_open(true).unwrap();
        assert!(!event.affects_items());
        assert!(store.cart().is_open());
        assert_eq!(store.set_open(true), None);
        assert_eq!(store.subtotal(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_listeners_see_only_real_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = CartStore::new();
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |event| {
            sink.lock().unwrap().push(event.name());
        });

        store.add_item(item("x", "A", 1000));
        store.update_quantity("x", 1);
        store.update_quantity("nope", 3);
        store.remove_item("nope");
        store.update_quantity("x", 2);
        store.set_open(true);
        store.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "item-added",
                "quantity-changed",
                "visibility-changed",
                "cart-cleared"
            ]
        );

        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.add_item(item("y", "B", 1));
        assert_eq!(seen.lock().unwrap().len(), 4);
    }
}
