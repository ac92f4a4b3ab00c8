//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use veilbound_core::{Cart, CartStore, DemoOrderNumber, PricingPolicy};

use crate::catalog::{CachedMerchCatalog, MerchCatalog};
use crate::config::StorefrontConfig;
use crate::middleware::SessionLocks;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the merch catalog and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CachedMerchCatalog,
    order_sequence: AtomicU32,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Merch catalog backend (wrapped in a listing cache here)
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn MerchCatalog>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: CachedMerchCatalog::new(catalog),
                order_sequence: AtomicU32::new(rand::random_range(0..10_000)),
                session_locks: SessionLocks::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the merch catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn MerchCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the pricing policy.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }

    /// Per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Wrap a session's cart in a store with this storefront's quantity cap.
    #[must_use]
    pub fn cart_store(&self, cart: Cart) -> CartStore {
        CartStore::from_cart(cart).with_max_quantity(self.inner.config.max_line_quantity)
    }

    /// Next demo order number.
    ///
    /// Starts at a random point and counts up, so numbers look arbitrary but
    /// do not repeat within 10,000 orders of one process.
    #[must_use]
    pub fn next_order_number(&self) -> DemoOrderNumber {
        let sequence = self.inner.order_sequence.fetch_add(1, Ordering::Relaxed);
        DemoOrderNumber::from_sequence(sequence)
    }
}
