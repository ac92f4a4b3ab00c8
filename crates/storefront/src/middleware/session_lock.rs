//! One request at a time per shopper session.
//!
//! Cart handlers load the session record, change it, and write it back, and
//! the session layer writes the record again as the response leaves. This
//! layer runs outside the session layer and holds a per-session lock for the
//! whole request, so concurrent requests from one browser apply in turn.
//!
//! Requests without a session cookie are not locked; each of them starts a
//! fresh session.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Locks unused for this long are dropped.
const LOCK_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Registry of per-session locks, keyed by session cookie value.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE_TIMEOUT).build(),
        }
    }

    /// Wait for exclusive access to a session.
    pub async fn lock(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(session_key.to_owned(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// The session cookie value sent with a request, if any.
#[must_use]
pub fn session_key(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Serialize requests that carry the same session cookie.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(key) = session_key(&request) else {
        return next.run(request).await;
    };

    let _guard = state.session_locks().lock(&key).await;
    next.run(request).await
}
