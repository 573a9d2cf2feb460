use crate::session::SessionHandle;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every request goes through the one session engine behind `session`.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
}
