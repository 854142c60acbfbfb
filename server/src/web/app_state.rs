use crate::relay::Relay;

/// Shared state handed to every request handler.
pub struct AppState {
    pub relay: Relay,
}
