// Application layer: HTTP handlers, shared state and routing.

pub mod handlers;
pub mod router;
pub mod state;
