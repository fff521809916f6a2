//! WebSocket chat server implementation.

mod handler;
mod registry;
mod router;
mod runner;
mod signal;
mod state;

pub use registry::{ClientInfo, ConnectionId, Recipient, SessionRegistry};
pub use router::MessageRouter;
pub use runner::{app, run_server};
pub use state::AppState;
