//! Multilingual WebSocket chat server library.
//!
//! Relays chat messages between WebSocket-connected clients, translating
//! each message into every recipient's preferred language. Messages that
//! look like questions are routed to a language model backend instead, and
//! the answer is delivered to each recipient in their own language.

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod protocol;
pub mod server;
pub mod translate;

// shared library
pub mod common;
