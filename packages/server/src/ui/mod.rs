//! WebSocket relay server: router, connection handler and HTTP endpoints.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
