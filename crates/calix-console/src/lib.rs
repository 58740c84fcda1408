//! Popup console — one WebSocket connection to the bubble worker and a
//! timestamped command transcript.

pub mod connection;
pub mod console;

pub use connection::{Connection, ConnectionEvent, ConnectionState};
pub use console::Console;
