//! Bubble worker wire protocol.
//!
//! Outbound command frames, shape-based classification of inbound
//! frames, and the extension-router message types. The worker owns the
//! wire format; every inbound frame is mapped onto a tagged enum at the
//! single classification site.

pub mod command;
pub mod reply;
pub mod router;

pub use command::WorkerCommand;
pub use reply::{classify_reply, WorkerReply};
pub use router::{RouterRequest, RouterResponse};
