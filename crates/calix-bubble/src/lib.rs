//! Bubble surface — floating query widget state and router relay.
//!
//! Headless counterpart of the in-page bubble: panel visibility, the
//! query transcript, and drag position tracking, with queries relayed
//! through an extension-style router boundary.

pub mod drag;
pub mod router;
pub mod surface;

pub use drag::{DragTracker, Position};
pub use router::QueryRouter;
pub use surface::BubbleSurface;
