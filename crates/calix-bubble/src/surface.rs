//! Bubble widget state: panel toggle, query submission, drag.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use calix_core::Transcript;
use calix_protocol::RouterRequest;

use crate::drag::{DragTracker, Position};
use crate::router::QueryRouter;

/// Headless floating-bubble widget.
pub struct BubbleSurface {
    router: Arc<dyn QueryRouter>,
    transcript: Transcript,
    panel_visible: bool,
    drag: DragTracker,
}

impl BubbleSurface {
    /// Create a bubble relaying queries through the given router.
    pub fn new(router: Arc<dyn QueryRouter>) -> Self {
        Self {
            router,
            transcript: Transcript::new(),
            panel_visible: false,
            drag: DragTracker::default(),
        }
    }

    // ---------------------------------------------------------------
    // Panel
    // ---------------------------------------------------------------

    /// Flip panel visibility. Returns the new visibility.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        self.panel_visible
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Toggle-button glyph for the current panel state.
    pub fn toggle_glyph(&self) -> &'static str {
        if self.panel_visible {
            "◀"
        } else {
            "▶"
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Submit a query (Enter without Shift in the original widget).
    ///
    /// Whitespace-only input is a no-op. Otherwise the query is logged,
    /// relayed through the router, and the reply appended when it
    /// arrives. No timeout, no retry, no correlation between
    /// overlapping queries; replies land in arrival order.
    pub async fn submit(&self, input: &str) {
        let query = input.trim();
        if query.is_empty() {
            return;
        }

        self.transcript.push(format!("You: {}", query));
        debug!("relaying query through router: {}", query);

        match self.router.route(RouterRequest::query(query)).await {
            Ok(response) if response.success => {
                let data = response.data.unwrap_or(Value::Null);
                self.transcript.push(format!("Cali: {}", data));
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "malformed router response".to_string());
                self.transcript.push(format!("Error: {}", message));
            }
            Err(e) => {
                self.transcript.push(format!("Error: {}", e));
            }
        }
    }

    /// Query/reply transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    // ---------------------------------------------------------------
    // Drag
    // ---------------------------------------------------------------

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.drag.pointer_move(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn position(&self) -> Position {
        self.drag.position()
    }
}
