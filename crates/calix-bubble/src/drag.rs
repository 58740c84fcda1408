//! Drag position tracking for the floating widget.

/// Widget position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Tracks the widget position across drag sequences.
///
/// On pointer-down the offset of the pointer relative to the widget is
/// recorded; every move while dragging repositions the widget to the
/// pointer minus that offset. Pointer-up freezes the position until the
/// next pointer-down.
#[derive(Debug, Default)]
pub struct DragTracker {
    position: Position,
    /// Pointer offset captured at pointer-down; `Some` while dragging.
    offset: Option<Position>,
}

impl DragTracker {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            offset: None,
        }
    }

    /// Current widget position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.offset.is_some()
    }

    /// Begin a drag at the given pointer coordinates.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.offset = Some(Position::new(x - self.position.x, y - self.position.y));
    }

    /// Reposition while dragging; ignored when no drag is in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(offset) = self.offset {
            self.position = Position::new(x - offset.x, y - offset.y);
        }
    }

    /// End the drag, freezing the position.
    pub fn pointer_up(&mut self) {
        self.offset = None;
    }
}
