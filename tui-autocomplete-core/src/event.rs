//! Event types delivered to components

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

/// The event payload components receive
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Keyboard event
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Scroll event with position and delta
    Scroll { column: u16, row: u16, delta: isize },
    /// Terminal resize
    Resize(u16, u16),
    /// Periodic tick
    Tick,
}

impl EventKind {
    /// Key event, if this is a key press or repeat (releases are filtered out)
    pub fn key_press(&self) -> Option<&KeyEvent> {
        match self {
            EventKind::Key(key) if key.kind != KeyEventKind::Release => Some(key),
            _ => None,
        }
    }

    /// Screen position of a left-button press
    pub fn left_click(&self) -> Option<Position> {
        match self {
            EventKind::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => Some(Position::new(*column, *row)),
            _ => None,
        }
    }

    /// Screen position the event refers to, if any
    pub fn position(&self) -> Option<Position> {
        match self {
            EventKind::Mouse(mouse) => Some(Position::new(mouse.column, mouse.row)),
            EventKind::Scroll { column, row, .. } => Some(Position::new(*column, *row)),
            _ => None,
        }
    }

    /// Whether the event's position falls inside `area`
    pub fn is_within(&self, area: Rect) -> bool {
        self.position().is_some_and(|pos| area.contains(pos))
    }
}
