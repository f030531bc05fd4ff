//! Test utilities for components
//!
//! - [`key`]: Create `KeyEvent` from string (e.g., `key("ctrl+p")`)
//! - [`click`] / [`scroll`]: Build mouse events at a screen position
//! - [`RenderHarness`]: Render into an in-memory terminal and inspect the output
//! - Assertion macros for verifying emitted actions
//!
//! # Example
//!
//! ```ignore
//! use tui_autocomplete_core::testing::{key, RenderHarness};
//!
//! let mut render = RenderHarness::new(40, 10);
//! let output = render.render_to_string_plain(|frame| {
//!     field.render(frame, frame.area(), props);
//! });
//! assert!(output.contains("Kyiv"));
//! ```

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Frame, Terminal};

use crate::event::EventKind;
use crate::keys::parse_key_string;

/// Create a `KeyEvent` from a key string.
///
/// Wrapper around [`parse_key_string`] that panics if the key string is
/// invalid, making it suitable for use in tests.
///
/// # Examples
///
/// ```
/// use tui_autocomplete_core::testing::key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let k = key("q");
/// assert_eq!(k.code, KeyCode::Char('q'));
///
/// let k = key("ctrl+p");
/// assert_eq!(k.code, KeyCode::Char('p'));
/// assert!(k.modifiers.contains(KeyModifiers::CONTROL));
/// ```
///
/// # Panics
///
/// Panics if the key string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

/// Create a `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Create a `KeyEvent` for a character with Ctrl modifier.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Wrap a key string straight into an [`EventKind`]
pub fn key_event(s: &str) -> EventKind {
    EventKind::Key(key(s))
}

/// Typing a whole string, one key event per character
pub fn type_str(s: &str) -> Vec<EventKind> {
    s.chars().map(|c| EventKind::Key(char_key(c))).collect()
}

/// A left-button press at `(column, row)`
pub fn click(column: u16, row: u16) -> EventKind {
    EventKind::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// A scroll wheel step at `(column, row)`; positive `delta` scrolls down
pub fn scroll(column: u16, row: u16, delta: isize) -> EventKind {
    EventKind::Scroll { column, row, delta }
}

/// Render components into an in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// Create a harness with the given terminal size
    ///
    /// # Panics
    ///
    /// Panics if the test terminal cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .expect("test backend terminal should always construct");
        Self { terminal }
    }

    /// Draw one frame and return the resulting buffer
    pub fn render(&mut self, f: impl FnOnce(&mut Frame)) -> &Buffer {
        self.terminal
            .draw(f)
            .expect("drawing to the test backend should not fail");
        self.terminal.backend().buffer()
    }

    /// Draw one frame and return its text, styles stripped
    pub fn render_to_string_plain(&mut self, f: impl FnOnce(&mut Frame)) -> String {
        buffer_to_string_plain(self.render(f))
    }

    /// Buffer of the last drawn frame
    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }
}

/// Convert a buffer to plain text, one line per row, trailing spaces trimmed
pub fn buffer_to_string_plain(buf: &Buffer) -> String {
    buffer_rect_to_string_plain(buf, buf.area)
}

/// Convert a region of a buffer to plain text
pub fn buffer_rect_to_string_plain(buf: &Buffer, rect: Rect) -> String {
    let rect = rect.intersection(buf.area);
    let mut lines = Vec::with_capacity(rect.height as usize);
    for y in rect.top()..rect.bottom() {
        let mut line = String::new();
        for x in rect.left()..rect.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Assert that a specific action was emitted.
///
/// # Example
///
/// ```ignore
/// let actions = field.drain_actions();
/// assert_emitted!(actions, Action::ShowResults(true));
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first action matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many actions match a pattern.
///
/// # Example
///
/// ```ignore
/// assert_eq!(count_emitted!(actions, Action::ShowResults(_)), 3);
/// ```
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
