//! Single-line text entry
//!
//! [`TextEntry`] is the seam between the autocomplete field and whatever
//! widget edits the text. [`TextInput`] is the default implementation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};
use serde::{Deserialize, Serialize};
use tui_autocomplete_core::EventKind;

use crate::style::StyleLayer;

/// Why editing ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndEditingReason {
    /// Esc pressed inside the entry
    Escape,
    /// Tab or Shift+Tab moved focus away
    Tab,
    /// `blur()` called on a focused entry
    Blur,
}

/// Emitted when a focused entry loses focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndEditing {
    /// Text at the moment editing ended
    pub text: String,
    pub reason: EndEditingReason,
}

/// What a text entry reports back from an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEntryEvent {
    /// The text changed
    Changed(String),
    /// Enter pressed
    Submitted(String),
    EndEditing(EndEditing),
}

/// Options passed straight through to the text entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextInputOptions {
    /// Shown dimmed while the value is empty
    pub placeholder: String,
    /// Maximum number of characters accepted
    pub max_length: Option<usize>,
    /// When false the text cannot be changed from the keyboard
    pub editable: bool,
    /// Focus the entry as soon as it mounts
    pub auto_focus: bool,
}

impl Default for TextInputOptions {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            max_length: None,
            editable: true,
            auto_focus: false,
        }
    }
}

/// Everything a text entry needs for one event or render
pub struct TextEntryProps<'a> {
    /// Current value (owned by the application)
    pub value: &'a str,
    /// Fully merged input style
    pub style: &'a StyleLayer,
    pub options: &'a TextInputOptions,
}

/// A text-entry widget the autocomplete field can mount
pub trait TextEntry {
    fn focus(&mut self);

    /// Drop focus, returning whether the entry was focused
    fn blur(&mut self) -> bool;

    fn is_focused(&self) -> bool;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: &TextEntryProps<'_>,
    ) -> Option<TextEntryEvent>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: &TextEntryProps<'_>);
}

/// A single-line text input with cursor
///
/// Handles typing, backspace, delete, and cursor movement. Reports a change
/// for each edit, a submit for Enter, and end-of-editing for Esc and Tab.
/// When the value is replaced from outside, the cursor moves to its end.
#[derive(Debug, Default)]
pub struct TextInput {
    /// Cursor position (byte index)
    cursor: usize,
    focused: bool,
    /// Last value this input saw or produced
    seen: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the cursor at the end of a value that changed without an edit here,
    /// otherwise clamp it to a char boundary
    fn track_value(&mut self, value: &str) {
        if self.seen != value {
            self.seen.clear();
            self.seen.push_str(value);
            self.cursor = value.len();
            return;
        }
        self.cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn move_cursor_left(&mut self, value: &str) {
        if let Some((i, _)) = value[..self.cursor].char_indices().next_back() {
            self.cursor = i;
        }
    }

    fn move_cursor_right(&mut self, value: &str) {
        if let Some(c) = value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    /// Delete character before cursor (backspace)
    fn delete_char_before(&mut self, value: &str) -> Option<String> {
        let (char_start, _) = value[..self.cursor].char_indices().next_back()?;
        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..char_start]);
        new_value.push_str(&value[self.cursor..]);
        self.cursor = char_start;
        Some(new_value)
    }

    /// Delete character at cursor (delete key)
    fn delete_char_at(&self, value: &str) -> Option<String> {
        let c = value[self.cursor..].chars().next()?;
        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..self.cursor]);
        new_value.push_str(&value[self.cursor + c.len_utf8()..]);
        Some(new_value)
    }

    fn end_editing(&mut self, value: &str, reason: EndEditingReason) -> TextEntryEvent {
        self.focused = false;
        TextEntryEvent::EndEditing(EndEditing {
            text: value.to_string(),
            reason,
        })
    }

    fn at_max_length(value: &str, options: &TextInputOptions) -> bool {
        options
            .max_length
            .is_some_and(|max| value.chars().count() >= max)
    }

    /// Apply one key press to `value`
    fn edit(
        &mut self,
        key: &KeyEvent,
        value: &str,
        options: &TextInputOptions,
    ) -> Option<TextEntryEvent> {
        let editable = options.editable;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = value.len();
                    None
                }
                KeyCode::Char('u') if editable && !value.is_empty() => {
                    self.cursor = 0;
                    Some(TextEntryEvent::Changed(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) if editable => {
                if Self::at_max_length(value, options) {
                    return None;
                }
                Some(TextEntryEvent::Changed(self.insert_char(value, c)))
            }
            KeyCode::Backspace if editable => self
                .delete_char_before(value)
                .map(TextEntryEvent::Changed),
            KeyCode::Delete if editable => self.delete_char_at(value).map(TextEntryEvent::Changed),
            KeyCode::Left => {
                self.move_cursor_left(value);
                None
            }
            KeyCode::Right => {
                self.move_cursor_right(value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = value.len();
                None
            }
            KeyCode::Enter => Some(TextEntryEvent::Submitted(value.to_string())),
            KeyCode::Esc => Some(self.end_editing(value, EndEditingReason::Escape)),
            KeyCode::Tab | KeyCode::BackTab => Some(self.end_editing(value, EndEditingReason::Tab)),
            _ => None,
        }
    }
}

impl TextEntry for TextInput {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) -> bool {
        std::mem::replace(&mut self.focused, false)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: &TextEntryProps<'_>,
    ) -> Option<TextEntryEvent> {
        if !self.focused {
            return None;
        }
        let key = event.key_press()?;

        self.track_value(props.value);
        let result = self.edit(key, props.value, props.options);
        if let Some(TextEntryEvent::Changed(text)) = &result {
            self.seen.clone_from(text);
        }
        result
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: &TextEntryProps<'_>) {
        self.track_value(props.value);

        let base = props.style.text_style();
        frame.render_widget(Block::default().style(base), area);

        let content = props.style.inner(area);
        if content.is_empty() {
            return;
        }
        let width = content.width as usize;

        let cursor_col = props.value[..self.cursor].chars().count();
        // Keep the cursor inside the visible window
        let skip = (cursor_col + 1).saturating_sub(width);

        let paragraph = if props.value.is_empty() {
            Paragraph::new(props.options.placeholder.as_str())
                .style(base.patch(Style::default().fg(Color::DarkGray)))
        } else {
            let visible: String = props.value.chars().skip(skip).take(width).collect();
            Paragraph::new(visible).style(base)
        };
        frame.render_widget(paragraph, content);

        if self.focused {
            let col = (cursor_col - skip) as u16;
            frame.set_cursor_position((content.x + col, content.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_autocomplete_core::testing::{key, RenderHarness};

    fn focused() -> TextInput {
        let mut input = TextInput::new();
        input.focus();
        input
    }

    fn send(input: &mut TextInput, value: &str, k: &str) -> Option<TextEntryEvent> {
        send_with(input, value, k, &TextInputOptions::default())
    }

    fn send_with(
        input: &mut TextInput,
        value: &str,
        k: &str,
        options: &TextInputOptions,
    ) -> Option<TextEntryEvent> {
        let style = StyleLayer::default();
        let props = TextEntryProps {
            value,
            style: &style,
            options,
        };
        input.handle_event(&EventKind::Key(key(k)), &props)
    }

    #[test]
    fn test_typing() {
        let mut input = focused();
        assert_eq!(
            send(&mut input, "", "a"),
            Some(TextEntryEvent::Changed("a".into()))
        );
    }

    #[test]
    fn test_typing_appends() {
        let mut input = focused();
        input.cursor = 5;
        assert_eq!(
            send(&mut input, "hello", "!"),
            Some(TextEntryEvent::Changed("hello!".into()))
        );
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut input = focused();
        input.cursor = "añ".len();
        assert_eq!(
            send(&mut input, "añ", "backspace"),
            Some(TextEntryEvent::Changed("a".into()))
        );
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_backspace_at_start() {
        let mut input = focused();
        assert_eq!(send(&mut input, "hello", "backspace"), None);
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = focused();
        input.seen = "abc".into();
        input.cursor = 1;
        assert_eq!(
            send(&mut input, "abc", "delete"),
            Some(TextEntryEvent::Changed("ac".into()))
        );
    }

    #[test]
    fn test_cursor_clamped_after_external_change() {
        let mut input = focused();
        input.cursor = 10;
        assert_eq!(
            send(&mut input, "ab", "x"),
            Some(TextEntryEvent::Changed("abx".into()))
        );
    }

    #[test]
    fn test_replaced_value_moves_cursor_to_end() {
        let mut input = focused();
        send(&mut input, "", "o");
        send(&mut input, "o", "s");
        send(&mut input, "os", "left");
        assert_eq!(input.cursor, 1);

        // Own edits echoed back keep the cursor where it was
        assert_eq!(
            send(&mut input, "os", "x"),
            Some(TextEntryEvent::Changed("oxs".into()))
        );
        assert_eq!(input.cursor, 2);

        assert_eq!(
            send(&mut input, "Oslo", "!"),
            Some(TextEntryEvent::Changed("Oslo!".into()))
        );
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = focused();
        input.cursor = 3;
        assert_eq!(
            send(&mut input, "abc", "ctrl+u"),
            Some(TextEntryEvent::Changed(String::new()))
        );
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_submit() {
        let mut input = focused();
        assert_eq!(
            send(&mut input, "hello", "enter"),
            Some(TextEntryEvent::Submitted("hello".into()))
        );
    }

    #[test]
    fn test_escape_ends_editing() {
        let mut input = focused();
        let event = send(&mut input, "kyiv", "esc");
        assert_eq!(
            event,
            Some(TextEntryEvent::EndEditing(EndEditing {
                text: "kyiv".into(),
                reason: EndEditingReason::Escape,
            }))
        );
        assert!(!input.is_focused());
    }

    #[test]
    fn test_max_length() {
        let mut input = focused();
        input.cursor = 2;
        let options = TextInputOptions {
            max_length: Some(2),
            ..Default::default()
        };
        assert_eq!(send_with(&mut input, "ab", "c", &options), None);
    }

    #[test]
    fn test_not_editable_ignores_typing() {
        let mut input = focused();
        let options = TextInputOptions {
            editable: false,
            ..Default::default()
        };
        assert_eq!(send_with(&mut input, "", "a", &options), None);
        assert_eq!(
            send_with(&mut input, "x", "enter", &options),
            Some(TextEntryEvent::Submitted("x".into()))
        );
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut input = TextInput::new();
        assert_eq!(send(&mut input, "", "a"), None);
    }

    #[test]
    fn test_blur_reports_previous_focus() {
        let mut input = focused();
        assert!(input.blur());
        assert!(!input.blur());
    }

    #[test]
    fn test_render_with_value() {
        let mut render = RenderHarness::new(30, 1);
        let mut input = focused();
        let style = StyleLayer::new().with_padding_x(1);
        let options = TextInputOptions::default();

        let output = render.render_to_string_plain(|frame| {
            let props = TextEntryProps {
                value: "hello",
                style: &style,
                options: &options,
            };
            input.render(frame, frame.area(), &props);
        });

        assert_eq!(output, " hello");
    }

    #[test]
    fn test_render_placeholder() {
        let mut render = RenderHarness::new(30, 1);
        let mut input = TextInput::new();
        let style = StyleLayer::default();
        let options = TextInputOptions {
            placeholder: "Type here...".into(),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            let props = TextEntryProps {
                value: "",
                style: &style,
                options: &options,
            };
            input.render(frame, frame.area(), &props);
        });

        assert!(output.contains("Type here..."));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut render = RenderHarness::new(4, 1);
        let mut input = focused();
        input.cursor = 6;
        let style = StyleLayer::default();
        let options = TextInputOptions::default();

        let output = render.render_to_string_plain(|frame| {
            let props = TextEntryProps {
                value: "abcdef",
                style: &style,
                options: &options,
            };
            input.render(frame, frame.area(), &props);
        });

        assert_eq!(output, "def");
    }
}
