//! Key-string parsing and matching for configurable bindings

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

/// A parsed key binding that remembers the string it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    source: String,
    key: KeyEvent,
}

impl KeyBinding {
    /// Parse a binding such as `"down"` or `"ctrl+n"`
    pub fn parse(source: &str) -> Option<Self> {
        parse_key_string(source).map(|key| Self {
            source: source.trim().to_string(),
            key,
        })
    }

    /// The original key string
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed key event
    pub fn key(&self) -> KeyEvent {
        self.key
    }

    /// Check whether an incoming key event triggers this binding
    pub fn matches(&self, event: &KeyEvent) -> bool {
        key_matches(&self.key, event)
    }
}

/// An ordered set of alternative bindings for one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    bindings: Vec<KeyBinding>,
}

impl KeySet {
    /// Parse every key string, returning the first one that fails to parse
    pub fn parse<S: AsRef<str>>(keys: &[S]) -> Result<Self, String> {
        let bindings = keys
            .iter()
            .map(|k| KeyBinding::parse(k.as_ref()).ok_or_else(|| k.as_ref().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    /// Check whether any binding in the set matches the event
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.bindings.iter().any(|b| b.matches(event))
    }

    /// First binding, for help text
    pub fn first(&self) -> Option<&KeyBinding> {
        self.bindings.first()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Compare a binding against an event
///
/// Kind and state are ignored. Character keys compare case-insensitively.
pub fn key_matches(binding: &KeyEvent, event: &KeyEvent) -> bool {
    let codes_match = match (&binding.code, &event.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.to_lowercase().eq(b.to_lowercase()),
        (a, b) => a == b,
    };
    codes_match && binding.modifiers == event.modifiers
}

/// Parse a key string like "q", "esc", "ctrl+p", "shift+tab" into a KeyEvent
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();

    if key_str.is_empty() {
        return None;
    }

    if key_str == "shift+tab" || key_str == "backtab" {
        return Some(press(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    // "+" on its own (or as the last part, e.g. "ctrl++") is the plus key
    let (prefix, key_part) = match key_str.strip_suffix("++") {
        Some(rest) => (rest, "+"),
        None if key_str == "+" => ("", "+"),
        None => match key_str.rsplit_once('+') {
            Some((mods, key)) => (mods, key),
            None => ("", key_str.as_str()),
        },
    };

    let mut modifiers = KeyModifiers::empty();
    for part in prefix.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key_part.trim() {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };

    Some(press(code, modifiers))
}

/// Format a key string for display (e.g., "ctrl+p" -> "^P", "down" -> "Down")
pub fn format_key_for_display(key_str: &str) -> String {
    let Some(key) = parse_key_string(key_str) else {
        return key_str.trim().to_string();
    };

    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push('^');
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && key.code != KeyCode::BackTab {
        out.push_str("Shift+");
    }

    let name = match key.code {
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Insert => "Ins".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_uppercase().collect(),
        other => format!("{other:?}"),
    };
    out.push_str(&name);
    out
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let result = parse_key_string("q").unwrap();
        assert_eq!(result.code, KeyCode::Char('q'));
        assert_eq!(result.modifiers, KeyModifiers::empty());
    }

    #[test]
    fn test_parse_ctrl_key() {
        let result = parse_key_string("ctrl+n").unwrap();
        assert_eq!(result.code, KeyCode::Char('n'));
        assert!(result.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn test_parse_shift_tab() {
        let result = parse_key_string("shift+tab").unwrap();
        assert_eq!(result.code, KeyCode::BackTab);
        assert!(result.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(parse_key_string("f5").unwrap().code, KeyCode::F(5));
        assert!(parse_key_string("f13").is_none());
    }

    #[test]
    fn test_parse_plus() {
        assert_eq!(parse_key_string("+").unwrap().code, KeyCode::Char('+'));
        let k = parse_key_string("ctrl++").unwrap();
        assert_eq!(k.code, KeyCode::Char('+'));
        assert!(k.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_key_string("").is_none());
        assert!(parse_key_string("hyper+x").is_none());
        assert!(parse_key_string("nope").is_none());
    }

    #[test]
    fn test_key_set_matches_any() {
        let set = KeySet::parse(&["down", "ctrl+n"]).unwrap();
        assert!(set.matches(&parse_key_string("down").unwrap()));
        assert!(set.matches(&parse_key_string("ctrl+N").unwrap()));
        assert!(!set.matches(&parse_key_string("n").unwrap()));
    }

    #[test]
    fn test_key_set_reports_bad_key() {
        assert_eq!(KeySet::parse(&["up", "wat"]), Err("wat".to_string()));
    }

    #[test]
    fn test_format_key_for_display() {
        assert_eq!(format_key_for_display("q"), "Q");
        assert_eq!(format_key_for_display("ctrl+p"), "^P");
        assert_eq!(format_key_for_display("esc"), "Esc");
        assert_eq!(format_key_for_display("shift+tab"), "Shift+Tab");
    }
}
