//! Core traits and types for tui-autocomplete
//!
//! This crate holds the framework plumbing the autocomplete widget is built on:
//!
//! - **Component**: UI elements that render from props and emit actions
//! - **EventKind**: Key, mouse, scroll and resize events delivered to components
//! - **HandleMap**: Table of mounted child handles keyed by logical name
//! - **Keys**: Key-string parsing for configurable bindings
//! - **Poller**: Background task feeding crossterm events into a channel
//! - **Testing**: Render harness, key helpers and action assertions
//!
//! Actions follow the Redux/Elm pattern: a component never mutates
//! application state, it returns actions built from the callbacks in its props.

pub mod component;
pub mod event;
pub mod handles;
pub mod keys;
pub mod poller;
pub mod testing;

pub use component::Component;
pub use event::EventKind;
pub use handles::{ChildName, HandleMap};
pub use keys::{format_key_for_display, key_matches, parse_key_string, KeyBinding, KeySet};
pub use poller::{process_raw_event, spawn_event_poller, RawEvent};

// Re-export ratatui types for convenience
pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

pub use testing::{
    buffer_rect_to_string_plain, buffer_to_string_plain, char_key, click, ctrl_key, key,
    key_event, scroll, type_str, RenderHarness,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::event::EventKind;
    pub use crate::handles::HandleMap;
    pub use crate::keys::{format_key_for_display, parse_key_string, KeySet};
    pub use crate::poller::{process_raw_event, spawn_event_poller, RawEvent};

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
